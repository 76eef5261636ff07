//! # TUI Components
//!
//! Every widget of the conversation window.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive their data as fields or parameters:
//! - `Header`: two-line identity label plus icon
//! - `TabLabel`: ellipsized tab title
//! - `ContactInfo`: the two avatar slots
//! - `StatusBar`: bottom row with status and key hints
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state and emit events:
//! - `TextBox`: bordered, scrollable text surface (the base of the next two)
//! - `InputText`: editable box that emits `InputEvent::Submit` on Enter
//! - `OutputText`: read-only history with stick-to-bottom scrolling
//! - `Conversation`: one tab page; tracks membership, relays sends
//! - `MainConversation`: the tab container and protocol event dispatch
//!
//! ### Props-Based Data Flow
//!
//! Components never reach into the session. The contacts directory and the
//! session are passed to the methods that need them:
//!
//! ```rust,ignore
//! main.handle_protocol_event(&session.contacts, event);
//! main.send_from(&mut session, page, &cid, &text)?;
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs                (this file)
//! ├── text_box.rs           (scrollable text surface)
//! ├── input_text.rs         (editable, submit on Enter)
//! ├── cursor.rs             (input cursor over wrapped rows)
//! ├── output_text.rs        (read-only history)
//! ├── header.rs             (title/subtitle + icon)
//! ├── contact_info.rs       (avatar panel)
//! ├── tab_label.rs          (tab titles)
//! ├── conversation.rs       (one tab page)
//! ├── main_conversation.rs  (tab container)
//! └── status_bar.rs         (bottom row)
//! ```

pub mod contact_info;
pub mod conversation;
mod cursor;
pub mod header;
pub mod input_text;
pub mod main_conversation;
pub mod output_text;
pub mod status_bar;
pub mod tab_label;
pub mod text_box;

pub use contact_info::ContactInfo;
pub use conversation::{Conversation, ConversationEvent, Presence};
pub use header::Header;
pub use input_text::{InputEvent, InputText};
pub use main_conversation::{Dispatch, MainConversation, MainEvent, PageId};
pub use output_text::OutputText;
pub use status_bar::StatusBar;
pub use tab_label::TabLabel;
pub use text_box::TextBox;
