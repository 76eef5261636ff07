//! # Core Session Layer
//!
//! Everything the conversation window talks to, with no UI types in sight.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Session (send)       │
//!                    │  • ContactDirectory     │
//!                    │  • ProtocolEvent (in)   │
//!                    │  • Config               │
//!                    └───────────┬─────────────┘
//!                                │ events / send
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`protocol`]: `Cid`, `ProtocolEvent`, the `Protocol` trait
//! - [`session`]: the `Session` handed to the window
//! - [`contacts`]: read-only contact lookup
//! - [`message`]: incoming message records and their style
//! - [`loopback`]: local echo protocol used by the binary
//! - [`config`]: TOML config and override resolution

pub mod config;
pub mod contacts;
pub mod loopback;
pub mod message;
pub mod protocol;
pub mod session;
