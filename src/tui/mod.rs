//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, draws the window and
//! feeds it two streams of input:
//!
//! - **Keyboard/mouse** via crossterm, mapped to [`event::TuiEvent`].
//! - **Protocol events** drained from a `std::sync::mpsc` channel that the
//!   protocol (and its background tasks) write into.
//!
//! Both are handled on this thread, in arrival order, before the next draw.
//!
//! ## Redraw Strategy
//!
//! The loop sleeps up to 100ms waiting for terminal input, then drains any
//! protocol events. It only redraws when either stream delivered something
//! or the terminal was resized.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

pub mod alignment;
pub mod component;
pub mod components;
pub mod event;
pub mod images;
pub mod markup;
pub mod rich_buffer;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::config::ResolvedConfig;
use crate::core::contacts::ContactDirectory;
use crate::core::loopback::LoopbackProtocol;
use crate::core::protocol::{Cid, ProtocolEvent};
use crate::core::session::Session;
use crate::tui::component::{EventHandler, TabPage};
use crate::tui::components::{MainConversation, MainEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Ctrl+Shift+Arrow through on terminals
        // that support it; others ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Everything the loop mutates, outside of the terminal itself.
pub struct Window {
    pub session: Session,
    pub main: MainConversation,
    pub status_message: String,
}

impl Window {
    /// Build the session and open the startup conversations.
    pub fn new(config: &ResolvedConfig, tx: mpsc::Sender<ProtocolEvent>) -> Self {
        let contacts =
            ContactDirectory::with_contacts(config.me.clone(), config.contacts.iter().cloned());
        let protocol = LoopbackProtocol::new(tx, config.reply_delay);
        let mut window = Self {
            session: Session::new(Box::new(protocol), contacts),
            main: MainConversation::new(config.theme.clone()),
            status_message: String::new(),
        };

        for entry in &config.conversations {
            window.open_conversation(Cid::generate(), &entry.members);
        }
        window
    }

    /// Open an empty page and ask the protocol to populate it. Membership
    /// arrives back as contact-joined events.
    pub fn open_conversation(&mut self, cid: Cid, members: &[String]) {
        self.main
            .new_conversation(&self.session.contacts, cid.clone(), Vec::new());
        if let Err(e) = self.session.protocol.do_start_conversation(&cid, members) {
            warn!("Starting conversation {} failed: {}", cid, e);
            self.status_message = format!("Could not start conversation: {e}");
        }
    }

    /// Apply one terminal event. Returns `false` when the user asked to quit.
    pub fn handle_tui_event(&mut self, event: &TuiEvent) -> bool {
        match event {
            TuiEvent::Quit => return false,
            TuiEvent::Resize => {}
            TuiEvent::NewConversation => self.open_conversation(Cid::generate(), &[]),
            TuiEvent::CloseTab => {
                if let Some(closed) = self.main.close_active() {
                    let cid = closed.cid();
                    // A stale tab's cid still belongs to the newer page
                    if self.main.get(cid).is_none()
                        && let Err(e) = self.session.protocol.do_end_conversation(cid)
                    {
                        warn!("Ending conversation {} failed: {}", cid, e);
                    }
                    self.status_message = format!("Closed {}", closed.tab_label().text());
                }
            }
            _ => {
                if let Some(MainEvent::Submit { page, cid, text }) = self.main.handle_event(event) {
                    self.status_message.clear();
                    if let Err(e) = self.main.send_from(&mut self.session, page, &cid, &text) {
                        self.status_message = format!("Send failed: {e}");
                    }
                }
            }
        }
        true
    }

    /// Apply everything the protocol queued. Returns whether anything arrived.
    pub fn drain_protocol_events(&mut self, rx: &mpsc::Receiver<ProtocolEvent>) -> bool {
        let mut received = false;
        for event in rx.try_iter() {
            self.main.handle_protocol_event(&self.session.contacts, event);
            received = true;
        }
        received
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut window = Window::new(&config, tx);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();
    let mut needs_redraw = true;

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &mut window.main, &window.status_message))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(POLL_TIMEOUT);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if !window.handle_tui_event(&event) {
                should_quit = true;
                break;
            }
        }
        if should_quit {
            debug!("Quit requested");
            break;
        }

        if window.drain_protocol_events(&rx) {
            needs_redraw = true;
        }
    }

    ratatui::restore();
    info!("Parley shut down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{parse_config, resolve};
    use crate::core::protocol::SendError;
    use crate::test_support::{RecordingProtocol, test_contacts};
    use crate::tui::components::Presence;

    fn config(toml: &str) -> ResolvedConfig {
        let parsed = parse_config(toml).unwrap();
        let mut resolved = resolve(&parsed, None);
        resolved.reply_delay = Duration::ZERO;
        resolved
    }

    #[test]
    fn test_startup_conversations_fill_in_from_protocol() {
        let (tx, rx) = mpsc::channel();
        let mut window = Window::new(
            &config("[[conversations]]\nmembers = [\"ana@host\"]\n"),
            tx,
        );
        assert_eq!(window.main.len(), 1);
        assert_eq!(window.main.active().unwrap().presence(), &Presence::Empty);

        assert!(window.drain_protocol_events(&rx));
        let active = window.main.active().unwrap();
        assert_eq!(active.presence(), &Presence::Single("ana@host".to_string()));
    }

    #[test]
    fn test_submit_echoes_and_peer_replies() {
        let (tx, rx) = mpsc::channel();
        let mut window = Window::new(
            &config("[[conversations]]\nmembers = [\"ana@host\"]\n"),
            tx,
        );
        window.drain_protocol_events(&rx);

        for c in "hi".chars() {
            window.handle_tui_event(&TuiEvent::InputChar(c));
        }
        window.handle_tui_event(&TuiEvent::Submit);
        window.drain_protocol_events(&rx);

        let nick = window.session.contacts.me.display_name.clone();
        let history = window.main.active().unwrap().output().text();
        assert_eq!(history, format!("{nick}: hi\nana@host: hi\n"));
    }

    #[test]
    fn test_new_and_close_tab() {
        let (tx, _rx) = mpsc::channel();
        let mut window = Window::new(&config(""), tx);
        assert!(window.main.is_empty());

        window.handle_tui_event(&TuiEvent::NewConversation);
        assert_eq!(window.main.len(), 1);
        assert_eq!(window.main.active().unwrap().tab_label().text(), "conversation");

        window.handle_tui_event(&TuiEvent::CloseTab);
        assert!(window.main.is_empty());
        assert_eq!(window.status_message, "Closed conversation");
    }

    #[test]
    fn test_close_tab_ends_conversation() {
        let (tx, rx) = mpsc::channel();
        let mut window = Window::new(
            &config("[[conversations]]\nmembers = [\"ana@host\"]\n"),
            tx,
        );
        window.drain_protocol_events(&rx);
        let cid = window.main.active().unwrap().cid().clone();

        window.handle_tui_event(&TuiEvent::CloseTab);

        assert_eq!(
            window.session.protocol.do_send_message(&cid, "x"),
            Err(SendError::UnknownConversation(cid))
        );
    }

    #[test]
    fn test_closing_stale_tab_keeps_conversation_open() {
        let (tx, _rx) = mpsc::channel();
        let mut window = Window::new(&config(""), tx);
        let protocol = RecordingProtocol::new();
        let ended = protocol.ended();
        window.session = Session::new(Box::new(protocol), test_contacts());

        let cid = Cid::from("c1");
        window.open_conversation(cid.clone(), &[]);
        window.open_conversation(cid.clone(), &[]);
        window.handle_tui_event(&TuiEvent::PrevTab);

        window.handle_tui_event(&TuiEvent::CloseTab);
        assert!(ended.borrow().is_empty());

        window.handle_tui_event(&TuiEvent::CloseTab);
        assert_eq!(ended.borrow().as_slice(), [cid]);
    }

    #[test]
    fn test_submit_on_stale_tab_echoes_there() {
        let (tx, _rx) = mpsc::channel();
        let mut window = Window::new(&config(""), tx);
        window.session = Session::new(Box::new(RecordingProtocol::new()), test_contacts());
        let cid = Cid::from("c1");
        window.open_conversation(cid.clone(), &[]);
        window.open_conversation(cid, &[]);
        window.handle_tui_event(&TuiEvent::PrevTab);

        window.handle_tui_event(&TuiEvent::InputChar('x'));
        window.handle_tui_event(&TuiEvent::Submit);

        let histories: Vec<String> =
            window.main.conversations().map(|c| c.output().text()).collect();
        assert_eq!(histories, ["Me: x\n", ""]);
    }

    #[test]
    fn test_quit_stops_loop() {
        let (tx, _rx) = mpsc::channel();
        let mut window = Window::new(&config(""), tx);
        assert!(!window.handle_tui_event(&TuiEvent::Quit));
        assert!(window.handle_tui_event(&TuiEvent::ScrollUp));
    }
}
