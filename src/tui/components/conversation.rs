//! # Conversation Component
//!
//! One tab page: header, history, input box and avatar panel.
//!
//! ```text
//! ┌ Header ──────────────────────────────────────────────┐
//! ├ OutputText ───────────────────────────┬ ContactInfo ─┤
//! │                                       │   (peer)     │
//! ├─ divider (SplitPanel) ────────────────┤              │
//! │ InputText                             │   (me)       │
//! └───────────────────────────────────────┴──────────────┘
//! ```
//!
//! ## Membership
//!
//! `members` lists the peers (never the local user) in join order. What the
//! header and tab label show follows its size:
//!
//! | members | [`Presence`] | header                       | tab label    |
//! |---------|--------------|------------------------------|--------------|
//! | 0       | `Empty`      | placeholder identity         | unchanged    |
//! | 1       | `Single`     | peer name / status message   | peer name    |
//! | ≥ 2     | `Group`      | "group chat" / "N members"   | "group chat" |
//!
//! N counts the local user too, so it is `members.len() + 1`. The protocol
//! can force group rendering with `on_group_started` even for one peer.
//!
//! ## Sending
//!
//! `on_send_message` hands the text to the session, then echoes it into the
//! history under the local nickname whether or not the send succeeded. The
//! send result is returned afterwards for the caller to report.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::config::Theme;
use crate::core::contacts::ContactDirectory;
use crate::core::protocol::{Cid, SendError};
use crate::core::session::Session;
use crate::tui::component::{Component, EventHandler, Packable, TabPage};
use crate::tui::components::contact_info::ContactInfo;
use crate::tui::components::header::{Header, information_markup};
use crate::tui::components::input_text::{InputEvent, InputText};
use crate::tui::components::output_text::OutputText;
use crate::tui::components::tab_label::TabLabel;
use crate::tui::event::TuiEvent;
use crate::tui::images;
use crate::tui::markup;
use crate::tui::rich_buffer::TextFormat;

/// Shown until the first peer joins.
pub const PLACEHOLDER_TITLE: &str = "account@host.com";
pub const PLACEHOLDER_SUBTITLE: &str = "this is my personal message";
pub const GROUP_TITLE: &str = "group chat";
/// Tab label before any membership is known.
pub const DEFAULT_TAB_LABEL: &str = "conversation";

/// Smallest input box, borders included.
const MIN_INPUT_HEIGHT: u16 = 3;
/// Smallest history pane, borders included.
const MIN_OUTPUT_HEIGHT: u16 = 3;

/// What the header currently describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Empty,
    Single(String),
    Group,
}

/// High-level events emitted by the Conversation
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationEvent {
    /// The user committed text in the input box
    Submit(String),
}

/// Vertical split between history (top) and input (bottom).
///
/// `position` is the height of the top pane. It is unset until the first
/// render with a real area, when it is derived from that area and then
/// nudged down by half of itself, once.
#[derive(Debug, Clone, Default)]
struct SplitPanel {
    position: Option<u16>,
    first_show_done: bool,
}

impl SplitPanel {
    fn initial_position(height: u16) -> u16 {
        height / 2
    }

    /// Split `area`, resolving the position on first show.
    fn split(&mut self, area: Rect) -> (Rect, Rect) {
        if !self.first_show_done && area.height > 0 {
            let position = self
                .position
                .unwrap_or_else(|| Self::initial_position(area.height));
            self.position = Some(position + position / 2);
            self.first_show_done = true;
        }

        let top = self.clamped(area.height);
        let [top_area, bottom_area] =
            Layout::vertical([Constraint::Length(top), Constraint::Min(0)]).areas(area);
        (top_area, bottom_area)
    }

    fn clamped(&self, height: u16) -> u16 {
        let position = self
            .position
            .unwrap_or_else(|| Self::initial_position(height));
        let max = height.saturating_sub(MIN_INPUT_HEIGHT);
        position.min(max).max(MIN_OUTPUT_HEIGHT.min(max))
    }

    fn move_by(&mut self, delta: i16) {
        if let Some(position) = self.position {
            self.position = Some(position.saturating_add_signed(delta));
        }
    }
}

pub struct Conversation {
    cid: Cid,
    members: Vec<String>,
    presence: Presence,
    theme: Theme,
    header: Header,
    output: OutputText,
    input: InputText,
    info: ContactInfo,
    tab_label: TabLabel,
    panel: SplitPanel,
}

impl Conversation {
    pub fn new(cid: Cid, members: Vec<String>, contacts: &ContactDirectory, theme: &Theme) -> Self {
        let mut conversation = Self {
            cid,
            members,
            presence: Presence::Empty,
            theme: theme.clone(),
            header: Header::new(),
            output: OutputText::new(),
            input: InputText::new(),
            info: ContactInfo::new(),
            tab_label: TabLabel::new(DEFAULT_TAB_LABEL),
            panel: SplitPanel::default(),
        };

        match conversation.members.len() {
            0 => conversation.set_placeholder_data(),
            1 => {
                let account = conversation.members[0].clone();
                conversation.set_data(contacts, &account);
            }
            _ => conversation.set_group_data(),
        }
        // The user icon wins on a fresh page, whatever the membership
        conversation.header.set_image(&theme.user);
        conversation.info.set_first(images::load(&theme.logo));
        conversation.info.set_last(images::load(&theme.logo));
        conversation
    }

    pub fn cid(&self) -> &Cid {
        &self.cid
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn output(&self) -> &OutputText {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut OutputText {
        &mut self.output
    }

    pub fn input(&self) -> &InputText {
        &self.input
    }

    pub fn info(&self) -> &ContactInfo {
        &self.info
    }

    /// Height of the history pane, once the page has been shown.
    pub fn divider_position(&self) -> Option<u16> {
        self.panel.position
    }

    /// A peer joined. Joining twice is a no-op.
    pub fn on_contact_joined(&mut self, contacts: &ContactDirectory, account: &str) {
        if self.members.iter().any(|m| m == account) {
            return;
        }
        self.members.push(account.to_string());
        self.render_membership(contacts);
    }

    /// A peer left. Leaving when absent is a no-op.
    pub fn on_contact_left(&mut self, contacts: &ContactDirectory, account: &str) {
        let Some(index) = self.members.iter().position(|m| m == account) else {
            return;
        };
        self.members.remove(index);
        self.render_membership(contacts);
    }

    /// Show group rendering regardless of how many peers there are.
    pub fn on_group_started(&mut self) {
        self.set_group_data();
    }

    /// Back to the single-user icon; with exactly one peer left, show them.
    pub fn on_group_ended(&mut self, contacts: &ContactDirectory) {
        self.header.set_image(&self.theme.user);
        if let [account] = self.members.as_slice() {
            let account = account.clone();
            self.set_data(contacts, &account);
        }
    }

    /// Send `text` through the session and echo it locally.
    pub fn on_send_message(&mut self, session: &mut Session, text: &str) -> Result<(), SendError> {
        let result = session.send(&self.cid, text);

        let nick = &session.contacts.me.display_name;
        self.output.put_text(&format!("{nick}: "), &TextFormat::bold());
        self.output.put_text(&format!("{text}\n"), &TextFormat::default());
        result
    }

    fn render_membership(&mut self, contacts: &ContactDirectory) {
        match self.members.as_slice() {
            [] => self.set_placeholder_data(),
            [account] => {
                let account = account.clone();
                self.set_data(contacts, &account);
            }
            _ => self.set_group_data(),
        }
    }

    fn set_placeholder_data(&mut self) {
        self.header
            .set_information(information_markup(PLACEHOLDER_TITLE, PLACEHOLDER_SUBTITLE));
        self.header.set_image(&self.theme.user);
        self.presence = Presence::Empty;
    }

    /// Header and tab label describe `account`.
    fn set_data(&mut self, contacts: &ContactDirectory, account: &str) {
        let (nick, message) = match contacts.get(account) {
            Some(contact) => (
                markup::escape(&contact.display_name),
                markup::escape(&contact.message),
            ),
            None => (markup::escape(account), String::new()),
        };

        self.header.set_information(information_markup(&nick, &message));
        self.tab_label.set_markup(nick);
        self.presence = Presence::Single(account.to_string());
    }

    /// Header and tab label describe a group chat.
    fn set_group_data(&mut self) {
        self.header.set_image(&self.theme.users);
        let count = format!("{} members", self.members.len() + 1);
        self.header.set_information(information_markup(GROUP_TITLE, &count));
        self.tab_label.set_text(GROUP_TITLE);
        self.presence = Presence::Group;
    }
}

impl Component for Conversation {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [header_area, body_area] = Layout::vertical([
            Constraint::Length(self.header.required_height()),
            Constraint::Min(0),
        ])
        .areas(area);
        self.header.render(frame, header_area);

        let info_width = self.info.natural_size().width;
        let [panel_area, info_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(info_width)])
                .areas(body_area);

        let (output_area, input_area) = self.panel.split(panel_area);
        self.output.render(frame, output_area);
        self.input.render(frame, input_area);
        self.info.render(frame, info_area);
    }
}

impl TabPage for Conversation {
    fn tab_label(&self) -> &TabLabel {
        &self.tab_label
    }
}

impl EventHandler for Conversation {
    type Event = ConversationEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp
            | TuiEvent::ScrollDown
            | TuiEvent::ScrollPageUp
            | TuiEvent::ScrollPageDown
            | TuiEvent::ScrollToBottom => {
                self.output.handle_event(event);
                None
            }
            TuiEvent::GrowOutput => {
                self.panel.move_by(1);
                None
            }
            TuiEvent::ShrinkOutput => {
                self.panel.move_by(-1);
                None
            }
            _ => match self.input.handle_event(event)? {
                InputEvent::Submit(text) => Some(ConversationEvent::Submit(text)),
                InputEvent::ContentChanged => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingProtocol, test_contacts, test_theme};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn conversation(members: &[&str]) -> Conversation {
        Conversation::new(
            Cid::from("c1"),
            members.iter().map(|m| m.to_string()).collect(),
            &test_contacts(),
            &test_theme(),
        )
    }

    /// A theme directory holding one-word icons, so tests can tell them apart.
    fn word_theme(name: &str) -> Theme {
        let dir = std::env::temp_dir().join(format!("parley-theme-{}-{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        let theme = Theme::in_dir(&dir);
        std::fs::write(&theme.user, "USER\n").unwrap();
        std::fs::write(&theme.users, "USERS\n").unwrap();
        std::fs::write(&theme.logo, "LOGO\n").unwrap();
        theme
    }

    fn header_text(conv: &Conversation) -> String {
        markup::plain_text(conv.header().information())
    }

    #[test]
    fn test_new_empty_shows_placeholder() {
        let conv = conversation(&[]);
        assert_eq!(conv.presence(), &Presence::Empty);
        assert_eq!(
            header_text(&conv),
            format!("{PLACEHOLDER_TITLE}\n{PLACEHOLDER_SUBTITLE}")
        );
        assert_eq!(conv.tab_label().text(), DEFAULT_TAB_LABEL);
        assert!(conv.info().first().is_some());
        assert!(conv.info().last().is_some());
    }

    #[test]
    fn test_new_with_members_renders_state() {
        let single = conversation(&["ana@host"]);
        assert_eq!(single.presence(), &Presence::Single("ana@host".to_string()));

        let group = conversation(&["ana@host", "bob@host"]);
        assert_eq!(group.presence(), &Presence::Group);
        assert_eq!(header_text(&group), "group chat\n3 members");
    }

    #[test]
    fn test_join_from_empty_is_single() {
        let contacts = test_contacts();
        let mut conv = conversation(&[]);
        conv.on_contact_joined(&contacts, "ana@host");

        assert_eq!(conv.presence(), &Presence::Single("ana@host".to_string()));
        assert_eq!(header_text(&conv), "Ana\nout for <lunch>");
        assert_eq!(conv.tab_label().text(), "Ana");
    }

    #[test]
    fn test_join_unknown_contact_uses_account() {
        let contacts = test_contacts();
        let mut conv = conversation(&[]);
        conv.on_contact_joined(&contacts, "zed@host");

        assert_eq!(header_text(&conv), "zed@host\n");
        assert_eq!(conv.tab_label().text(), "zed@host");
    }

    #[test]
    fn test_second_join_is_group_counting_self() {
        let contacts = test_contacts();
        let mut conv = conversation(&["ana@host"]);
        conv.on_contact_joined(&contacts, "bob@host");

        assert_eq!(conv.presence(), &Presence::Group);
        assert_eq!(header_text(&conv), "group chat\n3 members");
        assert_eq!(conv.tab_label().text(), "group chat");
    }

    #[test]
    fn test_join_is_idempotent() {
        let contacts = test_contacts();
        let mut conv = conversation(&["ana@host"]);
        conv.on_contact_joined(&contacts, "ana@host");
        assert_eq!(conv.members(), ["ana@host"]);
        assert_eq!(conv.presence(), &Presence::Single("ana@host".to_string()));
    }

    #[test]
    fn test_leave_last_member_is_empty() {
        let contacts = test_contacts();
        let mut conv = conversation(&["ana@host"]);
        conv.on_contact_left(&contacts, "ana@host");

        assert!(conv.members().is_empty());
        assert_eq!(conv.presence(), &Presence::Empty);
        assert!(header_text(&conv).starts_with(PLACEHOLDER_TITLE));
    }

    #[test]
    fn test_new_group_page_shows_user_icon() {
        let theme = word_theme("new-group");
        let conv = Conversation::new(
            Cid::from("c1"),
            vec!["ana@host".to_string(), "bob@host".to_string()],
            &test_contacts(),
            &theme,
        );
        assert_eq!(conv.presence(), &Presence::Group);
        assert_eq!(conv.header().image().lines(), ["USER"]);

        // Later membership changes still swap the icon
        let mut conv = conv;
        conv.on_contact_joined(&test_contacts(), "cy@host");
        assert_eq!(conv.header().image().lines(), ["USERS"]);
    }

    #[test]
    fn test_leave_absent_member_is_noop() {
        let contacts = test_contacts();
        let mut conv = conversation(&["ana@host"]);
        let before = conv.header().information().to_string();
        conv.on_contact_left(&contacts, "bob@host");

        assert_eq!(conv.members(), ["ana@host"]);
        assert_eq!(conv.header().information(), before);
    }

    #[test]
    fn test_leave_group_back_to_single() {
        let contacts = test_contacts();
        let mut conv = conversation(&["ana@host", "bob@host"]);
        conv.on_contact_left(&contacts, "ana@host");
        assert_eq!(conv.presence(), &Presence::Single("bob@host".to_string()));
        assert_eq!(conv.tab_label().text(), "Bob");
    }

    #[test]
    fn test_group_started_forces_group_with_one_member() {
        let mut conv = conversation(&["ana@host"]);
        conv.on_group_started();
        assert_eq!(conv.presence(), &Presence::Group);
        assert_eq!(header_text(&conv), "group chat\n2 members");
    }

    #[test]
    fn test_group_ended_with_one_member_is_single() {
        let contacts = test_contacts();
        let mut conv = conversation(&["ana@host"]);
        conv.on_group_started();
        conv.on_group_ended(&contacts);
        assert_eq!(conv.presence(), &Presence::Single("ana@host".to_string()));
        assert_eq!(header_text(&conv), "Ana\nout for <lunch>");
    }

    #[test]
    fn test_group_ended_with_many_members_keeps_group_text() {
        let contacts = test_contacts();
        let mut conv = conversation(&["ana@host", "bob@host"]);
        conv.on_group_ended(&contacts);
        assert_eq!(conv.presence(), &Presence::Group);
        assert_eq!(header_text(&conv), "group chat\n3 members");
    }

    #[test]
    fn test_send_echoes_under_local_nick() {
        let protocol = RecordingProtocol::new();
        let sent = protocol.sent();
        let mut session = Session::new(Box::new(protocol), test_contacts());
        let mut conv = conversation(&["ana@host"]);

        conv.on_send_message(&mut session, "hello").unwrap();

        assert_eq!(sent.borrow().as_slice(), [(Cid::from("c1"), "hello".to_string())]);
        assert_eq!(conv.output().text(), "Me: hello\n");
    }

    #[test]
    fn test_send_failure_still_echoes_and_reports() {
        let mut session = Session::new(Box::new(RecordingProtocol::failing()), test_contacts());
        let mut conv = conversation(&["ana@host"]);

        let result = conv.on_send_message(&mut session, "hello");

        assert!(result.is_err());
        assert_eq!(conv.output().text(), "Me: hello\n");
    }

    #[test]
    fn test_enter_emits_submit_and_clears_input() {
        let mut conv = conversation(&["ana@host"]);
        for c in "hello".chars() {
            assert_eq!(conv.handle_event(&TuiEvent::InputChar(c)), None);
        }
        assert_eq!(
            conv.handle_event(&TuiEvent::Submit),
            Some(ConversationEvent::Submit("hello".to_string()))
        );
        assert_eq!(conv.input().text(), "");
    }

    #[test]
    fn test_first_show_nudges_divider_once() {
        let backend = TestBackend::new(60, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut conv = conversation(&["ana@host"]);
        assert_eq!(conv.divider_position(), None);

        terminal.draw(|f| conv.render(f, f.area())).unwrap();
        // Header takes 3 rows (placeholder icon); 21 left, initial 10, nudged to 15
        assert_eq!(conv.divider_position(), Some(15));

        terminal.draw(|f| conv.render(f, f.area())).unwrap();
        assert_eq!(conv.divider_position(), Some(15));
    }

    #[test]
    fn test_divider_moves_after_first_show() {
        let backend = TestBackend::new(60, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut conv = conversation(&["ana@host"]);

        // Before first show there is nothing to move
        conv.handle_event(&TuiEvent::GrowOutput);
        assert_eq!(conv.divider_position(), None);

        terminal.draw(|f| conv.render(f, f.area())).unwrap();
        conv.handle_event(&TuiEvent::ShrinkOutput);
        assert_eq!(conv.divider_position(), Some(14));
    }

    #[test]
    fn test_render_shows_header_and_history() {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut session = Session::new(Box::new(RecordingProtocol::new()), test_contacts());
        let mut conv = conversation(&["ana@host"]);
        conv.on_send_message(&mut session, "hi ana").unwrap();

        terminal.draw(|f| conv.render(f, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Ana"));
        assert!(text.contains("Me: hi ana"));
    }
}
