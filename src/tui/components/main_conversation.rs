//! # MainConversation Component
//!
//! The tab container. Owns every open [`Conversation`] and routes protocol
//! events to the one registered under the event's cid.
//!
//! ## Pages vs. registry
//!
//! Pages live in tab order in `pages`. The registry maps a cid to the page
//! that currently answers for it. Registering a cid twice points the
//! registry at the new page and leaves the older page open in the strip,
//! where it no longer receives events:
//!
//! ```text
//! pages:    [ p0:c1 ] [ p1:c2 ] [ p2:c1 ]
//! registry: c1 -> p2, c2 -> p1          (p0 is stale)
//! ```
//!
//! ## Missing cids
//!
//! A message for an unknown cid is logged and dropped. Membership and group
//! events for an unknown cid are ignored without a trace. Dispatch reports
//! which of the two happened as a [`Dispatch`].

use std::collections::HashMap;

use log::{debug, info, warn};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::config::Theme;
use crate::core::contacts::ContactDirectory;
use crate::core::message::{Message, MessageKind};
use crate::core::protocol::{Cid, ProtocolEvent, SendError};
use crate::core::session::Session;
use crate::tui::component::{Component, EventHandler, TabPage};
use crate::tui::components::conversation::{Conversation, ConversationEvent};
use crate::tui::event::TuiEvent;
use crate::tui::rich_buffer::TextFormat;

/// Widest a single tab label may get before it's ellipsized.
const MAX_TAB_LABEL_WIDTH: u16 = 20;
/// One space either side of the label.
const TAB_PADDING: u16 = 2;
const TAB_SEPARATOR: &str = "│";
const TAB_SEPARATOR_WIDTH: u16 = 1;

/// Map a message's style onto the buffer's formatting axes.
pub fn format_from_message(message: &Message) -> TextFormat {
    let style = &message.style;
    TextFormat {
        color: Some(style.color.to_string()),
        family: None,
        font: style.font.clone(),
        size: None,
        bold: style.bold,
        italic: style.italic,
        underline: style.underline,
        strike: style.strike,
    }
}

/// High-level events emitted by the tab container
#[derive(Debug, Clone, PartialEq)]
pub enum MainEvent {
    /// The user committed text on tab `page`, whose conversation is `cid`.
    /// A stale tab shares its cid with a newer one, so `page` is what
    /// identifies the sender.
    Submit { page: PageId, cid: Cid, text: String },
}

/// Identity of one open tab, stable across reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(u64);

/// What became of one protocol event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Delivered,
    /// Not for the window: a non-message kind, or membership news about a
    /// cid nobody has open
    Ignored,
    /// A message for a cid with no conversation; logged and discarded
    Dropped,
}

struct Page {
    id: PageId,
    conversation: Conversation,
}

pub struct MainConversation {
    theme: Theme,
    pages: Vec<Page>,
    registry: HashMap<Cid, PageId>,
    next_id: u64,
    active: usize,
    /// First tab shown in the strip.
    tab_offset: usize,
}

impl MainConversation {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            pages: Vec::new(),
            registry: HashMap::new(),
            next_id: 0,
            active: 0,
            tab_offset: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Open a page for `cid`, register it and make it the active tab.
    pub fn new_conversation(
        &mut self,
        contacts: &ContactDirectory,
        cid: Cid,
        members: Vec<String>,
    ) -> &mut Conversation {
        let id = PageId(self.next_id);
        self.next_id += 1;

        if self.registry.contains_key(&cid) {
            warn!("Conversation {} registered twice; previous tab no longer receives events", cid);
        }
        info!("Opening conversation {} with {} member(s)", cid, members.len());

        let conversation = Conversation::new(cid.clone(), members, contacts, &self.theme);
        self.registry.insert(cid, id);
        self.pages.push(Page { id, conversation });
        self.active = self.pages.len() - 1;

        &mut self.pages[self.active].conversation
    }

    /// Unregister `cid` and close its page.
    pub fn remove_conversation(&mut self, cid: &Cid) -> Option<Conversation> {
        let id = self.registry.remove(cid)?;
        let index = self.position(id)?;
        info!("Closing conversation {}", cid);
        Some(self.remove_page(index))
    }

    /// Close the active tab. A stale page is closed without touching the
    /// registry entry that replaced it.
    pub fn close_active(&mut self) -> Option<Conversation> {
        let page = self.pages.get(self.active)?;
        let cid = page.conversation.cid().clone();
        if self.registry.get(&cid) == Some(&page.id) {
            return self.remove_conversation(&cid);
        }
        debug!("Closing stale tab for {}", cid);
        Some(self.remove_page(self.active))
    }

    pub fn get(&self, cid: &Cid) -> Option<&Conversation> {
        let index = self.position(*self.registry.get(cid)?)?;
        Some(&self.pages[index].conversation)
    }

    pub fn get_mut(&mut self, cid: &Cid) -> Option<&mut Conversation> {
        let index = self.position(*self.registry.get(cid)?)?;
        Some(&mut self.pages[index].conversation)
    }

    /// Conversations in tab order, stale pages included.
    pub fn conversations(&self) -> impl Iterator<Item = &Conversation> {
        self.pages.iter().map(|p| &p.conversation)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.pages.get(self.active).map(|p| &p.conversation)
    }

    pub fn active_mut(&mut self) -> Option<&mut Conversation> {
        self.pages.get_mut(self.active).map(|p| &mut p.conversation)
    }

    pub fn next_tab(&mut self) {
        if self.active + 1 < self.pages.len() {
            self.active += 1;
        }
    }

    pub fn prev_tab(&mut self) {
        self.active = self.active.saturating_sub(1);
    }

    /// Swap the active tab with its left neighbour.
    pub fn move_active_left(&mut self) {
        if self.active > 0 {
            self.pages.swap(self.active, self.active - 1);
            self.active -= 1;
        }
    }

    /// Swap the active tab with its right neighbour.
    pub fn move_active_right(&mut self) {
        if self.active + 1 < self.pages.len() {
            self.pages.swap(self.active, self.active + 1);
            self.active += 1;
        }
    }

    /// Send `text` from the conversation registered as `cid`.
    pub fn send(&mut self, session: &mut Session, cid: &Cid, text: &str) -> Result<(), SendError> {
        let conversation = self
            .get_mut(cid)
            .ok_or_else(|| SendError::UnknownConversation(cid.clone()))?;
        conversation.on_send_message(session, text)
    }

    /// Send `text` from the tab it was typed in. Unlike [`Self::send`] this
    /// reaches stale tabs too, so the echo lands where the user typed.
    pub fn send_from(
        &mut self,
        session: &mut Session,
        page: PageId,
        cid: &Cid,
        text: &str,
    ) -> Result<(), SendError> {
        let index = self
            .position(page)
            .ok_or_else(|| SendError::UnknownConversation(cid.clone()))?;
        self.pages[index].conversation.on_send_message(session, text)
    }

    /// Route a protocol event to its conversation.
    pub fn handle_protocol_event(
        &mut self,
        contacts: &ContactDirectory,
        event: ProtocolEvent,
    ) -> Dispatch {
        debug!("Dispatching {} for {}", event.kind().name(), event.cid());
        match event {
            ProtocolEvent::Message {
                cid,
                account,
                message,
            } => self.on_message(contacts, &cid, &account, &message),
            ProtocolEvent::ContactJoined { cid, account } => {
                self.deliver(&cid, |c| c.on_contact_joined(contacts, &account))
            }
            ProtocolEvent::ContactLeft { cid, account } => {
                self.deliver(&cid, |c| c.on_contact_left(contacts, &account))
            }
            ProtocolEvent::GroupStarted { cid } => self.deliver(&cid, |c| c.on_group_started()),
            ProtocolEvent::GroupEnded { cid } => {
                self.deliver(&cid, |c| c.on_group_ended(contacts))
            }
        }
    }

    fn deliver(&mut self, cid: &Cid, apply: impl FnOnce(&mut Conversation)) -> Dispatch {
        match self.get_mut(cid) {
            Some(conversation) => {
                apply(conversation);
                Dispatch::Delivered
            }
            None => Dispatch::Ignored,
        }
    }

    /// Write a received message into its conversation's history.
    pub fn on_message(
        &mut self,
        contacts: &ContactDirectory,
        cid: &Cid,
        account: &str,
        message: &Message,
    ) -> Dispatch {
        let Some(conversation) = self.get_mut(cid) else {
            warn!("No conversation for {}; dropping message from {}", cid, account);
            return Dispatch::Dropped;
        };
        if message.kind != MessageKind::Message {
            return Dispatch::Ignored;
        }

        let label = contacts.display_name(account);
        let output = conversation.output_mut();
        output.put_text(&format!("{label}: "), &TextFormat::bold());
        output.put_text(&format!("{}\n", message.body), &format_from_message(message));
        Dispatch::Delivered
    }

    fn position(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    fn remove_page(&mut self, index: usize) -> Conversation {
        let page = self.pages.remove(index);
        if self.active > index || self.active >= self.pages.len() {
            self.active = self.active.saturating_sub(1);
        }
        self.tab_offset = self.tab_offset.min(self.active);
        page.conversation
    }

    fn tab_width(&self, index: usize) -> u16 {
        let label = self.pages[index].conversation.tab_label().ellipsized(MAX_TAB_LABEL_WIDTH);
        label.width() as u16 + TAB_PADDING + TAB_SEPARATOR_WIDTH
    }

    /// Scroll the strip so the active tab fits in `width` columns.
    fn scroll_tabs(&mut self, width: u16) {
        if self.active < self.tab_offset {
            self.tab_offset = self.active;
            return;
        }
        loop {
            let used: u16 = (self.tab_offset..=self.active)
                .map(|i| self.tab_width(i))
                .sum();
            if used <= width || self.tab_offset == self.active {
                return;
            }
            self.tab_offset += 1;
        }
    }

    fn render_tabs(&mut self, frame: &mut Frame, area: Rect) {
        self.scroll_tabs(area.width);

        let mut spans = Vec::new();
        if self.tab_offset > 0 {
            spans.push(Span::styled("‹", Style::default().add_modifier(Modifier::DIM)));
        }
        for (index, page) in self.pages.iter().enumerate().skip(self.tab_offset) {
            let label = page.conversation.tab_label().ellipsized(MAX_TAB_LABEL_WIDTH);
            let style = if index == self.active {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            spans.push(Span::styled(" ", style));
            spans.extend(label.spans.into_iter().map(|s| s.patch_style(style)));
            spans.push(Span::styled(" ", style));
            spans.push(Span::raw(TAB_SEPARATOR));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    #[cfg(test)]
    fn tab_offset(&self) -> usize {
        self.tab_offset
    }
}

impl Component for MainConversation {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [tabs_area, page_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

        self.render_tabs(frame, tabs_area);
        if let Some(conversation) = self.active_mut() {
            conversation.render(frame, page_area);
        }
    }
}

impl EventHandler for MainConversation {
    type Event = MainEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::NextTab => self.next_tab(),
            TuiEvent::PrevTab => self.prev_tab(),
            TuiEvent::MoveTabLeft => self.move_active_left(),
            TuiEvent::MoveTabRight => self.move_active_right(),
            _ => {
                let page = self.pages.get_mut(self.active)?;
                let ConversationEvent::Submit(text) = page.conversation.handle_event(event)?;
                return Some(MainEvent::Submit {
                    page: page.id,
                    cid: page.conversation.cid().clone(),
                    text,
                });
            }
        }
        None
    }
}
