//! # Protocol Boundary
//!
//! The conversation window talks to the messaging layer through two things:
//!
//! - [`ProtocolEvent`]: conversation events flowing in (delivered over a
//!   channel and drained on the UI thread, in order).
//! - [`Protocol`]: operations flowing out, `do_start_conversation` and
//!   `do_send_message`.
//!
//! ```text
//!   protocol ──ProtocolEvent──▶ mpsc ──▶ MainConversation::handle_protocol_event
//!   InputText ──Submit──▶ Conversation ──do_send_message──▶ protocol
//! ```

use std::fmt;

use crate::core::message::Message;

/// Opaque conversation identifier supplied by the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid(String);

impl Cid {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random id, for conversations started locally.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cid {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Named conversation events the window subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Message,
    ContactJoined,
    ContactLeft,
    GroupStarted,
    GroupEnded,
}

impl EventKind {
    /// Every event the conversation window handles.
    pub const ALL: [EventKind; 5] = [
        EventKind::Message,
        EventKind::ContactJoined,
        EventKind::ContactLeft,
        EventKind::GroupStarted,
        EventKind::GroupEnded,
    ];

    /// Wire name of the event.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Message => "conv-message",
            EventKind::ContactJoined => "conv-contact-joined",
            EventKind::ContactLeft => "conv-contact-left",
            EventKind::GroupStarted => "conv-group-started",
            EventKind::GroupEnded => "conv-group-ended",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolEvent {
    Message {
        cid: Cid,
        account: String,
        message: Message,
    },
    ContactJoined {
        cid: Cid,
        account: String,
    },
    ContactLeft {
        cid: Cid,
        account: String,
    },
    GroupStarted {
        cid: Cid,
    },
    GroupEnded {
        cid: Cid,
    },
}

impl ProtocolEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ProtocolEvent::Message { .. } => EventKind::Message,
            ProtocolEvent::ContactJoined { .. } => EventKind::ContactJoined,
            ProtocolEvent::ContactLeft { .. } => EventKind::ContactLeft,
            ProtocolEvent::GroupStarted { .. } => EventKind::GroupStarted,
            ProtocolEvent::GroupEnded { .. } => EventKind::GroupEnded,
        }
    }

    pub fn cid(&self) -> &Cid {
        match self {
            ProtocolEvent::Message { cid, .. }
            | ProtocolEvent::ContactJoined { cid, .. }
            | ProtocolEvent::ContactLeft { cid, .. }
            | ProtocolEvent::GroupStarted { cid }
            | ProtocolEvent::GroupEnded { cid } => cid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The protocol has no conversation with this id.
    UnknownConversation(Cid),
    /// The event channel back to the UI has been dropped.
    Disconnected,
    /// Transport-specific failure.
    Rejected(String),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::UnknownConversation(cid) => write!(f, "unknown conversation {cid}"),
            SendError::Disconnected => write!(f, "protocol disconnected"),
            SendError::Rejected(reason) => write!(f, "message rejected: {reason}"),
        }
    }
}

impl std::error::Error for SendError {}

/// Outgoing side of the messaging layer.
pub trait Protocol {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Open conversation `cid` with `accounts`. Membership arrives back as
    /// `ContactJoined` events.
    fn do_start_conversation(&mut self, cid: &Cid, accounts: &[String]) -> Result<(), SendError>;

    /// Send `text` to conversation `cid`.
    fn do_send_message(&mut self, cid: &Cid, text: &str) -> Result<(), SendError>;

    /// Forget conversation `cid`. Later sends to it fail with
    /// [`SendError::UnknownConversation`].
    fn do_end_conversation(&mut self, cid: &Cid) -> Result<(), SendError>;
}
