//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::core::config::Theme;
use crate::core::contacts::{Contact, ContactDirectory};
use crate::core::protocol::{Cid, Protocol, SendError};

/// Sent messages, shared between the protocol and the test.
pub type SentLog = Rc<RefCell<Vec<(Cid, String)>>>;

/// A protocol that records sends and closes instead of delivering them.
pub struct RecordingProtocol {
    sent: SentLog,
    ended: Rc<RefCell<Vec<Cid>>>,
    fail_with: Option<SendError>,
}

impl RecordingProtocol {
    pub fn new() -> Self {
        Self {
            sent: Rc::default(),
            ended: Rc::default(),
            fail_with: None,
        }
    }

    /// Every send fails with `SendError::Rejected("offline")`.
    pub fn failing() -> Self {
        Self {
            sent: Rc::default(),
            ended: Rc::default(),
            fail_with: Some(SendError::Rejected("offline".to_string())),
        }
    }

    pub fn sent(&self) -> SentLog {
        Rc::clone(&self.sent)
    }

    /// Conversations ended so far, shared with the test.
    pub fn ended(&self) -> Rc<RefCell<Vec<Cid>>> {
        Rc::clone(&self.ended)
    }
}

impl Protocol for RecordingProtocol {
    fn name(&self) -> &str {
        "recording"
    }

    fn do_start_conversation(&mut self, _cid: &Cid, _accounts: &[String]) -> Result<(), SendError> {
        Ok(())
    }

    fn do_send_message(&mut self, cid: &Cid, text: &str) -> Result<(), SendError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.sent.borrow_mut().push((cid.clone(), text.to_string()));
        Ok(())
    }

    fn do_end_conversation(&mut self, cid: &Cid) -> Result<(), SendError> {
        self.ended.borrow_mut().push(cid.clone());
        Ok(())
    }
}

/// `me` plus two known contacts: ana (with a status message) and bob.
pub fn test_contacts() -> ContactDirectory {
    ContactDirectory::with_contacts(
        Contact::new("me@host", "Me", "hacking"),
        [
            Contact::new("ana@host", "Ana", "out for <lunch>"),
            Contact::new("bob@host", "Bob", ""),
        ],
    )
}

/// A theme pointing at files that don't exist, so every icon is a placeholder.
pub fn test_theme() -> Theme {
    Theme::in_dir(Path::new("/nonexistent/parley-theme"))
}
