//! # Session
//!
//! The collaborator the conversation window is handed: a protocol to send
//! through and a contacts directory to resolve names from. Incoming events
//! arrive separately on the receiver returned alongside the session.

use crate::core::contacts::ContactDirectory;
use crate::core::protocol::{Cid, Protocol, SendError};

pub struct Session {
    pub protocol: Box<dyn Protocol>,
    pub contacts: ContactDirectory,
}

impl Session {
    pub fn new(protocol: Box<dyn Protocol>, contacts: ContactDirectory) -> Self {
        Self { protocol, contacts }
    }

    /// Forward to [`Protocol::do_send_message`], logging failures.
    pub fn send(&mut self, cid: &Cid, text: &str) -> Result<(), SendError> {
        log::debug!(
            "Sending {} bytes to {} via {}",
            text.len(),
            cid,
            self.protocol.name()
        );
        self.protocol.do_send_message(cid, text).inspect_err(|e| {
            log::warn!("Send to {} failed: {}", cid, e);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingProtocol, test_contacts};

    #[test]
    fn test_send_forwards_to_protocol() {
        let protocol = RecordingProtocol::new();
        let sent = protocol.sent();
        let mut session = Session::new(Box::new(protocol), test_contacts());

        session.send(&Cid::from("c1"), "hi").unwrap();

        assert_eq!(sent.borrow().as_slice(), [(Cid::from("c1"), "hi".to_string())]);
    }

    #[test]
    fn test_send_propagates_failure() {
        let mut session = Session::new(Box::new(RecordingProtocol::failing()), test_contacts());
        let err = session.send(&Cid::from("c1"), "hi").unwrap_err();
        assert_eq!(err, SendError::Rejected("offline".to_string()));
    }
}
