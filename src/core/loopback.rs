//! # Loopback Protocol
//!
//! A local stand-in for a real messaging backend. Every conversation's peers
//! "answer" by echoing what was sent, after a short delay, preceded by a
//! typing notification. A few slash commands drive membership so the
//! window's single/group rendering can be exercised by hand:
//!
//! | Command            | Events emitted                                    |
//! |--------------------|---------------------------------------------------|
//! | `/invite <acct>`   | `ContactJoined` (+ `GroupStarted` at 2 peers)     |
//! | `/kick <acct>`     | `ContactLeft` (+ `GroupEnded` when back to 1)     |
//! | `/group`           | `GroupStarted`                                    |
//! | `/ungroup`         | `GroupEnded`                                      |
//!
//! Delayed replies run on the tokio runtime when one is available; without a
//! runtime (or with a zero delay) events are sent immediately.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::time::Duration;

use log::{debug, info, warn};

use crate::core::message::{Color, Message, MessageKind, Style};
use crate::core::protocol::{Cid, Protocol, ProtocolEvent, SendError};

/// Reply colors handed out to peers in join order.
const PEER_PALETTE: [Color; 4] = [
    Color::new(0x4e, 0x9a, 0x06),
    Color::new(0x34, 0x65, 0xa4),
    Color::new(0xc4, 0xa0, 0x00),
    Color::new(0x75, 0x50, 0x7b),
];

pub struct LoopbackProtocol {
    tx: Sender<ProtocolEvent>,
    reply_delay: Duration,
    peers: HashMap<Cid, Vec<String>>,
}

impl LoopbackProtocol {
    pub fn new(tx: Sender<ProtocolEvent>, reply_delay: Duration) -> Self {
        Self {
            tx,
            reply_delay,
            peers: HashMap::new(),
        }
    }

    /// Peers currently in `cid`, in join order.
    pub fn peers(&self, cid: &Cid) -> Option<&[String]> {
        self.peers.get(cid).map(Vec::as_slice)
    }

    fn emit(&self, event: ProtocolEvent) -> Result<(), SendError> {
        debug!("Loopback emitting {} for {}", event.kind().name(), event.cid());
        self.tx.send(event).map_err(|_| SendError::Disconnected)
    }

    fn invite(&mut self, cid: &Cid, account: &str) -> Result<(), SendError> {
        let peers = self.peers.entry(cid.clone()).or_default();
        if peers.iter().any(|p| p == account) {
            return Ok(());
        }
        peers.push(account.to_string());
        let became_group = peers.len() == 2;

        self.emit(ProtocolEvent::ContactJoined {
            cid: cid.clone(),
            account: account.to_string(),
        })?;
        if became_group {
            self.emit(ProtocolEvent::GroupStarted { cid: cid.clone() })?;
        }
        Ok(())
    }

    fn kick(&mut self, cid: &Cid, account: &str) -> Result<(), SendError> {
        let Some(peers) = self.peers.get_mut(cid) else {
            return Err(SendError::UnknownConversation(cid.clone()));
        };
        let Some(index) = peers.iter().position(|p| p == account) else {
            return Ok(());
        };
        peers.remove(index);
        let left_group = peers.len() == 1;

        self.emit(ProtocolEvent::ContactLeft {
            cid: cid.clone(),
            account: account.to_string(),
        })?;
        if left_group {
            self.emit(ProtocolEvent::GroupEnded { cid: cid.clone() })?;
        }
        Ok(())
    }

    /// Each peer sends a typing notification followed by the echoed text.
    fn echo(&self, cid: &Cid, text: &str) -> Result<(), SendError> {
        let Some(peers) = self.peers.get(cid) else {
            return Err(SendError::UnknownConversation(cid.clone()));
        };

        let mut events = Vec::with_capacity(peers.len() * 2);
        for (index, peer) in peers.iter().enumerate() {
            let style = Style {
                color: PEER_PALETTE[index % PEER_PALETTE.len()],
                ..Style::default()
            };
            events.push(ProtocolEvent::Message {
                cid: cid.clone(),
                account: peer.clone(),
                message: Message::text("").with_kind(MessageKind::Typing),
            });
            events.push(ProtocolEvent::Message {
                cid: cid.clone(),
                account: peer.clone(),
                message: Message::text(text).with_style(style),
            });
        }

        let runtime = tokio::runtime::Handle::try_current().ok();
        match runtime {
            Some(handle) if !self.reply_delay.is_zero() => {
                let tx = self.tx.clone();
                let delay = self.reply_delay;
                handle.spawn(async move {
                    for event in events {
                        let is_reply = matches!(
                            &event,
                            ProtocolEvent::Message { message, .. }
                                if message.kind == MessageKind::Message
                        );
                        if is_reply {
                            tokio::time::sleep(delay).await;
                        }
                        if tx.send(event).is_err() {
                            warn!("Loopback reply dropped: receiver gone");
                            return;
                        }
                    }
                });
            }
            _ => {
                for event in events {
                    self.emit(event)?;
                }
            }
        }
        Ok(())
    }
}

impl Protocol for LoopbackProtocol {
    fn name(&self) -> &str {
        "loopback"
    }

    fn do_start_conversation(&mut self, cid: &Cid, accounts: &[String]) -> Result<(), SendError> {
        info!("Loopback opening {} with {} peer(s)", cid, accounts.len());
        self.peers.entry(cid.clone()).or_default();
        for account in accounts {
            self.invite(cid, account)?;
        }
        Ok(())
    }

    fn do_send_message(&mut self, cid: &Cid, text: &str) -> Result<(), SendError> {
        if !self.peers.contains_key(cid) {
            return Err(SendError::UnknownConversation(cid.clone()));
        }

        let mut words = text.split_whitespace();
        match (words.next(), words.next()) {
            (Some("/invite"), Some(account)) => self.invite(cid, account),
            (Some("/kick"), Some(account)) => self.kick(cid, account),
            (Some("/group"), None) => self.emit(ProtocolEvent::GroupStarted { cid: cid.clone() }),
            (Some("/ungroup"), None) => self.emit(ProtocolEvent::GroupEnded { cid: cid.clone() }),
            _ => self.echo(cid, text),
        }
    }

    fn do_end_conversation(&mut self, cid: &Cid) -> Result<(), SendError> {
        let peers = self
            .peers
            .remove(cid)
            .ok_or_else(|| SendError::UnknownConversation(cid.clone()))?;
        info!("Loopback closed {} ({} peer(s))", cid, peers.len());
        Ok(())
    }
}
