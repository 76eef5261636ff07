use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use parley::core::config::Theme;
use parley::core::contacts::{Contact, ContactDirectory};
use parley::core::loopback::LoopbackProtocol;
use parley::core::message::{Message, MessageKind};
use parley::core::protocol::{Cid, Protocol, ProtocolEvent, SendError};
use parley::core::session::Session;
use parley::tui::component::{EventHandler, TabPage};
use parley::tui::components::{Dispatch, MainConversation, MainEvent, Presence};
use parley::tui::event::TuiEvent;

// ============================================================================
// Helper Functions
// ============================================================================

fn contacts() -> ContactDirectory {
    ContactDirectory::with_contacts(
        Contact::new("me@example.com", "Me", ""),
        [
            Contact::new("ana@example.com", "Ana", "at the <office>"),
            Contact::new("bob@example.com", "Bob", "away"),
        ],
    )
}

fn theme() -> Theme {
    Theme::in_dir(Path::new("/nonexistent/parley-theme"))
}

fn loopback_session(delay: Duration) -> (Session, mpsc::Receiver<ProtocolEvent>) {
    let (tx, rx) = mpsc::channel();
    let protocol = LoopbackProtocol::new(tx, delay);
    (Session::new(Box::new(protocol), contacts()), rx)
}

/// Open `cid` empty and let the protocol report its members.
fn open(
    main: &mut MainConversation,
    session: &mut Session,
    rx: &mpsc::Receiver<ProtocolEvent>,
    cid: &Cid,
    members: &[&str],
) {
    main.new_conversation(&session.contacts, cid.clone(), Vec::new());
    let members: Vec<String> = members.iter().map(|m| m.to_string()).collect();
    session
        .protocol
        .do_start_conversation(cid, &members)
        .unwrap();
    drain(main, session, rx);
}

fn drain(main: &mut MainConversation, session: &Session, rx: &mpsc::Receiver<ProtocolEvent>) {
    for event in rx.try_iter() {
        main.handle_protocol_event(&session.contacts, event);
    }
}

fn type_and_submit(main: &mut MainConversation, text: &str) -> (Cid, String) {
    for c in text.chars() {
        main.handle_event(&TuiEvent::InputChar(c));
    }
    match main.handle_event(&TuiEvent::Submit) {
        Some(MainEvent::Submit { cid, text, .. }) => (cid, text),
        None => panic!("Enter did not submit"),
    }
}

/// A protocol that refuses everything.
struct OfflineProtocol;

impl Protocol for OfflineProtocol {
    fn name(&self) -> &str {
        "offline"
    }

    fn do_start_conversation(&mut self, _cid: &Cid, _accounts: &[String]) -> Result<(), SendError> {
        Err(SendError::Disconnected)
    }

    fn do_send_message(&mut self, _cid: &Cid, _text: &str) -> Result<(), SendError> {
        Err(SendError::Disconnected)
    }

    fn do_end_conversation(&mut self, _cid: &Cid) -> Result<(), SendError> {
        Err(SendError::Disconnected)
    }
}

// ============================================================================
// Conversation Lifecycle
// ============================================================================

#[test]
fn test_one_on_one_chat_round_trip() {
    let (mut session, rx) = loopback_session(Duration::ZERO);
    let mut main = MainConversation::new(theme());
    let cid = Cid::from("c1");
    open(&mut main, &mut session, &rx, &cid, &["ana@example.com"]);

    let conversation = main.get(&cid).unwrap();
    assert_eq!(
        conversation.presence(),
        &Presence::Single("ana@example.com".to_string())
    );
    assert_eq!(conversation.tab_label().text(), "Ana");

    let (submitted_cid, text) = type_and_submit(&mut main, "hello");
    assert_eq!(submitted_cid, cid);
    assert_eq!(text, "hello");
    main.send(&mut session, &cid, &text).unwrap();
    drain(&mut main, &session, &rx);

    let conversation = main.get(&cid).unwrap();
    assert_eq!(conversation.output().text(), "Me: hello\nAna: hello\n");
    assert_eq!(conversation.input().text(), "");
}

#[test]
fn test_invite_and_kick_switch_between_single_and_group() {
    let (mut session, rx) = loopback_session(Duration::ZERO);
    let mut main = MainConversation::new(theme());
    let cid = Cid::from("c1");
    open(&mut main, &mut session, &rx, &cid, &["ana@example.com"]);

    main.send(&mut session, &cid, "/invite bob@example.com").unwrap();
    drain(&mut main, &session, &rx);
    let conversation = main.get(&cid).unwrap();
    assert_eq!(conversation.presence(), &Presence::Group);
    assert_eq!(conversation.tab_label().text(), "group chat");

    main.send(&mut session, &cid, "/kick ana@example.com").unwrap();
    drain(&mut main, &session, &rx);
    let conversation = main.get(&cid).unwrap();
    assert_eq!(
        conversation.presence(),
        &Presence::Single("bob@example.com".to_string())
    );
    assert_eq!(conversation.tab_label().text(), "Bob");
}

#[test]
fn test_group_replies_come_from_every_peer() {
    let (mut session, rx) = loopback_session(Duration::ZERO);
    let mut main = MainConversation::new(theme());
    let cid = Cid::from("c1");
    open(
        &mut main,
        &mut session,
        &rx,
        &cid,
        &["ana@example.com", "bob@example.com"],
    );

    main.send(&mut session, &cid, "hey all").unwrap();
    drain(&mut main, &session, &rx);

    assert_eq!(
        main.get(&cid).unwrap().output().text(),
        "Me: hey all\nAna: hey all\nBob: hey all\n"
    );
}

#[test]
fn test_events_for_closed_conversation_are_dropped() {
    let (mut session, rx) = loopback_session(Duration::ZERO);
    let mut main = MainConversation::new(theme());
    let cid = Cid::from("c1");
    open(&mut main, &mut session, &rx, &cid, &["ana@example.com"]);
    let keep = Cid::from("c2");
    open(&mut main, &mut session, &rx, &keep, &["bob@example.com"]);

    main.remove_conversation(&cid);
    let outcome = main.handle_protocol_event(
        &session.contacts,
        ProtocolEvent::Message {
            cid: cid.clone(),
            account: "ana@example.com".to_string(),
            message: Message::text("anyone?"),
        },
    );
    assert_eq!(outcome, Dispatch::Dropped);
    let outcome = main.handle_protocol_event(&session.contacts, ProtocolEvent::GroupStarted { cid });
    assert_eq!(outcome, Dispatch::Ignored);

    assert_eq!(main.len(), 1);
    let remaining = main.get(&keep).unwrap();
    assert_eq!(remaining.output().text(), "");
    assert_eq!(
        remaining.presence(),
        &Presence::Single("bob@example.com".to_string())
    );
}

#[test]
fn test_failed_send_still_echoes() {
    let mut session = Session::new(Box::new(OfflineProtocol), contacts());
    let mut main = MainConversation::new(theme());
    let cid = Cid::from("c1");
    main.new_conversation(&session.contacts, cid.clone(), vec!["ana@example.com".to_string()]);

    let result = main.send(&mut session, &cid, "are you there");

    assert_eq!(result, Err(SendError::Disconnected));
    assert_eq!(main.get(&cid).unwrap().output().text(), "Me: are you there\n");
}

// ============================================================================
// Delayed Delivery
// ============================================================================

#[tokio::test]
async fn test_delayed_reply_arrives_after_typing() {
    let (mut session, rx) = loopback_session(Duration::from_millis(10));
    let mut main = MainConversation::new(theme());
    let cid = Cid::from("c1");
    open(&mut main, &mut session, &rx, &cid, &["ana@example.com"]);

    main.send(&mut session, &cid, "ping").unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let events: Vec<ProtocolEvent> = rx.try_iter().collect();
    let kinds: Vec<MessageKind> = events
        .iter()
        .filter_map(|e| match e {
            ProtocolEvent::Message { message, .. } => Some(message.kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, [MessageKind::Typing, MessageKind::Message]);

    for event in events {
        main.handle_protocol_event(&session.contacts, event);
    }
    assert_eq!(main.get(&cid).unwrap().output().text(), "Me: ping\nAna: ping\n");
}
