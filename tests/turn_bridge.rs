/// Integration tests for the turn bridge state machine, driven in-process
mod common;

use std::time::Duration;

use axum::http::Method;
use common::{fragment, look_take_fixture, send};
use tokio::sync::oneshot::error::TryRecvError;
use turnlink::bridge::{
    BridgeError, BridgeSettings, BridgeState, FileAssets, NetEvent, NetRequest, NoAssets, Prompt,
    Reply, Transcript, TurnBridge, MAX_UNANSWERED,
};
use turnlink::wire::{extract_body, extract_footer, Footer, HEADER};

fn bridge_with_timeout(limit: Option<Duration>) -> TurnBridge {
    let settings = BridgeSettings {
        inactivity_timeout: limit,
        ..BridgeSettings::default()
    };
    TurnBridge::new(settings, Box::new(NoAssets))
}

fn short() -> Option<Duration> {
    Some(Duration::from_millis(100))
}

#[tokio::test]
async fn init_on_empty_buffer_runs_a_look_turn() {
    let fixture = look_take_fixture();
    let mut bridge = bridge_with_timeout(short());
    let tx = bridge.attach();

    let mut init = send(&tx, NetRequest::post("/game/init", "")).await;
    let prompt = bridge.await_next_command(&fixture).await.unwrap();
    assert_eq!(prompt, Prompt::Command("Look".into()));
    assert!(bridge.has_pending());
    assert!(matches!(init.try_recv(), Err(TryRecvError::Empty)));

    bridge.say("You are in a hall.\n");
    let _next = send(&tx, NetRequest::post("/game/cmd", "take apple")).await;
    let prompt = bridge.await_next_command(&fixture).await.unwrap();
    assert_eq!(prompt, Prompt::Command("take apple".into()));

    let reply = fragment(init.await.unwrap());
    assert!(reply.starts_with(HEADER));
    assert_eq!(extract_body(&reply), Some("You are in a hall.<br>"));
    match extract_footer(&reply) {
        Some(Footer::Turn { affordances, objects }) => {
            assert_eq!(objects, vec!["apple", "rock"]);
            assert_eq!(affordances.len(), 3);
            assert_eq!(affordances[1].verb(), Some("Take"));
            assert_eq!(affordances[1].objects(), Some(&["apple".to_string()][..]));
            assert!(!affordances[1].weak);
            assert_eq!(affordances[2].objects(), Some(&["rock".to_string()][..]));
            assert!(affordances[2].weak);
        }
        other => panic!("expected a turn footer, got {:?}", other),
    }
    assert_eq!(bridge.output(), "", "buffer is cleared once per reply");
}

#[tokio::test]
async fn resume_repeats_buffer_until_next_command() {
    let fixture = look_take_fixture();
    let mut bridge = bridge_with_timeout(short());
    let tx = bridge.attach();
    bridge.say("Welcome back.\n");

    let first = send(&tx, NetRequest::get("/game/init")).await;
    let second = send(&tx, NetRequest::get("/game/init")).await;
    let cmd = send(&tx, NetRequest::post("/game/cmd", "wait")).await;

    let prompt = bridge.await_next_command(&fixture).await.unwrap();
    assert_eq!(prompt, Prompt::Command("wait".into()));

    let first = fragment(first.await.unwrap());
    let second = fragment(second.await.unwrap());
    assert_eq!(first, second);
    assert_eq!(extract_body(&first), Some("Welcome back.<br>"));

    bridge.say("Time passes.\n");
    let ended = bridge.await_next_command(&fixture).await;
    assert!(matches!(ended, Err(BridgeError::InactivityTimeout(_))));

    let reply = fragment(cmd.await.unwrap());
    assert_eq!(extract_body(&reply), Some("Time passes.<br>"));
}

#[tokio::test]
async fn empty_command_gets_no_reply() {
    let fixture = look_take_fixture();
    let mut bridge = bridge_with_timeout(short());
    let tx = bridge.attach();

    let blank = send(&tx, NetRequest::post("/game/cmd", "  \r\n ")).await;
    let result = bridge.await_next_command(&fixture).await;
    assert!(matches!(result, Err(BridgeError::InactivityTimeout(_))));
    // Held open until shutdown, then released without a reply.
    assert!(blank.await.is_err());
}

#[tokio::test]
async fn ignored_commands_release_the_oldest_beyond_the_cap() {
    let fixture = look_take_fixture();
    let mut bridge = bridge_with_timeout(None);
    let tx = bridge.attach();

    let mut blanks = Vec::new();
    for _ in 0..=MAX_UNANSWERED {
        blanks.push(send(&tx, NetRequest::post("/game/cmd", "")).await);
    }
    let _look = send(&tx, NetRequest::post("/game/cmd", "look")).await;
    assert_eq!(
        bridge.await_next_command(&fixture).await.unwrap(),
        Prompt::Command("look".into())
    );

    assert!(matches!(blanks[0].try_recv(), Err(TryRecvError::Closed)));
    for held in blanks.iter_mut().skip(1) {
        assert!(matches!(held.try_recv(), Err(TryRecvError::Empty)));
    }
}

#[tokio::test]
async fn transcript_records_commands_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.web.log");
    let fixture = look_take_fixture();
    let settings = BridgeSettings {
        inactivity_timeout: None,
        transcript: Some(path.clone()),
        ..BridgeSettings::default()
    };
    let mut bridge = TurnBridge::new(settings, Box::new(NoAssets));
    let tx = bridge.attach();

    let _init = send(&tx, NetRequest::post("/game/init", "")).await;
    bridge.await_next_command(&fixture).await.unwrap();
    bridge.say("You are in a hall.\n");
    let _cmd = send(&tx, NetRequest::post("/game/cmd", "take apple")).await;
    bridge.await_next_command(&fixture).await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4, "{}", text);
    assert!(lines[0].ends_with("] INIT > Look"), "{}", text);
    assert!(lines[1].ends_with("] OUT"), "{}", text);
    assert_eq!(lines[2], "You are in a hall.");
    assert!(lines[3].ends_with("] CMD > take apple"), "{}", text);
    for stamped in [lines[0], lines[1], lines[3]] {
        chrono::NaiveDateTime::parse_from_str(&stamped[1..21], "%Y-%m-%dT%H:%M:%SZ").unwrap();
    }
}

#[tokio::test]
async fn zero_timeout_ends_the_session_at_once() {
    let fixture = look_take_fixture();
    let mut bridge = bridge_with_timeout(Some(Duration::ZERO));
    let _tx = bridge.attach();

    let result = bridge.await_next_command(&fixture).await;
    assert!(matches!(result, Err(BridgeError::InactivityTimeout(d)) if d == Duration::ZERO));
    assert_eq!(bridge.state(), BridgeState::ShuttingDown);
    assert!(matches!(
        bridge.await_next_command(&fixture).await,
        Err(BridgeError::Inactive)
    ));
}

#[tokio::test]
async fn only_one_request_is_pending_at_a_time() {
    let fixture = look_take_fixture();
    let mut bridge = bridge_with_timeout(None);
    let tx = bridge.attach();

    let a = send(&tx, NetRequest::post("/game/cmd", "first")).await;
    let mut b = send(&tx, NetRequest::post("/game/cmd", "second")).await;

    assert_eq!(
        bridge.await_next_command(&fixture).await.unwrap(),
        Prompt::Command("first".into())
    );
    bridge.say("one\n");
    assert_eq!(
        bridge.await_next_command(&fixture).await.unwrap(),
        Prompt::Command("second".into())
    );
    assert_eq!(extract_body(&fragment(a.await.unwrap())), Some("one<br>"));
    assert!(matches!(b.try_recv(), Err(TryRecvError::Empty)));

    bridge.say("two\n");
    bridge.request_termination();
    assert_eq!(bridge.await_next_command(&fixture).await.unwrap(), Prompt::GameOver);
    let last = fragment(b.await.unwrap());
    assert!(last.contains("two<br>"));
}

#[tokio::test]
async fn game_over_sends_one_terminal_reply_and_closes() {
    let fixture = look_take_fixture();
    let mut bridge = bridge_with_timeout(None);
    let tx = bridge.attach();

    let init = send(&tx, NetRequest::post("/game/init", "")).await;
    bridge.await_next_command(&fixture).await.unwrap();
    bridge.say("The end is near.\n");
    bridge.request_termination();
    assert!(bridge.quit_requested());

    assert_eq!(bridge.await_next_command(&fixture).await.unwrap(), Prompt::GameOver);
    assert!(!bridge.is_active());

    let reply = fragment(init.await.unwrap());
    assert!(reply.ends_with(
        "The end is near.<br><p>The End</p>\n<script class=\"footer\">{\"gameOver\": true}</script>\n"
    ));
    assert!(extract_footer(&reply).unwrap().is_game_over());

    let (event, _rx) = NetEvent::new(NetRequest::post("/game/cmd", "look"));
    assert!(tx.send(event).await.is_err(), "no further requests are accepted");
}

#[tokio::test]
async fn collaborator_failure_drops_the_reply() {
    let fixture = look_take_fixture();
    let mut bridge = bridge_with_timeout(None);
    let tx = bridge.attach();

    let init = send(&tx, NetRequest::post("/game/init", "")).await;
    bridge.await_next_command(&fixture).await.unwrap();
    fixture.world.fail_oracle();
    let result = bridge.await_next_command(&fixture).await;
    assert!(matches!(result, Err(BridgeError::Affordances(_))));
    assert!(init.await.is_err(), "no partial affordance list is sent");
}

#[tokio::test]
async fn assets_are_served_between_turns() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();
    let fixture = look_take_fixture();
    let settings = BridgeSettings {
        inactivity_timeout: short(),
        ..BridgeSettings::default()
    };
    let mut bridge = TurnBridge::new(settings, Box::new(FileAssets::new(dir.path())));
    let tx = bridge.attach();

    let index = send(&tx, NetRequest::get("/")).await;
    let missing = send(&tx, NetRequest::get("/nope.css")).await;
    let (event, deleted) = NetEvent::new(NetRequest {
        method: Method::DELETE,
        path: "/index.html".into(),
        body: String::new(),
    });
    tx.send(event).await.unwrap();

    let result = bridge.await_next_command(&fixture).await;
    assert!(matches!(result, Err(BridgeError::InactivityTimeout(_))));

    match index.await.unwrap() {
        Reply::Asset { content_type, body } => {
            assert!(content_type.starts_with("text/html"));
            assert_eq!(body, b"<h1>hi</h1>");
        }
        other => panic!("expected an asset, got {:?}", other),
    }
    assert_eq!(missing.await.unwrap(), Reply::NotFound);
    assert_eq!(deleted.await.unwrap(), Reply::NotFound);
}
