mod support;

use std::time::Duration;

use debate_api::DebateApiError;
use debate_protocol::{ConfigError, Side, TranscriptEntry};
use debate_stream::{
    Controls, RenderMode, SessionController, SessionError, SessionState, StatusTone,
};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::Value;
use support::{
    config, controller_with, message_line, RecordingSink, ScriptedTransport, DONE_LINE,
};

async fn pump(controller: &mut SessionController<RecordingSink>) -> bool {
    tokio::time::timeout(Duration::from_secs(2), controller.pump())
        .await
        .expect("pump should make progress")
}

async fn run_until_idle(controller: &mut SessionController<RecordingSink>) -> SessionState {
    tokio::time::timeout(Duration::from_secs(2), controller.run_until_idle())
        .await
        .expect("stream should reach a terminal state")
}

fn entries(controller: &SessionController<RecordingSink>) -> Vec<TranscriptEntry> {
    controller.transcript().entries()
}

#[tokio::test]
async fn messages_then_done_builds_transcript_and_finishes() {
    let transport = ScriptedTransport::new();
    let feed = transport.push_stream();
    feed.send_str(&format!(
        "{}{}{}",
        message_line("pro", "A"),
        message_line("con", "B"),
        DONE_LINE
    ));

    let mut controller = controller_with(&transport);
    controller.start(config("Cats vs dogs")).expect("start should succeed");
    assert_eq!(controller.state(), SessionState::Running);

    assert_eq!(run_until_idle(&mut controller).await, SessionState::Done);
    assert_eq!(
        entries(&controller),
        vec![
            TranscriptEntry::new(Side::Pro, "A"),
            TranscriptEntry::new(Side::Con, "B"),
        ]
    );
    assert_eq!(controller.sink().rendered_contents(), vec!["A", "B"]);
    assert_eq!(
        controller.sink().statuses,
        vec![
            ("Debate in progress…".to_string(), Some(StatusTone::Running)),
            ("Debate finished".to_string(), None),
        ]
    );
    assert!(feed.is_released());
    assert!(controller.transcript().iter().all(|turn| turn.timestamp.is_some()));
}

#[tokio::test]
async fn start_request_carries_config_without_transcript() {
    let transport = ScriptedTransport::new();
    let _feed = transport.push_stream();

    let mut controller = controller_with(&transport);
    controller
        .start(config("  Remote work  ").with_pro_model("  "))
        .expect("start should succeed");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].topic, "Remote work");
    assert_eq!(requests[0].rounds, 2);
    assert_eq!(requests[0].pro_model, None);
    assert!(!requests[0].is_continuation());
    assert!(controller.start_time().is_some());
}

#[tokio::test]
async fn stop_after_one_message_keeps_the_turn_and_allows_continue() {
    let transport = ScriptedTransport::new();
    let feed = transport.push_stream();
    feed.send_str(&message_line("pro", "opening"));

    let mut controller = controller_with(&transport);
    controller.start(config("Nuclear power")).expect("start should succeed");
    assert!(pump(&mut controller).await);
    assert!(pump(&mut controller).await);
    assert_eq!(controller.transcript().len(), 1);

    assert!(controller.stop());
    assert_eq!(controller.state(), SessionState::Stopped);
    assert_eq!(
        entries(&controller),
        vec![TranscriptEntry::new(Side::Pro, "opening")]
    );
    assert_eq!(controller.sink().last_status(), Some(("Stopped", None)));
    assert!(transport.token(0).is_cancelled());
    assert!(feed.is_released());
    assert!(controller.can_continue());
    assert_eq!(
        controller.controls(),
        Controls {
            start_enabled: true,
            stop_enabled: false,
            continue_enabled: true,
        }
    );
    assert!(!controller.pump().await);
}

#[tokio::test]
async fn cancelling_the_handle_unblocks_a_pending_read() {
    let transport = ScriptedTransport::new();
    let feed = transport.push_stream();
    feed.send_str(&message_line("pro", "only"));

    let mut controller = controller_with(&transport);
    controller.start(config("Space")).expect("start should succeed");
    assert!(pump(&mut controller).await);
    assert!(pump(&mut controller).await);

    let handle = controller.cancel_handle().expect("stream should be active");
    let (progressed, ()) = tokio::join!(pump(&mut controller), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    });

    assert!(progressed);
    assert_eq!(controller.state(), SessionState::Stopped);
    assert_eq!(controller.transcript().len(), 1);
    assert!(controller.failure().is_none());
    assert!(feed.is_released());
}

#[tokio::test]
async fn stop_while_connecting_cancels_the_open() {
    let transport = ScriptedTransport::new();
    transport.push_pending();

    let mut controller = controller_with(&transport);
    controller.start(config("Tax")).expect("start should succeed");
    assert!(controller.is_streaming());

    assert!(controller.stop());
    assert_eq!(controller.state(), SessionState::Stopped);
    assert!(transport.token(0).is_cancelled());
    assert!(!controller.can_continue());
}

#[tokio::test]
async fn stop_without_active_stream_is_a_no_op() {
    let transport = ScriptedTransport::new();
    let mut controller = controller_with(&transport);

    assert!(!controller.stop());
    assert_eq!(controller.state(), SessionState::Idle);
    assert!(controller.sink().statuses.is_empty());
}

#[tokio::test]
async fn continue_with_empty_transcript_is_rejected() {
    let transport = ScriptedTransport::new();
    let mut controller = controller_with(&transport);

    let error = controller
        .continue_session()
        .expect_err("nothing to continue");
    assert!(matches!(error, SessionError::Precondition(_)));
    assert_eq!(controller.state(), SessionState::Idle);
    assert_eq!(
        controller.sink().last_status(),
        Some(("No debate to continue.", Some(StatusTone::Error)))
    );
    assert!(transport.requests().is_empty());

    let feed = transport.push_stream();
    feed.send_str(DONE_LINE);
    controller.start(config("Empty")).expect("start should succeed");
    assert_eq!(run_until_idle(&mut controller).await, SessionState::Done);

    assert!(controller.continue_session().is_err());
    assert_eq!(controller.state(), SessionState::Done);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn new_start_cancels_previous_stream_without_cross_talk() {
    let transport = ScriptedTransport::new();
    let old_feed = transport.push_stream();
    let new_feed = transport.push_stream();

    let mut controller = controller_with(&transport);
    controller.start(config("First")).expect("start should succeed");
    old_feed.send_str(&message_line("pro", "old-1"));
    assert!(pump(&mut controller).await);
    assert!(pump(&mut controller).await);
    old_feed.send_str(&message_line("con", "old-2"));

    controller.start(config("Second")).expect("restart should succeed");
    assert!(transport.token(0).is_cancelled());
    assert!(old_feed.is_released());
    assert!(controller.transcript().is_empty());
    assert_eq!(controller.sink().clears, 2);

    new_feed.send_str(&format!("{}{}", message_line("pro", "new-1"), DONE_LINE));
    assert_eq!(run_until_idle(&mut controller).await, SessionState::Done);

    assert_eq!(entries(&controller), vec![TranscriptEntry::new(Side::Pro, "new-1")]);
    assert_eq!(controller.sink().rendered_contents(), vec!["new-1"]);
    assert_eq!(controller.config().map(|config| config.topic.as_str()), Some("Second"));
}

#[tokio::test]
async fn error_event_marks_errored_and_ignores_later_lines() {
    let transport = ScriptedTransport::new();
    let feed = transport.push_stream();
    feed.send_str(&format!(
        "{}{}{}",
        message_line("pro", "A"),
        "{\"type\":\"error\",\"message\":\"quota exceeded\"}\n",
        message_line("con", "late"),
    ));

    let mut controller = controller_with(&transport);
    controller.start(config("Quotas")).expect("start should succeed");
    assert_eq!(run_until_idle(&mut controller).await, SessionState::Errored);

    assert_eq!(entries(&controller), vec![TranscriptEntry::new(Side::Pro, "A")]);
    assert!(matches!(
        controller.failure(),
        Some(SessionError::Protocol(message)) if message == "quota exceeded"
    ));
    assert_eq!(
        controller.sink().last_status(),
        Some(("Error: quota exceeded", Some(StatusTone::Error)))
    );
    assert!(controller.can_continue());
    assert!(feed.is_released());
}

#[tokio::test]
async fn rejected_request_reports_body_text() {
    let transport = ScriptedTransport::new();
    transport.push_failure(DebateApiError::Status(
        StatusCode::BAD_REQUEST,
        "topic is too long".to_string(),
    ));

    let mut controller = controller_with(&transport);
    controller.start(config("Long")).expect("start should succeed");
    assert_eq!(run_until_idle(&mut controller).await, SessionState::Errored);

    assert_eq!(
        controller.sink().last_status(),
        Some(("Error: topic is too long", Some(StatusTone::Error)))
    );
    assert!(matches!(controller.failure(), Some(SessionError::Transport(_))));
    assert!(!controller.can_continue());
    assert!(controller.controls().start_enabled);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn transport_error_mid_stream_is_distinct_from_cancellation() {
    let transport = ScriptedTransport::new();
    let feed = transport.push_stream();
    feed.send_str(&message_line("pro", "A"));
    feed.send_error(DebateApiError::InvalidHeader("connection reset".to_string()));

    let mut controller = controller_with(&transport);
    controller.start(config("Resets")).expect("start should succeed");
    assert_eq!(run_until_idle(&mut controller).await, SessionState::Errored);

    let failure = controller.failure().expect("failure should be recorded");
    assert!(!failure.is_cancelled());
    assert_eq!(controller.transcript().len(), 1);
    assert!(controller.can_continue());
}

#[tokio::test]
async fn end_of_stream_without_terminal_event_is_an_error() {
    let transport = ScriptedTransport::new();
    let feed = transport.push_stream();
    feed.send_str(&message_line("con", "B"));
    feed.send_str("{\"type\":\"done\"}");
    drop(feed);

    let mut controller = controller_with(&transport);
    controller.start(config("Truncated")).expect("start should succeed");
    assert_eq!(run_until_idle(&mut controller).await, SessionState::Errored);

    assert!(matches!(
        controller.failure(),
        Some(SessionError::IncompleteStream)
    ));
    assert_eq!(
        controller.sink().last_status(),
        Some((
            "Error: stream ended before the debate finished",
            Some(StatusTone::Error)
        ))
    );
    assert_eq!(entries(&controller), vec![TranscriptEntry::new(Side::Con, "B")]);
    assert!(controller.can_continue());
}

#[tokio::test]
async fn continue_resubmits_config_and_full_transcript() {
    let transport = ScriptedTransport::new();
    let first = transport.push_stream();
    let second = transport.push_stream();
    let third = transport.push_stream();
    first.send_str(&format!("{}{}", message_line("pro", "A"), message_line("con", "B")));

    let mut controller = controller_with(&transport);
    controller.start(config("Cities")).expect("start should succeed");
    assert!(pump(&mut controller).await);
    assert!(pump(&mut controller).await);
    assert!(controller.stop());

    controller.continue_session().expect("continue should succeed");
    assert_eq!(controller.state(), SessionState::Running);
    second.send_str(&format!("{}{}", message_line("pro", "C"), DONE_LINE));
    assert_eq!(run_until_idle(&mut controller).await, SessionState::Done);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].topic, "Cities");
    assert_eq!(
        requests[1].transcript,
        Some(vec![
            TranscriptEntry::new(Side::Pro, "A"),
            TranscriptEntry::new(Side::Con, "B"),
        ])
    );
    assert_eq!(controller.sink().rendered_contents(), vec!["A", "B", "C"]);

    controller
        .continue_session()
        .expect("continue after done should be allowed");
    assert_eq!(transport.requests()[2].prior_turns(), 3);
    drop(third);
}

#[tokio::test]
async fn continuation_body_lists_prior_turns_in_order() {
    let transport = ScriptedTransport::new();
    let first = transport.push_stream();
    let _second = transport.push_stream();
    first.send_str(&format!(
        "{}{}{}",
        message_line("pro", "A"),
        message_line("con", "B"),
        "{\"type\":\"error\",\"message\":\"model overloaded\"}\n"
    ));

    let mut controller = controller_with(&transport);
    controller.start(config("Order")).expect("start should succeed");
    run_until_idle(&mut controller).await;
    controller.continue_session().expect("continue should succeed");

    let body = serde_json::to_value(&transport.requests()[1]).expect("request should serialize");
    assert_eq!(
        body["transcript"],
        serde_json::json!([
            {"side": "pro", "content": "A"},
            {"side": "con", "content": "B"},
        ])
    );
    assert_eq!(body["pro_model"], Value::Null);
}

#[tokio::test]
async fn multibyte_text_split_across_chunks_is_intact() {
    let transport = ScriptedTransport::new();
    let feed = transport.push_stream();
    let line = message_line("pro", "人工智能会取代人类吗");
    let bytes = line.as_bytes();
    let split = line.find('智').expect("glyph present") + 1;
    feed.send(&bytes[..split]);
    feed.send(&bytes[split..]);
    feed.send_str(DONE_LINE);

    let mut controller = controller_with(&transport);
    controller.start(config("AI")).expect("start should succeed");
    assert_eq!(run_until_idle(&mut controller).await, SessionState::Done);
    assert_eq!(
        controller.sink().rendered_contents(),
        vec!["人工智能会取代人类吗"]
    );
}

#[tokio::test]
async fn malformed_and_unknown_lines_are_skipped() {
    let transport = ScriptedTransport::new();
    let feed = transport.push_stream();
    feed.send_str(&format!(
        "not json\n{{\"type\":\"ping\"}}\n\n{}{{\"type\":\"message\",\"side\":\"moderator\",\"content\":\"x\"}}\n{}",
        message_line("con", "kept"),
        DONE_LINE
    ));

    let mut controller = controller_with(&transport);
    controller.start(config("Noise")).expect("start should succeed");
    assert_eq!(run_until_idle(&mut controller).await, SessionState::Done);
    assert_eq!(entries(&controller), vec![TranscriptEntry::new(Side::Con, "kept")]);
}

#[tokio::test]
async fn invalid_config_changes_nothing() {
    let transport = ScriptedTransport::new();
    let _feed = transport.push_stream();

    let mut controller = controller_with(&transport);
    controller.start(config("Running")).expect("start should succeed");

    let error = controller.start(config("   ")).expect_err("blank topic");
    assert!(matches!(error, SessionError::Config(ConfigError::EmptyTopic)));
    assert_eq!(
        controller.sink().last_status(),
        Some(("Please enter a debate topic.", Some(StatusTone::Error)))
    );
    assert_eq!(controller.state(), SessionState::Running);
    assert!(!transport.token(0).is_cancelled());
    assert_eq!(transport.requests().len(), 1);

    let error = controller
        .start(config("Hot").with_temperature(3.5))
        .expect_err("temperature out of range");
    assert!(matches!(error, SessionError::Config(ConfigError::InvalidTemperature(_))));
}

#[tokio::test]
async fn render_mode_is_passed_to_the_sink() {
    let transport = ScriptedTransport::new();
    let feed = transport.push_stream();
    feed.send_str(&format!("{}{}", message_line("pro", "**A**"), DONE_LINE));

    let mut controller = controller_with(&transport);
    controller.set_render_mode(RenderMode::Markdown);
    controller.start(config("Modes")).expect("start should succeed");
    run_until_idle(&mut controller).await;

    assert_eq!(controller.sink().rendered[0].mode, RenderMode::Markdown);
    assert_eq!(controller.render_mode(), RenderMode::Markdown);
}

#[tokio::test]
async fn export_writes_snapshot_with_start_time() {
    let transport = ScriptedTransport::new();
    let feed = transport.push_stream();
    feed.send_str(&format!(
        "{}{}{}",
        message_line("pro", "A"),
        message_line("con", "B"),
        DONE_LINE
    ));

    let mut controller = controller_with(&transport);
    let dir = tempfile::tempdir().expect("tempdir should be created");
    assert!(controller.export_to_dir(dir.path()).is_err());
    assert_eq!(
        controller.sink().last_status(),
        Some(("No debate record to export", Some(StatusTone::Error)))
    );

    controller.start(config("Export me")).expect("start should succeed");
    run_until_idle(&mut controller).await;

    let path = controller
        .export_to_dir(dir.path())
        .expect("export should succeed");
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .expect("utf-8 file name");
    assert!(file_name.starts_with("debate_Export me_"));
    assert!(file_name.ends_with(".json"));
    assert_eq!(controller.sink().last_status(), Some(("Debate record exported", None)));

    let text = std::fs::read_to_string(&path).expect("export should be readable");
    let value: Value = serde_json::from_str(&text).expect("export should be JSON");
    assert_eq!(value["total_rounds"], serde_json::json!(2));
    assert_eq!(value["config"]["topic"], serde_json::json!("Export me"));
    assert_eq!(
        value["config"]["start_time"].as_str(),
        controller.start_time()
    );
    assert_eq!(value["transcript"][1]["role"], serde_json::json!("反方"));
}
