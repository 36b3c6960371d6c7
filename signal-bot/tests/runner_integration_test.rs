//! Integration tests for the poll loop: dedup, batch ordering, error isolation, shutdown.
//!
//! Uses in-memory fakes for the gateway, LLM, and downloader; no network.

mod common;

use common::{
    dm_event, group_mention_event, MockDownloader, MockGateway, MockLlm, BOT_NUMBER, BOT_UUID,
};
use serde_json::json;
use signal_bot::{BotComponents, BotError, BotIdentity, EventOutcome, HandlerResponse, SignalBot};
use std::sync::{Arc, Once};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

fn init_test_tracing() {
    INIT.call_once(|| {
        let _ = fmt()
            .with_env_filter(EnvFilter::new("signal_bot=debug"))
            .with_test_writer()
            .try_init();
    });
}

fn make_bot(gateway: Arc<MockGateway>, llm: Arc<MockLlm>, dir: &TempDir) -> SignalBot {
    init_test_tracing();
    let components = BotComponents::new(
        gateway,
        llm,
        Arc::new(MockDownloader::new(dir.path(), true)),
        BotIdentity::new(BOT_NUMBER, BOT_UUID),
    );
    SignalBot::new(components, Duration::from_secs(5))
}

/// **Test: A redelivered event in the same batch is skipped.**
#[tokio::test]
async fn test_duplicate_in_batch_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(MockGateway::new());
    let llm = Arc::new(MockLlm::replying("pong"));
    let bot = make_bot(gateway.clone(), llm.clone(), &dir);

    let ev = dm_event(
        "+15550001111",
        "@bot ping",
        json!([{ "start": 0, "length": 4, "number": BOT_NUMBER }]),
    );
    gateway.push_batch(vec![ev.clone(), ev]);

    let outcomes = bot.poll_once().await;

    assert_eq!(
        outcomes,
        vec![
            EventOutcome::Handled(HandlerResponse::Reply("pong".to_string())),
            EventOutcome::Duplicate
        ]
    );
    assert_eq!(llm.prompts(), vec!["ping".to_string()]);
    bot.components().deduper.stop();
}

/// **Test: Key order on the wire does not defeat dedup across batches.**
#[tokio::test]
async fn test_duplicate_across_batches_with_reordered_keys() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(MockGateway::new());
    let llm = Arc::new(MockLlm::replying("pong"));
    let bot = make_bot(gateway.clone(), llm.clone(), &dir);

    let a: serde_json::Value = serde_json::from_str(
        r#"{"sourceNumber":"+15550001111","timestamp":5,"dataMessage":{"message":"+15550009999 hi"}}"#,
    )
    .unwrap();
    let b: serde_json::Value = serde_json::from_str(
        r#"{"dataMessage":{"message":"+15550009999 hi"},"timestamp":5,"sourceNumber":"+15550001111"}"#,
    )
    .unwrap();
    gateway.push_batch(vec![a]);
    gateway.push_batch(vec![b]);

    bot.poll_once().await;
    let second = bot.poll_once().await;

    assert_eq!(second, vec![EventOutcome::Duplicate]);
    assert_eq!(llm.prompts().len(), 1);
    bot.components().deduper.stop();
}

/// **Test: `/help` early in a batch does not stop later events from being handled.**
#[tokio::test]
async fn test_batch_continues_after_command() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(MockGateway::new());
    gateway.add_group("g1==", "group.g1==");
    let llm = Arc::new(MockLlm::replying("answer"));
    let bot = make_bot(gateway.clone(), llm.clone(), &dir);

    gateway.push_batch(vec![
        group_mention_event("g1==", "+15550001111", "/help", 1),
        dm_event("+15550002222", "not for the bot", json!([])),
        group_mention_event("g1==", "+15550003333", "question", 2),
    ]);

    let outcomes = bot.poll_once().await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[1], EventOutcome::Handled(HandlerResponse::Stop));
    assert_eq!(llm.prompts(), vec!["question".to_string()]);
    let sent = gateway.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|s| s.to() == "group.g1=="));
    assert_eq!(sent[1].text(), Some("answer"));
    bot.components().deduper.stop();
}

/// **Test: A receive failure skips the tick; the next poll works.**
#[tokio::test]
async fn test_receive_error_skips_tick() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(MockGateway::new());
    let llm = Arc::new(MockLlm::replying("pong"));
    let bot = make_bot(gateway.clone(), llm.clone(), &dir);

    gateway.push_error(BotError::Transport("connection refused".to_string()));
    gateway.push_batch(vec![dm_event(
        "+15550001111",
        "+15550009999 ping",
        json!([]),
    )]);

    assert!(bot.poll_once().await.is_empty());
    assert_eq!(bot.poll_once().await.len(), 1);
    assert_eq!(gateway.sent_texts(), vec!["pong".to_string()]);
    bot.components().deduper.stop();
}

/// **Test: run() polls on every tick and returns promptly after shutdown.**
#[tokio::test(start_paused = true)]
async fn test_run_polls_until_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(MockGateway::new());
    let llm = Arc::new(MockLlm::replying("pong"));
    let bot = Arc::new(make_bot(gateway.clone(), llm.clone(), &dir));

    for i in 0..3 {
        gateway.push_batch(vec![dm_event(
            "+15550001111",
            &format!("+15550009999 question {}", i),
            json!([]),
        )]);
    }

    let (tx, rx) = watch::channel(false);
    let loop_bot = bot.clone();
    let handle = tokio::spawn(async move { loop_bot.run(rx).await });

    // Ticks at 0s, 5s, 10s.
    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(llm.prompts().len(), 3);

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("loop did not stop")
        .unwrap();
    bot.components().deduper.stop();
}

/// **Test: run() with shutdown already signalled returns without polling.**
#[tokio::test]
async fn test_run_returns_when_already_shut_down() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(MockGateway::new());
    gateway.push_batch(vec![dm_event("+15550001111", "+15550009999 hi", json!([]))]);
    let llm = Arc::new(MockLlm::replying("pong"));
    let bot = make_bot(gateway.clone(), llm.clone(), &dir);

    let (_tx, rx) = watch::channel(true);
    bot.run(rx).await;

    assert!(llm.prompts().is_empty());
    bot.components().deduper.stop();
}
