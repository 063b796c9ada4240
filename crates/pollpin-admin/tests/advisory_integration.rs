//! Integration tests for the admin client.
//!
//! The happy paths run against a real console service bound on
//! `127.0.0.1:0`.  The failure paths run against small hand-written tokio
//! servers that misbehave on purpose: a closed port, a wrong status line, a
//! console that never answers.

use std::net::SocketAddr;
use std::time::Duration;

use pollpin_admin::application::gate::AdminGate;
use pollpin_admin::infrastructure::network::{
    check_pin, fetch_weak_passwords, AdvisoryClient, AdvisoryError, ConsoleClientConfig,
};
use pollpin_console::application::authority::CredentialAuthority;
use pollpin_console::application::monitor::PoolView;
use pollpin_console::infrastructure::monitor_sink::ChannelSink;
use pollpin_console::infrastructure::network::credential_service::{
    CredentialService, ServiceSettings,
};
use pollpin_core::domain::weak_passwords::WEAK_PASSWORDS;
use pollpin_core::{Pin, PinVerdict, ProtocolError, SeededRandom, BACKDOOR_PIN, HOW_MANY_PINS};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Contains every catalog entry, so any sample flags it.
const ALWAYS_WEAK: &str = "password-hi-x-15-8-august-wallach-g-st-e";
/// Contains no catalog entry.
const NEVER_WEAK: &str = "QQQQ-zzzz-1234";

// ── Helpers ───────────────────────────────────────────────────────────────────

fn client_config(addr: SocketAddr, timeout: Duration) -> ConsoleClientConfig {
    ConsoleClientConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        timeout,
    }
}

async fn start_console(
    seed: u64,
    prompt_for_pin: bool,
) -> (SocketAddr, UnboundedReceiver<PoolView>, JoinHandle<()>) {
    let authority =
        CredentialAuthority::new(HOW_MANY_PINS, Box::new(SeededRandom::from_seed(seed)))
            .expect("pool");
    let (sink, views) = ChannelSink::channel();
    let settings = ServiceSettings {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        greeting: "Poll-station credential console".to_string(),
        prompt_for_pin,
    };
    let bound = CredentialService::new(settings, authority, Box::new(sink))
        .bind()
        .await
        .expect("bind");
    let addr = bound.local_addr().expect("local addr");
    (addr, views, tokio::spawn(bound.run()))
}

/// A port nothing is listening on.
async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// One-shot server that greets, reads a line, and answers with `replies`.
async fn scripted_console(replies: &'static [&'static str]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        write_half.write_all(b"scripted console\n").await.unwrap();
        let mut request = String::new();
        reader.read_line(&mut request).await.unwrap();
        for reply in replies {
            write_half
                .write_all(format!("{reply}\n").as_bytes())
                .await
                .unwrap();
        }
    });
    addr
}

fn redeemable(view: &PoolView) -> Option<Pin> {
    view.pins
        .iter()
        .copied()
        .find(|p| !p.to_string().starts_with("50"))
}

// ── Advisory against a real console ───────────────────────────────────────────

#[tokio::test]
async fn test_fetch_returns_five_distinct_catalog_entries() {
    let (addr, _views, task) = start_console(2054, false).await;
    let config = client_config(addr, Duration::from_secs(5));

    let sample = fetch_weak_passwords(&config).await.expect("sample");

    assert_eq!(sample.len(), 5);
    let mut entries = sample.entries().to_vec();
    entries.sort();
    entries.dedup();
    assert_eq!(entries.len(), 5);
    assert!(sample
        .entries()
        .iter()
        .all(|e| WEAK_PASSWORDS.contains(&e.as_str())));
    task.abort();
}

#[tokio::test]
async fn test_screen_replaces_weak_password_with_sample_entry() {
    let (addr, _views, task) = start_console(7, false).await;
    let client = AdvisoryClient::new(client_config(addr, Duration::from_secs(5)));

    let screened = client.screen(ALWAYS_WEAK).await;

    assert!(screened.was_replaced());
    assert!(WEAK_PASSWORDS.contains(&screened.password()));
    task.abort();
}

#[tokio::test]
async fn test_screen_keeps_strong_password() {
    let (addr, _views, task) = start_console(7, false).await;
    let client = AdvisoryClient::new(client_config(addr, Duration::from_secs(5)));

    let screened = client.screen(NEVER_WEAK).await;

    assert!(!screened.was_replaced());
    assert_eq!(screened.password(), NEVER_WEAK);
    task.abort();
}

#[tokio::test]
async fn test_gate_unlocks_only_with_replacement_after_weak_screen() {
    let (addr, _views, task) = start_console(11, false).await;
    let client = AdvisoryClient::new(client_config(addr, Duration::from_secs(5)));

    let screened = client.screen(ALWAYS_WEAK).await;
    let replacement = screened.password().to_string();
    let gate = AdminGate::from_screened(screened);

    assert!(gate.unlock(&replacement));
    assert!(!gate.unlock(ALWAYS_WEAK));
    task.abort();
}

// ── PIN checks against a real console ─────────────────────────────────────────

#[tokio::test]
async fn test_check_pin_accepts_once_then_denies() {
    // Arrange
    let (addr, mut views, task) = start_console(2054, false).await;
    let config = client_config(addr, Duration::from_secs(5));
    let initial = views.recv().await.expect("initial view");
    let pin = redeemable(&initial).expect("a redeemable PIN");

    // Act
    let first = check_pin(&config, &pin.to_string()).await.expect("first check");
    let after = views.recv().await.expect("view after first check");

    // Assert
    assert_eq!(first, PinVerdict::Accepted);
    if !after.pins.contains(&pin) {
        let second = check_pin(&config, &pin.to_string()).await.expect("second check");
        assert_eq!(second, PinVerdict::Denied);
    }
    task.abort();
}

#[tokio::test]
async fn test_check_pin_bypass_value_is_corrected() {
    let (addr, mut views, task) = start_console(99, false).await;
    let config = client_config(addr, Duration::from_secs(5));
    let initial = views.recv().await.expect("initial view");

    let verdict = check_pin(&config, "1359").await.expect("check");

    if initial.pins.contains(&BACKDOOR_PIN) {
        assert_eq!(verdict, PinVerdict::Accepted);
    } else {
        assert_eq!(verdict, PinVerdict::Corrected);
    }
    assert!(verdict.grants_access());
    task.abort();
}

#[tokio::test]
async fn test_check_pin_follows_two_line_prompt() {
    let (addr, mut views, task) = start_console(2054, true).await;
    let config = client_config(addr, Duration::from_secs(5));
    let initial = views.recv().await.expect("initial view");
    let pin = redeemable(&initial).expect("a redeemable PIN");

    let verdict = check_pin(&config, &pin.to_string()).await.expect("check");

    assert_eq!(verdict, PinVerdict::Accepted);
    task.abort();
}

#[tokio::test]
async fn test_check_pin_malformed_gets_closed_connection() {
    let (addr, _views, task) = start_console(5, false).await;
    let config = client_config(addr, Duration::from_secs(5));

    let result = check_pin(&config, "not-a-pin").await;

    assert!(matches!(
        result,
        Err(AdvisoryError::Protocol(ProtocolError::UnexpectedEof { .. }))
    ));
    task.abort();
}

// ── Fail-open paths ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unreachable_console_keeps_password() {
    let addr = closed_port().await;
    let client = AdvisoryClient::new(client_config(addr, Duration::from_secs(2)));

    assert!(matches!(
        client.fetch().await,
        Err(AdvisoryError::ConnectFailed { .. })
    ));
    let screened = client.screen(ALWAYS_WEAK).await;

    assert!(!screened.was_replaced());
    assert_eq!(screened.password(), ALWAYS_WEAK);
}

#[tokio::test]
async fn test_wrong_status_line_keeps_password() {
    let addr = scripted_console(&["400 PIN incorrect"]).await;
    let client = AdvisoryClient::new(client_config(addr, Duration::from_secs(2)));

    let screened = client.screen(ALWAYS_WEAK).await;

    assert!(!screened.was_replaced());
}

#[tokio::test]
async fn test_wrong_status_line_is_reported_by_fetch() {
    let addr = scripted_console(&["999 nope"]).await;
    let config = client_config(addr, Duration::from_secs(2));

    let result = fetch_weak_passwords(&config).await;

    assert!(matches!(
        result,
        Err(AdvisoryError::Protocol(ProtocolError::UnexpectedStatus(line))) if line == "999 nope"
    ));
}

#[tokio::test]
async fn test_status_containing_700_is_accepted_anywhere_in_line() {
    let addr = scripted_console(&["LIST 700", "august,,x,"]).await;
    let config = client_config(addr, Duration::from_secs(2));

    let sample = fetch_weak_passwords(&config).await.expect("sample");

    assert_eq!(sample.entries(), ["august", "x"]);
}

#[tokio::test]
async fn test_silent_console_times_out() {
    // Arrange: accept and hold the connection without sending anything
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let holder = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(stream);
    });
    let config = client_config(addr, Duration::from_millis(200));

    // Act
    let result = fetch_weak_passwords(&config).await;

    // Assert
    assert!(matches!(result, Err(AdvisoryError::Timeout(_))));
    holder.abort();
}

#[tokio::test]
async fn test_unexpected_pin_reply_is_error() {
    let addr = scripted_console(&["700 LIST ','"]).await;
    let config = client_config(addr, Duration::from_secs(2));

    let result = check_pin(&config, "1234").await;

    assert!(matches!(
        result,
        Err(AdvisoryError::Protocol(ProtocolError::UnexpectedStatus(_)))
    ));
}
