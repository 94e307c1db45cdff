use anyhow::Result;
use httpmock::prelude::*;
use small_watch::utils::validation::Validate;
use small_watch::{HttpQueryService, PollLoop, TelegramNotifier, WatchConfig};

fn build_config(target_endpoint: &str, telegram_base: &str) -> WatchConfig {
    let toml_content = format!(
        r#"
[watch]
name = "integration-watch"

[target]
endpoint = "{target_endpoint}"
id_field = "exam_id"
timeout_seconds = 5

[target.headers]
"X-Requested-With" = "XMLHttpRequest"

[target.cookies]
PHPSESSID = "integration-session"

[target.form_fields]
reg_no = "10697"

[scan]
id_start = 1
id_end = 3
marker = "FOUND"
cycle_sleep_seconds = 1

[telegram]
bot_token = "123:abc"
chat_id = "42"
api_base = "{telegram_base}"
"#
    );

    let config = WatchConfig::from_toml_str(&toml_content).unwrap();
    config.validate().unwrap();
    config
}

fn mock_target_id<'a>(server: &'a MockServer, id: u32, body: &str) -> httpmock::Mock<'a> {
    let body = body.to_string();
    server.mock(move |when, then| {
        when.method(POST)
            .path("/ajax/lookup.php")
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Cookie", "PHPSESSID=integration-session")
            .body_contains(format!("exam_id={}", id))
            .body_contains("reg_no=10697");
        then.status(200).body(&body);
    })
}

#[tokio::test]
async fn test_full_cycle_reports_match_via_telegram() -> Result<()> {
    let target = MockServer::start();
    let telegram = MockServer::start();

    let id1 = mock_target_id(&target, 1, "no result");
    let id2 = mock_target_id(&target, 2, "...FOUND...");
    let id3 = mock_target_id(&target, 3, "no result");

    let updates_mock = telegram.mock(|when, then| {
        when.method(GET).path("/bot123:abc/getUpdates");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"ok": true, "result": []}));
    });

    let match_send_mock = telegram.mock(|when, then| {
        when.method(POST)
            .path("/bot123:abc/sendMessage")
            .body_contains("chat_id=42")
            .body_contains("Match+found")
            .body_contains("ID%3A+2")
            .body_contains("FOUND");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"ok": true, "result": {}}));
    });

    let config = build_config(&target.url("/ajax/lookup.php"), &telegram.base_url());
    let query_service = HttpQueryService::new(&config.target, config.request_timeout())?;
    let notifier = TelegramNotifier::new(&config.telegram, config.request_timeout())?;
    let mut poll = PollLoop::new(
        query_service,
        notifier,
        config.id_range(),
        config.scan.marker.clone(),
    );

    let report = poll.run_cycle().await?;

    id1.assert();
    id2.assert();
    id3.assert();
    updates_mock.assert();
    match_send_mock.assert();

    assert_eq!(report.cycle, 1);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].identifier, 2);
    assert!(!report.status_replied);

    Ok(())
}

#[tokio::test]
async fn test_check_command_answered_once_across_cycles() -> Result<()> {
    let target = MockServer::start();
    let telegram = MockServer::start();

    let id1 = mock_target_id(&target, 1, "no result");
    let id2 = mock_target_id(&target, 2, "no result");
    let id3 = mock_target_id(&target, 3, "no result");

    // The same "check" message stays the latest update across both cycles.
    let updates_mock = telegram.mock(|when, then| {
        when.method(GET).path("/bot123:abc/getUpdates");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "ok": true,
                "result": [
                    {"update_id": 900, "message": {"message_id": 55, "text": "CHECK"}}
                ]
            }));
    });

    let status_send_mock = telegram.mock(|when, then| {
        when.method(POST)
            .path("/bot123:abc/sendMessage")
            .body_contains("chat_id=42")
            .body_contains("run+1+full+cycles");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"ok": true, "result": {}}));
    });

    let config = build_config(&target.url("/ajax/lookup.php"), &telegram.base_url());
    let query_service = HttpQueryService::new(&config.target, config.request_timeout())?;
    let notifier = TelegramNotifier::new(&config.telegram, config.request_timeout())?;
    let mut poll = PollLoop::new(
        query_service,
        notifier,
        config.id_range(),
        config.scan.marker.clone(),
    );

    let first = poll.run_cycle().await?;
    let second = poll.run_cycle().await?;

    assert!(first.status_replied);
    assert!(!second.status_replied);

    // Each identifier queried once per cycle, both cycles.
    id1.assert_hits(2);
    id2.assert_hits(2);
    id3.assert_hits(2);
    updates_mock.assert_hits(2);
    // Exactly one status reply despite the command staying visible.
    status_send_mock.assert_hits(1);

    Ok(())
}
