use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use predicates::prelude::*;

const TEST_KEY: &str = "sk_test_4eC39HqLyjWDarjtT1zdp7dc";

fn planrelay(api_url: &str) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("planrelay"));
    cmd.env("STRIPE_API_KEY", TEST_KEY)
        .env("PLANRELAY_API_URL", api_url)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_create_plan() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/v1/plans")
        .match_header("authorization", format!("Bearer {}", TEST_KEY).as_str())
        .match_header("idempotency-key", "create-gold-1")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), "gold".into()),
            Matcher::UrlEncoded("amount".into(), "2000".into()),
            Matcher::UrlEncoded("currency".into(), "usd".into()),
            Matcher::UrlEncoded("interval".into(), "month".into()),
            Matcher::UrlEncoded("interval_count".into(), "1".into()),
            Matcher::UrlEncoded("name".into(), "Gold".into()),
            Matcher::UrlEncoded("metadata[tier]".into(), "premium".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "gold",
                "object": "plan",
                "amount": 2000,
                "currency": "usd",
                "interval": "month",
                "interval_count": 1,
                "livemode": false,
                "created": 1700000000,
                "metadata": {"tier": "premium"},
                "name": "Gold"
            }"#,
        )
        .expect(1)
        .create();

    planrelay(&server.url())
        .args([
            "create",
            "gold",
            "--name",
            "Gold",
            "--amount",
            "2000",
            "--currency",
            "usd",
            "--interval",
            "month",
            "--metadata",
            "tier=premium",
            "--idempotency-key",
            "create-gold-1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "gold""#))
        .stdout(predicate::str::contains(r#""currency": "USD""#))
        .stdout(predicate::str::contains(r#""created": 1700000000"#));

    mock.assert();
}

#[test]
fn test_declined_card_is_reported_not_failed() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/v1/plans")
        .with_status(402)
        .with_header("content-type", "application/json")
        .with_header("request-id", "req_123")
        .with_body(
            r#"{"error": {
                "type": "card_error",
                "code": "card_declined",
                "message": "Your card was declined.",
                "charge": "ch_1"
            }}"#,
        )
        .expect(1)
        .create();

    planrelay(&server.url())
        .args([
            "create",
            "gold",
            "--name",
            "Gold",
            "--currency",
            "usd",
            "--interval",
            "month",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""error_type": "card""#))
        .stdout(predicate::str::contains(r#""code": "declined""#))
        .stdout(predicate::str::contains(r#""http_status_code": 402"#))
        .stdout(predicate::str::contains(r#""request_id": "req_123""#));

    mock.assert();
}

#[test]
fn test_invalid_request_makes_no_call() {
    let mut server = Server::new();

    let mock = server.mock("POST", "/v1/plans").expect(0).create();

    planrelay(&server.url())
        .args(["create", "gold", "--currency", "usd", "--interval", "month"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name is required to create a plan"));

    mock.assert();
}

#[test]
fn test_list_follows_pages() {
    let mut server = Server::new();

    let first = server
        .mock("GET", "/v1/plans")
        .match_query(Matcher::Exact("limit=2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"object": "list", "has_more": true, "data": [
                {"id": "basic", "currency": "usd", "interval": "month"},
                {"id": "gold", "currency": "usd", "interval": "month"}
            ]}"#,
        )
        .expect(1)
        .create();

    let second = server
        .mock("GET", "/v1/plans")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "2".into()),
            Matcher::UrlEncoded("starting_after".into(), "gold".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"object": "list", "has_more": false, "data": [
                {"id": "platinum", "currency": "eur", "interval": "year"}
            ]}"#,
        )
        .expect(1)
        .create();

    let output = planrelay(&server.url())
        .args(["list", "--limit", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let basic = stdout.find(r#""id": "basic""#).unwrap();
    let gold = stdout.find(r#""id": "gold""#).unwrap();
    let platinum = stdout.find(r#""id": "platinum""#).unwrap();
    assert!(basic < gold && gold < platinum);
    assert!(stdout.contains(r#""currency": "EUR""#));

    first.assert();
    second.assert();
}

#[test]
fn test_get_unknown_plan() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/v1/plans/missing")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"error": {
                "type": "invalid_request_error",
                "message": "No such plan: 'missing'",
                "param": "plan"
            }}"#,
        )
        .expect(1)
        .create();

    planrelay(&server.url())
        .args(["get", "missing"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""error_type": "invalid_request""#))
        .stdout(predicate::str::contains(r#""param": "plan""#));

    mock.assert();
}

#[test]
fn test_delete_plan() {
    let mut server = Server::new();

    let mock = server
        .mock("DELETE", "/v1/plans/gold")
        .match_header("stripe-account", "acct_42")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "gold", "object": "plan", "deleted": true}"#)
        .expect(1)
        .create();

    planrelay(&server.url())
        .args(["delete", "gold", "--account", "acct_42"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""deleted": true"#));

    mock.assert();
}

#[test]
fn test_unstructured_failures_retry_until_deadline() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/v1/plans/gold")
        .with_status(500)
        .with_body("upstream unavailable")
        .expect_at_least(2)
        .create();

    planrelay(&server.url())
        .args(["get", "gold", "--timeout", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("deadline exceeded"));

    mock.assert();
}

#[test]
fn test_rejects_malformed_api_key() {
    planrelay("http://127.0.0.1:1")
        .env("STRIPE_API_KEY", "not-a-key")
        .args(["get", "gold"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn test_missing_api_key() {
    let mut cmd = Command::new(cargo::cargo_bin!("planrelay"));
    cmd.env_remove("STRIPE_API_KEY")
        .args(["get", "gold"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key given"));
}
