mod common;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{gate_for, stored_token};
use kvgate::transport::{PromptQuery, StrategyQuery, StrategyStatus, StrategyUpdate};

#[tokio::test]
async fn prompt_crud_sends_bearer_token() {
    let server = MockServer::start().await;
    let bearer = "Bearer tok-123";

    Mock::given(method("POST"))
        .and(path("/prompts"))
        .and(header("Authorization", bearer))
        .and(body_json(json!({"key": "greet", "value": "Hello {name}"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "key": "greet",
            "value": "Hello {name}",
            "created_at": "2024-05-01T08:30:00.123456",
            "updated_at": "2024-05-01T08:30:00.123456"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/prompts"))
        .and(query_param("key", "greet"))
        .and(header("Authorization", bearer))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"key": "greet", "value": "Hello {name}"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/prompts"))
        .and(body_json(json!({"key": "greet", "value": "Hi {name}"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"key": "greet", "value": "Hi {name}"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/prompts"))
        .and(body_json(json!({"key": "greet"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = gate_for(&server, Some("tok-123"));
    let prompts = t.gate.api.prompts();

    let created = prompts.create("greet", "Hello {name}").await.unwrap();
    assert!(created.created_at.is_some());

    let fetched = prompts.get("greet").await.unwrap();
    assert_eq!(fetched.value, "Hello {name}");
    assert_eq!(fetched.created_at, None);

    let updated = prompts.update("greet", "Hi {name}").await.unwrap();
    assert_eq!(updated.value, "Hi {name}");

    prompts.delete("greet").await.unwrap();
    assert!(t.gate.is_authenticated().await);
}

#[tokio::test]
async fn prompt_listing_and_missing_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prompts/list"))
        .and(body_json(json!({"skip": 0, "limit": 10, "prefix": "sys."})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"key": "sys.intro", "value": "You are"},
            {"key": "sys.outro", "value": "Goodbye"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/prompts/keys"))
        .and(body_json(json!({"skip": 5, "limit": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"key": "sys.intro"}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/prompts"))
        .and(query_param("key", "gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Prompt not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let t = gate_for(&server, Some("tok-123"));
    let prompts = t.gate.api.prompts();

    let listed = prompts
        .list(&PromptQuery::default().with_prefix("sys."))
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);

    let keys = prompts.keys(&PromptQuery::default().page(5, 5)).await.unwrap();
    assert_eq!(keys, vec!["sys.intro"]);

    let err = prompts.get("gone").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(t.gate.is_authenticated().await);
}

#[tokio::test]
async fn strategy_lifecycle() {
    let server = MockServer::start().await;
    let bearer = "Bearer tok-123";

    Mock::given(method("POST"))
        .and(path("/strategies"))
        .and(header("Authorization", bearer))
        .and(body_json(json!({"key": "rebalance", "value": "weekly"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "key": "rebalance",
            "value": "weekly",
            "status": "0",
            "user": "alice",
            "conversationId": null,
            "created_at": "2024-05-01T08:30:00",
            "updated_at": "2024-05-01T08:30:00"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/strategies"))
        .and(header("Authorization", bearer))
        .and(body_json(json!({"key": "rebalance", "status": "1", "conversationId": "conv-7"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "rebalance",
            "value": "weekly",
            "status": "1",
            "user": "alice",
            "conversationId": "conv-7"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/strategies"))
        .and(query_param("key", "rebalance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "rebalance",
            "value": "weekly",
            "status": "2",
            "user": "alice",
            "conversationId": "conv-7"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/strategies"))
        .and(body_json(json!({"key": "rebalance"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = gate_for(&server, Some("tok-123"));
    let strategies = t.gate.api.strategies();

    let created = strategies.create("rebalance", "weekly").await.unwrap();
    assert_eq!(created.status, StrategyStatus::NotStarted);
    assert_eq!(created.user.as_deref(), Some("alice"));
    assert_eq!(created.conversation_id, None);

    let started = strategies
        .update(
            &StrategyUpdate::new("rebalance")
                .with_status(StrategyStatus::Running)
                .with_conversation("conv-7"),
        )
        .await
        .unwrap();
    assert_eq!(started.conversation_id.as_deref(), Some("conv-7"));

    let finished = strategies.get("rebalance").await.unwrap();
    assert!(finished.status.is_done());

    strategies.delete("rebalance").await.unwrap();
}

#[tokio::test]
async fn strategy_listings_filter_and_expired_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/strategies/keys"))
        .and(body_json(json!({"skip": 0, "limit": 10, "status": "1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"key": "rebalance", "status": "1", "conversationId": "conv-7"},
            {"key": "hedge", "status": "1", "conversationId": "conv-9"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/strategies/list"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .expect(1)
        .mount(&server)
        .await;

    let t = gate_for(&server, Some("tok-123"));
    let strategies = t.gate.api.strategies();

    let running = strategies
        .keys(&StrategyQuery::default().with_status(StrategyStatus::Running))
        .await
        .unwrap();
    assert_eq!(running.len(), 2);
    assert_eq!(running[1].conversation_id.as_deref(), Some("conv-9"));

    let err = strategies.list(&StrategyQuery::default()).await.unwrap_err();
    assert!(err.is_rejected());
    assert!(!t.gate.is_authenticated().await);
    assert_eq!(stored_token(&t.storage), None);
    assert_eq!(t.navigator.visited(), vec!["login"]);
}
