mod common;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::gate_for;
use kvgate::transport::{KeyQuery, KeyValue};

#[tokio::test]
async fn requests_without_session_carry_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"username": "bob", "type": "user"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let t = gate_for(&server, None);

    let profile = t.gate.api.register("bob", "pw").await.unwrap();
    assert_eq!(profile.username.as_deref(), Some("bob"));
    assert_eq!(profile.user_type.as_deref(), Some("user"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn key_value_crud_sends_bearer_token() {
    let server = MockServer::start().await;
    let bearer = "Bearer tok-123";

    Mock::given(method("POST"))
        .and(path("/key-values"))
        .and(header("Authorization", bearer))
        .and(body_json(json!({"key": "db.host", "value": "localhost", "parentKey": "db"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            json!({"key": "db.host", "value": "localhost", "parentKey": "db"}),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/key-values"))
        .and(header("Authorization", bearer))
        .and(body_json(json!({"key": "db.host"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"key": "db.host", "value": "localhost"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/key-values"))
        .and(header("Authorization", bearer))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"key": "db.host", "value": "10.0.0.1"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/key-values"))
        .and(header("Authorization", bearer))
        .and(body_json(json!({"key": "db.host"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = gate_for(&server, Some("tok-123"));
    let kv = t.gate.api.key_values();

    let created = kv
        .create(&KeyValue::new("db.host", "localhost").with_parent("db"))
        .await
        .unwrap();
    assert_eq!(created.parent_key.as_deref(), Some("db"));

    let fetched = kv.get("db.host").await.unwrap();
    assert_eq!(fetched, KeyValue::new("db.host", "localhost"));

    let updated = kv.update(&KeyValue::new("db.host", "10.0.0.1")).await.unwrap();
    assert_eq!(updated.value, "10.0.0.1");

    kv.delete("db.host").await.unwrap();
    assert!(t.gate.is_authenticated().await);
}

#[tokio::test]
async fn listing_pairs_and_keys() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/key-values/list"))
        .and(body_json(json!({"skip": 0, "limit": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"key": "a", "value": "1"},
            {"key": "b", "value": "2", "parentKey": "a"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/key-values/keys"))
        .and(body_json(json!({"skip": 0, "limit": 10, "prefix": "db."})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"key": "db.host"}, {"key": "db.port"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let t = gate_for(&server, Some("tok-123"));
    let kv = t.gate.api.key_values();

    let pairs = kv.list(0, 2).await.unwrap();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[1].parent_key.as_deref(), Some("a"));

    let keys = kv.keys(&KeyQuery::default().with_prefix("db.")).await.unwrap();
    assert_eq!(keys, vec!["db.host", "db.port"]);
}

#[tokio::test]
async fn account_maintenance_goes_through_interceptor() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/me"))
        .and(header("Authorization", "Bearer tok-123"))
        .and(body_json(json!({"username": "alice", "password": "new-pw"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"username": "alice", "type": "admin"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/me"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = gate_for(&server, Some("tok-123"));

    let profile = t.gate.api.change_password("alice", "new-pw").await.unwrap();
    assert_eq!(profile.user_type.as_deref(), Some("admin"));

    t.gate.api.delete_account().await.unwrap();
    t.gate.logout().await;
    assert!(!t.gate.is_authenticated().await);
}
