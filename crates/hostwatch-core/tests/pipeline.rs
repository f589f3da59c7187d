//! End-to-end behaviour of the request/response pipeline against a local
//! backend.

mod common;

use std::time::Duration;

use axum::http::Method;
use futures::future::join_all;
use serde_json::json;

use hostwatch_core::api::classifier::{
    GENERIC_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE, RATE_LIMITED_MESSAGE, SERVER_ERROR_MESSAGE,
};
use hostwatch_core::auth::{CredentialStore, MemoryCredentialStore, SESSION_EXPIRED_MESSAGE, USER_KEY};
use hostwatch_core::{ApiError, Classification, ClientConfig, Severity};

use common::{truncated_backend, unreachable_base_url, Backend, Harness, Route};

fn logged_in(token: &str) -> MemoryCredentialStore {
    let store = MemoryCredentialStore::with_token(token);
    store
        .set(USER_KEY, r#"{"id": 1, "username": "admin", "created_at": null}"#)
        .unwrap();
    store
}

#[tokio::test]
async fn test_get_server_with_token_succeeds_without_side_effects() {
    let backend = Backend::start(vec![Route::new(
        Method::GET,
        "/api/servers/42",
        200,
        json!({"id": 42, "ip_address": "10.0.0.42", "port": 22, "username": "root"}),
    )])
    .await;
    let h = Harness::new(&backend.base_url, logged_in("t1"), "/servers");

    let response = h.client.servers().get(42).await.expect("request should succeed");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["ip_address"], "10.0.0.42");

    let seen = backend.last_request();
    assert_eq!(seen.authorization.as_deref(), Some("Bearer t1"));
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));

    assert!(h.notifier.messages().is_empty());
    assert!(h.navigator.redirects().is_empty());
    assert_eq!(h.store.token().unwrap().as_deref(), Some("t1"));
}

#[tokio::test]
async fn test_request_without_token_has_no_authorization() {
    let backend = Backend::start(vec![Route::new(Method::GET, "/api/servers", 200, json!([]))]).await;
    let h = Harness::new(&backend.base_url, MemoryCredentialStore::new(), "/");

    h.client.servers().list().await.unwrap();

    assert_eq!(backend.last_request().authorization, None);
}

#[tokio::test]
async fn test_401_clears_session_redirects_and_still_rejects() {
    let backend = Backend::start(vec![Route::new(
        Method::POST,
        "/api/servers/5/check",
        401,
        json!({"message": "Token has expired"}),
    )])
    .await;
    let h = Harness::new(&backend.base_url, logged_in("t1"), "/servers/5");

    let err = h.client.servers().check(5).await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    assert_eq!(err.message(), Some("Token has expired"));
    assert!(h.store.is_empty(), "token and user must both be cleared");
    assert_eq!(h.navigator.redirects(), vec!["/login".to_string()]);
    assert_eq!(h.notifier.messages(), vec![SESSION_EXPIRED_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_401_on_login_view_clears_silently() {
    let backend = Backend::start(vec![Route::new(
        Method::GET,
        "/api/auth/me",
        401,
        json!({"message": "Token is missing"}),
    )])
    .await;
    let h = Harness::new(&backend.base_url, logged_in("stale"), "/login");

    let err = h.client.auth().me().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(h.store.is_empty());
    assert!(h.navigator.redirects().is_empty());
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_concurrent_401s_redirect_once() {
    let backend = Backend::start(vec![
        Route::new(Method::GET, "/api/servers", 401, json!({"message": "Token has expired"})),
        Route::new(Method::GET, "/api/servers/1", 401, json!({"message": "Token has expired"})),
        Route::new(Method::POST, "/api/servers/check-all", 401, json!({"message": "Token has expired"})),
    ])
    .await;
    let h = Harness::new(&backend.base_url, logged_in("t1"), "/servers");
    let servers = h.client.servers();

    let (list, one, all) = tokio::join!(servers.list(), servers.get(1), servers.check_all());

    for outcome in [list, one, all] {
        assert!(outcome.unwrap_err().is_unauthorized());
    }
    assert!(h.store.is_empty());
    assert_eq!(h.navigator.redirects().len(), 1);
    assert_eq!(h.notifier.messages(), vec![SESSION_EXPIRED_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_many_parallel_401s_redirect_once() {
    let backend = Backend::start(vec![Route::new(
        Method::GET,
        "/api/servers/9",
        401,
        json!({"message": "Token has expired"}),
    )])
    .await;
    let h = Harness::new(&backend.base_url, logged_in("t1"), "/servers/9");
    let servers = h.client.servers();

    let outcomes = join_all((0..10).map(|_| servers.get(9))).await;

    assert!(outcomes.iter().all(|o| matches!(o, Err(e) if e.is_unauthorized())));
    assert_eq!(h.navigator.redirects().len(), 1);
    assert_eq!(h.notifier.messages().len(), 1);
}

#[tokio::test]
async fn test_no_connectivity_is_network_unreachable() {
    let base_url = unreachable_base_url();
    let h = Harness::new(&base_url, logged_in("t1"), "/servers");

    let err = h.client.servers().list().await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.status(), None);
    assert_eq!(err.classification(), Some(Classification::NetworkUnreachable));

    let notes = h.notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, NETWORK_ERROR_MESSAGE);
    assert_eq!(notes[0].severity, Severity::Error);

    assert_eq!(h.store.token().unwrap().as_deref(), Some("t1"));
    assert!(h.navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_401_with_cut_off_body_still_ends_session() {
    let base_url = truncated_backend(
        "HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\nContent-Length: 200\r\nConnection: close\r\n\r\n",
        r#"{"message":"#,
    )
    .await;
    let h = Harness::new(&base_url, logged_in("t1"), "/servers");

    let err = h.client.servers().list().await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    assert_eq!(err.message(), None);
    assert_eq!(err.classification(), Some(Classification::Unauthenticated));
    assert!(h.store.is_empty());
    assert_eq!(h.navigator.redirects(), vec!["/login".to_string()]);
    assert_eq!(h.notifier.messages(), vec![SESSION_EXPIRED_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_timeout_is_reported_as_no_response() {
    let backend = Backend::start(vec![Route::new(
        Method::GET,
        "/api/servers/1/system-info",
        200,
        json!({"os": "Linux"}),
    )
    .delayed(Duration::from_secs(2))])
    .await;
    let config = ClientConfig {
        base_url: backend.base_url.clone(),
        timeout: Some(Duration::from_millis(200)),
        ..ClientConfig::default()
    };
    let h = Harness::with_config(config, logged_in("t1"), "/servers/1");

    let err = h.client.servers().system_info(1).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.classification(), Some(Classification::NetworkUnreachable));
    assert_eq!(h.notifier.messages(), vec![NETWORK_ERROR_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_rate_limited_check_port() {
    let backend = Backend::start(vec![Route::new(
        Method::POST,
        "/api/servers/3/check-port",
        429,
        json!({"message": "Rate limit exceeded"}),
    )])
    .await;
    let h = Harness::new(&backend.base_url, logged_in("t1"), "/servers/3");

    let err = h.client.servers().check_port(3).await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(429));
    assert_eq!(err.classification(), Some(Classification::RateLimited));
    assert_eq!(h.notifier.messages(), vec![RATE_LIMITED_MESSAGE.to_string()]);
    assert_eq!(h.store.token().unwrap().as_deref(), Some("t1"));
    assert!(h.store.get(USER_KEY).unwrap().is_some());
}

#[tokio::test]
async fn test_server_error_and_other_statuses() {
    let backend = Backend::start(vec![
        Route::new(
            Method::GET,
            "/api/servers/2/system-info",
            500,
            json!({"message": "Failed to get system information"}),
        ),
        Route::new(
            Method::POST,
            "/api/servers",
            400,
            json!({"message": "IP address, username, and password are required"}),
        ),
        Route::new(Method::PUT, "/api/servers/2", 409, json!({})),
    ])
    .await;
    let h = Harness::new(&backend.base_url, logged_in("t1"), "/servers");

    let err = h.client.servers().system_info(2).await.unwrap_err();
    // Callers still see the server's own message
    assert_eq!(err.message(), Some("Failed to get system information"));

    let input = hostwatch_core::models::ServerInput {
        ip_address: String::new(),
        port: 22,
        username: String::new(),
        password: String::new(),
        notes: None,
    };
    h.client.servers().create(&input).await.unwrap_err();
    h.client
        .servers()
        .update(2, &hostwatch_core::models::ServerUpdate::default())
        .await
        .unwrap_err();

    assert_eq!(
        h.notifier.messages(),
        vec![
            SERVER_ERROR_MESSAGE.to_string(),
            "IP address, username, and password are required".to_string(),
            GENERIC_ERROR_MESSAGE.to_string(),
        ]
    );
}

#[tokio::test]
async fn test_minimal_variant_only_handles_session_expiry() {
    let backend = Backend::start(vec![
        Route::new(Method::GET, "/api/servers/404", 404, json!({"message": "Server not found"})),
        Route::new(Method::DELETE, "/api/servers/1", 401, json!({"message": "Token has expired"})),
    ])
    .await;
    let config = ClientConfig {
        base_url: backend.base_url.clone(),
        ..ClientConfig::minimal()
    };
    let h = Harness::with_config(config, logged_in("t1"), "/servers");

    let err = h.client.servers().get(404).await.unwrap_err();
    assert_eq!(err.classification(), Some(Classification::NotFound));
    assert!(h.notifier.messages().is_empty());

    h.client.servers().delete(1).await.unwrap_err();
    assert!(h.store.is_empty());
    assert_eq!(h.navigator.redirects(), vec!["/login".to_string()]);
    assert!(h.notifier.messages().is_empty());
}
