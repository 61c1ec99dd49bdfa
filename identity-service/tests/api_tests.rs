mod common;

use auth::ClaimSet;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

fn expires_at(body: &serde_json::Value) -> DateTime<Utc> {
    body["data"]["expires_at"]
        .as_str()
        .expect("expires_at missing")
        .parse()
        .expect("expires_at is not RFC 3339")
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/auth/register")
        .json(&json!({
            "name": "Ana",
            "email": "ana@x.com",
            "password": "secret1"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["name"], "Ana");
    assert_eq!(body["data"]["email"], "ana@x.com");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;
    app.register("Ana", "ana@x.com", "secret1").await;

    let response = app
        .post("/api/v1/auth/register")
        .json(&json!({
            "name": "Another Ana",
            "email": "ana@x.com",
            "password": "secret2"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::spawn().await;

    for payload in [
        json!({ "name": "   ", "email": "ana@x.com", "password": "secret1" }),
        json!({ "name": "Ana", "email": "not-an-email", "password": "secret1" }),
        json!({ "name": "Ana", "email": "", "password": "secret1" }),
        json!({ "name": "Ana", "email": "ana@x.com", "password": "12345" }),
    ] {
        let response = app
            .post("/api/v1/auth/register")
            .json(&payload)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
    }
}

#[tokio::test]
async fn test_register_rejects_undecodable_body() {
    let app = TestApp::spawn().await;

    for payload in [
        json!({ "name": "Ana", "email": "ana@x.com" }),
        json!({ "name": "Ana", "email": "ana@x.com", "password": 123456 }),
        json!({ "name": ["Ana"], "email": "ana@x.com", "password": "secret1" }),
    ] {
        let response = app
            .post("/api/v1/auth/register")
            .json(&payload)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload {}", payload);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["status_code"], 400);
        assert!(body["data"]["message"]
            .as_str()
            .unwrap()
            .starts_with("invalid JSON body"));
    }

    let response = app
        .post("/api/v1/auth/register")
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_and_refresh_reject_undecodable_body() {
    let app = TestApp::spawn().await;

    for (path, payload) in [
        ("/api/v1/auth/login", json!({ "email": "ana@x.com" })),
        ("/api/v1/auth/login", json!({ "email": "ana@x.com", "password": 42 })),
        ("/api/v1/auth/refresh", json!({})),
    ] {
        let response = app
            .post(path)
            .json(&payload)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} {}", path, payload);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        assert!(body["data"]["message"]
            .as_str()
            .unwrap()
            .starts_with("invalid JSON body"));
    }
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    let user_id = app.register("Ana", "ana@x.com", "secret1").await;

    let response = app.login("ana@x.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(expires_at(&body), TestApp::t0() + Duration::hours(24));

    let claims = app
        .authenticator
        .decode_token(body["data"]["token"].as_str().unwrap())
        .expect("issued token does not decode");
    assert_eq!(claims.subject, user_id);
    assert_eq!(claims.email, "ana@x.com");
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = TestApp::spawn().await;
    app.register("Ana", "ana@x.com", "secret1").await;

    let wrong_password = app.login("ana@x.com", "secret2").await;
    let unknown_email = app.login("ben@x.com", "secret1").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let wrong_password: serde_json::Value = wrong_password.json().await.unwrap();
    let unknown_email: serde_json::Value = unknown_email.json().await.unwrap();
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["data"]["message"], "invalid credentials");
}

#[tokio::test]
async fn test_me_returns_identity() {
    let app = TestApp::spawn().await;
    let user_id = app.register("Ana", "ana@x.com", "secret1").await;
    let token = app.login_token("ana@x.com", "secret1").await;

    let response = app
        .get_authenticated("/api/v1/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["user_id"], user_id.as_str());
}

#[tokio::test]
async fn test_gate_follows_token_expiry() {
    let app = TestApp::spawn().await;
    app.register("Ana", "ana@x.com", "secret1").await;
    let token = app.login_token("ana@x.com", "secret1").await;

    app.advance_to(Duration::hours(23));
    let response = app
        .get_authenticated("/api/v1/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    app.advance_to(Duration::hours(25));
    let response = app
        .get_authenticated("/api/v1/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "invalid or expired token");
}

#[tokio::test]
async fn test_gate_rejects_missing_and_malformed_headers() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/v1/auth/me")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "missing authorization header");

    for value in ["Basic dXNlcjpwYXNz", "Bearer", "Token abc.def.ghi"] {
        let response = app
            .get("/api/v1/auth/me")
            .header(reqwest::header::AUTHORIZATION, value)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["data"]["message"], "invalid authorization header");
    }

    let response = app
        .get_authenticated("/api/v1/auth/me", "abc.def.ghi")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "invalid or expired token");
}

#[tokio::test]
async fn test_gate_rejects_forged_token() {
    let app = TestApp::spawn().await;

    let forged = auth::Authenticator::new(b"another-secret-key-at-least-32-bytes!!")
        .issue_token(&ClaimSet::new(
            "user-1",
            "ana@x.com",
            TestApp::t0(),
            Duration::hours(24),
        ))
        .unwrap();

    let response = app
        .get_authenticated("/api/v1/auth/me", &forged)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_inside_window() {
    let app = TestApp::spawn().await;
    app.register("Ana", "ana@x.com", "secret1").await;
    let token = app.login_token("ana@x.com", "secret1").await;

    app.advance_to(Duration::minutes(23 * 60 + 30));
    let response = app
        .post("/api/v1/auth/refresh")
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        expires_at(&body),
        TestApp::t0() + Duration::minutes(47 * 60 + 30)
    );

    let renewed = body["data"]["token"].as_str().unwrap();
    app.advance_to(Duration::hours(30));
    let response = app
        .get_authenticated("/api/v1/auth/me", renewed)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_of_expired_token_within_staleness() {
    let app = TestApp::spawn().await;
    app.register("Ana", "ana@x.com", "secret1").await;
    let token = app.login_token("ana@x.com", "secret1").await;

    app.advance_to(Duration::hours(72));
    let response = app
        .post("/api/v1/auth/refresh")
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(expires_at(&body), TestApp::t0() + Duration::hours(96));
}

#[tokio::test]
async fn test_refresh_outside_window() {
    let app = TestApp::spawn().await;
    app.register("Ana", "ana@x.com", "secret1").await;
    let token = app.login_token("ana@x.com", "secret1").await;

    app.advance_to(Duration::hours(10));
    let response = app
        .post("/api/v1/auth/refresh")
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "token not eligible for refresh yet");

    app.advance_to(Duration::hours(200));
    let response = app
        .post("/api/v1/auth/refresh")
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "token too old to refresh");
}

#[tokio::test]
async fn test_user_routes_require_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/v1/users")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post("/api/v1/users")
        .json(&json!({ "name": "Ben", "email": "ben@x.com", "password": "secret1" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_and_get_users() {
    let app = TestApp::spawn().await;
    let ana_id = app.register("Ana", "ana@x.com", "secret1").await;
    let token = app.login_token("ana@x.com", "secret1").await;

    let response = app
        .post_authenticated("/api/v1/users", &token)
        .json(&json!({ "name": "Ben", "email": "ben@x.com", "password": "secret1" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .get_authenticated("/api/v1/users?limit=1&offset=1", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "ben@x.com");

    let response = app
        .get_authenticated(&format!("/api/v1/users/{}", ana_id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Ana");
}

#[tokio::test]
async fn test_get_user_errors() {
    let app = TestApp::spawn().await;
    app.register("Ana", "ana@x.com", "secret1").await;
    let token = app.login_token("ana@x.com", "secret1").await;

    let response = app
        .get_authenticated("/api/v1/users/not-a-uuid", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .get_authenticated(&format!("/api/v1/users/{}", uuid::Uuid::now_v7()), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
