//! Sign-up, sign-in and refresh over HTTP.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn sign_up_returns_token_pair() {
    let app = TestApp::spawn().await;

    let res = app.sign_up("Ana", "a@x.com", "longenough1").await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["message"], "User created successfully");
    assert_eq!(res.body["token_type"], "Bearer");
    assert_eq!(res.body["expires_in"], 3600);
    assert!(!res.body["access_token"].as_str().unwrap().is_empty());
    assert!(!res.body["refresh_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_sign_up_conflicts() {
    let app = TestApp::spawn().await;
    app.sign_up("Ana", "a@x.com", "longenough1").await;

    let res = app.sign_up("Ana Again", "A@x.com", "longenough2").await;

    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_sign_up_is_unprocessable() {
    let app = TestApp::spawn().await;

    let short = app.sign_up("Ana", "a@x.com", "short").await;
    assert_eq!(short.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(short.body["details"].as_str().unwrap().contains("password"));

    let bad_email = app.sign_up("Ana", "not-an-email", "longenough1").await;
    assert_eq!(bad_email.status, StatusCode::UNPROCESSABLE_ENTITY);

    let no_name = app.sign_up("", "a@x.com", "longenough1").await;
    assert_eq!(no_name.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn sign_in_succeeds_with_correct_password() {
    let app = TestApp::spawn().await;
    app.sign_up("Ana", "a@x.com", "longenough1").await;

    let res = app
        .post(
            "/auth/signin",
            None,
            json!({ "email": "a@x.com", "password": "longenough1" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "SignIn successful");
    assert!(res.body["access_token"].is_string());
}

#[tokio::test]
async fn sign_in_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.sign_up("Ana", "a@x.com", "longenough1").await;

    let wrong_password = app
        .post(
            "/auth/signin",
            None,
            json!({ "email": "a@x.com", "password": "not-the-password" }),
        )
        .await;
    let unknown_email = app
        .post(
            "/auth/signin",
            None,
            json!({ "email": "nobody@x.com", "password": "longenough1" }),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body["error"], "Invalid credentials");
}

#[tokio::test]
async fn refresh_token_issues_new_pair() {
    let app = TestApp::spawn().await;
    let session = app.sign_up("Ana", "a@x.com", "longenough1").await;
    let refresh = session.body["refresh_token"].as_str().unwrap();

    let res = app
        .post("/auth/refresh-token", None, json!({ "token": refresh }))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Tokens refreshed");

    let claims = app
        .state
        .jwt
        .verify(res.body["access_token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.username, "Ana");
}

#[tokio::test]
async fn refresh_rejects_access_and_forged_tokens() {
    let app = TestApp::spawn().await;
    let session = app.sign_up("Ana", "a@x.com", "longenough1").await;
    let access = session.body["access_token"].as_str().unwrap();

    let with_access = app
        .post("/auth/refresh-token", None, json!({ "token": access }))
        .await;
    assert_eq!(with_access.status, StatusCode::UNAUTHORIZED);
    assert_eq!(with_access.body["error"], "Invalid token");

    let forged = app
        .post("/auth/refresh-token", None, json!({ "token": "a.b.c" }))
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert_eq!(forged.body["error"], "Invalid token");
}
