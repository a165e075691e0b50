//! Organization routes: bearer authentication and the invitation gate.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn api_requires_bearer_token() {
    let app = TestApp::spawn().await;

    let missing = app.get("/api/organization", None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["error"], "Missing Authorization header");

    let invalid = app.get("/api/organization", Some("not-a-token")).await;
    assert_eq!(invalid.status, StatusCode::UNAUTHORIZED);
    assert_eq!(invalid.body["error"], "Invalid token");
}

#[tokio::test]
async fn refresh_token_is_not_a_bearer_credential() {
    let app = TestApp::spawn().await;
    let session = app.sign_up("Ana", "a@x.com", "longenough1").await;
    let refresh = session.body["refresh_token"].as_str().unwrap();

    let res = app.get("/api/organization", Some(refresh)).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn creator_can_read_own_organization() {
    let app = TestApp::spawn().await;
    let token = app.access_token_for("Ana", "a@x.com").await;
    let org_id = app.create_organization(&token, "Acme").await;

    let res = app
        .get(&format!("/api/organization/{}", org_id), Some(&token))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["id"], org_id.as_str());
    assert_eq!(res.body["name"], "Acme");
    assert_eq!(res.body["description"], "Acme description");
}

#[tokio::test]
async fn invitation_gates_read_access() {
    let app = TestApp::spawn().await;
    let owner = app.access_token_for("Ana", "a@x.com").await;
    let bob = app.access_token_for("Bob", "b@x.com").await;
    let carol = app.access_token_for("Carol", "c@x.com").await;
    let org_id = app.create_organization(&owner, "R").await;
    let uri = format!("/api/organization/{}", org_id);

    let before = app.get(&uri, Some(&bob)).await;
    assert_eq!(before.status, StatusCode::FORBIDDEN);
    assert_eq!(before.body["error"], "User is not invited to the organization");

    let invite = app
        .post(
            &format!("{}/invite", uri),
            Some(&owner),
            json!({ "user_email": "B@x.com" }),
        )
        .await;
    assert_eq!(invite.status, StatusCode::OK);
    assert_eq!(invite.body["message"], "User invited to organization");

    assert_eq!(app.get(&uri, Some(&bob)).await.status, StatusCode::OK);
    assert_eq!(app.get(&uri, Some(&carol)).await.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn repeated_invite_is_idempotent() {
    let app = TestApp::spawn().await;
    let owner = app.access_token_for("Ana", "a@x.com").await;
    let org_id = app.create_organization(&owner, "R").await;
    let invite_uri = format!("/api/organization/{}/invite", org_id);

    for _ in 0..2 {
        let res = app
            .post(&invite_uri, Some(&owner), json!({ "user_email": "b@x.com" }))
            .await;
        assert_eq!(res.status, StatusCode::OK);
    }

    let list = app.get("/api/organization", Some(&owner)).await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body[0]["invited_emails"], json!(["a@x.com", "b@x.com"]));
}

#[tokio::test]
async fn unknown_organization_is_denied() {
    let app = TestApp::spawn().await;
    let token = app.access_token_for("Ana", "a@x.com").await;

    let read = app.get("/api/organization/does-not-exist", Some(&token)).await;
    assert_eq!(read.status, StatusCode::FORBIDDEN);

    let invite = app
        .post(
            "/api/organization/does-not-exist/invite",
            Some(&token),
            json!({ "user_email": "b@x.com" }),
        )
        .await;
    assert_eq!(invite.status, StatusCode::FORBIDDEN);

    let delete = app
        .request(
            Method::DELETE,
            "/api/organization/does-not-exist",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_and_delete_organization() {
    let app = TestApp::spawn().await;
    let token = app.access_token_for("Ana", "a@x.com").await;
    let org_id = app.create_organization(&token, "Acme").await;
    let uri = format!("/api/organization/{}", org_id);

    let updated = app
        .request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "name": "Acme Corp", "description": "Bigger rockets" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["organization_id"], org_id.as_str());
    assert_eq!(updated.body["name"], "Acme Corp");
    assert_eq!(updated.body["description"], "Bigger rockets");

    let deleted = app.request(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Organization deleted successfully");

    let again = app.request(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(again.status, StatusCode::FORBIDDEN);

    let list = app.get("/api/organization", Some(&token)).await;
    assert_eq!(list.body, json!([]));
}

#[tokio::test]
async fn invalid_organization_payloads_are_unprocessable() {
    let app = TestApp::spawn().await;
    let token = app.access_token_for("Ana", "a@x.com").await;

    let empty_name = app
        .post(
            "/api/organization",
            Some(&token),
            json!({ "name": "", "description": "x" }),
        )
        .await;
    assert_eq!(empty_name.status, StatusCode::UNPROCESSABLE_ENTITY);

    let org_id = app.create_organization(&token, "Acme").await;
    let bad_invite = app
        .post(
            &format!("/api/organization/{}/invite", org_id),
            Some(&token),
            json!({ "user_email": "nope" }),
        )
        .await;
    assert_eq!(bad_invite.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn non_member_cannot_change_organization() {
    let app = TestApp::spawn().await;
    let owner = app.access_token_for("Ana", "a@x.com").await;
    let mallory = app.access_token_for("Mallory", "m@x.com").await;
    let org_id = app.create_organization(&owner, "Secret").await;
    let uri = format!("/api/organization/{}", org_id);

    let self_invite = app
        .post(
            &format!("{}/invite", uri),
            Some(&mallory),
            json!({ "user_email": "m@x.com" }),
        )
        .await;
    assert_eq!(self_invite.status, StatusCode::FORBIDDEN);
    assert_eq!(app.get(&uri, Some(&mallory)).await.status, StatusCode::FORBIDDEN);

    let update = app
        .request(
            Method::PUT,
            &uri,
            Some(&mallory),
            Some(json!({ "name": "Owned", "description": "x" })),
        )
        .await;
    assert_eq!(update.status, StatusCode::FORBIDDEN);

    let delete = app.request(Method::DELETE, &uri, Some(&mallory), None).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let read = app.get(&uri, Some(&owner)).await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.body["name"], "Secret");
}

#[tokio::test]
async fn invited_member_can_manage_organization() {
    let app = TestApp::spawn().await;
    let owner = app.access_token_for("Ana", "a@x.com").await;
    let bob = app.access_token_for("Bob", "b@x.com").await;
    let org_id = app.create_organization(&owner, "Shared").await;
    let uri = format!("/api/organization/{}", org_id);

    app.post(
        &format!("{}/invite", uri),
        Some(&owner),
        json!({ "user_email": "b@x.com" }),
    )
    .await;

    let invite = app
        .post(
            &format!("{}/invite", uri),
            Some(&bob),
            json!({ "user_email": "c@x.com" }),
        )
        .await;
    assert_eq!(invite.status, StatusCode::OK);

    let update = app
        .request(
            Method::PUT,
            &uri,
            Some(&bob),
            Some(json!({ "name": "Shared v2", "description": "x" })),
        )
        .await;
    assert_eq!(update.status, StatusCode::OK);
    assert_eq!(update.body["name"], "Shared v2");
}

#[tokio::test]
async fn list_shows_only_organizations_caller_is_invited_to() {
    let app = TestApp::spawn().await;
    let ana = app.access_token_for("Ana", "a@x.com").await;
    let bob = app.access_token_for("Bob", "b@x.com").await;
    let ana_org = app.create_organization(&ana, "Ana Co").await;
    app.create_organization(&bob, "Bob Co").await;

    let list = app.get("/api/organization", Some(&ana)).await;
    assert_eq!(list.status, StatusCode::OK);
    let orgs = list.body.as_array().unwrap();
    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0]["id"], ana_org.as_str());
    assert_eq!(orgs[0]["name"], "Ana Co");
}
