//! Test helpers for organization-service integration tests.
//!
//! Builds the real router over the in-memory store and drives it in-process
//! with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use organization_service::{
    build_router,
    config::OrgConfig,
    services::{InMemoryStore, JwtService},
    AppState,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: InMemoryStore,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STORE_BACKEND", "memory"),
            ("SERVICE_NAME", "organization-service-test"),
            ("JWT_SECRET", TEST_JWT_SECRET),
        ]);
        let config = OrgConfig::from_lookup(service_core::config::Config::default(), |key| {
            vars.get(key).map(|v| v.to_string())
        })
        .expect("Failed to build test config");

        let jwt = JwtService::new(&config.jwt).expect("Failed to create JWT service");
        let store = InMemoryStore::new();
        let state = AppState::new(config, jwt, Arc::new(store.clone()), Arc::new(store.clone()));

        let router = build_router(state.clone())
            .await
            .expect("Failed to build router");

        TestApp {
            router,
            state,
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    /// Sign up and return the access token.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.post(
            "/auth/signup",
            None,
            json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }

    pub async fn access_token_for(&self, name: &str, email: &str) -> String {
        let res = self.sign_up(name, email, "longenough1").await;
        assert_eq!(res.status, StatusCode::CREATED, "sign-up failed: {}", res.body);
        res.body["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }

    /// Create an organization as `token`'s holder and return its id.
    pub async fn create_organization(&self, token: &str, name: &str) -> String {
        let res = self
            .post(
                "/api/organization",
                Some(token),
                json!({ "name": name, "description": format!("{} description", name) }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "create failed: {}", res.body);
        res.body["organization_id"]
            .as_str()
            .expect("organization_id missing")
            .to_string()
    }
}
