pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use service_core::axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use service_core::middleware::{
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::config::OrgConfig;
use crate::services::{
    AuthService, IdentityStore, JwtService, MembershipGate, OrganizationStore,
};
use service_core::error::AppError;
use std::sync::Arc;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::auth::sign_up,
        handlers::auth::sign_in,
        handlers::auth::refresh_token,
        handlers::organization::create_organization,
        handlers::organization::list_organizations,
        handlers::organization::get_organization,
        handlers::organization::update_organization,
        handlers::organization::delete_organization,
        handlers::organization::invite_user,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::MessageResponse,
            dtos::auth::SignUpRequest,
            dtos::auth::SignInRequest,
            dtos::auth::RefreshRequest,
            dtos::auth::AuthResponse,
            dtos::organization::CreateOrganizationRequest,
            dtos::organization::UpdateOrganizationRequest,
            dtos::organization::InviteRequest,
            dtos::organization::OrganizationCreatedResponse,
            dtos::organization::OrganizationDetails,
            dtos::organization::OrganizationUpdatedResponse,
            dtos::organization::OrganizationResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-up, sign-in and token refresh"),
        (name = "Organization", description = "Organizations and invitations"),
        (name = "Observability", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: OrgConfig,
    pub jwt: JwtService,
    pub identities: Arc<dyn IdentityStore>,
    pub organizations: Arc<dyn OrganizationStore>,
    pub auth_service: AuthService,
    pub membership: MembershipGate,
}

impl AppState {
    /// Wire the core services over the given stores.
    pub fn new(
        config: OrgConfig,
        jwt: JwtService,
        identities: Arc<dyn IdentityStore>,
        organizations: Arc<dyn OrganizationStore>,
    ) -> Self {
        Self {
            auth_service: AuthService::new(identities.clone(), jwt.clone()),
            membership: MembershipGate::new(jwt.clone(), organizations.clone()),
            config,
            jwt,
            identities,
            organizations,
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, AppError> {
    let origins = allowed_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
        })
        .collect::<Result<Vec<HeaderValue>, AppError>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    let api_routes = Router::new()
        .route(
            "/api/organization",
            post(handlers::create_organization).get(handlers::list_organizations),
        )
        .route(
            "/api/organization/:organization_id",
            get(handlers::get_organization)
                .put(handlers::update_organization)
                .delete(handlers::delete_organization),
        )
        .route(
            "/api/organization/:organization_id/invite",
            post(handlers::invite_user),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let cors = cors_layer(&state.config.security.allowed_origins)?;

    let app = Router::new()
        .route("/health", get(health_check))
        .route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route("/auth/signup", post(handlers::sign_up))
        .route("/auth/signin", post(handlers::sign_in))
        .route("/auth/refresh-token", post(handlers::refresh_token))
        .merge(api_routes)
        .with_state(state)
        // Add tracing layer
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &service_core::axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        // Add security headers middleware
        .layer(from_fn(security_headers_middleware))
        .layer(cors);

    Ok(app)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 500, description = "Store is unreachable", body = dtos::ErrorResponse)
    ),
    tag = "Observability"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.organizations.health_check().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "store": "up"
        }
    })))
}
