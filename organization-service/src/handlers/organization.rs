use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{
        organization::{
            CreateOrganizationRequest, InviteRequest, OrganizationCreatedResponse,
            OrganizationDetails, OrganizationResponse, OrganizationUpdatedResponse,
            UpdateOrganizationRequest,
        },
        ErrorResponse, MessageResponse,
    },
    middleware::{AuthUser, InvitedMember},
    models::Organization,
    services::ServiceError,
    utils::{normalize_email, ValidatedJson},
    AppState,
};

/// Create an organization. The creator is invited to it.
#[utoipa::path(
    post,
    path = "/api/organization",
    request_body = CreateOrganizationRequest,
    responses(
        (status = 201, description = "Organization created", body = OrganizationCreatedResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Organization",
    security(("bearer_auth" = []))
)]
pub async fn create_organization(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateOrganizationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut org = Organization::new(req.name, req.description);
    org.invite(normalize_email(&claims.email));

    let org = state.organizations.create_organization(org).await?;

    tracing::info!(organization_id = %org.id, "Organization created");

    Ok((
        StatusCode::CREATED,
        Json(OrganizationCreatedResponse {
            organization_id: org.id,
        }),
    ))
}

/// List the organizations the caller is invited to
#[utoipa::path(
    get,
    path = "/api/organization",
    responses(
        (status = 200, description = "Organizations visible to the caller", body = [OrganizationResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Organization",
    security(("bearer_auth" = []))
)]
pub async fn list_organizations(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&claims.email);
    let orgs = state.organizations.list_organizations().await?;

    Ok(Json(
        orgs.into_iter()
            .filter(|org| org.is_invited(&email))
            .map(OrganizationResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Read an organization. Only invited members may see it.
#[utoipa::path(
    get,
    path = "/api/organization/{organization_id}",
    params(("organization_id" = String, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Organization details", body = OrganizationDetails),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "User is not invited to the organization", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Organization",
    security(("bearer_auth" = []))
)]
pub async fn get_organization(
    State(state): State<AppState>,
    member: InvitedMember,
) -> Result<impl IntoResponse, AppError> {
    // Deleted between the gate and this read.
    let org = state
        .organizations
        .find_organization_by_id(&member.organization_id)
        .await?
        .ok_or(ServiceError::OrganizationNotFound)?;

    Ok(Json(OrganizationDetails::from(org)))
}

/// Replace an organization's name and description. Members only.
#[utoipa::path(
    put,
    path = "/api/organization/{organization_id}",
    params(("organization_id" = String, Path, description = "Organization ID")),
    request_body = UpdateOrganizationRequest,
    responses(
        (status = 200, description = "Organization updated", body = OrganizationUpdatedResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "User is not invited to the organization", body = ErrorResponse),
        (status = 404, description = "Organization not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Organization",
    security(("bearer_auth" = []))
)]
pub async fn update_organization(
    State(state): State<AppState>,
    member: InvitedMember,
    ValidatedJson(req): ValidatedJson<UpdateOrganizationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let org = state
        .organizations
        .update_organization(&member.organization_id, req.into())
        .await?
        .ok_or(ServiceError::OrganizationNotFound)?;

    tracing::info!(organization_id = %org.id, "Organization updated");

    Ok(Json(OrganizationUpdatedResponse::from(org)))
}

/// Delete an organization. Members only.
#[utoipa::path(
    delete,
    path = "/api/organization/{organization_id}",
    params(("organization_id" = String, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Organization deleted successfully", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "User is not invited to the organization", body = ErrorResponse),
        (status = 404, description = "Organization not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Organization",
    security(("bearer_auth" = []))
)]
pub async fn delete_organization(
    State(state): State<AppState>,
    member: InvitedMember,
) -> Result<impl IntoResponse, AppError> {
    if !state
        .organizations
        .delete_organization(&member.organization_id)
        .await?
    {
        return Err(ServiceError::OrganizationNotFound.into());
    }

    tracing::info!(organization_id = %member.organization_id, "Organization deleted");

    Ok(Json(MessageResponse::new("Organization deleted successfully")))
}

/// Add an email to an organization's invited set. Members only.
#[utoipa::path(
    post,
    path = "/api/organization/{organization_id}/invite",
    params(("organization_id" = String, Path, description = "Organization ID")),
    request_body = InviteRequest,
    responses(
        (status = 200, description = "User invited to organization", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "User is not invited to the organization", body = ErrorResponse),
        (status = 404, description = "Organization not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Organization",
    security(("bearer_auth" = []))
)]
pub async fn invite_user(
    State(state): State<AppState>,
    member: InvitedMember,
    ValidatedJson(req): ValidatedJson<InviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .organizations
        .add_invite(&member.organization_id, &normalize_email(&req.user_email))
        .await?;

    tracing::info!(organization_id = %member.organization_id, "User invited to organization");

    Ok(Json(MessageResponse::new("User invited to organization")))
}
