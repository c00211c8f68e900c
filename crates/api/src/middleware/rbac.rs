//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`], runs the request through the central
//! [`authorize`] gate, and records the decision in the audit trail before
//! either admitting the request or rejecting it. Use these in route handlers
//! to enforce authorization at the type level.
//!
//! Every decision is audited, including passes, so the trail shows who
//! reached what, not only who was turned away.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use snagtrack_core::audit::{outcomes, AuditEvent};
use snagtrack_core::error::CoreError;
use snagtrack_core::roles::{authorize, AuthzDecision, Role};

use super::auth::{client_ip, AuthUser};
use crate::error::AppError;
use crate::state::AppState;

/// Run the authorization gate for `required`, audit the decision, and return
/// the authenticated user on a pass.
async fn gate(
    parts: &mut Parts,
    state: &AppState,
    required: Role,
) -> Result<AuthUser, AppError> {
    let operation = format!("{} {}", parts.method, parts.uri.path());
    let ip = client_ip(parts);

    // A missing or invalid token is an unauthenticated request, not an
    // error: the gate decides what happens to it.
    let user = AuthUser::from_request_parts(parts, state).await.ok();
    let identity = user.as_ref().map(AuthUser::identity);

    let decision = authorize(identity.as_ref(), required);
    let outcome = match decision {
        AuthzDecision::Pass => outcomes::PASS,
        AuthzDecision::RedirectLogin => outcomes::REDIRECT_LOGIN,
        AuthzDecision::Denied => outcomes::DENIED,
    };
    state
        .audit
        .record(AuditEvent::authz(
            user.as_ref().map(|u| u.user_id),
            user.as_ref().map(|u| u.username.clone()),
            operation,
            outcome,
            ip,
        ))
        .await;

    match (decision, user) {
        (AuthzDecision::Pass, Some(user)) => Ok(user),
        (AuthzDecision::Pass, None) | (AuthzDecision::RedirectLogin, _) => Err(AppError::Core(
            CoreError::Unauthorized("Login required".into()),
        )),
        (AuthzDecision::Denied, _) => Err(AppError::Core(CoreError::Forbidden(format!(
            "{} role required",
            required.as_str()
        )))),
    }
}

/// Requires the `engineer` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn engineer_only(RequireEngineer(user): RequireEngineer) -> AppResult<Json<()>> {
///     // user is guaranteed to be an engineer here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireEngineer(pub AuthUser);

impl FromRequestParts<AppState> for RequireEngineer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = gate(parts, state, Role::Engineer).await?;
        Ok(RequireEngineer(user))
    }
}

/// Requires the `manager` role. Rejects with 403 Forbidden otherwise.
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = gate(parts, state, Role::Manager).await?;
        Ok(RequireManager(user))
    }
}

/// Requires the `viewer` role. Rejects with 403 Forbidden otherwise.
pub struct RequireViewer(pub AuthUser);

impl FromRequestParts<AppState> for RequireViewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = gate(parts, state, Role::Viewer).await?;
        Ok(RequireViewer(user))
    }
}
