use axum::Form;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Redirect;
use tower_sessions::Session;

use sweldo_application::AuthOutcome;
use sweldo_core::{AppError, SessionUser};
use sweldo_domain::home_path;

use crate::dto::LoginForm;
use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_USER_KEY;
use super::session_helpers::{extract_request_context, safe_return_target};

/// Sign-in form action.
///
/// Verifies credentials, resolves the active company for the fresh session
/// and lands the user on their home path (or the preserved `next` target).
pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Form(form): Form<LoginForm>,
) -> ApiResult<Redirect> {
    let (ip_address, user_agent) = extract_request_context(&headers);
    let outcome = state
        .user_service
        .login(&form.email, &form.password, ip_address, user_agent)
        .await?;

    let user = match outcome {
        AuthOutcome::Authenticated(user) => user,
        AuthOutcome::Failed => return Ok(Redirect::to("/login?error=invalid-credentials")),
    };

    // A verified user without a resolvable company cannot sign in; this is
    // the same "no access" outcome callers see anywhere below the guard.
    let context = state
        .company_context_service
        .resolve_for_user(user.id, None, None)
        .await?;

    let identity = SessionUser::new(
        user.id,
        user.display_name,
        Some(user.email),
        context.company_role,
        Some(context.company_id),
    );

    // New identity, new session id.
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;
    session
        .insert(SESSION_USER_KEY, identity.to_record())
        .await
        .map_err(|error| AppError::Internal(format!("failed to write session identity: {error}")))?;

    let target = safe_return_target(form.next.as_deref())
        .unwrap_or_else(|| home_path(context.company_role, context.company_id));

    Ok(Redirect::to(&target))
}
