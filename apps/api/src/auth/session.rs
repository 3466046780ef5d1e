use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use tower_sessions::Session;

use sweldo_application::AuthEvent;
use sweldo_core::{AppError, SessionRecord};
use sweldo_domain::{LOGIN_PATH, SignOutReason};

use crate::dto::LogoutQuery;
use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_USER_KEY;
use super::session_helpers::extract_request_context;

/// Sign-out path.
///
/// Must work from any session state, including a malformed one, so the
/// subject is read on a best-effort basis and decode failures are ignored.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Query(query): Query<LogoutQuery>,
) -> ApiResult<Redirect> {
    let subject = session
        .get::<SessionRecord>(SESSION_USER_KEY)
        .await
        .ok()
        .flatten()
        .map(|record| record.user_id.to_string());

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    let outcome = query
        .reason
        .as_deref()
        .and_then(SignOutReason::from_param)
        .map_or("user", |reason| reason.as_str());

    let (ip_address, user_agent) = extract_request_context(&headers);
    state
        .auth_event_service
        .record_event(AuthEvent {
            subject,
            event_type: "logout".to_owned(),
            outcome: outcome.to_owned(),
            ip_address,
            user_agent,
        })
        .await?;

    Ok(Redirect::to(LOGIN_PATH))
}
