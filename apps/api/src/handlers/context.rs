use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::{Extension, Json};
use tower_sessions::Session;

use sweldo_application::AuthEvent;
use sweldo_core::{AppError, CompanyId, SessionUser};

use crate::auth::{SESSION_USER_KEY, extract_request_context};
use crate::dto::{CompanyGrantResponse, ContextQuery, ContextResponse, SwitchCompanyRequest};
use crate::error::ApiResult;
use crate::state::AppState;

/// Returns the resolved active company context for the caller.
///
/// An explicit `?company=` override resolves against that company instead
/// of the persisted selection, without changing the selection.
pub async fn context_handler(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<ContextQuery>,
) -> ApiResult<Json<ContextResponse>> {
    let requested = query.company.map(CompanyId::from_uuid);
    let context = state
        .company_context_service
        .resolve(Some(&user), requested)
        .await?;

    Ok(Json(ContextResponse::from(context)))
}

/// Lists the companies the caller may switch into.
pub async fn list_companies_handler(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<Json<Vec<CompanyGrantResponse>>> {
    let grants = state
        .company_context_service
        .list_usable_grants(Some(&user))
        .await?;

    Ok(Json(
        grants.into_iter().map(CompanyGrantResponse::from).collect(),
    ))
}

/// Switches the caller's sticky company selection.
///
/// The selection is verified and persisted, then the session record is
/// rewritten so the role hint matches the new company on the very next
/// navigation.
pub async fn switch_company_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Extension(user): Extension<SessionUser>,
    Json(request): Json<SwitchCompanyRequest>,
) -> ApiResult<Json<ContextResponse>> {
    let company_id = CompanyId::from_uuid(request.company_id);

    state
        .company_context_service
        .persist_selection(Some(&user), company_id)
        .await?;

    let context = state
        .company_context_service
        .resolve(Some(&user), Some(company_id))
        .await?;

    let identity = SessionUser::new(
        user.user_id(),
        user.display_name(),
        user.email().map(ToOwned::to_owned),
        context.company_role,
        user.default_company_id(),
    );
    session
        .insert(SESSION_USER_KEY, identity.to_record())
        .await
        .map_err(|error| AppError::Internal(format!("failed to write session identity: {error}")))?;

    let (ip_address, user_agent) = extract_request_context(&headers);
    state
        .auth_event_service
        .record_event(AuthEvent {
            subject: Some(user.user_id().to_string()),
            event_type: "company_switch".to_owned(),
            outcome: context.company_id.to_string(),
            ip_address,
            user_agent,
        })
        .await?;

    Ok(Json(ContextResponse::from(context)))
}
