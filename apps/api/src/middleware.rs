use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

use sweldo_core::{AccessError, AppError, SessionRecord, SessionUser};
use sweldo_domain::{
    GuardDecision, GuardSession, SignOutReason, evaluate_navigation, is_guard_exempt,
};

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

/// Edge gate for navigable requests.
///
/// Resolves the session into a guard state, evaluates the navigation rules
/// and either forwards the request (attaching the validated identity) or
/// answers with a redirect. Identity and access failures never surface as
/// errors here; they become deterministic navigation outcomes.
pub async fn route_guard(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let path = request.uri().path().to_owned();
    if is_guard_exempt(&path) {
        return Ok(next.run(request).await);
    }

    let (guard_session, identity) = match session.get::<SessionRecord>(SESSION_USER_KEY).await {
        Ok(record) => classify_session(&state, record).await?,
        // An undecodable payload is a malformed identity, not a server
        // fault; it must still be able to reach the sign-out path.
        Err(_) => (
            GuardSession::Malformed(SignOutReason::InvalidSession),
            None,
        ),
    };

    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
    }

    let query = request.uri().query().map(ToOwned::to_owned);
    match evaluate_navigation(&path, query.as_deref(), &guard_session) {
        GuardDecision::Allow => Ok(next.run(request).await),
        GuardDecision::Redirect(target) => Ok(Redirect::to(&target).into_response()),
    }
}

/// Classifies a raw session record into a guard state.
///
/// The identity is returned alongside so the guard can hand it to page
/// handlers; it is only present when the session is fully usable.
async fn classify_session(
    state: &AppState,
    record: Option<SessionRecord>,
) -> ApiResult<(GuardSession, Option<SessionUser>)> {
    let Some(record) = record else {
        return Ok((GuardSession::Anonymous, None));
    };

    let user = match SessionUser::from_record(record) {
        Ok(user) => user,
        Err(_) => {
            return Ok((
                GuardSession::Malformed(SignOutReason::InvalidSession),
                None,
            ));
        }
    };

    match state
        .company_context_service
        .resolve(Some(&user), None)
        .await
    {
        Ok(context) => Ok((
            GuardSession::Authenticated {
                role: context.company_role,
                home_company: context.company_id,
            },
            Some(user),
        )),
        // A signed-in user with no resolvable home is a dead session.
        Err(AccessError::NoSession | AccessError::NoAccess | AccessError::Malformed(_)) => Ok((
            GuardSession::Malformed(SignOutReason::InvalidSession),
            None,
        )),
        Err(AccessError::InactiveCompany(_)) => {
            Ok((GuardSession::Malformed(SignOutReason::Inactive), None))
        }
        Err(AccessError::Internal(error)) => Err(error.into()),
    }
}

/// Requires a usable identity on JSON API routes.
pub async fn require_auth(session: Session, mut request: Request, next: Next) -> ApiResult<Response> {
    let record = session
        .get::<SessionRecord>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let identity = SessionUser::from_record(record)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Blocks cross-site state-changing requests.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site")
            && fetch_site == HeaderValue::from_static("cross-site")
        {
            return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.app_url.as_str();
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer.starts_with(allowed_origin);

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use sweldo_application::{
        AuthEvent, AuthEventRepository, AuthEventService, CompanyContextService, PasswordHasher,
        UserRecord, UserRepository, UserService,
    };
    use sweldo_core::{AppResult, CompanyId, CompanyRole, SessionRecord, UserId};
    use sweldo_domain::{AccessGrant, GuardSession, SignOutReason};
    use sweldo_infrastructure::InMemoryAccessGrantRepository;
    use uuid::Uuid;

    use crate::state::AppState;

    use super::classify_session;

    #[derive(Default)]
    struct NoopAuthEventRepository;

    #[async_trait]
    impl AuthEventRepository for NoopAuthEventRepository {
        async fn append_event(&self, _event: AuthEvent) -> AppResult<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct EmptyUserRepository;

    #[async_trait]
    impl UserRepository for EmptyUserRepository {
        async fn find_by_email(&self, _email: &str) -> AppResult<Option<UserRecord>> {
            Ok(None)
        }

        async fn find_by_id(&self, _user_id: UserId) -> AppResult<Option<UserRecord>> {
            Ok(None)
        }

        async fn record_failed_login(&self, _user_id: UserId) -> AppResult<()> {
            Ok(())
        }

        async fn reset_failed_logins(&self, _user_id: UserId) -> AppResult<()> {
            Ok(())
        }
    }

    struct NoopPasswordHasher;

    impl PasswordHasher for NoopPasswordHasher {
        fn hash_password(&self, password: &str) -> AppResult<String> {
            Ok(password.to_owned())
        }

        fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
            Ok(password == hash)
        }
    }

    fn state_with_grants(grants: Vec<AccessGrant>) -> AppState {
        let repository = InMemoryAccessGrantRepository::new();
        for grant in grants {
            assert!(repository.add_grant(grant).is_ok());
        }

        let auth_event_service = AuthEventService::new(Arc::new(NoopAuthEventRepository));
        AppState {
            company_context_service: CompanyContextService::new(Arc::new(repository)),
            user_service: UserService::new(
                Arc::new(EmptyUserRepository),
                Arc::new(NoopPasswordHasher),
                auth_event_service.clone(),
            ),
            auth_event_service,
            app_url: "http://localhost:3100".to_owned(),
        }
    }

    fn grant(user_id: UserId, role: CompanyRole, company_active: bool) -> AccessGrant {
        AccessGrant {
            user_id,
            company_id: CompanyId::new(),
            company_code: "NLC".to_owned(),
            company_name: "Northline Corp".to_owned(),
            company_active,
            role,
            is_default: true,
            created_at: Utc::now(),
        }
    }

    fn record(user_id: UserId, role: &str) -> SessionRecord {
        SessionRecord {
            user_id: user_id.as_uuid(),
            display_name: "Mara Santos".to_owned(),
            email: None,
            role: role.to_owned(),
            default_company_id: None,
        }
    }

    #[tokio::test]
    async fn missing_record_classifies_as_anonymous() {
        let state = state_with_grants(Vec::new());

        let classified = classify_session(&state, None).await;
        assert!(classified.is_ok());
        let (session, identity) = classified.unwrap_or_else(|_| unreachable!());
        assert_eq!(session, GuardSession::Anonymous);
        assert!(identity.is_none());
    }

    #[tokio::test]
    async fn unknown_role_classifies_as_malformed() {
        let user_id = UserId::new();
        let state = state_with_grants(vec![grant(user_id, CompanyRole::HrAdmin, true)]);

        let classified = classify_session(&state, Some(record(user_id, "superuser"))).await;
        assert!(classified.is_ok());
        let (session, identity) = classified.unwrap_or_else(|_| unreachable!());
        assert_eq!(
            session,
            GuardSession::Malformed(SignOutReason::InvalidSession)
        );
        assert!(identity.is_none());
    }

    #[tokio::test]
    async fn grantless_identity_classifies_as_malformed() {
        let state = state_with_grants(Vec::new());

        let classified = classify_session(&state, Some(record(UserId::new(), "employee"))).await;
        assert!(classified.is_ok());
        let (session, _) = classified.unwrap_or_else(|_| unreachable!());
        assert_eq!(
            session,
            GuardSession::Malformed(SignOutReason::InvalidSession)
        );
    }

    #[tokio::test]
    async fn deactivated_home_company_classifies_as_inactive() {
        let user_id = UserId::new();
        let state = state_with_grants(vec![grant(user_id, CompanyRole::HrAdmin, false)]);

        let classified = classify_session(&state, Some(record(user_id, "hr_admin"))).await;
        assert!(classified.is_ok());
        let (session, _) = classified.unwrap_or_else(|_| unreachable!());
        assert_eq!(session, GuardSession::Malformed(SignOutReason::Inactive));
    }

    #[tokio::test]
    async fn resolved_grant_outranks_the_session_role_hint() {
        let user_id = UserId::new();
        let seeded = grant(user_id, CompanyRole::HrAdmin, true);
        let home_company = seeded.company_id;
        let state = state_with_grants(vec![seeded]);

        // The stale hint says employee; the grant table says HR admin.
        let classified = classify_session(&state, Some(record(user_id, "employee"))).await;
        assert!(classified.is_ok());
        let (session, identity) = classified.unwrap_or_else(|_| unreachable!());
        assert_eq!(
            session,
            GuardSession::Authenticated {
                role: CompanyRole::HrAdmin,
                home_company,
            }
        );
        assert!(identity.is_some());
    }

    #[tokio::test]
    async fn nil_user_id_classifies_as_malformed() {
        let state = state_with_grants(Vec::new());
        let raw = SessionRecord {
            user_id: Uuid::nil(),
            display_name: "Mara Santos".to_owned(),
            email: None,
            role: "employee".to_owned(),
            default_company_id: None,
        };

        let classified = classify_session(&state, Some(raw)).await;
        assert!(classified.is_ok());
        let (session, _) = classified.unwrap_or_else(|_| unreachable!());
        assert_eq!(
            session,
            GuardSession::Malformed(SignOutReason::InvalidSession)
        );
    }
}
