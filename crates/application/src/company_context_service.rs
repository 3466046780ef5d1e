use std::sync::Arc;

use async_trait::async_trait;

use sweldo_core::{AccessError, AppResult, CompanyId, SessionUser, UserId};
use sweldo_domain::{AccessGrant, ActiveCompanyContext, default_company, sort_by_precedence};

/// Repository port for company access grants and the sticky selection.
#[async_trait]
pub trait AccessGrantRepository: Send + Sync {
    /// Lists the user's active grants with their companies joined.
    ///
    /// Revoked grants are excluded; grants whose company is deactivated are
    /// included so resolution can distinguish "no access" from "company
    /// shut down".
    async fn list_active_grants(&self, user_id: UserId) -> AppResult<Vec<AccessGrant>>;

    /// Reads the user's persisted company selection, if any.
    async fn selected_company(&self, user_id: UserId) -> AppResult<Option<CompanyId>>;

    /// Writes the user's persisted company selection.
    async fn save_selected_company(&self, user_id: UserId, company_id: CompanyId) -> AppResult<()>;
}

/// Application service resolving which company a request acts within.
///
/// Resolution is stateless and re-reads grant data on every call; nothing
/// here is cached across requests because a company switch or a revocation
/// can land between any two of them.
#[derive(Clone)]
pub struct CompanyContextService {
    repository: Arc<dyn AccessGrantRepository>,
}

impl CompanyContextService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessGrantRepository>) -> Self {
        Self { repository }
    }

    /// Resolves the active company context for a session.
    pub async fn resolve(
        &self,
        session: Option<&SessionUser>,
        requested: Option<CompanyId>,
    ) -> Result<ActiveCompanyContext, AccessError> {
        let session = session.ok_or(AccessError::NoSession)?;
        self.resolve_for_user(session.user_id(), requested, session.default_company_id())
            .await
    }

    /// Resolves the active company context for an authenticated user id.
    ///
    /// Used directly by the login flow, which holds a verified user but no
    /// session record yet. The candidate company is the first of: explicit
    /// request, persisted sticky selection, session-embedded default hint.
    /// A candidate without a matching active grant falls back to the user's
    /// best grant overall, so a revoked selection degrades instead of
    /// locking the user out.
    pub async fn resolve_for_user(
        &self,
        user_id: UserId,
        requested: Option<CompanyId>,
        session_hint: Option<CompanyId>,
    ) -> Result<ActiveCompanyContext, AccessError> {
        let candidate = match requested {
            Some(company_id) => Some(company_id),
            None => match self.repository.selected_company(user_id).await? {
                Some(company_id) => Some(company_id),
                None => session_hint,
            },
        };

        let mut grants = self.repository.list_active_grants(user_id).await?;
        sort_by_precedence(&mut grants);

        let Some(default_id) = default_company(&grants) else {
            return Err(AccessError::NoAccess);
        };

        let grant = candidate
            .and_then(|company_id| {
                grants
                    .iter()
                    .find(|grant| grant.company_id == company_id)
            })
            .or_else(|| grants.first())
            .ok_or(AccessError::NoAccess)?;

        if !grant.company_active {
            // Hard stop, not a soft degrade: a deactivated company must
            // never be silently swapped for another tenant.
            return Err(AccessError::InactiveCompany(grant.company_id));
        }

        Ok(ActiveCompanyContext::from_grant(
            grant,
            grant.company_id == default_id,
        ))
    }

    /// Persists a company selection as the user's sticky preference.
    ///
    /// Refuses to persist a selection the user holds no usable grant for;
    /// the stored preference is left untouched on refusal. The
    /// verify-then-write pair is not transactional against a concurrent
    /// revocation -- the next resolution re-validates and fails closed.
    pub async fn persist_selection(
        &self,
        session: Option<&SessionUser>,
        company_id: CompanyId,
    ) -> Result<(), AccessError> {
        let session = session.ok_or(AccessError::NoSession)?;
        let grants = self
            .repository
            .list_active_grants(session.user_id())
            .await?;

        let usable = grants
            .iter()
            .any(|grant| grant.company_id == company_id && grant.company_active);
        if !usable {
            return Err(AccessError::NoAccess);
        }

        self.repository
            .save_selected_company(session.user_id(), company_id)
            .await?;

        Ok(())
    }

    /// Lists the companies the session may switch into, in precedence order.
    pub async fn list_usable_grants(
        &self,
        session: Option<&SessionUser>,
    ) -> Result<Vec<AccessGrant>, AccessError> {
        let session = session.ok_or(AccessError::NoSession)?;
        let mut grants = self
            .repository
            .list_active_grants(session.user_id())
            .await?;
        sort_by_precedence(&mut grants);
        grants.retain(|grant| grant.company_active);

        Ok(grants)
    }
}
