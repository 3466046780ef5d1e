use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use sweldo_core::{CompanyId, CompanyRole, UserId};

/// One row of the company access table, joined with its company.
///
/// A grant is usable only when it is active itself *and* its company is
/// active; the two flags are kept separate because an inactive company is a
/// hard resolution stop while a revoked grant is silently skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    /// Owning user account.
    pub user_id: UserId,
    /// Company the grant applies to.
    pub company_id: CompanyId,
    /// Short company code, unique across tenants.
    pub company_code: String,
    /// Display name of the company.
    pub company_name: String,
    /// Whether the company itself is active.
    pub company_active: bool,
    /// Role the user holds within this company.
    pub role: CompanyRole,
    /// Explicit default marker; at most one per user.
    pub is_default: bool,
    /// Creation timestamp, the secondary precedence key.
    pub created_at: DateTime<Utc>,
}

/// The resolved tenant and role a request is operating under.
///
/// Recomputed for every request and never cached across requests, since a
/// company switch or revocation can change it between two page loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCompanyContext {
    /// User the context was resolved for.
    pub user_id: UserId,
    /// Resolved active company.
    pub company_id: CompanyId,
    /// Short company code.
    pub company_code: String,
    /// Display name of the company.
    pub company_name: String,
    /// Role the user holds within the resolved company.
    pub company_role: CompanyRole,
    /// Whether the resolved company is the user's default company.
    pub is_default_company: bool,
}

impl ActiveCompanyContext {
    /// Builds a context from a resolved grant.
    #[must_use]
    pub fn from_grant(grant: &AccessGrant, is_default_company: bool) -> Self {
        Self {
            user_id: grant.user_id,
            company_id: grant.company_id,
            company_code: grant.company_code.clone(),
            company_name: grant.company_name.clone(),
            company_role: grant.role,
            is_default_company,
        }
    }
}

/// Sorts grants into resolution precedence order.
///
/// Explicit default first, then oldest grant first; the company id breaks
/// any remaining tie so the order is total and repeatable even if the
/// one-grant-per-pair invariant were ever violated upstream.
pub fn sort_by_precedence(grants: &mut [AccessGrant]) {
    grants.sort_by_key(|grant| {
        (
            Reverse(grant.is_default),
            grant.created_at,
            grant.company_id.as_uuid(),
        )
    });
}

/// Returns the user's default company among precedence-sorted grants.
///
/// The explicit default wins when one is marked; otherwise the
/// earliest-created active grant acts as the default.
#[must_use]
pub fn default_company(sorted_grants: &[AccessGrant]) -> Option<CompanyId> {
    sorted_grants.first().map(|grant| grant.company_id)
}
