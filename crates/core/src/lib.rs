//! Shared primitives for all Rust crates in Sweldo.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use auth::{CompanyRole, SessionRecord, SessionUser};

/// Result type used across Sweldo crates.
pub type AppResult<T> = Result<T, AppError>;

/// Company identifier used as the tenant partition key for every persisted
/// resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(Uuid);

impl CompanyId {
    /// Creates a random company identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a company identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CompanyId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CompanyId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique identifier for a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is not authenticated or not allowed to access a resource.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failures raised while resolving or persisting a user's active company.
///
/// Every variant except `Internal` maps to a deterministic navigation
/// outcome at the edge; callers below the navigation layer surface them as
/// non-retryable "no access" conditions.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No authenticated identity is attached to the request.
    #[error("no authenticated session")]
    NoSession,

    /// The user holds no usable company access grant.
    #[error("no usable company access grant")]
    NoAccess,

    /// The resolved grant points at a deactivated company. Deliberately a
    /// hard stop: resolution never substitutes another company here.
    #[error("company '{0}' is deactivated")]
    InactiveCompany(CompanyId),

    /// An identity exists but fails basic shape invariants.
    #[error("malformed session identity: {0}")]
    Malformed(String),

    /// Underlying repository or infrastructure failure.
    #[error(transparent)]
    Internal(#[from] AppError),
}

#[cfg(test)]
mod tests {
    use super::{AccessError, CompanyId, UserId};

    #[test]
    fn company_id_formats_as_uuid() {
        let company_id = CompanyId::new();
        assert_eq!(company_id.to_string().len(), 36);
    }

    #[test]
    fn user_id_formats_as_uuid() {
        let user_id = UserId::new();
        assert_eq!(user_id.to_string().len(), 36);
    }

    #[test]
    fn inactive_company_error_names_the_company() {
        let company_id = CompanyId::new();
        let message = AccessError::InactiveCompany(company_id).to_string();
        assert!(message.contains(&company_id.to_string()));
    }
}
