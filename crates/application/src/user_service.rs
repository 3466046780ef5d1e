//! User authentication ports and application service.
//!
//! Owns credential verification and login bookkeeping. Follows OWASP
//! guidelines for generic error messages and constant-time responses.

use std::sync::Arc;

use async_trait::async_trait;

use sweldo_core::{AppResult, UserId};

use crate::{AuthEvent, AuthEventService};

/// User record returned by repository queries.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Canonical email address.
    pub email: String,
    /// Display name shown across the product.
    pub display_name: String,
    /// Argon2id password hash, or `None` for externally provisioned
    /// accounts that have not set one.
    pub password_hash: Option<String>,
    /// Number of consecutive failed login attempts.
    pub failed_login_count: i32,
    /// Account is locked until this time, if set.
    pub locked_until: Option<chrono::DateTime<chrono::Utc>>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Increments the failed login counter and optionally locks the account.
    async fn record_failed_login(&self, user_id: UserId) -> AppResult<()>;

    /// Resets the failed login counter and removes any account lock.
    async fn reset_failed_logins(&self, user_id: UserId) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps the application layer free
/// of direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Authentication succeeded. Session can be established.
    Authenticated(UserRecord),
    /// Authentication failed. Generic outcome prevents enumeration.
    Failed,
}

/// Application service for credential authentication.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    auth_event_service: AuthEventService,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        auth_event_service: AuthEventService,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            auth_event_service,
        }
    }

    /// Authenticates a user with email and password.
    ///
    /// Returns `AuthOutcome::Failed` for any failure (unknown email, wrong
    /// password, locked account) so callers emit one generic message.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<AuthOutcome> {
        let user = self.user_repository.find_by_email(email).await?;

        let Some(user) = user else {
            // OWASP: always hash to prevent timing attacks even when the
            // user is not found.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        if let Some(locked_until) = user.locked_until
            && chrono::Utc::now() < locked_until
        {
            // Still locked -- don't reveal this; just say failed.
            let _ = self.password_hasher.hash_password(password);

            self.auth_event_service
                .record_event(AuthEvent {
                    subject: Some(user.id.to_string()),
                    event_type: "login_attempt".to_owned(),
                    outcome: "account_locked".to_owned(),
                    ip_address,
                    user_agent,
                })
                .await?;

            return Ok(AuthOutcome::Failed);
        }

        let Some(ref stored_hash) = user.password_hash else {
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        let password_valid = self.password_hasher.verify_password(password, stored_hash)?;

        if !password_valid {
            self.user_repository.record_failed_login(user.id).await?;

            self.auth_event_service
                .record_event(AuthEvent {
                    subject: Some(user.id.to_string()),
                    event_type: "login_attempt".to_owned(),
                    outcome: "invalid_password".to_owned(),
                    ip_address,
                    user_agent,
                })
                .await?;

            return Ok(AuthOutcome::Failed);
        }

        self.user_repository.reset_failed_logins(user.id).await?;

        self.auth_event_service
            .record_event(AuthEvent {
                subject: Some(user.id.to_string()),
                event_type: "login_attempt".to_owned(),
                outcome: "success".to_owned(),
                ip_address,
                user_agent,
            })
            .await?;

        Ok(AuthOutcome::Authenticated(user))
    }

    /// Returns a user record by ID, if it exists.
    pub async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.user_repository.find_by_id(user_id).await
    }
}
