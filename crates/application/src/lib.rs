//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_event_service;
mod company_context_service;
mod user_service;

pub use auth_event_service::{AuthEvent, AuthEventRepository, AuthEventService};
pub use company_context_service::{AccessGrantRepository, CompanyContextService};
pub use user_service::{AuthOutcome, PasswordHasher, UserRecord, UserRepository, UserService};
