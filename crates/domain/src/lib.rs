//! Domain entities and invariants for company-scoped access control.

#![forbid(unsafe_code)]

mod access;
mod guard;
mod policy;
mod routes;

pub use access::{AccessGrant, ActiveCompanyContext, default_company, sort_by_precedence};
pub use guard::{GuardDecision, GuardSession, evaluate_navigation};
pub use policy::{Module, can_view_sensitive_attendance};
pub use routes::{
    LOGIN_PATH, LOGOUT_PATH, PortalArea, RequestPath, SignOutReason, home_path, is_guard_exempt,
    login_redirect, required_roles_for_path, sign_out_redirect,
};
