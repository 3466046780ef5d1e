use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sweldo_domain::{AccessGrant, ActiveCompanyContext, Module, can_view_sensitive_attendance};

/// Resolved company context returned to clients, with the module access the
/// current role carries so navigation can be built without a second call.
#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub company_code: String,
    pub company_name: String,
    pub role: &'static str,
    pub is_default_company: bool,
    pub modules: Vec<&'static str>,
    pub sensitive_attendance: bool,
}

impl From<ActiveCompanyContext> for ContextResponse {
    fn from(context: ActiveCompanyContext) -> Self {
        let modules = Module::all()
            .iter()
            .filter(|module| module.permits(context.company_role))
            .map(Module::as_str)
            .collect();

        Self {
            user_id: context.user_id.as_uuid(),
            company_id: context.company_id.as_uuid(),
            company_code: context.company_code,
            company_name: context.company_name,
            role: context.company_role.as_str(),
            is_default_company: context.is_default_company,
            modules,
            sensitive_attendance: can_view_sensitive_attendance(context.company_role),
        }
    }
}

/// One switchable company in the company picker.
#[derive(Debug, Serialize)]
pub struct CompanyGrantResponse {
    pub company_id: Uuid,
    pub code: String,
    pub name: String,
    pub role: &'static str,
    pub is_default: bool,
}

impl From<AccessGrant> for CompanyGrantResponse {
    fn from(grant: AccessGrant) -> Self {
        Self {
            company_id: grant.company_id.as_uuid(),
            code: grant.company_code,
            name: grant.company_name,
            role: grant.role.as_str(),
            is_default: grant.is_default,
        }
    }
}

/// Sign-in form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

/// Company switch request body.
#[derive(Debug, Deserialize)]
pub struct SwitchCompanyRequest {
    pub company_id: Uuid,
}

/// Optional explicit company override for context reads.
#[derive(Debug, Deserialize)]
pub struct ContextQuery {
    pub company: Option<Uuid>,
}

/// Sign-out query string.
#[derive(Debug, Deserialize)]
pub struct LogoutQuery {
    pub reason: Option<String>,
}

/// Sign-in page query string.
#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub next: Option<String>,
    pub error: Option<String>,
}

/// Health probe payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use sweldo_core::{CompanyId, CompanyRole, UserId};
    use sweldo_domain::ActiveCompanyContext;

    use super::ContextResponse;

    fn context(role: CompanyRole) -> ActiveCompanyContext {
        ActiveCompanyContext {
            user_id: UserId::new(),
            company_id: CompanyId::new(),
            company_code: "NLC".to_owned(),
            company_name: "Northline Corp".to_owned(),
            company_role: role,
            is_default_company: true,
        }
    }

    #[test]
    fn payroll_admin_context_lists_its_modules_without_punch_access() {
        let response = ContextResponse::from(context(CompanyRole::PayrollAdmin));
        assert_eq!(response.modules, vec!["attendance", "payroll", "reports"]);
        assert!(!response.sensitive_attendance);
    }

    #[test]
    fn employee_context_carries_no_modules() {
        let response = ContextResponse::from(context(CompanyRole::Employee));
        assert!(response.modules.is_empty());
        assert!(!response.sensitive_attendance);
    }

    #[test]
    fn company_admin_context_carries_every_module_and_punch_access() {
        let response = ContextResponse::from(context(CompanyRole::CompanyAdmin));
        assert_eq!(response.modules.len(), 5);
        assert!(response.sensitive_attendance);
    }
}
