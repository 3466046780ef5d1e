use sweldo_application::{AuthEventService, CompanyContextService, UserService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub company_context_service: CompanyContextService,
    pub user_service: UserService,
    pub auth_event_service: AuthEventService,
    pub app_url: String,
}
