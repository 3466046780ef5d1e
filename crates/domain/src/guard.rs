use sweldo_core::{CompanyId, CompanyRole};

use crate::routes::{
    PortalArea, RequestPath, SignOutReason, home_path, login_redirect, required_roles_for_path,
    sign_out_redirect,
};

/// Session state as seen by the navigation guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardSession {
    /// No identity attached to the request.
    Anonymous,
    /// An identity exists but is unusable; carries the sign-out reason.
    Malformed(SignOutReason),
    /// A usable identity with its resolved role and home company.
    Authenticated {
        /// Role within the resolved active company.
        role: CompanyRole,
        /// Selected-or-default company used to build home paths.
        home_company: CompanyId,
    },
}

/// Outcome of a guard evaluation. Never an error: the guard fails closed
/// into redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through to its handler.
    Allow,
    /// Send the client elsewhere instead of serving the resource.
    Redirect(String),
}

/// Evaluates one navigable request against the session state.
///
/// Branches are checked in strict order and the first match wins; the
/// ordering is part of the contract (the sign-out path must win over a
/// malformed-session redirect, which must win over everything else).
#[must_use]
pub fn evaluate_navigation(path: &str, query: Option<&str>, session: &GuardSession) -> GuardDecision {
    let parsed = RequestPath::parse(path);

    // Always reachable, even from a broken session, so users can clear state.
    if parsed == RequestPath::Logout {
        return GuardDecision::Allow;
    }

    let (role, home_company) = match session {
        GuardSession::Malformed(reason) => {
            return GuardDecision::Redirect(sign_out_redirect(*reason));
        }
        GuardSession::Anonymous => {
            if parsed.is_protected() {
                return GuardDecision::Redirect(login_redirect(&original_target(path, query)));
            }
            return GuardDecision::Allow;
        }
        GuardSession::Authenticated { role, home_company } => (*role, *home_company),
    };

    match parsed {
        RequestPath::Root | RequestPath::Login => {
            GuardDecision::Redirect(home_path(role, home_company))
        }
        RequestPath::LegacyDashboard { rest } => {
            let canonical = match rest {
                Some(rest) => format!("/{home_company}/dashboard/{rest}"),
                None => format!("/{home_company}/dashboard"),
            };
            GuardDecision::Redirect(canonical)
        }
        RequestPath::CompanyScoped { area, .. }
            if role == CompanyRole::Employee && area != PortalArea::EmployeePortal =>
        {
            // Workspace containment: employees never browse admin paths,
            // direct URL entry included.
            GuardDecision::Redirect(home_path(role, home_company))
        }
        ref company_path @ RequestPath::CompanyScoped { .. } => {
            match required_roles_for_path(company_path) {
                Some(required) if !required.contains(&role) => {
                    GuardDecision::Redirect(home_path(role, home_company))
                }
                _ => GuardDecision::Allow,
            }
        }
        RequestPath::Logout | RequestPath::Other => GuardDecision::Allow,
    }
}

fn original_target(path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("{path}?{query}"),
        None => path.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use sweldo_core::{CompanyId, CompanyRole};
    use uuid::Uuid;

    use super::{GuardDecision, GuardSession, evaluate_navigation};
    use crate::routes::SignOutReason;

    fn authenticated(role: CompanyRole, home_company: CompanyId) -> GuardSession {
        GuardSession::Authenticated { role, home_company }
    }

    #[test]
    fn logout_is_reachable_from_every_session_state() {
        let sessions = [
            GuardSession::Anonymous,
            GuardSession::Malformed(SignOutReason::InvalidSession),
            authenticated(CompanyRole::Employee, CompanyId::new()),
        ];

        for session in &sessions {
            assert_eq!(
                evaluate_navigation("/logout", Some("reason=expired"), session),
                GuardDecision::Allow
            );
        }
    }

    #[test]
    fn malformed_session_is_forced_out_with_its_reason() {
        let company_id = CompanyId::new();
        let invalid = GuardSession::Malformed(SignOutReason::InvalidSession);
        let inactive = GuardSession::Malformed(SignOutReason::Inactive);

        assert_eq!(
            evaluate_navigation(&format!("/{company_id}/dashboard"), None, &invalid),
            GuardDecision::Redirect("/logout?reason=invalid-session".to_owned())
        );
        assert_eq!(
            evaluate_navigation("/", None, &inactive),
            GuardDecision::Redirect("/logout?reason=inactive".to_owned())
        );
    }

    #[test]
    fn anonymous_protected_requests_bounce_to_login_with_return_target() {
        let company_id = CompanyId::new();
        let path = format!("/{company_id}/dashboard/payroll");

        let decision = evaluate_navigation(&path, Some("period=2024-03"), &GuardSession::Anonymous);
        let expected = format!(
            "/login?next={}",
            url::form_urlencoded::byte_serialize(format!("{path}?period=2024-03").as_bytes())
                .collect::<String>()
        );
        assert_eq!(decision, GuardDecision::Redirect(expected));

        assert!(matches!(
            evaluate_navigation("/dashboard", None, &GuardSession::Anonymous),
            GuardDecision::Redirect(target) if target.starts_with("/login?next=")
        ));
    }

    #[test]
    fn anonymous_public_paths_pass_through() {
        for path in ["/", "/login", "/careers"] {
            assert_eq!(
                evaluate_navigation(path, None, &GuardSession::Anonymous),
                GuardDecision::Allow
            );
        }
    }

    #[test]
    fn signed_in_users_leave_root_and_login_for_their_home() {
        let company_id = CompanyId::new();

        let admin = authenticated(CompanyRole::HrAdmin, company_id);
        assert_eq!(
            evaluate_navigation("/", None, &admin),
            GuardDecision::Redirect(format!("/{company_id}/dashboard"))
        );

        let employee = authenticated(CompanyRole::Employee, company_id);
        assert_eq!(
            evaluate_navigation("/login", None, &employee),
            GuardDecision::Redirect(format!("/{company_id}/employee-portal"))
        );
    }

    #[test]
    fn legacy_dashboard_is_canonicalized_with_its_section() {
        let company_id = CompanyId::new();
        let admin = authenticated(CompanyRole::CompanyAdmin, company_id);

        assert_eq!(
            evaluate_navigation("/dashboard", None, &admin),
            GuardDecision::Redirect(format!("/{company_id}/dashboard"))
        );
        assert_eq!(
            evaluate_navigation("/dashboard/reports/monthly", None, &admin),
            GuardDecision::Redirect(format!("/{company_id}/dashboard/reports/monthly"))
        );
    }

    #[test]
    fn employees_are_contained_to_their_portal() {
        let home = CompanyId::new();
        let other = CompanyId::new();
        let employee = authenticated(CompanyRole::Employee, home);

        for path in [
            format!("/{home}/dashboard"),
            format!("/{home}/dashboard/announcements"),
            format!("/{other}/dashboard/payroll"),
        ] {
            assert_eq!(
                evaluate_navigation(&path, None, &employee),
                GuardDecision::Redirect(format!("/{home}/employee-portal"))
            );
        }

        assert_eq!(
            evaluate_navigation(&format!("/{home}/employee-portal/payslips"), None, &employee),
            GuardDecision::Allow
        );
    }

    #[test]
    fn section_role_requirements_are_enforced() {
        let company_id = CompanyId::new();
        let payroll_admin = authenticated(CompanyRole::PayrollAdmin, company_id);
        let hr_admin = authenticated(CompanyRole::HrAdmin, company_id);

        assert_eq!(
            evaluate_navigation(&format!("/{company_id}/dashboard/payroll"), None, &payroll_admin),
            GuardDecision::Allow
        );
        assert_eq!(
            evaluate_navigation(&format!("/{company_id}/dashboard/payroll"), None, &hr_admin),
            GuardDecision::Redirect(format!("/{company_id}/dashboard"))
        );
        assert_eq!(
            evaluate_navigation(&format!("/{company_id}/dashboard/settings"), None, &payroll_admin),
            GuardDecision::Redirect(format!("/{company_id}/dashboard"))
        );
    }

    #[test]
    fn unlisted_sections_only_require_a_session() {
        let company_id = CompanyId::new();
        let payroll_admin = authenticated(CompanyRole::PayrollAdmin, company_id);

        assert_eq!(
            evaluate_navigation(&format!("/{company_id}/dashboard/announcements"), None, &payroll_admin),
            GuardDecision::Allow
        );
    }

    #[test]
    fn cross_company_request_from_contained_employee_goes_home() {
        // User with an active default grant to c1 as employee, no grant to
        // c2, requesting c2's payroll dashboard.
        let c1 = CompanyId::new();
        let c2 = CompanyId::new();
        let path = format!("/{c2}/dashboard/payroll");

        assert!(matches!(
            evaluate_navigation(&path, None, &GuardSession::Anonymous),
            GuardDecision::Redirect(target) if target.starts_with("/login?next=")
        ));

        let employee = authenticated(CompanyRole::Employee, c1);
        assert_eq!(
            evaluate_navigation(&path, None, &employee),
            GuardDecision::Redirect(format!("/{c1}/employee-portal"))
        );
    }

    proptest! {
        #[test]
        fn anonymous_never_reaches_company_scoped_areas(
            company in any::<u128>(),
            area in prop_oneof![Just("dashboard"), Just("employee-portal")],
            section in "[a-z]{1,12}",
        ) {
            let company_id = CompanyId::from_uuid(Uuid::from_u128(company));
            let path = format!("/{company_id}/{area}/{section}");
            let decision = evaluate_navigation(&path, None, &GuardSession::Anonymous);
            prop_assert!(matches!(decision, GuardDecision::Redirect(_)));
        }

        #[test]
        fn employees_never_reach_dashboard_paths(
            company in any::<u128>(),
            home in any::<u128>(),
            section in "[a-z]{1,12}",
        ) {
            let company_id = CompanyId::from_uuid(Uuid::from_u128(company));
            let home_company = CompanyId::from_uuid(Uuid::from_u128(home));
            let path = format!("/{company_id}/dashboard/{section}");
            let session = GuardSession::Authenticated {
                role: CompanyRole::Employee,
                home_company,
            };
            let decision = evaluate_navigation(&path, None, &session);
            prop_assert_eq!(
                decision,
                GuardDecision::Redirect(format!("/{home_company}/employee-portal"))
            );
        }
    }
}
