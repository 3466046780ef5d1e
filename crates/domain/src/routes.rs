use sweldo_core::{CompanyId, CompanyRole};
use url::form_urlencoded;
use uuid::Uuid;

/// Sign-in page path.
pub const LOGIN_PATH: &str = "/login";

/// Sign-out path; must stay reachable from any session state.
pub const LOGOUT_PATH: &str = "/logout";

/// The two navigable areas inside a company scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalArea {
    /// Administrative dashboard.
    Dashboard,
    /// Employee self-service portal.
    EmployeePortal,
}

impl PortalArea {
    /// Returns the path segment naming this area.
    #[must_use]
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::EmployeePortal => "employee-portal",
        }
    }
}

/// Classified request path, the input alphabet of the navigation guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPath {
    /// Site root.
    Root,
    /// The sign-in page.
    Login,
    /// The sign-out path.
    Logout,
    /// Unscoped `/dashboard` with any trailing section preserved for
    /// canonicalization.
    LegacyDashboard {
        /// Remainder after `/dashboard/`, if any.
        rest: Option<String>,
    },
    /// A company-scoped area path.
    CompanyScoped {
        /// Company id from the leading path segment.
        company_id: CompanyId,
        /// Which area the path falls under.
        area: PortalArea,
        /// First section segment after the area, if any.
        section: Option<String>,
    },
    /// Anything else; carries no navigation requirement of its own.
    Other,
}

impl RequestPath {
    /// Classifies a request path.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let mut segments = path.trim_start_matches('/').splitn(3, '/');
        let first = segments.next().unwrap_or_default();
        let second = segments.next();
        let rest = segments.next();

        match first {
            "" => Self::Root,
            "login" if second.is_none() => Self::Login,
            "logout" if second.is_none() => Self::Logout,
            "dashboard" => Self::LegacyDashboard {
                rest: join_segments(second, rest),
            },
            _ => match Uuid::parse_str(first) {
                Ok(company_uuid) => {
                    let company_id = CompanyId::from_uuid(company_uuid);
                    match second {
                        Some("dashboard") => Self::CompanyScoped {
                            company_id,
                            area: PortalArea::Dashboard,
                            section: first_segment(rest),
                        },
                        Some("employee-portal") => Self::CompanyScoped {
                            company_id,
                            area: PortalArea::EmployeePortal,
                            section: first_segment(rest),
                        },
                        _ => Self::Other,
                    }
                }
                Err(_) => Self::Other,
            },
        }
    }

    /// Returns whether the path requires an authenticated session.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Self::CompanyScoped { .. } | Self::LegacyDashboard { .. }
        )
    }
}

fn join_segments(second: Option<&str>, rest: Option<&str>) -> Option<String> {
    let second = second.filter(|value| !value.is_empty())?;
    match rest.filter(|value| !value.is_empty()) {
        Some(rest) => Some(format!("{second}/{rest}")),
        None => Some(second.to_owned()),
    }
}

fn first_segment(rest: Option<&str>) -> Option<String> {
    rest.and_then(|value| value.split('/').next())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

/// Role sets required to enter dashboard sections.
///
/// Read-only at runtime; unmatched sections impose no requirement beyond
/// being logged in.
pub fn required_roles_for_path(path: &RequestPath) -> Option<&'static [CompanyRole]> {
    const PAYROLL: &[CompanyRole] = &[CompanyRole::CompanyAdmin, CompanyRole::PayrollAdmin];
    const EMPLOYEES: &[CompanyRole] = &[CompanyRole::CompanyAdmin, CompanyRole::HrAdmin];
    const ATTENDANCE_AND_REPORTS: &[CompanyRole] = &[
        CompanyRole::CompanyAdmin,
        CompanyRole::HrAdmin,
        CompanyRole::PayrollAdmin,
    ];
    const SETTINGS: &[CompanyRole] = &[CompanyRole::CompanyAdmin];

    let RequestPath::CompanyScoped {
        area: PortalArea::Dashboard,
        section: Some(section),
        ..
    } = path
    else {
        return None;
    };

    match section.as_str() {
        "payroll" => Some(PAYROLL),
        "employees" => Some(EMPLOYEES),
        "attendance" | "reports" => Some(ATTENDANCE_AND_REPORTS),
        "settings" => Some(SETTINGS),
        _ => None,
    }
}

/// Machine-readable reason attached to a forced sign-out redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutReason {
    /// Session identity failed shape validation or has no usable grant.
    InvalidSession,
    /// The user's resolvable company is deactivated.
    Inactive,
    /// The client-side idle tracker expired the session.
    Expired,
}

impl SignOutReason {
    /// Returns the query-parameter value for this reason.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidSession => "invalid-session",
            Self::Inactive => "inactive",
            Self::Expired => "expired",
        }
    }

    /// Parses a query-parameter value back into a reason.
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "invalid-session" => Some(Self::InvalidSession),
            "inactive" => Some(Self::Inactive),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// Returns the canonical landing path for a role within its company.
#[must_use]
pub fn home_path(role: CompanyRole, company_id: CompanyId) -> String {
    let area = match role {
        CompanyRole::Employee => PortalArea::EmployeePortal,
        _ => PortalArea::Dashboard,
    };

    format!("/{company_id}/{}", area.path_segment())
}

/// Builds the sign-in redirect preserving the originally requested target.
#[must_use]
pub fn login_redirect(original: &str) -> String {
    let mut target = format!("{LOGIN_PATH}?next=");
    for chunk in form_urlencoded::byte_serialize(original.as_bytes()) {
        target.push_str(chunk);
    }

    target
}

/// Builds the forced sign-out redirect for a reason.
#[must_use]
pub fn sign_out_redirect(reason: SignOutReason) -> String {
    format!("{LOGOUT_PATH}?reason={}", reason.as_str())
}

/// Returns whether the navigation guard skips this path entirely.
///
/// Static assets and the JSON API enforce their own authentication; the
/// guard only arbitrates navigable page requests.
#[must_use]
pub fn is_guard_exempt(path: &str) -> bool {
    path.starts_with("/assets/")
        || path.starts_with("/api/")
        || path == "/health"
        || path == "/favicon.ico"
}

#[cfg(test)]
mod tests {
    use sweldo_core::{CompanyId, CompanyRole};

    use super::{
        PortalArea, RequestPath, SignOutReason, home_path, is_guard_exempt, login_redirect,
        required_roles_for_path, sign_out_redirect,
    };

    #[test]
    fn root_login_and_logout_classify_exactly() {
        assert_eq!(RequestPath::parse("/"), RequestPath::Root);
        assert_eq!(RequestPath::parse("/login"), RequestPath::Login);
        assert_eq!(RequestPath::parse("/logout"), RequestPath::Logout);
        assert_eq!(RequestPath::parse("/login/help"), RequestPath::Other);
    }

    #[test]
    fn legacy_dashboard_keeps_its_trailing_section() {
        assert_eq!(
            RequestPath::parse("/dashboard"),
            RequestPath::LegacyDashboard { rest: None }
        );
        assert_eq!(
            RequestPath::parse("/dashboard/payroll/runs"),
            RequestPath::LegacyDashboard {
                rest: Some("payroll/runs".to_owned())
            }
        );
    }

    #[test]
    fn company_scoped_paths_carry_area_and_section() {
        let company_id = CompanyId::new();
        let parsed = RequestPath::parse(&format!("/{company_id}/dashboard/payroll/runs"));
        assert_eq!(
            parsed,
            RequestPath::CompanyScoped {
                company_id,
                area: PortalArea::Dashboard,
                section: Some("payroll".to_owned()),
            }
        );

        let parsed = RequestPath::parse(&format!("/{company_id}/employee-portal"));
        assert_eq!(
            parsed,
            RequestPath::CompanyScoped {
                company_id,
                area: PortalArea::EmployeePortal,
                section: None,
            }
        );
    }

    #[test]
    fn non_uuid_leading_segment_is_unclassified() {
        assert_eq!(RequestPath::parse("/acme/dashboard"), RequestPath::Other);
        assert_eq!(RequestPath::parse("/about"), RequestPath::Other);
    }

    #[test]
    fn protected_areas_are_flagged() {
        let company_id = CompanyId::new();
        assert!(RequestPath::parse(&format!("/{company_id}/dashboard")).is_protected());
        assert!(RequestPath::parse(&format!("/{company_id}/employee-portal/payslips")).is_protected());
        assert!(RequestPath::parse("/dashboard").is_protected());
        assert!(!RequestPath::parse("/login").is_protected());
        assert!(!RequestPath::parse("/").is_protected());
    }

    #[test]
    fn payroll_section_requires_payroll_roles() {
        let company_id = CompanyId::new();
        let path = RequestPath::parse(&format!("/{company_id}/dashboard/payroll"));
        let required = required_roles_for_path(&path);
        assert_eq!(
            required,
            Some(&[CompanyRole::CompanyAdmin, CompanyRole::PayrollAdmin][..])
        );
    }

    #[test]
    fn settings_section_is_company_admin_only() {
        let company_id = CompanyId::new();
        let path = RequestPath::parse(&format!("/{company_id}/dashboard/settings"));
        assert_eq!(
            required_roles_for_path(&path),
            Some(&[CompanyRole::CompanyAdmin][..])
        );
    }

    #[test]
    fn unknown_sections_and_portal_paths_impose_no_requirement() {
        let company_id = CompanyId::new();
        let unknown = RequestPath::parse(&format!("/{company_id}/dashboard/announcements"));
        assert_eq!(required_roles_for_path(&unknown), None);

        let portal = RequestPath::parse(&format!("/{company_id}/employee-portal/payslips"));
        assert_eq!(required_roles_for_path(&portal), None);
    }

    #[test]
    fn home_path_depends_on_role() {
        let company_id = CompanyId::new();
        assert_eq!(
            home_path(CompanyRole::Employee, company_id),
            format!("/{company_id}/employee-portal")
        );
        assert_eq!(
            home_path(CompanyRole::PayrollAdmin, company_id),
            format!("/{company_id}/dashboard")
        );
    }

    #[test]
    fn login_redirect_encodes_the_original_target() {
        assert_eq!(
            login_redirect("/dashboard/payroll?period=2024-03"),
            "/login?next=%2Fdashboard%2Fpayroll%3Fperiod%3D2024-03"
        );
    }

    #[test]
    fn sign_out_redirect_strings_are_stable() {
        assert_eq!(
            sign_out_redirect(SignOutReason::InvalidSession),
            "/logout?reason=invalid-session"
        );
        assert_eq!(
            sign_out_redirect(SignOutReason::Inactive),
            "/logout?reason=inactive"
        );
        assert_eq!(
            sign_out_redirect(SignOutReason::Expired),
            "/logout?reason=expired"
        );
    }

    #[test]
    fn reason_parsing_roundtrips_and_rejects_noise() {
        for reason in [
            SignOutReason::InvalidSession,
            SignOutReason::Inactive,
            SignOutReason::Expired,
        ] {
            assert_eq!(SignOutReason::from_param(reason.as_str()), Some(reason));
        }
        assert_eq!(SignOutReason::from_param("bored"), None);
    }

    #[test]
    fn assets_api_and_health_are_exempt() {
        assert!(is_guard_exempt("/assets/app.css"));
        assert!(is_guard_exempt("/api/context"));
        assert!(is_guard_exempt("/health"));
        assert!(!is_guard_exempt("/dashboard"));
        assert!(!is_guard_exempt("/"));
    }
}
