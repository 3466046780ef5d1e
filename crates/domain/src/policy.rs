use sweldo_core::CompanyRole;

/// Named functional area subject to role-based allow/deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    /// Employee master records.
    Employees,
    /// Daily time records and schedules.
    Attendance,
    /// Payroll runs and statutory tables.
    Payroll,
    /// Printable and exportable HR/payroll reports.
    Reports,
    /// Company configuration.
    Settings,
}

impl Module {
    /// Returns the stable name used in route sections and API payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Attendance => "attendance",
            Self::Payroll => "payroll",
            Self::Reports => "reports",
            Self::Settings => "settings",
        }
    }

    /// Returns all known modules.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Module] = &[
            Module::Employees,
            Module::Attendance,
            Module::Payroll,
            Module::Reports,
            Module::Settings,
        ];

        ALL
    }

    /// Maps a dashboard section name to its module, if it names one.
    #[must_use]
    pub fn from_section(section: &str) -> Option<Self> {
        Self::all()
            .iter()
            .find(|module| module.as_str() == section)
            .copied()
    }

    /// Returns whether the role may enter this module.
    ///
    /// Company admins implicitly see every module; the other roles carry an
    /// explicit allow-list. Employees work in the self-service portal and
    /// have no dashboard module access at all.
    #[must_use]
    pub fn permits(&self, role: CompanyRole) -> bool {
        match role {
            CompanyRole::CompanyAdmin => true,
            CompanyRole::HrAdmin => {
                matches!(self, Self::Employees | Self::Attendance | Self::Reports)
            }
            CompanyRole::PayrollAdmin => {
                matches!(self, Self::Payroll | Self::Attendance | Self::Reports)
            }
            CompanyRole::Employee => false,
        }
    }
}

/// Returns whether the role may read raw time-in/time-out punches and
/// schedules for the whole workforce.
///
/// Narrower than attendance module access: a payroll admin sees the
/// attendance summary but not per-employee punch data.
#[must_use]
pub fn can_view_sensitive_attendance(role: CompanyRole) -> bool {
    matches!(role, CompanyRole::CompanyAdmin | CompanyRole::HrAdmin)
}

#[cfg(test)]
mod tests {
    use sweldo_core::CompanyRole;

    use super::{Module, can_view_sensitive_attendance};

    #[test]
    fn company_admin_enters_every_module() {
        for module in Module::all() {
            assert!(module.permits(CompanyRole::CompanyAdmin));
        }
    }

    #[test]
    fn employee_enters_no_module() {
        for module in Module::all() {
            assert!(!module.permits(CompanyRole::Employee));
        }
    }

    #[test]
    fn hr_admin_is_kept_out_of_payroll_and_settings() {
        assert!(Module::Employees.permits(CompanyRole::HrAdmin));
        assert!(Module::Attendance.permits(CompanyRole::HrAdmin));
        assert!(Module::Reports.permits(CompanyRole::HrAdmin));
        assert!(!Module::Payroll.permits(CompanyRole::HrAdmin));
        assert!(!Module::Settings.permits(CompanyRole::HrAdmin));
    }

    #[test]
    fn payroll_admin_sees_attendance_but_not_raw_punches() {
        assert!(Module::Attendance.permits(CompanyRole::PayrollAdmin));
        assert!(!can_view_sensitive_attendance(CompanyRole::PayrollAdmin));
    }

    #[test]
    fn sensitive_attendance_is_limited_to_company_and_hr_admins() {
        assert!(can_view_sensitive_attendance(CompanyRole::CompanyAdmin));
        assert!(can_view_sensitive_attendance(CompanyRole::HrAdmin));
        assert!(!can_view_sensitive_attendance(CompanyRole::Employee));
    }

    #[test]
    fn section_names_map_back_to_modules() {
        for module in Module::all() {
            assert_eq!(Module::from_section(module.as_str()), Some(*module));
        }
        assert_eq!(Module::from_section("timekeeping"), None);
    }
}
