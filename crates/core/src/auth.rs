use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AccessError, AppError, CompanyId, UserId};

/// Role a user holds within one company.
///
/// The enumeration is closed: values are validated once when the session
/// payload is deserialized, and anything unrecognized is rejected there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyRole {
    /// Full administrative access to every module of the company.
    CompanyAdmin,
    /// Manages employee records and attendance.
    HrAdmin,
    /// Manages payroll runs and statutory tables.
    PayrollAdmin,
    /// Regular employee confined to the self-service portal.
    Employee,
}

impl CompanyRole {
    /// Returns the stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyAdmin => "company_admin",
            Self::HrAdmin => "hr_admin",
            Self::PayrollAdmin => "payroll_admin",
            Self::Employee => "employee",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[CompanyRole] = &[
            CompanyRole::CompanyAdmin,
            CompanyRole::HrAdmin,
            CompanyRole::PayrollAdmin,
            CompanyRole::Employee,
        ];

        ALL
    }
}

impl FromStr for CompanyRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "company_admin" => Ok(Self::CompanyAdmin),
            "hr_admin" => Ok(Self::HrAdmin),
            "payroll_admin" => Ok(Self::PayrollAdmin),
            "employee" => Ok(Self::Employee),
            _ => Err(AppError::Validation(format!(
                "unknown company role '{value}'"
            ))),
        }
    }
}

/// Raw session payload as written to the session store.
///
/// Kept deliberately loose (role as a string) so a stale or tampered
/// session can still be read back and classified instead of failing
/// deserialization mid-request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// User account id.
    pub user_id: Uuid,
    /// Display name captured at sign-in.
    pub display_name: String,
    /// Email captured at sign-in, if known.
    pub email: Option<String>,
    /// Role hint for the active company, stored as its string value.
    pub role: String,
    /// Default company hint captured at sign-in.
    pub default_company_id: Option<Uuid>,
}

/// Validated user identity derived from a [`SessionRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    user_id: UserId,
    display_name: String,
    email: Option<String>,
    role: CompanyRole,
    default_company_id: Option<CompanyId>,
}

impl SessionUser {
    /// Creates a session identity from authenticated login data.
    #[must_use]
    pub fn new(
        user_id: UserId,
        display_name: impl Into<String>,
        email: Option<String>,
        role: CompanyRole,
        default_company_id: Option<CompanyId>,
    ) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            email,
            role,
            default_company_id,
        }
    }

    /// Validates a raw session record into a typed identity.
    ///
    /// This is the single trust boundary for session data: a nil user id or
    /// an unrecognized role string is a malformed identity, not a panic and
    /// not a silently ignored field.
    pub fn from_record(record: SessionRecord) -> Result<Self, AccessError> {
        if record.user_id.is_nil() {
            return Err(AccessError::Malformed(
                "session carries a nil user id".to_owned(),
            ));
        }

        let role = CompanyRole::from_str(record.role.as_str())
            .map_err(|_| AccessError::Malformed(format!("unknown role '{}'", record.role)))?;

        Ok(Self {
            user_id: UserId::from_uuid(record.user_id),
            display_name: record.display_name,
            email: record.email,
            role,
            default_company_id: record.default_company_id.map(CompanyId::from_uuid),
        })
    }

    /// Converts the identity back into its storable record form.
    #[must_use]
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            user_id: self.user_id.as_uuid(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            role: self.role.as_str().to_owned(),
            default_company_id: self.default_company_id.map(|id| id.as_uuid()),
        }
    }

    /// Returns the user account id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the display name captured at sign-in.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the email, if one was captured.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the role hint for the active company.
    #[must_use]
    pub fn role(&self) -> CompanyRole {
        self.role
    }

    /// Returns the default company hint captured at sign-in.
    #[must_use]
    pub fn default_company_id(&self) -> Option<CompanyId> {
        self.default_company_id
    }
}
