mod login;
mod session;
mod session_helpers;

pub use login::login_handler;
pub use session::logout_handler;
pub(crate) use session_helpers::extract_request_context;

/// Session store key holding the signed-in user's record.
pub const SESSION_USER_KEY: &str = "user_identity";
