use axum::http::HeaderMap;

pub(crate) fn extract_request_context(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);

    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);

    (ip_address, user_agent)
}

/// Accepts a post-login return target only when it is a same-site path.
///
/// Anything absolute (`https://...`) or protocol-relative (`//...`) is an
/// open-redirect vector and is dropped in favor of the home path.
pub(super) fn safe_return_target(next: Option<&str>) -> Option<String> {
    next.filter(|value| value.starts_with('/') && !value.starts_with("//"))
        .map(ToOwned::to_owned)
}
