//! Server-rendered page shells.
//!
//! Markup is intentionally minimal: the pages exist to give the navigation
//! guard and the module policy a real surface to gate.

use axum::Extension;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use uuid::Uuid;

use sweldo_core::{AppError, CompanyId, SessionUser};
use sweldo_domain::{ActiveCompanyContext, Module, home_path};

use crate::dto::LoginPageQuery;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn root_page() -> Html<&'static str> {
    Html(concat!(
        "<!doctype html><html><head><title>Sweldo</title></head><body>",
        "<h1>Sweldo</h1>",
        "<p><a href=\"/login\">Sign in</a></p>",
        "</body></html>"
    ))
}

pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Html<String> {
    let notice = if query.error.is_some() {
        "<p>Invalid email or password.</p>"
    } else {
        ""
    };

    let next_field = query
        .next
        .as_deref()
        .map(|next| {
            format!(
                "<input type=\"hidden\" name=\"next\" value=\"{}\">",
                escape_html(next)
            )
        })
        .unwrap_or_default();

    Html(format!(
        concat!(
            "<!doctype html><html><head><title>Sign in</title></head><body>",
            "<h1>Sign in</h1>{notice}",
            "<form method=\"post\" action=\"/login\">",
            "<label>Email <input type=\"email\" name=\"email\" required></label>",
            "<label>Password <input type=\"password\" name=\"password\" required></label>",
            "{next_field}",
            "<button type=\"submit\">Sign in</button>",
            "</form></body></html>"
        ),
        notice = notice,
        next_field = next_field,
    ))
}

pub async fn dashboard_home_page(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(company_id): Path<Uuid>,
) -> ApiResult<Response> {
    let context = match resolve_for_company(&state, &user, company_id).await? {
        Resolved::Context(context) => context,
        Resolved::Elsewhere(redirect) => return Ok(redirect.into_response()),
    };

    let module_list: String = Module::all()
        .iter()
        .filter(|module| module.permits(context.company_role))
        .map(|module| {
            format!(
                "<li><a href=\"/{}/dashboard/{name}\">{name}</a></li>",
                context.company_id,
                name = module.as_str()
            )
        })
        .collect();

    Ok(Html(format!(
        concat!(
            "<!doctype html><html><head><title>{name}</title></head><body>",
            "<h1>{name}</h1>",
            "<ul>{modules}</ul>",
            "</body></html>"
        ),
        name = escape_html(&context.company_name),
        modules = module_list,
    ))
    .into_response())
}

pub async fn dashboard_section_page(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path((company_id, section)): Path<(Uuid, String)>,
) -> ApiResult<Response> {
    let context = match resolve_for_company(&state, &user, company_id).await? {
        Resolved::Context(context) => context,
        Resolved::Elsewhere(redirect) => return Ok(redirect.into_response()),
    };

    // Fine-grained module gate below the path-level role check.
    let leading = section.split('/').next().unwrap_or_default();
    if let Some(module) = Module::from_section(leading)
        && !module.permits(context.company_role)
    {
        return Err(AppError::Forbidden(format!(
            "role '{}' may not open the {} module",
            context.company_role.as_str(),
            module.as_str()
        ))
        .into());
    }

    Ok(Html(format!(
        concat!(
            "<!doctype html><html><head><title>{name}</title></head><body>",
            "<h1>{name}</h1>",
            "<h2>{section}</h2>",
            "</body></html>"
        ),
        name = escape_html(&context.company_name),
        section = escape_html(&section),
    ))
    .into_response())
}

pub async fn portal_home_page(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(company_id): Path<Uuid>,
) -> ApiResult<Response> {
    let context = match resolve_for_company(&state, &user, company_id).await? {
        Resolved::Context(context) => context,
        Resolved::Elsewhere(redirect) => return Ok(redirect.into_response()),
    };

    Ok(Html(format!(
        concat!(
            "<!doctype html><html><head><title>{name}</title></head><body>",
            "<h1>{name}</h1>",
            "<p>Welcome, {display_name}.</p>",
            "</body></html>"
        ),
        name = escape_html(&context.company_name),
        display_name = escape_html(user.display_name()),
    ))
    .into_response())
}

pub async fn portal_section_page(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path((company_id, section)): Path<(Uuid, String)>,
) -> ApiResult<Response> {
    let context = match resolve_for_company(&state, &user, company_id).await? {
        Resolved::Context(context) => context,
        Resolved::Elsewhere(redirect) => return Ok(redirect.into_response()),
    };

    Ok(Html(format!(
        concat!(
            "<!doctype html><html><head><title>{name}</title></head><body>",
            "<h1>{name}</h1>",
            "<h2>{section}</h2>",
            "</body></html>"
        ),
        name = escape_html(&context.company_name),
        section = escape_html(&section),
    ))
    .into_response())
}

enum Resolved {
    Context(ActiveCompanyContext),
    Elsewhere(Redirect),
}

/// Resolves the context for a company named in the path.
///
/// Resolution can legitimately land on a different company (the requested
/// one may have been revoked); in that case the user is sent to the home of
/// the company they actually resolve to instead of seeing its data under a
/// foreign URL.
async fn resolve_for_company(
    state: &AppState,
    user: &SessionUser,
    company_id: Uuid,
) -> ApiResult<Resolved> {
    let requested = CompanyId::from_uuid(company_id);
    let context = state
        .company_context_service
        .resolve(Some(user), Some(requested))
        .await?;

    if context.company_id != requested {
        let target = home_path(context.company_role, context.company_id);
        return Ok(Resolved::Elsewhere(Redirect::to(&target)));
    }

    Ok(Resolved::Context(context))
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_html;

    #[test]
    fn markup_characters_are_escaped() {
        assert_eq!(
            escape_html(r#"<b a="1">&'"#),
            "&lt;b a=&quot;1&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escape_html("Northline Corp"), "Northline Corp");
    }
}
