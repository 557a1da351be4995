//! Server-rendered pages for the browser login flow.

use rolegate_core::UserIdentity;

/// Escapes text for use inside HTML element content and quoted attributes.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape(title)
    )
}

/// Drives the role endpoints from the index page.
const ROLE_MANAGER_SCRIPT: &str = include_str!("html/role_manager.js");

const ROLE_MANAGER_MARKUP: &str = "<section>\n<h2>Manage user roles</h2>\n\
<form id=\"userRoleForm\">\n\
<label for=\"email\">User email</label>\n\
<input type=\"email\" id=\"email\" required>\n\
<button type=\"submit\">Look up roles</button>\n\
</form>\n\
<p id=\"status\" role=\"status\"></p>\n\
<div id=\"result\"></div>\n\
<button type=\"button\" id=\"removeRolesButton\" hidden>Remove selected roles</button>\n\
<div id=\"assignRolesSection\" hidden>\n\
<form id=\"roleAssignmentForm\">\n\
<label for=\"roleDropdown\">Available roles</label>\n\
<select id=\"roleDropdown\" multiple></select>\n\
<button type=\"submit\">Assign selected roles</button>\n\
</form>\n</div>\n</section>";

/// Landing page for a signed-in user, with the role management form.
#[must_use]
pub fn index_page(identity: &UserIdentity) -> String {
    let email = identity
        .email()
        .map(|email| format!("<p>{}</p>", escape(email)))
        .unwrap_or_default();

    layout(
        "Role management",
        &format!(
            "<h1>Welcome, {}</h1>\n{email}\n<ul>\n\
             <li><a href=\"/call_downstream_api\">Call downstream API</a></li>\n\
             <li><a href=\"/logout\">Sign out</a></li>\n</ul>\n\
             {ROLE_MANAGER_MARKUP}\n<script>\n{ROLE_MANAGER_SCRIPT}</script>",
            escape(identity.display_name())
        ),
    )
}

/// Pretty-printed downstream API result.
#[must_use]
pub fn display_page(result: &serde_json::Value) -> String {
    let rendered = serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());

    layout(
        "Downstream API result",
        &format!(
            "<h1>Downstream API result</h1>\n<pre>{}</pre>\n<a href=\"/\">Back</a>",
            escape(&rendered)
        ),
    )
}

/// Shown when the login callback cannot be completed.
#[must_use]
pub fn auth_error_page(detail: &str) -> String {
    layout(
        "Login failed",
        &format!(
            "<h1>Login failed</h1>\n<p>{}</p>\n<a href=\"/login\">Try again</a>",
            escape(detail)
        ),
    )
}
