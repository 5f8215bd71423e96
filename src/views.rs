//! Server-side HTML for the browser flow.
//!
//! Pages are small enough to render with `format!`; every interpolated value
//! goes through [`escape`].

use std::fmt::Write;

use crate::models::PredictionView;

// ---

/// Flash-style message shown above a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    Success(&'a str),
    Danger(&'a str),
}

impl Notice<'_> {
    fn render(&self) -> String {
        let (class, text) = match self {
            Notice::Success(t) => ("success", t),
            Notice::Danger(t) => ("danger", t),
        };
        format!(r#"<div class="alert alert-{class}">{}</div>"#, escape(text))
    }
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(input: &str) -> String {
    // ---
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn notice_html(notice: Option<Notice<'_>>) -> String {
    notice.map(|n| n.render()).unwrap_or_default()
}

pub fn home_page() -> String {
    layout(
        "Event Advisor",
        r#"<p>Predict likely events for a date and place, with safety guidance.</p>
<p><a href="/signup">Sign up</a> | <a href="/login">Log in</a> | <a href="/index">Predict</a></p>"#,
    )
}

fn credentials_form(action: &str, button: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
<label>Username <input type="text" name="username" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">{button}</button>
</form>"#
    )
}

pub fn signup_page(notice: Option<Notice<'_>>) -> String {
    let body = format!(
        "{}\n{}\n<p>Already registered? <a href=\"/login\">Log in</a></p>",
        notice_html(notice),
        credentials_form("/signup", "Sign up"),
    );
    layout("Sign up", &body)
}

pub fn login_page(notice: Option<Notice<'_>>) -> String {
    let body = format!(
        "{}\n{}\n<p>New here? <a href=\"/signup\">Sign up</a></p>",
        notice_html(notice),
        credentials_form("/login", "Log in"),
    );
    layout("Log in", &body)
}

/// Prediction form, optionally followed by a result.
pub fn index_page(
    username: &str,
    locations: &[String],
    result: Option<&PredictionView>,
    notice: Option<Notice<'_>>,
) -> String {
    // ---
    let mut body = String::new();
    let _ = writeln!(
        body,
        r#"<p>Signed in as {} (<a href="/logout">log out</a>)</p>"#,
        escape(username)
    );
    body.push_str(&notice_html(notice));

    body.push_str("<form method=\"post\" action=\"/index\">\n");
    body.push_str("<label>Date <input type=\"date\" name=\"date\" required></label>\n");
    body.push_str("<label>Location <select name=\"location\" required>\n");
    for location in locations {
        let location = escape(location);
        let _ = writeln!(body, r#"<option value="{location}">{location}</option>"#);
    }
    body.push_str("</select></label>\n<button type=\"submit\">Predict</button>\n</form>\n");

    if let Some(view) = result {
        body.push_str(&result_section(view));
    }

    layout("Event Prediction", &body)
}

fn result_section(view: &PredictionView) -> String {
    // ---
    let mut out = String::from("<section id=\"result\">\n");
    let _ = writeln!(
        out,
        r#"<h2>Predicted event: <span id="prediction">{}</span></h2>"#,
        escape(&view.prediction)
    );
    out.push_str("<ol id=\"recommendation\">\n");
    for item in &view.recommendation {
        let _ = writeln!(out, "<li>{}</li>", escape(item));
    }
    out.push_str("</ol>\n");
    let _ = writeln!(
        out,
        r#"<p>Emergency number: <span id="emergency_number">{}</span></p>"#,
        escape(&view.emergency_number)
    );
    let _ = writeln!(
        out,
        r#"<p>Severity: <span id="severity">{}</span></p>"#,
        escape(&view.severity)
    );
    let _ = writeln!(
        out,
        r#"<p>Precaution: <span id="precaution">{}</span></p>"#,
        escape(&view.precaution)
    );
    out.push_str("</section>\n");
    out
}

pub fn error_page(message: &str) -> String {
    layout(
        "Something went wrong",
        &format!("{}\n<p><a href=\"/\">Home</a></p>", Notice::Danger(message).render()),
    )
}
