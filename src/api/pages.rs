//! Server-rendered HTML pages.
//!
//! Rendering is deliberately thin: a shared layout plus small `format!`
//! built fragments. All user-supplied text passes through [`escape`].

use axum::http::StatusCode;

use crate::db::Joke;

/// Escape text for interpolation into HTML.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Shared page shell. `user` is the logged-in username, if any.
fn layout(title: &str, user: Option<&str>, body: &str) -> String {
    let title = escape(title);
    let nav = match user {
        Some(username) => format!(
            r#"<span>Hi {}</span>
      <form action="/logout" method="post"><button type="submit">Logout</button></form>"#,
            escape(username)
        ),
        None => r#"<a href="/login">Login</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title} | Jokebox</title>
</head>
<body>
  <header>
    <h1><a href="/jokes">Jokebox</a></h1>
    <nav>{nav}</nav>
  </header>
  <main>
{body}
  </main>
</body>
</html>
"#
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        "    <h2>{}</h2>\n    <p>{}</p>",
        status.as_u16(),
        escape(message)
    );
    layout("Error", None, &body)
}

pub fn login_page(redirect_to: &str, error: Option<&str>) -> String {
    layout("Login", None, &credentials_form("/login", "Login", redirect_to, error))
}

pub fn register_page(redirect_to: &str, error: Option<&str>) -> String {
    let mut body = credentials_form("/register", "Register", redirect_to, error);
    body.push_str("\n    <p>Already have an account? <a href=\"/login\">Login</a></p>");
    layout("Register", None, &body)
}

fn credentials_form(action: &str, label: &str, redirect_to: &str, error: Option<&str>) -> String {
    let error_html = match error {
        Some(message) => format!("    <p role=\"alert\">{}</p>\n", escape(message)),
        None => String::new(),
    };

    format!(
        r#"    <h2>{label}</h2>
{error_html}    <form action="{action}" method="post">
      <input type="hidden" name="redirectTo" value="{redirect}">
      <label>Username <input type="text" name="username" required></label>
      <label>Password <input type="password" name="password" required></label>
      <button type="submit">{label}</button>
    </form>"#,
        redirect = escape(redirect_to),
    )
}

pub fn jokes_page(user: Option<&str>, random: Option<&Joke>, jokes: &[Joke]) -> String {
    let featured = match random {
        Some(joke) => format!(
            "    <p>Here's a random joke:</p>\n    <p>{}</p>",
            escape(&joke.content)
        ),
        None => "    <p>No jokes to tell yet.</p>".to_string(),
    };

    let items: String = jokes
        .iter()
        .map(|joke| {
            format!(
                "      <li><a href=\"/jokes/{}\">{}</a></li>\n",
                escape(&joke.id),
                escape(&joke.name)
            )
        })
        .collect();

    let body = format!(
        "{featured}\n    <ul>\n{items}    </ul>\n    <p><a href=\"/jokes/new\">Add your own</a></p>"
    );
    layout("Jokes", user, &body)
}

pub fn joke_page(user: Option<&str>, joke: &Joke) -> String {
    let body = format!(
        "    <p>Here's your hilarious joke:</p>\n    <p>{}</p>\n    <p><a href=\"/jokes\">Back to jokes</a></p>",
        escape(&joke.content)
    );
    layout(&joke.name, user, &body)
}

pub fn new_joke_page(user: Option<&str>, error: Option<&str>) -> String {
    let error_html = match error {
        Some(message) => format!("    <p role=\"alert\">{}</p>\n", escape(message)),
        None => String::new(),
    };

    let body = format!(
        r#"    <h2>Add your own hilarious joke</h2>
{error_html}    <form action="/jokes" method="post">
      <label>Name <input type="text" name="name"></label>
      <label>Content <textarea name="content"></textarea></label>
      <button type="submit">Add</button>
    </form>"#
    );
    layout("New joke", user, &body)
}
