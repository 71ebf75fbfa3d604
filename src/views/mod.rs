//! HTML rendering
//!
//! Pages are plain strings assembled from a shared layout and a handful of
//! form-field helpers. Every interpolated value goes through `escape`.

pub mod fields;
pub mod pages;

use std::fmt::Write;

/// Per-request page chrome: who is logged in and the pending flash message
#[derive(Debug, Default, Clone)]
pub struct Chrome<'a> {
    pub user: Option<&'a str>,
    pub flash: Option<&'a str>,
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
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

pub fn layout(title: &str, chrome: &Chrome, body: &str) -> String {
    let mut nav = String::from(r#"<a href="/">Home</a>"#);
    match chrome.user {
        Some(username) => {
            let _ = write!(
                nav,
                r#" <a href="/create_book">Create Book</a> <a href="/create_author">Create Author</a> <a href="/create_genre">Create Genre</a> <a href="/profile/{}">{}</a> <a href="/logout">Log Out</a>"#,
                urlencoding::encode(username),
                escape(username)
            );
        }
        None => {
            nav.push_str(r#" <a href="/login">Log In</a> <a href="/signup">Sign Up</a>"#);
        }
    }

    let flash = chrome
        .flash
        .map(|message| format!(r#"<p class="flash">{}</p>"#, escape(message)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Books Catalog</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<nav>{nav}</nav>
{flash}
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        nav = nav,
        flash = flash,
        body = body
    )
}
