//! Form-field markup with inline error messages

use super::escape;
use crate::domain::FormErrors;

fn error_text(name: &str, errors: &FormErrors) -> String {
    errors
        .get(name)
        .map(|message| {
            format!(
                r#"<span class="field-error" id="{}-error">{}</span>"#,
                name,
                escape(message)
            )
        })
        .unwrap_or_default()
}

/// `<input>` of the given type; password inputs never echo their value
pub fn input(kind: &str, name: &str, label: &str, value: &str, errors: &FormErrors) -> String {
    let value = if kind == "password" { "" } else { value };
    format!(
        r#"<p><label for="{name}">{label}</label> <input type="{kind}" id="{name}" name="{name}" value="{value}">{error}</p>"#,
        name = name,
        label = escape(label),
        kind = kind,
        value = escape(value),
        error = error_text(name, errors)
    )
}

pub fn textarea(name: &str, label: &str, value: &str, errors: &FormErrors) -> String {
    format!(
        r#"<p><label for="{name}">{label}</label> <textarea id="{name}" name="{name}">{value}</textarea>{error}</p>"#,
        name = name,
        label = escape(label),
        value = escape(value),
        error = error_text(name, errors)
    )
}

fn options<F>(choices: &[(String, String)], is_selected: F) -> String
where
    F: Fn(&str) -> bool,
{
    choices
        .iter()
        .map(|(value, text)| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(value),
                if is_selected(value) { " selected" } else { "" },
                escape(text)
            )
        })
        .collect()
}

/// Single-choice select; `choices` are `(value, text)` pairs
pub fn select(
    name: &str,
    label: &str,
    choices: &[(String, String)],
    selected: &str,
    errors: &FormErrors,
) -> String {
    format!(
        r#"<p><label for="{name}">{label}</label> <select id="{name}" name="{name}">{options}</select>{error}</p>"#,
        name = name,
        label = escape(label),
        options = options(choices, |value| value == selected.trim()),
        error = error_text(name, errors)
    )
}

pub fn multi_select(
    name: &str,
    label: &str,
    choices: &[(String, String)],
    selected: &[String],
    errors: &FormErrors,
) -> String {
    format!(
        r#"<p><label for="{name}">{label}</label> <select id="{name}" name="{name}" multiple>{options}</select>{error}</p>"#,
        name = name,
        label = escape(label),
        options = options(choices, |value| selected.iter().any(|s| s.trim() == value)),
        error = error_text(name, errors)
    )
}

pub fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        name,
        escape(value)
    )
}

pub fn form(action: &str, fields: &[String], submit: &str) -> String {
    format!(
        r#"<form method="POST" action="{}">
{}
<p><input type="submit" name="submit" value="{}"></p>
</form>"#,
        escape(action),
        fields.join("\n"),
        escape(submit)
    )
}
