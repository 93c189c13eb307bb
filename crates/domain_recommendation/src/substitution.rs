//! `{{path}}` placeholder substitution
//!
//! Placeholders name a dotted path into the answers. Whitespace inside the
//! braces is ignored. A placeholder whose path does not resolve, or resolves
//! to `null`, is left in the text unchanged.

use core_kernel::Answers;
use serde_json::Value;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replaces every resolvable placeholder in `template`
///
/// # Example
///
/// ```
/// use core_kernel::Answers;
/// use domain_recommendation::substitute;
/// use serde_json::json;
///
/// let answers = Answers::new().with("user", json!({ "name": "Ada" }));
/// assert_eq!(substitute("Hello {{user.name}}", &answers), "Hello Ada");
/// assert_eq!(substitute("Hello {{ user.email }}", &answers), "Hello {{ user.email }}");
/// ```
pub fn substitute(template: &str, answers: &Answers) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let (before, tail) = rest.split_at(start);
        output.push_str(before);

        let body = &tail[OPEN.len()..];
        match body.find(CLOSE) {
            Some(end) if is_placeholder(&body[..end]) => {
                let path = body[..end].trim();
                match answers.resolve(path).and_then(render) {
                    Some(text) => output.push_str(&text),
                    None => output.push_str(&tail[..OPEN.len() + end + CLOSE.len()]),
                }
                rest = &body[end + CLOSE.len()..];
            }
            _ => {
                // Not a placeholder here; a later brace may still open one.
                output.push('{');
                rest = &tail[1..];
            }
        }
    }

    output.push_str(rest);
    output
}

/// Whether `text` contains at least one placeholder
pub fn has_placeholders(text: &str) -> bool {
    text.find(OPEN)
        .and_then(|start| text[start + OPEN.len()..].find(CLOSE))
        .is_some()
}

fn is_placeholder(inner: &str) -> bool {
    !inner.trim().is_empty() && !inner.contains(['{', '}'])
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}
