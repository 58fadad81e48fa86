use thiserror::Error;

use rowforge_core::Row;

/// Errors raised while resolving a prompt template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder '{0}'")]
    UnknownPlaceholder(String),
    #[error("unmatched '{{' in template")]
    UnclosedPlaceholder,
    #[error("unmatched '}}' in template")]
    UnexpectedClose,
}

/// Resolve `{name}` placeholders against the accumulated row context.
/// `{{` and `}}` escape literal braces.
pub fn render(template: &str, context: &Row) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => return Err(TemplateError::UnclosedPlaceholder),
                    }
                }
                match context.get(&name) {
                    Some(value) => out.push_str(&value.render()),
                    None => return Err(TemplateError::UnknownPlaceholder(name)),
                }
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(TemplateError::UnexpectedClose);
                }
            }
            ch => out.push(ch),
        }
    }

    Ok(out)
}
