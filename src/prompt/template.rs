//! Placeholder substitution engine.
//!
//! Renders `{name}` placeholders from a variables map. Used for the prompt
//! skeleton and for the inference command line.
//!
//! # Syntax
//!
//! - `{name}` - Substitutes the value of `name` (surrounding whitespace inside
//!   the braces is ignored, so `{ name }` works too)
//! - `{{` - Renders as literal `{`
//! - `}}` - Renders as literal `}`
//!
//! A placeholder that is not in the variables map is an error, never an
//! empty substitution.

use std::collections::HashMap;
use thiserror::Error;

/// Error type for template rendering failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A placeholder was referenced but no value was supplied.
    #[error("undefined placeholder '{name}' at position {position} in template")]
    UndefinedPlaceholder {
        /// The placeholder name, trimmed.
        name: String,
        /// Byte offset of the opening brace.
        position: usize,
    },

    /// A `{` was found without a matching `}`.
    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace {
        /// Byte offset of the unmatched brace.
        position: usize,
    },

    /// A placeholder with no name (e.g., `{}` or `{  }`).
    #[error("empty placeholder name '{{}}' at position {position} in template")]
    EmptyPlaceholder {
        /// Byte offset of the opening brace.
        position: usize,
    },
}

/// One piece of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(String),
    Placeholder { name: &'a str, position: usize },
}

/// Split a template into literal text and placeholders, resolving escapes.
fn scan(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                literal.push('{');
            }
            '{' => {
                let start = pos + 1;
                let end = loop {
                    match chars.next() {
                        Some((close, '}')) => break close,
                        Some(_) => {}
                        None => return Err(TemplateError::UnmatchedBrace { position: pos }),
                    }
                };

                let name = template[start..end].trim();
                if name.is_empty() {
                    return Err(TemplateError::EmptyPlaceholder { position: pos });
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder {
                    name,
                    position: pos,
                });
            }
            '}' => {
                // `}}` collapses to one brace; a lone `}` is kept as-is.
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                }
                literal.push('}');
            }
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

/// Render a template by substituting placeholders from `variables`.
///
/// # Examples
///
/// ```
/// use aladin::prompt::{render_template, vars};
///
/// let vars = vars([("topic_name", "Cats"), ("keyword", "feline care")]);
/// let out = render_template("Write about {topic_name} ({ keyword }).", &vars).unwrap();
/// assert_eq!(out, "Write about Cats (feline care).");
/// ```
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut result = String::with_capacity(template.len());

    for segment in scan(template)? {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Placeholder { name, position } => match variables.get(name) {
                Some(value) => result.push_str(value),
                None => {
                    return Err(TemplateError::UndefinedPlaceholder {
                        name: name.to_string(),
                        position,
                    });
                }
            },
        }
    }

    Ok(result)
}

/// List the distinct placeholder names a template references, in first-use order.
pub fn placeholders(template: &str) -> Result<Vec<String>, TemplateError> {
    let mut names: Vec<String> = Vec::new();

    for segment in scan(template)? {
        if let Segment::Placeholder { name, .. } = segment
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
    }

    Ok(names)
}

/// Build a variables map from key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
