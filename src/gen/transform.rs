//! Value transforms applied by `var` before writing

use std::borrow::Cow;

/// A named transform for column values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Quoted string literal
    String,
    /// Value as-is (`raw` or `none`)
    Raw,
}

impl std::str::FromStr for Transform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Transform::String),
            "raw" | "none" => Ok(Transform::Raw),
            _ => Err(format!("Unknown transform `{}`", s)),
        }
    }
}

impl Transform {
    pub fn apply<'v>(&self, value: &'v str) -> Cow<'v, str> {
        match self {
            Transform::String => Cow::Owned(quote(value)),
            Transform::Raw => Cow::Borrowed(value),
        }
    }
}

/// Wrap in double quotes, escaping only `\`, `'`, `"`, newline and tab
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' | '\'' | '"' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
