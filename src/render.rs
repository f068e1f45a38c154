//! Rendering a text template against JSON data

use std::fs;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value};
use tracing::info;

use crate::config::RenderConfig;
use crate::error::{Diagnostic, Diagnostics, ErrorKind};

/// Rendered text and the data values that had to be skipped
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub text: String,
    pub diagnostics: Diagnostics,
}

/// Normalise a JSON document into template data where every leaf is text.
///
/// The root must be an object. Values without a text form are skipped with a
/// warning naming their key.
pub fn template_data(file: &str, value: &Value) -> Result<(Value, Diagnostics)> {
    let Value::Object(map) = value else {
        bail!("JSON document is not an object");
    };

    let mut diagnostics = Diagnostics::new();
    let data = normalize_object(file, map, &mut diagnostics);
    Ok((Value::Object(data), diagnostics))
}

fn normalize_object(file: &str, map: &Map<String, Value>, diagnostics: &mut Diagnostics) -> Map<String, Value> {
    let mut out = Map::new();

    for (key, value) in map {
        let normalized = match value {
            Value::Object(inner) => Value::Object(normalize_object(file, inner, diagnostics)),
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(inner) => {
                            list.push(Value::Object(normalize_object(file, inner, diagnostics)))
                        }
                        Value::String(_) => list.push(item.clone()),
                        _ => diagnostics.push(unsupported(
                            file,
                            format!("Unsupported array element type for key `{}`", key),
                        )),
                    }
                }
                Value::Array(list)
            }
            Value::String(_) => value.clone(),
            Value::Bool(b) => Value::String(b.to_string()),
            Value::Number(n) => Value::String(n.to_string()),
            Value::Null => {
                diagnostics.push(unsupported(
                    file,
                    format!("Unsupported JSON value type for key `{}`", key),
                ));
                continue;
            }
        };
        out.insert(key.clone(), normalized);
    }

    out
}

fn unsupported(file: &str, message: String) -> Diagnostic {
    Diagnostic::warning(ErrorKind::InvalidData, file, None, message)
}

/// Render a mustache `template` with `data`; output is not escaped
pub fn render_template(template: &str, data: &Value) -> Result<String> {
    let template = mustache::compile_str(&unescaped_variables(template))
        .map_err(|e| anyhow!("Failed to parse mustache: {}", e))?;

    let mut out = Vec::new();
    template
        .render(&mut out, data)
        .map_err(|e| anyhow!("Failed to render template: {}", e))?;
    String::from_utf8(out).context("Rendered template is not UTF-8")
}

/// Turn every `{{name}}` into `{{&name}}` so values are written as-is.
///
/// Section, inverted, closing, comment, partial, delimiter and already
/// unescaped tags are left alone. Custom delimiters are not rewritten.
fn unescaped_variables(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let (before, tag) = rest.split_at(start + 2);
        out.push_str(before);
        if !tag.trim_start().starts_with(|c: char| "{&#^/!>=".contains(c)) {
            out.push('&');
        }
        rest = tag;
    }

    out.push_str(rest);
    out
}

/// Load template and data from the configured paths and render
pub fn render_files(config: &RenderConfig) -> Result<Rendered> {
    let template = fs::read_to_string(&config.template_path)
        .with_context(|| format!("Failed to open {}", config.template_path.display()))?;
    let json = fs::read_to_string(&config.data_path)
        .with_context(|| format!("Failed to open {}", config.data_path.display()))?;

    let file = config.data_path.display().to_string();
    let value: Value = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse JSON in {}", file))?;
    let (data, diagnostics) = template_data(&file, &value)?;

    let text = render_template(&template, &data)?;
    Ok(Rendered { text, diagnostics })
}

pub fn write_output(config: &RenderConfig, rendered: &Rendered) -> Result<()> {
    fs::write(&config.output_path, &rendered.text)
        .with_context(|| format!("Failed to open file for writing: {}", config.output_path.display()))?;
    info!(path = %config.output_path.display(), "Wrote rendered template");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_values_become_text() {
        let value = json!({
            "name": "Widget",
            "enabled": true,
            "count": 3,
            "tags": ["a", "b", 1],
            "items": [{ "id": "x", "ok": false }],
            "nothing": null
        });

        let (data, diagnostics) = template_data("d.json", &value).unwrap();

        assert_eq!(data["enabled"], json!("true"));
        assert_eq!(data["count"], json!("3"));
        assert_eq!(data["tags"], json!(["a", "b"]));
        assert_eq!(data["items"][0]["ok"], json!("false"));
        assert!(data.get("nothing").is_none());

        assert!(diagnostics.is_success());
        assert_eq!(diagnostics.warning_count(), 2);
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(template_data("d.json", &json!(["a"])).is_err());
    }

    #[test]
    fn test_render_without_escaping() {
        let (data, _) = template_data(
            "d.json",
            &json!({ "name": "<Widget>", "tags": ["a", "b"] }),
        )
        .unwrap();

        let text = render_template("{{ name }}:{{#tags}} {{.}}{{/tags}} {{{name}}}", &data).unwrap();
        assert_eq!(text, "<Widget>: a b <Widget>");
    }

    #[test]
    fn test_sections_over_lists() {
        let (data, _) = template_data(
            "d.json",
            &json!({
                "items": [{ "name": "a" }, { "name": "b" }],
                "tags": ["x", "y"],
                "empty": []
            }),
        )
        .unwrap();

        let text = render_template(
            "{{#items}}{{name}};{{/items}}|{{#tags}}[{{.}}]{{/tags}}|{{#empty}}never{{/empty}}{{^empty}}none{{/empty}}",
            &data,
        )
        .unwrap();
        assert_eq!(text, "a;b;|[x][y]|none");
    }

    #[test]
    fn test_only_plain_variables_are_rewritten() {
        assert_eq!(
            unescaped_variables("{{a}} {{ b }} {{#s}}{{/s}} {{^s}}{{/s}} {{{c}}} {{&d}} {{! note}} {{>p}}"),
            "{{&a}} {{& b }} {{#s}}{{/s}} {{^s}}{{/s}} {{{c}}} {{&d}} {{! note}} {{>p}}"
        );
    }

    #[test]
    fn test_unclosed_section_is_an_error() {
        assert!(render_template("{{#items}}x", &json!({ "items": [] })).is_err());
    }
}
