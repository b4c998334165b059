//! VS Code snippet generation for automation authors
//!
//! Snippets offer the known variable names and action options of the
//! connected Companion as completion choices.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Default, Deserialize)]
struct ActionDef {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    options: Vec<ActionOption>,
}

#[derive(Debug, Default, Deserialize)]
struct ActionOption {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default)]
    choices: Vec<ActionChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct ActionChoice {
    #[serde(default)]
    id: Value,
}

fn snippet(prefix: Value, body: String, description: String) -> Value {
    json!({
        "prefix": prefix,
        "body": [body],
        "description": description,
    })
}

/// `on_change` and `var` snippets per connection, plus the button snippets.
pub fn variable_snippets(names: &BTreeMap<String, Vec<String>>) -> Map<String, Value> {
    let mut snippets = Map::new();

    for (connection, variables) in names {
        let choices = variables.join(",");
        snippets.insert(
            format!("companion_on_change_{}", connection),
            snippet(
                json!(format!("companion.on_change_{}", connection)),
                format!(
                    "companion.on_change(\"{}\", Matcher::variable(\"${{1|{}|}}\"), |${{2:change}}| async move {{\n    ${{3:// handle change}}\n    Ok(())\n}});",
                    connection, choices
                ),
                format!("on_change handler with autocomplete for {}", connection),
            ),
        );
        snippets.insert(
            format!("companion_var_{}", connection),
            snippet(
                json!(format!("companion.var_{}", connection)),
                format!(
                    "companion.var(\"{}\", \"${{1|{}|}}\")",
                    connection, choices
                ),
                format!("variable reference with autocomplete for {}", connection),
            ),
        );
    }

    for (method, label) in [
        ("on_button_down", "button down"),
        ("on_button_up", "button up"),
        ("on_rotate", "rotate"),
    ] {
        snippets.insert(
            method.to_string(),
            snippet(
                json!(format!("companion.{}", method)),
                format!(
                    "companion.{}(ButtonLocation::new(${{1:1}}, ${{2:0}}, ${{3:0}}), |${{4:event}}| async move {{\n    ${{5:// handle {}}}\n    Ok(())\n}});",
                    method, label
                ),
                format!("{} handler", method),
            ),
        );
    }

    snippets
}

/// One placeholder line of the `json!` options object.
fn option_line(option: &ActionOption, tab: usize) -> String {
    let kind = option.kind.as_deref().unwrap_or("textinput");
    match kind {
        "dropdown" if !option.choices.is_empty() => {
            let choices: Vec<String> = option
                .choices
                .iter()
                .map(|c| match &c.id {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            format!("\"{}\": \"${{{}|{}|}}\"", option.id, tab, choices.join(","))
        }
        "checkbox" => format!("\"{}\": ${{{}:false}}", option.id, tab),
        "number" => {
            let default = match &option.default {
                None | Some(Value::Null) => "0".to_string(),
                Some(Value::String(s)) if s.is_empty() => "0".to_string(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };
            format!("\"{}\": ${{{}:{}}}", option.id, tab, default)
        }
        _ => {
            let default = match &option.default {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => {
                    let quoted = Value::String(s.clone()).to_string();
                    quoted[1..quoted.len() - 1].to_string()
                }
                Some(other) => other.to_string(),
            };
            format!("\"{}\": \"${{{}:{}}}\"", option.id, tab, default)
        }
    }
}

/// One snippet per action from a `queryActions` result
/// (`{connection: {action_id: definition}}`). Malformed entries are skipped.
pub fn action_snippets(actions: &Value) -> Map<String, Value> {
    let mut snippets = Map::new();
    let Some(connections) = actions.as_object() else {
        return snippets;
    };

    for (connection, defs) in connections {
        let Some(defs) = defs.as_object() else {
            continue;
        };
        for (action_id, def) in defs {
            let Ok(def) = ActionDef::deserialize(def) else {
                continue;
            };
            let description = def.description.unwrap_or_default();
            let options: Vec<String> = def
                .options
                .iter()
                .enumerate()
                .map(|(i, option)| option_line(option, i + 1))
                .collect();

            let body = format!(
                "// {}\ncompanion.action(\"{}\", \"{}\", json!({{\n    {}\n}})).await?;",
                description,
                connection,
                action_id,
                options.join(", ")
            );

            snippets.insert(
                format!("{}.{}", connection, action_id),
                snippet(
                    json!([format!("companion.action_{} | {}", connection, description)]),
                    body,
                    description,
                ),
            );
        }
    }

    snippets
}
