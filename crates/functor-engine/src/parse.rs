//! Tolerant parsing of language model output.
//!
//! Models asked for JSON still wrap it in prose, fence it in markdown, or
//! leave trailing commas. [`extract_json_value`] tries, in order:
//! 1. Direct `serde_json` deserialization
//! 2. The first fenced code block
//! 3. The span from the first opening bracket to the last matching closer
//!
//! and retries each candidate with trailing commas stripped.

use serde_json::Value;

use crate::error::EngineError;

/// Find the JSON document in raw model output, if there is one.
pub fn extract_json_value(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    let candidates = [
        Some(trimmed),
        extract_code_block(trimmed),
        outermost_brackets(trimmed),
    ];

    candidates.into_iter().flatten().find_map(|candidate| {
        serde_json::from_str(candidate)
            .ok()
            .or_else(|| serde_json::from_str(&strip_trailing_commas(candidate)).ok())
    })
}

/// Parse extraction output into mention strings.
///
/// Accepts a bare array of strings or an object whose `entities` or
/// `concepts` field is one. Non-string items are skipped and blank strings
/// dropped.
///
/// # Errors
///
/// [`EngineError::MalformedExtraction`] when no JSON is found or it has
/// neither accepted shape.
pub fn parse_entities(raw: &str) -> Result<Vec<String>, EngineError> {
    let value = extract_json_value(raw).ok_or_else(|| {
        EngineError::MalformedExtraction("no JSON found in extraction output".to_owned())
    })?;

    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => ["entities", "concepts"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .ok_or_else(|| {
                EngineError::MalformedExtraction(
                    "extraction object has no `entities` or `concepts` array".to_owned(),
                )
            })?,
        other => {
            return Err(EngineError::MalformedExtraction(format!(
                "expected a list of concepts, got {}",
                json_kind(other)
            )));
        }
    };

    Ok(items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|mention| !mention.is_empty())
        .map(ToOwned::to_owned)
        .collect())
}

/// Parse world specification output into a raw `{nodes, edges}` value.
///
/// Only the JSON is recovered here; validation of nodes and edges happens
/// when the graph is rebuilt from the value.
///
/// # Errors
///
/// [`EngineError::MalformedExtraction`] when the output holds no JSON
/// object.
pub fn parse_world_spec(raw: &str) -> Result<Value, EngineError> {
    match extract_json_value(raw) {
        Some(value @ Value::Object(_)) => Ok(value),
        Some(other) => Err(EngineError::MalformedExtraction(format!(
            "expected a world specification object, got {}",
            json_kind(&other)
        ))),
        None => Err(EngineError::MalformedExtraction(
            "no JSON found in world specification output".to_owned(),
        )),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Body of the first markdown code block, skipping a language tag line.
fn extract_code_block(text: &str) -> Option<&str> {
    let (_, after_open) = text.split_once("```")?;
    let body = match after_open.split_once('\n') {
        Some((tag, rest)) if tag.trim().chars().all(char::is_alphanumeric) => rest,
        _ => after_open,
    };
    let (block, _) = body.split_once("```")?;
    Some(block.trim())
}

/// From the first `{` or `[` through the last matching closer.
fn outermost_brackets(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let close = if text.get(start..)?.starts_with('{') {
        '}'
    } else {
        ']'
    };
    let end = text.rfind(close)?;
    text.get(start..=end)
}

/// Drop commas that directly precede `}` or `]`, leaving string contents
/// untouched.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars.iter().skip(i).skip(1).find(|n| !n.is_whitespace()).copied();
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        result.push(c);
    }

    result
}
