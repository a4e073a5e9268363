//! Generate-with-fallback: ask the model for a JSON object, then either
//! accept its answer (after clamping) or substitute a locally computed one.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::models::prompt::GenerationPrompt;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the model's raw reply text.
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<String>;
}

/// Closed range for one numeric field of a generated object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampRule {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
    /// Used when the field is missing or not a number. `None` makes the
    /// field mandatory.
    pub default: Option<f64>,
    pub integral: bool,
}

impl ClampRule {
    pub const fn integer(field: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self { field, min, max, default: Some(default), integral: true }
    }

    pub const fn required(field: &'static str, min: f64, max: f64) -> Self {
        Self { field, min, max, default: None, integral: false }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let value = if self.integral { value.round() } else { value };
        value.clamp(self.min, self.max)
    }
}

/// Clamps every ruled field of `map` in place.
pub fn apply_rules(map: &mut Map<String, Value>, rules: &[ClampRule]) -> std::result::Result<(), String> {
    for rule in rules {
        let current = map
            .get(rule.field)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite());
        let raw = match (current, rule.default) {
            (Some(v), _) => v,
            (None, Some(default)) => default,
            (None, None) => return Err(format!("missing numeric field `{}`", rule.field)),
        };
        let clamped = rule.clamp(raw);
        let value = if rule.integral {
            Value::from(clamped as i64)
        } else {
            Number::from_f64(clamped)
                .map(Value::Number)
                .ok_or_else(|| format!("field `{}` is not representable", rule.field))?
        };
        map.insert(rule.field.to_string(), value);
    }
    Ok(())
}

/// Finds the first balanced `{...}` in `text` that parses as a JSON object.
/// Surrounding prose and Markdown fences are ignored.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let bytes = text.as_bytes();
    let mut start = 0;
    while let Some(offset) = text[start..].find('{') {
        let open = start + offset;
        if let Some(close) = matching_brace(bytes, open) {
            if let Ok(Value::Object(map)) = serde_json::from_str(&text[open..=close]) {
                return Some(map);
            }
        }
        start = open + 1;
    }
    None
}

fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses and sanitizes a model reply into `T`.
pub fn parse_artifact<T: DeserializeOwned>(raw: &str, rules: &[ClampRule]) -> std::result::Result<T, String> {
    let mut map = extract_json_object(raw).ok_or_else(|| "no JSON object in reply".to_string())?;
    apply_rules(&mut map, rules)?;
    serde_json::from_value(Value::Object(map)).map_err(|e| e.to_string())
}

/// Runs `value` through the same rules as model output. Returns it untouched
/// if it cannot be round-tripped.
pub fn sanitize<T: Serialize + DeserializeOwned + Clone>(value: T, rules: &[ClampRule]) -> T {
    let Ok(Value::Object(mut map)) = serde_json::to_value(&value) else {
        return value;
    };
    if apply_rules(&mut map, rules).is_err() {
        return value;
    }
    serde_json::from_value(Value::Object(map)).unwrap_or(value)
}

/// Never fails: anything unusable in `raw` yields `fallback()`.
pub fn recover<T, F>(raw: &str, rules: &[ClampRule], fallback: F) -> T
where
    T: Serialize + DeserializeOwned + Clone,
    F: FnOnce() -> T,
{
    match parse_artifact(raw, rules) {
        Ok(artifact) => artifact,
        Err(reason) => {
            warn!(%reason, "unusable generation reply, using fallback");
            sanitize(fallback(), rules)
        }
    }
}

pub async fn generate_with_fallback<T, F>(
    generator: &dyn TextGenerator,
    prompt: &GenerationPrompt,
    rules: &[ClampRule],
    fallback: F,
) -> Result<T>
where
    T: Serialize + DeserializeOwned + Clone,
    F: FnOnce() -> T,
{
    if let Err(issues) = prompt.validate() {
        return Err(AppError::Other(anyhow::anyhow!(issues.join(", "))));
    }
    let raw = generator.generate(prompt).await?;
    debug!(reply.len = raw.len(), "generation reply received");
    Ok(recover(raw.trim(), rules, fallback))
}
