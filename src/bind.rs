use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ConfigurationError, ExclaimResult};
use crate::value::Value;

/// A reference to a value in the render environment, addressed by a dotted
/// path such as `user.address.city` or `items.0.name`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bind {
    path: String,
    segments: Vec<String>,
    /// The raw `{"$bind": ...}` declaration, `null` when built by hand.
    pub declaration: serde_json::Value,
}

impl Bind {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let segments = path
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Bind {
            path,
            segments,
            declaration: serde_json::Value::Null,
        }
    }

    /// Build a bind from the value of a `$bind` key.
    pub(crate) fn from_declaration(
        path: &serde_json::Value,
        declaration: serde_json::Value,
    ) -> ExclaimResult<Self> {
        let serde_json::Value::String(path) = path else {
            return Err(ConfigurationError::BindPathNotString {
                found: json_kind(path).to_string(),
            }
            .into());
        };
        Ok(Bind {
            declaration,
            ..Bind::new(path.as_str())
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk the path through `env`.
    ///
    /// Objects are indexed by the segment text, arrays by the segment parsed
    /// as a non-negative base-10 integer. Anything else along the way, a
    /// missing key or an index out of range yields `Value::Null`.
    pub fn evaluate(&self, env: &Value) -> Value {
        let mut current = env;
        for segment in &self.segments {
            let next = match current {
                Value::Object(map) => map.get(segment.as_str()),
                Value::Array(items) => array_index(segment).and_then(|index| items.get(index)),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Value::Null,
            }
        }
        current.clone()
    }
}

fn array_index(segment: &str) -> Option<usize> {
    static INDEX_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = INDEX_REGEX.get_or_init(|| Regex::new(r"^[0-9]+$").unwrap());
    if re.is_match(segment) {
        segment.parse().ok()
    } else {
        None
    }
}

/// Short name of a JSON value's shape, used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "map",
    }
}
