use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{OptimizerError, OptimizerResult};

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// Normalized service reply: a `status` plus whatever operation-specific
/// fields the service chose to return. The field bag is deliberately open
/// because the response schema varies per operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub status: String,

    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl ServiceResponse {
    /// The reply used when a call produced no output at all.
    #[must_use]
    pub fn error_default() -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            fields: BTreeMap::new(),
        }
    }

    /// Normalizes a raw JSON reply. A reply without a `status` key is a
    /// success; the key is injected so callers can always read it.
    pub fn from_raw(value: Value) -> OptimizerResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(OptimizerError::transport(format!(
                    "service reply was not a JSON object: {other}"
                )));
            }
        };

        let mut fields = BTreeMap::new();
        let mut status = None;
        for (key, value) in map {
            if key == "status" {
                match value {
                    Value::String(text) => status = Some(text),
                    other => status = Some(other.to_string()),
                }
            } else {
                fields.insert(key, value);
            }
        }

        Ok(Self {
            status: status.unwrap_or_else(|| STATUS_SUCCESS.to_string()),
            fields,
        })
    }

    pub fn from_json_str(text: &str) -> OptimizerResult<Self> {
        let value = serde_json::from_str::<Value>(text).map_err(|error| {
            OptimizerError::transport_with(
                format!("service reply was not valid JSON: {}", truncate(text, 200)),
                error,
            )
        })?;
        Self::from_raw(value)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == STATUS_ERROR
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Convenience accessor for string-valued reply fields such as `token`
    /// or `tenant`.
    #[must_use]
    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}
