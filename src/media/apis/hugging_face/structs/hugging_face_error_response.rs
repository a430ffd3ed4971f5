use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct HuggingFaceErrorResponse {
    // a string for most errors, a list of strings for validation failures
    pub error: Value,
    pub estimated_time: Option<f64>,
}

impl HuggingFaceErrorResponse {
    pub fn message(&self) -> String {
        match &self.error {
            Value::String(text) => text.to_string(),
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}
