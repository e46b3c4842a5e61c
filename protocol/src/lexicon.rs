use serde::{Serialize, Deserialize};
use serde_json::Value;

/// One catalog entry: the word everybody but the imposter sees, and the
/// hints the imposter may get instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub topic: String,
    #[serde(default)]
    pub hints: Vec<String>,
}

impl Topic {
    pub fn new(topic: impl Into<String>, hints: &[&str]) -> Self {
        Self {
            topic: topic.into(),
            hints: hints.iter().map(|h| h.to_string()).collect(),
        }
    }

    /// Accepts `{topic, hints}` with `name` as a fallback for `topic`.
    /// Non-string hints are dropped, string hints are kept as they are, a
    /// missing or non-array `hints` is empty.
    pub fn from_value(entry: &Value) -> Option<Self> {
        let obj = entry.as_object()?;
        let topic = obj.get("topic")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| obj.get("name").and_then(Value::as_str).map(str::trim))?;
        if topic.is_empty() {
            return None;
        }
        let hints = obj.get("hints")
            .and_then(Value::as_array)
            .map(|hints| {
                hints.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Some(Self { topic: topic.to_string(), hints })
    }
}

/// `None` when the payload is not an array at all; otherwise every entry
/// that survives `Topic::from_value`, in order.
pub fn normalize_topics(raw: &Value) -> Option<Vec<Topic>> {
    let entries = raw.as_array()?;
    Some(entries.iter().filter_map(Topic::from_value).collect())
}
