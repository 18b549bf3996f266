//! User records as served by `/api/v1/{role}/{id}`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A student, teacher or parent record.
///
/// The received JSON object is held as-is and read through accessors, so
/// re-serializing reproduces it exactly: unknown keys, explicit `null`s
/// and integer/float forms all survive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord {
    fields: Map<String, Value>,
}

impl UserRecord {
    /// Create a record with a name and id
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::String(id.into()));
        fields.insert("name".to_string(), Value::String(name.into()));
        Self { fields }
    }

    /// Wrap an already decoded object
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Add a progress score, replacing a non-object `progress`
    pub fn with_progress(mut self, subject: impl Into<String>, score: impl Into<Number>) -> Self {
        let progress = self
            .fields
            .entry("progress")
            .or_insert_with(|| Value::Object(Map::new()));
        if !progress.is_object() {
            *progress = Value::Object(Map::new());
        }
        if let Value::Object(scores) = progress {
            scores.insert(subject.into(), Value::Number(score.into()));
        }
        self
    }

    /// Every field as received
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Raw value of one field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// `id`, else `userId`; strings and numbers both count
    pub fn display_id(&self) -> Option<String> {
        ["id", "userId"]
            .iter()
            .filter_map(|key| self.fields.get(*key))
            .find_map(scalar_text)
    }

    /// Name, or a placeholder for nameless records
    pub fn display_name(&self) -> &str {
        self.fields
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Unnamed user")
    }

    /// Grade or year level as text
    pub fn grade(&self) -> Option<String> {
        self.fields.get("grade").and_then(scalar_text)
    }

    /// Enrolled subjects; non-string entries are skipped
    pub fn subjects(&self) -> Vec<&str> {
        self.fields
            .get("subjects")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Raw progress entries in subject order
    pub fn progress(&self) -> Vec<(&str, &Value)> {
        self.fields
            .get("progress")
            .and_then(Value::as_object)
            .map(|scores| scores.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default()
    }

    /// Progress scores as floats; anything non-numeric is NaN
    pub fn progress_scores(&self) -> Vec<(&str, f64)> {
        self.progress()
            .into_iter()
            .map(|(subject, score)| (subject, score.as_f64().unwrap_or(f64::NAN)))
            .collect()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
