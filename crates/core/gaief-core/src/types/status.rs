//! Opaque diagnostic payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /health` body; shape is up to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthStatus(pub Value);

impl HealthStatus {
    /// Top-level `status` string, if any
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(|v| v.as_str())
    }
}

/// `GET /debug/student/{id}` body, passed through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebugRecord(pub Value);
