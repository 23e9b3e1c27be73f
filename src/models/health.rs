use serde::{Deserialize, Serialize};

/// One entry of a health report: a named check, a message, and optional
/// detail (spec §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthEntry {
    pub check: String,
    pub message: String,
    pub detail: Option<String>,
}

impl HealthEntry {
    pub fn new(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// `errors` are integrity violations that should be impossible if the
/// engine is correct; `warnings` are benign anomalies (spec §4.7).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthReport {
    pub errors: Vec<HealthEntry>,
    pub warnings: Vec<HealthEntry>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}
