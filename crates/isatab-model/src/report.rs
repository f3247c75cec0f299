use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single validation finding.
///
/// Codes are a small, stable integer catalogue; callers may filter on
/// them but must not reinterpret them. Code 0 is reserved for system
/// errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub code: i32,
    pub message: String,
    pub supplemental: String,
}

/// The full result of one validation run. Message order within each
/// bucket equals rule-execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<Message>,
    pub warnings: Vec<Message>,
    pub info: Vec<Message>,
    pub validation_finished: bool,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All messages carrying the given code, across the three buckets.
    pub fn with_code(&self, code: i32) -> impl Iterator<Item = &Message> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.info.iter())
            .filter(move |message| message.code == code)
    }
}
