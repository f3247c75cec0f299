use isatab_model::{Message, ValidationReport};

/// Per-run aggregator of validation findings.
///
/// Append-only during a run; insertion order is the report order. One
/// store per validation run keeps concurrent runs independent (callers
/// wanting the shared form can hold one store and `reset` it between
/// runs).
#[derive(Debug, Default)]
pub struct MessageStore {
    errors: Vec<Message>,
    warnings: Vec<Message>,
    info: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty all three buckets.
    pub fn reset(&mut self) {
        self.errors.clear();
        self.warnings.clear();
        self.info.clear();
    }

    pub fn add_error(
        &mut self,
        code: i32,
        message: impl Into<String>,
        supplemental: impl Into<String>,
    ) {
        self.errors.push(Message {
            code,
            message: message.into(),
            supplemental: supplemental.into(),
        });
    }

    pub fn add_warning(
        &mut self,
        code: i32,
        message: impl Into<String>,
        supplemental: impl Into<String>,
    ) {
        self.warnings.push(Message {
            code,
            message: message.into(),
            supplemental: supplemental.into(),
        });
    }

    pub fn add_info(
        &mut self,
        code: i32,
        message: impl Into<String>,
        supplemental: impl Into<String>,
    ) {
        self.info.push(Message {
            code,
            message: message.into(),
            supplemental: supplemental.into(),
        });
    }

    pub fn errors(&self) -> &[Message] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Message] {
        &self.warnings
    }

    pub fn info(&self) -> &[Message] {
        &self.info
    }

    pub fn into_report(self, validation_finished: bool) -> ValidationReport {
        ValidationReport {
            errors: self.errors,
            warnings: self.warnings,
            info: self.info,
            validation_finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MessageStore;

    #[test]
    fn reset_empties_every_bucket() {
        let mut store = MessageStore::new();
        store.add_error(6, "a study file could not be read", "s_study1.txt");
        store.add_warning(1007, "undeclared protocol", "extraction");
        store.add_info(5001, "Found 2 study groups in s_study1.txt", "");
        store.reset();
        assert!(store.errors().is_empty());
        assert!(store.warnings().is_empty());
        assert!(store.info().is_empty());
    }

    #[test]
    fn report_preserves_insertion_order() {
        let mut store = MessageStore::new();
        store.add_warning(1010, "first", "");
        store.add_warning(1012, "second", "");
        let report = store.into_report(true);
        let codes: Vec<i32> = report.warnings.iter().map(|m| m.code).collect();
        assert_eq!(codes, vec![1010, 1012]);
        assert!(report.validation_finished);
    }
}
