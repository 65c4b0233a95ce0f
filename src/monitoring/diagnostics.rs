//! Diagnostics Handle
//!
//! Components receive a [`Diagnostics`] value instead of logging through
//! ambient state. Every record is forwarded to the `log` facade under the
//! handle's target, and a capturing handle also keeps the records in memory.

use std::cell::RefCell;
use std::rc::Rc;

use log::Level;

/// One diagnostic line emitted by a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Logging handle passed explicitly into each component.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    target: String,
    captured: Option<Rc<RefCell<Vec<Record>>>>,
}

impl Diagnostics {
    /// Creates a handle that only forwards to the `log` facade.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            captured: None,
        }
    }

    /// Creates a handle that also keeps every record in memory.
    pub fn capturing(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            captured: Some(Rc::new(RefCell::new(Vec::new()))),
        }
    }

    /// Derives a handle for a sub-component, sharing the capture buffer.
    pub fn scoped(&self, component: &str) -> Self {
        Self {
            target: format!("{}::{}", self.target, component),
            captured: self.captured.clone(),
        }
    }

    /// Returns the log target used by this handle.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        let message = message.into();
        log::log!(target: self.target.as_str(), level, "{}", message);

        if let Some(ref captured) = self.captured {
            captured.borrow_mut().push(Record {
                level,
                target: self.target.clone(),
                message,
            });
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    /// Returns captured records, oldest first. Empty for non-capturing handles.
    pub fn records(&self) -> Vec<Record> {
        self.captured
            .as_ref()
            .map(|captured| captured.borrow().clone())
            .unwrap_or_default()
    }

    /// Checks whether a captured record at `level` contains `needle`.
    pub fn has_record(&self, level: Level, needle: &str) -> bool {
        self.records()
            .iter()
            .any(|record| record.level == level && record.message.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_handle_keeps_nothing() {
        let diagnostics = Diagnostics::new("rels2sp");
        diagnostics.info("create workflow builder");
        assert!(diagnostics.records().is_empty());
    }

    #[test]
    fn test_capturing_handle_records_levels() {
        let diagnostics = Diagnostics::capturing("rels2sp");
        diagnostics.info("start");
        diagnostics.error("stage failed");

        let records = diagnostics.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Level::Info);
        assert!(diagnostics.has_record(Level::Error, "stage failed"));
        assert!(!diagnostics.has_record(Level::Info, "stage failed"));
    }

    #[test]
    fn test_scoped_handle_shares_buffer() {
        let root = Diagnostics::capturing("rels2sp");
        let builder = root.scoped("builder");
        builder.warn("unknown block");

        assert_eq!(builder.target(), "rels2sp::builder");
        let records = root.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, "rels2sp::builder");
    }
}
