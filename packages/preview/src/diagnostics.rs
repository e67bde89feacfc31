//! # Diagnostics
//!
//! Console output captured from the preview context. The log is
//! append-only in arrival order; entries are never edited, only cleared
//! together.

use crate::Generation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Console entry point a diagnostic came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Log,
    Info,
    Warn,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Log, Severity::Info, Severity::Warn, Severity::Error];

    /// Name of the console method
    pub fn method(&self) -> &'static str {
        match self {
            Severity::Log => "log",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    pub fn from_method(method: &str) -> Option<Self> {
        Severity::ALL.into_iter().find(|s| s.method() == method)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// One captured console call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    pub severity: Severity,
    pub message: String,
    pub captured_at: DateTime<Utc>,
}

impl DiagnosticEntry {
    /// `[HH:MM:SS] LEVEL: message`
    pub fn to_line(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.captured_at.format("%H:%M:%S"),
            self.severity.method().to_uppercase(),
            self.message
        )
    }
}

/// Append-only diagnostic history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticLog {
    entries: Vec<DiagnosticEntry>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: DiagnosticEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|e| e.severity == severity).count()
    }

    /// Plain-text export for copying to the clipboard
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(DiagnosticEntry::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Host-side receiver of bridge notifications
pub trait DiagnosticSink {
    fn diagnostic_appended(&mut self, entry: &DiagnosticEntry);

    /// `None` when the error surface is cleared
    fn current_error_changed(&mut self, error: Option<&str>);

    /// Loading floor elapsed for this generation
    fn preview_ready(&mut self, generation: Generation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(severity: Severity, message: &str) -> DiagnosticEntry {
        DiagnosticEntry {
            severity,
            message: message.to_string(),
            captured_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap(),
        }
    }

    #[test]
    fn test_line_format() {
        assert_eq!(entry(Severity::Warn, "careful").to_line(), "[09:30:05] WARN: careful");
    }

    #[test]
    fn test_log_preserves_order_and_clears() {
        let mut log = DiagnosticLog::new();
        log.push(entry(Severity::Log, "one"));
        log.push(entry(Severity::Error, "two"));

        assert_eq!(log.to_text(), "[09:30:05] LOG: one\n[09:30:05] ERROR: two");
        assert_eq!(log.count(Severity::Error), 1);

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_severity_from_method() {
        assert_eq!(Severity::from_method("warn"), Some(Severity::Warn));
        assert_eq!(Severity::from_method("debug"), None);
    }
}
