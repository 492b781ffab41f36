//! Structured reports of everything the parser recovered from

use log::{debug, warn};
use serde::Serialize;

/// How much a recovered failure matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// Expected quirks of the format, e.g. a comment-only block
    Info,
    /// Data was dropped or could not be linked
    Warning,
}

/// A single recovered failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Line number in the source file (1-based), if it relates to one
    pub line: Option<usize>,
    /// Importance of the report
    pub severity: Severity,
    /// What happened
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{:?} (line {line}): {}", self.severity, self.message),
            None => write!(f, "{:?}: {}", self.severity, self.message),
        }
    }
}

/// Collection of [Diagnostic]s attached to a parse or assembly result
///
/// Every entry is also sent to the `log` facade as it is recorded, so that
/// applications with a logger installed see them as they happen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning for a 0-based line index
    pub fn warn(&mut self, index: Option<usize>, message: impl Into<String>) {
        let message = message.into();
        warn!("{}{message}", Self::prefix(index));
        self.push(index, Severity::Warning, message);
    }

    /// Record an informational note for a 0-based line index
    pub fn info(&mut self, index: Option<usize>, message: impl Into<String>) {
        let message = message.into();
        debug!("{}{message}", Self::prefix(index));
        self.push(index, Severity::Info, message);
    }

    /// Append everything from another collection
    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0)
    }

    /// Iterate over all entries in the order recorded
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Only the warnings
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, index: Option<usize>, severity: Severity, message: String) {
        self.0.push(Diagnostic {
            line: index.map(|i| i + 1),
            severity,
            message,
        })
    }

    fn prefix(index: Option<usize>) -> String {
        match index {
            Some(i) => format!("line {}: ", i + 1),
            None => String::new(),
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_numbers_are_one_based() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(Some(0), "dropped");
        diagnostics.info(None, "note");

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.iter().next().unwrap().line, Some(1));
        assert_eq!(diagnostics.warnings().count(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().to_string(),
            "Warning (line 1): dropped"
        );
    }
}
