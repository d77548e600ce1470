//! Diagnostics collected during a lowering run.
//!
//! Lowering never stops at the first problem. Every failed entity leaves an
//! error here, and advisory findings such as non-public fields leave a
//! warning.

use std::collections::VecDeque;
use std::fmt;

use crate::{LoweringError, SourceSite};

/// A single diagnostic message.
///
/// # Examples
///
/// ```
/// use flatbind_core::{Diagnostic, DiagnosticKind, SourceSite};
///
/// let diagnostic = Diagnostic {
///     kind: DiagnosticKind::Warning,
///     message: "field secret is not public".to_string(),
///     site: SourceSite::new("scene.hpp", 10, 5),
/// };
///
/// assert_eq!(diagnostic.to_string(), "scene.hpp:10:5: warning: field secret is not public");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity level of this diagnostic
    pub kind: DiagnosticKind,
    /// The diagnostic message text
    pub message: String,
    /// Where the offending declaration lives
    pub site: SourceSite,
}

/// The severity level of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The entity was dropped from the export.
    Error,
    /// The entity was exported, but probably not the way the author wants.
    Warning,
}

impl Diagnostic {
    pub fn error(site: SourceSite, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            message: message.into(),
            site,
        }
    }

    pub fn warning(site: SourceSite, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            message: message.into(),
            site,
        }
    }
}

impl From<LoweringError> for Diagnostic {
    fn from(error: LoweringError) -> Self {
        Diagnostic::error(error.site().clone(), error.to_string())
    }
}

/// A collection of diagnostics from one run.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    diagnostics: VecDeque<Diagnostic>,
    has_errors: bool,
}

impl Diagnostics {
    /// Creates a new, empty diagnostics collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a diagnostic to the collection.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        if diagnostic.kind == DiagnosticKind::Error {
            self.has_errors = true;
        }
        self.diagnostics.push_back(diagnostic);
    }

    /// Records a lowering error.
    pub fn add_error(&mut self, error: LoweringError) {
        self.add_diagnostic(error.into());
    }

    /// Records a warning.
    pub fn add_warning(&mut self, site: SourceSite, message: impl Into<String>) {
        self.add_diagnostic(Diagnostic::warning(site, message));
    }

    /// Returns `true` if the collection contains any error diagnostics.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
    }

    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind_str = match self.kind {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
        };
        write!(f, "{}: {}: {}", self.site, kind_str, self.message)
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_warning(SourceSite::unknown(), "field a is not public");
        assert!(!diagnostics.has_errors());
        assert!(diagnostics.has_warnings());

        diagnostics.add_error(LoweringError::not_exported(&SourceSite::unknown(), "Mesh"));
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.count(), 2);
    }

    #[test]
    fn error_conversion_drops_site_from_message() {
        let diagnostic: Diagnostic =
            LoweringError::not_exported(&SourceSite::new("a.hpp", 1, 2), "Mesh").into();
        assert_eq!(diagnostic.to_string(), "a.hpp:1:2: error: Mesh is not exported");
    }

    #[test]
    fn error_message_matches_error_display() {
        let error = LoweringError::HandleByValue {
            site: SourceSite::new("mesh.hpp", 12, 3),
            name: "gfx::Mesh".into(),
        };
        let expected = error.to_string();
        let diagnostic = Diagnostic::from(error);
        assert_eq!(diagnostic.message, expected);
        assert_eq!(diagnostic.site.line, 12);
    }

    #[test]
    fn display_lists_one_diagnostic_per_line() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_warning(SourceSite::new("a.hpp", 4, 2), "careful");
        diagnostics.add_error(LoweringError::not_exported(&SourceSite::new("a.hpp", 5, 1), "Mesh"));
        assert_eq!(
            diagnostics.to_string(),
            "a.hpp:4:2: warning: careful\na.hpp:5:1: error: Mesh is not exported\n"
        );
    }
}
