//! Semantic diagnostics.
//!
//! Every analysis pass reports into a [`Diagnostics`] collection instead of
//! failing, so one compilation attempt reports every violation found by every
//! pass. The collection preserves insertion order: pass-declaration order, then
//! each pass's visitation order.

use std::fmt;

use crate::Span;

/// The compiler stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Semantic analysis over the AST and symbol table.
    Semantic,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Semantic => f.write_str("semantic"),
        }
    }
}

/// The severity level of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The program violates a language rule.
    Error,
    /// The program is valid but contains a hazard (e.g. a local shadowing a field).
    Warning,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Error => f.write_str("error"),
            DiagnosticKind::Warning => f.write_str("warning"),
        }
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The stage that reported it.
    pub stage: Stage,
    /// The severity level of this diagnostic.
    pub kind: DiagnosticKind,
    /// The diagnostic message text.
    pub message: String,
    /// The line number of the originating node (1-based).
    pub line: u32,
    /// The column number of the originating node (1-based).
    pub col: u32,
}

impl Diagnostic {
    /// A semantic error at `span`.
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            stage: Stage::Semantic,
            kind: DiagnosticKind::Error,
            message: message.into(),
            line: span.line,
            col: span.col,
        }
    }

    /// A semantic warning at `span`.
    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            ..Self::error(span, message)
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} {}: {}",
            self.line, self.col, self.stage, self.kind, self.message
        )
    }
}

/// An ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl Diagnostics {
    /// Creates a new, empty diagnostics collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a diagnostic to the end of the collection.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Appends every diagnostic of `other`, preserving order.
    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in other {
            self.add_diagnostic(diagnostic);
        }
    }

    /// Returns `true` if the collection contains any error diagnostics.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Returns `true` if the collection contains any warning diagnostics.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns an iterator over all diagnostics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Returns an iterator over only the error diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Returns an iterator over only the warning diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(iter);
        diagnostics
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_errors_and_warnings() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_errors());

        diagnostics.add_diagnostic(Diagnostic::warning(Span::new(1, 1), "shadowed"));
        assert!(!diagnostics.has_errors());
        assert!(diagnostics.has_warnings());

        diagnostics.add_diagnostic(Diagnostic::error(Span::new(2, 3), "bad"));
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn preserves_order() {
        let diagnostics: Diagnostics = ["a", "b", "c"]
            .into_iter()
            .map(|m| Diagnostic::error(Span::default(), m))
            .collect();
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, ["a", "b", "c"]);
    }

    #[test]
    fn display_format() {
        let diagnostic = Diagnostic::error(Span::new(10, 5), "Method 'foo' does not exist");
        assert_eq!(
            diagnostic.to_string(),
            "10:5: semantic error: Method 'foo' does not exist"
        );
    }
}
