//! Diagnostic reporting.
//!
//! Semantic passes never print; they hand [`Diagnostic`]s to a
//! [`DiagnosticSink`]. The driver decides what to do with them. The
//! [`Diagnostics`] collector is the sink used by tests and by drivers that
//! render everything at the end of a compilation.

use crate::span::Span;
use std::fmt::{self, Write};

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// Error: the declaration is invalid
    Error,
    /// Warning: suspicious code, analysis continues
    Warning,
    /// Note: additional information
    Note,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Note => write!(f, "note"),
        }
    }
}

impl DiagnosticLevel {
    /// Returns the ANSI color code for this level.
    #[must_use]
    pub const fn color_code(&self) -> &'static str {
        match self {
            Self::Error => "\x1b[31m",
            Self::Warning => "\x1b[33m",
            Self::Note => "\x1b[36m",
        }
    }

    /// Formats this level with colors if enabled.
    #[must_use]
    pub fn format_colored(&self, use_colors: bool) -> String {
        if use_colors {
            format!("{}{}\x1b[0m", self.color_code(), self)
        } else {
            self.to_string()
        }
    }
}

/// A note attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticNote {
    /// Note message
    pub message: String,
    /// Source span
    pub span: Span,
}

/// A (location, severity, message) triple plus an optional stable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic level
    pub level: DiagnosticLevel,
    /// Error code (e.g., "O0001")
    pub code: Option<&'static str>,
    /// Primary message
    pub message: String,
    /// Source span
    pub span: Span,
    /// Related notes
    pub notes: Vec<DiagnosticNote>,
}

impl Diagnostic {
    /// Shorthand for an error without code or notes.
    #[must_use]
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        DiagnosticBuilder::new(DiagnosticLevel::Error, message, span).build()
    }

    /// Returns true for error-level diagnostics.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }
}

/// Builder for creating diagnostics.
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    /// Creates a new diagnostic builder.
    #[must_use]
    pub fn new(level: DiagnosticLevel, message: impl Into<String>, span: Span) -> Self {
        Self {
            diagnostic: Diagnostic {
                level,
                code: None,
                message: message.into(),
                span,
                notes: Vec::new(),
            },
        }
    }

    /// Adds an error code to the diagnostic.
    #[must_use]
    pub fn code(mut self, code: &'static str) -> Self {
        self.diagnostic.code = Some(code);
        self
    }

    /// Adds a note to the diagnostic.
    #[must_use]
    pub fn note(mut self, message: impl Into<String>, span: Span) -> Self {
        self.diagnostic.notes.push(DiagnosticNote {
            message: message.into(),
            span,
        });
        self
    }

    /// Builds the diagnostic.
    #[must_use]
    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}

/// Receiver of diagnostics produced during semantic analysis.
pub trait DiagnosticSink {
    /// Accepts one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Collecting sink that keeps diagnostics in report order.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    error_count: usize,
}

impl Diagnostics {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collected diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of error-level diagnostics.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Returns true if any error was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Iterates in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Renders every diagnostic as `line:col: level[code]: message`, one per
    /// line, followed by its notes.
    #[must_use]
    pub fn render(&self, use_colors: bool) -> String {
        let mut out = String::new();
        for diagnostic in &self.items {
            // Writing into a String cannot fail.
            let _ = render_one(&mut out, diagnostic, use_colors);
        }
        out
    }
}

fn render_one(out: &mut String, diagnostic: &Diagnostic, use_colors: bool) -> fmt::Result {
    let level = diagnostic.level.format_colored(use_colors);
    write!(out, "{}: {level}", diagnostic.span)?;
    if let Some(code) = diagnostic.code {
        write!(out, "[{code}]")?;
    }
    writeln!(out, ": {}", diagnostic.message)?;

    for note in &diagnostic.notes {
        let prefix = DiagnosticLevel::Note.format_colored(use_colors);
        writeln!(out, "   {prefix} at {}: {}", note.span, note.message)?;
    }
    Ok(())
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.items.push(diagnostic);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_level_display() {
        assert_eq!(format!("{}", DiagnosticLevel::Error), "error");
        assert_eq!(format!("{}", DiagnosticLevel::Warning), "warning");
        assert_eq!(format!("{}", DiagnosticLevel::Note), "note");
    }

    #[test]
    fn test_diagnostic_level_colors() {
        assert_eq!(DiagnosticLevel::Error.format_colored(false), "error");

        let colored = DiagnosticLevel::Error.format_colored(true);
        assert!(colored.contains("\x1b[31m"));
        assert!(colored.contains("error"));
    }

    #[test]
    fn test_diagnostic_builder() {
        let span = Span::new(0, 10, 1, 1);
        let diagnostic = DiagnosticBuilder::new(DiagnosticLevel::Error, "bad selector", span)
            .code("O0001")
            .note("declared here", Span::point(4, 1, 5))
            .build();

        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.code, Some("O0001"));
        assert_eq!(diagnostic.notes.len(), 1);
    }

    #[test]
    fn test_collector_counts_errors() {
        let mut sink = Diagnostics::new();
        sink.report(Diagnostic::error("first", Span::new(0, 1, 1, 1)));
        sink.report(
            DiagnosticBuilder::new(DiagnosticLevel::Warning, "second", Span::new(2, 3, 2, 1))
                .build(),
        );

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.error_count(), 1);
        assert!(sink.has_errors());
    }

    #[test]
    fn test_render() {
        let mut sink = Diagnostics::new();
        sink.report(
            DiagnosticBuilder::new(DiagnosticLevel::Error, "selector collision", Span::new(5, 9, 3, 7))
                .code("O0009")
                .note("previous declaration", Span::new(0, 4, 2, 7))
                .build(),
        );

        let text = sink.render(false);
        assert_eq!(
            text,
            "3:7: error[O0009]: selector collision\n   note at 2:7: previous declaration\n"
        );
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.report(Diagnostic::error("x", Span::SYNTHESIZED));
        assert_eq!(sink.len(), 1);
    }
}
