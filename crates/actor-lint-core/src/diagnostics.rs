//! Diagnostic types and the sink rules emit into.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::syntax::SyntaxUnit;

/// Severity of a diagnostic. Exactly two levels exist; the process
/// exit code counts errors only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Should be addressed, does not fail the run.
    Warning,
    /// Must be fixed; contributes to the exit code.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Computes the 1-based line and column of a byte offset by counting
/// newline bytes up to it.
#[must_use]
pub fn line_and_column(content: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(content.len());
    let before = &content.as_bytes()[..offset];
    let line = 1 + before.iter().filter(|&&b| b == b'\n').count();
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    (line, offset - line_start + 1)
}

/// One finding, tied to a file and optionally to a position within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the finding belongs to.
    pub path: PathBuf,
    /// 1-based line, when a byte offset was resolvable.
    pub line: Option<usize>,
    /// 1-based column, when a byte offset was resolvable.
    pub column: Option<usize>,
    /// Severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic, resolving `offset` against `unit`'s
    /// content when present.
    #[must_use]
    pub fn new(
        unit: &SyntaxUnit,
        offset: Option<usize>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        let (line, column) = match offset {
            Some(offset) => {
                let (line, column) = line_and_column(&unit.content, offset);
                (Some(line), Some(column))
            }
            None => (None, None),
        };
        Self {
            path: unit.path.clone(),
            line,
            column,
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(
                f,
                "{}:{}:{}: {}: {}",
                self.path.display(),
                line,
                column,
                self.severity,
                self.message
            ),
            _ => write!(
                f,
                "{}: {}: {}",
                self.path.display(),
                self.severity,
                self.message
            ),
        }
    }
}

/// Collector handed to rules. Emitting here is independent of a rule's
/// pass/fail return value; a rule may warn and still pass.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits an error against `unit` at `offset`.
    pub fn error(&mut self, unit: &SyntaxUnit, offset: Option<usize>, message: impl Into<String>) {
        self.items
            .push(Diagnostic::new(unit, offset, Severity::Error, message));
    }

    /// Emits a warning against `unit` at `offset`.
    pub fn warning(
        &mut self,
        unit: &SyntaxUnit,
        offset: Option<usize>,
        message: impl Into<String>,
    ) {
        self.items
            .push(Diagnostic::new(unit, offset, Severity::Warning, message));
    }

    /// Appends an already-built diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Collected diagnostics.
    #[must_use]
    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    /// Consumes the collector.
    #[must_use]
    pub fn into_items(self) -> Vec<Diagnostic> {
        self.items
    }

    /// Number of diagnostics collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Aggregate result of one pipeline run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintReport {
    /// Every diagnostic produced, sorted by path, line, column.
    pub diagnostics: Vec<Diagnostic>,
    /// Count of error-severity diagnostics.
    pub errors: usize,
    /// Count of warning-severity diagnostics.
    pub warnings: usize,
    /// Number of files that produced a syntax unit.
    pub files_checked: usize,
}

impl LintReport {
    /// Builds a report from raw diagnostics, counting and sorting.
    #[must_use]
    pub fn new(mut diagnostics: Vec<Diagnostic>, files_checked: usize) -> Self {
        diagnostics.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then(a.line.cmp(&b.line))
                .then(a.column.cmp(&b.column))
                .then(a.message.cmp(&b.message))
        });
        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warnings = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        Self {
            diagnostics,
            errors,
            warnings,
            files_checked,
        }
    }

    /// True if any error-severity diagnostic was produced.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
