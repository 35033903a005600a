//! Typed assembler diagnostics. The CPU and Memory are infallible by design;
//! the assembler is the one place in this crate where `Result` is load-bearing.

use thiserror::Error;

/// One assembly-time problem, always tied to a source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, column: usize, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic { line, column, kind, message: message.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    InvalidMnemonic,
    InvalidRegister,
    InvalidOperand,
    UnexpectedToken,
    UndefinedLabel,
    DuplicateLabel,
    NumberOutOfRange,
    InvalidDirective,
    UnterminatedString,
}

/// Carries every diagnostic collected before assembly gave up. No partial
/// binary is ever attached — on failure there is nothing usable to return.
#[derive(Debug, Error)]
#[error("assembly failed with {count} diagnostic(s); first at {line}:{column}: {message}",
    count = diagnostics.len(),
    line = diagnostics.first().map(|d| d.line).unwrap_or(0),
    column = diagnostics.first().map(|d| d.column).unwrap_or(0),
    message = diagnostics.first().map(|d| d.message.as_str()).unwrap_or("unknown error"))]
pub struct AssembleError {
    pub diagnostics: Vec<Diagnostic>,
}

impl AssembleError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        AssembleError { diagnostics }
    }
}
