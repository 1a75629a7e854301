//! Load-time diagnostics for preset expressions.
//!
//! Nothing in the expression pipeline fails: malformed input is repaired or
//! dropped and the anomaly is recorded here so the host can log it.

use std::fmt;

/// An anomaly noticed while lexing, parsing or compiling an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub col: usize,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lex,
    Parse,
    Compile,
}

impl Diagnostic {
    pub fn lex(message: impl Into<String>, col: usize) -> Self {
        Self {
            message: message.into(),
            col,
            kind: DiagnosticKind::Lex,
        }
    }

    pub fn parse(message: impl Into<String>, col: usize) -> Self {
        Self {
            message: message.into(),
            col,
            kind: DiagnosticKind::Parse,
        }
    }

    pub fn compile(message: impl Into<String>, col: usize) -> Self {
        Self {
            message: message.into(),
            col,
            kind: DiagnosticKind::Compile,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[col {}] {:?}: {}", self.col, self.kind, self.message)
    }
}
