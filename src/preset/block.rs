//! Block runner: statements of one hook, compiled once and run many times.
//!
//! A block is split on `;` and newlines. Each piece loses any trailing `//`
//! comment and surrounding whitespace; empty pieces are skipped. A piece
//! with an `=` after its first character assigns the right-hand side to the
//! variable named on the left; anything else is evaluated and discarded.

use rand::Rng;

use crate::dsl::{Compiler, Diagnostic, Evaluator, Expression};
use crate::environment::{Environment, Slot};

/// One compiled statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub target: Option<Slot>,
    pub expr: Expression,
    pub source: String,
}

/// A compiled hook body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    statements: Vec<Statement>,
}

impl Block {
    pub fn compile(code: &str, env: &mut Environment) -> (Self, Vec<Diagnostic>) {
        let mut statements = Vec::new();
        let mut diagnostics = Vec::new();

        for piece in split_statements(code) {
            let (target, rhs) = match piece.find('=') {
                Some(eq) if eq > 0 => {
                    let lhs = piece[..eq].trim();
                    (Some(env.intern(lhs)), &piece[eq + 1..])
                }
                _ => (None, piece),
            };
            let (expr, diags) = Compiler::compile(rhs.trim(), env);
            diagnostics.extend(diags);
            statements.push(Statement {
                target,
                expr,
                source: piece.to_string(),
            });
        }

        (Self { statements }, diagnostics)
    }

    pub fn run<R: Rng>(&self, env: &mut Environment, evaluator: &mut Evaluator, rng: &mut R) {
        for stmt in &self.statements {
            let value = evaluator.eval(&stmt.expr, env, rng);
            if let Some(slot) = stmt.target {
                env.set(slot, value);
            }
        }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Split a block into trimmed, comment-free, non-empty statements.
pub fn split_statements(code: &str) -> impl Iterator<Item = &str> {
    code.split(|c: char| c == ';' || c == '\n')
        .map(|raw| {
            let raw = match raw.find("//") {
                Some(idx) => &raw[..idx],
                None => raw,
            };
            raw.trim()
        })
        .filter(|s| !s.is_empty())
}
