//! Expression language: infix text → tokens → postfix → instructions → value.

pub mod builtins;
pub mod compile;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;

pub use builtins::Builtin;
pub use compile::{Expression, Instr, Symbol};
pub use error::{Diagnostic, DiagnosticKind};
pub use eval::Evaluator;

use rand::Rng;

use crate::environment::Environment;
use compile::compile_postfix;
use lexer::Lexer;
use parser::Parser;

/// The expression compiler.
///
/// Compilation never fails; anomalies come back as diagnostics alongside the
/// best-effort result.
pub struct Compiler;

impl Compiler {
    /// Tokenize and reorder an expression into postfix tokens.
    pub fn postfix(source: &str) -> (Vec<token::Token>, Vec<Diagnostic>) {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize();
        let mut diagnostics = lexer.take_diagnostics();
        let mut parser = Parser::new(tokens);
        let postfix = parser.parse();
        diagnostics.extend(parser.take_diagnostics());
        (postfix, diagnostics)
    }

    /// Compile an expression, interning its variables into `env`.
    pub fn compile(source: &str, env: &mut Environment) -> (Expression, Vec<Diagnostic>) {
        let (postfix, mut diagnostics) = Self::postfix(source);
        let expr = compile_postfix(postfix, env, &mut diagnostics);
        (expr, diagnostics)
    }
}

/// Compile and evaluate a one-off expression.
pub fn evaluate<R: Rng>(source: &str, env: &mut Environment, rng: &mut R) -> f64 {
    let (expr, _) = Compiler::compile(source, env);
    Evaluator::new().eval(&expr, env, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn diagnostics_from_every_stage() {
        let mut env = Environment::new();
        let (_, diags) = Compiler::compile("1 @ + (2", &mut env);
        let kinds: Vec<DiagnosticKind> = diags.iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&DiagnosticKind::Lex));
        assert!(kinds.contains(&DiagnosticKind::Parse));
        assert!(kinds.contains(&DiagnosticKind::Compile));
    }

    #[test]
    fn evaluate_one_off() {
        let mut env = Environment::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        env.set_named("a", 3.0);
        assert_eq!(evaluate("a*a+1", &mut env, &mut rng), 10.0);
    }
}
