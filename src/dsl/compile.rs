//! Postfix tokens → executable instructions.
//!
//! Each identifier is resolved once: a name in the built-in table becomes a
//! call, anything else becomes a variable slot in the [`Environment`].

use crate::environment::{Environment, Slot};

use super::builtins::Builtin;
use super::error::Diagnostic;
use super::token::{Operator, Token, TokenKind};

/// What an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Symbol {
    Function(Builtin),
    Variable(Slot),
}

/// Resolve an identifier against the function table, then the environment.
pub fn resolve_symbol(name: &str, env: &mut Environment) -> Symbol {
    match Builtin::lookup(name) {
        Some(func) => Symbol::Function(func),
        None => Symbol::Variable(env.intern(name)),
    }
}

/// A single stack-machine instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instr {
    Push(f64),
    Load(Slot),
    Call(Builtin),
    Op(Operator),
}

/// A compiled expression, ready to evaluate any number of times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub code: Vec<Instr>,
}

impl Expression {
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

/// Lower a postfix token sequence into an [`Expression`].
///
/// Parentheses and commas left over from unbalanced input carry no meaning in
/// postfix order and are dropped.
pub fn compile_postfix(
    postfix: Vec<Token>,
    env: &mut Environment,
    diagnostics: &mut Vec<Diagnostic>,
) -> Expression {
    let mut code = Vec::with_capacity(postfix.len());

    for token in postfix {
        match token.kind {
            TokenKind::Number(n) => code.push(Instr::Push(n)),
            TokenKind::Operator(op) => code.push(Instr::Op(op)),
            TokenKind::Ident(name) => match resolve_symbol(&name, env) {
                Symbol::Function(func) => code.push(Instr::Call(func)),
                Symbol::Variable(slot) => code.push(Instr::Load(slot)),
            },
            TokenKind::LParen | TokenKind::RParen | TokenKind::Comma => {
                diagnostics.push(Diagnostic::compile(
                    "dropped stray punctuation",
                    token.col,
                ));
            }
        }
    }

    Expression { code }
}
