//! Shunting-yard conversion from infix tokens to postfix order.
//!
//! Identifiers go onto the operator stack speculatively: one that is
//! followed by `(` is a function name and is emitted right after its
//! arguments when the matching `)` closes; any other identifier is flushed to
//! the output as a plain operand as soon as the next token shows it cannot be
//! a call. Unbalanced parentheses are tolerated and reported as diagnostics.

use super::error::Diagnostic;
use super::token::{Operator, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    output: Vec<Token>,
    stack: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            output: Vec::with_capacity(tokens.len()),
            tokens,
            stack: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Consume the infix tokens and return them in postfix order.
    pub fn parse(&mut self) -> Vec<Token> {
        let tokens = std::mem::take(&mut self.tokens);
        let mut prefix_position = true;

        for token in tokens {
            let next_prefix_position = matches!(
                token.kind,
                TokenKind::Operator(_) | TokenKind::LParen | TokenKind::Comma
            );

            match token.kind {
                TokenKind::Number(_) => {
                    self.flush_operand_idents();
                    self.output.push(token);
                }
                TokenKind::Ident(_) => {
                    self.flush_operand_idents();
                    self.stack.push(token);
                }
                TokenKind::Operator(op) => {
                    if prefix_position {
                        match op {
                            Operator::Sub => self.stack.push(Token::new(
                                TokenKind::Operator(Operator::Neg),
                                token.col,
                            )),
                            // Unary plus is a no-op.
                            Operator::Add => {}
                            _ => self.push_operator(op, token),
                        }
                    } else {
                        self.push_operator(op, token);
                    }
                }
                TokenKind::LParen => self.stack.push(token),
                TokenKind::RParen => self.close_paren(token.col),
                TokenKind::Comma => {
                    self.drain_to_lparen();
                    if !self.stack.last().is_some_and(Token::is_lparen) {
                        self.diagnostics
                            .push(Diagnostic::parse("',' outside of a call", token.col));
                    }
                }
            }

            prefix_position = next_prefix_position;
        }

        while let Some(token) = self.stack.pop() {
            if token.is_lparen() {
                self.diagnostics
                    .push(Diagnostic::parse("unclosed '('", token.col));
            }
            self.output.push(token);
        }

        std::mem::take(&mut self.output)
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn push_operator(&mut self, op: Operator, token: Token) {
        self.flush_operand_idents();
        while let Some(top) = self.stack.last() {
            let TokenKind::Operator(top_op) = top.kind else {
                break;
            };
            let pops = top_op.precedence() > op.precedence()
                || (top_op.precedence() == op.precedence() && !op.is_right_assoc());
            if !pops {
                break;
            }
            if let Some(t) = self.stack.pop() {
                self.output.push(t);
            }
        }
        self.stack.push(token);
    }

    fn close_paren(&mut self, col: usize) {
        self.drain_to_lparen();
        if self.stack.pop().is_none() {
            self.diagnostics
                .push(Diagnostic::parse("unmatched ')'", col));
            return;
        }
        if self.stack.last().is_some_and(Token::is_ident) {
            if let Some(func) = self.stack.pop() {
                self.output.push(func);
            }
        }
    }

    /// Pop to the output until a `(` is on top (left in place) or the stack is empty.
    fn drain_to_lparen(&mut self) {
        while let Some(top) = self.stack.last() {
            if top.is_lparen() {
                break;
            }
            if let Some(t) = self.stack.pop() {
                self.output.push(t);
            }
        }
    }

    /// An identifier on top of the stack that was not followed by `(` is a
    /// variable reference.
    fn flush_operand_idents(&mut self) {
        while self.stack.last().is_some_and(Token::is_ident) {
            if let Some(t) = self.stack.pop() {
                self.output.push(t);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::Lexer;
    use super::*;

    fn rpn(src: &str) -> String {
        let tokens = Lexer::new(src).tokenize();
        Parser::new(tokens)
            .parse()
            .iter()
            .map(|t| match &t.kind {
                TokenKind::Number(n) => n.to_string(),
                TokenKind::Ident(s) => s.clone(),
                TokenKind::Operator(Operator::Neg) => "neg".to_string(),
                TokenKind::Operator(op) => op.symbol().to_string(),
                TokenKind::LParen => "(".to_string(),
                TokenKind::RParen => ")".to_string(),
                TokenKind::Comma => ",".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn precedence() {
        assert_eq!(rpn("2+3*4"), "2 3 4 * +");
        assert_eq!(rpn("(2+3)*4"), "2 3 + 4 *");
    }

    #[test]
    fn left_associative_subtraction() {
        assert_eq!(rpn("8-4-2"), "8 4 - 2 -");
    }

    #[test]
    fn right_associative_power() {
        assert_eq!(rpn("2^3^2"), "2 3 2 ^ ^");
    }

    #[test]
    fn variables_are_operands() {
        assert_eq!(rpn("a*b+c"), "a b * c +");
        assert_eq!(rpn("a+b"), "a b +");
    }

    #[test]
    fn function_follows_its_arguments() {
        assert_eq!(rpn("sin(x)*2"), "x sin 2 *");
        assert_eq!(rpn("pow(x, 2)"), "x 2 pow");
    }

    #[test]
    fn nested_calls() {
        assert_eq!(rpn("if(above(5,3), 10, 20)"), "5 3 above 10 20 if");
        assert_eq!(rpn("max(sin(a), b+1)"), "a sin b 1 + max");
    }

    #[test]
    fn prefix_minus_becomes_negation() {
        assert_eq!(rpn("-x"), "x neg");
        assert_eq!(rpn("2*-3"), "2 3 neg *");
        assert_eq!(rpn("-2^2"), "2 2 ^ neg");
        assert_eq!(rpn("min(-1, 2)"), "1 neg 2 min");
        assert_eq!(rpn("a-b"), "a b -");
    }

    #[test]
    fn prefix_plus_is_dropped() {
        assert_eq!(rpn("+5"), "5");
    }

    #[test]
    fn unclosed_paren_is_tolerated() {
        let tokens = Lexer::new("sin(x").tokenize();
        let mut parser = Parser::new(tokens);
        let out = parser.parse();
        assert_eq!(out.len(), 3);
        assert_eq!(parser.take_diagnostics().len(), 1);
    }

    #[test]
    fn stray_close_paren_is_reported() {
        let tokens = Lexer::new("1+2)").tokenize();
        let mut parser = Parser::new(tokens);
        assert_eq!(parser.parse().len(), 3);
        let diags = parser.take_diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].col, 3);
    }

    #[test]
    fn empty_input() {
        assert_eq!(rpn(""), "");
    }
}
