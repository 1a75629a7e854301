//! Lexer for preset expressions.
//!
//! Converts a single expression into a flat stream of [`Token`]s. Characters
//! that cannot start a token are discarded; each discard is noted as a
//! [`Diagnostic`] but never stops the scan.

use super::error::Diagnostic;
use super::token::{Operator, Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            let ch = self.peek();

            if ch.is_whitespace() {
                self.advance();
                continue;
            }

            let token = match ch {
                '(' => self.single_char(TokenKind::LParen),
                ')' => self.single_char(TokenKind::RParen),
                ',' => self.single_char(TokenKind::Comma),
                '0'..='9' => self.lex_number(),
                '.' if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
                c if c.is_alphabetic() || c == '_' || c == '$' => self.lex_ident(),
                c => match Operator::from_char(c) {
                    Some(op) => self.single_char(TokenKind::Operator(op)),
                    None => {
                        self.diagnostics.push(Diagnostic::lex(
                            format!("ignored character '{c}'"),
                            self.pos,
                        ));
                        self.advance();
                        continue;
                    }
                },
            };

            tokens.push(token);
        }

        tokens
    }

    /// Anomalies collected by the last [`Lexer::tokenize`] call.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn single_char(&mut self, kind: TokenKind) -> Token {
        let col = self.pos;
        self.advance();
        Token::new(kind, col)
    }

    /// Digits and dots are consumed greedily; a second dot ends the usable
    /// part of the literal (`1.2.3` reads as `1.2`).
    fn lex_number(&mut self) -> Token {
        let col = self.pos;
        let mut s = String::new();

        while !self.is_at_end() && (self.peek().is_ascii_digit() || self.peek() == '.') {
            s.push(self.advance());
        }

        let value = match s.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                let usable = match s.match_indices('.').nth(1) {
                    Some((second_dot, _)) => &s[..second_dot],
                    None => s.as_str(),
                };
                self.diagnostics.push(Diagnostic::lex(
                    format!("malformed number '{s}', read as '{usable}'"),
                    col,
                ));
                usable.parse().unwrap_or(0.0)
            }
        };

        Token::new(TokenKind::Number(value), col)
    }

    fn lex_ident(&mut self) -> Token {
        let col = self.pos;
        let mut s = String::new();

        while !self.is_at_end()
            && (self.peek().is_alphanumeric() || self.peek() == '_' || self.peek() == '$')
        {
            s.push(self.advance());
        }

        Token::new(TokenKind::Ident(s), col)
    }
}
