//! Token types for the preset expression lexer.

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub col: usize,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),
    Operator(Operator),
    LParen,
    RParen,
    Comma,
}

/// Arithmetic operators.
///
/// The lexer only ever produces the binary forms; `Neg` is introduced by the
/// parser when a `-` appears in prefix position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Neg,
}

impl Operator {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '%' => Some(Operator::Mod),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub | Operator::Neg => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Mod => '%',
            Operator::Pow => '^',
        }
    }

    /// Binding strength used by the shunting-yard pass.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Pow => 5,
            Operator::Neg => 4,
            Operator::Mul | Operator::Div | Operator::Mod => 3,
            Operator::Add | Operator::Sub => 2,
        }
    }

    pub fn is_right_assoc(self) -> bool {
        matches!(self, Operator::Pow | Operator::Neg)
    }
}

impl Token {
    pub fn new(kind: TokenKind, col: usize) -> Self {
        Self { kind, col }
    }

    pub fn is_ident(&self) -> bool {
        matches!(self.kind, TokenKind::Ident(_))
    }

    pub fn is_lparen(&self) -> bool {
        matches!(self.kind, TokenKind::LParen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_ordering() {
        assert!(Operator::Pow.precedence() > Operator::Neg.precedence());
        assert!(Operator::Neg.precedence() > Operator::Mul.precedence());
        assert_eq!(Operator::Mul.precedence(), Operator::Mod.precedence());
        assert!(Operator::Div.precedence() > Operator::Add.precedence());
    }

    #[test]
    fn only_six_operator_chars() {
        let ops: Vec<Operator> = "+-*/%^=<>&|!"
            .chars()
            .filter_map(Operator::from_char)
            .collect();
        assert_eq!(ops.len(), 6);
        assert!(!ops.contains(&Operator::Neg));
    }
}
