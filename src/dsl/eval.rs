//! Stack-machine evaluation of compiled expressions.
//!
//! Evaluation is total: missing operands read as `0.0`, division and modulo
//! by zero yield `0.0`, and an empty program evaluates to `0.0`.

use rand::Rng;

use crate::environment::Environment;

use super::builtins::Builtin;
use super::compile::{Expression, Instr};
use super::token::Operator;

/// Reusable operand stack.
#[derive(Debug, Default)]
pub struct Evaluator {
    stack: Vec<f64>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eval<R: Rng>(&mut self, expr: &Expression, env: &Environment, rng: &mut R) -> f64 {
        self.stack.clear();

        for instr in &expr.code {
            let value = match *instr {
                Instr::Push(n) => n,
                Instr::Load(slot) => env.get(slot),
                Instr::Op(Operator::Neg) => -self.pop(),
                Instr::Op(op) => {
                    let b = self.pop();
                    let a = self.pop();
                    apply_binary(op, a, b)
                }
                Instr::Call(func) => self.call(func, rng),
            };
            self.stack.push(value);
        }

        self.stack.last().copied().unwrap_or(0.0)
    }

    fn pop(&mut self) -> f64 {
        self.stack.pop().unwrap_or(0.0)
    }

    fn call<R: Rng>(&mut self, func: Builtin, rng: &mut R) -> f64 {
        let arity = func.arity();
        let mut args = [0.0; Builtin::MAX_ARITY];
        for arg in args[..arity].iter_mut().rev() {
            *arg = self.pop();
        }
        func.call(&args[..arity], rng)
    }
}

fn apply_binary(op: Operator, a: f64, b: f64) -> f64 {
    match op {
        Operator::Add => a + b,
        Operator::Sub => a - b,
        Operator::Mul => a * b,
        Operator::Div => {
            if b == 0.0 {
                0.0
            } else {
                a / b
            }
        }
        Operator::Mod => {
            if b == 0.0 {
                0.0
            } else {
                a % b
            }
        }
        Operator::Pow => a.powf(b),
        Operator::Neg => -b,
    }
}
