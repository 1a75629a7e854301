//! Built-in function table.
//!
//! Every function has a fixed arity. Domain-restricted functions clamp or
//! fold their inputs instead of producing NaN.

use rand::Rng;

/// Tolerance used by `equal(a, b)`.
pub const EQUAL_EPSILON: f64 = 1e-6;

/// A built-in function callable from preset code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sqrt,
    Sqr,
    Abs,
    Pow,
    Floor,
    Frac,
    Min,
    Max,
    Clamp,
    Rand,
    Above,
    Below,
    Equal,
    If,
}

impl Builtin {
    pub const ALL: [Builtin; 21] = [
        Builtin::Sin,
        Builtin::Cos,
        Builtin::Tan,
        Builtin::Asin,
        Builtin::Acos,
        Builtin::Atan,
        Builtin::Atan2,
        Builtin::Sqrt,
        Builtin::Sqr,
        Builtin::Abs,
        Builtin::Pow,
        Builtin::Floor,
        Builtin::Frac,
        Builtin::Min,
        Builtin::Max,
        Builtin::Clamp,
        Builtin::Rand,
        Builtin::Above,
        Builtin::Below,
        Builtin::Equal,
        Builtin::If,
    ];

    /// The largest arity in the table.
    pub const MAX_ARITY: usize = 3;

    /// Case-insensitive lookup by name.
    pub fn lookup(name: &str) -> Option<Builtin> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Tan => "tan",
            Builtin::Asin => "asin",
            Builtin::Acos => "acos",
            Builtin::Atan => "atan",
            Builtin::Atan2 => "atan2",
            Builtin::Sqrt => "sqrt",
            Builtin::Sqr => "sqr",
            Builtin::Abs => "abs",
            Builtin::Pow => "pow",
            Builtin::Floor => "floor",
            Builtin::Frac => "frac",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Clamp => "clamp",
            Builtin::Rand => "rand",
            Builtin::Above => "above",
            Builtin::Below => "below",
            Builtin::Equal => "equal",
            Builtin::If => "if",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Builtin::Atan2
            | Builtin::Pow
            | Builtin::Min
            | Builtin::Max
            | Builtin::Above
            | Builtin::Below
            | Builtin::Equal => 2,
            Builtin::Clamp | Builtin::If => 3,
            _ => 1,
        }
    }

    /// Apply the function. `args` holds exactly [`Builtin::arity`] values in
    /// declaration order.
    pub fn call<R: Rng>(self, args: &[f64], rng: &mut R) -> f64 {
        let a = |i: usize| args.get(i).copied().unwrap_or(0.0);
        match self {
            Builtin::Sin => a(0).sin(),
            Builtin::Cos => a(0).cos(),
            Builtin::Tan => a(0).tan(),
            Builtin::Asin => a(0).clamp(-1.0, 1.0).asin(),
            Builtin::Acos => a(0).clamp(-1.0, 1.0).acos(),
            Builtin::Atan => a(0).atan(),
            Builtin::Atan2 => a(0).atan2(a(1)),
            Builtin::Sqrt => a(0).abs().sqrt(),
            Builtin::Sqr => a(0) * a(0),
            Builtin::Abs => a(0).abs(),
            Builtin::Pow => a(0).powf(a(1)),
            Builtin::Floor => a(0).floor(),
            Builtin::Frac => a(0) - a(0).floor(),
            Builtin::Min => a(0).min(a(1)),
            Builtin::Max => a(0).max(a(1)),
            // min(max(v, lo), hi); f64::clamp panics when lo > hi.
            Builtin::Clamp => a(0).max(a(1)).min(a(2)),
            Builtin::Rand => rng.gen::<f64>() * a(0),
            Builtin::Above => flag(a(0) > a(1)),
            Builtin::Below => flag(a(0) < a(1)),
            Builtin::Equal => flag((a(0) - a(1)).abs() < EQUAL_EPSILON),
            Builtin::If => {
                if a(0) != 0.0 {
                    a(1)
                } else {
                    a(2)
                }
            }
        }
    }
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn call(b: Builtin, args: &[f64]) -> f64 {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        b.call(args, &mut rng)
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Builtin::lookup("SIN"), Some(Builtin::Sin));
        assert_eq!(Builtin::lookup("Atan2"), Some(Builtin::Atan2));
        assert_eq!(Builtin::lookup("sine"), None);
    }

    #[test]
    fn arities() {
        for name in ["sin", "cos", "tan", "sqrt", "abs", "floor", "frac", "asin", "acos", "atan", "sqr", "rand"] {
            assert_eq!(Builtin::lookup(name).unwrap().arity(), 1, "{name}");
        }
        for name in ["pow", "atan2", "min", "max", "above", "below", "equal"] {
            assert_eq!(Builtin::lookup(name).unwrap().arity(), 2, "{name}");
        }
        assert_eq!(Builtin::Clamp.arity(), 3);
        assert_eq!(Builtin::If.arity(), 3);
        assert!(Builtin::ALL.iter().all(|b| b.arity() <= Builtin::MAX_ARITY));
    }

    #[test]
    fn domain_safety() {
        assert_approx_eq!(call(Builtin::Sqrt, &[-4.0]), 2.0);
        assert_approx_eq!(call(Builtin::Asin, &[5.0]), 1.0f64.asin());
        assert_approx_eq!(call(Builtin::Acos, &[-3.0]), std::f64::consts::PI);
    }

    #[test]
    fn comparisons() {
        assert_eq!(call(Builtin::Above, &[5.0, 3.0]), 1.0);
        assert_eq!(call(Builtin::Below, &[5.0, 3.0]), 0.0);
        assert_eq!(call(Builtin::Equal, &[1.0000001, 1.0]), 1.0);
        assert_eq!(call(Builtin::Equal, &[1.001, 1.0]), 0.0);
    }

    #[test]
    fn conditional() {
        assert_eq!(call(Builtin::If, &[1.0, 10.0, 20.0]), 10.0);
        assert_eq!(call(Builtin::If, &[0.0, 10.0, 20.0]), 20.0);
        assert_eq!(call(Builtin::If, &[-0.5, 10.0, 20.0]), 10.0);
    }

    #[test]
    fn clamp_and_frac() {
        assert_eq!(call(Builtin::Clamp, &[5.0, 0.0, 1.0]), 1.0);
        assert_eq!(call(Builtin::Clamp, &[-5.0, 0.0, 1.0]), 0.0);
        assert_approx_eq!(call(Builtin::Frac, &[2.75]), 0.75);
        assert_approx_eq!(call(Builtin::Frac, &[-0.25]), 0.75);
    }

    #[test]
    fn rand_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let r = Builtin::Rand.call(&[50.0], &mut rng);
            assert!((0.0..50.0).contains(&r));
        }
        assert_eq!(Builtin::Rand.call(&[0.0], &mut rng), 0.0);
    }
}
