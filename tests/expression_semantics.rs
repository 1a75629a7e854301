//! Expression language integration tests: text in, number out.

use assert_approx_eq::assert_approx_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use superscope::dsl::{evaluate, Compiler, DiagnosticKind, Evaluator};
use superscope::environment::Environment;

fn eval(source: &str) -> f64 {
    let mut env = Environment::new();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    evaluate(source, &mut env, &mut rng)
}

// =============================================================================
// Arithmetic
// =============================================================================

#[test]
fn precedence_and_grouping() {
    assert_eq!(eval("2+3*4"), 14.0);
    assert_eq!(eval("(2+3)*4"), 20.0);
    assert_eq!(eval("10-4-3"), 3.0);
    assert_eq!(eval("64/4/2"), 8.0);
    assert_eq!(eval("7%4*2"), 6.0);
}

#[test]
fn power_is_right_associative() {
    assert_eq!(eval("2^3^2"), 512.0);
    assert_eq!(eval("(2^3)^2"), 64.0);
}

#[test]
fn unary_signs() {
    assert_eq!(eval("-3+5"), 2.0);
    assert_eq!(eval("2*-3"), -6.0);
    assert_eq!(eval("-2^2"), -4.0);
    assert_eq!(eval("+4"), 4.0);
    assert_eq!(eval("min(-1, 2)"), -1.0);
}

#[test]
fn division_and_modulo_by_zero_are_zero() {
    assert_eq!(eval("5/0"), 0.0);
    assert_eq!(eval("5%0"), 0.0);
    assert_eq!(eval("1+5/0"), 1.0);
}

// =============================================================================
// Builtins
// =============================================================================

#[test]
fn domain_safe_functions() {
    assert_eq!(eval("sqrt(-4)"), 2.0);
    assert_approx_eq!(eval("asin(5)"), 1.0f64.asin());
    assert_approx_eq!(eval("acos(-9)"), std::f64::consts::PI);
}

#[test]
fn conditionals() {
    assert_eq!(eval("if(above(5,3), 10, 20)"), 10.0);
    assert_eq!(eval("if(below(5,3), 10, 20)"), 20.0);
    assert_eq!(eval("equal(1.0000001, 1.0)"), 1.0);
    assert_eq!(eval("equal(1.001, 1.0)"), 0.0);
}

#[test]
fn nested_calls() {
    assert_eq!(eval("max(min(4, 9), clamp(12, 0, 5))"), 5.0);
    assert_approx_eq!(eval("pow(sin(0.5), 2) + sqr(cos(0.5))"), 1.0);
    assert_approx_eq!(eval("frac(floor(3.7) + 0.25)"), 0.25);
}

#[test]
fn function_names_are_case_insensitive() {
    assert_eq!(eval("SQRT(16) + Abs(-1)"), 5.0);
}

#[test]
fn rand_stays_in_range() {
    let mut env = Environment::new();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for _ in 0..100 {
        let r = evaluate("rand(10)", &mut env, &mut rng);
        assert!((0.0..10.0).contains(&r));
    }
}

// =============================================================================
// Variables
// =============================================================================

#[test]
fn unbound_variable_reads_zero() {
    assert_eq!(eval("foo+1"), 1.0);
}

#[test]
fn variables_are_case_insensitive() {
    let mut env = Environment::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    env.set_named("Speed", 2.5);
    assert_eq!(evaluate("SPEED*2", &mut env, &mut rng), 5.0);
    assert_eq!(evaluate("speed", &mut env, &mut rng), 2.5);
}

#[test]
fn stateless_expression_is_idempotent() {
    let mut env = Environment::new();
    env.set_named("a", 0.7);
    let (expr, _) = Compiler::compile("sin(a)*cos(a*2) + a^3", &mut env);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut evaluator = Evaluator::new();
    let first = evaluator.eval(&expr, &env, &mut rng);
    let second = evaluator.eval(&expr, &env, &mut rng);
    assert_eq!(first, second);
}

// =============================================================================
// Malformed input
// =============================================================================

#[test]
fn malformed_input_never_panics() {
    for source in [
        "", ")", "(", "((1)", "1,2", "sin(", "*", "1 +", "@#!", "1..2.3", "min(1)", ",,,", "-",
    ] {
        let v = eval(source);
        assert!(v.is_finite(), "{source:?} gave {v}");
    }
}

#[test]
fn empty_expression_is_zero() {
    assert_eq!(eval(""), 0.0);
    assert_eq!(eval("   "), 0.0);
}

#[test]
fn missing_operands_read_zero() {
    assert_eq!(eval("3 +"), 3.0);
    assert_eq!(eval("min(1)"), 0.0);
}

#[test]
fn anomalies_are_reported() {
    let mut env = Environment::new();
    let (_, diags) = Compiler::compile("2 # 3", &mut env);
    assert!(diags.iter().any(|d| d.kind == DiagnosticKind::Lex));

    let (_, diags) = Compiler::compile("(1+2", &mut env);
    assert!(diags.iter().any(|d| d.kind == DiagnosticKind::Parse));

    let (_, diags) = Compiler::compile("sin(0.5)*2", &mut env);
    assert!(diags.is_empty());
}
