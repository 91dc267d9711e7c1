//! Property-based tests for the operation registry and session state.
//!
//! 1. Arithmetic operations agree with their formulas
//! 2. Zero divisors always fail and never touch history
//! 3. Floor division and modulus reconstruct the dividend; the remainder
//!    stays within the divisor for fractional operands
//! 4. History never exceeds its capacity and keeps the newest records
//! 5. Undo/redo on a session matches a reference model

use proptest::prelude::*;
use reckon::{CalcError, Calculator, CalculatorConfig, OperationRegistry};

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Step {
    Add(i32),
    Undo,
    Redo,
    Clear,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (-1000i32..1000).prop_map(Step::Add),
        2 => Just(Step::Undo),
        2 => Just(Step::Redo),
        1 => Just(Step::Clear),
    ]
}

fn session(capacity: usize) -> Calculator {
    Calculator::bare(
        CalculatorConfig {
            max_history_size: capacity,
            auto_save: false,
            ..CalculatorConfig::default()
        },
        OperationRegistry::new(),
    )
}

fn results(calc: &Calculator) -> Vec<f64> {
    calc.history().iter().map(|c| c.result()).collect()
}

/// Reference model: a bounded list plus two stacks of whole copies.
#[derive(Default)]
struct Model {
    capacity: usize,
    history: Vec<f64>,
    undo: Vec<Vec<f64>>,
    redo: Vec<Vec<f64>>,
}

impl Model {
    fn apply(&mut self, step: &Step) {
        match step {
            Step::Add(value) => {
                self.undo.push(self.history.clone());
                self.redo.clear();
                self.history.push(f64::from(*value));
                if self.history.len() > self.capacity {
                    self.history.remove(0);
                }
            }
            Step::Undo => {
                if let Some(previous) = self.undo.pop() {
                    self.redo.push(std::mem::replace(&mut self.history, previous));
                }
            }
            Step::Redo => {
                if let Some(next) = self.redo.pop() {
                    self.undo.push(std::mem::replace(&mut self.history, next));
                }
            }
            Step::Clear => {
                if !self.history.is_empty() {
                    self.undo.push(std::mem::take(&mut self.history));
                    self.redo.clear();
                }
            }
        }
    }
}

// ── Operations ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn arithmetic_matches_formulas(a in -1.0e6f64..1.0e6, b in -1.0e6f64..1.0e6) {
        let registry = OperationRegistry::new();
        prop_assert_eq!(registry.execute("add", a, b).unwrap(), a + b);
        prop_assert_eq!(registry.execute("subtract", a, b).unwrap(), a - b);
        prop_assert_eq!(registry.execute("multiply", a, b).unwrap(), a * b);
        prop_assert_eq!(registry.execute("abs_diff", a, b).unwrap(), (a - b).abs());
        if b != 0.0 {
            prop_assert_eq!(registry.execute("divide", a, b).unwrap(), a / b);
            prop_assert_eq!(registry.execute("percent", a, b).unwrap(), a / b * 100.0);
        }
    }

    #[test]
    fn zero_divisor_always_fails(a in -1.0e9f64..1.0e9) {
        let registry = OperationRegistry::new();
        for op in ["divide", "int_divide", "modulus", "percent", "root"] {
            let err = registry.execute(op, a, 0.0).unwrap_err();
            prop_assert!(
                matches!(err, CalcError::DivisionByZero { .. }),
                "{} {} 0 gave {:?}", op, a, err
            );
        }
    }

    #[test]
    fn floor_division_reconstructs_dividend(a in -10_000i32..10_000, b in -100i32..100) {
        prop_assume!(b != 0);
        let registry = OperationRegistry::new();
        let (a, b) = (f64::from(a), f64::from(b));
        let quotient = registry.execute("int_divide", a, b).unwrap();
        let remainder = registry.execute("modulus", a, b).unwrap();

        prop_assert_eq!(quotient * b + remainder, a);
        // The remainder takes the sign of the divisor.
        prop_assert!(remainder == 0.0 || remainder.signum() == b.signum());
        prop_assert!(remainder.abs() < b.abs());
    }

    #[test]
    fn modulus_stays_within_divisor(
        a in -1.0e9f64..1.0e9,
        magnitude in 1.0e-9f64..1.0e3,
        negative in any::<bool>(),
    ) {
        let b = if negative { -magnitude } else { magnitude };
        let remainder = OperationRegistry::new().execute("modulus", a, b).unwrap();

        prop_assert!(remainder.abs() <= b.abs(), "{} mod {} = {}", a, b, remainder);
        prop_assert!(
            remainder == 0.0 || remainder.signum() == b.signum(),
            "{} mod {} = {}", a, b, remainder
        );
    }

    #[test]
    fn odd_roots_of_cubes_are_exact(n in -1000i32..1000) {
        let registry = OperationRegistry::new();
        let cube = f64::from(n).powi(3);
        prop_assert_eq!(registry.execute("root", cube, 3.0).unwrap(), f64::from(n));
    }
}

// ── Session State ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn history_never_exceeds_capacity(capacity in 1usize..10, count in 0usize..40) {
        let mut calc = session(capacity);
        for i in 0..count {
            calc.calculate_values("add", i as f64, 0.0).unwrap();
            prop_assert!(calc.history().len() <= capacity);
        }

        let expected: Vec<f64> = (count.saturating_sub(capacity)..count)
            .map(|i| i as f64)
            .collect();
        prop_assert_eq!(results(&calc), expected);
    }

    #[test]
    fn session_matches_reference_model(
        capacity in 1usize..6,
        steps in prop::collection::vec(step_strategy(), 0..60),
    ) {
        let mut calc = session(capacity);
        let mut model = Model { capacity, ..Model::default() };

        for step in &steps {
            match step {
                Step::Add(value) => {
                    calc.calculate_values("add", f64::from(*value), 0.0).unwrap();
                }
                Step::Undo => {
                    let _ = calc.undo();
                }
                Step::Redo => {
                    let _ = calc.redo();
                }
                Step::Clear => {
                    calc.clear();
                }
            }
            model.apply(step);

            prop_assert_eq!(results(&calc), model.history.clone(), "after {:?}", step);
            prop_assert_eq!(calc.can_undo(), !model.undo.is_empty());
            prop_assert_eq!(calc.can_redo(), !model.redo.is_empty());
        }
    }

    #[test]
    fn undo_then_redo_restores_state(
        values in prop::collection::vec(-1000i32..1000, 1..20),
        depth in 1usize..20,
    ) {
        let mut calc = session(8);
        for value in &values {
            calc.calculate_values("add", f64::from(*value), 0.0).unwrap();
        }
        let before = calc.history().snapshot();

        let depth = depth.min(values.len());
        for _ in 0..depth {
            calc.undo().unwrap();
        }
        for _ in 0..depth {
            calc.redo().unwrap();
        }

        prop_assert_eq!(calc.history().snapshot(), before);
        prop_assert!(!calc.can_redo());
    }
}
