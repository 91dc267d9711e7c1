//! Operation registry: maps operation names to arithmetic behavior.
//!
//! Built-in operations are a closed set ([`OperationKind`]) dispatched through
//! a single `match`. Additional operations can be registered at runtime under
//! new names.
//!
//! Integer division and modulus use floor semantics: `int_divide(a, b)` is
//! `floor(a / b)` and `modulus(a, b)` is the remainder of that division,
//! taking the sign of the divisor.

use crate::error::{CalcError, Result};
use crate::types::OperationKind;
use std::fmt;

/// Words reserved by the REPL; operations may not shadow them.
pub const RESERVED_WORDS: &[&str] = &[
    "history",
    "clear",
    "undo",
    "redo",
    "save",
    "load",
    "operations",
    "help",
    "exit",
    "quit",
];

/// Signature every custom operation must satisfy.
pub type OperationFn = Box<dyn Fn(f64, f64) -> Result<f64>>;

impl OperationKind {
    /// Apply this operation to two operands.
    pub fn apply(self, a: f64, b: f64) -> Result<f64> {
        let name = self.name();
        let value = match self {
            OperationKind::Add => a + b,
            OperationKind::Subtract => a - b,
            OperationKind::Multiply => a * b,
            OperationKind::Divide => {
                if b == 0.0 {
                    return Err(CalcError::division_by_zero(name));
                }
                a / b
            }
            OperationKind::Power => {
                if a < 0.0 && b.fract() != 0.0 {
                    return Err(CalcError::domain(
                        name,
                        "negative base with a non-integer exponent",
                    ));
                }
                a.powf(b)
            }
            OperationKind::Root => root(a, b)?,
            OperationKind::Modulus => {
                if b == 0.0 {
                    return Err(CalcError::division_by_zero(name));
                }
                floor_mod(a, b)
            }
            OperationKind::IntDivide => {
                if b == 0.0 {
                    return Err(CalcError::division_by_zero(name));
                }
                (a / b).floor()
            }
            OperationKind::Percent => {
                if b == 0.0 {
                    return Err(CalcError::division_by_zero(name));
                }
                a / b * 100.0
            }
            OperationKind::AbsDiff => (a - b).abs(),
        };
        finite(name, value)
    }
}

fn root(a: f64, degree: f64) -> Result<f64> {
    let name = OperationKind::Root.name();
    if degree == 0.0 {
        return Err(CalcError::division_by_zero(name));
    }
    let integral = degree.fract() == 0.0;
    if a < 0.0 {
        if integral && degree % 2.0 == 0.0 {
            return Err(CalcError::domain(name, "even root of a negative number"));
        }
        if !integral {
            return Err(CalcError::domain(name, "non-integer root of a negative number"));
        }
    }

    let magnitude = a.abs().powf(degree.recip());
    let value = if a < 0.0 { -magnitude } else { magnitude };

    // Snap to an exact integer root when one exists (27^(1/3) -> 3, not 3.0000000000000004).
    let rounded = value.round();
    if integral && rounded != value && rounded.powf(degree) == a {
        return Ok(rounded);
    }
    Ok(value)
}

/// `a mod b` with the sign of `b`, built on the exact `%` remainder.
fn floor_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

fn finite(operation: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFinite {
            operation: operation.to_string(),
        })
    }
}

/// A resolved operation: either a built-in or a custom registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Builtin(OperationKind),
    Custom(CustomId),
}

/// Handle to a custom operation, only obtainable from [`OperationRegistry::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CustomId(usize);

struct CustomOperation {
    name: String,
    description: String,
    function: OperationFn,
}

/// Name-to-behavior mapping for arithmetic operations.
pub struct OperationRegistry {
    custom: Vec<CustomOperation>,
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("operations", &self.names())
            .finish()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationRegistry {
    /// Registry containing only the built-in operations.
    pub fn new() -> Self {
        Self { custom: Vec::new() }
    }

    /// Resolve a name (case-insensitive, trimmed).
    pub fn resolve(&self, name: &str) -> Result<Operation> {
        let normalized = name.trim().to_ascii_lowercase();
        if let Ok(kind) = normalized.parse::<OperationKind>() {
            return Ok(Operation::Builtin(kind));
        }
        self.custom
            .iter()
            .position(|op| op.name == normalized)
            .map(|idx| Operation::Custom(CustomId(idx)))
            .ok_or_else(|| CalcError::UnknownOperation(name.trim().to_string()))
    }

    /// Whether `name` refers to a known operation.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Canonical (lower-case) name of a resolved operation.
    pub fn name_of(&self, op: Operation) -> Result<&str> {
        match op {
            Operation::Builtin(kind) => Ok(kind.name()),
            Operation::Custom(id) => Ok(self.custom(id)?.name.as_str()),
        }
    }

    /// Execute the named operation.
    pub fn execute(&self, name: &str, a: f64, b: f64) -> Result<f64> {
        let op = self.resolve(name)?;
        self.execute_resolved(op, a, b)
    }

    /// Execute an already resolved operation.
    pub fn execute_resolved(&self, op: Operation, a: f64, b: f64) -> Result<f64> {
        match op {
            Operation::Builtin(kind) => kind.apply(a, b),
            Operation::Custom(id) => {
                let entry = self.custom(id)?;
                let value = (entry.function)(a, b)?;
                finite(&entry.name, value)
            }
        }
    }

    /// Register a new operation under `name`.
    ///
    /// Names must be lower-case `[a-z0-9_]`, start with a letter, and not
    /// collide with a built-in, a REPL command, or an earlier registration.
    pub fn register<F>(
        &mut self,
        name: &str,
        description: impl Into<String>,
        function: F,
    ) -> Result<()>
    where
        F: Fn(f64, f64) -> Result<f64> + 'static,
    {
        let name = name.trim();
        Self::check_name(name)?;
        if name.parse::<OperationKind>().is_ok() {
            return Err(CalcError::Registration(format!(
                "'{name}' is a built-in operation"
            )));
        }
        if RESERVED_WORDS.contains(&name) {
            return Err(CalcError::Registration(format!(
                "'{name}' is a reserved command"
            )));
        }
        if self.custom.iter().any(|op| op.name == name) {
            return Err(CalcError::Registration(format!(
                "'{name}' is already registered"
            )));
        }

        tracing::debug!(operation = name, "registered custom operation");
        self.custom.push(CustomOperation {
            name: name.to_string(),
            description: description.into(),
            function: Box::new(function),
        });
        Ok(())
    }

    // A handle resolved against another registry may not exist here.
    fn custom(&self, id: CustomId) -> Result<&CustomOperation> {
        self.custom
            .get(id.0)
            .ok_or_else(|| CalcError::UnknownOperation(format!("custom operation #{}", id.0)))
    }

    fn check_name(name: &str) -> Result<()> {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err(CalcError::Registration("name is empty".into()));
        };
        if !first.is_ascii_lowercase() {
            return Err(CalcError::Registration(format!(
                "'{name}' must start with a lower-case letter"
            )));
        }
        if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(CalcError::Registration(format!(
                "'{name}' may only contain a-z, 0-9 and '_'"
            )));
        }
        Ok(())
    }

    /// All operation names: built-ins in table order, then custom ones.
    pub fn names(&self) -> Vec<&str> {
        OperationKind::ALL
            .iter()
            .map(|kind| kind.name())
            .chain(self.custom.iter().map(|op| op.name.as_str()))
            .collect()
    }

    /// Help line for an operation.
    pub fn describe(&self, name: &str) -> Option<&str> {
        match self.resolve(name).ok()? {
            Operation::Builtin(kind) => Some(kind.description()),
            Operation::Custom(id) => self.custom(id).ok().map(|op| op.description.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    fn exec(name: &str, a: f64, b: f64) -> Result<f64> {
        OperationRegistry::new().execute(name, a, b)
    }

    #[test]
    fn test_basic_operations() {
        assert_eq!(exec("add", 5.0, 3.0).unwrap(), 8.0);
        assert_eq!(exec("subtract", 10.0, 4.0).unwrap(), 6.0);
        assert_eq!(exec("multiply", 6.0, 7.0).unwrap(), 42.0);
        assert_eq!(exec("divide", 20.0, 4.0).unwrap(), 5.0);
        assert_eq!(exec("power", 2.0, 3.0).unwrap(), 8.0);
        assert_eq!(exec("percent", 25.0, 200.0).unwrap(), 12.5);
        assert_eq!(exec("abs_diff", 3.0, 10.0).unwrap(), 7.0);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(exec("  ADD ", 1.0, 2.0).unwrap(), 3.0);
        assert_eq!(exec("Int_Divide", 7.0, 2.0).unwrap(), 3.0);
    }

    #[test]
    fn test_zero_divisor_fails() {
        for name in ["divide", "modulus", "int_divide", "percent", "root"] {
            let err = exec(name, 10.0, 0.0).unwrap_err();
            assert!(matches!(err, CalcError::DivisionByZero { .. }), "{name}");
            assert_eq!(err.category(), ErrorCategory::Operation);
        }
    }

    #[test]
    fn test_floor_convention_for_negative_operands() {
        assert_eq!(exec("int_divide", -7.0, 2.0).unwrap(), -4.0);
        assert_eq!(exec("int_divide", 7.0, -2.0).unwrap(), -4.0);
        assert_eq!(exec("modulus", -7.0, 3.0).unwrap(), 2.0);
        assert_eq!(exec("modulus", 7.0, -3.0).unwrap(), -2.0);
        assert_eq!(exec("modulus", -7.0, -3.0).unwrap(), -1.0);
        assert_eq!(exec("modulus", 10.0, 3.0).unwrap(), 1.0);
    }

    #[test]
    fn test_modulus_with_fractional_divisor() {
        assert_eq!(exec("modulus", 1.0, 0.1).unwrap(), 0.09999999999999995);
        assert_eq!(exec("modulus", -1.0, 0.1).unwrap(), 0.1 - 0.09999999999999995);
        assert_eq!(exec("modulus", 5.5, 2.0).unwrap(), 1.5);
        assert_eq!(exec("modulus", -5.5, 2.0).unwrap(), 0.5);

        let r = exec("modulus", 1e9, 1e-9).unwrap();
        assert!((0.0..1e-9).contains(&r), "got {r}");
    }

    #[test]
    fn test_power_domain() {
        assert_eq!(exec("power", -2.0, 3.0).unwrap(), -8.0);
        assert_eq!(exec("power", 4.0, 0.5).unwrap(), 2.0);
        assert!(matches!(
            exec("power", -4.0, 0.5),
            Err(CalcError::Domain { .. })
        ));
        assert!(matches!(
            exec("power", 10.0, 400.0),
            Err(CalcError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_root() {
        assert_eq!(exec("root", 27.0, 3.0).unwrap(), 3.0);
        assert_eq!(exec("root", 16.0, 2.0).unwrap(), 4.0);
        assert_eq!(exec("root", -8.0, 3.0).unwrap(), -2.0);
        assert!((exec("root", 2.0, 2.0).unwrap() - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert!(matches!(
            exec("root", -16.0, 2.0),
            Err(CalcError::Domain { .. })
        ));
        assert!(matches!(
            exec("root", -16.0, 2.5),
            Err(CalcError::Domain { .. })
        ));
    }

    #[test]
    fn test_unknown_operation() {
        let err = exec("sqrt", 1.0, 2.0).unwrap_err();
        assert!(matches!(err, CalcError::UnknownOperation(ref n) if n == "sqrt"));
    }

    #[test]
    fn test_register_custom_operation() {
        let mut registry = OperationRegistry::new();
        registry
            .register("hypot", "Length of the hypotenuse", |a, b| Ok(a.hypot(b)))
            .unwrap();

        assert_eq!(registry.execute("HYPOT", 3.0, 4.0).unwrap(), 5.0);
        assert_eq!(registry.names().last(), Some(&"hypot"));
        assert_eq!(registry.describe("hypot"), Some("Length of the hypotenuse"));
        assert_eq!(registry.names().len(), 11);
    }

    #[test]
    fn test_custom_non_finite_result_rejected() {
        let mut registry = OperationRegistry::new();
        registry
            .register("blowup", "", |_, _| Ok(f64::INFINITY))
            .unwrap();
        assert!(matches!(
            registry.execute("blowup", 1.0, 1.0),
            Err(CalcError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_foreign_custom_handle_is_rejected() {
        let mut with_avg = OperationRegistry::new();
        with_avg
            .register("avg", "Mean", |a, b| Ok((a + b) / 2.0))
            .unwrap();
        let op = with_avg.resolve("avg").unwrap();
        assert_eq!(with_avg.name_of(op).unwrap(), "avg");

        let empty = OperationRegistry::new();
        assert!(matches!(
            empty.execute_resolved(op, 1.0, 1.0),
            Err(CalcError::UnknownOperation(_))
        ));
        assert!(matches!(empty.name_of(op), Err(CalcError::UnknownOperation(_))));
    }

    #[test]
    fn test_register_rejects_bad_names() {
        let mut registry = OperationRegistry::new();
        let noop = |a: f64, _: f64| Ok(a);

        for bad in ["", "   ", "Max", "two words", "9lives", "dash-name", "add", "undo", "quit"] {
            let result = registry.register(bad, "", noop);
            assert!(
                matches!(result, Err(CalcError::Registration(_))),
                "expected rejection for {bad:?}"
            );
        }

        registry.register("max", "", |a: f64, b: f64| Ok(a.max(b))).unwrap();
        assert!(matches!(
            registry.register("max", "", noop),
            Err(CalcError::Registration(_))
        ));
    }
}
