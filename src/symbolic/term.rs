//! # Term descriptors
//!
//! The atomic unit of a parsed equation. An equation such as `2x^2 + 3sqrt(4x) - 5`
//! is stored as an ordered list of additive pieces, each of them evaluable on its own as
//!
//! `coefficient * operation(argument_scale * input, exponent)`
//!
//! ## Main structures
//! - `TermDescriptor` - one additive piece of an equation
//! - `Operation` - which elementary function combines input and exponent
//! - `MathFn` - closed set of named elementary functions (`sin`, `log`, ...)
//! - `Axis` - the variable on the left hand side of a row (`y = f(x)` or `x = f(y)`)
//! - `ParsedCurve`, `CurveVariants` - parsed rows ready for sampling and solving
//! - `EquationError` - the single error a malformed row can produce
#![allow(non_camel_case_types)]

use std::fmt;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

/// Error raised when a row cannot be turned into term descriptors.
/// Carries the offending raw term (or axis tag) so it can be shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EquationError {
    #[error("Invalid equation entered. Please check formatting: {0}")]
    InvalidEquation(String),
}

/// Named elementary functions accepted in a term like `3sin(2x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum MathFn {
    Abs,
    Acos,
    Asin,
    Atan,
    Ceil,
    Cos,
    Exp,
    Floor,
    Log,
    Round,
    Sin,
    Tan,
}

impl MathFn {
    /// applies the function; out of domain arguments give NaN
    pub fn apply(self, x: f64) -> f64 {
        match self {
            MathFn::Abs => x.abs(),
            MathFn::Acos => x.acos(),
            MathFn::Asin => x.asin(),
            MathFn::Atan => x.atan(),
            MathFn::Ceil => x.ceil(),
            MathFn::Cos => x.cos(),
            MathFn::Exp => x.exp(),
            MathFn::Floor => x.floor(),
            MathFn::Log => x.ln(),
            // half-way cases go towards +inf: round(-2.5) = -2
            MathFn::Round => (x + 0.5).floor(),
            MathFn::Sin => x.sin(),
            MathFn::Tan => x.tan(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// `(a*t)^n`, also used for constants (n = 0) and linear terms (n = 1)
    Power,
    /// `sqrt(a*t)`
    Sqrt,
    /// `f(a*t)` for a named function
    UnaryMath(MathFn),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermDescriptor {
    pub coefficient: f64,
    pub operation: Operation,
    pub argument_scale: f64,
    /// exponent of a `Power` term, `None` for `Sqrt` and `UnaryMath`
    pub exponent: Option<f64>,
}

impl TermDescriptor {
    pub fn constant(coefficient: f64) -> Self {
        Self::power(coefficient, 0.0)
    }

    pub fn linear(coefficient: f64) -> Self {
        Self::power(coefficient, 1.0)
    }

    pub fn power(coefficient: f64, exponent: f64) -> Self {
        TermDescriptor {
            coefficient,
            operation: Operation::Power,
            argument_scale: 1.0,
            exponent: Some(exponent),
        }
    }

    pub fn sqrt(coefficient: f64, argument_scale: f64) -> Self {
        TermDescriptor {
            coefficient,
            operation: Operation::Sqrt,
            argument_scale,
            exponent: None,
        }
    }

    pub fn unary(coefficient: f64, function: MathFn, argument_scale: f64) -> Self {
        TermDescriptor {
            coefficient,
            operation: Operation::UnaryMath(function),
            argument_scale,
            exponent: None,
        }
    }

    pub fn is_sqrt(&self) -> bool {
        self.operation == Operation::Sqrt
    }

    pub fn is_power(&self) -> bool {
        self.operation == Operation::Power
    }

    /// exponent of a power term whose degree is 0, 1 or 2
    pub fn polynomial_degree(&self) -> Option<usize> {
        match (self.operation, self.exponent) {
            (Operation::Power, Some(n)) if n == 0.0 => Some(0),
            (Operation::Power, Some(n)) if n == 1.0 => Some(1),
            (Operation::Power, Some(n)) if n == 2.0 => Some(2),
            _ => None,
        }
    }

    /// same term with the opposite sign of a square root; other terms are returned as is
    pub fn negated_root(&self) -> Self {
        if self.is_sqrt() {
            TermDescriptor {
                coefficient: -self.coefficient,
                ..*self
            }
        } else {
            *self
        }
    }

    /// `c*sqrt(a*t)` rewritten as `c*(a*t)^0.5`
    pub fn sqrt_as_power(&self) -> Self {
        if self.is_sqrt() {
            TermDescriptor {
                operation: Operation::Power,
                exponent: Some(0.5),
                ..*self
            }
        } else {
            *self
        }
    }

    /// value of this single term at `input`
    pub fn evaluate(&self, input: f64) -> f64 {
        let argument = self.argument_scale * input;
        let value = match self.operation {
            Operation::Power => match self.exponent {
                // t^0 == 1 for every t, 0 and NaN included
                Some(n) if n == 0.0 => 1.0,
                Some(n) => argument.powf(n),
                None => f64::NAN,
            },
            Operation::Sqrt => argument.sqrt(),
            Operation::UnaryMath(function) => function.apply(argument),
        };
        self.coefficient * value
    }
}

impl fmt::Display for TermDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.operation, self.exponent) {
            (Operation::Power, Some(n)) if n == 0.0 => write!(f, "{}", self.coefficient),
            (Operation::Power, Some(n)) if n == 1.0 => write!(f, "{}*t", self.coefficient),
            (Operation::Power, Some(n)) => write!(f, "{}*t^{}", self.coefficient, n),
            (Operation::Power, None) => write!(f, "{}*t^?", self.coefficient),
            (Operation::Sqrt, _) => {
                write!(f, "{}*sqrt({}*t)", self.coefficient, self.argument_scale)
            }
            (Operation::UnaryMath(function), _) => {
                write!(f, "{}*{}({}*t)", self.coefficient, function, self.argument_scale)
            }
        }
    }
}

/// Variable on the left hand side of a row. `Y` reads `y = f(x)`, `X` reads `x = f(y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// the other axis, i.e. the free variable of a row tagged with `self`
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// converts a raw row tag; anything but `x`/`y` is an invalid equation
    pub fn from_tag(tag: &str) -> Result<Axis, EquationError> {
        Axis::from_str(tag.trim()).map_err(|_| EquationError::InvalidEquation(tag.to_string()))
    }
}

/// Principal sequence of a row plus, when it contains a square root, the same sequence
/// taken on the negative branch of every root.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveVariants {
    pub principal: Vec<TermDescriptor>,
    pub negated_root: Option<Vec<TermDescriptor>>,
}

impl CurveVariants {
    pub fn new(principal: Vec<TermDescriptor>) -> Self {
        let negated_root = if principal.iter().any(TermDescriptor::is_sqrt) {
            Some(principal.iter().map(TermDescriptor::negated_root).collect())
        } else {
            None
        };
        CurveVariants {
            principal,
            negated_root,
        }
    }

    /// every sequence that has to be drawn for this row
    pub fn branches(&self) -> impl Iterator<Item = &Vec<TermDescriptor>> {
        std::iter::once(&self.principal).chain(self.negated_root.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCurve {
    pub terms: Vec<TermDescriptor>,
    pub in_terms_of: Axis,
}

impl ParsedCurve {
    pub fn new(terms: Vec<TermDescriptor>, in_terms_of: Axis) -> Self {
        ParsedCurve { terms, in_terms_of }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_math_fn_names_round_trip() {
        for function in MathFn::iter() {
            let name = function.to_string();
            assert_eq!(MathFn::from_str(&name).unwrap(), function);
        }
        assert!(MathFn::from_str("sqrt").is_err());
    }

    #[test]
    fn test_round_goes_towards_positive_infinity() {
        assert_eq!(MathFn::Round.apply(2.5), 3.0);
        assert_eq!(MathFn::Round.apply(-2.5), -2.0);
        assert_eq!(MathFn::Round.apply(-2.6), -3.0);
    }

    #[test]
    fn test_axis_from_tag() {
        assert_eq!(Axis::from_tag("y").unwrap(), Axis::Y);
        assert_eq!(Axis::from_tag(" x ").unwrap(), Axis::X);
        assert_eq!(
            Axis::from_tag(""),
            Err(EquationError::InvalidEquation("".to_string()))
        );
        assert_eq!(Axis::Y.other(), Axis::X);
    }

    #[test]
    fn test_negated_root_only_touches_sqrt() {
        let variants = CurveVariants::new(vec![
            TermDescriptor::sqrt(2.0, 4.0),
            TermDescriptor::constant(1.0),
        ]);
        let negated = variants.negated_root.clone().unwrap();
        assert_eq!(negated[0].coefficient, -2.0);
        assert_eq!(negated[1], TermDescriptor::constant(1.0));
        assert_eq!(variants.principal[0].coefficient, 2.0);
        assert_eq!(variants.branches().count(), 2);

        let plain = CurveVariants::new(vec![TermDescriptor::linear(1.0)]);
        assert!(plain.negated_root.is_none());
        assert_eq!(plain.branches().count(), 1);
    }

    #[test]
    fn test_sqrt_as_power() {
        let term = TermDescriptor::sqrt(3.0, 4.0).sqrt_as_power();
        assert_eq!(term.operation, Operation::Power);
        assert_eq!(term.exponent, Some(0.5));
        assert_eq!(term.argument_scale, 4.0);
        assert_eq!(term.evaluate(1.0), 6.0);
    }

    #[test]
    fn test_polynomial_degree() {
        assert_eq!(TermDescriptor::constant(2.0).polynomial_degree(), Some(0));
        assert_eq!(TermDescriptor::linear(2.0).polynomial_degree(), Some(1));
        assert_eq!(TermDescriptor::power(2.0, 2.0).polynomial_degree(), Some(2));
        assert_eq!(TermDescriptor::power(2.0, 3.0).polynomial_degree(), None);
        assert_eq!(TermDescriptor::sqrt(2.0, 1.0).polynomial_degree(), None);
    }
}
