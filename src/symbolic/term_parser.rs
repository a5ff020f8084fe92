//! turns a free-form equation string like `2x^2 + 3sqrt(4x) - 5` into term descriptors
//!
//! The parser works in three passes:
//! 1) `separate_terms` splits the string into additive pieces, each keeping its sign
//! 2) `ensure_constant` gives every piece an explicit leading coefficient
//! 3) `classify` tokenizes the piece into coefficient and body and returns a `TermKind`
//!
//!```text
//!   "2x^2 + 3sqrt(4x) - x"
//!        |  separate_terms
//!   ["2x^2", "3sqrt(4x)", "-x"]
//!        |  ensure_constant
//!   ["2x^2", "3sqrt(4x)", "-1x"]
//!        |  classify
//!   [Power{2, 2}, Sqrt{3, 4}, Linear(-1)]
//!```
use crate::symbolic::term::{CurveVariants, EquationError, MathFn, TermDescriptor};
use crate::symbolic::utils::{brackets_balanced, split_function_call};
use log::{debug, warn};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

/// optional sign followed by an integer or a decimal numeral
static NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?(\d*\.\d+|\d+)").expect("valid numeral pattern"));

/// Result of classifying a single normalized term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TermKind {
    Constant(f64),
    Linear(f64),
    Power {
        coefficient: f64,
        degree: f64,
    },
    Sqrt {
        coefficient: f64,
        scale: f64,
    },
    UnaryMath {
        coefficient: f64,
        function: MathFn,
        scale: f64,
    },
    Invalid,
}

impl TermKind {
    pub fn into_descriptor(self) -> Option<TermDescriptor> {
        match self {
            TermKind::Constant(coefficient) => Some(TermDescriptor::constant(coefficient)),
            TermKind::Linear(coefficient) => Some(TermDescriptor::linear(coefficient)),
            TermKind::Power {
                coefficient,
                degree,
            } => Some(TermDescriptor::power(coefficient, degree)),
            TermKind::Sqrt { coefficient, scale } => Some(TermDescriptor::sqrt(coefficient, scale)),
            TermKind::UnaryMath {
                coefficient,
                function,
                scale,
            } => Some(TermDescriptor::unary(coefficient, function, scale)),
            TermKind::Invalid => None,
        }
    }
}

/// Splits an equation into additive terms. A minus starts a new term unless it follows
/// `^`, `*`, another sign or sits inside brackets, in which case it is a sign.
pub fn separate_terms(input: &str) -> Vec<String> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut depth = 0;
    let mut previous: Option<char> = None;
    for ch in compact.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        let sign_position = matches!(previous, None | Some('^' | '*' | '(' | '+' | '-'));
        match ch {
            '+' if depth == 0 => terms.push(std::mem::take(&mut current)),
            '-' if depth == 0 && !sign_position => {
                terms.push(std::mem::take(&mut current));
                current.push('-');
            }
            _ => current.push(ch),
        }
        previous = Some(ch);
    }
    terms.push(current);
    // "+x" leaves an empty piece in front
    if compact.starts_with('+') && terms.first().is_some_and(|t| t.is_empty()) {
        terms.remove(0);
    }
    terms
}

/// inserts an explicit `1` (or `-1`) in front of a term that has no leading numeral
pub fn ensure_constant(term: &str) -> String {
    if NUMERAL.is_match(term) {
        term.to_string()
    } else if let Some(rest) = term.strip_prefix('-') {
        format!("-1{}", rest)
    } else if let Some(rest) = term.strip_prefix('+') {
        format!("1{}", rest)
    } else {
        format!("1{}", term)
    }
}

/// splits a leading numeral off the input
fn split_numeral(input: &str) -> Option<(f64, &str)> {
    let found = NUMERAL.find(input)?;
    let value = found.as_str().parse::<f64>().ok()?;
    Some((value, &input[found.end()..]))
}

fn is_variable(body: &str) -> bool {
    matches!(body, "x" | "y" | "(x)" | "(y)")
}

/// scale `a` of an argument written as `a*t`, `at`, `t` or `-t`; a zero scale means 1
fn argument_scale(argument: &str) -> Option<f64> {
    let (scale, rest) = match split_numeral(argument) {
        Some((scale, rest)) => (if scale == 0.0 { 1.0 } else { scale }, rest),
        None => match argument.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, argument),
        },
    };
    let rest = rest.strip_prefix('*').unwrap_or(rest);
    if is_variable(rest) { Some(scale) } else { None }
}

fn parse_degree(degree: &str) -> Option<f64> {
    let degree = degree
        .strip_prefix('(')
        .and_then(|d| d.strip_suffix(')'))
        .unwrap_or(degree);
    degree.parse::<f64>().ok().filter(|d| d.is_finite())
}

/// Classifies a term that already carries an explicit coefficient.
/// Rules are checked in order: numeral, linear, caret, sqrt, named function.
pub fn classify(term: &str) -> TermKind {
    if !brackets_balanced(term) {
        return TermKind::Invalid;
    }
    let Some((coefficient, body)) = split_numeral(term) else {
        return TermKind::Invalid;
    };
    let body = body.strip_prefix('*').unwrap_or(body);

    if body.is_empty() {
        return TermKind::Constant(coefficient);
    }
    if is_variable(body) {
        return TermKind::Linear(coefficient);
    }
    if let Some((base, degree)) = body.split_once('^') {
        return match (is_variable(base), parse_degree(degree)) {
            (true, Some(degree)) => TermKind::Power {
                coefficient,
                degree,
            },
            _ => TermKind::Invalid,
        };
    }
    let Some((name, argument)) = split_function_call(body) else {
        return TermKind::Invalid;
    };
    let Some(scale) = argument_scale(argument) else {
        return TermKind::Invalid;
    };
    if name == "sqrt" {
        return TermKind::Sqrt { coefficient, scale };
    }
    match MathFn::from_str(name) {
        Ok(function) => TermKind::UnaryMath {
            coefficient,
            function,
            scale,
        },
        Err(_) => TermKind::Invalid,
    }
}

/// parses one raw term (as produced by `separate_terms`)
pub fn parse_term(term: &str) -> Result<TermDescriptor, EquationError> {
    if term.is_empty() || term == "-" || term == "+" {
        warn!("term '{}' has no body", term);
        return Err(EquationError::InvalidEquation(term.to_string()));
    }
    let normalized = ensure_constant(term);
    let kind = classify(&normalized);
    debug!("term '{}' normalized to '{}' -> {:?}", term, normalized, kind);
    kind.into_descriptor().ok_or_else(|| {
        warn!("term '{}' can not be classified", term);
        EquationError::InvalidEquation(term.to_string())
    })
}

/// Parses the right hand side of a row into an ordered list of term descriptors.
/// # Example
/// ```
/// use RustedDomain::symbolic::term_parser::parse_equation;
/// let terms = parse_equation("2x^2+3x-5").unwrap();
/// assert_eq!(terms.len(), 3);
/// assert_eq!(terms[2].coefficient, -5.0);
/// ```
pub fn parse_equation(raw: &str) -> Result<Vec<TermDescriptor>, EquationError> {
    separate_terms(raw).iter().map(|term| parse_term(term)).collect()
}

/// same as `parse_equation` plus the negative branch of every square root
pub fn parse_equation_variants(raw: &str) -> Result<CurveVariants, EquationError> {
    parse_equation(raw).map(CurveVariants::new)
}
