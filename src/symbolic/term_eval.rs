//! evaluation of parsed equations
use crate::symbolic::term::TermDescriptor;

/// Sum of every term at `input`. Out of domain arguments (sqrt of a negative number,
/// log of zero, ...) give NaN instead of an error, callers decide how to skip them.
pub fn evaluate(terms: &[TermDescriptor], input: f64) -> f64 {
    terms.iter().map(|term| term.evaluate(input)).sum()
}

/// turns a list of terms into a regular Rust closure of one argument
pub fn lambdify(terms: &[TermDescriptor]) -> impl Fn(f64) -> f64 + '_ {
    move |input| evaluate(terms, input)
}

/// owned version of `lambdify`, the closure keeps its own copy of the terms
pub fn lambdify_owned(terms: Vec<TermDescriptor>) -> Box<dyn Fn(f64) -> f64> {
    Box::new(move |input| evaluate(&terms, input))
}
