#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// term descriptors: the parsed form of one additive piece of an equation
///
///# Example
/// ```
/// use RustedDomain::symbolic::term::{TermDescriptor, MathFn};
/// let term = TermDescriptor::unary(2.0, MathFn::Cos, 1.0);
/// assert_eq!(term.evaluate(0.0), 2.0);
/// ```
pub mod term;
///____________________________________________________________________________________________________________________________
/// # Term parser
/// a module turns a String equation into a vector of term descriptors
///# Example#
/// ```
/// use RustedDomain::symbolic::term_parser::{parse_equation, parse_equation_variants};
/// use RustedDomain::symbolic::term_eval::evaluate;
/// let input = "2x^2 + 3x - 5";
/// let terms = parse_equation(input).unwrap();
/// println!("{} parsed into {:?}", input, terms);
/// assert_eq!(evaluate(&terms, 1.0), 0.0);
/// // square roots come with a second, negative branch
/// let variants = parse_equation_variants("sqrt(4y)").unwrap();
/// let negated = variants.negated_root.unwrap();
/// assert_eq!(evaluate(&negated, 1.0), -2.0);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod term_parser;
/// evaluate term descriptors or turn them into a Rust closure
pub mod term_eval;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket parsing and proceeding
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
