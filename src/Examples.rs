//! examples of usage of RustedDomain
/// parsing, plotting and domain description examples
pub mod domain_examples;
