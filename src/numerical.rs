///  Example#1
/// ```
/// // bounds of the region between y = x^2 and y = 4
/// use RustedDomain::numerical::boundary_solver::{describe_domain, CurveRow};
/// let rows = vec![CurveRow::new("y", "x^2"), CurveRow::new("y", "4")];
/// let domain = describe_domain(&rows).unwrap().unwrap();
/// println!("{}", domain);
/// assert_eq!(domain.to_string(), "D = {(x,y) | -2 <= x <= 2, x^2 <= y <= 4}");
///  ```
/// Example#2
/// ```
/// // or step by step...
/// use RustedDomain::numerical::boundary_solver::*;
/// let rows = vec![CurveRow::new("x", "sqrt(4y)"), CurveRow::new("x", "y")];
/// let order = integration_order(&rows).unwrap();
/// println!("order of integration: {}", order);
/// let bounds = given_bounds(&rows, order);
/// let domain = solve_domain(&bounds, order).unwrap();
/// assert!(domain.is_some());
/// ```
pub mod boundary_solver;
