//! # Boundary solver
//!
//! Given the rows entered by the user, finds the bounds of the region they enclose so
//! the double integral over it can be written as an iterated integral.
//!
//! ## Steps
//! 1. `integration_order` - majority of `y = ...` rows means `dy dx`, majority of
//!    `x = ...` rows means `dx dy`
//! 2. `given_bounds` - rows tagged with the inner variable are inner bounds, the others
//!    outer bounds
//! 3. `solve_domain`
//!    - two or more inner bounds and at most one outer bound: the outer bounds are the roots of
//!      `f1(t) = f2(t)` for polynomials of degree <= 2 (`polynomial_coefficients`,
//!      `polynomial_roots`) or for a single square root against a single power
//!      (`solve_sqrt_vs_power`); a single given constant outer bound is merged with
//!      the roots and the two smallest values are kept
//!    - two inner and two outer bounds: outer bounds are taken as given
//!    - inner bounds are ordered by their value at the middle of the outer interval
//!      (`order_inner_bounds`)
//!
//! Cases that do not reduce to one of the above give `Ok(None)`; only malformed
//! equations give an error.
use crate::symbolic::term::{Axis, EquationError, TermDescriptor};
use crate::symbolic::term_eval::evaluate;
use crate::symbolic::term_parser::parse_equation;
use log::{debug, info, warn};
use std::fmt;

/// One input row: `axis_tag = equation`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurveRow {
    pub axis_tag: String,
    pub equation: String,
}

impl CurveRow {
    pub fn new(axis_tag: &str, equation: &str) -> Self {
        CurveRow {
            axis_tag: axis_tag.to_string(),
            equation: equation.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.equation.trim().is_empty()
    }
}

/// `inner` is the differential integrated first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrationOrder {
    pub inner: Axis,
    pub outer: Axis,
}

impl IntegrationOrder {
    pub fn dy_dx() -> Self {
        IntegrationOrder {
            inner: Axis::Y,
            outer: Axis::X,
        }
    }

    pub fn dx_dy() -> Self {
        IntegrationOrder {
            inner: Axis::X,
            outer: Axis::Y,
        }
    }
}

impl fmt::Display for IntegrationOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "d{} d{}", self.inner, self.outer)
    }
}

/// raw equations split by axis role
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GivenBounds {
    pub inner: Vec<String>,
    pub outer: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainDescription {
    pub outer_lower: f64,
    pub outer_upper: f64,
    pub outer_var: Axis,
    pub inner_lower_expr: String,
    pub inner_upper_expr: String,
    pub inner_var: Axis,
}

impl fmt::Display for DomainDescription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "D = {{(x,y) | {} <= {} <= {}, {} <= {} <= {}}}",
            self.outer_lower,
            self.outer_var,
            self.outer_upper,
            self.inner_lower_expr,
            self.inner_var,
            self.inner_upper_expr
        )
    }
}

fn tagged_rows(rows: &[CurveRow]) -> impl Iterator<Item = &CurveRow> {
    rows.iter().filter(|row| !row.is_blank())
}

/// Decides the order of integration from the row tags. A tie is resolved to `dy dx` only
/// when there are exactly two rows of each kind, any other tie gives `None`.
pub fn integration_order(rows: &[CurveRow]) -> Option<IntegrationOrder> {
    let (mut y_count, mut x_count) = (0, 0);
    for row in tagged_rows(rows) {
        match Axis::from_tag(&row.axis_tag) {
            Ok(Axis::Y) => y_count += 1,
            Ok(Axis::X) => x_count += 1,
            Err(_) => {}
        }
    }
    debug!("{} rows in terms of y, {} rows in terms of x", y_count, x_count);
    if y_count > x_count {
        Some(IntegrationOrder::dy_dx())
    } else if x_count > y_count {
        Some(IntegrationOrder::dx_dy())
    } else if y_count == 2 {
        Some(IntegrationOrder::dy_dx())
    } else {
        None
    }
}

/// partitions the equations of the rows into inner and outer bounds
pub fn given_bounds(rows: &[CurveRow], order: IntegrationOrder) -> GivenBounds {
    let mut bounds = GivenBounds::default();
    for row in tagged_rows(rows) {
        match Axis::from_tag(&row.axis_tag) {
            Ok(axis) if axis == order.inner => bounds.inner.push(row.equation.trim().to_string()),
            Ok(axis) if axis == order.outer => bounds.outer.push(row.equation.trim().to_string()),
            _ => {}
        }
    }
    bounds
}

/// `[c0, c1, c2]` of `c0 + c1 t + c2 t^2 = 0` obtained by setting the bounds equal:
/// terms of even rows are added, terms of odd rows subtracted. `None` as soon as a term is
/// not a power of degree 0, 1 or 2.
pub fn polynomial_coefficients(bounds: &[Vec<TermDescriptor>]) -> Option<[f64; 3]> {
    let mut coefficients = [0.0; 3];
    for (row, terms) in bounds.iter().enumerate() {
        for term in terms {
            let degree = term.polynomial_degree()?;
            if row % 2 == 0 {
                coefficients[degree] += term.coefficient;
            } else {
                coefficients[degree] -= term.coefficient;
            }
        }
    }
    Some(coefficients)
}

/// real roots of `c0 + c1 t + c2 t^2 = 0` in ascending order, `None` when there are none
/// or the equation does not determine them
pub fn polynomial_roots(coefficients: [f64; 3]) -> Option<Vec<f64>> {
    let [c0, c1, c2] = coefficients;
    if c2 == 0.0 {
        if c1 == 0.0 {
            warn!("bounds are parallel, no intersection");
            return None;
        }
        return Some(vec![-c0 / c1]);
    }
    let discriminant = c1 * c1 - 4.0 * c2 * c0;
    if discriminant < 0.0 || !discriminant.is_finite() {
        warn!("no real intersection, discriminant = {}", discriminant);
        return None;
    }
    let radical = discriminant.sqrt();
    let mut roots = vec![(-c1 - radical) / (2.0 * c2), (-c1 + radical) / (2.0 * c2)];
    roots.sort_by(f64::total_cmp);
    Some(roots)
}

/// Solves `c1 sqrt(a t) = c2 t^n`. Both sides vanish at 0, the other root is
/// `((c1/c2) sqrt(a))^(1/(n - 0.5))`. Returned as `[0, root]`, not sorted.
pub fn solve_sqrt_vs_power(sqrt_term: &TermDescriptor, power_term: &TermDescriptor) -> Option<[f64; 2]> {
    let root_term = sqrt_term.sqrt_as_power();
    let (c1, a) = (root_term.coefficient, root_term.argument_scale);
    let (c2, n) = (power_term.coefficient, power_term.exponent?);
    let root = (c1 / c2 * a.sqrt()).powf(1.0 / (n - 0.5));
    if root.is_finite() {
        Some([0.0, root])
    } else {
        warn!("c1 sqrt(a t) = c2 t^n has no finite root for c1 = {}, a = {}, c2 = {}, n = {}", c1, a, c2, n);
        None
    }
}

/// the sqrt and power term of two single term bounds, in this order
fn sqrt_and_power(bounds: &[Vec<TermDescriptor>]) -> Option<(TermDescriptor, TermDescriptor)> {
    let [first, second] = bounds else {
        return None;
    };
    let ([first], [second]) = (first.as_slice(), second.as_slice()) else {
        return None;
    };
    let power_with_unit_scale =
        |term: &TermDescriptor| term.is_power() && term.argument_scale == 1.0;
    if first.is_sqrt() && power_with_unit_scale(second) {
        Some((*first, *second))
    } else if second.is_sqrt() && power_with_unit_scale(first) {
        Some((*second, *first))
    } else {
        None
    }
}

/// outer bounds from the intersections of the inner bounds
fn derive_outer_bounds(inner: &[String]) -> Result<Option<Vec<f64>>, EquationError> {
    let parsed = inner
        .iter()
        .map(|equation| parse_equation(equation))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(coefficients) = polynomial_coefficients(&parsed) {
        info!("polynomial bounds, coefficients {:?}", coefficients);
        return Ok(polynomial_roots(coefficients));
    }
    if let Some((sqrt_term, power_term)) = sqrt_and_power(&parsed) {
        info!("square root against power: {} = {}", sqrt_term, power_term);
        return Ok(solve_sqrt_vs_power(&sqrt_term, &power_term).map(|roots| roots.to_vec()));
    }
    info!("bounds are neither polynomials nor a square root against a power");
    Ok(None)
}

/// explicit outer bounds have to be constants
fn explicit_outer_bounds(outer: &[String]) -> Result<Option<Vec<f64>>, EquationError> {
    let mut values = Vec::with_capacity(outer.len());
    for equation in outer {
        let terms = parse_equation(equation)?;
        if !terms.iter().all(|term| term.polynomial_degree() == Some(0)) {
            warn!("outer bound '{}' is not a constant", equation);
            return Ok(None);
        }
        values.push(evaluate(&terms, 0.0));
    }
    values.sort_by(f64::total_cmp);
    Ok(Some(values))
}

/// Puts the inner bound with the smaller value at the middle of the outer interval first.
pub fn order_inner_bounds(
    lower: &str,
    upper: &str,
    outer: (f64, f64),
) -> Result<(String, String), EquationError> {
    let mid = (outer.0 + outer.1) / 2.0;
    let value_lower = evaluate(&parse_equation(lower)?, mid);
    let value_upper = evaluate(&parse_equation(upper)?, mid);
    debug!("at {}: {} = {}, {} = {}", mid, lower, value_lower, upper, value_upper);
    if value_lower > value_upper {
        Ok((upper.to_string(), lower.to_string()))
    } else {
        Ok((lower.to_string(), upper.to_string()))
    }
}

/// Describes the region enclosed by the given bounds, `Ok(None)` when it can't be determined.
pub fn solve_domain(
    bounds: &GivenBounds,
    order: IntegrationOrder,
) -> Result<Option<DomainDescription>, EquationError> {
    let outer = if bounds.inner.len() >= 2 && bounds.outer.len() < 2 {
        let given = explicit_outer_bounds(&bounds.outer)?;
        let derived = derive_outer_bounds(&bounds.inner)?;
        match (given, derived) {
            (Some(given), derived) if given.is_empty() => derived,
            // a given bound closes the region together with the intersections
            (Some(mut given), Some(derived)) => {
                given.extend(derived);
                given.sort_by(f64::total_cmp);
                given.truncate(2);
                Some(given)
            }
            _ => None,
        }
    } else if bounds.inner.len() == 2 && bounds.outer.len() == 2 {
        explicit_outer_bounds(&bounds.outer)?
    } else {
        info!(
            "{} inner and {} outer bounds can not describe a region",
            bounds.inner.len(),
            bounds.outer.len()
        );
        None
    };
    let Some(outer) = outer else {
        return Ok(None);
    };
    let (outer_lower, outer_upper) = match outer.as_slice() {
        [lower, upper] if lower.is_finite() && upper.is_finite() => (*lower, *upper),
        _ => {
            info!("outer bounds {:?} do not close the region", outer);
            return Ok(None);
        }
    };
    let (inner_lower_expr, inner_upper_expr) =
        order_inner_bounds(&bounds.inner[0], &bounds.inner[1], (outer_lower, outer_upper))?;
    let domain = DomainDescription {
        outer_lower,
        outer_upper,
        outer_var: order.outer,
        inner_lower_expr,
        inner_upper_expr,
        inner_var: order.inner,
    };
    info!("{}", domain);
    Ok(Some(domain))
}

/// integration order, bounds and domain of a set of rows in one call
pub fn describe_domain(rows: &[CurveRow]) -> Result<Option<DomainDescription>, EquationError> {
    let Some(order) = integration_order(rows) else {
        info!("order of integration can not be determined");
        return Ok(None);
    };
    let bounds = given_bounds(rows, order);
    solve_domain(&bounds, order)
}
