//! sampling of parsed curves and smooth rendering of the samples
//!
//! A curve is evaluated every `step` units over the visible range, the values are moved
//! to screen coordinates and the renderer draws Bezier segments through them. Control
//! points of every interior sample are estimated from its two neighbours:
//!```text
//!   f1 = s * |P0P1| / (|P0P1| + |P1P2|),  f2 = s - f1
//!   left control  = P1 - f1 * (P2 - P0)
//!   right control = P1 + f2 * (P2 - P0)
//!```
//! so the path passes through every sample and stays smooth.
use crate::Utils::canvas::{Canvas, CanvasConfig, PlotColor, ScreenPoint};
use crate::symbolic::term::{Axis, ParsedCurve, TermDescriptor};
use crate::symbolic::term_eval::evaluate;
use crate::symbolic::utils::arange;
use itertools::Itertools;
use log::debug;

pub const DEFAULT_STEP: f64 = 0.01;
pub const CURVE_SMOOTHNESS: f64 = 0.5;
/// smallest sampling step, bounds the samples of a curve by the visible range / MIN_STEP
pub const MIN_STEP: f64 = 1e-3;

/// sampling step and smoothing factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerSettings {
    pub step: f64,
    pub smoothness: f64,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        SamplerSettings {
            step: DEFAULT_STEP,
            smoothness: CURVE_SMOOTHNESS,
        }
    }
}

impl SamplerSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.step >= MIN_STEP && self.step.is_finite()) {
            return Err(format!(
                "sampling step must be at least {}, got {}",
                MIN_STEP, self.step
            ));
        }
        if !(self.smoothness >= 0.0 && self.smoothness.is_finite()) {
            return Err(format!(
                "smoothness must be non negative, got {}",
                self.smoothness
            ));
        }
        Ok(())
    }
}

/// range of the free variable of a curve: x for `y = f(x)`, y for `x = f(y)`
pub fn domain_range(in_terms_of: Axis, config: &CanvasConfig) -> (f64, f64) {
    match in_terms_of {
        Axis::Y => config.x_range(),
        Axis::X => config.y_range(),
    }
}

/// (input, value) pairs in cartesian units
pub fn tabulate(terms: &[TermDescriptor], range: (f64, f64), step: f64) -> Vec<(f64, f64)> {
    arange(range.0, range.1, step)
        .into_iter()
        .map(|input| (input, evaluate(terms, input)))
        .collect()
}

/// Samples a curve and returns the samples in screen coordinates. Samples where the
/// curve is undefined come back with NaN coordinates.
pub fn sample(
    curve: &ParsedCurve,
    range: (f64, f64),
    step: f64,
    config: &CanvasConfig,
) -> Vec<ScreenPoint> {
    let points: Vec<ScreenPoint> = tabulate(&curve.terms, range, step)
        .into_iter()
        .map(|(input, value)| match curve.in_terms_of {
            Axis::Y => config.to_screen(input, value),
            Axis::X => config.to_screen(value, input),
        })
        .collect();
    debug!(
        "{} samples of a curve in terms of {} over [{}, {}]",
        points.len(),
        curve.in_terms_of,
        range.0,
        range.1
    );
    points
}

/// left and right control points of `p1` given its neighbours
pub fn control_points(
    p0: ScreenPoint,
    p1: ScreenPoint,
    p2: ScreenPoint,
    smoothness: f64,
) -> (ScreenPoint, ScreenPoint) {
    let dist01 = p0.distance(&p1);
    let dist12 = p1.distance(&p2);
    let total = dist01 + dist12;
    if total == 0.0 {
        return (p1, p1);
    }
    let fa = smoothness * dist01 / total;
    let fb = smoothness - fa;
    let w = p2.x - p0.x;
    let h = p2.y - p0.y;
    (
        ScreenPoint::new(p1.x - fa * w, p1.y - fa * h),
        ScreenPoint::new(p1.x + fb * w, p1.y + fb * h),
    )
}

/// draws one run of finite points as a single smooth path
fn render_run<C: Canvas>(run: &[ScreenPoint], color: PlotColor, canvas: &mut C, smoothness: f64) {
    match run.len() {
        0 | 1 => {}
        2 => {
            canvas.begin_path(run[0]);
            canvas.line_to(run[1]);
            canvas.stroke(color);
        }
        n => {
            let controls: Vec<(ScreenPoint, ScreenPoint)> = run
                .iter()
                .tuple_windows()
                .map(|(p0, p1, p2)| control_points(*p0, *p1, *p2, smoothness))
                .collect();
            canvas.begin_path(run[0]);
            canvas.quadratic_to(controls[0].0, run[1]);
            for i in 1..n - 2 {
                canvas.bezier_to(controls[i - 1].1, controls[i].0, run[i + 1]);
            }
            canvas.quadratic_to(controls[n - 3].1, run[n - 1]);
            canvas.stroke(color);
        }
    }
}

/// Renders the samples of one curve. The path is broken wherever a sample is not finite.
pub fn render<C: Canvas>(points: &[ScreenPoint], color: PlotColor, canvas: &mut C, smoothness: f64) {
    for run in points.split(|point| !point.is_finite()) {
        render_run(run, color, canvas, smoothness);
    }
}

/// draws both axes with a tick every unit
pub fn draw_axes<C: Canvas>(canvas: &mut C, config: &CanvasConfig) {
    let (x_min, x_max) = config.x_range();
    let (y_min, y_max) = config.y_range();
    canvas.draw_line(config.to_screen(0.0, y_min), config.to_screen(0.0, y_max), PlotColor::Black);
    canvas.draw_line(config.to_screen(x_min, 0.0), config.to_screen(x_max, 0.0), PlotColor::Black);
    for i in (x_min.ceil() as i64)..=(x_max.floor() as i64) {
        let x = i as f64;
        canvas.draw_line(config.to_screen(x, -0.1), config.to_screen(x, 0.1), PlotColor::Black);
    }
    for i in (y_min.ceil() as i64)..=(y_max.floor() as i64) {
        let y = i as f64;
        canvas.draw_line(config.to_screen(-0.1, y), config.to_screen(0.1, y), PlotColor::Black);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Utils::canvas::{MIN_SCALE, PathRecorder, PathSegment};
    use crate::symbolic::term_parser::parse_equation;
    use approx::assert_relative_eq;

    fn curve(equation: &str, axis: Axis) -> ParsedCurve {
        ParsedCurve::new(parse_equation(equation).unwrap(), axis)
    }

    #[test]
    fn test_sample_y_of_x() {
        let config = CanvasConfig::default();
        let points = sample(&curve("2x", Axis::Y), (-1.0, 1.0), 0.5, &config);
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], ScreenPoint::new(275.0, 225.0));
        assert_eq!(points[2], ScreenPoint::new(300.0, 175.0));
    }

    #[test]
    fn test_sample_x_of_y() {
        let config = CanvasConfig::default();
        let points = sample(&curve("2y", Axis::X), (-1.0, 1.0), 0.5, &config);
        // input runs along y, value along x
        assert_eq!(points[0], ScreenPoint::new(250.0, 200.0));
        assert_eq!(points[3], ScreenPoint::new(325.0, 162.5));
    }

    #[test]
    fn test_domain_range_follows_free_variable() {
        let config = CanvasConfig::default();
        assert_eq!(domain_range(Axis::Y, &config), (-12.0, 12.0));
        assert_eq!(domain_range(Axis::X, &config), (-7.0, 7.0));
    }

    #[test]
    fn test_control_points() {
        let (left, right) = control_points(
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(1.0, 1.0),
            ScreenPoint::new(2.0, 0.0),
            0.5,
        );
        assert_relative_eq!(left.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(left.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(right.x, 1.5, epsilon = 1e-12);
        assert_relative_eq!(right.y, 1.0, epsilon = 1e-12);

        let same = ScreenPoint::new(3.0, 3.0);
        assert_eq!(control_points(same, same, same, 0.5), (same, same));
    }

    #[test]
    fn test_constant_curve_renders_horizontal_path() {
        let config = CanvasConfig::default();
        let points = sample(&curve("5", Axis::Y), config.x_range(), DEFAULT_STEP, &config);
        let mut recorder = PathRecorder::new();
        render(&points, PlotColor::Red, &mut recorder, CURVE_SMOOTHNESS);
        let paths: Vec<_> = recorder.paths().collect();
        assert_eq!(paths.len(), 1);
        let row = config.to_screen_y(5.0);
        assert_eq!(paths[0].start.y, row);
        for segment in &paths[0].segments {
            for point in segment.points() {
                assert_relative_eq!(point.y, row, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_path_passes_through_every_sample() {
        let config = CanvasConfig::default();
        let points = sample(&curve("x^2", Axis::Y), (-2.0, 2.0), 0.25, &config);
        let mut recorder = PathRecorder::new();
        render(&points, PlotColor::Blue, &mut recorder, CURVE_SMOOTHNESS);
        let path = recorder.paths().next().unwrap();
        assert_eq!(path.start, points[0]);
        assert_eq!(path.segments.len(), points.len() - 1);
        for (segment, point) in path.segments.iter().zip(points.iter().skip(1)) {
            assert_eq!(segment.end(), *point);
        }
        assert!(matches!(path.segments[0], PathSegment::Quadratic(..)));
        assert!(matches!(path.segments[1], PathSegment::Cubic(..)));
        assert!(matches!(path.segments.last(), Some(PathSegment::Quadratic(..))));
    }

    #[test]
    fn test_undefined_samples_break_the_path() {
        let config = CanvasConfig::default();
        // sqrt(x) only exists for x >= 0, log(x) only for x > 0
        let points = sample(&curve("sqrt(x)", Axis::Y), (-1.0, 1.0), 0.1, &config);
        assert!(points.iter().any(|p| !p.is_finite()));
        let mut recorder = PathRecorder::new();
        render(&points, PlotColor::Green, &mut recorder, CURVE_SMOOTHNESS);
        let paths: Vec<_> = recorder.paths().collect();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].start.is_finite());

        let gaps = vec![
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(1.0, 0.0),
            ScreenPoint::new(f64::NAN, 0.0),
            ScreenPoint::new(3.0, 0.0),
            ScreenPoint::new(f64::NAN, f64::NAN),
            ScreenPoint::new(5.0, 1.0),
            ScreenPoint::new(6.0, 2.0),
            ScreenPoint::new(7.0, 1.0),
        ];
        let mut recorder = PathRecorder::new();
        render(&gaps, PlotColor::Green, &mut recorder, CURVE_SMOOTHNESS);
        // two point run is a line, single point run is skipped
        let paths: Vec<_> = recorder.paths().collect();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].segments, vec![PathSegment::Line(ScreenPoint::new(1.0, 0.0))]);
        assert_eq!(paths[1].segments.len(), 2);
    }

    #[test]
    fn test_axes_have_ticks() {
        let config = CanvasConfig::default();
        let mut recorder = PathRecorder::new();
        draw_axes(&mut recorder, &config);
        // 2 axes + 25 ticks on x in [-12, 12] + 15 ticks on y in [-7, 7]
        assert_eq!(recorder.lines().count(), 2 + 25 + 15);
        assert!(recorder.lines().all(|(_, _, color)| *color == PlotColor::Black));
    }

    #[test]
    fn test_work_is_bounded_by_pixel_count() {
        // the smallest scale and step the settings accept
        let config = CanvasConfig::new(600, 350, MIN_SCALE, MIN_SCALE).unwrap();
        let mut recorder = PathRecorder::new();
        draw_axes(&mut recorder, &config);
        assert!(recorder.lines().count() <= 2 + 601 + 351);

        let settings = SamplerSettings {
            step: MIN_STEP,
            smoothness: CURVE_SMOOTHNESS,
        };
        assert!(settings.validate().is_ok());
        let range = domain_range(Axis::Y, &config);
        let points = sample(&curve("x", Axis::Y), range, settings.step, &config);
        assert!(points.len() <= 600 * 1000 + 1);

        let too_fine = SamplerSettings {
            step: 1e-6,
            smoothness: CURVE_SMOOTHNESS,
        };
        assert!(too_fine.validate().is_err());
    }
}
