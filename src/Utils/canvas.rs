/*
Drawing surface used by the curve renderer. The renderer only talks to the `Canvas` trait;
`PathRecorder` keeps everything drawn as a display list that can be inspected in tests
or replayed into a PNG/SVG file with plotters.
*/
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use strum_macros::{Display, EnumIter};

pub const DEFAULT_WIDTH: u32 = 600;
pub const DEFAULT_HEIGHT: u32 = 350;
pub const DEFAULT_SCALE: f64 = 25.0;
/// at least one pixel per unit, so the tick count never exceeds the pixel count
pub const MIN_SCALE: f64 = 1.0;
pub const MAX_DIMENSION: u32 = 10_000;

/// pixel size of the canvas and pixels per unit along each axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale_x: DEFAULT_SCALE,
            scale_y: DEFAULT_SCALE,
        }
    }
}

impl CanvasConfig {
    pub fn new(width: u32, height: u32, scale_x: f64, scale_y: f64) -> Result<Self, String> {
        let config = CanvasConfig {
            width,
            height,
            scale_x,
            scale_y,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(format!(
                "canvas size must not exceed {} pixels, got {}x{}",
                MAX_DIMENSION, self.width, self.height
            ));
        }
        if !(self.scale_x >= MIN_SCALE && self.scale_x.is_finite())
            || !(self.scale_y >= MIN_SCALE && self.scale_y.is_finite())
        {
            return Err(format!(
                "axis scales must be at least {} pixel per unit, got {} and {}",
                MIN_SCALE, self.scale_x, self.scale_y
            ));
        }
        Ok(())
    }

    /// horizontal pixel of a cartesian x
    pub fn to_screen_x(&self, x: f64) -> f64 {
        self.width as f64 / 2.0 + x * self.scale_x
    }

    /// vertical pixel of a cartesian y, rows grow downwards
    pub fn to_screen_y(&self, y: f64) -> f64 {
        self.height as f64 / 2.0 - y * self.scale_y
    }

    pub fn to_screen(&self, x: f64, y: f64) -> ScreenPoint {
        ScreenPoint::new(self.to_screen_x(x), self.to_screen_y(y))
    }

    /// visible x interval `[-w/(2 sx), w/(2 sx)]`
    pub fn x_range(&self) -> (f64, f64) {
        let min = -(self.width as f64) / (2.0 * self.scale_x);
        (min, -min)
    }

    /// visible y interval `[-h/(2 sy), h/(2 sy)]`
    pub fn y_range(&self) -> (f64, f64) {
        let min = -(self.height as f64) / (2.0 * self.scale_y);
        (min, -min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        ScreenPoint { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: &ScreenPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum PlotColor {
    Black,
    Red,
    Blue,
    Green,
    Purple,
}

impl PlotColor {
    const CURVE_CYCLE: [PlotColor; 4] = [
        PlotColor::Red,
        PlotColor::Blue,
        PlotColor::Green,
        PlotColor::Purple,
    ];

    /// colour of the n-th input row: red, blue, green, purple, red, ...
    pub fn for_row(row: usize) -> PlotColor {
        Self::CURVE_CYCLE[row % Self::CURVE_CYCLE.len()]
    }

    pub fn to_rgb(self) -> RGBColor {
        match self {
            PlotColor::Black => RGBColor(0, 0, 0),
            PlotColor::Red => RGBColor(255, 0, 0),
            PlotColor::Blue => RGBColor(0, 0, 255),
            PlotColor::Green => RGBColor(0, 128, 0),
            PlotColor::Purple => RGBColor(128, 0, 128),
        }
    }
}

/// The operations the renderer needs from a drawing surface.
pub trait Canvas {
    /// wipe everything drawn so far
    fn clear(&mut self);
    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, color: PlotColor);
    fn begin_path(&mut self, start: ScreenPoint);
    fn line_to(&mut self, to: ScreenPoint);
    fn quadratic_to(&mut self, control: ScreenPoint, to: ScreenPoint);
    fn bezier_to(&mut self, control1: ScreenPoint, control2: ScreenPoint, to: ScreenPoint);
    /// finish the current path with the given colour
    fn stroke(&mut self, color: PlotColor);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line(ScreenPoint),
    Quadratic(ScreenPoint, ScreenPoint),
    Cubic(ScreenPoint, ScreenPoint, ScreenPoint),
}

impl PathSegment {
    pub fn end(&self) -> ScreenPoint {
        match self {
            PathSegment::Line(end) => *end,
            PathSegment::Quadratic(_, end) => *end,
            PathSegment::Cubic(_, _, end) => *end,
        }
    }

    /// every point of the segment, controls included
    pub fn points(&self) -> Vec<ScreenPoint> {
        match self {
            PathSegment::Line(end) => vec![*end],
            PathSegment::Quadratic(control, end) => vec![*control, *end],
            PathSegment::Cubic(c1, c2, end) => vec![*c1, *c2, *end],
        }
    }

    /// `steps` points along the segment starting after `start`
    pub fn flatten(&self, start: ScreenPoint, steps: usize) -> Vec<ScreenPoint> {
        let steps = steps.max(1);
        match *self {
            PathSegment::Line(end) => vec![end],
            PathSegment::Quadratic(c, end) => (1..=steps)
                .map(|i| {
                    let t = i as f64 / steps as f64;
                    let u = 1.0 - t;
                    ScreenPoint::new(
                        u * u * start.x + 2.0 * u * t * c.x + t * t * end.x,
                        u * u * start.y + 2.0 * u * t * c.y + t * t * end.y,
                    )
                })
                .collect(),
            PathSegment::Cubic(c1, c2, end) => (1..=steps)
                .map(|i| {
                    let t = i as f64 / steps as f64;
                    let u = 1.0 - t;
                    let (b0, b1, b2, b3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
                    ScreenPoint::new(
                        b0 * start.x + b1 * c1.x + b2 * c2.x + b3 * end.x,
                        b0 * start.y + b1 * c1.y + b2 * c2.y + b3 * end.y,
                    )
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokedPath {
    pub start: ScreenPoint,
    pub segments: Vec<PathSegment>,
    pub color: PlotColor,
}

impl StrokedPath {
    /// polyline approximation of the path, `steps` points per curved segment
    pub fn flatten(&self, steps: usize) -> Vec<ScreenPoint> {
        let mut points = vec![self.start];
        let mut current = self.start;
        for segment in &self.segments {
            points.extend(segment.flatten(current, steps));
            current = segment.end();
        }
        points
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        color: PlotColor,
    },
    Path(StrokedPath),
}

/// Canvas that records every stroke as a display list.
#[derive(Debug, Clone, Default)]
pub struct PathRecorder {
    pub commands: Vec<DrawCommand>,
    open_path: Option<(ScreenPoint, Vec<PathSegment>)>,
}

impl PathRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> impl Iterator<Item = &StrokedPath> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Path(path) => Some(path),
            DrawCommand::Line { .. } => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (&ScreenPoint, &ScreenPoint, &PlotColor)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { from, to, color } => Some((from, to, color)),
            DrawCommand::Path(_) => None,
        })
    }

    fn push_segment(&mut self, segment: PathSegment) {
        if let Some((_, segments)) = self.open_path.as_mut() {
            segments.push(segment);
        }
    }

    /// replays the display list on any plotters drawing area
    pub fn draw_on<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), Box<dyn Error>>
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        for command in &self.commands {
            match command {
                DrawCommand::Line { from, to, color } => {
                    root.draw(&PathElement::new(
                        vec![to_pixel(from), to_pixel(to)],
                        color.to_rgb().stroke_width(1),
                    ))?;
                }
                DrawCommand::Path(path) => {
                    let pixels: Vec<(i32, i32)> =
                        path.flatten(8).iter().map(to_pixel).collect();
                    root.draw(&PathElement::new(pixels, path.color.to_rgb().stroke_width(2)))?;
                }
            }
        }
        root.present()?;
        Ok(())
    }

    pub fn save_png(&self, filename: &str, config: &CanvasConfig) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(filename, (config.width, config.height)).into_drawing_area();
        self.draw_on(&root)?;
        info!("canvas saved to {}", filename);
        Ok(())
    }

    pub fn save_svg(&self, filename: &str, config: &CanvasConfig) -> Result<(), Box<dyn Error>> {
        let root = SVGBackend::new(filename, (config.width, config.height)).into_drawing_area();
        self.draw_on(&root)?;
        info!("canvas saved to {}", filename);
        Ok(())
    }
}

fn to_pixel(point: &ScreenPoint) -> (i32, i32) {
    (point.x.round() as i32, point.y.round() as i32)
}

impl Canvas for PathRecorder {
    fn clear(&mut self) {
        self.commands.clear();
        self.open_path = None;
    }

    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, color: PlotColor) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn begin_path(&mut self, start: ScreenPoint) {
        self.open_path = Some((start, Vec::new()));
    }

    fn line_to(&mut self, to: ScreenPoint) {
        self.push_segment(PathSegment::Line(to));
    }

    fn quadratic_to(&mut self, control: ScreenPoint, to: ScreenPoint) {
        self.push_segment(PathSegment::Quadratic(control, to));
    }

    fn bezier_to(&mut self, control1: ScreenPoint, control2: ScreenPoint, to: ScreenPoint) {
        self.push_segment(PathSegment::Cubic(control1, control2, to));
    }

    fn stroke(&mut self, color: PlotColor) {
        if let Some((start, segments)) = self.open_path.take() {
            self.commands.push(DrawCommand::Path(StrokedPath {
                start,
                segments,
                color,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_transforms() {
        let config = CanvasConfig::default();
        assert_eq!(config.to_screen_x(0.0), 300.0);
        assert_eq!(config.to_screen_y(0.0), 175.0);
        assert_eq!(config.to_screen_x(2.0), 350.0);
        assert_eq!(config.to_screen_y(5.0), 50.0);
        assert_eq!(config.x_range(), (-12.0, 12.0));
        assert_eq!(config.y_range(), (-7.0, 7.0));
    }

    #[test]
    fn test_config_validation() {
        assert!(CanvasConfig::new(800, 600, 40.0, 40.0).is_ok());
        assert!(CanvasConfig::new(0, 600, 40.0, 40.0).is_err());
        assert!(CanvasConfig::new(800, 600, 0.0, 40.0).is_err());
        assert!(CanvasConfig::new(800, 600, 40.0, f64::NAN).is_err());
        // fewer than one pixel per unit or a huge canvas would make drawing unbounded
        assert!(CanvasConfig::new(600, 350, 0.01, 0.01).is_err());
        assert!(CanvasConfig::new(600, 350, 25.0, 1e-6).is_err());
        assert!(CanvasConfig::new(600, 350, MIN_SCALE, MIN_SCALE).is_ok());
        assert!(CanvasConfig::new(MAX_DIMENSION + 1, 350, 25.0, 25.0).is_err());
    }

    #[test]
    fn test_color_cycle() {
        assert_eq!(PlotColor::for_row(0), PlotColor::Red);
        assert_eq!(PlotColor::for_row(1), PlotColor::Blue);
        assert_eq!(PlotColor::for_row(2), PlotColor::Green);
        assert_eq!(PlotColor::for_row(3), PlotColor::Purple);
        assert_eq!(PlotColor::for_row(4), PlotColor::Red);
    }

    #[test]
    fn test_recorder_collects_paths() {
        let mut recorder = PathRecorder::new();
        recorder.draw_line(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(1.0, 0.0), PlotColor::Black);
        recorder.begin_path(ScreenPoint::new(0.0, 0.0));
        recorder.line_to(ScreenPoint::new(1.0, 1.0));
        recorder.stroke(PlotColor::Red);
        assert_eq!(recorder.lines().count(), 1);
        assert_eq!(recorder.paths().count(), 1);
        // stroke without an open path draws nothing
        recorder.stroke(PlotColor::Red);
        assert_eq!(recorder.paths().count(), 1);
        recorder.clear();
        assert!(recorder.commands.is_empty());
    }

    #[test]
    fn test_flatten_ends_on_segment_end() {
        let start = ScreenPoint::new(0.0, 0.0);
        let segment = PathSegment::Cubic(
            ScreenPoint::new(1.0, 2.0),
            ScreenPoint::new(3.0, 2.0),
            ScreenPoint::new(4.0, 0.0),
        );
        let points = segment.flatten(start, 4);
        assert_eq!(points.len(), 4);
        let last = points.last().unwrap();
        assert_relative_eq!(last.x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(last.y, 0.0, epsilon = 1e-12);
        // midpoint of the symmetric cubic
        assert_relative_eq!(points[1].x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(points[1].y, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_save_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.svg");
        let filename = path.to_str().unwrap();
        let mut recorder = PathRecorder::new();
        recorder.begin_path(ScreenPoint::new(10.0, 10.0));
        recorder.quadratic_to(ScreenPoint::new(20.0, 0.0), ScreenPoint::new(30.0, 10.0));
        recorder.stroke(PlotColor::Blue);
        recorder.save_svg(filename, &CanvasConfig::default()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
    }
}
