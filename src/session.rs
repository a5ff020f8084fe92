//! headless version of the graphing page: the rows typed by the user, the canvas and the
//! actions (submit, clear, add/remove row, change dimensions) that run the whole
//! parse -> sample -> render -> solve pipeline synchronously
use crate::Utils::canvas::{Canvas, CanvasConfig, PlotColor};
use crate::Utils::plots::{SamplerSettings, domain_range, draw_axes, render, sample};
use crate::numerical::boundary_solver::{CurveRow, describe_domain};
use crate::symbolic::term::{Axis, EquationError, ParsedCurve};
use crate::symbolic::term_parser::parse_equation_variants;
use log::{info, warn};
use thiserror::Error;

/// rows shown on an empty page
pub const INITIAL_ROWS: usize = 2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("at least 3 rows are needed to remove one, found {0}")]
    TooFewRows(usize),
    #[error("row {index} does not exist, there are {len} rows")]
    RowOutOfRange { index: usize, len: usize },
    #[error("invalid canvas dimensions: {0}")]
    InvalidDimensions(String),
    #[error("invalid sampler settings: {0}")]
    InvalidSettings(String),
}

/// messages shown under the canvas
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionOutput {
    pub domain: Option<String>,
    pub error: Option<String>,
}

pub struct GraphSession<C: Canvas> {
    rows: Vec<CurveRow>,
    config: CanvasConfig,
    settings: SamplerSettings,
    canvas: C,
    output: SessionOutput,
}

impl<C: Canvas> GraphSession<C> {
    pub fn new(canvas: C) -> Self {
        let mut session = GraphSession {
            rows: vec![CurveRow::default(); INITIAL_ROWS],
            config: CanvasConfig::default(),
            settings: SamplerSettings::default(),
            canvas,
            output: SessionOutput::default(),
        };
        session.reset_axes();
        session
    }

    pub fn with_settings(
        canvas: C,
        config: CanvasConfig,
        settings: SamplerSettings,
    ) -> Result<Self, SessionError> {
        settings.validate().map_err(SessionError::InvalidSettings)?;
        let mut session = Self::new(canvas);
        session.settings = settings;
        session.apply_custom_dimensions(config)?;
        Ok(session)
    }

    pub fn rows(&self) -> &[CurveRow] {
        &self.rows
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn output(&self) -> &SessionOutput {
        &self.output
    }

    /// fills the text boxes of a row
    pub fn set_row(&mut self, index: usize, axis_tag: &str, equation: &str) -> Result<(), SessionError> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(SessionError::RowOutOfRange { index, len })?;
        *row = CurveRow::new(axis_tag, equation);
        Ok(())
    }

    /// appends rows after the existing ones, adding empty rows as needed
    pub fn load_rows(&mut self, rows: &[CurveRow]) {
        for (index, row) in rows.iter().enumerate() {
            if index >= self.rows.len() {
                self.rows.push(CurveRow::default());
            }
            self.rows[index] = row.clone();
        }
    }

    /// clears the canvas and the messages and draws the axes
    fn reset_axes(&mut self) {
        self.canvas.clear();
        self.output = SessionOutput::default();
        draw_axes(&mut self.canvas, &self.config);
    }

    fn report_error(&mut self, error: EquationError) {
        warn!("{}", error);
        self.reset_axes();
        self.output.error = Some(format!("Error: {}", error));
    }

    /// draws every non blank row, both square root branches included
    fn render_curves(&mut self) -> Result<usize, EquationError> {
        let mut drawn = 0;
        for (index, row) in self.rows.iter().enumerate() {
            if row.is_blank() {
                continue;
            }
            let variants = parse_equation_variants(&row.equation)?;
            let axis = Axis::from_tag(&row.axis_tag)?;
            let range = domain_range(axis, &self.config);
            for branch in variants.branches() {
                let curve = ParsedCurve::new(branch.clone(), axis);
                let points = sample(&curve, range, self.settings.step, &self.config);
                render(&points, PlotColor::for_row(index), &mut self.canvas, self.settings.smoothness);
            }
            drawn += 1;
        }
        Ok(drawn)
    }

    /// plots every row and prints the domain when the rows enclose one
    pub fn submit_curves(&mut self) -> &SessionOutput {
        self.reset_axes();
        match self.render_curves() {
            Ok(drawn) => info!("{} curves drawn", drawn),
            Err(error) => {
                self.report_error(error);
                return &self.output;
            }
        }
        match describe_domain(&self.rows) {
            Ok(domain) => self.output.domain = domain.map(|domain| domain.to_string()),
            Err(error) => self.report_error(error),
        }
        &self.output
    }

    /// clears the canvas, the messages and every row, keeping the first two rows
    pub fn clear_all(&mut self) {
        self.reset_axes();
        self.rows = vec![CurveRow::default(); INITIAL_ROWS];
    }

    pub fn add_row(&mut self) {
        self.rows.push(CurveRow::default());
    }

    /// removes the last row and redraws; refused when fewer than 3 rows are left
    pub fn remove_row(&mut self) -> Result<&SessionOutput, SessionError> {
        if self.rows.len() < 3 {
            return Err(SessionError::TooFewRows(self.rows.len()));
        }
        self.rows.pop();
        Ok(self.submit_curves())
    }

    pub fn apply_custom_dimensions(&mut self, config: CanvasConfig) -> Result<(), SessionError> {
        config.validate().map_err(SessionError::InvalidDimensions)?;
        self.config = config;
        self.reset_axes();
        Ok(())
    }

    pub fn restore_default_dimensions(&mut self) {
        self.config = CanvasConfig::default();
        self.reset_axes();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Utils::canvas::PathRecorder;

    fn session_with(rows: &[(&str, &str)]) -> GraphSession<PathRecorder> {
        let mut session = GraphSession::new(PathRecorder::new());
        let rows: Vec<CurveRow> = rows.iter().map(|(tag, eq)| CurveRow::new(tag, eq)).collect();
        session.load_rows(&rows);
        session
    }

    #[test]
    fn test_new_session_draws_axes_only() {
        let session = GraphSession::new(PathRecorder::new());
        assert_eq!(session.rows().len(), INITIAL_ROWS);
        assert!(session.canvas().lines().count() > 0);
        assert_eq!(session.canvas().paths().count(), 0);
        assert_eq!(session.output(), &SessionOutput::default());
    }

    #[test]
    fn test_submit_plots_and_describes_domain() {
        let mut session = session_with(&[("y", "x^2"), ("y", "4")]);
        let output = session.submit_curves().clone();
        assert_eq!(
            output.domain.as_deref(),
            Some("D = {(x,y) | -2 <= x <= 2, x^2 <= y <= 4}")
        );
        assert_eq!(output.error, None);
        let colors: Vec<PlotColor> = session.canvas().paths().map(|p| p.color).collect();
        assert_eq!(colors, vec![PlotColor::Red, PlotColor::Blue]);
    }

    #[test]
    fn test_square_root_draws_both_branches() {
        let mut session = session_with(&[("x", "sqrt(4y)"), ("x", "y")]);
        let output = session.submit_curves().clone();
        assert!(output.domain.is_some());
        // two branches of the root plus the line
        assert_eq!(session.canvas().paths().count(), 3);
    }

    #[test]
    fn test_invalid_equation_clears_canvas_and_reports() {
        let mut session = session_with(&[("y", "x^2"), ("y", "4w")]);
        let output = session.submit_curves().clone();
        assert_eq!(
            output.error.as_deref(),
            Some("Error: Invalid equation entered. Please check formatting: 4w")
        );
        assert_eq!(output.domain, None);
        assert_eq!(session.canvas().paths().count(), 0);
        assert!(session.canvas().lines().count() > 0);
    }

    #[test]
    fn test_invalid_axis_tag_is_reported() {
        let mut session = session_with(&[("z", "x^2")]);
        let output = session.submit_curves().clone();
        assert_eq!(
            output.error.as_deref(),
            Some("Error: Invalid equation entered. Please check formatting: z")
        );
    }

    #[test]
    fn test_undefined_values_do_not_abort() {
        let mut session = session_with(&[("y", "log(x)"), ("y", "sqrt(x)")]);
        let output = session.submit_curves().clone();
        assert_eq!(output.error, None);
        assert_eq!(output.domain, None);
        assert!(session.canvas().paths().count() >= 3);
    }

    #[test]
    fn test_clear_all_is_idempotent() {
        let mut session = session_with(&[("y", "x^2"), ("y", "4"), ("x", "1")]);
        session.submit_curves();
        session.clear_all();
        let rows_once = session.rows().to_vec();
        let canvas_once = session.canvas().commands.clone();
        let output_once = session.output().clone();
        session.clear_all();
        assert_eq!(session.rows(), rows_once.as_slice());
        assert_eq!(session.canvas().commands, canvas_once);
        assert_eq!(session.output(), &output_once);
        assert_eq!(session.rows().len(), INITIAL_ROWS);
        assert!(session.rows().iter().all(CurveRow::is_blank));
    }

    #[test]
    fn test_add_and_remove_rows() {
        let mut session = GraphSession::new(PathRecorder::new());
        assert_eq!(session.remove_row(), Err(SessionError::TooFewRows(2)));
        session.add_row();
        session.set_row(0, "y", "x").unwrap();
        session.set_row(2, "x", "3").unwrap();
        assert_eq!(
            session.set_row(3, "x", "3"),
            Err(SessionError::RowOutOfRange { index: 3, len: 3 })
        );
        let output = session.remove_row().unwrap().clone();
        assert_eq!(output.error, None);
        assert_eq!(session.rows().len(), 2);
        assert_eq!(session.canvas().paths().count(), 1);
    }

    #[test]
    fn test_dimensions() {
        let mut session = GraphSession::new(PathRecorder::new());
        let bad = CanvasConfig {
            width: 0,
            ..CanvasConfig::default()
        };
        assert!(matches!(
            session.apply_custom_dimensions(bad),
            Err(SessionError::InvalidDimensions(_))
        ));
        assert_eq!(session.config(), &CanvasConfig::default());
        let tiny_scale = CanvasConfig {
            scale_x: 0.01,
            scale_y: 0.01,
            ..CanvasConfig::default()
        };
        assert!(matches!(
            session.apply_custom_dimensions(tiny_scale),
            Err(SessionError::InvalidDimensions(_))
        ));
        assert_eq!(session.config(), &CanvasConfig::default());
        let custom = CanvasConfig::new(800, 600, 40.0, 20.0).unwrap();
        session.apply_custom_dimensions(custom).unwrap();
        assert_eq!(session.config(), &custom);
        session.restore_default_dimensions();
        assert_eq!(session.config(), &CanvasConfig::default());
    }

    #[test]
    fn test_with_settings_validates() {
        let settings = SamplerSettings {
            step: 0.0,
            smoothness: 0.5,
        };
        let result = GraphSession::with_settings(PathRecorder::new(), CanvasConfig::default(), settings);
        assert!(matches!(result, Err(SessionError::InvalidSettings(_))));
    }
}
