#![allow(non_snake_case)]

use crate::Utils::canvas::{CanvasConfig, PathRecorder};
use crate::Utils::logger::init_logger;
use crate::Utils::plots::SamplerSettings;
use crate::Utils::task_parser::TaskConfig;
use crate::Utils::task_runner::run_task_config;
use crate::numerical::boundary_solver::{
    CurveRow, given_bounds, integration_order, polynomial_coefficients, polynomial_roots,
    solve_domain,
};
use crate::session::GraphSession;
use crate::symbolic::term_eval::lambdify;
use crate::symbolic::term_parser::{parse_equation, parse_equation_variants, separate_terms};

#[allow(dead_code)]
pub fn domain_examples(example: usize) {
    if let Err(e) = init_logger(Some("info"), false) {
        println!("{}", e);
    }
    match example {
        0 => {
            // REGION BETWEEN A PARABOLA AND A LINE
            let mut session = GraphSession::new(PathRecorder::new());
            session.load_rows(&[CurveRow::new("y", "x^2"), CurveRow::new("y", "4")]);
            let output = session.submit_curves().clone();
            // D = {(x,y) | -2 <= x <= 2, x^2 <= y <= 4}
            println!("domain: {:?}, error: {:?}", output.domain, output.error);
            let config = *session.config();
            if let Err(e) = session.canvas().save_png("parabola_and_line.png", &config) {
                println!("can not save the plot: {}", e);
            }
        }
        1 => {
            // PARSE AND EVALUATE AN EQUATION
            let input = "2x^2+3sqrt(4x)-5";
            println!("terms of {}: {:?}", input, separate_terms(input));
            let terms = parse_equation(input).unwrap();
            for term in &terms {
                println!("{}", term);
            }
            let f = lambdify(&terms);
            println!("f(1) = {}, f(-1) = {}", f(1.0), f(-1.0));
            // square roots are drawn on both branches
            let variants = parse_equation_variants("sqrt(4y)").unwrap();
            for branch in variants.branches() {
                let g = lambdify(branch);
                println!("branch at y = 1: {}", g(1.0));
            }
        }
        2 => {
            // STEP BY STEP: ORDER, GIVEN BOUNDS, ROOTS AND DOMAIN
            let rows = vec![CurveRow::new("x", "sqrt(4y)"), CurveRow::new("x", "y")];
            let order = integration_order(&rows).unwrap();
            println!("order of integration: {}", order);
            let bounds = given_bounds(&rows, order);
            println!("inner bounds {:?}, outer bounds {:?}", bounds.inner, bounds.outer);
            match solve_domain(&bounds, order) {
                Ok(Some(domain)) => println!("{}", domain),
                Ok(None) => println!("no domain could be described"),
                Err(e) => println!("{}", e),
            }
            // roots of a polynomial pair
            let parsed = vec![parse_equation("x^2").unwrap(), parse_equation("x").unwrap()];
            let roots = polynomial_coefficients(&parsed).and_then(polynomial_roots);
            println!("x^2 = x at {:?}", roots);
        }
        3 => {
            // EXPLICIT OUTER BOUNDS AND A CUSTOM CANVAS
            let config = CanvasConfig::new(800, 600, 40.0, 40.0).unwrap();
            let settings = SamplerSettings {
                step: 0.05,
                smoothness: 0.5,
            };
            let mut session =
                GraphSession::with_settings(PathRecorder::new(), config, settings).unwrap();
            session.load_rows(&[
                CurveRow::new("y", "x"),
                CurveRow::new("y", "2x"),
                CurveRow::new("x", "3"),
                CurveRow::new("x", "1"),
            ]);
            let output = session.submit_curves().clone();
            // D = {(x,y) | 1 <= x <= 3, x <= y <= 2x}
            println!("{:?}", output);
            if let Err(e) = session.canvas().save_svg("wedge.svg", &config) {
                println!("can not save the plot: {}", e);
            }
        }
        4 => {
            // TASK DOCUMENT
            let input = r#"
            // the region between two parabolas
            canvas
            width: 600
            height: 350
            sampling
            step: 0.01
            curves
            y: x^2
            y: -x^2+2
            output
            csv: two_parabolas.csv
            "#;
            let task = TaskConfig::parse(input).unwrap();
            match run_task_config(&task) {
                Ok(report) => println!("{} paths drawn", report.curves_drawn),
                Err(e) => println!("{}", e),
            }
        }
        5 => {
            // MALFORMED INPUT
            let mut session = GraphSession::new(PathRecorder::new());
            session.load_rows(&[CurveRow::new("y", "x^2"), CurveRow::new("y", "4w")]);
            let output = session.submit_curves();
            // Error: Invalid equation entered. Please check formatting: 4w
            println!("{:?}", output.error);
        }
        _ => {
            println!("example {} does not exist", example);
        }
    }
}
