/*
Runs a task document: sets up logging, feeds the curves into a headless graphing session,
prints the parsed terms and the domain, and saves whatever outputs the document asks for.
*/
use crate::Utils::canvas::PathRecorder;
use crate::Utils::logger::{SampledCurve, init_logger, save_samples_to_csv};
use crate::Utils::plots::{domain_range, tabulate};
use crate::Utils::task_parser::TaskConfig;
use crate::numerical::boundary_solver::CurveRow;
use crate::session::{GraphSession, SessionOutput};
use crate::symbolic::term::{Axis, EquationError};
use crate::symbolic::term_parser::parse_equation_variants;
use log::info;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// one line of the printed term table
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct TermRow {
    row: usize,
    curve: String,
    branch: &'static str,
    term: String,
}

/// what a finished task produced
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
    pub output: SessionOutput,
    pub terms: Vec<TermRow>,
    pub curves_drawn: usize,
}

fn branch_name(index: usize) -> &'static str {
    if index == 0 { "+" } else { "-" }
}

/// every term of every non blank row, square root branches listed separately
pub fn term_table(rows: &[CurveRow]) -> Result<Vec<TermRow>, EquationError> {
    let mut table = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        if row.is_blank() {
            continue;
        }
        let variants = parse_equation_variants(&row.equation)?;
        for (branch_index, branch) in variants.branches().enumerate() {
            for term in branch {
                table.push(TermRow {
                    row: index + 1,
                    curve: format!("{} = {}", row.axis_tag.trim(), row.equation.trim()),
                    branch: branch_name(branch_index),
                    term: term.to_string(),
                });
            }
        }
    }
    Ok(table)
}

/// samples of every branch of every non blank row, in cartesian units
pub fn sample_rows(task: &TaskConfig) -> Result<Vec<SampledCurve>, EquationError> {
    let mut curves = Vec::new();
    for row in task.rows.iter().filter(|row| !row.is_blank()) {
        let axis = Axis::from_tag(&row.axis_tag)?;
        let range = domain_range(axis, &task.canvas);
        let variants = parse_equation_variants(&row.equation)?;
        for (branch_index, branch) in variants.branches().enumerate() {
            let mut label = format!("{}={}", row.axis_tag.trim(), row.equation.trim());
            if branch_index > 0 {
                label.push_str(" (negative root)");
            }
            curves.push(SampledCurve {
                label,
                samples: tabulate(branch, range, task.sampling.step),
            });
        }
    }
    Ok(curves)
}

/// runs an already parsed task; logging has to be set up by the caller
pub fn run_task_config(task: &TaskConfig) -> Result<TaskReport, String> {
    let mut session = GraphSession::with_settings(PathRecorder::new(), task.canvas, task.sampling)
        .map_err(|e| e.to_string())?;
    session.load_rows(&task.rows);
    let output = session.submit_curves().clone();
    let curves_drawn = session.canvas().paths().count();

    let terms = if output.error.is_none() {
        let terms = term_table(session.rows()).map_err(|e| e.to_string())?;
        let mut table = Table::new(&terms);
        table.with(Style::modern_rounded());
        println!("Parsed terms\n");
        println!("{}", table);
        terms
    } else {
        Vec::new()
    };

    match (&output.domain, &output.error) {
        (_, Some(error)) => println!("{}", error),
        (Some(domain), None) => println!("{}", domain),
        (None, None) => println!("the curves do not enclose a domain that can be described"),
    }

    if let Some(png) = &task.output.png {
        session
            .canvas()
            .save_png(png, session.config())
            .map_err(|e| format!("can not save {}: {}", png, e))?;
    }
    if let Some(svg) = &task.output.svg {
        session
            .canvas()
            .save_svg(svg, session.config())
            .map_err(|e| format!("can not save {}: {}", svg, e))?;
    }
    if let Some(csv) = &task.output.csv {
        if output.error.is_none() {
            let curves = sample_rows(task).map_err(|e| e.to_string())?;
            save_samples_to_csv(csv, &curves).map_err(|e| format!("can not save {}: {}", csv, e))?;
        }
    }
    info!("task finished, {} paths drawn", curves_drawn);
    Ok(TaskReport {
        output,
        terms,
        curves_drawn,
    })
}

/// reads a task document from `path` and runs it
pub fn run_task(path: &str) -> Result<TaskReport, String> {
    let task = TaskConfig::from_file(path)?;
    init_logger(task.output.loglevel.as_deref(), task.output.log_file)?;
    info!("task {} loaded with {} rows", path, task.rows.len());
    run_task_config(&task)
}
