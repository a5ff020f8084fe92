use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use RustedDomain::Utils::canvas::{CanvasConfig, PathRecorder, PlotColor};
use RustedDomain::Utils::plots::{CURVE_SMOOTHNESS, DEFAULT_STEP, render, sample};
use RustedDomain::numerical::boundary_solver::{CurveRow, describe_domain};
use RustedDomain::symbolic::term::{Axis, ParsedCurve};
use RustedDomain::symbolic::term_parser::parse_equation;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse 2x^2+3sqrt(4x)-5sin(-2x)+1", |b| {
        b.iter(|| parse_equation(black_box("2x^2+3sqrt(4x)-5sin(-2x)+1")))
    });
}

fn bench_sample_and_render(c: &mut Criterion) {
    let config = CanvasConfig::default();
    let curve = ParsedCurve::new(parse_equation("x^2-3x+sqrt(x)").unwrap(), Axis::Y);
    c.bench_function("sample and render one curve", |b| {
        b.iter(|| {
            let points = sample(&curve, config.x_range(), DEFAULT_STEP, &config);
            let mut canvas = PathRecorder::new();
            render(&points, PlotColor::Red, &mut canvas, CURVE_SMOOTHNESS);
            canvas
        })
    });
}

fn bench_describe_domain(c: &mut Criterion) {
    let rows = vec![CurveRow::new("x", "sqrt(4y)"), CurveRow::new("x", "y")];
    c.bench_function("describe domain sqrt(4y) and y", |b| {
        b.iter(|| describe_domain(black_box(&rows)))
    });
}

criterion_group!(benches, bench_parse, bench_sample_and_render, bench_describe_domain);
criterion_main!(benches);
