//! Taint Propagation Benchmark
//!
//! Measures performance of:
//! - Interprocedural descent along call chains, per preset
//! - Branch joins in long straight-line functions
//! - Loop fixpoints
//! - Global table rounds
//!
//! Run with:
//! ```bash
//! cargo bench --bench propagation_benchmark
//! ```

#[path = "mod.rs"]
mod taint_common;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use taint_common::*;
use taintprobe_ir::config::{AnalysisConfig, Preset};
use taintprobe_ir::features::taint_analysis::{InterproceduralTaintAnalyzer, TaintCatalog};
use taintprobe_ir::shared::models::Program;

fn run(catalog: &TaintCatalog, config: &AnalysisConfig, program: &Program) -> usize {
    InterproceduralTaintAnalyzer::new(catalog, config)
        .analyze(program)
        .map(|report| report.diagnostics.len())
        .unwrap_or(0)
}

/// Call chains under each preset's depth limit
fn bench_call_chain_by_preset(c: &mut Criterion) {
    let mut group = c.benchmark_group("call_chain_preset_comparison");
    let catalog = TaintCatalog::builtin();

    for depth in [4, 16, 64] {
        let program = call_chain(depth);

        for preset in [Preset::Fast, Preset::Balanced, Preset::Thorough] {
            let config = AnalysisConfig::from_preset(preset);
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", preset), depth),
                &program,
                |b, program| b.iter(|| run(&catalog, &config, black_box(program))),
            );
        }
    }

    group.finish();
}

fn bench_branch_joins(c: &mut Criterion) {
    let mut group = c.benchmark_group("branch_joins");
    let catalog = TaintCatalog::builtin();
    let config = AnalysisConfig::default();

    for count in [10, 100, 500] {
        let program = branchy(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &program, |b, program| {
            b.iter(|| run(&catalog, &config, black_box(program)))
        });
    }

    group.finish();
}

fn bench_loop_fixpoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("loop_fixpoint");
    let catalog = TaintCatalog::builtin();
    let config = AnalysisConfig::from_preset(Preset::Thorough);

    for width in [2, 16, 64] {
        let program = shifting_loop(width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &program, |b, program| {
            b.iter(|| run(&catalog, &config, black_box(program)))
        });
    }

    group.finish();
}

fn bench_global_rounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("global_rounds");
    let catalog = TaintCatalog::builtin();
    let config = AnalysisConfig::default();

    for count in [8, 32, 128] {
        let program = global_web(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &program, |b, program| {
            b.iter(|| run(&catalog, &config, black_box(program)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_call_chain_by_preset,
    bench_branch_joins,
    bench_loop_fixpoint,
    bench_global_rounds
);
criterion_main!(benches);
