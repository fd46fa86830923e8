/*
 * Taint Check CLI
 *
 * Runs the taint analysis over IR programs stored as JSON.
 *
 * Usage:
 *   taint-check program.json
 *   taint-check --catalog rules.yaml --preset thorough a.json b.json
 *
 * Output formats:
 *   --format text    Human-readable output (default)
 *   --format json    JSON output (for CI parsing)
 *   --format github  GitHub Actions annotations
 *
 * Exit codes:
 *   0  no diagnostics
 *   1  at least one diagnostic
 *   2  invalid input, catalog or settings
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use taintprobe_ir::config::{AnalysisConfig, CatalogConfig, Preset, UnknownPolicy};
use taintprobe_ir::features::taint_analysis::{
    Certainty, DefaultTaintAnalysisService, TaintAnalysisRequest, TaintAnalysisResponse,
    TaintAnalysisService, TaintCatalog,
};
use taintprobe_ir::shared::models::Program;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "taint-check", version, about = "Taint analysis over IR programs")]
struct Args {
    /// IR program files (JSON)
    #[arg(required = true)]
    programs: Vec<PathBuf>,

    /// User catalog (YAML) merged over the built-in catalog
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Analysis preset
    #[arg(short, long, default_value = "balanced", value_parser = Preset::parse)]
    preset: Preset,

    /// Treat operands of unknown taint as clean
    #[arg(long)]
    permissive: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also print analysis warnings
    #[arg(short, long)]
    warnings: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Github,
}

fn load_program(path: &Path) -> Result<Program, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("{}: {}", path.display(), e))
}

fn build_service(args: &Args) -> Result<DefaultTaintAnalysisService, String> {
    let mut base = AnalysisConfig::from_preset(args.preset);
    if args.permissive {
        base = base.unknown_policy(UnknownPolicy::Permissive);
    }
    match &args.catalog {
        Some(path) => {
            let user = CatalogConfig::from_yaml_file(path).map_err(|e| e.to_string())?;
            DefaultTaintAnalysisService::with_user_catalog(&user, &base).map_err(|e| e.to_string())
        }
        None => Ok(DefaultTaintAnalysisService::with_catalog(
            TaintCatalog::builtin(),
            base,
        )),
    }
}

fn print_text(path: &Path, response: &TaintAnalysisResponse, show_warnings: bool) {
    println!("{}", path.display());
    if response.diagnostics.is_empty() {
        println!("  no diagnostics");
    }
    for diagnostic in &response.diagnostics {
        let cwe = diagnostic
            .kind
            .cwe()
            .map(|id| format!(" (CWE-{})", id))
            .unwrap_or_default();
        println!("  {}{}", diagnostic, cwe);
    }
    if show_warnings {
        for warning in &response.warnings {
            println!("  warning: {}", warning);
        }
    }
    println!(
        "  {} definite, {} possible, {} functions analyzed, {} round(s)",
        response.definite_count(),
        response.possible_count(),
        response.stats.functions_analyzed,
        response.stats.rounds
    );
}

fn print_github(path: &Path, response: &TaintAnalysisResponse, show_warnings: bool) {
    let file = path.display();
    for diagnostic in &response.diagnostics {
        let level = match diagnostic.certainty {
            Certainty::Definite => "error",
            Certainty::Possible => "warning",
        };
        println!(
            "::{level} file={file},line={line},col={col}::{message}",
            level = level,
            file = file,
            line = diagnostic.span.start_line,
            col = diagnostic.span.start_col,
            message = diagnostic.message()
        );
    }
    if show_warnings {
        for warning in &response.warnings {
            println!(
                "::notice file={},line={}::{}",
                file, warning.span.start_line, warning.message
            );
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let service = match build_service(&args) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let mut requests = Vec::with_capacity(args.programs.len());
    for path in &args.programs {
        match load_program(path) {
            Ok(program) => requests.push(TaintAnalysisRequest::new(program)),
            Err(e) => {
                eprintln!("Error loading program {}", e);
                return ExitCode::from(2);
            }
        }
    }
    debug!(programs = requests.len(), preset = %args.preset, "Loaded programs");

    let results = service.analyze_batch(requests);

    let mut responses = Vec::with_capacity(results.len());
    for (path, result) in args.programs.iter().zip(results) {
        match result {
            Ok(response) => responses.push((path, response)),
            Err(e) => {
                eprintln!("Analysis error in {}: {}", path.display(), e);
                return ExitCode::from(2);
            }
        }
    }

    match args.format {
        OutputFormat::Json => {
            let output: Vec<_> = responses
                .iter()
                .map(|(path, response)| {
                    serde_json::json!({
                        "program": path.display().to_string(),
                        "run_id": response.run_id,
                        "diagnostics": response.diagnostics,
                        "warnings": response.warnings,
                        "stats": response.stats,
                    })
                })
                .collect();
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing results: {}", e);
                    return ExitCode::from(2);
                }
            }
        }
        OutputFormat::Github => {
            for (path, response) in &responses {
                print_github(path, response, args.warnings);
            }
        }
        OutputFormat::Text => {
            for (path, response) in &responses {
                print_text(path, response, args.warnings);
            }
        }
    }

    if responses.iter().any(|(_, r)| r.has_diagnostics()) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
