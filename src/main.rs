//! Command-line front end for SMCL.
use std::{fs, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use smcl::{
    display_error,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    printer::printer::print_program,
    type_checker::{
        type_checker::{type_check, AnalyzerOptions},
        typed_ast::TypedProgram,
    },
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Checks an SMCL program: lexing, parsing and semantic analysis.
///
/// Logging can be controlled with an EnvFilter via the `SMCL_LOG` environment
/// variable.
#[derive(Debug, Parser)]
#[command(name = "smcl", version, about)]
struct Cli {
    /// The SMCL source file to check.
    input: PathBuf,
    /// Write the output here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Only accept string expressions in display(...).
    #[arg(long)]
    strict_display: bool,
    /// What to emit once the program checks.
    #[arg(long, value_enum, default_value_t = Emit::Check)]
    emit: Emit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Nothing besides a confirmation.
    Check,
    /// The program as canonical SMCL source.
    Source,
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing().context("tracing initialization")?;

    let cli = Cli::parse();
    let contents = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let file_name = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.input.display().to_string());

    let options = AnalyzerOptions {
        strict_display: cli.strict_display,
    };

    let program = match run_front_end(&contents, &file_name, options) {
        Ok(program) => program,
        Err(error) => {
            eprint!("{}", display_error(&error, &contents, &file_name));
            return Ok(ExitCode::FAILURE);
        }
    };

    let output = match cli.emit {
        Emit::Check => format!(
            "{}: ok ({} clients, server {})\n",
            file_name,
            program.clients.len(),
            program.server.name
        ),
        Emit::Source => print_program(&program),
    };

    match &cli.output {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", output),
    }

    Ok(ExitCode::SUCCESS)
}

fn run_front_end(contents: &str, file_name: &str, options: AnalyzerOptions) -> Result<TypedProgram, Error> {
    let start = Instant::now();

    let tokens = tokenize(contents.to_string(), Some(file_name.to_string()))?;
    info!(tokens = tokens.len(), elapsed = ?start.elapsed(), "tokenized");

    let parse_start = Instant::now();
    let program = parse(tokens, Rc::new(file_name.to_string()))?;
    info!(elapsed = ?parse_start.elapsed(), "parsed");

    let check_start = Instant::now();
    let typed = type_check(&program, options)?;
    info!(elapsed = ?check_start.elapsed(), "type checked");

    info!(elapsed = ?start.elapsed(), "front end finished");
    Ok(typed)
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::builder()
        .with_env_var("SMCL_LOG")
        .with_default_directive("smcl=warn".parse()?)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
