/**
 * glimmer-precompile
 *
 * Compiles Handlebars templates to the Glimmer wire format
 */
use std::io;
use std::process;

use clap::Parser;
use glimmer_compiler_cli::config::CommandLine;
use glimmer_compiler_cli::perform_precompile::{emit, perform_precompile, resolve_inputs};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = CommandLine::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())))
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("Error: {error:#}");
            process::exit(2);
        }
    }
}

/// `Ok(false)` when any template had a syntax error.
fn run(cli: &CommandLine) -> anyhow::Result<bool> {
    let config = cli.resolve()?;
    let inputs = resolve_inputs(&config.include)?;
    if inputs.is_empty() {
        anyhow::bail!("no input templates");
    }

    let result = perform_precompile(&inputs, &config)?;
    for diagnostic in &result.diagnostics {
        eprintln!("{diagnostic}\n");
    }
    emit(&result, &config, &mut io::stdout().lock())?;
    Ok(!result.has_errors())
}
