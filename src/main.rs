use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use genv::{
    GenerateOptions,
    InquirePrompter,
    Outcome,
    SelectionMode,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "genv",
    version,
    about = "Generate environment files from configuration"
)]
struct Cli {
    /// Config file, or directory containing env.config.{json,yaml,yml,toml}
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Environment to write without any prompt (for CI)
    #[arg(long = "ci-tag", env = "GENV_CI_TAG", value_name = "TAG")]
    ci_tag: Option<String>,
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = <Cli as clap::Parser>::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(Outcome::Written { tag, path, mode }) => {
            let via = match mode {
                SelectionMode::Forced => " (forced tag)",
                SelectionMode::OnlyProfile => " (single configuration)",
                SelectionMode::Chosen => "",
            };
            println!(
                "✓ Environment '{}'{} written to {}",
                tag,
                via,
                path.display()
            );
            ExitCode::SUCCESS
        }
        Ok(Outcome::Cancelled) => {
            println!("Cancelled, nothing written.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Outcome> {
    let working_dir = std::env::current_dir().context("Failed to read working directory")?;
    let options = GenerateOptions {
        working_dir,
        config: cli.config,
        forced_tag: cli.ci_tag.filter(|t| !t.trim().is_empty()),
    };
    let outcome = genv::generate(&options, &mut InquirePrompter::new())?;
    Ok(outcome)
}
