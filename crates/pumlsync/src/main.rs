//! pumlsync CLI.
//!
//! Renders the `PlantUML` diagrams touched by a push to SVG and commits the
//! changed files back to the pushed branch. Runs as a GitHub Action step or
//! locally against a branch head.

mod error;
mod generate;
mod output;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use generate::GenerateArgs;
use output::Output;

/// Generate SVG files for `PlantUML` diagrams and commit them.
#[derive(Parser)]
#[command(name = "pumlsync", version, about)]
struct Cli {
    #[command(flatten)]
    args: GenerateArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.args.verbose))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.args.execute(&output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_logs_info() {
        assert_eq!(log_filter(true).to_string(), "info");
    }

    #[test]
    fn test_default_level_is_warn() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(log_filter(false).to_string(), "warn");
    }
}
