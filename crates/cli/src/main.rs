mod exit_code;
mod files;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use graphql_tag_linter::{find_lint_config, load_lint_config, LintConfig, Linter};

use crate::exit_code::ExitCode;
use crate::output::{FileReport, OutputFormat, Totals};

#[derive(Parser)]
#[command(name = "graphql-tag-lint")]
#[command(about = "Validate GraphQL in tagged template literals against a schema", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the lint configuration file (defaults to the nearest .graphql-tag-lint.yml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Fail when more than this many warnings are reported
    #[arg(long, value_name = "N")]
    max_warnings: Option<usize>,

    /// Files, directories or glob patterns to lint
    #[arg(value_name = "PATHS", default_value = ".")]
    paths: Vec<String>,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(&cli) {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::SetupError.into()
        }
    }
}

/// Initialize tracing on stderr, silent unless `RUST_LOG` is set.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<LintConfig> {
    if let Some(path) = explicit {
        return load_lint_config(path)
            .with_context(|| format!("Failed to load {}", path.display()));
    }

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    match find_lint_config(&cwd) {
        Some(path) => {
            load_lint_config(&path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => {
            tracing::debug!("No lint configuration found, using defaults");
            Ok(LintConfig::default())
        }
    }
}

/// Lint every requested file. Setup errors abort the run; a file that cannot
/// be read or parsed is reported and counted as an error.
fn run(cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    let files = files::collect_files(&cli.paths)?;
    tracing::debug!(files = files.len(), "Collected files");

    let linter = Linter::new(config);
    let mut reports = Vec::with_capacity(files.len());
    let mut failed_files = 0;

    for path in files {
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{} {}: {e}", "error:".red().bold(), path.display());
                failed_files += 1;
                continue;
            }
        };

        match linter.lint_source(&path, &source) {
            Ok(diagnostics) => reports.push(FileReport { path, diagnostics }),
            Err(e) if e.is_setup() => return Err(e.into()),
            Err(e) => {
                eprintln!("{} {e}", "error:".red().bold());
                failed_files += 1;
            }
        }
    }

    println!("{}", output::render(cli.format, &reports)?);

    let totals = Totals::count(&reports);
    Ok(ExitCode::from_counts(
        totals.errors + failed_files,
        totals.warnings,
        cli.max_warnings,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn paths_default_to_current_directory() {
        let cli = Cli::parse_from(["graphql-tag-lint"]);
        assert_eq!(cli.paths, vec!["."]);
        assert_eq!(cli.format, OutputFormat::Human);
        assert_eq!(cli.max_warnings, None);
    }

    #[test]
    fn parses_options() {
        let cli = Cli::parse_from([
            "graphql-tag-lint",
            "--config",
            "lint.yml",
            "--format",
            "json",
            "--max-warnings",
            "3",
            "src",
            "lib/**/*.ts",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("lint.yml")));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.max_warnings, Some(3));
        assert_eq!(cli.paths, vec!["src", "lib/**/*.ts"]);
    }

    #[test]
    fn runs_over_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(".graphql-tag-lint.yml");
        std::fs::write(
            &config,
            "rules:\n  graphql/template-strings:\n    - error\n    - schemaString: 'type Query { hello: String }'\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("ok.js"), "gql`{ hello }`;\n").unwrap();

        let cli = Cli::parse_from([
            "graphql-tag-lint".to_string(),
            "--config".to_string(),
            config.display().to_string(),
            dir.path().display().to_string(),
        ]);
        assert_eq!(run(&cli).unwrap(), ExitCode::Success);

        std::fs::write(dir.path().join("bad.js"), "gql`{ nope }`;\n").unwrap();
        assert_eq!(run(&cli).unwrap(), ExitCode::LintFailure);
    }

    #[test]
    fn broken_config_is_a_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(".graphql-tag-lint.yml");
        std::fs::write(&config, "rules:\n  graphql/not-a-rule: error\n").unwrap();

        let cli = Cli::parse_from([
            "graphql-tag-lint".to_string(),
            "--config".to_string(),
            config.display().to_string(),
            dir.path().display().to_string(),
        ]);
        assert!(run(&cli).is_err());
    }
}
