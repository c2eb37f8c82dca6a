mod commands;
mod exit_code;
mod input;
mod progress;

use clap::{Parser, Subcommand};
use colored::Colorize;
use exit_code::ExitCode;
use input::InputArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "graphql-coordinates")]
#[command(about = "Extract the schema coordinates GraphQL documents reference", long_about = None)]
#[command(version)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Path to GraphQL config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Project name (for multi-project configs)
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except results and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show progress indicators (spinners)
    pub show_progress: bool,
    /// Whether to show informational output (summaries, headers)
    pub show_info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the schema coordinates referenced by documents
    ///
    /// Every `Type.field` selected by an operation or fragment is listed, plus
    /// the bare name of each input type used by operation variables. Fields
    /// missing from the schema are still listed.
    Extract {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// List coordinates per document instead of one merged set
        #[arg(long)]
        per_file: bool,
    },

    /// Count how many documents reference each schema coordinate
    Usage {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
}

fn main() {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    let output_opts = OutputOptions {
        show_progress: !cli.quiet,
        show_info: !cli.quiet,
    };

    let config = cli.config.as_deref();
    let project = cli.project.as_deref();

    let result = match cli.command {
        Commands::Extract {
            input,
            format,
            per_file,
        } => commands::extract::run(&input, config, project, format, per_file, output_opts),
        Commands::Usage { input, format } => {
            commands::usage::run(&input, config, project, format, output_opts)
        }
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            let code = ExitCode::for_error(&e);
            tracing::debug!(%code, "Command failed");
            eprintln!("{} {e:#}", "error:".red().bold());
            code
        }
    };

    if code != ExitCode::Success {
        code.exit();
    }
}

/// Initialize tracing from `RUST_LOG`, writing to stderr so stdout stays parseable
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set to any value, disable colors)
/// 4. `CLICOLOR_FORCE` environment variable (if set to non-zero, force colors)
/// 5. `CLICOLOR` environment variable (if set to "0", disable colors)
/// 6. Default: colors enabled if stdout is a TTY (handled by `colored` crate)
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color || std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if std::env::var("CLICOLOR").is_ok_and(|val| val == "0") {
        control::set_override(false);
    }
}
