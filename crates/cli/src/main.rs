// netsite CLI - NMS/UDM site inventory comparison

mod compare;
mod decompose;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use netsite_recon::ReconError;
use tracing_subscriber::EnvFilter;

use exit_codes::{recon_exit_code, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "netsite")]
#[command(about = "Compare NMS and UDM site inventories")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare an NMS export against a UDM export
    #[command(after_help = "\
Examples:
  netsite compare nms.csv udm.csv
  netsite compare nms.csv udm.csv --config weekly.toml --output report.json
  netsite compare nms.csv udm.csv --format csv --status mismatch --output reports/
  cat nms.csv | netsite compare - udm.csv --format envelope")]
    Compare(compare::CompareArgs),

    /// Break site names into site code, place, city, province, region and technology
    #[command(after_help = "\
Examples:
  netsite decompose PANABODDN2ID
  netsite decompose TCAGMATINADDS2LT APOKON3LK --json")]
    Decompose {
        /// Site names to decompose
        #[arg(required = true)]
        names: Vec<String>,

        /// Geo dictionary TOML (defaults to the built-in Mindanao dictionary)
        #[arg(long)]
        dictionary: Option<PathBuf>,

        /// Output JSON to stdout instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate a comparison config without running
    #[command(after_help = "\
Examples:
  netsite validate weekly.toml")]
    Validate {
        /// Path to the config TOML
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  netsite-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  netsite-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

/// stderr subscriber; also receives `log` records from the library crates.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compare(args) => compare::cmd_compare(args),
        Commands::Decompose { names, dictionary, json } => {
            decompose::cmd_decompose(names, dictionary, json)
        }
        Commands::Validate { config } => compare::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Engine error with its registry exit code.
    pub fn recon(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::MissingKeyColumn { .. } => {
                Some("rename the header or list it under [columns] id in a --config file".to_string())
            }
            ReconError::Parse { .. } => {
                Some("each input needs a header row and at least one data row".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
