//! Command-line interface for retrack.

use std::path::PathBuf;

use clap::Parser;
use retrack_config::LogLevel;

/// retrack - re-style design-document text by weight and script
#[derive(Parser, Debug)]
#[command(name = "retrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Scene file (JSON) to re-style
    #[arg(value_name = "SCENE")]
    pub scene: PathBuf,

    /// Write the re-styled scene here instead of overwriting SCENE
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Do not adjust letter spacing
    #[arg(long)]
    pub no_tracking: bool,

    /// Skip text layers placed directly inside component instances
    #[arg(long)]
    pub exclude_instance_children: bool,

    /// Treat every font as installed instead of querying the system font database
    #[arg(long)]
    pub assume_fonts: bool,

    /// Only report whether the selection contains text
    #[arg(long)]
    pub check: bool,

    /// Config file to use instead of ~/.config/retrack/config.yaml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,
}

fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::from_name(s).ok_or_else(|| format!("unknown log level: {s}"))
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    pub scene: PathBuf,
    pub output: Option<PathBuf>,
    /// `Some(false)` when `--no-tracking` was given; otherwise the config decides
    pub apply_tracking: Option<bool>,
    pub exclude_instance_children: bool,
    pub assume_fonts: bool,
    pub check_only: bool,
    pub config_path: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
}

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        Self {
            scene: cli.scene,
            output: cli.output,
            apply_tracking: cli.no_tracking.then_some(false),
            exclude_instance_children: cli.exclude_instance_children,
            assume_fonts: cli.assume_fonts,
            check_only: cli.check,
            config_path: cli.config,
            log_level: cli.log_level,
        }
    }
}

/// Parse process arguments
pub fn process_cli() -> RuntimeOptions {
    Cli::parse().into()
}
