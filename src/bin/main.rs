//! Kilowatt CLI - render dashboard panel queries
//!
//! Usage:
//!   kilowatt render <panel> [--config <file>] [--output <format>] [--expand]
//!   kilowatt panels
//!   kilowatt validate [--config <file>]
//!
//! Examples:
//!   kilowatt render power
//!   kilowatt render heat --config house.toml --output verbose
//!   kilowatt render monthly --output json --expand

use clap::{Parser, Subcommand, ValueEnum};
use kilowatt::config::{Settings, SettingsError};
use kilowatt::panel::{targets, PanelKind, RawTarget};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kilowatt")]
#[command(about = "Kilowatt - time-aligned SQL for energy-monitoring dashboards")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the queries of a dashboard panel
    Render {
        /// Panel to render (see `kilowatt panels`)
        panel: PanelKind,

        /// Path to the device configuration (searched for if not specified)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,

        /// Resolve host time placeholders using [time_range] from the config
        #[arg(short, long)]
        expand: bool,
    },

    /// List the available panels
    Panels,

    /// Validate a device configuration
    Validate {
        /// Path to the device configuration (searched for if not specified)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Output SQL only, one statement per line
    Sql,
    /// Output SQL with refId comments
    Verbose,
    /// Output datasource targets as JSON
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            panel,
            config,
            output,
            expand,
        } => cmd_render(panel, config, output, expand),
        Commands::Panels => cmd_panels(),
        Commands::Validate { config } => cmd_validate(config),
    }
}

fn load_settings(config: Option<PathBuf>) -> Result<Settings, SettingsError> {
    let settings = match config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };
    settings.validate()?;
    Ok(settings)
}

/// Error type for rendering a panel.
#[derive(Debug, thiserror::Error)]
enum RenderError {
    #[error("Cannot expand placeholders: {0}")]
    Expand(SettingsError),

    #[error("Panel '{0}' has no queries for the configured devices")]
    NoTargets(PanelKind),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The text `render` prints for `panel`.
fn render_panel(
    panel: PanelKind,
    settings: &Settings,
    output: OutputFormat,
    expand: bool,
) -> Result<String, RenderError> {
    let range = if expand {
        Some(settings.time_range().map_err(RenderError::Expand)?)
    } else {
        None
    };

    let targets = targets(panel, &settings.devices);
    if targets.is_empty() {
        return Err(RenderError::NoTargets(panel));
    }

    let raw: Vec<RawTarget> = targets.iter().map(|t| t.to_raw(range.as_ref())).collect();
    let mut out = String::new();
    match output {
        OutputFormat::Sql => {
            for target in &raw {
                out.push_str(&target.raw_sql);
                out.push('\n');
            }
        }
        OutputFormat::Verbose => {
            out.push_str("-- Kilowatt Panel SQL\n");
            out.push_str(&format!("-- Panel: {}\n", panel));
            for target in &raw {
                out.push_str(&format!("\n-- refId: {} ({:?})\n", target.ref_id, target.format));
                out.push_str(&target.raw_sql);
                out.push('\n');
            }
        }
        OutputFormat::Json => {
            out.push_str(&serde_json::to_string_pretty(&raw)?);
            out.push('\n');
        }
    }
    Ok(out)
}

fn cmd_render(panel: PanelKind, config: Option<PathBuf>, output: OutputFormat, expand: bool) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match render_panel(panel, &settings, output, expand) {
        Ok(text) => {
            print!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_panels() -> ExitCode {
    println!("Panels:");
    for kind in PanelKind::ALL {
        println!("  - {:<10} {}", kind.name(), kind.description());
    }
    ExitCode::SUCCESS
}

fn cmd_validate(config: Option<PathBuf>) -> ExitCode {
    match load_settings(config) {
        Ok(settings) => {
            if settings.devices.is_empty() {
                eprintln!("Warning: no devices configured, every panel is empty");
            }
            for (key, ids) in settings.devices.families() {
                if !ids.is_empty() {
                    println!("  {}: {:?}", key, ids);
                }
            }
            println!("OK: configuration is valid");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            ExitCode::FAILURE
        }
    }
}
