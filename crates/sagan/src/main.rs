//! Sagan
//!
//! Decodes the DNS buffers (`abuf`/`qbuf`) carried in RIPE Atlas
//! measurement results, either one buffer at a time or whole results read
//! as JSON lines.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use sagan_config::Config;
use sagan_metrics::metrics;
use sagan_metrics::tracing_setup::{LogConfig, init_tracing};
use sagan_proto::DecodeOptions;
use sagan_result::Action;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::{debug, info};

mod commands;
mod render;

use commands::Summary;
use render::OutputFormat;

/// Sagan - decode DNS buffers from RIPE Atlas measurements
#[derive(Parser, Debug)]
#[command(name = "sagan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, value_name = "FILE", env = "SAGAN_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Quiet mode (only errors, no summary)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode base64 buffers given as arguments, or one per line on stdin
    Decode {
        /// Buffers to decode
        #[arg(value_name = "BUF")]
        buffers: Vec<String>,

        /// Only decode the header
        #[arg(long)]
        header_only: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Parse DNS measurement results, one JSON document per line
    Parse {
        /// Input file (stdin when absent or "-")
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Stop at the first error or malformation
        #[arg(long)]
        strict: bool,

        /// Rebuild messages from the legacy result fields instead of decoding buffers
        #[arg(long)]
        no_parse_buf: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Validate configuration file
    Validate {
        /// Show the loaded configuration
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show version information
    Version,
}

/// Standard configuration locations, in search order.
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("./sagan.yaml"),
        PathBuf::from("./sagan.yml"),
        PathBuf::from("./sagan.toml"),
        PathBuf::from("./sagan.json"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("sagan/config.yaml"));
        paths.push(dir.join("sagan/config.toml"));
    }
    paths
}

/// Loads the explicit configuration file, or the first one found.
fn load_config(explicit: Option<&PathBuf>) -> Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let config = Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        return Ok((config, Some(path.clone())));
    }
    Config::discover(config_search_paths()).context("Failed to load configuration")
}

/// Initialize logging/tracing subsystem
fn init_logging(config: &Config, cli_level: Option<&str>, quiet: bool) -> Result<()> {
    let level = cli_level.unwrap_or(&config.logging.level);
    let mut log_config = LogConfig::from_names(level, &config.logging.format, config.logging.span_events);
    if quiet {
        log_config = log_config.quiet();
    }
    init_tracing(&log_config).context("Failed to initialize logging")
}

fn validate_config(explicit: Option<&PathBuf>, verbose: bool) -> Result<()> {
    let (config, path) = load_config(explicit)?;

    match &path {
        Some(path) => println!("Validating configuration: {}", path.display()),
        None => println!("No configuration file found, validating defaults"),
    }

    if verbose {
        println!("\n{}", style("Configuration loaded:").green().bold());
        println!("  Log level: {}", config.logging.level);
        println!("  Log format: {}", config.logging.format);
        println!("  On error: {}", config.results.on_error);
        println!("  On malformation: {}", config.results.on_malformation);
        println!("  Decode buffers: {}", config.results.parse_buf);
        let decode = config.decode;
        let sections = [
            ("header", decode.header),
            ("questions", decode.questions),
            ("answers", decode.answers),
            ("authorities", decode.authorities),
            ("additionals", decode.additionals),
            ("edns0", decode.edns0),
        ];
        let enabled: Vec<_> = sections.iter().filter(|(_, on)| *on).map(|(name, _)| *name).collect();
        println!("  Sections: {}", enabled.join(", "));
    }

    config.validate().context("Configuration validation failed")?;

    println!("{}", style("Configuration is valid!").green().bold());
    Ok(())
}

fn print_version() {
    println!(
        "{} {}",
        style(env!("CARGO_PKG_NAME")).cyan().bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
    );
}

fn open_input(file: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn print_summary(summary: Summary, quiet: bool) {
    if quiet {
        return;
    }
    let totals = metrics().snapshot();
    eprintln!(
        "{} {} read, {} flagged, {} skipped; {} buffers decoded, {} malformed",
        style("Done:").green().bold(),
        summary.total,
        summary.flagged,
        summary.skipped,
        totals.buffers,
        totals.malformed
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }

    if let Commands::Validate { verbose } = cli.command {
        return validate_config(cli.config.as_ref(), verbose);
    }

    let (config, path) = load_config(cli.config.as_ref())?;
    config.validate().context("Invalid configuration")?;
    init_logging(&config, cli.log_level.as_deref(), cli.quiet)?;

    match &path {
        Some(path) => info!(path = %path.display(), "Loaded configuration"),
        None => debug!("No configuration file found, using defaults"),
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = match cli.command {
        Commands::Decode {
            buffers,
            header_only,
            format,
        } => {
            let buffers = if buffers.is_empty() {
                io::stdin()
                    .lock()
                    .lines()
                    .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
                    .collect::<io::Result<Vec<_>>>()
                    .context("Failed to read buffers from stdin")?
            } else {
                buffers
            };
            let options = if header_only {
                DecodeOptions::HEADER_ONLY
            } else {
                config.decode
            };
            commands::decode_buffers(&mut out, &buffers, options, format)?
        }
        Commands::Parse {
            file,
            strict,
            no_parse_buf,
            format,
        } => {
            let mut options = config.parse_options();
            if strict {
                options.on_error = Action::Fail;
                options.on_malformation = Action::Fail;
            }
            if no_parse_buf {
                options.parse_buf = false;
            }
            let input = open_input(file.as_ref())?;
            commands::parse_results(input, &mut out, options, format)?
        }
        Commands::Validate { .. } | Commands::Version => return Ok(()),
    };

    out.flush()?;
    print_summary(summary, cli.quiet);
    Ok(())
}
