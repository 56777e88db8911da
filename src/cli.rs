//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// sales-report - car sales summary mailer
///
/// Reads car sales records from JSON, summarizes them, renders a PDF
/// report and emails it over plain SMTP.
///
/// Examples:
///   sales-report localhost
///   sales-report mail.example.com:2525 --input data/car_sales.json
///   sales-report --dry-run --output report.pdf
///   sales-report --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// SMTP server address (host or host:port)
    ///
    /// Not required with --dry-run or --init-config.
    #[arg(
        value_name = "SERVER",
        env = "SALES_REPORT_SMTP_SERVER",
        required_unless_present_any = ["dry_run", "init_config"]
    )]
    pub server: Option<String>,

    /// Sales data file (JSON array of records)
    ///
    /// Defaults to car_sales.json or the value in .sales-report.toml.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output path for the PDF report
    ///
    /// Defaults to /tmp/cars.pdf or the value in .sales-report.toml.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .sales-report.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Recipient address (overrides the configured template)
    #[arg(short, long, value_name = "ADDR")]
    pub recipient: Option<String>,

    /// SMTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Summarize and render the report without sending email
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .sales-report.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    ///
    /// Usage errors exit with the configuration exit code; `--help` and
    /// `--version` exit successfully.
    pub fn parse_args() -> Self {
        Self::try_parse().unwrap_or_else(|err| {
            if err.use_stderr() {
                let _ = err.print();
                std::process::exit(crate::error::EXIT_CONFIG);
            }
            err.exit()
        })
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref server) = self.server {
            if server.trim().is_empty() {
                return Err("SMTP server address must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
