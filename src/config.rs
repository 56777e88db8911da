//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.sales-report.toml` files.

use crate::error::ReportError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".sales-report.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input data settings.
    #[serde(default)]
    pub input: InputConfig,

    /// How prices are written in the input data.
    #[serde(default)]
    pub price: PriceConfig,

    /// PDF report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Email composition settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// SMTP delivery settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
}

/// Input data settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the sales JSON file.
    #[serde(default = "default_input_path")]
    pub path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

fn default_input_path() -> String {
    "car_sales.json".to_string()
}

/// Price notation used by the input data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceConfig {
    /// Currency symbol surrounding the amount.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Decimal separator.
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,

    /// Digit grouping separator (empty for none).
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            decimal_separator: default_decimal_separator(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_decimal_separator() -> char {
    '.'
}

fn default_thousands_separator() -> String {
    ",".to_string()
}

/// PDF report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Where the PDF is written.
    #[serde(default = "default_output")]
    pub output: String,

    /// Document title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Directory holding the TrueType fonts used by the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts_dir: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            title: default_title(),
            fonts_dir: None,
        }
    }
}

fn default_output() -> String {
    "/tmp/cars.pdf".to_string()
}

fn default_title() -> String {
    "Vehicle Sales Report".to_string()
}

/// Email composition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Sender address.
    #[serde(default = "default_sender")]
    pub sender: String,

    /// Recipient address; `{user}` expands to the `USER` environment variable.
    #[serde(default = "default_recipient")]
    pub recipient: String,

    /// Subject line.
    #[serde(default = "default_subject")]
    pub subject: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sender: default_sender(),
            recipient: default_recipient(),
            subject: default_subject(),
        }
    }
}

fn default_sender() -> String {
    "automation@example.com".to_string()
}

fn default_recipient() -> String {
    "{user}@example.com".to_string()
}

fn default_subject() -> String {
    "Sales summary for last month".to_string()
}

/// SMTP delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Server address as `host` or `host:port`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Connection and command timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `explicit` if given, otherwise `fallback` if it exists, otherwise defaults.
    ///
    /// A file that exists but can't be read or parsed is an error in both cases.
    pub fn resolve(explicit: Option<&Path>, fallback: &Path) -> Result<Self, ReportError> {
        let path = match explicit {
            Some(path) => path,
            None if fallback.exists() => fallback,
            None => {
                debug!("No config file found, using defaults");
                return Ok(Config::default());
            }
        };

        info!("Loading config from: {}", path.display());
        Self::load(path).map_err(|e| ReportError::Config(format!("{:#}", e)))
    }

    /// Reject settings that can never produce a working run.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.smtp.timeout_seconds == 0 {
            return Err(ReportError::Config(
                "smtp.timeout_seconds must be at least 1".to_string(),
            ));
        }

        if self.price.currency_symbol.contains(self.price.decimal_separator) {
            return Err(ReportError::Config(format!(
                "price.currency_symbol {:?} contains the decimal separator",
                self.price.currency_symbol
            )));
        }

        if self.price.thousands_separator == self.price.decimal_separator.to_string() {
            return Err(ReportError::Config(
                "price.thousands_separator must differ from price.decimal_separator".to_string(),
            ));
        }

        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only values the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.input.path = input.display().to_string();
        }
        if let Some(ref output) = args.output {
            self.report.output = output.display().to_string();
        }
        if let Some(ref recipient) = args.recipient {
            self.email.recipient = recipient.clone();
        }
        if let Some(ref server) = args.server {
            self.smtp.server = Some(server.clone());
        }
        if let Some(timeout) = args.timeout {
            self.smtp.timeout_seconds = timeout;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.path, "car_sales.json");
        assert_eq!(config.report.output, "/tmp/cars.pdf");
        assert_eq!(config.report.title, "Vehicle Sales Report");
        assert_eq!(config.email.sender, "automation@example.com");
        assert_eq!(config.email.recipient, "{user}@example.com");
        assert_eq!(config.email.subject, "Sales summary for last month");
        assert_eq!(config.price.currency_symbol, "$");
        assert_eq!(config.smtp.server, None);
        assert_eq!(config.smtp.timeout_seconds, 30);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[input]
path = "data/sales.json"

[price]
currency_symbol = "€"
decimal_separator = ","
thousands_separator = "."

[email]
subject = "Monthly numbers"

[smtp]
server = "mail.example.com:2525"
timeout_seconds = 5
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.path, "data/sales.json");
        assert_eq!(config.price.currency_symbol, "€");
        assert_eq!(config.price.decimal_separator, ',');
        assert_eq!(config.price.thousands_separator, ".");
        assert_eq!(config.email.subject, "Monthly numbers");
        assert_eq!(config.email.sender, "automation@example.com");
        assert_eq!(config.smtp.server.as_deref(), Some("mail.example.com:2525"));
        assert_eq!(config.smtp.timeout_seconds, 5);
        assert_eq!(config.report.title, "Vehicle Sales Report");
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let args = Args {
            server: Some("localhost:2525".to_string()),
            input: Some(PathBuf::from("other.json")),
            output: None,
            config: None,
            recipient: Some("boss@example.com".to_string()),
            timeout: None,
            dry_run: false,
            verbose: false,
            quiet: false,
            init_config: false,
        };

        config.merge_with_args(&args);
        assert_eq!(config.input.path, "other.json");
        assert_eq!(config.report.output, "/tmp/cars.pdf");
        assert_eq!(config.email.recipient, "boss@example.com");
        assert_eq!(config.smtp.server.as_deref(), Some("localhost:2525"));
        assert_eq!(config.smtp.timeout_seconds, 30);
    }

    #[test]
    fn test_validate_rejects_zero_timeout_from_file() {
        let mut config: Config = toml::from_str("[smtp]\ntimeout_seconds = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ReportError::Config(_))));

        let args = Args {
            server: None,
            input: None,
            output: None,
            config: None,
            recipient: None,
            timeout: Some(10),
            dry_run: true,
            verbose: false,
            quiet: false,
            init_config: false,
        };
        config.merge_with_args(&args);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_clashing_separators() {
        let mut config = Config::default();
        config.price.thousands_separator = ".".to_string();
        assert!(matches!(config.validate(), Err(ReportError::Config(_))));

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_resolve_missing_fallback_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::resolve(None, &dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config.email.recipient, "{user}@example.com");
    }

    #[test]
    fn test_resolve_reads_fallback() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[email]\nrecipient = \"boss@example.com\"\n").unwrap();

        let config = Config::resolve(None, &path).unwrap();
        assert_eq!(config.email.recipient, "boss@example.com");
    }

    #[test]
    fn test_resolve_broken_fallback_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[email\nrecipient = ").unwrap();

        let err = Config::resolve(None, &path).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG);
    }

    #[test]
    fn test_resolve_missing_explicit_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let fallback = dir.path().join(DEFAULT_CONFIG_FILE);

        assert!(matches!(
            Config::resolve(Some(&missing), &fallback),
            Err(ReportError::Config(_))
        ));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[price]"));
        assert!(toml_str.contains("[email]"));
        assert!(toml_str.contains("[smtp]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.email.subject, "Sales summary for last month");
    }
}
