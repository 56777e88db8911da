//! Error kinds surfaced by the report pipeline.
//!
//! Each stage returns [`ReportError`]; `main` maps the variant to a process
//! exit code so callers can tell input problems from delivery problems.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for configuration and usage errors.
pub const EXIT_CONFIG: i32 = 1;
/// Exit code for unreadable or malformed input data.
pub const EXIT_INPUT: i32 = 2;
/// Exit code for PDF rendering failures.
pub const EXIT_RENDER: i32 = 3;
/// Exit code for attachment failures.
pub const EXIT_ATTACHMENT: i32 = 4;
/// Exit code for SMTP connection or transmission failures.
pub const EXIT_TRANSPORT: i32 = 5;

/// Errors produced while loading, summarizing, rendering or mailing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A file could not be read or written.
    #[error("cannot access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content was not valid JSON, lacked an expected key, or held an unparseable price.
    #[error("invalid data in {origin}: {reason}")]
    Format { origin: String, reason: String },

    /// There were no records to summarize.
    #[error("no sales records to summarize")]
    EmptyInput,

    /// The PDF renderer failed (including missing fonts).
    #[error("failed to render PDF report: {0}")]
    Render(String),

    /// The attachment could not be read or its MIME type could not be inferred.
    #[error("cannot attach {}: {reason}", path.display())]
    Attachment { path: PathBuf, reason: String },

    /// A sender or recipient address did not parse.
    #[error("invalid email address {value:?}: {reason}")]
    Address { value: String, reason: String },

    /// Connecting to the SMTP server or transmitting the message failed.
    #[error("failed to send mail via {server}: {reason}")]
    Transport { server: String, reason: String },

    /// Invalid configuration or command-line usage.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ReportError {
    /// Process exit code for this error category.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::Io { .. }
            | ReportError::Format { .. }
            | ReportError::EmptyInput
            | ReportError::Address { .. } => EXIT_INPUT,
            ReportError::Render(_) => EXIT_RENDER,
            ReportError::Attachment { .. } => EXIT_ATTACHMENT,
            ReportError::Transport { .. } => EXIT_TRANSPORT,
            ReportError::Config(_) => EXIT_CONFIG,
        }
    }
}

/// Exit code for an arbitrary error chain, falling back to [`EXIT_CONFIG`].
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ReportError>())
        .map(ReportError::exit_code)
        .unwrap_or(EXIT_CONFIG)
}
