//! SMTP delivery.
//!
//! Messages go out over a plain connection with no TLS and no
//! authentication. Each send opens its own connection, and the transport
//! closes it whether the send succeeds or fails. There is no retry.

use super::email::EmailMessage;
use crate::error::ReportError;
use indicatif::{ProgressBar, ProgressStyle};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, info};

/// Port used when the server address has none.
pub const DEFAULT_SMTP_PORT: u16 = 25;

/// Where and how to deliver mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    /// Show a spinner while sending.
    pub show_progress: bool,
}

impl SmtpSettings {
    /// Parse `host`, `host:port`, or `[v6addr]:port`.
    pub fn from_address(address: &str, timeout: Duration) -> Result<Self, ReportError> {
        let address = address.trim();
        let invalid = |reason: &str| {
            ReportError::Config(format!("invalid SMTP server address {:?}: {}", address, reason))
        };

        let (host, port) = if let Some(rest) = address.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| invalid("unclosed '['"))?;
            match tail.strip_prefix(':') {
                Some(port) => (host, Some(port)),
                None if tail.is_empty() => (host, None),
                None => return Err(invalid("unexpected text after ']'")),
            }
        } else {
            match address.rsplit_once(':') {
                // Bare IPv6 addresses carry several colons and no port.
                Some((host, _)) if host.contains(':') => (address, None),
                Some((host, port)) => (host, Some(port)),
                None => (address, None),
            }
        };

        if host.is_empty() {
            return Err(invalid("missing host"));
        }

        let port = match port {
            Some(port) => port.parse::<u16>().map_err(|_| invalid("bad port"))?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            host: host.to_string(),
            port,
            timeout,
            show_progress: false,
        })
    }

    /// Enable or disable the progress spinner.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// `host:port` for messages.
    pub fn display_address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Send `message` through the SMTP server described by `settings`.
pub async fn send_message(
    message: &EmailMessage,
    settings: &SmtpSettings,
) -> Result<(), ReportError> {
    let server = settings.display_address();
    let mime = message.to_mime()?;

    let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.host.as_str())
        .port(settings.port)
        .timeout(Some(settings.timeout))
        .build();

    let spinner = settings.show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Sending report to {} via {}", message.recipient(), server));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    debug!("Connecting to SMTP server {}", server);
    let outcome = tokio::time::timeout(settings.timeout, transport.send(mime)).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match outcome {
        Ok(Ok(response)) => {
            info!(
                "SMTP server {} accepted the message ({})",
                server,
                response.code()
            );
            Ok(())
        }
        Ok(Err(err)) => Err(ReportError::Transport {
            server,
            reason: err.to_string(),
        }),
        Err(_) => Err(ReportError::Transport {
            server,
            reason: format!("timed out after {}s", settings.timeout.as_secs()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::email::{build_message, MessagePolicy};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_parse_host_only() {
        let settings = SmtpSettings::from_address("localhost", TIMEOUT).unwrap();
        assert_eq!(settings.host, "localhost");
        assert_eq!(settings.port, 25);
        assert!(!settings.show_progress);
    }

    #[test]
    fn test_parse_host_and_port() {
        let settings = SmtpSettings::from_address("mail.example.com:2525", TIMEOUT).unwrap();
        assert_eq!(settings.host, "mail.example.com");
        assert_eq!(settings.port, 2525);
        assert_eq!(settings.display_address(), "mail.example.com:2525");
    }

    #[test]
    fn test_parse_ipv6() {
        let bracketed = SmtpSettings::from_address("[::1]:587", TIMEOUT).unwrap();
        assert_eq!(bracketed.host, "::1");
        assert_eq!(bracketed.port, 587);
        assert_eq!(bracketed.display_address(), "[::1]:587");

        let bare = SmtpSettings::from_address("::1", TIMEOUT).unwrap();
        assert_eq!(bare.host, "::1");
        assert_eq!(bare.port, 25);
    }

    #[test]
    fn test_parse_rejects_bad_addresses() {
        assert!(SmtpSettings::from_address("", TIMEOUT).is_err());
        assert!(SmtpSettings::from_address(":25", TIMEOUT).is_err());
        assert!(SmtpSettings::from_address("host:port", TIMEOUT).is_err());
        assert!(SmtpSettings::from_address("host:70000", TIMEOUT).is_err());
        assert!(SmtpSettings::from_address("[::1", TIMEOUT).is_err());
    }

    fn test_message() -> EmailMessage {
        build_message(
            &MessagePolicy {
                sender: "automation@example.com".to_string(),
                recipient: "student@example.com".to_string(),
                subject: "test".to_string(),
                body: "body".to_string(),
            },
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // The listener accepts into its backlog but never sends a greeting.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let settings = SmtpSettings::from_address(
            &format!("127.0.0.1:{}", port),
            Duration::from_secs(1),
        )
        .unwrap();

        let started = std::time::Instant::now();
        let err = send_message(&test_message(), &settings).await.unwrap_err();

        match err {
            ReportError::Transport { reason, .. } => assert!(reason.contains("timed out")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(started.elapsed() < Duration::from_secs(5));
        drop(listener);
    }

    #[tokio::test]
    async fn test_send_to_closed_port_is_transport_error() {
        // Bind then drop a listener so the port is known to be closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let message = test_message();
        let settings =
            SmtpSettings::from_address(&format!("127.0.0.1:{}", port), TIMEOUT).unwrap();

        let err = send_message(&message, &settings).await.unwrap_err();
        assert!(matches!(err, ReportError::Transport { .. }));
    }
}
