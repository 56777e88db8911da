//! Email composition.
//!
//! Builds the report email, optionally with the PDF attached, and converts it
//! to a MIME message with lettre.

use crate::error::ReportError;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sender, recipient and text of a message, used verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePolicy {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// A file attached to an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name shown to the recipient (the original base name).
    pub filename: String,
    /// Inferred MIME type, e.g. `application/pdf`.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// A composed email, ready to send once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    sender: String,
    recipient: String,
    subject: String,
    body: String,
    attachment: Option<Attachment>,
}

impl EmailMessage {
    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[allow(dead_code)] // Inspection accessor; the body is printed as the summary
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Convert to a MIME message: plain-text body, plus a `multipart/mixed`
    /// wrapper when an attachment is present.
    pub fn to_mime(&self) -> Result<Message, ReportError> {
        let builder = Message::builder()
            .from(parse_mailbox(&self.sender)?)
            .to(parse_mailbox(&self.recipient)?)
            .subject(self.subject.clone());

        let built = match &self.attachment {
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(self.body.clone()),
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type).map_err(|err| {
                    ReportError::Attachment {
                        path: PathBuf::from(&attachment.filename),
                        reason: format!("invalid MIME type {}: {}", attachment.content_type, err),
                    }
                })?;
                let part = MimeAttachment::new(attachment.filename.clone())
                    .body(attachment.bytes.clone(), content_type);

                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(self.body.clone()))
                        .singlepart(part),
                )
            }
        };

        built.map_err(|err| ReportError::Address {
            value: format!("{} -> {}", self.sender, self.recipient),
            reason: err.to_string(),
        })
    }
}

fn parse_mailbox(value: &str) -> Result<Mailbox, ReportError> {
    value.parse().map_err(|err: lettre::address::AddressError| ReportError::Address {
        value: value.to_string(),
        reason: err.to_string(),
    })
}

/// Compose an email from `policy`, attaching the file at `attachment_path` if given.
pub fn build_message(
    policy: &MessagePolicy,
    attachment_path: Option<&Path>,
) -> Result<EmailMessage, ReportError> {
    let attachment = attachment_path.map(load_attachment).transpose()?;

    Ok(EmailMessage {
        sender: policy.sender.clone(),
        recipient: policy.recipient.clone(),
        subject: policy.subject.clone(),
        body: policy.body.clone(),
        attachment,
    })
}

/// Read a file and infer its MIME type from the extension.
pub fn load_attachment(path: &Path) -> Result<Attachment, ReportError> {
    let failed = |reason: String| ReportError::Attachment {
        path: path.to_path_buf(),
        reason,
    };

    let mime = mime_guess::from_path(path)
        .first()
        .ok_or_else(|| failed("cannot determine MIME type from the file extension".to_string()))?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| failed("path has no file name".to_string()))?;

    let bytes = std::fs::read(path).map_err(|err| failed(err.to_string()))?;
    debug!("Attaching {} ({}, {} bytes)", filename, mime, bytes.len());

    Ok(Attachment {
        filename,
        content_type: mime.essence_str().to_string(),
        bytes,
    })
}

/// Expand `{user}` in a recipient template.
pub fn recipient_address(template: &str, user: Option<&str>) -> Result<String, ReportError> {
    if !template.contains("{user}") {
        return Ok(template.to_string());
    }

    match user.map(str::trim).filter(|u| !u.is_empty()) {
        Some(user) => Ok(template.replace("{user}", user)),
        None => Err(ReportError::Config(format!(
            "recipient template {:?} needs USER to be set; pass --recipient instead",
            template
        ))),
    }
}
