//! Report delivery by email.

pub mod email;
pub mod sender;

pub use email::{build_message, recipient_address, MessagePolicy};
pub use sender::{send_message, SmtpSettings};
