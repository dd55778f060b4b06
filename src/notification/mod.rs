mod email;
mod transport;

use std::{convert::Infallible, str::FromStr};

use log::warn;

pub use email::{compose_message, encode_subject, SmtpSender};
pub use transport::{LettreTransport, MailTransport, Relay};

#[cfg(test)]
pub(crate) use email::tests as test_support;

use crate::{config::MailConfig, MailError};

/// Something able to deliver an email to a list of recipients
pub trait EmailSender {
    fn send_email(
        &self,
        recipients: &[String],
        content: &str,
        subject: &str,
        content_type: ContentType,
    ) -> Result<(), MailError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    Html,
    #[default]
    Text,
}

impl ContentType {
    pub fn header_value(&self) -> &'static str {
        match self {
            ContentType::Html => "text/html;charset=UTF-8",
            ContentType::Text => "text/plain;charset=UTF-8",
        }
    }
}

impl From<&str> for ContentType {
    fn from(value: &str) -> Self {
        match value {
            "html" => ContentType::Html,
            _ => ContentType::Text,
        }
    }
}

/// Available ways to send email. SMTP is the only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SenderKind {
    #[default]
    Smtp,
}

impl FromStr for SenderKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.eq_ignore_ascii_case("smtp") {
            warn!("Unknown email sender kind {s:?}, falling back to smtp");
        }
        Ok(SenderKind::Smtp)
    }
}

pub fn create_email_sender<'a>(kind: &str, mail: &'a MailConfig) -> Box<dyn EmailSender + 'a> {
    match kind.parse::<SenderKind>().unwrap_or_default() {
        SenderKind::Smtp => Box::new(SmtpSender::new(mail)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("smtp")]
    #[case("SMTP")]
    #[case("carrier-pigeon")]
    #[case("")]
    fn every_kind_is_smtp(#[case] kind: &str) {
        assert_eq!(kind.parse::<SenderKind>(), Ok(SenderKind::Smtp));
    }

    #[rstest]
    #[case("html", "text/html;charset=UTF-8")]
    #[case("text", "text/plain;charset=UTF-8")]
    #[case("HTML", "text/plain;charset=UTF-8")]
    #[case("", "text/plain;charset=UTF-8")]
    fn content_type_header(#[case] kind: &str, #[case] expected: &str) {
        assert_eq!(ContentType::from(kind).header_value(), expected);
    }
}
