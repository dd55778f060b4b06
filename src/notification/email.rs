use base64::{engine::general_purpose::STANDARD, Engine as _};
use lettre::{address::Envelope, Address};
use log::{debug, error, info};

use super::{ContentType, EmailSender, LettreTransport, MailTransport, Relay};
use crate::{config::MailConfig, utils::single_line, MailError};

const RECIPIENT_SEPARATOR: char = ';';

pub struct SmtpSender<'a, T = LettreTransport> {
    mail: &'a MailConfig,
    transport: T,
}

impl<'a> SmtpSender<'a> {
    pub fn new(mail: &'a MailConfig) -> Self {
        Self::with_transport(mail, LettreTransport::new(mail))
    }
}

impl<'a, T: MailTransport> SmtpSender<'a, T> {
    pub fn with_transport(mail: &'a MailConfig, transport: T) -> Self {
        Self { mail, transport }
    }

    /// Validates the relay and recipients then submits a single message
    ///
    /// `tos` holds recipients separated by `;`, blank entries are ignored.
    pub fn smtp_send_mail(
        &self,
        tos: &str,
        subject: &str,
        body: &str,
        content_type: ContentType,
    ) -> Result<(), MailError> {
        let relay = parse_relay(&self.mail.smtp_host)?;

        let recipients: Vec<&str> = tos
            .split(RECIPIENT_SEPARATOR)
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .collect();
        if recipients.is_empty() {
            return Err(MailError::InvalidRecipients);
        }
        let to_addresses = recipients
            .iter()
            .map(|addr| {
                addr.parse::<Address>()
                    .map_err(|source| MailError::InvalidTos {
                        addr: addr.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let from = &self.mail.smtp_from;
        let from_address = from
            .trim()
            .parse::<Address>()
            .map_err(|source| MailError::InvalidFrom {
                addr: from.clone(),
                source,
            })?;

        let tos = recipients.join(";");
        let message = compose_message(from, &tos, subject, body, content_type);
        let envelope = Envelope::new(Some(from_address), to_addresses)?;
        debug!(
            "Sending via {}:{} as {:?} (identity {:?}) from {from} to {tos}: {}",
            relay.host,
            relay.port,
            self.mail.smtp_username,
            self.mail.smtp_identity,
            single_line(&message)
        );
        self.transport.submit(relay, &envelope, message.as_bytes())
    }
}

impl<'a, T: MailTransport> EmailSender for SmtpSender<'a, T> {
    fn send_email(
        &self,
        recipients: &[String],
        content: &str,
        subject: &str,
        content_type: ContentType,
    ) -> Result<(), MailError> {
        if recipients.is_empty() {
            debug!("not specified email address!");
            return Ok(());
        }
        if content.is_empty() {
            debug!("the content is empty!");
            return Ok(());
        }

        let tos = recipients.join(";");
        info!(
            "/sender/mail: contentType={content_type:?}, tos={tos}, subject={subject}, content={}",
            single_line(content)
        );
        self.smtp_send_mail(&tos, subject, content, content_type)
            .map_err(|e| {
                error!("Failed to send email: {e:?}");
                e
            })
    }
}

fn parse_relay(address: &str) -> Result<Relay<'_>, MailError> {
    let invalid = || MailError::InvalidAddress(address.to_string());
    if address.is_empty() {
        return Err(invalid());
    }
    let parts: Vec<&str> = address.split(':').collect();
    let [host, port] = parts.as_slice() else {
        return Err(invalid());
    };
    let port = port.parse::<u16>().map_err(|_| invalid())?;
    Ok(Relay { host: *host, port })
}

/// RFC 2047 `B` encoded word for a UTF-8 header value
pub fn encode_subject(subject: &str) -> String {
    format!("=?UTF-8?B?{}?=", STANDARD.encode(subject))
}

/// Builds the raw message. Headers are always written in the same order.
pub fn compose_message(
    from: &str,
    tos: &str,
    subject: &str,
    body: &str,
    content_type: ContentType,
) -> String {
    let headers = [
        ("From", from.to_string()),
        ("To", tos.to_string()),
        ("Subject", encode_subject(subject)),
        ("MIME-Version", "1.0".to_string()),
        ("Content-Type", content_type.header_value().to_string()),
        ("Content-Transfer-Encoding", "base64".to_string()),
    ];
    let mut message = String::new();
    for (name, value) in headers {
        message.push_str(&format!("{name}: {value}\r\n"));
    }
    message.push_str("\r\n");
    message.push_str(&STANDARD.encode(body));
    message
}
