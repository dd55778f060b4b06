use lettre::{
    address::Envelope,
    transport::smtp::{
        authentication::{Credentials, Mechanism},
        client::{Tls, TlsParameters},
    },
    SmtpTransport, Transport,
};
use log::{debug, warn};

use crate::{config::MailConfig, MailError};

const SMTPS_PORT: u16 = 465;

/// Validated `host:port` of the smarthost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relay<'a> {
    pub host: &'a str,
    pub port: u16,
}

/// Hands a fully composed message to a mail server
pub trait MailTransport {
    fn submit(&self, relay: Relay, envelope: &Envelope, message: &[u8]) -> Result<(), MailError>;
}

impl<T: MailTransport + ?Sized> MailTransport for &T {
    fn submit(&self, relay: Relay, envelope: &Envelope, message: &[u8]) -> Result<(), MailError> {
        (**self).submit(relay, envelope, message)
    }
}

/// Submits over SMTP with PLAIN authentication
pub struct LettreTransport {
    username: String,
    password: String,
    require_tls: bool,
    skip_tls_verify: bool,
}

impl LettreTransport {
    pub fn new(mail: &MailConfig) -> Self {
        Self {
            username: mail.smtp_username.clone(),
            password: mail.smtp_password.clone(),
            require_tls: mail.smtp_require_tls,
            skip_tls_verify: mail.smtp_skip_tls_verify,
        }
    }

    fn tls(&self, host: &str, port: u16) -> Result<Tls, MailError> {
        if self.skip_tls_verify {
            warn!("TLS verification is disabled for {host}, credentials are exposed to anyone on the path");
        }
        let parameters = TlsParameters::builder(host.to_string())
            .dangerous_accept_invalid_certs(self.skip_tls_verify)
            .dangerous_accept_invalid_hostnames(self.skip_tls_verify)
            .build()?;
        Ok(if port == SMTPS_PORT {
            Tls::Wrapper(parameters)
        } else if self.require_tls {
            Tls::Required(parameters)
        } else {
            Tls::Opportunistic(parameters)
        })
    }
}

impl MailTransport for LettreTransport {
    fn submit(&self, relay: Relay, envelope: &Envelope, message: &[u8]) -> Result<(), MailError> {
        let tls = self.tls(relay.host, relay.port)?;
        debug!("Submitting {} bytes to {}:{}", message.len(), relay.host, relay.port);
        let mailer = SmtpTransport::builder_dangerous(relay.host)
            .port(relay.port)
            .tls(tls)
            .credentials(Credentials::new(
                self.username.clone(),
                self.password.clone(),
            ))
            .authentication(vec![Mechanism::Plain])
            .build();
        mailer.send_raw(envelope, message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::test_support::mail_config;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Policy {
        Wrapper,
        Required,
        Opportunistic,
        Other,
    }

    fn policy(tls: &Tls) -> Policy {
        match tls {
            Tls::Wrapper(_) => Policy::Wrapper,
            Tls::Required(_) => Policy::Required,
            Tls::Opportunistic(_) => Policy::Opportunistic,
            _ => Policy::Other,
        }
    }

    #[rstest]
    #[case(465, false, false, Policy::Wrapper)]
    #[case(465, true, false, Policy::Wrapper)]
    #[case(465, false, true, Policy::Wrapper)]
    #[case(587, true, false, Policy::Required)]
    #[case(587, true, true, Policy::Required)]
    #[case(25, false, false, Policy::Opportunistic)]
    #[case(25, false, true, Policy::Opportunistic)]
    fn tls_policy(
        #[case] port: u16,
        #[case] require_tls: bool,
        #[case] skip_tls_verify: bool,
        #[case] expected: Policy,
    ) {
        let mut mail = mail_config(&format!("smtp.example.com:{port}"));
        mail.smtp_require_tls = require_tls;
        mail.smtp_skip_tls_verify = skip_tls_verify;
        let transport = LettreTransport::new(&mail);

        let tls = transport.tls("smtp.example.com", port).unwrap();

        assert_eq!(policy(&tls), expected);
    }
}
