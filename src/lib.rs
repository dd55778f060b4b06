mod cli;
mod config;
mod error;
mod http;
mod logging;
mod notification;
mod query;
mod utils;

use anyhow::Context;
use chrono::Local;
use log::info;

pub use cli::{Cli, LogLevel};
pub use config::{Config, MailConfig, User};
pub use error::{ConfigError, MailError, QueryError};
pub use http::{HttpGet, ReqwestClient};
pub use logging::init_logging;
pub use notification::{
    compose_message, create_email_sender, encode_subject, ContentType, EmailSender,
    LettreTransport, MailTransport, Relay, SenderKind, SmtpSender,
};
pub use query::{query_all, query_url, query_user, ApplyInfo, StatusRecord, StatusReport};

/// Subject line for the summary sent on `date` (formatted `YYYY-MM-DD`)
pub fn report_subject(date: &str) -> String {
    format!("[ISZCloud][{date}]口罩预约结果")
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_from(&cli.get_config_path()).context("parse config error")?;
    let http = ReqwestClient::new().context("Failed to create http client")?;
    let sender = create_email_sender("smtp", &config.mail);
    let today = format!("{}", Local::now().format("%F"));
    poll_and_notify(&config, &http, sender.as_ref(), &today)
}

/// Queries every configured user and emails the combined result
pub fn poll_and_notify(
    config: &Config,
    http: &dyn HttpGet,
    sender: &dyn EmailSender,
    date: &str,
) -> anyhow::Result<()> {
    let report = query_all(&config.server, &config.users, http);
    info!(
        "{} of {} user(s) queried successfully",
        report.len(),
        config.users.len()
    );
    sender
        .send_email(
            &config.mail.smtp_recipients,
            &report.to_string(),
            &report_subject(date),
            ContentType::Text,
        )
        .context("Failed to send summary email")?;
    info!("query iszcloud success!!!");
    Ok(())
}
