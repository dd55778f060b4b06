use std::path::PathBuf;

use thiserror::Error;

/// Problems loading the configuration file. All of these abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config file specified, use -c to specify one")]
    EmptyPath,

    #[error("config file {0:?} does not exist")]
    NotFound(PathBuf),

    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure querying a single user. The aggregator logs these and moves on.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("http request failed")]
    Network(#[from] reqwest::Error),

    #[error("failed to parse status response")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid smtp address {0:?}, expected host:port")]
    InvalidAddress(String),

    #[error("no valid recipients")]
    InvalidRecipients,

    #[error("invalid recipient {addr:?}")]
    InvalidTos {
        addr: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("invalid sender {addr:?}")]
    InvalidFrom {
        addr: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build smtp envelope")]
    Envelope(#[from] lettre::error::Error),

    #[error("smtp delivery failed")]
    Transport(#[from] lettre::transport::smtp::Error),
}
