use std::{fs, path::Path};

use log::{debug, info};
use serde::Deserialize;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Base URL of the ISZCloud service, without a trailing slash
    pub server: String,

    /// Users to query status for
    #[serde(rename = "user_info")]
    pub users: Vec<User>,

    /// Settings used to send the summary email
    pub mail: MailConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub mobile: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MailConfig {
    /// Relay to submit mail to as `host:port`
    #[serde(rename = "smtp_smarthost")]
    pub smtp_host: String,

    pub smtp_from: String,

    #[serde(rename = "smtp_auth_username")]
    pub smtp_username: String,

    #[serde(rename = "smtp_auth_identity", default)]
    pub smtp_identity: String,

    #[serde(rename = "smtp_auth_password")]
    pub smtp_password: String,

    /// If true STARTTLS must succeed before authenticating
    #[serde(default)]
    pub smtp_require_tls: bool,

    /// Accept invalid certificates and hostnames from the relay.
    ///
    /// UNSAFE on untrusted networks, credentials can be intercepted.
    #[serde(default)]
    pub smtp_skip_tls_verify: bool,

    #[serde(rename = "smtp_to", default)]
    pub smtp_recipients: Vec<String>,
}

impl Config {
    pub fn load_from(config_path: &Path) -> Result<Config, ConfigError> {
        if config_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if !config_path.exists() {
            return Err(ConfigError::NotFound(config_path.to_path_buf()));
        }
        debug!("Loading Config from: {config_path:?}");
        let file_contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        let result: Config =
            serde_json::from_str(file_contents.trim()).map_err(|source| ConfigError::Parse {
                path: config_path.to_path_buf(),
                source,
            })?;
        info!(
            "read config file {config_path:?} successfully, {} user(s) configured",
            result.users.len()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const SAMPLE: &str = r#"
    {
        "server": "https://example.com",
        "user_info": [
            {"mobile": "13800000000", "code": "A1"},
            {"mobile": "13900000000", "code": "B2"}
        ],
        "mail": {
            "smtp_smarthost": "smtp.example.com:25",
            "smtp_from": "bot@example.com",
            "smtp_auth_username": "bot",
            "smtp_auth_identity": "",
            "smtp_auth_password": "secret",
            "smtp_require_tls": true,
            "smtp_to": ["me@example.com", "you@example.com"]
        }
    }
    "#;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "iszcloud_poller_{}_{name}.json",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_sample() {
        let path = write_temp("sample", SAMPLE);
        let config = Config::load_from(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.server, "https://example.com");
        assert_eq!(
            config.users,
            vec![
                User {
                    mobile: "13800000000".into(),
                    code: "A1".into()
                },
                User {
                    mobile: "13900000000".into(),
                    code: "B2".into()
                },
            ]
        );
        assert_eq!(config.mail.smtp_host, "smtp.example.com:25");
        assert_eq!(config.mail.smtp_username, "bot");
        assert!(config.mail.smtp_require_tls);
        assert!(!config.mail.smtp_skip_tls_verify);
        assert_eq!(config.mail.smtp_recipients.len(), 2);
    }

    #[test]
    fn empty_path() {
        let actual = Config::load_from(Path::new(""));
        assert!(matches!(actual, Err(ConfigError::EmptyPath)));
    }

    #[test]
    fn missing_file() {
        let actual = Config::load_from(Path::new("/definitely/not/here/cfg.json"));
        assert!(matches!(actual, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn malformed_json() {
        let path = write_temp("malformed", "{ \"server\": ");
        let actual = Config::load_from(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(actual, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn wrong_shape() {
        let path = write_temp("shape", r#"{"server": "x", "user_info": "nope"}"#);
        let actual = Config::load_from(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(actual, Err(ConfigError::Parse { .. })));
    }
}
