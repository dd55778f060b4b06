use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Queries ISZCloud mask reservation results for the configured users and emails a summary."
)]
pub struct Cli {
    /// Specify config file to use
    #[arg(short = 'c', long = "config", value_name = "PATH", default_value = "cfg.json")]
    pub config_filename: String,

    /// Set logging level to use
    #[arg(long, short, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn get_config_path(&self) -> PathBuf {
        PathBuf::from(&self.config_filename)
    }
}

/// Exists to provide better help messages variants copied from LevelFilter as
/// that's the type that is actually needed
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum LogLevel {
    /// Nothing emitted in this mode
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["iszcloud_poller"]);
        assert_eq!(cli.get_config_path(), PathBuf::from("cfg.json"));
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn short_config_flag() {
        let cli = Cli::parse_from(["iszcloud_poller", "-c", "/etc/isz.json", "-l", "debug"]);
        assert_eq!(cli.get_config_path(), PathBuf::from("/etc/isz.json"));
        assert_eq!(LevelFilter::from(cli.log_level), LevelFilter::Debug);
    }
}
