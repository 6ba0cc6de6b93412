//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::shutdown::AfterSave;

/// Directory name used under the per-user data directory.
pub const APP_DIR_NAME: &str = "timer-keeper";

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "timer-keeper")]
#[command(about = "Crash-safe persistence server for named countdown timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "5000")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding state.json (defaults to the per-user data directory)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Directory with the frontend files to serve at /
    #[arg(short, long)]
    pub static_dir: Option<PathBuf>,

    /// What to do after the shutdown save on SIGINT/SIGTERM
    #[arg(long, value_enum, default_value_t = AfterSave::Return)]
    pub after_signal: AfterSave,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Resolve the directory the state store lives in
    ///
    /// `--data-dir` wins; otherwise the platform data directory, and
    /// `./data` when the platform has none.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR_NAME)))
            .unwrap_or_else(|| PathBuf::from("data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["timer-keeper"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:5000");
        assert_eq!(config.after_signal, AfterSave::Return);
        assert_eq!(config.log_level(), "info");
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn explicit_data_dir_wins() {
        let config = Config::try_parse_from([
            "timer-keeper",
            "--data-dir",
            "/tmp/timers",
            "--after-signal",
            "exit",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/timers"));
        assert_eq!(config.after_signal, AfterSave::Exit);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn rejects_unknown_after_signal_mode() {
        assert!(Config::try_parse_from(["timer-keeper", "--after-signal", "later"]).is_err());
    }
}
