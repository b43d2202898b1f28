//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::storage::FileStore;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "nightlight")]
#[command(about = "A state-managed ambient sound service with a sleep timer")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory the session state is saved in
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Directory sound files are read from
    #[arg(long, default_value = "sounds")]
    pub sounds_dir: PathBuf,

    /// mpv-compatible command line player used for audio
    #[arg(long, default_value = "mpv")]
    pub player: String,

    /// Track state without producing audio
    #[arg(long)]
    pub silent: bool,

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

    /// Directory for the state store, falling back to the platform data dir
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(FileStore::default_dir)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_locally_with_mpv() {
        let config = Config::try_parse_from(["nightlight"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.player, "mpv");
        assert!(!config.silent);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn explicit_state_dir_wins() {
        let config = Config::try_parse_from([
            "nightlight", "--state-dir", "/tmp/nl", "--silent", "-v", "-p", "9000",
        ])
        .unwrap();
        assert_eq!(config.state_dir(), PathBuf::from("/tmp/nl"));
        assert!(config.silent);
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.port, 9000);
    }
}
