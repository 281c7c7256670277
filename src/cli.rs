use clap::Parser;
use std::path::PathBuf;

/// Main CLI interface for `dbconnect`
#[derive(Parser, Debug)]
#[command(name = "dbconnect")]
#[command(version = crate::VERSION)]
#[command(about = "Open a PostgreSQL connection, retrying with a fixed delay")]
#[command(
    long_about = "Connects using a TOML config file and DB_* environment overrides. \
                  Exits with status 1 once every attempt has failed."
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum number of connection attempts
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Seconds to wait between attempts
    #[arg(long, value_name = "SECS")]
    pub delay: Option<u64>,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Apply flag overrides to a loaded configuration
    pub fn apply(&self, config: &mut crate::Config) {
        if let Some(max_attempts) = self.max_attempts {
            config.retry.max_attempts = max_attempts;
        }
        if let Some(delay) = self.delay {
            config.retry.delay_secs = delay;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_retry_section() {
        let cli = <Cli as Parser>::try_parse_from([
            "dbconnect",
            "--config",
            "db.toml",
            "--max-attempts",
            "3",
            "--delay",
            "0",
        ])
        .unwrap();
        let mut config = crate::Config::default();
        cli.apply(&mut config);

        assert_eq!(cli.config, Some(PathBuf::from("db.toml")));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay_secs, 0);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = <Cli as Parser>::try_parse_from(["dbconnect", "--max-attempts", "0"]);
        assert!(result.is_err());
    }
}
