//! Storefront CLI entry point.

use clap::Parser;
use storefront_core::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(&logging_settings(&cli.config));

    if let Err(e) = cli.execute().await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Logging section of the config file. A broken file is reported by the
/// command itself, so logging falls back to defaults here.
fn logging_settings(config_path: &str) -> LoggingConfig {
    commands::load_config(config_path)
        .map(|config| config.logging)
        .unwrap_or_default()
}

/// Logs go to stderr so table and JSON output stay clean on stdout.
/// Level defaults to `warn` unless `RUST_LOG` says otherwise.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match logging.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_logging_follows_config_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        writeln!(file, "[logging]\nformat = \"pretty\"").expect("write");

        let logging = logging_settings(file.path().to_str().expect("utf8"));
        assert_eq!(logging.format, "pretty");
    }

    #[test]
    fn test_invalid_config_falls_back_to_default_logging() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        writeln!(file, "[session]\nrefresh_interval_ms = 0").expect("write");

        let logging = logging_settings(file.path().to_str().expect("utf8"));
        assert_eq!(logging.format, LoggingConfig::default().format);
    }
}
