//! CLI Config

use std::path::PathBuf;

use clap::{Args, Parser};
use jiff::Timestamp;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Apply a coupon code to a cart.
#[derive(Debug, Parser)]
#[command(name = "coupons", version, about)]
pub struct CliConfig {
    /// Coupon code to redeem
    #[arg(env = "COUPON_CODE")]
    pub code: String,

    /// Coupon catalog YAML file
    #[arg(short = 'c', long, env = "COUPONS_CATALOG", default_value = "fixtures/coupons/default.yml")]
    pub coupons: PathBuf,

    /// Cart YAML file
    #[arg(short = 'k', long, env = "COUPONS_CART", default_value = "fixtures/carts/default.yml")]
    pub cart: PathBuf,

    /// Evaluation time (RFC 3339); defaults to now
    #[arg(long, env = "COUPONS_AT")]
    pub at: Option<Timestamp>,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_arguments() -> TestResult {
        let config = CliConfig::try_parse_from([
            "coupons",
            "save10",
            "--coupons",
            "a.yml",
            "--cart",
            "b.yml",
            "--at",
            "2026-10-18T12:00:00Z",
            "--log-format",
            "json",
        ])?;

        assert_eq!(config.code, "save10");
        assert_eq!(config.coupons, PathBuf::from("a.yml"));
        assert_eq!(config.cart, PathBuf::from("b.yml"));
        assert_eq!(config.at, Some("2026-10-18T12:00:00Z".parse()?));
        assert!(matches!(config.logging.log_format, LogFormat::Json));

        Ok(())
    }

    #[test]
    fn code_is_required() {
        assert!(CliConfig::try_parse_from(["coupons"]).is_err());
    }
}
