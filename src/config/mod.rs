pub mod cli;
pub mod dashboard_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://localhost:8080/api/transactions";
pub const DEFAULT_FREQUENCY_SECS: u64 = 10;
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_WARMUP_CALLS: u32 = 20;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for one driver run. Never mutated once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub url: String,
    pub interval: Duration,
    pub content_type: String,
    pub warmup_calls: u32,
    pub request_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            interval: Duration::from_secs(DEFAULT_FREQUENCY_SECS),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            warmup_calls: DEFAULT_WARMUP_CALLS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Validate for DriverConfig {
    fn validate(&self) -> Result<()> {
        validate_url("url", &self.url)?;
        validate_positive_number("frequency", self.interval.as_secs(), 1)?;
        validate_non_empty_string("content_type", &self.content_type)?;
        validate_positive_number("timeout_secs", self.request_timeout.as_secs(), 1)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "txn-loadgen")]
    #[command(about = "API transaction caller that backs off when rate limited")]
    pub struct CliConfig {
        #[arg(long, default_value = DEFAULT_URL, help = "API URL to call")]
        pub url: String,

        #[arg(
            long,
            default_value_t = DEFAULT_FREQUENCY_SECS,
            help = "Time interval between API calls in seconds"
        )]
        pub frequency: u64,

        #[arg(long, default_value = DEFAULT_CONTENT_TYPE, help = "Content-Type of the request")]
        pub content_type: String,

        #[arg(long, default_value_t = DEFAULT_WARMUP_CALLS, help = "Calls made before steady state")]
        pub warmup_calls: u32,

        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, help = "Per-request timeout in seconds")]
        pub timeout_secs: u64,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub log_json: bool,
    }

    impl CliConfig {
        pub fn driver_config(&self) -> DriverConfig {
            DriverConfig {
                url: self.url.clone(),
                interval: Duration::from_secs(self.frequency),
                content_type: self.content_type.clone(),
                warmup_calls: self.warmup_calls,
                request_timeout: Duration::from_secs(self.timeout_secs),
            }
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            self.driver_config().validate()
        }
    }
}
