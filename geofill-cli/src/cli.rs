use clap::Parser;
use geofill_core::{GeocoderConfig, JobConfig, DEFAULT_ENDPOINT};
use std::path::PathBuf;
use std::time::Duration;

/// Options shared by both repair jobs.
///
/// Everything is optional: with no arguments a job works on
/// `locations.json` in the current directory with the default pacing.
#[derive(Parser, Debug)]
#[command(author = "Zeevmala")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Dataset file to repair in place
    #[arg(short = 'f', long = "file", value_name = "PATH", default_value = geofill_core::DEFAULT_DATASET)]
    pub file: PathBuf,

    /// Language for returned place names
    #[arg(short = 'l', long = "language", default_value = geofill_core::DEFAULT_LANGUAGE)]
    pub language: String,

    /// Nominatim base URL
    #[arg(long = "endpoint", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// User-Agent sent with every request
    #[arg(long = "user-agent")]
    pub user_agent: Option<String>,

    /// Delay between requests in milliseconds
    #[arg(long = "delay-ms")]
    pub delay_ms: Option<u64>,

    /// Run lookups and print results without writing the dataset
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Apply the flags on top of a job's defaults
    pub fn job_config(&self, defaults: JobConfig) -> JobConfig {
        let base = match self.delay_ms {
            Some(ms) => JobConfig::with_delay(Duration::from_millis(ms)),
            None => defaults,
        };

        JobConfig {
            dataset_path: self.file.clone(),
            language: self.language.clone(),
            dry_run: self.dry_run,
            ..base
        }
    }

    /// Geocoder settings, identifying ourselves as `default_agent` unless overridden
    pub fn geocoder_config(&self, default_agent: &str) -> GeocoderConfig {
        GeocoderConfig {
            endpoint: self.endpoint.clone(),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| default_agent.to_string()),
            ..GeocoderConfig::default()
        }
    }
}

/// Parses command-line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
