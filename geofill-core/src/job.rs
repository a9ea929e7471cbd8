use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

use crate::address;
use crate::city;
use crate::dataset::{Dataset, Field};
use crate::enrich::{EnrichReport, ProgressCallback};
use crate::geocoder::ReverseGeocoder;
use crate::rate_limit::RateLimiter;

/// Dataset file both jobs work on by default, relative to the working directory
pub const DEFAULT_DATASET: &str = "locations.json";

/// Language hint sent with every lookup by default
pub const DEFAULT_LANGUAGE: &str = "he";

/// Configuration for one repair run
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub dataset_path: PathBuf,
    pub language: String,
    /// Delay between consecutive geocoding requests
    pub delay: Duration,
    /// Delay after a failed request (city job only)
    pub error_cooldown: Duration,
    /// Run the lookups and report, but leave the dataset file untouched
    pub dry_run: bool,
}

impl JobConfig {
    /// City job: one request per second, two seconds after an error
    pub fn city() -> Self {
        Self::with_delay(Duration::from_secs(1))
    }

    /// Address job: 1.1 seconds between requests to stay safely under the limit
    pub fn address() -> Self {
        Self::with_delay(Duration::from_millis(1100))
    }

    /// Default settings with a custom delay; the error cooldown is twice the delay
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            language: DEFAULT_LANGUAGE.to_string(),
            delay,
            error_cooldown: delay * 2,
            dry_run: false,
        }
    }

    fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.delay, self.error_cooldown)
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub report: EnrichReport,
    /// Records in the dataset, selected or not
    pub total_locations: usize,
    /// Records whose target field is still "Unknown" after the run
    pub still_unresolved: usize,
    /// Whether the dataset file was rewritten
    pub saved: bool,
    /// Time spent in rate-limit sleeps
    pub waited: Duration,
}

/// Rough run time at one request per second, in whole minutes
pub fn estimated_minutes(selected: usize) -> usize {
    selected / 60 + 1
}

/// Fill in unknown cities in the configured dataset file
pub fn run_city_job<G>(
    config: &JobConfig,
    geocoder: &G,
    progress: Option<ProgressCallback<'_>>,
) -> Result<JobSummary>
where
    G: ReverseGeocoder + ?Sized,
{
    run_job(config, Field::City, |dataset, limiter| {
        city::enrich_cities(dataset, geocoder, &config.language, limiter, progress)
    })
}

/// Fill in unknown street addresses in the configured dataset file
pub fn run_address_job<G>(
    config: &JobConfig,
    geocoder: &G,
    progress: Option<ProgressCallback<'_>>,
) -> Result<JobSummary>
where
    G: ReverseGeocoder + ?Sized,
{
    run_job(config, Field::Address, |dataset, limiter| {
        address::enrich_addresses(dataset, geocoder, &config.language, limiter, progress)
    })
}

/// Load, enrich, save.
///
/// Only reading or writing the dataset can fail the run; per-record lookup
/// failures are tallied in the report. Nothing is written when no record
/// needs work or in dry-run mode.
fn run_job<F>(config: &JobConfig, field: Field, enrich: F) -> Result<JobSummary>
where
    F: FnOnce(&mut Dataset, &mut RateLimiter) -> EnrichReport,
{
    let path = &config.dataset_path;
    let mut dataset = Dataset::load(path)?;
    let total_locations = dataset.locations.len();

    let selected = dataset.unresolved_count(field);
    log::info!(
        "Found {} locations with {}=\"Unknown\" out of {} total",
        selected,
        field.key(),
        total_locations
    );

    if selected == 0 {
        log::info!("No unknown {} values to fix", field.key());
        return Ok(JobSummary {
            report: EnrichReport::default(),
            total_locations,
            still_unresolved: 0,
            saved: false,
            waited: Duration::ZERO,
        });
    }

    log::info!(
        "Estimated time: ~{} minutes (1 request/second)",
        estimated_minutes(selected)
    );

    let mut limiter = config.rate_limiter();
    let report = enrich(&mut dataset, &mut limiter);

    let saved = if config.dry_run {
        log::info!("[DRY RUN] Not writing {}", path.display());
        false
    } else {
        dataset.save(path)?;
        true
    };

    Ok(JobSummary {
        still_unresolved: dataset.unresolved_count(field),
        report,
        total_locations,
        saved,
        waited: limiter.waited(),
    })
}
