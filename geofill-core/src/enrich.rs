use std::fmt;

use crate::dataset::{Dataset, Field, Location};
use crate::geocoder::GeocodeError;
use crate::rate_limit::RateLimiter;

/// What happened to a single selected record
#[derive(Debug)]
pub enum RecordOutcome {
    /// A usable value was found and written into the record
    Resolved(String),
    /// The provider answered but had nothing usable
    NotFound,
    /// The record has no numeric `lat`/`lng`, so no lookup was made
    MissingCoordinates,
    /// The lookup itself failed
    Failed(GeocodeError),
}

impl RecordOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, RecordOutcome::Resolved(_))
    }

    /// Failures that warrant the extended cooldown before the next request
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            RecordOutcome::Failed(_) | RecordOutcome::MissingCoordinates
        )
    }
}

impl fmt::Display for RecordOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordOutcome::Resolved(value) => write!(f, "{}", value),
            RecordOutcome::NotFound => write!(f, "No result"),
            RecordOutcome::MissingCoordinates => write!(f, "Error: missing lat/lng"),
            RecordOutcome::Failed(e) if e.is_transient() => write!(f, "Error: {}", e),
            RecordOutcome::Failed(e) => write!(f, "Unexpected: {}", e),
        }
    }
}

/// Progress notification for one processed record
#[derive(Debug)]
pub struct RecordProgress<'a> {
    /// 1-based position among the selected records
    pub index: usize,
    pub total: usize,
    pub id: &'a str,
    pub name: Option<&'a str>,
    pub outcome: &'a RecordOutcome,
}

/// Callback invoked after each record, for console progress lines
pub type ProgressCallback<'a> = &'a dyn Fn(&RecordProgress<'_>);

/// When the rate limiter waits between records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Also wait after the final record
    pub pause_after_last: bool,
    /// Wait the extended cooldown instead of the normal delay after an error
    pub cool_down_on_error: bool,
}

impl Pacing {
    /// Delay between requests only; an error is followed by the cooldown
    pub fn between_requests() -> Self {
        Self {
            pause_after_last: false,
            cool_down_on_error: true,
        }
    }

    /// The normal delay after every record, whatever its outcome
    pub fn after_every_record() -> Self {
        Self {
            pause_after_last: true,
            cool_down_on_error: false,
        }
    }
}

/// Success/failure tally for one enrichment pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub selected: usize,
    pub fixed: usize,
    pub failed: usize,
    /// Ids of records left unresolved, in processing order
    pub failed_ids: Vec<String>,
}

impl EnrichReport {
    fn new(selected: usize) -> Self {
        Self {
            selected,
            ..Self::default()
        }
    }

    fn record(&mut self, id: String, outcome: &RecordOutcome) {
        if outcome.is_resolved() {
            self.fixed += 1;
        } else {
            self.failed += 1;
            self.failed_ids.push(id);
        }
    }
}

/// Run `resolve` over every record whose `field` is unresolved.
///
/// Records are processed strictly in dataset order. A record is written only
/// when `resolve` yields [`RecordOutcome::Resolved`]; nothing else in the
/// record is touched.
pub fn enrich_field<F>(
    dataset: &mut Dataset,
    field: Field,
    limiter: &mut RateLimiter,
    pacing: Pacing,
    progress: Option<ProgressCallback<'_>>,
    mut resolve: F,
) -> EnrichReport
where
    F: FnMut(&Location) -> RecordOutcome,
{
    let selected = dataset.unresolved(field);
    let total = selected.len();
    let mut report = EnrichReport::new(total);

    for (i, &idx) in selected.iter().enumerate() {
        let outcome = resolve(&dataset.locations[idx]);
        let location = &mut dataset.locations[idx];
        let id = location.id_label();

        match &outcome {
            RecordOutcome::Resolved(value) => {
                log::debug!("id={} {} -> {}", id, field.key(), value);
                location.set(field, value.clone());
            }
            RecordOutcome::NotFound => {
                log::debug!("id={} no {} found", id, field.key());
            }
            other => {
                log::warn!("id={} {} lookup failed: {}", id, field.key(), other);
            }
        }

        if let Some(callback) = progress {
            callback(&RecordProgress {
                index: i + 1,
                total,
                id: &id,
                name: location.name(),
                outcome: &outcome,
            });
        }

        report.record(id, &outcome);

        let is_last = i + 1 == total;
        if outcome.is_error() && pacing.cool_down_on_error {
            limiter.cool_down();
        } else if !is_last || pacing.pause_after_last {
            limiter.pause();
        }
    }

    report
}
