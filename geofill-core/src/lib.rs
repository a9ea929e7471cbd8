//! Repairs missing geographic metadata in a `locations.json` dataset.
//!
//! Two batch jobs share one shape: load the dataset, select the records
//! whose `city` or `address` is still "Unknown", reverse geocode each one
//! sequentially under a fixed rate limit, and write the whole document back.

// Internal modules
mod address;
mod city;
mod dataset;
mod enrich;
mod geocoder;
mod job;
mod nominatim;
mod rate_limit;
mod sentinel;

#[cfg(test)]
mod testing;

// Re-export public types
pub use address::{compose_address, enrich_addresses, resolve_address};
pub use city::{clean_city_name, enrich_cities, pick_city, resolve_city};
pub use dataset::{Dataset, Field, Location};
pub use enrich::{EnrichReport, Pacing, ProgressCallback, RecordOutcome, RecordProgress};
pub use geocoder::{AddressComponents, GeocodeError, LookupRequest, Place, ReverseGeocoder};
pub use job::{
    estimated_minutes, run_address_job, run_city_job, JobConfig, JobSummary, DEFAULT_DATASET,
    DEFAULT_LANGUAGE,
};
pub use nominatim::{GeocoderConfig, NominatimClient, DEFAULT_ENDPOINT};
pub use rate_limit::RateLimiter;
pub use sentinel::{is_unresolved, UNKNOWN};
