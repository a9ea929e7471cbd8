use crate::dataset::{Dataset, Field, Location};
use crate::enrich::{self, EnrichReport, Pacing, ProgressCallback, RecordOutcome};
use crate::geocoder::{LookupRequest, Place, ReverseGeocoder};
use crate::rate_limit::RateLimiter;

/// Build the street address for a record from the geocoder's best match.
///
/// Uses "road house_number" when a road is known, otherwise the first
/// segment of the full formatted address. The record's own city is appended
/// when it has one. Returns `None` when the match has no formatted address;
/// a whitespace-only one still counts as present.
pub fn compose_address(place: &Place, city: Option<&str>) -> Option<String> {
    if place.display_name.is_empty() {
        return None;
    }

    let road = place.address.road.as_deref().unwrap_or_default();
    let street = if !road.is_empty() {
        let house_number = place.address.house_number.as_deref().unwrap_or_default();
        format!("{} {}", road, house_number).trim().to_string()
    } else {
        place
            .display_name
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    Some(match city {
        Some(city) if !city.is_empty() => format!("{}, {}", street, city),
        _ => street,
    })
}

/// Reverse geocode one record and compose its address
pub fn resolve_address<G>(geocoder: &G, location: &Location, language: &str) -> RecordOutcome
where
    G: ReverseGeocoder + ?Sized,
{
    let Some((lat, lng)) = location.coordinates() else {
        return RecordOutcome::MissingCoordinates;
    };

    match geocoder.reverse(&LookupRequest { lat, lng, language }) {
        Ok(Some(place)) => match compose_address(&place, location.city()) {
            Some(address) => RecordOutcome::Resolved(address),
            None => RecordOutcome::NotFound,
        },
        Ok(None) => RecordOutcome::NotFound,
        Err(e) => RecordOutcome::Failed(e),
    }
}

/// Fill in every `address` that is still "Unknown".
///
/// The record's `city` is read, never written. Every record is followed by
/// the limiter's normal delay, whether or not the lookup succeeded.
pub fn enrich_addresses<G>(
    dataset: &mut Dataset,
    geocoder: &G,
    language: &str,
    limiter: &mut RateLimiter,
    progress: Option<ProgressCallback<'_>>,
) -> EnrichReport
where
    G: ReverseGeocoder + ?Sized,
{
    enrich::enrich_field(
        dataset,
        Field::Address,
        limiter,
        Pacing::after_every_record(),
        progress,
        |location| resolve_address(geocoder, location, language),
    )
}
