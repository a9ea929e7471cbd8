use crate::dataset::{Dataset, Field, Location};
use crate::enrich::{self, EnrichReport, Pacing, ProgressCallback, RecordOutcome};
use crate::geocoder::{AddressComponents, LookupRequest, ReverseGeocoder};
use crate::rate_limit::RateLimiter;
use crate::sentinel::UNKNOWN;

/// Clean up a city name returned by the geocoder.
///
/// - Bilingual names like "ירושלים | القدس" keep only the part before " | "
/// - En/em dashes become a plain hyphen, the Hebrew maqaf becomes a space
/// - Surrounding whitespace is trimmed
///
/// Empty input and the placeholder itself come back as "Unknown".
pub fn clean_city_name(city: Option<&str>) -> String {
    let city = match city {
        Some(c) if !c.is_empty() && c != UNKNOWN => c,
        _ => return UNKNOWN.to_string(),
    };

    let city = match city.split_once(" | ") {
        Some((local, _)) => local.trim(),
        None => city,
    };

    city.replace(['\u{2013}', '\u{2014}'], "-")
        .replace('\u{05BE}', " ")
        .trim()
        .to_string()
}

/// Pick the city candidate from address components.
///
/// Israeli locations land in different fields depending on the area:
/// city for most cities, town and village for smaller places, residential
/// around Tel Aviv and municipality for regional councils.
pub fn pick_city(address: &AddressComponents) -> Option<&str> {
    [
        &address.city,
        &address.town,
        &address.village,
        &address.residential,
        &address.municipality,
    ]
    .into_iter()
    .filter_map(|field| field.as_deref())
    .find(|value| !value.is_empty())
}

/// Reverse geocode one record and return its cleaned city
pub fn resolve_city<G>(geocoder: &G, location: &Location, language: &str) -> RecordOutcome
where
    G: ReverseGeocoder + ?Sized,
{
    let Some((lat, lng)) = location.coordinates() else {
        return RecordOutcome::MissingCoordinates;
    };

    match geocoder.reverse(&LookupRequest { lat, lng, language }) {
        Ok(Some(place)) => {
            let city = clean_city_name(pick_city(&place.address));
            // A blank local part (" | القدس") or a whitespace-only name cleans to ""
            if !city.is_empty() && city != UNKNOWN {
                RecordOutcome::Resolved(city)
            } else {
                RecordOutcome::NotFound
            }
        }
        Ok(None) => RecordOutcome::NotFound,
        Err(e) => RecordOutcome::Failed(e),
    }
}

/// Fill in every `city` that is still "Unknown".
///
/// Waits the limiter's delay between requests and its cooldown after a
/// failed request; there is no wait after the final record.
pub fn enrich_cities<G>(
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
        Field::City,
        limiter,
        Pacing::between_requests(),
        progress,
        |location| resolve_city(geocoder, location, language),
    )
}
