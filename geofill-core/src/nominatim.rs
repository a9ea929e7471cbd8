use serde::Deserialize;
use std::time::Duration;

use crate::geocoder::{AddressComponents, GeocodeError, LookupRequest, Place, ReverseGeocoder};

/// Public OpenStreetMap Nominatim instance
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

/// Connection settings for a Nominatim instance
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL, without the `/reverse` path
    pub endpoint: String,
    /// Nominatim's usage policy requires an identifying User-Agent
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: format!(
                "geofill/{} (https://github.com/Zeevmala/solelot)",
                env!("CARGO_PKG_VERSION")
            ),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Nominatim reverse API response structure
#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<AddressComponents>,
    display_name: Option<String>,
    /// Present instead of a result, e.g. "Unable to geocode"
    error: Option<serde_json::Value>,
}

/// Blocking Nominatim client.
///
/// Makes exactly one HTTP request per lookup; pacing between lookups is the
/// caller's job (see [`crate::RateLimiter`]).
pub struct NominatimClient {
    client: reqwest::blocking::Client,
    reverse_url: String,
}

impl NominatimClient {
    pub fn new(config: &GeocoderConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            reverse_url: format!("{}/reverse", config.endpoint.trim_end_matches('/')),
        })
    }
}

impl ReverseGeocoder for NominatimClient {
    fn reverse(&self, request: &LookupRequest<'_>) -> Result<Option<Place>, GeocodeError> {
        log::debug!(
            "Reverse geocoding {},{} via {}",
            request.lat,
            request.lng,
            self.reverse_url
        );

        let response = self
            .client
            .get(&self.reverse_url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", request.lat.to_string()),
                ("lon", request.lng.to_string()),
                ("accept-language", request.language.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .map_err(transport_error)?;

        if let Some(err) = classify_status(response.status()) {
            return Err(err);
        }

        let data: NominatimResponse = response.json().map_err(transport_error)?;
        Ok(place_from_response(data))
    }
}

/// Any non-2xx answer is a service-side refusal; Nominatim uses 429 and 403
/// for throttled or blocked clients and 5xx when overloaded
fn classify_status(status: reqwest::StatusCode) -> Option<GeocodeError> {
    if status.is_success() {
        None
    } else {
        Some(GeocodeError::ServiceUnavailable(format!(
            "Nominatim returned status: {}",
            status
        )))
    }
}

/// Map a reqwest failure onto the geocoding error classes
fn transport_error(err: reqwest::Error) -> GeocodeError {
    if err.is_timeout() {
        GeocodeError::Timeout
    } else if err.is_connect() {
        GeocodeError::ServiceUnavailable(err.to_string())
    } else {
        GeocodeError::Unexpected(err.to_string())
    }
}

/// Turn a decoded `/reverse` response into a place
fn place_from_response(data: NominatimResponse) -> Option<Place> {
    if let Some(error) = data.error {
        log::debug!("Nominatim found nothing: {}", error);
        return None;
    }

    Some(Place {
        address: data.address.unwrap_or_default(),
        display_name: data.display_name.unwrap_or_default(),
    })
}
