use serde::Deserialize;
use thiserror::Error;

/// A reverse geocoding request for a single coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest<'a> {
    pub lat: f64,
    pub lng: f64,
    /// Preferred language for returned names, e.g. "he"
    pub language: &'a str,
}

/// Structured address components returned for a coordinate.
///
/// Only the keys the repair jobs read are kept; everything else in the
/// provider's payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AddressComponents {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub residential: Option<String>,
    pub municipality: Option<String>,
    pub road: Option<String>,
    pub house_number: Option<String>,
}

impl AddressComponents {
    /// True when no component at all was returned
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Best match for a coordinate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Place {
    pub address: AddressComponents,
    /// Full human-readable address, comma separated from most to least specific
    pub display_name: String,
}

/// Errors raised by a geocoding provider
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request timed out")]
    Timeout,
    #[error("geocoding service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("unexpected geocoding failure: {0}")]
    Unexpected(String),
}

impl GeocodeError {
    /// Timeouts and service-side refusals; anything else is unexpected
    pub fn is_transient(&self) -> bool {
        matches!(self, GeocodeError::Timeout | GeocodeError::ServiceUnavailable(_))
    }
}

/// A reverse geocoding provider.
///
/// `Ok(None)` means the provider answered but found nothing for the
/// coordinate, which is not an error.
pub trait ReverseGeocoder {
    fn reverse(&self, request: &LookupRequest<'_>) -> Result<Option<Place>, GeocodeError>;
}
