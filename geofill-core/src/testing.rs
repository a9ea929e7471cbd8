//! Test doubles shared by the unit tests

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::geocoder::{GeocodeError, LookupRequest, Place, ReverseGeocoder};

type Response = Result<Option<Place>, GeocodeError>;

/// Geocoder that replays canned responses and records every request.
///
/// Once the script runs out it answers "nothing found", or the configured
/// error for [`ScriptedGeocoder::failing`].
pub(crate) struct ScriptedGeocoder {
    responses: RefCell<VecDeque<Response>>,
    fallback: Option<Box<dyn Fn() -> GeocodeError>>,
    requests: RefCell<Vec<(f64, f64, String)>>,
}

impl ScriptedGeocoder {
    pub(crate) fn new(responses: Vec<Response>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            fallback: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Every request fails with the error `make_error` builds
    pub(crate) fn failing(make_error: impl Fn() -> GeocodeError + 'static) -> Self {
        Self {
            fallback: Some(Box::new(make_error)),
            ..Self::new(Vec::new())
        }
    }

    /// `(lat, lng, language)` of each request, in order
    pub(crate) fn requests(&self) -> Vec<(f64, f64, String)> {
        self.requests.borrow().clone()
    }
}

impl ReverseGeocoder for ScriptedGeocoder {
    fn reverse(&self, request: &LookupRequest<'_>) -> Result<Option<Place>, GeocodeError> {
        self.requests
            .borrow_mut()
            .push((request.lat, request.lng, request.language.to_string()));

        match self.responses.borrow_mut().pop_front() {
            Some(response) => response,
            None => match &self.fallback {
                Some(make_error) => Err(make_error()),
                None => Ok(None),
            },
        }
    }
}
