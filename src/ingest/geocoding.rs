/// OpenCage forward geocoding client.
///
/// Turns free-text locations ("Peoria, IL", a street address, a ZIP code)
/// into a `LocationProfile`:
///   https://api.opencagedata.com/geocode/v1/json?q=...&key=...
///
/// Only the best match is used. OpenCage reports the locality under
/// `city`, `town` or `village` depending on settlement size; the first one
/// present wins.

use serde::Deserialize;
use tracing::debug;

use super::{Geocoder, SourceError, read_body};
use crate::model::{Coordinates, LocationProfile};

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    components: Components,
    #[serde(default)]
    formatted: String,
    geometry: Geometry,
}

#[derive(Deserialize, Default)]
struct Components {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
}

#[derive(Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

// ---------------------------------------------------------------------------
// URL construction and parsing
// ---------------------------------------------------------------------------

pub fn build_geocode_url(base_url: &str, query: &str, api_key: &str) -> String {
    format!(
        "{}?q={}&key={}&limit=1&no_annotations=1",
        base_url,
        urlencoding::encode(query),
        urlencoding::encode(api_key)
    )
}

/// Parses an OpenCage response body.
///
/// Returns `Ok(None)` when the service answered with no results.
///
/// # Errors
/// `SourceError::Parse` when the body is not a geocoding response.
pub fn parse_geocode_response(json: &str) -> Result<Option<LocationProfile>, SourceError> {
    let response: GeocodeResponse =
        serde_json::from_str(json).map_err(|e| SourceError::Parse(e.to_string()))?;

    let Some(best) = response.results.into_iter().next() else {
        return Ok(None);
    };

    let components = best.components;
    let city = components
        .city
        .or(components.town)
        .or(components.village)
        .unwrap_or_default();

    Ok(Some(LocationProfile {
        city,
        state: components.state.unwrap_or_default(),
        zip_code: components.postcode.unwrap_or_default(),
        formatted_address: best.formatted,
        coordinates: Coordinates {
            lat: best.geometry.lat,
            lng: best.geometry.lng,
        },
    }))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct OpenCageGeocoder {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl OpenCageGeocoder {
    pub fn new(client: reqwest::blocking::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        OpenCageGeocoder {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl Geocoder for OpenCageGeocoder {
    fn resolve(&self, query: &str) -> Result<Option<LocationProfile>, SourceError> {
        let url = build_geocode_url(&self.base_url, query, &self.api_key);
        debug!(query, "Geocoding location");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()?;

        parse_geocode_response(&read_body(response)?)
    }
}
