//! DTOs for decoding geocode JSON responses.
//!
//! Only the fields the adapter reads are modelled; everything else in the
//! provider payload is ignored.

use serde::Deserialize;

use crate::domain::Coordinates;

/// Provider status for a successful lookup.
pub(super) const STATUS_OK: &str = "OK";
/// Provider status for an address with no match.
pub(super) const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeResponseDto {
    pub(super) status: String,
    #[serde(default)]
    pub(super) results: Vec<GeocodeResultDto>,
    #[serde(default)]
    pub(super) error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeResultDto {
    pub(super) geometry: GeometryDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeometryDto {
    pub(super) location: LocationDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocationDto {
    pub(super) lat: f64,
    pub(super) lng: f64,
}

impl LocationDto {
    pub(super) fn into_domain(self) -> Result<Coordinates, String> {
        Coordinates::new(self.lat, self.lng).map_err(|error| error.to_string())
    }
}
