//! Reqwest-backed geocoding adapter.
//!
//! This adapter owns transport details only: request building, timeout and
//! HTTP error mapping, and JSON decoding into domain coordinates. The first
//! result wins when the provider returns several candidates.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{GeocodeResponseDto, STATUS_OK, STATUS_ZERO_RESULTS};
use crate::domain::ports::{Geocoder, GeocodingError};
use crate::domain::{Address, Coordinates};

/// Google geocode JSON endpoint used when none is configured.
pub const DEFAULT_GEOCODING_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Geocoder that performs one HTTP GET per address.
pub struct HttpGeocoder {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl HttpGeocoder {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn resolve(&self, address: &Address) -> Result<Coordinates, GeocodingError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("address", address.as_ref()), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let coordinates = parse_coordinates(body.as_ref())?;
        debug!(
            lat = coordinates.lat(),
            lng = coordinates.lng(),
            "geocoded address"
        );
        Ok(coordinates)
    }
}

fn parse_coordinates(body: &[u8]) -> Result<Coordinates, GeocodingError> {
    let decoded: GeocodeResponseDto = serde_json::from_slice(body).map_err(|error| {
        GeocodingError::decode(format!("invalid geocode JSON payload: {error}"))
    })?;

    if decoded.status == STATUS_ZERO_RESULTS {
        return Err(GeocodingError::zero_results());
    }
    if decoded.status != STATUS_OK {
        let message = decoded.error_message.unwrap_or_default();
        return Err(GeocodingError::rejected(decoded.status, message));
    }

    let first = decoded
        .results
        .into_iter()
        .next()
        .ok_or_else(GeocodingError::zero_results)?;
    first
        .geometry
        .location
        .into_domain()
        .map_err(GeocodingError::decode)
}

fn map_transport_error(error: reqwest::Error) -> GeocodingError {
    if error.is_timeout() {
        GeocodingError::timeout(error.to_string())
    } else {
        GeocodingError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GeocodingError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GeocodingError::timeout(format!("status {}", status.as_u16()))
        }
        _ => GeocodingError::status(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
