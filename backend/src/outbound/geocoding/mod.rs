//! Geocoding outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `Geocoder` port
//! against a Google-compatible geocode JSON endpoint.

mod dto;
mod http_geocoder;

pub use http_geocoder::{DEFAULT_GEOCODING_ENDPOINT, HttpGeocoder};
