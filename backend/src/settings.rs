//! Application settings loaded via OrthoConfig.
//!
//! Values layer from defaults, an optional configuration file, `PLACES_*`
//! environment variables and command-line flags. Keys without a sensible
//! default stay optional here and are enforced by the `require_*` accessors
//! so startup can report every missing key by name.

use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::geocoding::DEFAULT_GEOCODING_ENDPOINT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_TOKEN_SECRET_FILE: &str = "/var/run/secrets/token_secret";
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;
const DEFAULT_GEOCODING_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_UPLOAD_DIR: &str = "uploads/images";

/// Work factors bcrypt accepts.
const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// Reasons the loaded settings cannot start the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting `{key}` (env PLACES_{env})")]
    Missing { key: &'static str, env: String },
    #[error("setting `{key}` is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl SettingsError {
    fn missing(key: &'static str) -> Self {
        Self::Missing {
            key,
            env: key.to_ascii_uppercase(),
        }
    }

    fn invalid(key: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            reason: reason.to_string(),
        }
    }
}

/// Runtime configuration for the places API server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PLACES")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the bearer token signing key.
    pub token_secret_file: Option<PathBuf>,
    /// Bearer token lifetime in seconds.
    pub token_ttl_seconds: Option<u64>,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: Option<u32>,
    /// API key for the geocoding provider.
    pub geocoding_api_key: Option<String>,
    /// Geocoding provider endpoint.
    pub geocoding_endpoint: Option<String>,
    /// Outbound geocoding request timeout in seconds.
    pub geocoding_timeout_seconds: Option<u64>,
    /// Directory holding uploaded images.
    pub upload_dir: Option<PathBuf>,
}

impl AppSettings {
    /// Parse the listen address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err| SettingsError::invalid("bind_addr", err))
    }

    /// Return the database URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when unset or blank.
    pub fn require_database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| SettingsError::missing("database_url"))
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn token_secret_file(&self) -> &Path {
        self.token_secret_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_TOKEN_SECRET_FILE))
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_seconds.unwrap_or(DEFAULT_TOKEN_TTL_SECONDS))
    }

    /// Return the bcrypt work factor.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when the cost is outside 4 to 31.
    pub fn bcrypt_cost(&self) -> Result<u32, SettingsError> {
        let cost = self.bcrypt_cost.unwrap_or(bcrypt::DEFAULT_COST);
        if BCRYPT_COST_RANGE.contains(&cost) {
            Ok(cost)
        } else {
            Err(SettingsError::invalid(
                "bcrypt_cost",
                format!(
                    "{cost} is outside {}..={}",
                    BCRYPT_COST_RANGE.start(),
                    BCRYPT_COST_RANGE.end()
                ),
            ))
        }
    }

    /// Return the geocoding API key.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when unset or blank.
    pub fn require_geocoding_api_key(&self) -> Result<&str, SettingsError> {
        self.geocoding_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SettingsError::missing("geocoding_api_key"))
    }

    /// Parse the geocoding endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when the value is not a URL.
    pub fn geocoding_endpoint(&self) -> Result<Url, SettingsError> {
        Url::parse(
            self.geocoding_endpoint
                .as_deref()
                .unwrap_or(DEFAULT_GEOCODING_ENDPOINT),
        )
        .map_err(|err| SettingsError::invalid("geocoding_endpoint", err))
    }

    pub fn geocoding_timeout(&self) -> Duration {
        Duration::from_secs(
            self.geocoding_timeout_seconds
                .unwrap_or(DEFAULT_GEOCODING_TIMEOUT_SECONDS),
        )
    }

    pub fn upload_dir(&self) -> &Path {
        self.upload_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_UPLOAD_DIR))
    }
}
