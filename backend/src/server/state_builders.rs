//! Wiring from settings to outbound adapters and domain services.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultClock;
use zeroize::Zeroizing;

use places_backend::domain::{AccountService, PlaceService};
use places_backend::inbound::http::state::HttpState;
use places_backend::outbound::geocoding::HttpGeocoder;
use places_backend::outbound::persistence::{DbPool, DieselPlaceRepository, DieselUserRepository};
use places_backend::outbound::security::{BcryptPasswordHasher, JwtTokenService};
use places_backend::outbound::storage::LocalImageStore;
use places_backend::settings::AppSettings;

/// Build the handler state from a live pool and the token signing key.
///
/// # Errors
///
/// Fails when a setting is missing or malformed, the signing key is
/// rejected, the image directory cannot be opened, or the HTTP client
/// cannot be built.
pub fn build_http_state(
    settings: &AppSettings,
    pool: &DbPool,
    token_secret: &Zeroizing<Vec<u8>>,
) -> Result<HttpState> {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let places = Arc::new(DieselPlaceRepository::new(pool.clone()));

    let geocoder = Arc::new(
        HttpGeocoder::new(
            settings.geocoding_endpoint()?,
            settings.require_geocoding_api_key()?,
            settings.geocoding_timeout(),
        )
        .wrap_err("building geocoding client")?,
    );
    let hasher = Arc::new(BcryptPasswordHasher::new(settings.bcrypt_cost()?));
    let tokens = Arc::new(
        JwtTokenService::new(token_secret, settings.token_ttl(), Arc::new(DefaultClock))
            .wrap_err("configuring bearer tokens")?,
    );
    let upload_dir = settings.upload_dir();
    let images = Arc::new(
        LocalImageStore::open(upload_dir)
            .wrap_err_with(|| format!("opening image directory {}", upload_dir.display()))?,
    );

    let accounts = Arc::new(AccountService::new(users.clone(), hasher, tokens.clone()));
    let place_service = Arc::new(PlaceService::new(places, users, geocoder, images.clone()));

    Ok(HttpState {
        accounts: accounts.clone(),
        users: accounts,
        places: place_service.clone(),
        places_query: place_service,
        images,
        tokens,
    })
}
