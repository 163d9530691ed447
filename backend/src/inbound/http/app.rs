//! Route table and cross-cutting response behaviour for the REST surface.
//!
//! The server binary and the integration suite assemble their apps from the
//! same pieces so the routing under test is the routing that ships.

use actix_web::http::{Method, header};
use actix_web::middleware::DefaultHeaders;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::debug;

use super::error::json_error_handler;
use super::{places, users};
use crate::domain::Error;

/// Message for requests that match no route.
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Could not find this route.";

const ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept, Authorization";
const ALLOW_METHODS: &str = "GET, POST, PATCH, DELETE";

/// Register the `/api` scope with every user and place endpoint.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use places_backend::inbound::http::app::configure_api;
///
/// let _app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api")
                .service(users::list_users)
                .service(users::signup)
                .service(users::login)
                .service(users::reset_password)
                .service(places::get_places_by_user)
                .service(places::get_place)
                .service(places::create_place)
                .service(places::update_place)
                .service(places::delete_place),
        );
}

/// Permissive CORS headers added to every response.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
}

/// Default service: answer preflight requests, reject everything else.
///
/// Preflight requests never reach a handler, so they bypass authentication.
pub async fn fallback(req: HttpRequest) -> Result<HttpResponse, Error> {
    if req.method() == Method::OPTIONS {
        return Ok(HttpResponse::NoContent().finish());
    }
    debug!(method = %req.method(), path = %req.path(), "no route matched");
    Err(Error::not_found(ROUTE_NOT_FOUND_MESSAGE))
}
