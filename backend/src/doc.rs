//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api`, the health checks, the
//! request and response DTOs, and the bearer token security scheme. Swagger
//! UI serves it in debug builds; `openapi-dump` prints it for tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::health::HealthResponse;
use crate::inbound::http::places::{
    LocationResponse, MessageResponse, NewPlaceForm, PlaceEnvelope, PlaceResponse, PlacesEnvelope,
    UpdatePlaceRequest,
};
use crate::inbound::http::users::{
    CredentialsRequest, SessionResponse, SignupForm, UserResponse, UsersResponse,
};

/// Name of the bearer token security scheme.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some(
                "Token returned by signup, login or password reset; valid for one hour.",
            ))
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Places API",
        description = "Share places with a geocoded address and a picture.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::reset_password,
        crate::inbound::http::places::get_place,
        crate::inbound::http::places::get_places_by_user,
        crate::inbound::http::places::create_place,
        crate::inbound::http::places::update_place,
        crate::inbound::http::places::delete_place,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CredentialsRequest,
        SignupForm,
        SessionResponse,
        UserResponse,
        UsersResponse,
        LocationResponse,
        PlaceResponse,
        PlaceEnvelope,
        PlacesEnvelope,
        MessageResponse,
        NewPlaceForm,
        UpdatePlaceRequest,
        HealthResponse,
    )),
    tags(
        (name = "users", description = "Accounts and credentials"),
        (name = "places", description = "Geocoded places owned by users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
