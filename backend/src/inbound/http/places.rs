//! Places API handlers.
//!
//! ```text
//! GET    /api/places/{pid}
//! GET    /api/places/user/{uid}
//! POST   /api/places        bearer; multipart: title, description, address, image
//! PATCH  /api/places/{pid}  bearer; {"title":"...","description":"..."}
//! DELETE /api/places/{pid}  bearer
//! ```

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Address, AuthenticatedUser, Error, NewPlaceRequest, Place, PlaceDescription, PlaceDetails,
    PlaceTitle,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::multipart::{discard_image, read_form, store_image};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ADDRESS, DESCRIPTION, TITLE, parse_field, parse_place_id, parse_user_id,
};

/// Message returned after a successful delete.
pub const DELETED_MESSAGE: &str = "Deleted place.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct LocationResponse {
    pub lat: f64,
    pub lng: f64,
}

/// Public view of a place.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlaceResponse {
    pub id: String,
    #[schema(example = "Empire State Building")]
    pub title: String,
    pub description: String,
    #[schema(example = "uploads/images/3f1c2d1e-0c6b-4a8e-9d7e-2f9b6f0a1c2d.jpeg")]
    pub image: String,
    #[schema(example = "20 W 34th St, New York, NY 10001")]
    pub address: String,
    pub location: LocationResponse,
    /// Id of the user who created the place.
    pub creator: String,
}

impl From<&Place> for PlaceResponse {
    fn from(place: &Place) -> Self {
        let location = place.location();
        Self {
            id: place.id().to_string(),
            title: place.title().as_ref().to_owned(),
            description: place.description().as_ref().to_owned(),
            image: place.image().as_ref().to_owned(),
            address: place.address().as_ref().to_owned(),
            location: LocationResponse {
                lat: location.lat(),
                lng: location.lng(),
            },
            creator: place.creator().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlaceEnvelope {
    pub place: PlaceResponse,
}

impl From<&Place> for PlaceEnvelope {
    fn from(place: &Place) -> Self {
        Self {
            place: place.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlacesEnvelope {
    pub places: Vec<PlaceResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Multipart place form, documented for OpenAPI only.
#[derive(ToSchema)]
pub struct NewPlaceForm {
    pub title: String,
    pub description: String,
    pub address: String,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Body for `PATCH /api/places/{pid}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatePlaceRequest {
    pub title: String,
    pub description: String,
}

/// Fetch one place.
#[utoipa::path(
    get,
    path = "/api/places/{pid}",
    params(("pid" = String, Path, description = "Place id")),
    responses(
        (status = 200, description = "Place", body = PlaceEnvelope),
        (status = 404, description = "Unknown place", body = Error),
        (status = 422, description = "Malformed id", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["places"],
    operation_id = "getPlace",
    security([])
)]
#[get("/places/{pid}")]
pub async fn get_place(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PlaceEnvelope>> {
    let id = parse_place_id(&path)?;
    let place = state.places_query.place_by_id(&id).await?;
    Ok(web::Json(PlaceEnvelope::from(&place)))
}

/// List the places a user created.
///
/// An unknown user and a user without places both answer 404.
#[utoipa::path(
    get,
    path = "/api/places/user/{uid}",
    params(("uid" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Places of the user", body = PlacesEnvelope),
        (status = 404, description = "Unknown user or no places", body = Error),
        (status = 422, description = "Malformed id", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["places"],
    operation_id = "getPlacesByUser",
    security([])
)]
#[get("/places/user/{uid}")]
pub async fn get_places_by_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PlacesEnvelope>> {
    let user_id = parse_user_id(&path)?;
    let places = state.places_query.places_by_user(&user_id).await?;
    Ok(web::Json(PlacesEnvelope {
        places: places.iter().map(PlaceResponse::from).collect(),
    }))
}

/// Create a place for the authenticated user.
///
/// The image is stored first and removed again if creation fails.
#[utoipa::path(
    post,
    path = "/api/places",
    request_body(content = NewPlaceForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Place created", body = PlaceEnvelope),
        (status = 403, description = "Authentication failed", body = Error),
        (status = 404, description = "Creator not found", body = Error),
        (status = 422, description = "Invalid input or address not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["places"],
    operation_id = "createPlace"
)]
#[post("/places")]
pub async fn create_place(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let mut form = read_form(payload, &[TITLE, DESCRIPTION, ADDRESS]).await?;
    let title = parse_field(TITLE, PlaceTitle::new(form.text(TITLE)?))?;
    let description = parse_field(DESCRIPTION, PlaceDescription::new(form.text(DESCRIPTION)?))?;
    let address = parse_field(ADDRESS, Address::new(form.text(ADDRESS)?))?;
    let upload = form.take_image()?;

    let image = store_image(state.images.as_ref(), &upload).await?;
    let request = NewPlaceRequest {
        title,
        description,
        address,
        image: image.clone(),
        creator: user.user_id(),
    };
    match state.places.create_place(request).await {
        Ok(place) => Ok(HttpResponse::Created().json(PlaceEnvelope::from(&place))),
        Err(err) => {
            discard_image(state.images.as_ref(), &image).await;
            Err(err)
        }
    }
}

/// Replace a place's title and description.
#[utoipa::path(
    patch,
    path = "/api/places/{pid}",
    params(("pid" = String, Path, description = "Place id")),
    request_body = UpdatePlaceRequest,
    responses(
        (status = 200, description = "Place updated", body = PlaceEnvelope),
        (status = 403, description = "Authentication failed", body = Error),
        (status = 404, description = "Unknown place", body = Error),
        (status = 422, description = "Invalid input", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["places"],
    operation_id = "updatePlace"
)]
#[patch("/places/{pid}")]
pub async fn update_place(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdatePlaceRequest>,
) -> ApiResult<web::Json<PlaceEnvelope>> {
    let id = parse_place_id(&path)?;
    let UpdatePlaceRequest { title, description } = payload.into_inner();
    let details = PlaceDetails {
        title: parse_field(TITLE, PlaceTitle::new(title))?,
        description: parse_field(DESCRIPTION, PlaceDescription::new(description))?,
    };
    let place = state.places.update_place(&id, details, &user).await?;
    Ok(web::Json(PlaceEnvelope::from(&place)))
}

/// Delete a place owned by the authenticated user.
#[utoipa::path(
    delete,
    path = "/api/places/{pid}",
    params(("pid" = String, Path, description = "Place id")),
    responses(
        (status = 200, description = "Place deleted", body = MessageResponse),
        (status = 403, description = "Not authenticated or not the owner", body = Error),
        (status = 404, description = "Unknown place", body = Error),
        (status = 422, description = "Malformed id", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["places"],
    operation_id = "deletePlace"
)]
#[delete("/places/{pid}")]
pub async fn delete_place(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_place_id(&path)?;
    state.places.delete_place(&id, &user).await?;
    Ok(web::Json(MessageResponse {
        message: DELETED_MESSAGE.to_owned(),
    }))
}

#[cfg(test)]
mod tests;
