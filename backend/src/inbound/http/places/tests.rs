//! Tests for places API handlers.

use super::*;
use crate::domain::ports::TokenError;
use crate::domain::{Coordinates, ImagePath, PlaceDraft, PlaceId, UserId};
use crate::inbound::http::auth::AUTH_FAILED_MESSAGE;
use crate::inbound::http::error::INVALID_INPUT_MESSAGE;
use crate::inbound::http::test_utils::{MockPorts, MultipartBody};
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const STORED: &str = "uploads/images/0b5d1a7e-3c5e-4b0e-8f1e-6d0c2a9b4e71.jpeg";

#[fixture]
fn owner() -> UserId {
    UserId::random()
}

fn place(id: PlaceId, creator: UserId) -> Place {
    Place::new(
        id,
        PlaceDraft {
            title: PlaceTitle::new("Empire State Building").expect("title"),
            description: PlaceDescription::new("A famous skyscraper").expect("description"),
            address: Address::new("20 W 34th St, New York, NY 10001").expect("address"),
            location: Coordinates::new(40.748_440_5, -73.985_664_4).expect("coordinates"),
            image: ImagePath::new(STORED).expect("image"),
        },
        creator,
    )
}

/// Ports whose token service accepts `Bearer good` as `user`.
fn signed_in(user: UserId) -> MockPorts {
    let mut ports = MockPorts::default();
    ports.tokens.expect_verify().returning(move |token| {
        if token == "good" {
            Ok(AuthenticatedUser::new(user, "ana@x.com"))
        } else {
            Err(TokenError::invalid("bad signature"))
        }
    });
    ports
}

async fn call(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new().app_data(ports.into_state()).service(
            web::scope("/api")
                .service(get_places_by_user)
                .service(get_place)
                .service(create_place)
                .service(update_place)
                .service(delete_place),
        ),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn create_request(body: MultipartBody, bearer: Option<&str>) -> actix_test::TestRequest {
    let (content_type, bytes) = body.finish();
    let mut request = actix_test::TestRequest::post()
        .uri("/api/places")
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(bytes);
    if let Some(token) = bearer {
        request = request.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    request
}

fn place_form() -> MultipartBody {
    MultipartBody::default()
        .text("title", "Empire State Building")
        .text("description", "A famous skyscraper")
        .text("address", "20 W 34th St, New York, NY 10001")
        .file("image", "esb.jpg", "image/jpeg", &[0xff, 0xd8, 0xff])
}

#[rstest]
#[actix_web::test]
async fn get_place_wraps_the_place(owner: UserId) {
    let id = PlaceId::random();
    let mut ports = MockPorts::default();
    ports
        .places_query
        .expect_place_by_id()
        .withf(move |requested| *requested == id)
        .return_once(move |_| Ok(place(id, owner)));

    let uri = format!("/api/places/{id}");
    let (status, body) = call(ports, actix_test::TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["place"]["id"], id.to_string());
    assert_eq!(body["place"]["creator"], owner.to_string());
    assert_eq!(body["place"]["location"]["lat"], 40.748_440_5);
    assert_eq!(body["place"]["image"], STORED);
}

#[actix_web::test]
async fn malformed_place_ids_are_rejected_before_the_service() {
    let mut ports = MockPorts::default();
    ports.places_query.expect_place_by_id().never();

    let (status, body) =
        call(ports, actix_test::TestRequest::get().uri("/api/places/p1")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["field"], "pid");
}

#[rstest]
#[actix_web::test]
async fn places_by_user_lists_every_place(owner: UserId) {
    let ids = [PlaceId::random(), PlaceId::random()];
    let mut ports = MockPorts::default();
    ports
        .places_query
        .expect_places_by_user()
        .withf(move |user| *user == owner)
        .return_once(move |_| Ok(ids.iter().map(|id| place(*id, owner)).collect()));

    let uri = format!("/api/places/user/{owner}");
    let (status, body) = call(ports, actix_test::TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    let places = body["places"].as_array().expect("places");
    assert_eq!(places.len(), 2);
    assert_eq!(places[1]["id"], ids[1].to_string());
}

#[rstest]
#[actix_web::test]
async fn places_by_user_surfaces_not_found(owner: UserId) {
    let mut ports = MockPorts::default();
    ports
        .places_query
        .expect_places_by_user()
        .return_once(|_| Err(Error::not_found("Could not find places for the provided user id.")));

    let uri = format!("/api/places/user/{owner}");
    let (status, body) = call(ports, actix_test::TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Could not find places for the provided user id.");
}

#[rstest]
#[actix_web::test]
async fn create_place_uses_the_token_identity_as_creator(owner: UserId) {
    let mut ports = signed_in(owner);
    ports
        .images
        .expect_store()
        .times(1)
        .returning(|_| Ok(ImagePath::new(STORED).expect("path")));
    ports.images.expect_remove().never();
    ports
        .places
        .expect_create_place()
        .withf(move |request| {
            request.creator == owner
                && request.title.as_ref() == "Empire State Building"
                && request.image.as_ref() == STORED
        })
        .return_once(move |_| Ok(place(PlaceId::random(), owner)));

    let (status, body) = call(ports, create_request(place_form(), Some("good"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["place"]["creator"], owner.to_string());
}

#[rstest]
#[case::missing(None)]
#[case::forged(Some("forged"))]
#[actix_web::test]
async fn create_place_requires_a_valid_token(owner: UserId, #[case] bearer: Option<&str>) {
    let mut ports = signed_in(owner);
    ports.images.expect_store().never();
    ports.places.expect_create_place().never();

    let (status, body) = call(ports, create_request(place_form(), bearer)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], AUTH_FAILED_MESSAGE);
}

#[rstest]
#[actix_web::test]
async fn short_descriptions_are_rejected_without_storing(owner: UserId) {
    let mut ports = signed_in(owner);
    ports.images.expect_store().never();
    ports.places.expect_create_place().never();
    let form = MultipartBody::default()
        .text("title", "Tower")
        .text("description", "abc")
        .text("address", "Somewhere 1")
        .file("image", "t.png", "image/png", b"\x89PNG");

    let (status, body) = call(ports, create_request(form, Some("good"))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], INVALID_INPUT_MESSAGE);
    assert_eq!(body["details"]["field"], "description");
}

#[rstest]
#[actix_web::test]
async fn failed_creation_discards_the_image(owner: UserId) {
    let mut ports = signed_in(owner);
    ports
        .images
        .expect_store()
        .returning(|_| Ok(ImagePath::new(STORED).expect("path")));
    ports
        .images
        .expect_remove()
        .withf(|path| path.as_ref() == STORED)
        .times(1)
        .returning(|_| Ok(()));
    ports.places.expect_create_place().return_once(|_| {
        Err(Error::invalid_request(
            "Could not find location for the specified address.",
        ))
    });

    let (status, body) = call(ports, create_request(place_form(), Some("good"))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Could not find location for the specified address.");
}

#[rstest]
#[actix_web::test]
async fn update_place_passes_details_and_requester(owner: UserId) {
    let id = PlaceId::random();
    let mut ports = signed_in(owner);
    ports
        .places
        .expect_update_place()
        .withf(move |requested, details, requester| {
            *requested == id
                && details.title.as_ref() == "ESB"
                && details.description.as_ref() == "Still a skyscraper"
                && requester.user_id() == owner
        })
        .return_once(move |_, details, _| Ok(place(id, owner).with_details(details)));

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/api/places/{id}"))
        .insert_header((AUTHORIZATION, "Bearer good"))
        .set_json(json!({"title": "ESB", "description": "Still a skyscraper"}));
    let (status, body) = call(ports, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["place"]["title"], "ESB");
}

#[rstest]
#[actix_web::test]
async fn update_place_validates_the_body(owner: UserId) {
    let mut ports = signed_in(owner);
    ports.places.expect_update_place().never();

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/api/places/{}", PlaceId::random()))
        .insert_header((AUTHORIZATION, "Bearer good"))
        .set_json(json!({"title": " ", "description": "Still a skyscraper"}));
    let (status, body) = call(ports, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["field"], "title");
}

#[rstest]
#[actix_web::test]
async fn delete_place_confirms_with_a_message(owner: UserId) {
    let id = PlaceId::random();
    let mut ports = signed_in(owner);
    ports
        .places
        .expect_delete_place()
        .withf(move |requested, requester| *requested == id && requester.user_id() == owner)
        .return_once(|_, _| Ok(()));

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/places/{id}"))
        .insert_header((AUTHORIZATION, "Bearer good"));
    let (status, body) = call(ports, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], DELETED_MESSAGE);
}

#[rstest]
#[actix_web::test]
async fn delete_by_non_owner_is_forbidden(owner: UserId) {
    let mut ports = signed_in(owner);
    ports
        .places
        .expect_delete_place()
        .return_once(|_, _| Err(Error::forbidden("You are not allowed to delete this place.")));

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/places/{}", PlaceId::random()))
        .insert_header((AUTHORIZATION, "Bearer good"));
    let (status, body) = call(ports, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You are not allowed to delete this place.");
}
