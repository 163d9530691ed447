//! Tests for users API handlers.

use super::*;
use crate::domain::ports::ImageStoreError;
use crate::domain::{AuthToken, ImagePath, PasswordHash, PlaceId, UserId};
use crate::inbound::http::error::{INVALID_INPUT_MESSAGE, json_error_handler};
use crate::inbound::http::test_utils::{MockPorts, MultipartBody};
use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

const STORED: &str = "uploads/images/3f1c2d1e-0c6b-4a8e-9d7e-2f9b6f0a1c2d.png";

fn session(email: &str) -> AuthSession {
    AuthSession {
        user_id: UserId::random(),
        email: EmailAddress::new(email).expect("email"),
        token: AuthToken::new("signed.jwt.token").expect("token"),
    }
}

async fn call(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(ports.into_state())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(
                web::scope("/api")
                    .service(list_users)
                    .service(signup)
                    .service(login)
                    .service(reset_password),
            ),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn signup_request(body: MultipartBody) -> actix_test::TestRequest {
    let (content_type, bytes) = body.finish();
    actix_test::TestRequest::post()
        .uri("/api/users/signup")
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(bytes)
}

fn signup_form() -> MultipartBody {
    MultipartBody::default()
        .text("name", "Ana")
        .text("email", " Ana@X.com ")
        .text("password", "secret1")
        .file("image", "ana.png", "image/png", b"\x89PNG")
}

fn stored_path() -> ImagePath {
    ImagePath::new(STORED).expect("path")
}

#[actix_web::test]
async fn signup_creates_the_account_with_the_stored_image() {
    let mut ports = MockPorts::default();
    ports.images.expect_store().times(1).returning(|_| Ok(stored_path()));
    ports.images.expect_remove().never();
    ports
        .accounts
        .expect_signup()
        .withf(|request| {
            request.name.as_ref() == "Ana"
                && request.email.as_ref() == "ana@x.com"
                && request.password.expose() == "secret1"
                && request.image.as_ref() == STORED
        })
        .return_once(|_| Ok(session("ana@x.com")));

    let (status, body) = call(ports, signup_request(signup_form())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "ana@x.com");
    assert_eq!(body["token"], "signed.jwt.token");
    assert!(body["userId"].as_str().is_some());
}

#[rstest]
#[case::blank_name(MultipartBody::default().text("name", "  ").text("email", "ana@x.com").text("password", "secret1"), "name")]
#[case::bad_email(MultipartBody::default().text("name", "Ana").text("email", "ana").text("password", "secret1"), "email")]
#[case::short_password(MultipartBody::default().text("name", "Ana").text("email", "ana@x.com").text("password", "12345"), "password")]
#[case::missing_image(MultipartBody::default().text("name", "Ana").text("email", "ana@x.com").text("password", "secret1"), "image")]
#[case::unexpected_part(signup_form().text("role", "admin"), "role")]
#[case::repeated_part(MultipartBody::default().text("name", "Ana").text("name", "Bea"), "name")]
#[actix_web::test]
async fn signup_validation_failures_store_nothing(
    #[case] form: MultipartBody,
    #[case] field: &str,
) {
    let mut ports = MockPorts::default();
    ports.images.expect_store().never();
    ports.accounts.expect_signup().never();

    let (status, body) = call(ports, signup_request(form)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], INVALID_INPUT_MESSAGE);
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn failed_signup_discards_the_uploaded_image() {
    let mut ports = MockPorts::default();
    ports.images.expect_store().returning(|_| Ok(stored_path()));
    ports
        .images
        .expect_remove()
        .withf(|path| path.as_ref() == STORED)
        .times(1)
        .returning(|_| Ok(()));
    ports
        .accounts
        .expect_signup()
        .return_once(|_| Err(Error::conflict("User exists already, please login instead.")));

    let (status, body) = call(ports, signup_request(signup_form())).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "User exists already, please login instead.");
}

#[actix_web::test]
async fn discard_failures_do_not_mask_the_original_error() {
    let mut ports = MockPorts::default();
    ports.images.expect_store().returning(|_| Ok(stored_path()));
    ports
        .images
        .expect_remove()
        .returning(|_| Err(ImageStoreError::io("disk gone")));
    ports
        .accounts
        .expect_signup()
        .return_once(|_| Err(Error::internal("Signing up failed, please try again later.")));

    let (status, body) = call(ports, signup_request(signup_form())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Signing up failed, please try again later.");
}

#[actix_web::test]
async fn login_passes_normalised_credentials() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_login()
        .withf(|credentials| {
            credentials.email() == "ana@x.com" && credentials.password() == "secret1"
        })
        .return_once(|_| Ok(session("ana@x.com")));

    let request = actix_test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({"email": "ANA@x.com", "password": "secret1"}));
    let (status, body) = call(ports, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "signed.jwt.token");
}

#[actix_web::test]
async fn rejected_login_is_forbidden() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_login()
        .return_once(|_| Err(Error::unauthorized("Invalid credentials, could not log you in.")));

    let request = actix_test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({"email": "ana@x.com", "password": "wrong"}));
    let (status, body) = call(ports, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid credentials, could not log you in.");
}

#[actix_web::test]
async fn malformed_json_is_a_validation_error() {
    let mut ports = MockPorts::default();
    ports.accounts.expect_login().never();

    let request = actix_test::TestRequest::post()
        .uri("/api/users/login")
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload("{\"email\":");
    let (status, body) = call(ports, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["code"], "invalid_json");
}

#[actix_web::test]
async fn reset_password_returns_a_fresh_session() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_reset_password()
        .withf(|request| request.email.as_ref() == "ana@x.com" && request.password.expose() == "secret2")
        .return_once(|_| Ok(session("ana@x.com")));

    let request = actix_test::TestRequest::patch()
        .uri("/api/users/forgot-password")
        .set_json(json!({"email": "ana@x.com", "password": "secret2"}));
    let (status, body) = call(ports, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ana@x.com");
    assert_eq!(body["token"], "signed.jwt.token");
}

#[rstest]
#[case::short_password(json!({"email": "ana@x.com", "password": "123"}), "password")]
#[case::bad_email(json!({"email": "nope", "password": "secret2"}), "email")]
#[actix_web::test]
async fn reset_password_validates_input(#[case] payload: Value, #[case] field: &str) {
    let mut ports = MockPorts::default();
    ports.accounts.expect_reset_password().never();

    let request = actix_test::TestRequest::patch()
        .uri("/api/users/forgot-password")
        .set_json(payload);
    let (status, body) = call(ports, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn list_users_hides_password_hashes() {
    let place = PlaceId::random();
    let user = User::new(
        UserId::random(),
        UserName::new("Ana").expect("name"),
        EmailAddress::new("ana@x.com").expect("email"),
        PasswordHash::new("$2b$04$secret-hash").expect("hash"),
        stored_path(),
        vec![place],
    );
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_list_users()
        .return_once(move || Ok(vec![user]));

    let (status, body) = call(ports, actix_test::TestRequest::get().uri("/api/users")).await;

    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().expect("users array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "Ana");
    assert_eq!(users[0]["places"][0], place.to_string());
    assert!(!body.to_string().contains("secret-hash"));
}
