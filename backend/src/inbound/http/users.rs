//! Users API handlers.
//!
//! ```text
//! GET   /api/users
//! POST  /api/users/signup           multipart: name, email, password, image
//! POST  /api/users/login            {"email":"ana@x.com","password":"secret1"}
//! PATCH /api/users/forgot-password  {"email":"ana@x.com","password":"secret2"}
//! ```

use actix_multipart::Multipart;
use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthSession, EmailAddress, Error, LoginCredentials, Password, PasswordResetRequest,
    SignupRequest, User, UserName,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::multipart::{discard_image, read_form, store_image};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{EMAIL, NAME, PASSWORD, parse_field};

/// Email and password body for login and password reset.
///
/// Example JSON:
/// `{"email":"ana@x.com","password":"secret1"}`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Multipart signup form, documented for OpenAPI only.
#[derive(ToSchema)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Identity and bearer token returned by signup, login and reset.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
    #[schema(example = "ana@x.com")]
    pub email: String,
    pub token: String,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user_id: session.user_id.to_string(),
            email: session.email.as_ref().to_owned(),
            token: session.token.as_ref().to_owned(),
        }
    }
}

/// Public view of a user; the password hash is never serialised.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    #[schema(example = "uploads/images/3f1c2d1e-0c6b-4a8e-9d7e-2f9b6f0a1c2d.png")]
    pub image: String,
    /// Ids of the places this user created, oldest first.
    pub places: Vec<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            image: user.image().as_ref().to_owned(),
            places: user.places().iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<UserResponse>,
}

/// List registered users.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = UsersResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<UsersResponse>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(UsersResponse {
        users: users.iter().map(UserResponse::from).collect(),
    }))
}

/// Register an account with an avatar image.
///
/// The avatar is stored before the account is created and removed again if
/// signup fails.
#[utoipa::path(
    post,
    path = "/api/users/signup",
    request_body(content = SignupForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 422, description = "Invalid input or email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/users/signup")]
pub async fn signup(state: web::Data<HttpState>, payload: Multipart) -> ApiResult<HttpResponse> {
    let mut form = read_form(payload, &[NAME, EMAIL, PASSWORD]).await?;
    let name = parse_field(NAME, UserName::new(form.text(NAME)?))?;
    let email = parse_field(EMAIL, EmailAddress::new(form.text(EMAIL)?))?;
    let password = parse_field(PASSWORD, Password::new(form.text(PASSWORD)?))?;
    let upload = form.take_image()?;

    let image = store_image(state.images.as_ref(), &upload).await?;
    let request = SignupRequest {
        name,
        email,
        password,
        image: image.clone(),
    };
    match state.accounts.signup(request).await {
        Ok(session) => Ok(HttpResponse::Created().json(SessionResponse::from(session))),
        Err(err) => {
            discard_image(state.images.as_ref(), &image).await;
            Err(err)
        }
    }
}

/// Exchange email and password for a bearer token.
///
/// Unknown emails and wrong passwords are indistinguishable to the client.
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse),
        (status = 403, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let credentials = LoginCredentials::new(&payload.email, &payload.password);
    let session = state.accounts.login(&credentials).await?;
    Ok(web::Json(session.into()))
}

/// Replace the password of an existing account.
///
/// Answers with a fresh session; the original handler sent no success body.
#[utoipa::path(
    patch,
    path = "/api/users/forgot-password",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Password replaced", body = SessionResponse),
        (status = 422, description = "Invalid input or unknown account", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "resetPassword",
    security([])
)]
#[patch("/users/forgot-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let CredentialsRequest { email, password } = payload.into_inner();
    let request = PasswordResetRequest {
        email: parse_field(EMAIL, EmailAddress::new(&email))?,
        password: parse_field(PASSWORD, Password::new(password))?,
    };
    let session = state.accounts.reset_password(request).await?;
    Ok(web::Json(session.into()))
}

#[cfg(test)]
mod tests;
