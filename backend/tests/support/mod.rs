//! Shared harness for HTTP flow tests.
//!
//! Wires the real account and place services, bcrypt, JWT and the local image
//! store to an in-memory user/place store and a table-driven geocoder. The
//! store applies place writes and owner list updates under one lock, and can
//! be told to fail place writes to exercise all-or-nothing behaviour.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use mockable::DefaultClock;
use serde_json::Value;
use tempfile::TempDir;

use places_backend::Trace;
use places_backend::domain::ports::{
    Geocoder, GeocodingError, PlacePersistenceError, PlaceRepository, UserPersistenceError,
    UserRepository,
};
use places_backend::domain::{
    AccountService, Address, Coordinates, EmailAddress, NewUser, PasswordHash, Place,
    PlaceDetails, PlaceDraft, PlaceId, PlaceService, User, UserId,
};
use places_backend::inbound::http::app::{configure_api, cors_headers, fallback};
use places_backend::inbound::http::state::HttpState;
use places_backend::outbound::security::{BcryptPasswordHasher, JwtTokenService};
use places_backend::outbound::storage::LocalImageStore;

/// Signing key used by every flow test.
pub const TOKEN_SECRET: &[u8] = b"flow-tests-signing-key-0123456789abcdef";

/// Bytes uploaded as every test image.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nflow-test-image";

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    places: Vec<Place>,
}

/// Users and places behind a single lock.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    fail_place_writes: AtomicBool,
}

fn with_places(user: &User, places: Vec<PlaceId>) -> User {
    User::new(
        user.id(),
        user.name().clone(),
        user.email().clone(),
        user.password_hash().clone(),
        user.image().clone(),
        places,
    )
}

impl InMemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every following place create or delete fail before writing.
    pub fn fail_place_writes(&self, fail: bool) {
        self.fail_place_writes.store(fail, Ordering::SeqCst);
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.tables().users.iter().find(|user| user.id() == id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }

    pub fn place(&self, id: PlaceId) -> Option<Place> {
        self.tables().places.iter().find(|place| place.id() == id).cloned()
    }

    pub fn place_count(&self) -> usize {
        self.tables().places.len()
    }

    fn check_writes(&self) -> Result<(), PlacePersistenceError> {
        if self.fail_place_writes.load(Ordering::SeqCst) {
            return Err(PlacePersistenceError::query("injected write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.user(*id))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.tables().users.clone())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|existing| existing.email() == &user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        let created = User::new(
            UserId::random(),
            user.name.clone(),
            user.email.clone(),
            user.password_hash.clone(),
            user.image.clone(),
            Vec::new(),
        );
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables();
        let user = tables
            .users
            .iter_mut()
            .find(|user| user.id() == *id)
            .ok_or_else(|| UserPersistenceError::not_found(id.to_string()))?;
        *user = User::new(
            user.id(),
            user.name().clone(),
            user.email().clone(),
            password_hash.clone(),
            user.image().clone(),
            user.places().to_vec(),
        );
        Ok(())
    }
}

#[async_trait]
impl PlaceRepository for InMemoryStore {
    async fn find_by_id(&self, id: &PlaceId) -> Result<Option<Place>, PlacePersistenceError> {
        Ok(self.place(*id))
    }

    async fn list_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Option<Vec<Place>>, PlacePersistenceError> {
        let tables = self.tables();
        let Some(user) = tables.users.iter().find(|user| user.id() == *owner) else {
            return Ok(None);
        };
        let places = user
            .places()
            .iter()
            .filter_map(|id| tables.places.iter().find(|place| place.id() == *id).cloned())
            .collect();
        Ok(Some(places))
    }

    async fn create_for_owner(
        &self,
        draft: &PlaceDraft,
        owner: &UserId,
    ) -> Result<Place, PlacePersistenceError> {
        self.check_writes()?;
        let mut tables = self.tables();
        let Some(index) = tables.users.iter().position(|user| user.id() == *owner) else {
            return Err(PlacePersistenceError::owner_not_found(owner.to_string()));
        };
        let place = Place::new(PlaceId::random(), draft.clone(), *owner);
        if let Some(user) = tables.users.get_mut(index) {
            let mut list = user.places().to_vec();
            list.push(place.id());
            *user = with_places(user, list);
        }
        tables.places.push(place.clone());
        Ok(place)
    }

    async fn update_details(
        &self,
        id: &PlaceId,
        details: &PlaceDetails,
    ) -> Result<Option<Place>, PlacePersistenceError> {
        let mut tables = self.tables();
        let Some(place) = tables.places.iter_mut().find(|place| place.id() == *id) else {
            return Ok(None);
        };
        *place = place.clone().with_details(details.clone());
        Ok(Some(place.clone()))
    }

    async fn delete_for_owner(
        &self,
        id: &PlaceId,
        owner: &UserId,
    ) -> Result<(), PlacePersistenceError> {
        self.check_writes()?;
        let mut tables = self.tables();
        let before = tables.places.len();
        tables
            .places
            .retain(|place| !(place.id() == *id && place.creator() == *owner));
        if tables.places.len() == before {
            return Err(PlacePersistenceError::not_found(id.to_string()));
        }
        if let Some(user) = tables.users.iter_mut().find(|user| user.id() == *owner) {
            let list = user.places().iter().copied().filter(|pid| pid != id).collect();
            *user = with_places(user, list);
        }
        Ok(())
    }
}

/// Geocoder answering from a fixed table; unknown addresses have no result.
#[derive(Default)]
pub struct TableGeocoder {
    known: Mutex<HashMap<String, Coordinates>>,
    calls: AtomicUsize,
}

impl TableGeocoder {
    pub fn knows(&self, address: &str, lat: f64, lng: f64) {
        let coordinates = Coordinates::new(lat, lng).expect("valid coordinates");
        self.known
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address.to_owned(), coordinates);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for TableGeocoder {
    async fn resolve(&self, address: &Address) -> Result<Coordinates, GeocodingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.known
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address.as_ref())
            .copied()
            .ok_or_else(GeocodingError::zero_results)
    }
}

/// Everything a flow test needs to drive and inspect the API.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub geocoder: Arc<TableGeocoder>,
    pub tokens: Arc<JwtTokenService>,
    pub state: web::Data<HttpState>,
    uploads: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let uploads = tempfile::tempdir().expect("upload dir");
        let store = Arc::new(InMemoryStore::default());
        let geocoder = Arc::new(TableGeocoder::default());
        let tokens = Arc::new(
            JwtTokenService::new(TOKEN_SECRET, Duration::from_secs(3600), Arc::new(DefaultClock))
                .expect("token service"),
        );
        let images = Arc::new(LocalImageStore::open(uploads.path()).expect("image store"));
        let accounts = Arc::new(AccountService::new(
            store.clone(),
            Arc::new(BcryptPasswordHasher::new(4)),
            tokens.clone(),
        ));
        let places = Arc::new(PlaceService::new(
            store.clone(),
            store.clone(),
            geocoder.clone(),
            images.clone(),
        ));
        let state = web::Data::new(HttpState {
            accounts: accounts.clone(),
            users: accounts,
            places: places.clone(),
            places_query: places,
            images,
            tokens: tokens.clone(),
        });
        Self {
            store,
            geocoder,
            tokens,
            state,
            uploads,
        }
    }

    /// Number of files currently held by the image store.
    pub fn stored_images(&self) -> usize {
        Dir::open_ambient_dir(self.uploads.path(), ambient_authority())
            .expect("open uploads")
            .entries()
            .expect("list uploads")
            .count()
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(cors_headers())
            .wrap(Trace)
            .configure(configure_api)
            .default_service(web::to(fallback))
    }
}

/// Call the service and decode the body as JSON (`Null` when empty).
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = actix_test::call_service(app, req).await;
    let status = res.status();
    let body = actix_test::read_body(res).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, json)
}

/// Read a string field from a JSON body.
pub fn text<'a>(body: &'a Value, pointer: &str) -> &'a str {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing {pointer} in {body}"))
}

const BOUNDARY: &str = "flow-test-boundary";

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
struct Form {
    body: Vec<u8>,
}

impl Form {
    fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    fn png(mut self) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"pic.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(PNG_BYTES);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn into_request(mut self, req: actix_test::TestRequest) -> Request {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        req.insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(self.body)
        .to_request()
    }
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

pub fn signup_request(name: &str, email: &str, password: &str) -> Request {
    Form::default()
        .text("name", name)
        .text("email", email)
        .text("password", password)
        .png()
        .into_request(actix_test::TestRequest::post().uri("/api/users/signup"))
}

/// Signup form carrying one part the endpoint does not accept.
pub fn signup_request_with_part(email: &str, part: &str, value: &str) -> Request {
    Form::default()
        .text("name", "User")
        .text("email", email)
        .text("password", "secret1")
        .png()
        .text(part, value)
        .into_request(actix_test::TestRequest::post().uri("/api/users/signup"))
}

pub fn login_request(email: &str, password: &str) -> Request {
    actix_test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(serde_json::json!({ "email": email, "password": password }))
        .to_request()
}

pub fn reset_request(email: &str, password: &str) -> Request {
    actix_test::TestRequest::patch()
        .uri("/api/users/forgot-password")
        .set_json(serde_json::json!({ "email": email, "password": password }))
        .to_request()
}

pub fn create_place_request(token: &str, title: &str, description: &str, address: &str) -> Request {
    Form::default()
        .text("title", title)
        .text("description", description)
        .text("address", address)
        .png()
        .into_request(
            actix_test::TestRequest::post()
                .uri("/api/places")
                .insert_header(bearer(token)),
        )
}

pub fn update_place_request(token: &str, pid: &str, title: &str, description: &str) -> Request {
    actix_test::TestRequest::patch()
        .uri(&format!("/api/places/{pid}"))
        .insert_header(bearer(token))
        .set_json(serde_json::json!({ "title": title, "description": description }))
        .to_request()
}

pub fn delete_place_request(token: &str, pid: &str) -> Request {
    actix_test::TestRequest::delete()
        .uri(&format!("/api/places/{pid}"))
        .insert_header(bearer(token))
        .to_request()
}

pub fn get_request(uri: &str) -> Request {
    actix_test::TestRequest::get().uri(uri).to_request()
}

pub fn user_id(body: &Value) -> UserId {
    UserId::new(text(body, "/userId")).expect("user id")
}

pub fn place_id(body: &Value) -> PlaceId {
    PlaceId::new(text(body, "/place/id")).expect("place id")
}
