//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockAccountCommand, MockImageStore, MockPlacesCommand, MockPlacesQuery, MockTokenService,
    MockUsersQuery,
};

use super::state::HttpState;

/// Mocked driving and driven ports used to build an [`HttpState`].
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub users: MockUsersQuery,
    pub places: MockPlacesCommand,
    pub places_query: MockPlacesQuery,
    pub images: MockImageStore,
    pub tokens: MockTokenService,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            accounts: Arc::new(self.accounts),
            users: Arc::new(self.users),
            places: Arc::new(self.places),
            places_query: Arc::new(self.places_query),
            images: Arc::new(self.images),
            tokens: Arc::new(self.tokens),
        })
    }
}

/// Minimal `multipart/form-data` body builder for handler tests.
pub struct MultipartBody {
    boundary: &'static str,
    body: Vec<u8>,
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self {
            boundary: "places-test-boundary",
            body: Vec::new(),
        }
    }
}

impl MultipartBody {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        let part = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
            self.boundary
        );
        self.body.extend_from_slice(part.as_bytes());
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        let head = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
            self.boundary
        );
        self.body.extend_from_slice(head.as_bytes());
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Return the `Content-Type` header value and the encoded body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}
