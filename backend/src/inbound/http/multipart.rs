//! `multipart/form-data` decoding for signup and place creation.
//!
//! Each endpoint names the text parts it accepts. Unknown or repeated parts
//! are rejected before their body is read, so a form buffers at most one
//! image of [`MAX_IMAGE_BYTES`] plus [`TEXT_TOTAL_LIMIT`] bytes of text. The
//! `image` part is size- and type-checked while it streams in. Uploaded
//! images are persisted only after every text field validated, and a stored
//! image is discarded again when the use-case fails.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::ports::ImageStore;
use crate::domain::{
    Error, ImageKind, ImagePath, ImageUpload, ImageValidationError, MAX_IMAGE_BYTES,
};

use super::error::INVALID_INPUT_MESSAGE;
use super::validation::{FieldName, IMAGE, invalid_field_error, missing_field_error};

/// Largest accepted text part, in bytes.
const TEXT_FIELD_LIMIT: usize = 16 * 1024;

/// Largest accepted sum of all text parts, in bytes.
const TEXT_TOTAL_LIMIT: usize = 32 * 1024;

/// Message for uploads that could not be written to storage.
pub const IMAGE_STORE_FAILED: &str = "Storing the image failed, please try again.";

/// Decoded multipart form.
#[derive(Debug, Default)]
pub(crate) struct FormFields {
    text: HashMap<&'static str, String>,
    image: Option<ImageUpload>,
}

impl FormFields {
    /// Text value of `field`; absent parts are a validation failure.
    pub(crate) fn text(&self, field: FieldName) -> Result<&str, Error> {
        self.text
            .get(field.as_str())
            .map(String::as_str)
            .ok_or_else(|| missing_field_error(field))
    }

    pub(crate) fn take_image(&mut self) -> Result<ImageUpload, Error> {
        self.image.take().ok_or_else(|| missing_field_error(IMAGE))
    }
}

fn rejected_part(name: &str, code: &str) -> Error {
    debug!(field = name, code, "multipart part rejected");
    Error::invalid_request(INVALID_INPUT_MESSAGE)
        .with_details(json!({ "field": name, "code": code }))
}

fn malformed(err: &actix_multipart::MultipartError) -> Error {
    debug!(error = %err, "malformed multipart payload");
    Error::invalid_request(INVALID_INPUT_MESSAGE).with_details(json!({ "code": "invalid_multipart" }))
}

/// Read a part into memory, failing once it exceeds `limit` bytes.
async fn read_limited(field: &mut Field, limit: usize) -> Result<Option<Vec<u8>>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|err| malformed(&err))? {
        if bytes.len() + chunk.len() > limit {
            return Ok(None);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Some(bytes))
}

async fn read_image(field: &mut Field) -> Result<ImageUpload, Error> {
    let essence = field
        .content_type()
        .map(|mime| mime.essence_str().to_owned())
        .unwrap_or_default();
    let kind =
        ImageKind::from_content_type(&essence).map_err(|err| invalid_field_error(IMAGE, err))?;
    let bytes = read_limited(field, MAX_IMAGE_BYTES).await?.ok_or_else(|| {
        invalid_field_error(
            IMAGE,
            ImageValidationError::TooLarge {
                max: MAX_IMAGE_BYTES,
            },
        )
    })?;
    ImageUpload::new(kind, bytes).map_err(|err| invalid_field_error(IMAGE, err))
}

/// Decode a multipart request that may carry `text_fields` and one `image`.
pub(crate) async fn read_form(
    mut payload: Multipart,
    text_fields: &[FieldName],
) -> Result<FormFields, Error> {
    let mut form = FormFields::default();
    let mut text_bytes = 0_usize;
    while let Some(mut field) = payload.try_next().await.map_err(|err| malformed(&err))? {
        let name = field.name().unwrap_or_default().to_owned();
        if name == IMAGE.as_str() {
            if form.image.is_some() {
                return Err(rejected_part(&name, "duplicate_field"));
            }
            form.image = Some(read_image(&mut field).await?);
            continue;
        }
        let Some(known) = text_fields.iter().find(|f| f.as_str() == name) else {
            return Err(rejected_part(&name, "unexpected_field"));
        };
        if form.text.contains_key(known.as_str()) {
            return Err(rejected_part(&name, "duplicate_field"));
        }
        let limit = TEXT_FIELD_LIMIT.min(TEXT_TOTAL_LIMIT - text_bytes);
        let bytes = read_limited(&mut field, limit)
            .await?
            .ok_or_else(|| rejected_part(&name, "field_too_long"))?;
        text_bytes += bytes.len();
        let value = String::from_utf8(bytes).map_err(|_| rejected_part(&name, "invalid_utf8"))?;
        form.text.insert(known.as_str(), value);
    }
    Ok(form)
}

/// Persist an upload, mapping storage failures to an internal error.
pub(crate) async fn store_image(
    images: &dyn ImageStore,
    upload: &ImageUpload,
) -> Result<ImagePath, Error> {
    images.store(upload).await.map_err(|err| {
        error!(error = %err, "{IMAGE_STORE_FAILED}");
        Error::internal(IMAGE_STORE_FAILED)
    })
}

/// Remove an image stored for a request that then failed.
pub(crate) async fn discard_image(images: &dyn ImageStore, path: &ImagePath) {
    if let Err(err) = images.remove(path).await {
        warn!(error = %err, %path, "failed to discard uploaded image");
    }
}
