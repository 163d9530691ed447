//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection uses the same client message with a 422 status; the
//! `details` object names the offending field so clients can highlight it.

use std::fmt::Display;

use serde_json::json;

use crate::domain::{Error, PlaceId, UserId};

use super::error::INVALID_INPUT_MESSAGE;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const IMAGE: FieldName = FieldName::new("image");
pub(crate) const TITLE: FieldName = FieldName::new("title");
pub(crate) const DESCRIPTION: FieldName = FieldName::new("description");
pub(crate) const ADDRESS: FieldName = FieldName::new("address");
pub(crate) const PLACE_ID: FieldName = FieldName::new("pid");
pub(crate) const USER_ID: FieldName = FieldName::new("uid");

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    Error::invalid_request(INVALID_INPUT_MESSAGE).with_details(json!({
        "field": field.as_str(),
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_field_error(field: FieldName, reason: impl Display) -> Error {
    Error::invalid_request(INVALID_INPUT_MESSAGE).with_details(json!({
        "field": field.as_str(),
        "code": ErrorCode::InvalidValue.as_str(),
        "reason": reason.to_string(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    Error::invalid_request(INVALID_INPUT_MESSAGE).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

/// Validate one field with a domain constructor, mapping its error.
pub(crate) fn parse_field<T, E: Display>(
    field: FieldName,
    parsed: Result<T, E>,
) -> Result<T, Error> {
    parsed.map_err(|err| invalid_field_error(field, err))
}

pub(crate) fn parse_place_id(value: &str) -> Result<PlaceId, Error> {
    PlaceId::new(value).map_err(|_| invalid_uuid_error(PLACE_ID, value))
}

pub(crate) fn parse_user_id(value: &str) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_uuid_error(USER_ID, value))
}
