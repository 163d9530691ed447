//! Place data model.
//!
//! Places carry a geocoded location derived from their address. The
//! `creator` is fixed at creation; only title and description change later.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ImagePath, UserId};

/// Minimum number of characters in a place description.
pub const DESCRIPTION_MIN: usize = 5;

/// Validation errors returned by the place value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceValidationError {
    EmptyId,
    InvalidId,
    EmptyTitle,
    DescriptionTooShort { min: usize },
    EmptyAddress,
    LatitudeOutOfRange,
    LongitudeOutOfRange,
}

impl fmt::Display for PlaceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "place id must not be empty"),
            Self::InvalidId => write!(f, "place id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::DescriptionTooShort { min } => {
                write!(f, "description must be at least {min} characters")
            }
            Self::EmptyAddress => write!(f, "address must not be empty"),
            Self::LatitudeOutOfRange => write!(f, "latitude must be within [-90, 90]"),
            Self::LongitudeOutOfRange => write!(f, "longitude must be within [-180, 180]"),
        }
    }
}

impl std::error::Error for PlaceValidationError {}

/// Stable place identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(Uuid);

impl PlaceId {
    /// Validate and construct a [`PlaceId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PlaceValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(PlaceValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(PlaceValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| PlaceValidationError::InvalidId)
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! text_value {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

text_value!(
    /// Non-empty place title.
    PlaceTitle
);
text_value!(
    /// Place description of at least [`DESCRIPTION_MIN`] characters.
    PlaceDescription
);
text_value!(
    /// Free-text postal address submitted for geocoding.
    Address
);

impl PlaceTitle {
    pub fn new(title: impl AsRef<str>) -> Result<Self, PlaceValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PlaceValidationError::EmptyTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl PlaceDescription {
    /// The length check counts characters, not bytes.
    pub fn new(description: impl AsRef<str>) -> Result<Self, PlaceValidationError> {
        let trimmed = description.as_ref().trim();
        if trimmed.chars().count() < DESCRIPTION_MIN {
            return Err(PlaceValidationError::DescriptionTooShort {
                min: DESCRIPTION_MIN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl Address {
    pub fn new(address: impl AsRef<str>) -> Result<Self, PlaceValidationError> {
        let trimmed = address.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PlaceValidationError::EmptyAddress);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// WGS84 coordinates resolved from an address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, PlaceValidationError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(PlaceValidationError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(PlaceValidationError::LongitudeOutOfRange);
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Shared place record.
///
/// ## Invariants
/// - `creator` references an existing user whose place list contains `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    id: PlaceId,
    title: PlaceTitle,
    description: PlaceDescription,
    address: Address,
    location: Coordinates,
    image: ImagePath,
    creator: UserId,
}

impl Place {
    pub fn new(id: PlaceId, draft: PlaceDraft, creator: UserId) -> Self {
        let PlaceDraft {
            title,
            description,
            address,
            location,
            image,
        } = draft;
        Self {
            id,
            title,
            description,
            address,
            location,
            image,
            creator,
        }
    }

    pub fn id(&self) -> PlaceId {
        self.id
    }

    pub fn title(&self) -> &PlaceTitle {
        &self.title
    }

    pub fn description(&self) -> &PlaceDescription {
        &self.description
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn location(&self) -> Coordinates {
        self.location
    }

    pub fn image(&self) -> &ImagePath {
        &self.image
    }

    pub fn creator(&self) -> UserId {
        self.creator
    }

    /// Replace the mutable details, leaving location, image and creator intact.
    #[must_use]
    pub fn with_details(mut self, details: PlaceDetails) -> Self {
        self.title = details.title;
        self.description = details.description;
        self
    }
}

/// Geocoded place awaiting insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDraft {
    pub title: PlaceTitle,
    pub description: PlaceDescription,
    pub address: Address,
    pub location: Coordinates,
    pub image: ImagePath,
}

/// Owner-editable fields of a place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceDetails {
    pub title: PlaceTitle,
    pub description: PlaceDescription,
}

/// Validated input for creating a place, prior to geocoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlaceRequest {
    pub title: PlaceTitle,
    pub description: PlaceDescription,
    pub address: Address,
    pub image: ImagePath,
    pub creator: UserId,
}
