//! Uploaded image references.

use std::fmt;

/// Largest accepted upload, in bytes.
pub const MAX_IMAGE_BYTES: usize = 500_000;

/// Validation errors for image uploads and stored paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageValidationError {
    EmptyPath,
    UnsupportedType { content_type: String },
    TooLarge { max: usize },
    Empty,
}

impl fmt::Display for ImageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "image path must not be empty"),
            Self::UnsupportedType { content_type } => {
                write!(f, "unsupported image type: {content_type}")
            }
            Self::TooLarge { max } => write!(f, "image must be at most {max} bytes"),
            Self::Empty => write!(f, "image must not be empty"),
        }
    }
}

impl std::error::Error for ImageValidationError {}

/// Relative path of a stored image, as served under the public uploads prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePath(String);

impl ImagePath {
    pub fn new(path: impl Into<String>) -> Result<Self, ImageValidationError> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(ImageValidationError::EmptyPath);
        }
        Ok(Self(path))
    }
}

impl AsRef<str> for ImagePath {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Accepted image formats and their stored file extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Map a MIME essence (`image/png`) to a supported kind.
    pub fn from_content_type(content_type: &str) -> Result<Self, ImageValidationError> {
        match content_type {
            "image/png" => Ok(Self::Png),
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            other => Err(ImageValidationError::UnsupportedType {
                content_type: other.to_owned(),
            }),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

/// Image bytes received from a client, checked for type and size.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    kind: ImageKind,
    bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(kind: ImageKind, bytes: Vec<u8>) -> Result<Self, ImageValidationError> {
        if bytes.is_empty() {
            return Err(ImageValidationError::Empty);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageValidationError::TooLarge {
                max: MAX_IMAGE_BYTES,
            });
        }
        Ok(Self { kind, bytes })
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("kind", &self.kind)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("image/png", ImageKind::Png)]
    #[case("image/jpeg", ImageKind::Jpeg)]
    #[case("image/jpg", ImageKind::Jpeg)]
    fn supported_types_map_to_kinds(#[case] content_type: &str, #[case] expected: ImageKind) {
        assert_eq!(
            ImageKind::from_content_type(content_type).expect("supported"),
            expected
        );
    }

    #[rstest]
    #[case("image/gif")]
    #[case("application/pdf")]
    fn unsupported_types_are_rejected(#[case] content_type: &str) {
        assert!(matches!(
            ImageKind::from_content_type(content_type),
            Err(ImageValidationError::UnsupportedType { .. })
        ));
    }

    #[rstest]
    fn size_limits_are_enforced() {
        assert_eq!(
            ImageUpload::new(ImageKind::Png, Vec::new()).expect_err("empty"),
            ImageValidationError::Empty
        );
        assert_eq!(
            ImageUpload::new(ImageKind::Png, vec![0; MAX_IMAGE_BYTES + 1]).expect_err("large"),
            ImageValidationError::TooLarge {
                max: MAX_IMAGE_BYTES
            }
        );
        assert!(ImageUpload::new(ImageKind::Jpeg, vec![0; MAX_IMAGE_BYTES]).is_ok());
    }
}
