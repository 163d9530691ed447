//! Image storage adapters.

mod local_image_store;

pub use local_image_store::{LocalImageStore, PUBLIC_IMAGE_PREFIX};
