//! Image lifecycle: uploads, the editor gallery, and orphan cleanup.
//!
//! Uploads validate locally before touching the store, galleries track the
//! URLs attached to the post being composed, and cleanup reconciles an
//! owner's stored objects against every URL their posts still reference.

mod cleanup;
mod error;
mod gallery;
mod service;

pub use cleanup::{CleanupService, ImageRefSource};
pub use error::ImageError;
pub use gallery::Gallery;
pub use service::{BatchReport, FailedUpload, ImageService, ImageUpload, UploadPolicy, UploadedImage};
