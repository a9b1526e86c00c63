//! Post domain: types, slugs, and the persistence contract.

mod error;
mod service;
mod slug;
mod types;

pub use error::PostError;
pub use service::{PostRepository, PostService};
pub use slug::generate_slug;
pub use types::{CreatePostInput, ImageRefs, Post, PostDraft, UpdatePostInput};
