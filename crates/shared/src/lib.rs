//! Types every Quill crate agrees on: configuration, the error taxonomy,
//! the JWT service with its auth payloads, and pagination envelopes.

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, TokenPair};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
