//! Repositories wrapping the `SeaORM` entities; the rest of the application
//! goes through these, never through the entities directly.

pub mod post;
pub mod session;
pub mod user;

pub use post::PostRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
