//! `SeaORM` entity definitions.

pub mod posts;
pub mod sessions;
pub mod users;
