//! Persistence layer: `SeaORM` entities, migrations, and repositories.
//!
//! The post repository also implements the core crate's persistence traits,
//! so domain services never see `SeaORM` types.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{PostRepository, SessionRepository, UserRepository};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Opens a connection pool against the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options.max_connections(max_connections);
    Database::connect(options).await
}
