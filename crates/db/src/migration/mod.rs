//! Schema migrations, run through `sea-orm-migration`.

pub use sea_orm_migration::prelude::*;

mod m20260801_000001_initial;
mod m20260801_000002_sessions;

/// Migrator listing every migration in order.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_initial::Migration),
            Box::new(m20260801_000002_sessions::Migration),
        ]
    }
}
