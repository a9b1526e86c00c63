//! Migration runner for the Quill database.
//!
//! `migrator up` applies pending migrations; `down`, `status`, and `fresh`
//! behave as in any sea-orm-migration CLI.

use quill_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The migration CLI sets up its own tracing.
    cli::run_cli(Migrator).await;
}
