//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the ledger schema
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Repositories are the narrow persistence interface the engine depends
//! on: account snapshots, open-period checks, entry posting with atomic
//! number allocation, and posted-line queries for reports.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, EntryRepository, PeriodRepository, ReportRepository, SequenceRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
