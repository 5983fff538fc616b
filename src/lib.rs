//! A guided tour of relational-database access in Rust with [sqlx].
//!
//! Everything that matters here — connection pooling, lazy engine
//! initialization, transaction commit and rollback, statement preparation
//! and row decoding — is done by sqlx and SQLite themselves. This crate
//! only declares two illustrative schemas and sequences calls against
//! them, echoing the SQL it runs along the way.
//!
//! The tour is split across three binaries:
//!
//! - `transactions`: connections, commit-as-you-go, begin-once blocks,
//!   fetching rows, bound parameters.
//! - `metadata`: table metadata, `create_all`, declarative mapped models,
//!   reflection of an existing table.
//! - `working_with_data`: insert statement construction, `RETURNING`,
//!   selects of rows and of mapped objects.
//!
//! [sqlx]: https://docs.rs/sqlx

/// This module contains the engine and connection handling.
pub mod engine;

/// This module contains the declarative mapped models.
pub mod models;

/// This module contains the table metadata and reflection helpers.
pub mod schema;

/// This module contains the prelude for the crate.
pub mod prelude;

pub use engine::{database_url, echo_sql, init_echo, Database};

use std::{future::Future, pin::Pin};

/// The pool type every helper in this crate executes against.
pub type Connection = sqlx::SqlitePool;

type FutRes<'fut, T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send + 'fut>>;

type MigrateFn = for<'m> fn(&'m Connection) -> FutRes<'m, ()>;

/// Registers a mapped model's table so [`Database::migrate`] can emit its
/// DDL, the declarative analogue of `create_all` on the core metadata.
pub struct MigrationRegistrar {
    pub migrate_fn: MigrateFn,
}

inventory::collect!(MigrationRegistrar);
