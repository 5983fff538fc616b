//! Engine construction and the SQL echo.
//!
//! The [`Database`] here is a thin handle on a `sqlx::SqlitePool`. The pool
//! is built with `connect_lazy`, so no connection is opened until the first
//! statement runs against it — the same lazy-initialization contract the
//! tour's binaries call out before issuing their first query.

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;

use crate::{Connection, MigrationRegistrar};

/// A database handle: the pool plus the echo flag controlling whether the
/// tour prints each statement it is about to run.
pub struct Database {
    pub conn: Connection,
    echo: bool,
}

impl Database {
    /// Builds the engine from a connection string. Lazy: returns without
    /// touching the database at all.
    pub fn new(database_url: &str) -> Result<Self> {
        let conn = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)?;
        Ok(Self { conn, echo: false })
    }

    /// Turns statement echoing on or off.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Echoes a statement if this handle was built with `echo(true)`.
    pub fn log(&self, statement: &str) {
        if self.echo {
            echo_sql(statement);
        }
    }

    /// Forces the first real connection, ending the lazy phase.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.conn).await?;
        Ok(())
    }

    /// Emits the DDL of every registered mapped model.
    pub async fn migrate(&self) -> Result<()> {
        for model in inventory::iter::<MigrationRegistrar> {
            (model.migrate_fn)(&self.conn).await?;
        }
        Ok(())
    }
}

/// Reads `DATABASE_URL` from the environment (or `.env`), falling back to a
/// shared-cache in-memory SQLite database so the tour runs out of the box.
pub fn database_url() -> String {
    dotenv::dotenv().ok();
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:file:tour?mode=memory&cache=shared".to_string())
}

/// Pretty-prints a statement through the tracing pipeline.
pub fn echo_sql(statement: &str) {
    let formatted = sqlformat::format(
        statement,
        &sqlformat::QueryParams::None,
        &sqlformat::FormatOptions::default(),
    );
    tracing::info!("\n{formatted}");
}

/// Installs the tracing subscriber the binaries log through. `RUST_LOG`
/// overrides the default `info` filter.
pub fn init_echo() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}
