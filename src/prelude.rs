pub use sqlx::FromRow;

pub use super::engine::{database_url, echo_sql, init_echo};
pub use super::models::{Address, Model, User};
pub use super::schema;
pub use super::{Connection, Database, MigrationRegistrar};
pub use chrono;
