//! Declarative mapped models.
//!
//! `User` and `Address` are the struct-per-table side of the tour: each
//! carries its DDL in `SCHEMA`, derives `sqlx::FromRow` so selects decode
//! straight into it, and registers itself so [`Database::migrate`] creates
//! its table. The helpers below are plain sqlx calls, nothing more.
//!
//! [`Database::migrate`]: crate::Database::migrate

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, FromRow};

use crate::{Connection, FutRes, MigrationRegistrar};

/// A mapped model: a struct tied to one table by name and DDL.
#[async_trait]
pub trait Model {
    const TABLE: &'static str;
    const SCHEMA: &'static str;

    /// Emits this model's DDL, echoing it first.
    fn create_table(conn: &'_ Connection) -> FutRes<'_, ()>
    where
        Self: Sized,
    {
        Box::pin(async move {
            println!("{}", Self::pretty_schema());
            sqlx::query(Self::SCHEMA).execute(conn).await?;
            Ok(())
        })
    }

    /// The model's DDL, formatted for printing.
    fn pretty_schema() -> String {
        sqlformat::format(
            Self::SCHEMA,
            &sqlformat::QueryParams::None,
            &sqlformat::FormatOptions::default(),
        )
    }

    /// Every row of the model's table, in primary-key order.
    async fn all(conn: &Connection) -> Result<Vec<Self>>
    where
        Self: Sized + Unpin + Send + for<'r> FromRow<'r, SqliteRow>,
    {
        let query = format!("SELECT * FROM {} ORDER BY id", Self::TABLE);
        Ok(sqlx::query_as(&query).fetch_all(conn).await?)
    }

    /// The first row of the model's table, if any.
    async fn first(conn: &Connection) -> Result<Option<Self>>
    where
        Self: Sized + Unpin + Send + for<'r> FromRow<'r, SqliteRow>,
    {
        let query = format!("SELECT * FROM {} ORDER BY id", Self::TABLE);
        Ok(sqlx::query_as(&query).fetch_optional(conn).await?)
    }

    async fn count(conn: &Connection) -> Result<i64>
    where
        Self: Sized,
    {
        let query = format!("SELECT count(*) FROM {}", Self::TABLE);
        let (count,): (i64,) = sqlx::query_as(&query).fetch_one(conn).await?;
        Ok(count)
    }
}

#[derive(FromRow, Serialize, Clone, Debug)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub fullname: String,
}

impl Model for User {
    const TABLE: &'static str = "user_account";
    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS user_account (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(30) NOT NULL,
        fullname VARCHAR NOT NULL
    )";
}

inventory::submit! {
    MigrationRegistrar {
        migrate_fn: User::create_table
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User(id={}, name={:?}, fullname={:?})",
            self.id, self.name, self.fullname
        )
    }
}

impl User {
    /// Inserts one user and returns the row the database handed back.
    pub async fn insert(conn: &Connection, name: &str, fullname: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO user_account (name, fullname) VALUES (?, ?)
             RETURNING id, name, fullname",
        )
        .bind(name)
        .bind(fullname)
        .fetch_one(conn)
        .await?;
        Ok(user)
    }

    pub async fn get(conn: &Connection, name: &str) -> Result<Option<User>> {
        Ok(
            sqlx::query_as("SELECT id, name, fullname FROM user_account WHERE name = ?")
                .bind(name)
                .fetch_optional(conn)
                .await?,
        )
    }

    /// The addresses related to this user through the foreign key.
    pub async fn addresses(&self, conn: &Connection) -> Result<Vec<Address>> {
        Ok(sqlx::query_as(
            "SELECT id, user_id, email_address FROM address WHERE user_id = ? ORDER BY id",
        )
        .bind(self.id)
        .fetch_all(conn)
        .await?)
    }
}

#[derive(FromRow, Serialize, Clone, Debug)]
pub struct Address {
    pub id: i64,
    pub user_id: i64,
    pub email_address: String,
}

impl Model for Address {
    const TABLE: &'static str = "address";
    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS address (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        email_address VARCHAR NOT NULL,
        FOREIGN KEY(user_id) REFERENCES user_account(id)
    )";
}

inventory::submit! {
    MigrationRegistrar {
        migrate_fn: Address::create_table
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Address(id={}, email_address={:?})",
            self.id, self.email_address
        )
    }
}

impl Address {
    pub async fn insert(conn: &Connection, user_id: i64, email_address: &str) -> Result<Address> {
        let address = sqlx::query_as::<_, Address>(
            "INSERT INTO address (user_id, email_address) VALUES (?, ?)
             RETURNING id, user_id, email_address",
        )
        .bind(user_id)
        .bind(email_address)
        .fetch_one(conn)
        .await?;
        Ok(address)
    }

    /// Inserts an address for a user looked up by name, the scalar-subquery
    /// form of the insert.
    pub async fn insert_for_user_name(
        conn: &Connection,
        username: &str,
        email_address: &str,
    ) -> Result<Address> {
        let address = sqlx::query_as::<_, Address>(
            "INSERT INTO address (user_id, email_address)
             VALUES ((SELECT id FROM user_account WHERE name = ?), ?)
             RETURNING id, user_id, email_address",
        )
        .bind(username)
        .bind(email_address)
        .fetch_one(conn)
        .await?;
        Ok(address)
    }
}
