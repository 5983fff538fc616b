//! Core-style table metadata.
//!
//! [`Table`] and [`Column`] describe a schema the way the tour's metadata
//! chapter builds it up column by column: the actual DDL emission, typing
//! and constraint enforcement all belong to SQLite. [`reflect`] goes the
//! other way and reads an existing table's shape back out of the database.

use anyhow::Result;
use serde::Serialize;
use sqlx::Row;

use crate::Connection;

/// A single column description.
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub primary_key: bool,
    pub nullable: bool,
    pub references: Option<&'static str>,
}

impl Column {
    pub const fn new(name: &'static str, sql_type: &'static str) -> Self {
        Self {
            name,
            sql_type,
            primary_key: false,
            nullable: true,
            references: None,
        }
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks this column as a foreign key, `references` being the
    /// `table(column)` target.
    pub const fn foreign_key(mut self, references: &'static str) -> Self {
        self.references = Some(references);
        self
    }

    fn ddl(&self) -> String {
        let mut out = format!("{} {}", self.name, self.sql_type);
        if self.primary_key {
            out.push_str(" PRIMARY KEY");
        } else if !self.nullable {
            out.push_str(" NOT NULL");
        }
        out
    }
}

/// A table description: a name plus its columns, in declaration order.
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl Table {
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn primary_key(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name)
            .collect()
    }

    /// Renders the `CREATE TABLE` statement for this description.
    pub fn ddl(&self) -> String {
        let mut defs: Vec<String> = self.columns.iter().map(Column::ddl).collect();
        for column in self.columns {
            if let Some(references) = column.references {
                defs.push(format!("FOREIGN KEY({}) REFERENCES {references}", column.name));
            }
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            defs.join(", ")
        )
    }

    pub async fn create(&self, conn: &Connection) -> Result<()> {
        sqlx::query(&self.ddl()).execute(conn).await?;
        Ok(())
    }
}

/// The user table of the tour's two-table schema.
pub const USER_TABLE: Table = Table {
    name: "user_account",
    columns: &[
        Column::new("id", "INTEGER").primary_key(),
        Column::new("name", "VARCHAR(30)").not_null(),
        Column::new("fullname", "VARCHAR").not_null(),
    ],
};

/// The address table, linked to `user_account` by foreign key.
pub const ADDRESS_TABLE: Table = Table {
    name: "address",
    columns: &[
        Column::new("id", "INTEGER").primary_key(),
        Column::new("user_id", "INTEGER")
            .not_null()
            .foreign_key("user_account(id)"),
        Column::new("email_address", "VARCHAR").not_null(),
    ],
};

/// Every table registered in this metadata, in dependency order.
pub const METADATA: &[&Table] = &[&USER_TABLE, &ADDRESS_TABLE];

/// Emits the DDL for every table in [`METADATA`].
pub async fn create_all(conn: &Connection) -> Result<()> {
    for table in METADATA {
        table.create(conn).await?;
    }
    Ok(())
}

/// One column as reported back by the database.
#[derive(Debug, Serialize)]
pub struct ReflectedColumn {
    pub name: String,
    pub sql_type: String,
    pub nullable: bool,
    pub primary_key: bool,
}

/// Reads a table's columns back from SQLite, the reflection counterpart of
/// declaring them up front.
pub async fn reflect(conn: &Connection, table: &str) -> Result<Vec<ReflectedColumn>> {
    // PRAGMA arguments cannot be bound, so the table name is formatted in.
    let rows = sqlx::query(&format!("PRAGMA table_info({table})"))
        .fetch_all(conn)
        .await?;
    Ok(rows
        .iter()
        .map(|row| ReflectedColumn {
            name: row.get("name"),
            sql_type: row.get("type"),
            nullable: row.get::<i64, _>("notnull") == 0,
            primary_key: row.get::<i64, _>("pk") != 0,
        })
        .collect())
}
