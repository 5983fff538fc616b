//! Working with database metadata.
//!
//! The same two tables, described twice: first as core-style `Table`
//! metadata built column by column, then as declarative mapped models that
//! carry their own DDL. The chapter ends by reflecting a table the other
//! tour binaries create with raw SQL.

use anyhow::Result;
use sqlx_tour::prelude::*;
use sqlx_tour::schema::{create_all, reflect, ADDRESS_TABLE, METADATA, USER_TABLE};

#[tokio::main]
async fn main() -> Result<()> {
    init_echo();

    let db = Database::new(&database_url())?.echo(true);

    // Core-style metadata: the table objects know their columns before
    // anything exists in the database.
    println!("{}.c: {:?}", USER_TABLE.name, USER_TABLE.column_names());
    println!("primary key: {:?}", USER_TABLE.primary_key());
    println!("{}.c: {:?}", ADDRESS_TABLE.name, ADDRESS_TABLE.column_names());
    println!("primary key: {:?}", ADDRESS_TABLE.primary_key());

    // Emitting DDL for everything the metadata holds.
    for table in METADATA {
        db.log(&table.ddl());
    }
    create_all(&db.conn).await?;

    // The declarative side: each mapped model carries the same schema.
    println!("{} is mapped to {:?}", User::TABLE, USER_TABLE.column_names());
    println!(
        "{} is mapped to {:?}",
        Address::TABLE,
        ADDRESS_TABLE.column_names()
    );
    db.migrate().await?;

    // A table created with plain SQL, reflected back out of the database.
    sqlx::query("CREATE TABLE IF NOT EXISTS some_table (x int, y int)")
        .execute(&db.conn)
        .await?;
    let columns = reflect(&db.conn, "some_table").await?;
    println!("some_table.c: {}", serde_json::to_string_pretty(&columns)?);

    let columns = reflect(&db.conn, User::TABLE).await?;
    println!(
        "{}.c: {}",
        User::TABLE,
        serde_json::to_string_pretty(&columns)?
    );

    Ok(())
}
