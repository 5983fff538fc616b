//! Working with data.
//!
//! Inserts built three ways (a mapped helper with `RETURNING`, a
//! `QueryBuilder` multi-row statement, and insert-from-select), then
//! selects of whole rows, scalars and mapped objects, ending with a walk
//! along the foreign key from a user to their addresses.

use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite};
use sqlx_tour::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    init_echo();

    let db = Database::new(&database_url())?.echo(true);
    db.migrate().await?;

    // A single insert; RETURNING hands the stored row straight back.
    let spongebob = User::insert(&db.conn, "spongebob", "Spongebob Squarepants").await?;
    println!("inserted: {spongebob}");

    // A multi-row insert, built up value list by value list.
    let mut builder: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new("INSERT INTO user_account (name, fullname) ");
    builder.push_values(
        [("sandy", "Sandy Cheeks"), ("patrick", "Patrick Star")],
        |mut row, (name, fullname)| {
            row.push_bind(name);
            row.push_bind(fullname);
        },
    );
    db.log(builder.sql());
    builder.build().execute(&db.conn).await?;

    // Addresses keyed by user name rather than id, via a scalar subquery.
    for (username, email_address) in [
        ("spongebob", "spongebob@sqlalchemy.org"),
        ("sandy", "sandy@sqlalchemy.org"),
        ("sandy", "sandy@squirrelpower.org"),
    ] {
        let address = Address::insert_for_user_name(&db.conn, username, email_address).await?;
        println!("inserted: {address}");
    }

    // Insert from select: derive one address per user in a single
    // statement.
    db.log("INSERT INTO address (user_id, email_address) SELECT id, name || '@aol.com' FROM user_account");
    let result = sqlx::query(
        "INSERT INTO address (user_id, email_address)
         SELECT id, name || '@aol.com' FROM user_account",
    )
    .execute(&db.conn)
    .await?;
    println!("rows inserted: {}", result.rows_affected());

    // The first row of the user table, as a whole row.
    if let Some(first) = User::first(&db.conn).await? {
        println!("first row: {first}");
    }

    // All mapped users, scalar style.
    for user in User::all(&db.conn).await? {
        println!("{user}");
    }
    println!("user count: {}", User::count(&db.conn).await?);

    // Following the relationship from a user to their addresses.
    if let Some(sandy) = User::get(&db.conn, "sandy").await? {
        for address in sandy.addresses(&db.conn).await? {
            println!("{sandy} has {address}");
        }
    }

    Ok(())
}
