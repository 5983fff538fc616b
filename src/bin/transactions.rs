//! Working with transactions and the DBAPI.
//!
//! Connections are scoped by ownership: a `PoolConnection` returns to the
//! pool when dropped, and a `Transaction` dropped without `commit` rolls
//! back. Commit-as-you-go opens and commits transactions one by one on the
//! same handle; begin-once wraps a whole block in a single transaction.

use anyhow::Result;
use sqlx::{Connection, FromRow, Row};
use sqlx_tour::prelude::*;

#[derive(FromRow, Debug)]
struct Pair {
    x: i64,
    y: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_echo();

    // Nothing has connected yet; the pool opens its first connection when
    // the first statement below runs.
    let db = Database::new(&database_url())?.echo(true);

    // A first statement, fetched as a one-column tuple row.
    db.log("select 'hello world'");
    let rows: Vec<(String,)> = sqlx::query_as("select 'hello world'")
        .fetch_all(&db.conn)
        .await?;
    println!("{rows:?}");

    // The database can also hand back typed values, here a timestamp.
    let (now,): (chrono::NaiveDateTime,) = sqlx::query_as("SELECT CURRENT_TIMESTAMP")
        .fetch_one(&db.conn)
        .await?;
    println!("server time: {now}");

    // Committing changes: commit as you go. Each transaction is opened,
    // used, and committed explicitly.
    let mut tx = db.conn.begin().await?;
    db.log("CREATE TABLE some_table (x int, y int)");
    sqlx::query("CREATE TABLE some_table (x int, y int)")
        .execute(&mut *tx)
        .await?;
    db.log("INSERT INTO some_table (x, y) VALUES (?, ?)");
    for (x, y) in [(1, 1), (2, 4)] {
        sqlx::query("INSERT INTO some_table (x, y) VALUES (?, ?)")
            .bind(x)
            .bind(y)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    // Begin once: the whole block is one transaction, committed at the
    // end. Returning early with `?` would drop it and roll everything
    // back.
    {
        let mut tx = db.conn.begin().await?;
        for (x, y) in [(6, 8), (9, 10)] {
            sqlx::query("INSERT INTO some_table (x, y) VALUES (?, ?)")
                .bind(x)
                .bind(y)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
    }

    // An explicit rollback: the row inserted here never becomes visible.
    let mut tx = db.conn.begin().await?;
    sqlx::query("INSERT INTO some_table (x, y) VALUES (?, ?)")
        .bind(99)
        .bind(99)
        .execute(&mut *tx)
        .await?;
    tx.rollback().await?;

    // Fetching rows, by column name first.
    db.log("SELECT x, y FROM some_table");
    let result = sqlx::query("SELECT x, y FROM some_table")
        .fetch_all(&db.conn)
        .await?;
    for row in &result {
        let x: i64 = row.get("x");
        let y: i64 = row.get("y");
        println!("x: {x}  y: {y}");
    }

    // The same rows by position.
    for row in &result {
        let (x, y): (i64, i64) = (row.get(0), row.get(1));
        println!("({x}, {y})");
    }

    // As tuples, decoded in one step.
    let rows: Vec<(i64, i64)> = sqlx::query_as("SELECT x, y FROM some_table")
        .fetch_all(&db.conn)
        .await?;
    for (x, y) in rows {
        println!("x is {x}, y is {y}");
    }

    // And as a named struct via FromRow.
    let pairs: Vec<Pair> = sqlx::query_as("SELECT x, y FROM some_table")
        .fetch_all(&db.conn)
        .await?;
    for pair in pairs {
        println!("{pair:?}");
    }

    // Sending parameters: a single bound value.
    db.log("SELECT x, y FROM some_table WHERE y > ?");
    let rows: Vec<(i64, i64)> = sqlx::query_as("SELECT x, y FROM some_table WHERE y > ?")
        .bind(2)
        .fetch_all(&db.conn)
        .await?;
    for (x, y) in rows {
        println!("x: {x}  y: {y}");
    }

    // Sending multiple parameter sets, executemany style.
    let mut tx = db.conn.begin().await?;
    for (x, y) in [(11, 12), (13, 14)] {
        sqlx::query("INSERT INTO some_table (x, y) VALUES (?, ?)")
            .bind(x)
            .bind(y)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    // Executing with a session-style scope: one dedicated connection whose
    // work ends with the block.
    {
        let mut session = db.conn.acquire().await?;

        db.log("SELECT x, y FROM some_table WHERE y > ? ORDER BY x, y");
        let rows: Vec<(i64, i64)> =
            sqlx::query_as("SELECT x, y FROM some_table WHERE y > ? ORDER BY x, y")
                .bind(6)
                .fetch_all(&mut *session)
                .await?;
        for (x, y) in rows {
            println!("x: {x}  y: {y}");
        }

        let mut tx = session.begin().await?;
        db.log("UPDATE some_table SET y = ? WHERE x = ?");
        for (x, y) in [(9, 11), (13, 15)] {
            sqlx::query("UPDATE some_table SET y = ? WHERE x = ?")
                .bind(y)
                .bind(x)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
    }

    Ok(())
}
