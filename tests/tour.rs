use anyhow::Result;
use sqlx::{FromRow, Row};
use sqlx_tour::prelude::*;
use sqlx_tour::schema::{create_all, reflect, ADDRESS_TABLE, USER_TABLE};

// Each test gets its own shared-cache in-memory database so they can run
// in parallel without seeing each other's tables.
fn setup_database(name: &str) -> Database {
    Database::new(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .expect("failed to init database")
}

#[tokio::test]
async fn engine_connects_lazily() {
    // Construction never touches the database; the first statement does.
    let db = setup_database("lazy");
    db.ping().await.expect("first use should connect");
}

#[tokio::test]
async fn commit_and_rollback() -> Result<()> {
    let db = setup_database("transactions");

    let mut tx = db.conn.begin().await?;
    sqlx::query("CREATE TABLE some_table (x int, y int)")
        .execute(&mut *tx)
        .await?;
    for (x, y) in [(1, 1), (2, 4)] {
        sqlx::query("INSERT INTO some_table (x, y) VALUES (?, ?)")
            .bind(x)
            .bind(y)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM some_table")
        .fetch_one(&db.conn)
        .await?;
    assert_eq!(count, 2);

    // An explicit rollback discards the insert.
    let mut tx = db.conn.begin().await?;
    sqlx::query("INSERT INTO some_table (x, y) VALUES (?, ?)")
        .bind(99)
        .bind(99)
        .execute(&mut *tx)
        .await?;
    tx.rollback().await?;

    // So does dropping a transaction without committing it.
    {
        let mut tx = db.conn.begin().await?;
        sqlx::query("INSERT INTO some_table (x, y) VALUES (?, ?)")
            .bind(98)
            .bind(98)
            .execute(&mut *tx)
            .await?;
    }

    let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM some_table")
        .fetch_one(&db.conn)
        .await?;
    assert_eq!(count, 2);
    Ok(())
}

#[derive(FromRow, Debug, PartialEq)]
struct Pair {
    x: i64,
    y: i64,
}

#[tokio::test]
async fn fetching_rows_in_every_style() -> Result<()> {
    let db = setup_database("fetching");

    let mut tx = db.conn.begin().await?;
    sqlx::query("CREATE TABLE some_table (x int, y int)")
        .execute(&mut *tx)
        .await?;
    for (x, y) in [(1, 1), (2, 4), (6, 8)] {
        sqlx::query("INSERT INTO some_table (x, y) VALUES (?, ?)")
            .bind(x)
            .bind(y)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    // By name and by position off a raw row.
    let rows = sqlx::query("SELECT x, y FROM some_table ORDER BY x")
        .fetch_all(&db.conn)
        .await?;
    assert_eq!(rows[0].get::<i64, _>("x"), 1);
    assert_eq!(rows[0].get::<i64, _>(1), 1);

    // As tuples.
    let tuples: Vec<(i64, i64)> = sqlx::query_as("SELECT x, y FROM some_table ORDER BY x")
        .fetch_all(&db.conn)
        .await?;
    assert_eq!(tuples, vec![(1, 1), (2, 4), (6, 8)]);

    // As a named struct.
    let pairs: Vec<Pair> = sqlx::query_as("SELECT x, y FROM some_table ORDER BY x")
        .fetch_all(&db.conn)
        .await?;
    assert_eq!(pairs[2], Pair { x: 6, y: 8 });

    // With a bound parameter.
    let filtered: Vec<(i64, i64)> =
        sqlx::query_as("SELECT x, y FROM some_table WHERE y > ? ORDER BY x")
            .bind(2)
            .fetch_all(&db.conn)
            .await?;
    assert_eq!(filtered, vec![(2, 4), (6, 8)]);
    Ok(())
}

#[tokio::test]
async fn core_metadata_and_reflection() -> Result<()> {
    let db = setup_database("metadata");

    assert_eq!(USER_TABLE.column_names(), vec!["id", "name", "fullname"]);
    assert_eq!(USER_TABLE.primary_key(), vec!["id"]);
    assert!(ADDRESS_TABLE
        .ddl()
        .contains("FOREIGN KEY(user_id) REFERENCES user_account(id)"));

    create_all(&db.conn).await?;

    let columns = reflect(&db.conn, "user_account").await?;
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "fullname"]);
    assert!(columns[0].primary_key);
    assert!(!columns[1].nullable);

    // Reflecting a table created with raw SQL, no metadata involved.
    sqlx::query("CREATE TABLE some_table (x int, y int)")
        .execute(&db.conn)
        .await?;
    let columns = reflect(&db.conn, "some_table").await?;
    assert_eq!(columns.len(), 2);
    assert!(columns.iter().all(|c| c.nullable && !c.primary_key));
    Ok(())
}

#[tokio::test]
async fn mapped_models_roundtrip() -> Result<()> {
    let db = setup_database("models");
    db.migrate().await?;

    let spongebob = User::insert(&db.conn, "spongebob", "Spongebob Squarepants").await?;
    assert_eq!(spongebob.id, 1);
    assert_eq!(
        spongebob.to_string(),
        "User(id=1, name=\"spongebob\", fullname=\"Spongebob Squarepants\")"
    );

    User::insert(&db.conn, "sandy", "Sandy Cheeks").await?;
    assert_eq!(User::count(&db.conn).await?, 2);

    let first = User::first(&db.conn).await?.expect("table is not empty");
    assert_eq!(first.name, "spongebob");

    let sandy = User::get(&db.conn, "sandy").await?.expect("sandy exists");
    Address::insert(&db.conn, sandy.id, "sandy@sqlalchemy.org").await?;
    Address::insert_for_user_name(&db.conn, "sandy", "sandy@squirrelpower.org").await?;

    let addresses = sandy.addresses(&db.conn).await?;
    assert_eq!(addresses.len(), 2);
    assert!(addresses.iter().all(|a| a.user_id == sandy.id));
    assert_eq!(
        addresses[1].to_string(),
        "Address(id=2, email_address=\"sandy@squirrelpower.org\")"
    );

    assert!(User::get(&db.conn, "nobody").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn statement_construction() -> Result<()> {
    let db = setup_database("statements");
    db.migrate().await?;

    // Multi-row insert built with QueryBuilder.
    let mut builder: sqlx::QueryBuilder<'_, sqlx::Sqlite> =
        sqlx::QueryBuilder::new("INSERT INTO user_account (name, fullname) ");
    builder.push_values(
        [("sandy", "Sandy Cheeks"), ("patrick", "Patrick Star")],
        |mut row, (name, fullname)| {
            row.push_bind(name);
            row.push_bind(fullname);
        },
    );
    assert!(builder.sql().starts_with("INSERT INTO user_account"));
    builder.build().execute(&db.conn).await?;
    assert_eq!(User::count(&db.conn).await?, 2);

    // Insert from select derives one address per user.
    let result = sqlx::query(
        "INSERT INTO address (user_id, email_address)
         SELECT id, name || '@aol.com' FROM user_account",
    )
    .execute(&db.conn)
    .await?;
    assert_eq!(result.rows_affected(), 2);

    let sandy = User::get(&db.conn, "sandy").await?.expect("sandy exists");
    let addresses = sandy.addresses(&db.conn).await?;
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].email_address, "sandy@aol.com");

    // The model schema pretty-printer keeps the table name visible.
    assert!(User::pretty_schema().contains("user_account"));
    Ok(())
}
