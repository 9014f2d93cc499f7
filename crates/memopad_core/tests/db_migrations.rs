use memopad_core::db::migrations::{apply_migrations, latest_version, schema_version};
use memopad_core::db::{open_db, open_db_in_memory, DbError, SchemaError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memopad.db");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO kv_entries (key, value, updated_at) VALUES ('memos', '[]', 0);",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second).unwrap(), latest_version());
    let value: String = second
        .query_row("SELECT value FROM kv_entries WHERE key = 'memos';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(value, "[]");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.schema_too_new(), Some((999, latest_version())));
    match &err {
        DbError::Schema {
            target,
            source: SchemaError::TooNew { .. },
        } => assert!(target.ends_with("future.db"), "unexpected target {target}"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("future.db"));
}

#[test]
fn open_errors_name_the_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("memopad.db");

    let err = open_db(&path).unwrap_err();
    assert!(
        err.to_string().contains("no-such-dir"),
        "error should mention the path: {err}"
    );
    assert!(err.schema_too_new().is_none());
}

#[test]
fn apply_migrations_reports_previous_version_and_is_repeatable() {
    let mut conn = Connection::open_in_memory().unwrap();
    assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
    assert_eq!(apply_migrations(&mut conn).unwrap(), latest_version());
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table `{table_name}` should exist");
}
