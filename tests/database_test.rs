use sqlitui::database::{self, Database};
use std::fs;
use tempfile::TempDir;

mod common;

#[test]
fn test_open_and_list_tables() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = common::create_test_db(temp_dir.path());

    let db = Database::open(&path).expect("Failed to open database");
    assert_eq!(db.path(), path.as_path());
    assert_eq!(db.table_names().unwrap(), vec!["events", "runs"]);
}

#[test]
fn test_open_rejects_non_database_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("not_a_db.txt");
    fs::write(&path, "just some text, definitely not sqlite").unwrap();

    assert!(Database::open(&path).is_err());
}

#[test]
fn test_open_rejects_missing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    assert!(Database::open(&temp_dir.path().join("missing.db")).is_err());
}

#[test]
fn test_run_query_stringifies_values() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = common::create_test_db(temp_dir.path());
    let db = Database::open(&path).unwrap();

    let result = db
        .run_query("SELECT run, note FROM runs ORDER BY run")
        .unwrap();
    assert_eq!(result.headers, vec!["run", "note"]);
    assert_eq!(result.rows.len(), 3);
    assert_eq!(result.rows[0], vec!["1", "first"]);
    // NULL comes through as an empty string
    assert_eq!(result.rows[1], vec!["2", ""]);
}

#[test]
fn test_run_query_fails_on_bad_sql() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = common::create_test_db(temp_dir.path());
    let db = Database::open(&path).unwrap();

    assert!(db.run_query("SELECT nope FROM nowhere").is_err());
}

#[test]
fn test_connection_is_read_only() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = common::create_test_db(temp_dir.path());
    let db = Database::open(&path).unwrap();

    assert!(db.run_query("DELETE FROM runs").is_err());
    assert_eq!(db.run_query("SELECT * FROM runs").unwrap().rows.len(), 3);
}

#[test]
fn test_is_select_prefix_check() {
    assert!(database::is_select("SELECT 1"));
    assert!(database::is_select("  select * from t"));
    assert!(database::is_select("SeLeCt run FROM runs"));
    assert!(!database::is_select("DROP TABLE runs"));
    assert!(!database::is_select("INSERT INTO runs VALUES (4, 'x')"));
    assert!(!database::is_select(""));
}

#[test]
fn test_select_all_quotes_identifier() {
    assert_eq!(database::select_all("events"), "SELECT * FROM \"events\"");
    assert_eq!(
        database::select_all("odd\"name"),
        "SELECT * FROM \"odd\"\"name\""
    );
}
