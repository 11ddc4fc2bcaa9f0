use sqlitui::{App, AppEvent, TableSelection, Theme};
use std::path::PathBuf;
use std::sync::mpsc::channel;
use tempfile::TempDir;

mod common;

fn app_with_db(temp_dir: &TempDir) -> App {
    let path = common::create_test_db(temp_dir.path());
    let (tx, _rx) = channel::<AppEvent>();
    let mut app = App::new_with_config(tx, Theme::default(), PathBuf::from("/no/such/hints"));
    app.open_database(path);
    app
}

#[test]
fn test_select_table_loads_rows() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut app = app_with_db(&temp_dir);

    app.select_table("events".to_string());
    assert_eq!(app.selection(), &TableSelection::Named("events".to_string()));
    let table = app.current_table().expect("table should be loaded");
    assert_eq!(table.rows.len(), 50);
    // header line, separator, then one line per row
    assert_eq!(app.view_lines().len(), 52);
}

#[test]
fn test_custom_query_clears_table_highlight() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut app = app_with_db(&temp_dir);
    app.select_table("runs".to_string());

    app.sql_input().set_text("SELECT run FROM runs WHERE run > 1");
    app.run_sql();
    assert_eq!(app.selection(), &TableSelection::CustomQueryResult);
    assert_eq!(app.current_table().unwrap().rows.len(), 2);
}

#[test]
fn test_query_recorded_in_history_before_validation() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut app = app_with_db(&temp_dir);

    app.sql_input().set_text("DROP TABLE events");
    app.run_sql();
    app.sql_input().set_text("SELECT broken FROM nowhere");
    app.run_sql();

    let recorded: Vec<&str> = app.history().iter().collect();
    assert_eq!(
        recorded,
        vec!["DROP TABLE events", "SELECT broken FROM nowhere"]
    );
}

#[test]
fn test_failed_query_clears_view_but_keeps_table() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut app = app_with_db(&temp_dir);
    app.select_table("events".to_string());

    app.sql_input().set_text("UPDATE events SET label = 'x'");
    app.run_sql();
    assert_eq!(
        app.view_lines(),
        &["Only SELECT queries are allowed.".to_string()]
    );
    // the cached table survives for export and plotting
    assert_eq!(app.current_table().unwrap().rows.len(), 50);
}

#[test]
fn test_empty_result_is_reported_as_failure() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut app = app_with_db(&temp_dir);

    app.sql_input().set_text("SELECT * FROM runs WHERE run > 99");
    app.run_sql();
    assert_eq!(
        app.view_lines(),
        &["Query failed or returned no results.".to_string()]
    );
}

#[test]
fn test_open_failure_keeps_current_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut app = app_with_db(&temp_dir);
    app.select_table("runs".to_string());

    app.open_database(PathBuf::from("/no/such/file.db"));
    assert_eq!(
        app.view_lines(),
        &["Failed to open selected database.".to_string()]
    );
    // old connection still answers queries
    app.select_table("events".to_string());
    assert_eq!(app.current_table().unwrap().rows.len(), 50);
}

#[test]
fn test_reopen_resets_table_state() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut app = app_with_db(&temp_dir);
    app.select_table("events".to_string());

    let other_dir = TempDir::new().expect("Failed to create temp dir");
    let other = common::create_test_db(other_dir.path());
    app.open_database(other);
    assert_eq!(app.selection(), &TableSelection::None);
    assert!(app.current_table().is_none());
    assert!(app.view_lines().is_empty());
}
