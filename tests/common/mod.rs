use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Creates a small SQLite database with two tables:
///
/// - `events`: 50 rows with a numeric `charge__pC` column and a text label
/// - `runs`: 3 rows including a NULL note
pub fn create_test_db(dir: &Path) -> PathBuf {
    let path = dir.join("test.db");
    let conn = Connection::open(&path).expect("Failed to create test database");
    conn.execute_batch(
        "CREATE TABLE events (id INTEGER PRIMARY KEY, charge__pC REAL, label TEXT);
         CREATE TABLE runs (run INTEGER, note TEXT);",
    )
    .expect("Failed to create schema");

    for i in 0..50 {
        conn.execute(
            "INSERT INTO events (charge__pC, label) VALUES (?1, ?2)",
            rusqlite::params![i as f64 * 0.5, format!("evt_{}", i)],
        )
        .expect("Failed to insert event row");
    }
    conn.execute_batch(
        "INSERT INTO runs VALUES (1, 'first');
         INSERT INTO runs VALUES (2, NULL);
         INSERT INTO runs VALUES (3, 'third');",
    )
    .expect("Failed to insert run rows");

    path
}
