//! SQLite connection handling and the read-only query executor.

use std::path::{Path, PathBuf};

use color_eyre::Result;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use crate::table::ResultTable;

/// A single open connection to one SQLite database file.
///
/// The file is opened read-only; the application never issues writes, and
/// the SELECT-only check below keeps user SQL on the read path as well.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Opens the database file read-only. Fails if the file does not exist
    /// or is not a SQLite database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        // open_with_flags defers some failures until first use
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of user tables in the catalog, sorted.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Runs a query and materializes every row into string cells.
    ///
    /// NULL becomes an empty string; integers, reals, and text render
    /// directly; blobs are decoded lossily.
    pub fn run_query(&self, sql: &str) -> Result<ResultTable> {
        let mut stmt = self.conn.prepare(sql)?;
        let headers: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let n_cols = headers.len();

        let mut out = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(n_cols);
            for i in 0..n_cols {
                cells.push(value_to_string(row.get_ref(i)?));
            }
            out.push(cells);
        }

        Ok(ResultTable::new(headers, out))
    }
}

fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(v) => v.to_string(),
        ValueRef::Real(v) => v.to_string(),
        ValueRef::Text(v) => String::from_utf8_lossy(v).into_owned(),
        ValueRef::Blob(v) => String::from_utf8_lossy(v).into_owned(),
    }
}

/// Textual read-only check: the statement must begin with `select`,
/// case-insensitively, after leading whitespace.
///
/// Known limitation (inherited from the original viewer): this is not a SQL
/// parser. A leading comment or parenthesis hides the keyword and gets the
/// statement rejected, while nothing deeper than the prefix is inspected.
pub fn is_select(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .map(|prefix| prefix.eq_ignore_ascii_case("select"))
        .unwrap_or(false)
}

/// Builds `SELECT * FROM "name"` with embedded quotes doubled, so table
/// names containing special characters stay intact.
pub fn select_all(table: &str) -> String {
    format!("SELECT * FROM \"{}\"", table.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_select_accepts_read_queries() {
        assert!(is_select("SELECT 1"));
        assert!(is_select("  select 1"));
        assert!(is_select("\n\tSeLeCt * from t"));
    }

    #[test]
    fn is_select_rejects_everything_else() {
        assert!(!is_select("DROP TABLE x"));
        assert!(!is_select("INSERT INTO t VALUES (1)"));
        assert!(!is_select("UPDATE t SET a = 1"));
        assert!(!is_select("DELETE FROM t"));
        assert!(!is_select(""));
        assert!(!is_select("sel"));
        // prefix check only; these would be readable but are rejected
        assert!(!is_select("/* c */ SELECT 1"));
        assert!(!is_select("WITH x AS (SELECT 1) SELECT * FROM x"));
    }

    #[test]
    fn select_all_quotes_identifier() {
        assert_eq!(select_all("events"), "SELECT * FROM \"events\"");
        assert_eq!(
            select_all("odd\"name"),
            "SELECT * FROM \"odd\"\"name\""
        );
    }

    #[test]
    fn run_query_materializes_rows() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (a INTEGER, b TEXT, c REAL);
             INSERT INTO t VALUES (1, 'x', 2.5), (2, NULL, 3.0);",
        )
        .unwrap();
        let db = Database {
            conn,
            path: PathBuf::from(":memory:"),
        };

        let table = db.run_query("SELECT * FROM t ORDER BY a").unwrap();
        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["1", "x", "2.5"]);
        assert_eq!(table.rows[1], vec!["2", "", "3"]);
    }

    #[test]
    fn table_names_skips_internal() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE zebra (a); CREATE TABLE apple (a);
             CREATE INDEX idx_a ON apple(a);",
        )
        .unwrap();
        let db = Database {
            conn,
            path: PathBuf::from(":memory:"),
        };
        assert_eq!(db.table_names().unwrap(), vec!["apple", "zebra"]);
    }
}
