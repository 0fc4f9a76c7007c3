//! Read-only access to the SQLite file the SQL agent queries.

use std::path::Path;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::{debug, warn};

use crate::error::AgentError;

/// Sample rows shown per table in the schema description.
const SAMPLE_ROWS: usize = 3;

/// What the SQL pipeline needs from a database.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    /// SQL dialect name put into the query-writing prompt.
    fn dialect(&self) -> &str;

    /// Schema description: one `CREATE TABLE` per table plus sample rows.
    async fn table_info(&self) -> Result<String, AgentError>;

    /// Run `sql` and render the outcome as text. Driver errors are returned
    /// as `"Error: ..."` text rather than failing.
    async fn run(&self, sql: &str) -> String;
}

/// A read-only pool over a local SQLite file.
#[derive(Debug, Clone)]
pub struct SqlDatabase {
    pool: SqlitePool,
    max_rows: usize,
}

impl SqlDatabase {
    /// Open an existing database file read-only. The file is never created.
    pub async fn open(path: impl AsRef<Path>, max_rows: usize) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .read_only(true)
            .create_if_missing(false);
        let pool = SqlitePoolOptions::new().max_connections(4).connect_with(options).await?;
        debug!(path = %path.as_ref().display(), "sql database opened");
        Ok(Self::from_pool(pool, max_rows))
    }

    pub fn from_pool(pool: SqlitePool, max_rows: usize) -> Self {
        Self { pool, max_rows: max_rows.max(1) }
    }

    /// User tables sorted by name.
    pub async fn table_names(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Run `sql`, returning at most the configured number of rows as JSON
    /// objects keyed by column name.
    pub async fn query_rows(&self, sql: &str) -> Result<Vec<Map<String, Value>>, sqlx::Error> {
        self.fetch_rows(sql, self.max_rows).await
    }

    async fn fetch_rows(&self, sql: &str, limit: usize) -> Result<Vec<Map<String, Value>>, sqlx::Error> {
        sqlx::query(sql)
            .fetch(&self.pool)
            .take(limit)
            .map_ok(|row| row_to_json(&row))
            .try_collect()
            .await
    }

    async fn describe_table(&self, table: &str) -> Result<String, sqlx::Error> {
        let create: Option<String> =
            sqlx::query_scalar("SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1")
                .bind(table)
                .fetch_optional(&self.pool)
                .await?;
        let mut out = create.unwrap_or_default().trim().to_owned();

        let quoted = table.replace('"', "\"\"");
        let rows = self.fetch_rows(&format!("SELECT * FROM \"{quoted}\" LIMIT {SAMPLE_ROWS}"), SAMPLE_ROWS).await?;
        out.push_str(&format!("\n\n/*\n{} rows from {table} table:\n", rows.len()));
        if let Some(first) = rows.first() {
            out.push_str(&first.keys().cloned().collect::<Vec<_>>().join("\t"));
            out.push('\n');
        }
        for row in &rows {
            let cells: Vec<String> = row.values().map(cell_text).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out.push_str("*/");
        Ok(out)
    }
}

#[async_trait]
impl QueryRunner for SqlDatabase {
    fn dialect(&self) -> &str {
        "sqlite"
    }

    async fn table_info(&self) -> Result<String, AgentError> {
        let mut sections = Vec::new();
        for table in self.table_names().await? {
            sections.push(self.describe_table(&table).await?);
        }
        Ok(sections.join("\n\n"))
    }

    async fn run(&self, sql: &str) -> String {
        match self.query_rows(sql).await {
            Ok(rows) => Value::Array(rows.into_iter().map(Value::Object).collect()).to_string(),
            Err(e) => {
                warn!(error = %e, "query failed");
                format!("Error: {e}")
            }
        }
    }
}

fn row_to_json(row: &SqliteRow) -> Map<String, Value> {
    row.columns()
        .iter()
        .map(|column| (column.name().to_owned(), cell_value(row, column.ordinal())))
        .collect()
}

fn cell_value(row: &SqliteRow, idx: usize) -> Value {
    let storage = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_owned(),
        Err(_) => return Value::Null,
    };
    match storage.as_str() {
        "INTEGER" | "BOOLEAN" => row.try_get_unchecked::<i64, _>(idx).map(Value::from).unwrap_or(Value::Null),
        "REAL" | "NUMERIC" => row.try_get_unchecked::<f64, _>(idx).map(Value::from).unwrap_or(Value::Null),
        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(idx)
            .map(|b| Value::String(format!("<{} bytes>", b.len())))
            .unwrap_or(Value::Null),
        _ => row.try_get_unchecked::<String, _>(idx).map(Value::String).unwrap_or(Value::Null),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "NULL".to_owned(),
        other => other.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Seed a small music catalogue and reopen it read-only.
    pub(crate) async fn music_db() -> (TempDir, SqlDatabase) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("music.db");

        let writer = SqlitePool::connect_with(
            SqliteConnectOptions::new().filename(&path).create_if_missing(true),
        )
        .await
        .unwrap();
        for stmt in [
            "CREATE TABLE Artist (ArtistId INTEGER PRIMARY KEY, Name TEXT)",
            "CREATE TABLE Album (AlbumId INTEGER PRIMARY KEY, Title TEXT NOT NULL, ArtistId INTEGER, Price REAL)",
            "INSERT INTO Artist VALUES (1, 'AC/DC'), (2, 'Accept'), (3, 'Aerosmith'), (4, NULL)",
            "INSERT INTO Album VALUES (1, 'For Those About To Rock', 1, 9.99), (2, 'Balls to the Wall', 2, 8.5)",
        ] {
            sqlx::query(stmt).execute(&writer).await.unwrap();
        }
        writer.close().await;

        let db = SqlDatabase::open(&path, 100).await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn lists_user_tables_sorted() {
        let (_dir, db) = music_db().await;
        assert_eq!(db.table_names().await.unwrap(), vec!["Album", "Artist"]);
    }

    #[tokio::test]
    async fn table_info_has_schema_and_samples() {
        let (_dir, db) = music_db().await;
        let info = db.table_info().await.unwrap();

        assert!(info.contains("CREATE TABLE Album"));
        assert!(info.contains("CREATE TABLE Artist"));
        assert!(info.contains("3 rows from Artist table:"));
        assert!(info.contains("AC/DC"));
        assert!(info.contains("Aerosmith"));
        assert!(!info.contains("4\tNULL"), "only three sample rows");
    }

    #[tokio::test]
    async fn run_renders_rows_as_json() {
        let (_dir, db) = music_db().await;
        let text = db.run("SELECT ArtistId, Name FROM Artist WHERE ArtistId IN (1, 4) ORDER BY ArtistId").await;
        let rows: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            rows,
            serde_json::json!([
                { "ArtistId": 1, "Name": "AC/DC" },
                { "ArtistId": 4, "Name": null }
            ])
        );
    }

    #[tokio::test]
    async fn real_values_and_empty_results() {
        let (_dir, db) = music_db().await;
        let rows: Value = serde_json::from_str(&db.run("SELECT Price FROM Album WHERE AlbumId = 2").await).unwrap();
        assert_eq!(rows[0]["Price"], 8.5);
        assert_eq!(db.run("SELECT Name FROM Artist WHERE 0").await, "[]");
    }

    #[tokio::test]
    async fn driver_errors_become_text() {
        let (_dir, db) = music_db().await;
        let text = db.run("SELECT Nope FROM Artist").await;
        assert!(text.starts_with("Error: "), "{text}");
        assert!(text.contains("Nope"));
    }

    #[tokio::test]
    async fn connection_is_read_only() {
        let (_dir, db) = music_db().await;
        let text = db.run("DELETE FROM Artist").await;
        assert!(text.starts_with("Error: "), "{text}");
        assert_eq!(db.table_names().await.unwrap().len(), 2);
        let rows: Value = serde_json::from_str(&db.run("SELECT COUNT(*) AS n FROM Artist").await).unwrap();
        assert_eq!(rows[0]["n"], 4);
    }

    #[tokio::test]
    async fn rows_are_capped() {
        let (dir, _db) = music_db().await;
        let capped = SqlDatabase::open(dir.path().join("music.db"), 2).await.unwrap();
        let rows = capped.query_rows("SELECT * FROM Artist").await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        assert!(SqlDatabase::open(&path, 10).await.is_err());
        assert!(!path.exists());
    }
}
