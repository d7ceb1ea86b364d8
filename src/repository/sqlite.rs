use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension};

use crate::types::{Location, RepositoryError, Run};

use super::{validate, RunRepository};

const DB_SCHEMA_VERSION: i64 = 1;

/// SQLite backend. Path-addressed; each operation opens a connection,
/// applies the pragmas, ensures the schema, and issues exactly one
/// statement, so atomicity is the store's own per-statement transaction.
#[derive(Clone)]
pub struct SqliteRepository {
    pub path: String,
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn map_run_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Run> {
    let started_raw: String = row.get(2)?;
    let completed_raw: String = row.get(3)?;
    let location_raw: String = row.get(5)?;
    let location = location_raw.parse::<Location>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(err))
    })?;
    Ok(Run {
        id: row.get(0)?,
        title: row.get(1)?,
        started_on: parse_timestamp(2, &started_raw)?,
        completed_on: parse_timestamp(3, &completed_raw)?,
        miles: row.get(4)?,
        location,
    })
}

fn db_find_all(conn: &Connection) -> rusqlite::Result<Vec<Run>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, started_on, completed_on, miles, location FROM run ORDER BY id",
    )?;
    let mapped = stmt
        .query_map([], map_run_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Run>> {
    conn.query_row(
        "SELECT id, title, started_on, completed_on, miles, location FROM run WHERE id = ?1",
        params![id],
        map_run_row,
    )
    .optional()
}

fn db_insert_run(conn: &Connection, run: &Run) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO run (id, title, started_on, completed_on, miles, location) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            run.id,
            run.title,
            run.started_on.to_rfc3339(),
            run.completed_on.to_rfc3339(),
            run.miles,
            run.location.to_string()
        ],
    )
}

fn db_update_run(conn: &Connection, run: &Run, id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE run SET title = ?1, started_on = ?2, completed_on = ?3, miles = ?4, \
         location = ?5 WHERE id = ?6",
        params![
            run.title,
            run.started_on.to_rfc3339(),
            run.completed_on.to_rfc3339(),
            run.miles,
            run.location.to_string(),
            id
        ],
    )
}

fn db_delete_run(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM run WHERE id = ?1", params![id])
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl SqliteRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    /// Remove the backing database file to force a clean start.
    pub fn reset_all(&self) -> anyhow::Result<()> {
        if !std::path::Path::new(&self.path).exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path)?;
        Ok(())
    }

    /// Open once at startup so a schema problem fails fast.
    pub fn init(&self) -> anyhow::Result<()> {
        self.with_conn(|_conn| Ok(()))?;
        Ok(())
    }

    fn with_conn<F, T>(&self, f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;

        Self::migrate(&conn)?;
        f(&conn)
    }

    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        if version == 0 {
            log::info!("SQLite schema bootstrap: 0 -> {}", DB_SCHEMA_VERSION);
            conn.execute_batch(
                r#"
            CREATE TABLE run (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                started_on TEXT NOT NULL,
                completed_on TEXT NOT NULL,
                miles INTEGER NOT NULL,
                location TEXT NOT NULL
            );
            "#,
            )?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::ErrorCode::SchemaChanged as i32),
            Some("database schema version mismatch; please run with --reset option".to_string()),
        ))
    }
}

impl RunRepository for SqliteRepository {
    fn find_all(&self) -> Result<Vec<Run>, RepositoryError> {
        Ok(self.with_conn(db_find_all)?)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Run>, RepositoryError> {
        Ok(self.with_conn(|conn| db_find_by_id(conn, id))?)
    }

    fn create(&self, run: Run) -> Result<(), RepositoryError> {
        validate(&run)?;
        let affected = self
            .with_conn(|conn| db_insert_run(conn, &run))
            .map_err(|err| {
                if is_constraint_violation(&err) {
                    RepositoryError::DuplicateKey(run.id)
                } else {
                    RepositoryError::Backend(err)
                }
            })?;
        if affected != 1 {
            return Err(RepositoryError::Inconsistency {
                id: run.id,
                affected,
            });
        }
        Ok(())
    }

    fn update(&self, run: Run, id: i64) -> Result<(), RepositoryError> {
        validate(&run)?;
        let affected = self.with_conn(|conn| db_update_run(conn, &run, id))?;
        match affected {
            0 => Err(RepositoryError::NotFound(id)),
            1 => Ok(()),
            n => Err(RepositoryError::Inconsistency { id, affected: n }),
        }
    }

    fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let affected = self.with_conn(|conn| db_delete_run(conn, id))?;
        match affected {
            0 => Err(RepositoryError::NotFound(id)),
            1 => Ok(()),
            n => Err(RepositoryError::Inconsistency { id, affected: n }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(prefix: &str, ext: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("{}_{}.{}", prefix, nanos, ext));
        p
    }

    fn sample_run(id: i64, title: &str) -> Run {
        let started_on = Utc.with_ymd_and_hms(2024, 5, 6, 7, 0, 0).unwrap();
        Run {
            id,
            title: title.to_string(),
            started_on,
            completed_on: started_on + Duration::minutes(30),
            miles: 3,
            location: Location::Outdoor,
        }
    }

    #[test]
    fn sqlite_reset_all_ok_when_missing() {
        let path = unique_temp_file("runlog_reset", "db");
        let repo = SqliteRepository::new(&path);
        repo.reset_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_reset_all_removes_existing_file() {
        let path = unique_temp_file("runlog_reset", "db");
        std::fs::write(&path, b"dummy").unwrap();
        assert!(path.exists());
        let repo = SqliteRepository::new(&path);
        repo.reset_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_init_initializes_schema() {
        let path = unique_temp_file("runlog_init", "db");
        let repo = SqliteRepository::new(&path);
        repo.init().unwrap();

        assert!(path.exists());

        let conn = Connection::open(&path).unwrap();
        let run_table = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type='table' AND name='run'",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .unwrap();
        assert_eq!(run_table.as_deref(), Some("run"));

        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, DB_SCHEMA_VERSION);
    }

    #[test]
    fn sqlite_fails_on_mismatched_schema_version() {
        let path = unique_temp_file("runlog_bad_version", "db");
        let repo = SqliteRepository::new(&path);

        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 999;").unwrap();

        let err = repo
            .init()
            .expect_err("init should fail on version mismatch");
        let msg = format!("{err}");
        assert!(msg.contains("database schema version mismatch"));
        assert!(msg.contains("--reset"));
    }

    #[test]
    fn sqlite_create_then_find_round_trips_every_field() {
        let path = unique_temp_file("runlog_roundtrip", "db");
        let repo = SqliteRepository::new(&path);
        repo.init().unwrap();

        let run = sample_run(1, "Monday Run");
        repo.create(run.clone()).unwrap();

        assert_eq!(repo.find_by_id(1).unwrap(), Some(run.clone()));
        assert_eq!(repo.find_all().unwrap(), vec![run]);
    }

    #[test]
    fn sqlite_find_all_orders_by_id() {
        let path = unique_temp_file("runlog_order", "db");
        let repo = SqliteRepository::new(&path);
        repo.init().unwrap();

        repo.create(sample_run(3, "Third")).unwrap();
        repo.create(sample_run(1, "First")).unwrap();

        let ids: Vec<i64> = repo.find_all().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn sqlite_create_duplicate_id_fails_and_keeps_existing_record() {
        let path = unique_temp_file("runlog_duplicate", "db");
        let repo = SqliteRepository::new(&path);
        repo.init().unwrap();

        let original = sample_run(1, "Monday Run");
        repo.create(original.clone()).unwrap();

        let err = repo.create(sample_run(1, "Impostor")).unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateKey(1)));
        assert_eq!(repo.find_all().unwrap(), vec![original]);
    }

    #[test]
    fn sqlite_create_invalid_run_leaves_store_unchanged() {
        let path = unique_temp_file("runlog_invalid", "db");
        let repo = SqliteRepository::new(&path);
        repo.init().unwrap();

        let mut run = sample_run(1, "");
        run.miles = -1;
        let err = repo.create(run).unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn sqlite_update_replaces_wholesale_and_forces_the_path_id() {
        let path = unique_temp_file("runlog_update", "db");
        let repo = SqliteRepository::new(&path);
        repo.init().unwrap();

        repo.create(sample_run(1, "Monday Run")).unwrap();

        let mut replacement = sample_run(42, "Monday Run");
        replacement.miles = 4;
        repo.update(replacement, 1).unwrap();

        let stored = repo.find_by_id(1).unwrap().unwrap();
        assert_eq!(stored.id, 1);
        assert_eq!(stored.miles, 4);
        assert_eq!(repo.find_all().unwrap().len(), 1);
        assert_eq!(repo.find_by_id(42).unwrap(), None);
    }

    #[test]
    fn sqlite_update_missing_id_fails_not_found() {
        let path = unique_temp_file("runlog_update_missing", "db");
        let repo = SqliteRepository::new(&path);
        repo.init().unwrap();

        let err = repo.update(sample_run(5, "Ghost"), 5).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(5)));
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn sqlite_delete_then_find_returns_none() {
        let path = unique_temp_file("runlog_delete", "db");
        let repo = SqliteRepository::new(&path);
        repo.init().unwrap();

        repo.create(sample_run(1, "Monday Run")).unwrap();
        repo.delete(1).unwrap();

        assert_eq!(repo.find_by_id(1).unwrap(), None);
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn sqlite_delete_missing_id_fails_not_found() {
        let path = unique_temp_file("runlog_delete_missing", "db");
        let repo = SqliteRepository::new(&path);
        repo.init().unwrap();

        repo.create(sample_run(1, "Monday Run")).unwrap();
        let err = repo.delete(9).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(9)));
        assert_eq!(repo.find_all().unwrap().len(), 1);
    }

    #[test]
    fn sqlite_rejects_unknown_location_text_on_read() {
        let path = unique_temp_file("runlog_bad_location", "db");
        let repo = SqliteRepository::new(&path);
        repo.init().unwrap();

        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "INSERT INTO run (id, title, started_on, completed_on, miles, location) \
             VALUES (1, 'Tampered', '2024-05-06T07:00:00+00:00', '2024-05-06T07:30:00+00:00', 3, 'TREADMILL')",
            [],
        )
        .unwrap();

        let err = repo.find_by_id(1).unwrap_err();
        assert!(matches!(err, RepositoryError::Backend(_)));
    }
}
