use rusqlite::Connection;
use std::cell::RefCell;
use std::fs;

use crate::errors::ServerError;

// Thread-local connection slot, remembered together with the path it was
// opened for.
thread_local! {
    static DB_CONN: RefCell<Option<(String, Connection)>> = const { RefCell::new(None) };
}

#[derive(Clone, Debug)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Provides the per-thread connection to the closure, opening it on first
    /// use (or when this thread last talked to a different database file).
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ServerError>,
    {
        DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                let reopen = match slot.as_ref() {
                    Some((path, _)) => path != &self.path,
                    None => true,
                };
                if reopen {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| ServerError::DbUnavailable(format!("Open DB failed: {e}")))?;
                    conn.execute_batch("PRAGMA foreign_keys = ON;")
                        .map_err(|e| ServerError::DbUnavailable(format!("Pragma failed: {e}")))?;
                    tracing::debug!(path = %self.path, "opened sqlite connection");
                    *slot = Some((self.path.clone(), conn));
                }
                match slot.as_mut() {
                    Some((_, conn)) => f(conn),
                    None => Err(ServerError::InternalError),
                }
            })
            .map_err(|_| ServerError::InternalError)?
    }
}

/// Initialize database from a SQL schema file
pub fn init_db(db: &Database, schema_path: &str) -> Result<(), ServerError> {
    run_sql_file(db, schema_path)?;
    tracing::info!(schema = schema_path, "database initialized");
    Ok(())
}

/// Loads demo listings when the listings table is still empty.
pub fn seed_if_empty(db: &Database, seed_path: &str) -> Result<bool, ServerError> {
    let existing = db.with_conn(|conn| crate::db::listings::count_listings(conn))?;
    if existing > 0 {
        tracing::debug!(existing, "listings present, skipping seed");
        return Ok(false);
    }
    run_sql_file(db, seed_path)?;
    tracing::info!(seed = seed_path, "seeded demo listings");
    Ok(true)
}

fn run_sql_file(db: &Database, path: &str) -> Result<(), ServerError> {
    let sql = fs::read_to_string(path)
        .map_err(|e| ServerError::DbError(format!("Failed to read {path}: {e}")))?;

    db.with_conn(|conn| {
        conn.execute_batch(&sql)
            .map_err(|e| ServerError::DbError(format!("Failed to apply {path}: {e}")))
    })
}
