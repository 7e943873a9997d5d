use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>, ServerError> {
    conn.query_row(
        "SELECT value FROM client_state WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(e.to_string()))
}

pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<(), ServerError> {
    conn.execute(
        r#"
        INSERT INTO client_state (key, value, updated_at)
        VALUES (?1, ?2, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
        params![key, value],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(())
}

pub fn remove_value(conn: &Connection, key: &str) -> Result<(), ServerError> {
    conn.execute("DELETE FROM client_state WHERE key = ?1", params![key])
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(())
}
