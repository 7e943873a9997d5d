use crate::db::listings::{from_sql_int, to_sql_int};
use crate::domain::{PoiCategory, PointOfInterest};
use crate::errors::ServerError;
use rusqlite::{params, Connection};

/// All points of interest in id order. Rows with an unknown category are
/// skipped rather than failing the whole map.
pub fn get_points_of_interest(conn: &Connection) -> Result<Vec<PointOfInterest>, ServerError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, category, latitude, longitude
             FROM points_of_interest
             ORDER BY id",
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                from_sql_int(row.get(0)?),
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
            ))
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut pois = Vec::new();
    for row in rows {
        let (id, name, category, lat, lng) = row.map_err(|e| ServerError::DbError(e.to_string()))?;
        match PoiCategory::parse(&category) {
            Some(category) => pois.push(PointOfInterest::new(id, name, category, lat, lng)),
            None => tracing::warn!(id, category = %category, "skipping poi with unknown category"),
        }
    }
    Ok(pois)
}

pub fn upsert_point_of_interest(conn: &Connection, poi: &PointOfInterest) -> Result<(), ServerError> {
    conn.execute(
        r#"
        INSERT INTO points_of_interest (id, name, category, latitude, longitude)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            category = excluded.category,
            latitude = excluded.latitude,
            longitude = excluded.longitude
        "#,
        params![
            to_sql_int(poi.id),
            poi.name,
            poi.category.as_str(),
            poi.position.lat,
            poi.position.lng
        ],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(())
}
