use crate::domain::{
    normalize_amenity, Coordinates, EligibilityCategory, IncomeProgram, Listing, ListingStatus,
    Location, PropertyType,
};
use crate::errors::ServerError;
use crate::search::PriceRange;
use rusqlite::{params, Connection, Row};

const LISTING_COLUMNS: &str = r#"
    id,             -- 0
    title,          -- 1
    address,        -- 2
    latitude,       -- 3
    longitude,      -- 4
    price,          -- 5
    bedrooms,       -- 6
    property_type,  -- 7
    status,         -- 8
    eligibility,    -- 9
    income_program, -- 10
    amenities       -- 11
"#;

pub fn count_listings(conn: &Connection) -> Result<i64, ServerError> {
    conn.query_row("SELECT COUNT(*) FROM listings", [], |row| row.get(0))
        .map_err(|e| ServerError::DbError(e.to_string()))
}

/// Listings whose price falls inside `price` (already normalized by the
/// caller), ordered by id so snapshots are stable between calls.
pub fn get_listings_in_price_range(
    conn: &Connection,
    price: PriceRange,
) -> Result<Vec<Listing>, ServerError> {
    let sql = format!(
        "SELECT {LISTING_COLUMNS} FROM listings
         WHERE price >= ?1 AND (?2 IS NULL OR price <= ?2)
         ORDER BY id"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let min = to_sql_int(price.min);
    let max = price.max.map(to_sql_int);

    let rows = stmt
        .query_map(params![min, max], listing_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(results)
}

pub fn get_listing(conn: &Connection, id: u64) -> Result<Option<Listing>, ServerError> {
    let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?1");
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut rows = stmt
        .query_map(params![to_sql_int(id)], listing_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    rows.next()
        .transpose()
        .map_err(|e| ServerError::DbError(e.to_string()))
}

pub fn upsert_listing(conn: &Connection, listing: &Listing) -> Result<(), ServerError> {
    let coordinates = listing.location.coordinates;
    let amenities = listing
        .amenities
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",");

    conn.execute(
        r#"
        INSERT INTO listings (
            id, title, address, latitude, longitude, price, bedrooms,
            property_type, status, eligibility, income_program, amenities
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            address = excluded.address,
            latitude = excluded.latitude,
            longitude = excluded.longitude,
            price = excluded.price,
            bedrooms = excluded.bedrooms,
            property_type = excluded.property_type,
            status = excluded.status,
            eligibility = excluded.eligibility,
            income_program = excluded.income_program,
            amenities = excluded.amenities
        "#,
        params![
            to_sql_int(listing.id),
            listing.title,
            listing.location.address,
            coordinates.map(|c| c.lat),
            coordinates.map(|c| c.lng),
            to_sql_int(listing.price),
            listing.bedroom_count,
            listing.property_type.as_str(),
            listing.status.as_str(),
            listing.eligibility.map(|e| e.as_str()),
            listing.income_program.map(|p| p.as_str()),
            amenities,
        ],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;

    Ok(())
}

fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<Listing> {
    let latitude: Option<f64> = row.get(3)?;
    let longitude: Option<f64> = row.get(4)?;
    let property_type: String = row.get(7)?;
    let status: String = row.get(8)?;
    let eligibility: Option<String> = row.get(9)?;
    let income_program: Option<String> = row.get(10)?;
    let amenities: String = row.get(11)?;

    Ok(Listing {
        id: from_sql_int(row.get(0)?),
        title: row.get(1)?,
        location: Location {
            address: row.get(2)?,
            coordinates: latitude
                .zip(longitude)
                .map(|(lat, lng)| Coordinates::new(lat, lng)),
        },
        price: from_sql_int(row.get(5)?),
        bedroom_count: row.get(6)?,
        // Unknown text from the source degrades to the catch-all variants.
        property_type: PropertyType::parse(&property_type).unwrap_or(PropertyType::Other),
        status: ListingStatus::parse(&status).unwrap_or(ListingStatus::OffMarket),
        eligibility: eligibility.as_deref().and_then(EligibilityCategory::parse),
        income_program: income_program.as_deref().and_then(IncomeProgram::parse),
        amenities: amenities
            .split(',')
            .map(normalize_amenity)
            .filter(|a| !a.is_empty())
            .collect(),
    })
}

// SQLite integers are signed; ids and prices never get near the limit.
pub(crate) fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub(crate) fn from_sql_int(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
