use crate::db::{init_db, seed_if_empty, Database};
use crate::recommend::ScoringConfig;
use crate::router::{handle, AppState};
use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fresh database file with the production schema and the demo seed.
pub fn init_test_db(name: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "homefinder_{name}_{}_{}.sqlite",
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    seed_if_empty(&db, "sql/seed.sql").unwrap_or_else(|e| panic!("Seeding failed: {e}"));

    db
}

pub fn test_state(name: &str) -> AppState {
    AppState::new(init_test_db(name), ScoringConfig::default())
}

pub fn request_with_cookie(
    state: &AppState,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    let req = builder.body(Body::empty()).unwrap();

    handle(req, state).unwrap_or_else(|e| panic!("{uri} failed: {e}"))
}

/// GET `uri`, returning the status and the body as text.
pub fn get(state: &AppState, uri: &str) -> (u16, String) {
    get_with_cookie(state, uri, None)
}

pub fn get_with_cookie(state: &AppState, uri: &str, cookie: Option<&str>) -> (u16, String) {
    let resp = request_with_cookie(state, Method::GET, uri, cookie);
    let status = resp.status().as_u16();

    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    (status, body)
}
