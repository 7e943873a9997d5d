use crate::client_state::{
    load_map_token, AddOutcome, ComparisonList, SqliteKeyValueStore, VisitorId,
};
use crate::db::{listings, Database};
use crate::domain::{Listing, PoiCategory};
use crate::errors::ServerError;
use crate::geo::{build_markers, MarkerId};
use crate::recommend::{QuizAnswers, ScoringConfig};
use crate::responses::{
    html_response, json_response, redirect_to, redirect_with_cookie, text_response,
    unavailable_response, ResultResp,
};
use crate::search::codec::parse_list;
use crate::search::{
    decode, encode, encode_with, parse_query_string, to_query_string, FilterSpec, QueryDialect,
    QueryMap, SearchSession,
};
use crate::store::{ListingStore, SqliteListingStore};
use crate::templates::pages::{self, ListingsVm};
use crate::view::{View, ViewCoordinator};
use astra::Request;
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Everything a request handler needs. Cheap to share between astra workers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub store: SqliteListingStore,
    pub client_state: SqliteKeyValueStore,
    pub scoring: ScoringConfig,
    /// Serializes load-modify-save of comparison lists.
    compare_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(db: Database, scoring: ScoringConfig) -> Self {
        Self {
            store: SqliteListingStore::new(db.clone()),
            client_state: SqliteKeyValueStore::new(db.clone()),
            db,
            scoring: scoring.validated(),
            compare_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();
    let query = parse_query_string(req.uri().query().unwrap_or(""));
    let visitor = req
        .headers()
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(VisitorId::from_cookie_header);
    tracing::debug!(method, path, known_visitor = visitor.is_some(), "request");

    let result = match (method, path) {
        ("GET", "/") => html_response(pages::home_page()),
        ("GET", "/health") => text_response("ok"),
        ("GET", "/listings") => listings_page(state, &query),
        ("GET", "/api/listings") => listings_api(state, &query),
        ("GET", "/api/markers") => markers_api(state, &query),
        ("GET", "/recommendations") => recommendations_page(state, &query),
        ("GET", "/compare") => compare_page(state, visitor.as_ref()),
        ("POST", "/compare/add") => compare_add(state, &query, visitor),
        ("POST", "/compare/remove") => compare_remove(state, &query, visitor.as_ref()),
        _ => Err(ServerError::NotFound),
    };

    match result {
        Err(ServerError::Store(err)) if method == "GET" => {
            let retry_href = req
                .uri()
                .path_and_query()
                .map_or(path, |pq| pq.as_str());
            Ok(unavailable_response(&err, retry_href))
        }
        other => other,
    }
}

/// Runs one search through a session's `begin`/`complete` pair on the
/// request thread, so the store is read over this worker's connection.
fn search(state: &AppState, spec: FilterSpec) -> Result<Vec<Listing>, ServerError> {
    let session = SearchSession::new(state.store.clone(), state.scoring);
    let pending = session.begin(spec);
    let outcome = state.store.fetch_listings(&pending.spec);
    let failure = outcome.as_ref().err().cloned();

    session.complete(pending, outcome);
    match failure {
        Some(err) => Err(err.into()),
        None => Ok(session.results()),
    }
}

/// `poi=shopping,park` selects categories; without the key every category
/// is shown.
fn poi_categories(query: &QueryMap) -> BTreeSet<PoiCategory> {
    match query.get("poi") {
        None => PoiCategory::ALL.iter().copied().collect(),
        Some(raw) => parse_list(raw)
            .iter()
            .filter_map(|c| PoiCategory::parse(c))
            .collect(),
    }
}

fn listings_page(state: &AppState, query: &QueryMap) -> ResultResp {
    let spec = decode(query);
    let view = query
        .get("view")
        .and_then(|v| View::parse(v))
        .unwrap_or_default();

    // `select` is a fresh click; `selected` only carries an earlier one
    // across a view switch.
    let mut coordinator = ViewCoordinator::new(view);
    if let Some(id) = query.get("select").and_then(|s| MarkerId::parse(s)) {
        coordinator.on_marker_or_card_selected(id);
    } else if let Some(id) = query.get("selected").and_then(|s| MarkerId::parse(s)) {
        coordinator.restore_selection(id);
    }

    let results = search(state, spec.clone())?;
    let pois = if coordinator.active_view() == View::Map {
        state.store.points_of_interest()?
    } else {
        Vec::new()
    };
    let markers = build_markers(&results, &pois, &poi_categories(query));
    let map_token = load_map_token(&state.client_state);
    let filter_query = encode(&spec);
    let map_query = to_query_string(&encode_with(&spec, QueryDialect::Map));

    html_response(pages::listings_page(&ListingsVm {
        query: &filter_query,
        map_query: &map_query,
        view: coordinator.active_view(),
        listings: &results,
        pois: &pois,
        markers: &markers,
        selection: coordinator.selection(),
        map_token: map_token.as_deref(),
    }))
}

fn listings_api(state: &AppState, query: &QueryMap) -> ResultResp {
    json_response(&search(state, decode(query))?)
}

fn markers_api(state: &AppState, query: &QueryMap) -> ResultResp {
    let results = search(state, decode(query))?;
    let pois = state.store.points_of_interest()?;
    json_response(&build_markers(&results, &pois, &poi_categories(query)))
}

fn recommendations_page(state: &AppState, query: &QueryMap) -> ResultResp {
    let answers = QuizAnswers::from_query(query);
    let recs = if answers.is_empty() {
        None
    } else {
        let session = SearchSession::new(state.store.clone(), state.scoring);
        Some(session.recommendations(&answers)?)
    };
    html_response(pages::recommendations_page(&answers, recs.as_ref()))
}

fn listing_id(query: &QueryMap) -> Result<u64, ServerError> {
    let raw = query
        .get("id")
        .ok_or_else(|| ServerError::BadRequest("missing listing id".into()))?;
    raw.trim()
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid listing id: {raw}")))
}

/// A visitor without a cookie has nothing stored yet.
fn compare_page(state: &AppState, visitor: Option<&VisitorId>) -> ResultResp {
    let list = visitor
        .map(|v| ComparisonList::load(&state.client_state, v))
        .unwrap_or_default();
    html_response(pages::compare_page(&list))
}

/// First add from a new browser issues the visitor cookie.
fn compare_add(state: &AppState, query: &QueryMap, visitor: Option<VisitorId>) -> ResultResp {
    let id = listing_id(query)?;
    let listing = state
        .db
        .with_conn(|conn| listings::get_listing(conn, id))?
        .ok_or(ServerError::NotFound)?;

    let (visitor, issued) = match visitor {
        Some(visitor) => (visitor, false),
        None => (VisitorId::generate(), true),
    };

    {
        let _guard = state
            .compare_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut list = ComparisonList::load(&state.client_state, &visitor);
        let outcome = list.add(listing, Utc::now());
        tracing::info!(id, ?outcome, "compare add");
        if outcome == AddOutcome::Added {
            list.save(&state.client_state, &visitor)?;
        }
    }

    if issued {
        redirect_with_cookie("/compare", &visitor.set_cookie_header())
    } else {
        redirect_to("/compare")
    }
}

fn compare_remove(state: &AppState, query: &QueryMap, visitor: Option<&VisitorId>) -> ResultResp {
    let id = listing_id(query)?;
    if let Some(visitor) = visitor {
        let _guard = state
            .compare_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut list = ComparisonList::load(&state.client_state, visitor);
        if list.remove(id) {
            list.save(&state.client_state, visitor)?;
        }
    }
    redirect_to("/compare")
}
