// src/client_state.rs
//
// Small pieces of client state kept in a key-value medium: each visitor's
// listing comparison list and the site-wide map provider access token.
// Whatever is stored, loading never fails; unreadable values load as empty.

use crate::db::{client_state, Database};
use crate::domain::Listing;
use crate::errors::ServerError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Prefix of the per-visitor comparison list key.
pub const COMPARISON_KEY: &str = "comparison_list";
pub const MAP_TOKEN_KEY: &str = "map_access_token";
pub const MAX_COMPARED: usize = 3;
pub const VISITOR_COOKIE: &str = "visitor";

/// Opaque id naming one browser. It lives in the `visitor` cookie and scopes
/// the keys of that browser's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorId(String);

impl VisitorId {
    pub fn generate() -> Self {
        let mut raw = [0u8; 16];
        OsRng.fill_bytes(&mut raw);
        Self(URL_SAFE_NO_PAD.encode(raw))
    }

    /// Accepts only ids shaped like the ones `generate` hands out.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let well_formed = (16..=64).contains(&raw.len())
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        well_formed.then(|| Self(raw.to_string()))
    }

    /// Reads the id out of a `Cookie` request header.
    pub fn from_cookie_header(header: &str) -> Option<Self> {
        header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name == VISITOR_COOKIE {
                Self::parse(value)
            } else {
                None
            }
        })
    }

    /// `Set-Cookie` value that hands this id to the browser for a year.
    pub fn set_cookie_header(&self) -> String {
        format!(
            "{VISITOR_COOKIE}={}; Path=/; Max-Age=31536000; HttpOnly; SameSite=Lax",
            self.0
        )
    }

    fn comparison_key(&self) -> String {
        format!("{COMPARISON_KEY}:{}", self.0)
    }
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, ServerError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ServerError>;
    fn remove(&self, key: &str) -> Result<(), ServerError>;
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, ServerError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ServerError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ServerError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// Key-value store over the `client_state` table.
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    db: Database,
}

impl SqliteKeyValueStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, ServerError> {
        self.db.with_conn(|conn| client_state::get_value(conn, key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ServerError> {
        self.db
            .with_conn(|conn| client_state::set_value(conn, key, value))
    }

    fn remove(&self, key: &str) -> Result<(), ServerError> {
        self.db.with_conn(|conn| client_state::remove_value(conn, key))
    }
}

/// A listing snapshot taken when it was added for comparison. It is not
/// refreshed if the listing later changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedListing {
    pub listing: Listing,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    /// The list already holds `MAX_COMPARED` listings.
    Full,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonList {
    items: Vec<ComparedListing>,
}

impl ComparisonList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `visitor`'s list from `store`. Missing or malformed data yields
    /// an empty list; unreadable entries, duplicates and anything past
    /// `MAX_COMPARED` are dropped.
    pub fn load(store: &impl KeyValueStore, visitor: &VisitorId) -> Self {
        let raw = match store.get(&visitor.comparison_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read comparison list, starting empty");
                return Self::new();
            }
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "malformed comparison list, starting empty");
                return Self::new();
            }
        };

        let mut list = Self::new();
        for entry in entries {
            match serde_json::from_value::<ComparedListing>(entry) {
                Ok(item) if list.contains(item.listing.id) => {}
                Ok(item) if list.items.len() < MAX_COMPARED => list.items.push(item),
                Ok(item) => {
                    tracing::debug!(id = item.listing.id, "dropping compared listing past the cap");
                }
                Err(err) => tracing::debug!(error = %err, "skipping unreadable compared listing"),
            }
        }
        list
    }

    pub fn save(&self, store: &impl KeyValueStore, visitor: &VisitorId) -> Result<(), ServerError> {
        let json = serde_json::to_string(&self.items).map_err(|e| {
            tracing::error!(error = %e, "failed to encode comparison list");
            ServerError::InternalError
        })?;
        store.set(&visitor.comparison_key(), &json)
    }

    pub fn add(&mut self, listing: Listing, now: DateTime<Utc>) -> AddOutcome {
        if self.contains(listing.id) {
            return AddOutcome::AlreadyPresent;
        }
        if self.items.len() >= MAX_COMPARED {
            return AddOutcome::Full;
        }
        self.items.push(ComparedListing {
            listing,
            added_at: now,
        });
        AddOutcome::Added
    }

    /// Returns whether anything was removed.
    pub fn remove(&mut self, listing_id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.listing.id != listing_id);
        self.items.len() != before
    }

    pub fn contains(&self, listing_id: u64) -> bool {
        self.items.iter().any(|item| item.listing.id == listing_id)
    }

    pub fn items(&self) -> &[ComparedListing] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_COMPARED
    }
}

/// The map provider token, if one has been stored. Blank counts as absent.
pub fn load_map_token(store: &impl KeyValueStore) -> Option<String> {
    match store.get(MAP_TOKEN_KEY) {
        Ok(token) => token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        Err(err) => {
            tracing::warn!(error = %err, "could not read map access token");
            None
        }
    }
}

pub fn save_map_token(store: &impl KeyValueStore, token: &str) -> Result<(), ServerError> {
    let token = token.trim();
    if token.is_empty() {
        store.remove(MAP_TOKEN_KEY)
    } else {
        store.set(MAP_TOKEN_KEY, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    fn visitor(seed: &str) -> VisitorId {
        VisitorId::parse(&format!("{seed:_<16}")).unwrap()
    }

    fn listing(id: u64) -> Listing {
        Listing::new(id, format!("Listing {id}"), "Nairobi", 40_000 + id)
    }

    #[test]
    fn add_refuses_past_cap_and_ignores_duplicates() {
        let mut list = ComparisonList::new();
        assert_eq!(list.add(listing(1), at(1)), AddOutcome::Added);
        assert_eq!(list.add(listing(1), at(2)), AddOutcome::AlreadyPresent);
        assert_eq!(list.add(listing(2), at(3)), AddOutcome::Added);
        assert_eq!(list.add(listing(3), at(4)), AddOutcome::Added);
        assert_eq!(list.add(listing(4), at(5)), AddOutcome::Full);

        assert!(list.is_full());
        assert_eq!(list.items()[0].added_at, at(1));
        assert!(list.remove(2));
        assert!(!list.remove(2));
        assert_eq!(list.add(listing(4), at(6)), AddOutcome::Added);
    }

    #[test]
    fn save_then_load_keeps_snapshots() {
        let store = MemoryKeyValueStore::new();
        let mut list = ComparisonList::new();
        list.add(listing(7).with_amenities(["wifi"]), at(100));
        list.save(&store, &visitor("a")).unwrap();

        assert_eq!(ComparisonList::load(&store, &visitor("a")), list);
    }

    #[test]
    fn malformed_json_loads_empty() {
        let store = MemoryKeyValueStore::new();
        for raw in ["", "not json", "{\"a\":1}", "[1, 2"] {
            store.set(&visitor("a").comparison_key(), raw).unwrap();
            assert!(ComparisonList::load(&store, &visitor("a")).is_empty(), "{raw:?}");
        }
    }

    #[test]
    fn load_drops_bad_entries_duplicates_and_overflow() {
        let store = MemoryKeyValueStore::new();
        let good: Vec<serde_json::Value> = (1..=5)
            .map(|id| {
                serde_json::to_value(ComparedListing {
                    listing: listing(id),
                    added_at: at(id as i64),
                })
                .unwrap()
            })
            .collect();
        let stored = serde_json::json!([
            good[0],
            {"listing": "garbage"},
            good[0],
            good[1],
            good[2],
            good[3],
            good[4],
        ]);
        store.set(&visitor("a").comparison_key(), &stored.to_string()).unwrap();

        let ids: Vec<u64> = ComparisonList::load(&store, &visitor("a"))
            .items()
            .iter()
            .map(|i| i.listing.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn visitors_keep_separate_lists() {
        let store = MemoryKeyValueStore::new();
        let mut alice = ComparisonList::new();
        alice.add(listing(1), at(1));
        alice.save(&store, &visitor("alice")).unwrap();

        assert_eq!(ComparisonList::load(&store, &visitor("alice")), alice);
        assert!(ComparisonList::load(&store, &visitor("bob")).is_empty());
    }

    #[test]
    fn visitor_cookie_parsing() {
        let issued = VisitorId::generate();
        assert_ne!(issued, VisitorId::generate());
        let header = issued.set_cookie_header();
        let pair = header.split(';').next().unwrap();

        let sent = format!("theme=dark; {pair}; other=1");
        assert_eq!(VisitorId::from_cookie_header(&sent), Some(issued));

        assert_eq!(VisitorId::from_cookie_header("theme=dark"), None);
        assert_eq!(VisitorId::from_cookie_header("visitor=short"), None);
        assert_eq!(
            VisitorId::from_cookie_header("visitor=has spaces and ; semis"),
            None
        );
        assert_eq!(VisitorId::parse("../../etc/passwd_xxxxxxx"), None);
    }

    #[test]
    fn blank_map_token_is_absent() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(load_map_token(&store), None);

        save_map_token(&store, "  pk.abc123 ").unwrap();
        assert_eq!(load_map_token(&store).as_deref(), Some("pk.abc123"));

        store.set(MAP_TOKEN_KEY, "   ").unwrap();
        assert_eq!(load_map_token(&store), None);

        save_map_token(&store, "").unwrap();
        assert_eq!(store.get(MAP_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn sqlite_store_persists_values() {
        let path = std::env::temp_dir().join(format!(
            "homefinder_client_state_{}.sqlite",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let db = Database::new(path.to_string_lossy().into_owned());
        crate::db::init_db(&db, "sql/schema.sql").unwrap();
        let store = SqliteKeyValueStore::new(db);

        let mut list = ComparisonList::new();
        list.add(listing(3), at(10));
        list.save(&store, &visitor("a")).unwrap();
        save_map_token(&store, "pk.live").unwrap();

        assert_eq!(ComparisonList::load(&store, &visitor("a")), list);
        assert_eq!(load_map_token(&store).as_deref(), Some("pk.live"));
    }
}
