//! Listing search, map and recommendation engine behind the homefinder
//! server. The binary in `main.rs` only wires configuration to `router`.

pub mod client_state;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod geo;
pub mod recommend;
pub mod responses;
pub mod router;
pub mod search;
pub mod store;
pub mod templates;
pub mod view;

#[cfg(test)]
mod tests;
