pub mod client_state;
pub mod connection;
pub mod listings;
pub mod pois;

pub use connection::{init_db, seed_if_empty, Database};
