pub mod codec;
pub mod evaluate;
pub mod filter;
pub mod session;

pub use codec::{decode, encode, encode_with, parse_query_string, to_query_string, QueryDialect, QueryMap};
pub use filter::{FilterSpec, PriceRange};
pub use session::SearchSession;
