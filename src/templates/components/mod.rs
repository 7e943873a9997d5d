pub mod empty_state;
pub mod error;
pub mod filter_form;
pub mod listing_card;

pub use empty_state::empty_state;
pub use error::error_page;
pub use filter_form::filter_form;
pub use listing_card::listing_card;
