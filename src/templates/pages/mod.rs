pub mod compare;
pub mod home;
pub mod listings;
pub mod recommendations;

pub use compare::compare_page;
pub use home::home_page;
pub use listings::{listings_page, ListingsVm};
pub use recommendations::recommendations_page;
