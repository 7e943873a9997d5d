pub mod markers;
pub mod selection;

pub use markers::{build_markers, ListingMarker, Marker, MarkerId, PoiMarker};
pub use selection::MarkerSelection;
