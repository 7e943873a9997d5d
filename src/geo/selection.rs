// src/geo/selection.rs

use crate::geo::markers::MarkerId;

/// The single "active" marker shared by the grid, list and map. Selecting a
/// new marker silently replaces the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerSelection {
    active: Option<MarkerId>,
}

impl MarkerSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the marker that was active before.
    pub fn select(&mut self, id: MarkerId) -> Option<MarkerId> {
        self.active.replace(id)
    }

    pub fn clear(&mut self) -> Option<MarkerId> {
        self.active.take()
    }

    pub fn active(&self) -> Option<MarkerId> {
        self.active
    }

    pub fn is_active(&self, id: MarkerId) -> bool {
        self.active == Some(id)
    }
}
