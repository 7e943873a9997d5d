// src/view.rs

use crate::domain::slug_enum;
use crate::geo::{MarkerId, MarkerSelection};
use std::sync::mpsc::{self, Receiver, Sender};

slug_enum! {
    /// How the current result set is laid out. All three render the same
    /// listings in the same order.
    #[derive(Default)]
    pub enum View {
        #[default]
        Grid => "grid",
        List => "list",
        Map => "map",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    ViewChanged { from: View, to: View },
    /// `previous` is the marker that lost its highlight, if any.
    MarkerActivated {
        id: MarkerId,
        previous: Option<MarkerId>,
    },
    /// Ask the grid/list to bring the card for `id` into view and highlight it.
    ScrollIntoView { id: MarkerId },
}

/// Keeps the active view and the shared marker selection in step, and tells
/// subscribed renderers when either changes. Selection survives view
/// switches.
#[derive(Debug, Default)]
pub struct ViewCoordinator {
    view: View,
    selection: MarkerSelection,
    subscribers: Vec<Sender<ViewEvent>>,
}

impl ViewCoordinator {
    pub fn new(view: View) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn active_view(&self) -> View {
        self.view
    }

    pub fn selection(&self) -> &MarkerSelection {
        &self.selection
    }

    pub fn subscribe(&mut self) -> Receiver<ViewEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Switching to the view that is already active is a no-op.
    pub fn set_view(&mut self, view: View) {
        if view == self.view {
            return;
        }
        let from = std::mem::replace(&mut self.view, view);
        tracing::debug!(%from, to = %view, "view changed");
        self.publish(ViewEvent::ViewChanged { from, to: view });
    }

    /// Handles a click on either a map marker or a card. The marker becomes
    /// the single active one. Off the map view this first switches to the
    /// map so the pin is visible.
    pub fn on_marker_or_card_selected(&mut self, id: MarkerId) {
        self.set_view(View::Map);
        let previous = self.selection.select(id);
        self.publish(ViewEvent::MarkerActivated { id, previous });
        self.publish(ViewEvent::ScrollIntoView { id });
    }

    /// Re-applies a selection carried over from an earlier page. Unlike a
    /// click it keeps the current view and emits nothing.
    pub fn restore_selection(&mut self, id: MarkerId) {
        self.selection.select(id);
    }

    fn publish(&mut self, event: ViewEvent) {
        // Receivers that hung up are dropped.
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
