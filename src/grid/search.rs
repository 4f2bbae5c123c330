//! Free-text search box bound to a grid's `search` URL key.

use std::sync::Arc;

use crate::grid::controller::GridStateController;
use crate::grid::navigation::Navigator;

/// Keeps the typed text on screen right away and lets the grid controller
/// debounce the navigation.
pub struct SearchBoxController<N: Navigator> {
    grid: Arc<GridStateController<N>>,
    value: String,
}

impl<N: Navigator> SearchBoxController<N> {
    /// Starts with the term currently in the grid's URL.
    pub fn mount(grid: Arc<GridStateController<N>>) -> Self {
        let value = grid.state().search.clone();
        Self { grid, value }
    }

    /// Text currently displayed in the field.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Handles a keystroke. Returns whether a navigation was scheduled.
    pub fn on_input(&mut self, text: impl Into<String>) -> bool {
        self.value = text.into();
        self.grid.set_search(self.value.clone())
    }

    /// Empties the field; the grid drops `search` from the URL.
    pub fn clear(&mut self) -> bool {
        self.on_input(String::new())
    }

    /// Re-reads the term after the URL changed outside the search box.
    pub fn resync(&mut self) {
        self.value = self.grid.state().search.clone();
    }
}
