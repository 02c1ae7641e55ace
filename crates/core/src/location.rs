//! Navigable location bound to the filter state.
//!
//! The codec in [`crate::filter`] is pure; this module owns the side
//! effect of writing an encoded state into a history. [`FilterLocation`]
//! never renders anything: consumers re-read the state after a push.

use crate::filter::{FilterState, FilterUpdate};

/// Something that holds the current query string and records pushes.
pub trait Navigator {
    /// Current query string, without the leading `?`.
    fn location(&self) -> &str;

    /// Record a new location as the current history entry.
    fn push(&mut self, location: String);
}

// ---------------------------------------------------------------------------
// In-memory history
// ---------------------------------------------------------------------------

/// Browser-like history stack with back/forward support.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        let initial = initial.strip_prefix('?').map(str::to_string).unwrap_or(initial);
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// Step back one entry. Returns `false` at the start of history.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one entry. Returns `false` at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("")
    }
}

impl Navigator for MemoryHistory {
    fn location(&self) -> &str {
        &self.entries[self.cursor]
    }

    /// Pushing drops any forward entries, like a browser does.
    fn push(&mut self, location: String) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(location);
        self.cursor = self.entries.len() - 1;
    }
}

// ---------------------------------------------------------------------------
// Filter location
// ---------------------------------------------------------------------------

/// Reads and writes [`FilterState`] through a [`Navigator`].
#[derive(Debug, Clone, Default)]
pub struct FilterLocation<N> {
    navigator: N,
}

impl<N: Navigator> FilterLocation<N> {
    pub fn new(navigator: N) -> Self {
        Self { navigator }
    }

    /// Decode the current location, substituting defaults.
    pub fn read(&self) -> FilterState {
        FilterState::from_query(self.navigator.location())
    }

    /// Merge `update` over the current state and push the encoded result.
    ///
    /// Returns the new state. Nothing is pushed when the encoded location
    /// does not change.
    pub fn apply(&mut self, update: &FilterUpdate) -> FilterState {
        let next = self.read().apply(update);
        let encoded = next.to_query();
        if encoded != self.navigator.location() {
            tracing::debug!(location = %encoded, "Filter location updated");
            self.navigator.push(encoded);
        }
        next
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }
}
