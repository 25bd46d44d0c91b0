//! Shared page state with per-target generation counters
//!
//! Render calls for different targets on the same page run concurrently, so
//! the document lives behind a mutex. Each target also carries a generation
//! counter: a call bumps it before fetching and may only write while its
//! generation is still the latest. A slower, superseded call therefore never
//! overwrites the result of a newer one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::document::Document;

/// Token held by one render call for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    target: String,
    value: u64,
}

impl Generation {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

#[derive(Debug, Default)]
struct PageState {
    doc: Document,
    generations: HashMap<String, u64>,
}

/// A document shared between concurrent render calls
#[derive(Debug, Clone, Default)]
pub struct Page {
    state: Arc<Mutex<PageState>>,
}

impl Page {
    pub fn new(doc: Document) -> Self {
        Self {
            state: Arc::new(Mutex::new(PageState {
                doc,
                generations: HashMap::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        // A panic while holding the lock cannot leave a half-written target:
        // every write is a single `replace_range`.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether the page has a mount point with this id
    pub fn contains(&self, id: &str) -> bool {
        self.lock().doc.contains(id)
    }

    /// Current inner HTML of a target
    pub fn inner_html(&self, id: &str) -> Option<String> {
        self.lock().doc.inner_html(id).map(String::from)
    }

    /// Start a new render of `id`, superseding any call still in flight.
    ///
    /// Returns `None` if the target does not exist.
    pub fn begin(&self, id: &str) -> Option<Generation> {
        let mut state = self.lock();
        if !state.doc.contains(id) {
            return None;
        }
        let counter = state.generations.entry(id.to_string()).or_insert(0);
        *counter += 1;
        Some(Generation {
            target: id.to_string(),
            value: *counter,
        })
    }

    /// Whether `generation` is still the latest render of its target
    pub fn is_current(&self, generation: &Generation) -> bool {
        self.lock().generations.get(&generation.target).copied() == Some(generation.value)
    }

    /// Replace the target's markup if `generation` is still current.
    ///
    /// Returns false, leaving the page untouched, for a superseded call.
    pub fn commit(&self, generation: &Generation, html: &str) -> bool {
        let mut state = self.lock();
        if state.generations.get(&generation.target).copied() != Some(generation.value) {
            return false;
        }
        state.doc.set_inner_html(&generation.target, html)
    }

    /// Current markup
    pub fn html(&self) -> String {
        self.lock().doc.html().to_string()
    }
}
