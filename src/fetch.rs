//! Lazy fetch bookkeeping for per-key remote values.
//!
//! Clause explanations are keyed by clause id; the document summary is a
//! single `FetchState`. Starting a fetch flips the entry to `Pending`, and a
//! second start for the same key is refused until the first one settles.

use std::collections::HashMap;
use std::hash::Hash;

/// State of one lazily fetched value.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Absent,
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Absent
    }
}

impl<T> FetchState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, FetchState::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Move into `Pending`. Returns false if a fetch is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = FetchState::Pending;
        true
    }

    /// Settle a pending fetch. Ignored unless the state is `Pending`, so a
    /// result arriving after a reset is dropped.
    pub fn settle<E: ToString>(&mut self, result: Result<T, E>) -> bool {
        if !self.is_pending() {
            return false;
        }
        *self = match result {
            Ok(value) => FetchState::Ready(value),
            Err(err) => FetchState::Failed(err.to_string()),
        };
        true
    }
}

/// Map from key to fetch state.
#[derive(Debug, Clone)]
pub struct KeyedFetch<K, T> {
    entries: HashMap<K, FetchState<T>>,
}

impl<K, T> Default for KeyedFetch<K, T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, T> PartialEq for KeyedFetch<K, T>
where
    K: Eq + Hash,
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq + Hash + Clone, T> KeyedFetch<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: &K) -> Option<&FetchState<T>> {
        self.entries.get(key)
    }

    pub fn get(&self, key: &K) -> Option<&T> {
        self.entries.get(key).and_then(FetchState::ready)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.entries.get(key).is_some_and(FetchState::is_pending)
    }

    /// Decide whether a fetch for `key` should be issued now.
    ///
    /// Only `Absent` and `Failed` entries start a fetch; a cached value or an
    /// in-flight request both answer false.
    pub fn begin(&mut self, key: &K) -> bool {
        let entry = self.entries.entry(key.clone()).or_default();
        match *entry {
            FetchState::Absent | FetchState::Failed(_) => entry.begin(),
            FetchState::Pending | FetchState::Ready(_) => false,
        }
    }

    pub fn settle<E: ToString>(&mut self, key: &K, result: Result<T, E>) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => entry.settle(result),
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.entries.values().filter(|s| s.is_pending()).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
