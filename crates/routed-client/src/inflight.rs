//! In-flight request guards.
//!
//! User-triggered network actions must not run concurrently with themselves:
//! a second click while a request is outstanding would duplicate the call.
//! The registry hands out at most one guard per action kind; the guard
//! releases its slot on drop, so teardown of the initiating view cancels the
//! reservation automatically.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// The user-triggered actions that may hit the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Geocoding a place query.
    Geocode,

    /// Requesting stop suggestions along a route.
    SuggestStops,

    /// Submitting a batch of reservations.
    Reservations,

    /// Generating an itinerary.
    Itinerary,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Geocode => "geocode",
            Self::SuggestStops => "suggest_stops",
            Self::Reservations => "reservations",
            Self::Itinerary => "itinerary",
        };
        f.write_str(name)
    }
}

/// Tracks which action kinds currently have a request outstanding.
#[derive(Debug, Clone, Default)]
pub struct InflightRegistry {
    inner: Arc<Mutex<HashSet<ActionKind>>>,
}

impl InflightRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for an action.
    ///
    /// Returns `None` when a request of this kind is already outstanding;
    /// the caller should suppress the duplicate call.
    #[must_use]
    pub fn begin(&self, kind: ActionKind) -> Option<InflightGuard> {
        let mut active = self.lock();
        if !active.insert(kind) {
            tracing::debug!(action = %kind, "duplicate request suppressed");
            return None;
        }
        Some(InflightGuard {
            inner: Arc::clone(&self.inner),
            kind,
        })
    }

    /// Whether a request of this kind is outstanding.
    #[must_use]
    pub fn is_in_flight(&self, kind: ActionKind) -> bool {
        self.lock().contains(&kind)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<ActionKind>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// RAII claim on an action slot; dropping it releases the slot.
#[derive(Debug)]
pub struct InflightGuard {
    inner: Arc<Mutex<HashSet<ActionKind>>>,
    kind: ActionKind,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_suppressed() {
        let registry = InflightRegistry::new();
        let guard = registry.begin(ActionKind::Geocode);
        assert!(guard.is_some());
        assert!(registry.begin(ActionKind::Geocode).is_none());
    }

    #[test]
    fn kinds_are_independent() {
        let registry = InflightRegistry::new();
        let _geocode = registry.begin(ActionKind::Geocode).unwrap();
        assert!(registry.begin(ActionKind::SuggestStops).is_some());
    }

    #[test]
    fn drop_releases_slot() {
        let registry = InflightRegistry::new();
        {
            let _guard = registry.begin(ActionKind::Reservations).unwrap();
            assert!(registry.is_in_flight(ActionKind::Reservations));
        }
        assert!(!registry.is_in_flight(ActionKind::Reservations));
        assert!(registry.begin(ActionKind::Reservations).is_some());
    }
}
