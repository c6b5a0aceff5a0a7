//! In-memory event list.
//!
//! Insertion order is display order. Nothing is persisted; a new store is
//! empty.

use tracing::debug;

use crate::event::{EventId, ScheduledEvent};

#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<ScheduledEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the end of the list.
    pub fn add(&mut self, event: ScheduledEvent) {
        debug!(id = %event.id(), name = event.event_name(), "event added");
        self.events.push(event);
    }

    /// Remove the event with `id`. Returns `None` and leaves the store
    /// untouched if no such event exists.
    pub fn remove(&mut self, id: EventId) -> Option<ScheduledEvent> {
        let pos = self.events.iter().position(|e| e.id() == id)?;
        let removed = self.events.remove(pos);
        debug!(%id, "event removed");
        Some(removed)
    }

    pub fn list(&self) -> &[ScheduledEvent] {
        &self.events
    }

    pub fn get(&self, id: EventId) -> Option<&ScheduledEvent> {
        self.events.iter().find(|e| e.id() == id)
    }

    /// Zero-based position in display order.
    pub fn nth(&self, index: usize) -> Option<&ScheduledEvent> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduledEvent> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a EventStore {
    type Item = &'a ScheduledEvent;
    type IntoIter = std::slice::Iter<'a, ScheduledEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::PrepDurations;

    fn event(name: &str) -> ScheduledEvent {
        ScheduledEvent::new(name, "10:00".parse().unwrap(), PrepDurations::default())
    }

    #[test]
    fn add_preserves_insertion_order() {
        let mut store = EventStore::new();
        store.add(event("Dressage"));
        store.add(event("Marathon"));
        store.add(event("Cones"));
        let names: Vec<_> = store.iter().map(|e| e.event_name()).collect();
        assert_eq!(names, ["Dressage", "Marathon", "Cones"]);
        assert_eq!(store.nth(1).unwrap().event_name(), "Marathon");
    }

    #[test]
    fn remove_takes_out_only_the_matching_event() {
        let mut store = EventStore::new();
        let a = event("Dressage");
        let b = event("Marathon");
        let b_id = b.id();
        store.add(a.clone());
        store.add(b);
        let removed = store.remove(b_id).unwrap();
        assert_eq!(removed.event_name(), "Marathon");
        assert_eq!(store.list(), &[a]);
        assert!(store.get(b_id).is_none());
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut store = EventStore::new();
        store.add(event("Dressage"));
        let before = store.list().to_vec();
        assert!(store.remove(uuid::Uuid::new_v4()).is_none());
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn new_store_is_empty() {
        let store = EventStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.nth(0).is_none());
    }
}
