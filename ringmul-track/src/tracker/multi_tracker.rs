// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::cell::Cell;
use std::fmt;

use crate::tracker::{Track, Tracker};
use crate::{Id, ROOT};

/// Forwards every event to each of its trackers.
///
/// Ids are allocated here so that all the trackers agree on them.
pub struct MultiTracker {
    next_id: Cell<u64>,
    trackers: Vec<Tracker>,
}

impl MultiTracker {
    /// Forward events to `tracker` as well.
    pub fn add_tracker(&mut self, tracker: Tracker) {
        self.trackers.push(tracker);
    }

    fn enabled(&self, id: Id, level: log::Level) -> impl Iterator<Item = &Tracker> {
        self.trackers
            .iter()
            .filter(move |tracker| tracker.is_entity_enabled(id, level))
    }
}

impl Default for MultiTracker {
    fn default() -> Self {
        Self {
            next_id: Cell::new(ROOT.0 + 1),
            trackers: Vec::new(),
        }
    }
}

impl Track for MultiTracker {
    fn unique_id(&self) -> Id {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Id(id)
    }

    fn is_entity_enabled(&self, id: Id, level: log::Level) -> bool {
        self.enabled(id, level).next().is_some()
    }

    fn add_entity(&self, id: Id, entity_name: &str) {
        self.trackers
            .iter()
            .for_each(|tracker| tracker.add_entity(id, entity_name));
    }

    fn create(&self, created_by: Id, created: Id, name: &str) {
        self.enabled(created, log::Level::Trace)
            .for_each(|tracker| tracker.create(created_by, created, name));
    }

    fn destroy(&self, destroyed_by: Id, destroyed: Id) {
        self.enabled(destroyed, log::Level::Trace)
            .for_each(|tracker| tracker.destroy(destroyed_by, destroyed));
    }

    fn log(&self, id: Id, level: log::Level, msg: fmt::Arguments) {
        self.enabled(id, level)
            .for_each(|tracker| tracker.log(id, level, msg));
    }

    fn shutdown(&self) {
        self.trackers.iter().for_each(|tracker| tracker.shutdown());
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::tracker::{EntityManager, InMemoryTracker};

    #[test]
    fn forwards_to_enabled_trackers_only() {
        let verbose = Rc::new(InMemoryTracker::new(EntityManager::new(log::Level::Debug)));
        let quiet = Rc::new(InMemoryTracker::new(EntityManager::new(log::Level::Warn)));
        let mut multi = MultiTracker::default();
        multi.add_tracker(verbose.clone());
        multi.add_tracker(quiet.clone());

        let id = multi.unique_id();
        multi.add_entity(id, "top::ring");
        multi.log(id, log::Level::Debug, format_args!("round {}", 2));
        multi.log(id, log::Level::Error, format_args!("failed"));

        assert_eq!(verbose.messages_from("ring"), ["round 2", "failed"]);
        assert_eq!(quiet.messages_from("ring"), ["failed"]);
    }
}
