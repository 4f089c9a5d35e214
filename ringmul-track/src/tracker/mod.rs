// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The [`Track`] trait and the trackers that implement it.

pub mod dev_null;
pub mod in_memory;
pub mod multi_tracker;
pub mod text;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::rc::Rc;

pub use dev_null::DevNullTracker;
pub use in_memory::InMemoryTracker;
pub use multi_tracker::MultiTracker;
use regex::Regex;
pub use text::TextTracker;

use crate::{Id, ROOT};

/// A tracker could not be built from its configuration.
#[derive(Debug)]
pub struct TrackConfigError(pub String);

impl fmt::Display for TrackConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Track config error: {}", self.0)
    }
}

impl std::error::Error for TrackConfigError {}

/// Receives the lifecycle and log events of every
/// [`Entity`](crate::entity::Entity).
pub trait Track {
    /// Hand out an [`Id`] never used before by this tracker.
    fn unique_id(&self) -> Id;

    /// Whether events of `level` from entity `id` should be emitted.
    fn is_entity_enabled(&self, id: Id, level: log::Level) -> bool;

    /// Make the full name of a new entity known.
    fn add_entity(&self, id: Id, entity_name: &str);

    /// Entity `created` named `name` was created by `created_by`.
    fn create(&self, created_by: Id, created: Id, name: &str);

    /// Entity `destroyed` was released by `destroyed_by`.
    fn destroy(&self, destroyed_by: Id, destroyed: Id);

    /// Emit a message from entity `msg_by`.
    fn log(&self, msg_by: Id, level: log::Level, msg: fmt::Arguments);

    /// Flush anything buffered.
    fn shutdown(&self);
}

/// Trackers are shared by every entity of a ring.
pub type Tracker = Rc<dyn Track>;

/// Create a [`Tracker`] that prints events up to `level` to `stdout`.
#[must_use]
pub fn stdout_tracker(level: log::Level) -> Tracker {
    let writer = Box::new(io::BufWriter::new(io::stdout()));
    Rc::new(TextTracker::new(EntityManager::new(level), writer))
}

/// Create a [`Tracker`] that drops every event.
#[must_use]
pub fn dev_null_tracker() -> Tracker {
    Rc::new(DevNullTracker {})
}

struct EntityRecord {
    name: String,
    level: log::Level,
}

/// Decides the level each entity logs at and remembers entity names.
///
/// An entity takes the level of the first filter whose regular expression
/// matches its full name, or the default level when none match. The manager
/// also allocates the unique [`Id`] values.
pub struct EntityManager {
    default_level: log::Level,
    level_filters: Vec<(Regex, log::Level)>,
    next_id: Cell<u64>,
    entities: RefCell<HashMap<Id, EntityRecord>>,
}

impl EntityManager {
    /// A manager where every entity logs at `default_level`.
    #[must_use]
    pub fn new(default_level: log::Level) -> Self {
        Self {
            default_level,
            level_filters: Vec::new(),
            next_id: Cell::new(ROOT.0 + 1),
            entities: RefCell::new(HashMap::new()),
        }
    }

    fn unique_id(&self) -> Id {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Id(id)
    }

    fn is_log_enabled_at_level(&self, id: Id, level: log::Level) -> bool {
        let entity_level = self
            .entities
            .borrow()
            .get(&id)
            .map_or(self.default_level, |record| record.level);
        level <= entity_level
    }

    fn add_entity(&self, id: Id, entity_name: &str) {
        let record = EntityRecord {
            name: entity_name.to_owned(),
            level: self.level_for(entity_name),
        };
        self.entities.borrow_mut().insert(id, record);
    }

    fn level_for(&self, entity_name: &str) -> log::Level {
        self.level_filters
            .iter()
            .find(|(regex, _)| regex.is_match(entity_name))
            .map_or(self.default_level, |(_, level)| *level)
    }

    /// The full name of entity `id`, if it has been added.
    #[must_use]
    pub fn name_of(&self, id: Id) -> Option<String> {
        self.entities
            .borrow()
            .get(&id)
            .map(|record| record.name.clone())
    }

    /// Entities whose full name matches `regex_str` log at `level`.
    ///
    /// Filters must be added before the entities they apply to.
    ///
    /// ```rust
    /// use ringmul_track::tracker::EntityManager;
    /// let mut manager = EntityManager::new(log::Level::Warn);
    /// manager.add_entity_level_filter(".*participant3.*", log::Level::Trace).unwrap();
    /// ```
    pub fn add_entity_level_filter(
        &mut self,
        regex_str: &str,
        level: log::Level,
    ) -> Result<(), TrackConfigError> {
        let regex = Regex::new(regex_str)
            .map_err(|e| TrackConfigError(format!("invalid filter regex {regex_str}: {e}")))?;
        self.level_filters.push((regex, level));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;

    const RING_ENTITIES: [&str; 4] = [
        "top",
        "top::ring",
        "top::ring::participant0",
        "top::ring::participant1",
    ];

    fn levels(manager: &EntityManager) -> Vec<Level> {
        RING_ENTITIES.iter().map(|name| manager.level_for(name)).collect()
    }

    #[test]
    fn default_level_without_filters() {
        let manager = EntityManager::new(Level::Error);
        assert_eq!(levels(&manager), vec![Level::Error; 4]);
    }

    #[test]
    fn ring_filter() {
        let mut manager = EntityManager::new(Level::Error);
        manager.add_entity_level_filter(r"ring", Level::Trace).unwrap();
        assert_eq!(
            levels(&manager),
            [Level::Error, Level::Trace, Level::Trace, Level::Trace]
        );
    }

    #[test]
    fn earlier_filter_takes_precedence() {
        let mut manager = EntityManager::new(Level::Error);
        manager
            .add_entity_level_filter(r"participant0$", Level::Warn)
            .unwrap();
        manager.add_entity_level_filter(r"ring", Level::Info).unwrap();
        assert_eq!(
            levels(&manager),
            [Level::Error, Level::Info, Level::Warn, Level::Info]
        );
    }

    #[test]
    fn invalid_regex() {
        let mut manager = EntityManager::new(Level::Error);
        let err = manager.add_entity_level_filter(r"(", Level::Info).unwrap_err();
        assert!(err.to_string().starts_with("Track config error: invalid filter regex ("));
    }

    #[test]
    fn ids_follow_root() {
        let manager = EntityManager::new(Level::Error);
        let ids: Vec<Id> = (0..3).map(|_| manager.unique_id()).collect();
        assert_eq!(ids, [Id(2), Id(3), Id(4)]);
    }

    #[test]
    fn enabled_per_entity() {
        let mut manager = EntityManager::new(Level::Warn);
        manager
            .add_entity_level_filter(r"participant1$", Level::Debug)
            .unwrap();
        manager.add_entity(Id(10), "top::ring::participant0");
        manager.add_entity(Id(11), "top::ring::participant1");

        assert!(manager.is_log_enabled_at_level(Id(10), Level::Warn));
        assert!(!manager.is_log_enabled_at_level(Id(10), Level::Info));
        assert!(manager.is_log_enabled_at_level(Id(11), Level::Debug));
        assert!(!manager.is_log_enabled_at_level(Id(11), Level::Trace));
        assert_eq!(
            manager.name_of(Id(11)).as_deref(),
            Some("top::ring::participant1")
        );
        assert_eq!(manager.name_of(Id(12)), None);
    }
}
