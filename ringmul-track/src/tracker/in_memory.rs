// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::fmt;

use crate::Id;
use crate::tracker::{EntityManager, Track};

/// A single captured [`Track`] event.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// An entity was created.
    Create {
        /// The entity responsible for the creation.
        created_by: Id,
        /// The full name of the created entity.
        name: String,
    },
    /// An entity was destroyed.
    Destroy {
        /// The entity that was destroyed.
        destroyed: Id,
    },
    /// A log message.
    Log {
        /// Full name of the entity that emitted the message.
        entity: String,
        /// Level the message was emitted at.
        level: log::Level,
        /// The formatted message.
        text: String,
    },
}

/// A tracker that keeps all events in memory so that they can be inspected
/// after a run.
pub struct InMemoryTracker {
    entity_manager: EntityManager,
    events: RefCell<Vec<Event>>,
}

impl InMemoryTracker {
    /// Create a new [`InMemoryTracker`] with an [`EntityManager`].
    #[must_use]
    pub fn new(entity_manager: EntityManager) -> Self {
        Self {
            entity_manager,
            events: RefCell::new(Vec::new()),
        }
    }

    /// Return a copy of all events captured so far.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Return all log messages emitted by entities whose full name ends with
    /// `suffix`.
    #[must_use]
    pub fn messages_from(&self, suffix: &str) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Log { entity, text, .. } if entity.ends_with(suffix) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Track for InMemoryTracker {
    fn unique_id(&self) -> Id {
        self.entity_manager.unique_id()
    }

    fn is_entity_enabled(&self, id: Id, level: log::Level) -> bool {
        self.entity_manager.is_log_enabled_at_level(id, level)
    }

    fn add_entity(&self, id: Id, entity_name: &str) {
        self.entity_manager.add_entity(id, entity_name);
    }

    fn create(&self, created_by: Id, _created: Id, name: &str) {
        self.events.borrow_mut().push(Event::Create {
            created_by,
            name: name.to_owned(),
        });
    }

    fn destroy(&self, _destroyed_by: Id, destroyed: Id) {
        self.events.borrow_mut().push(Event::Destroy { destroyed });
    }

    fn log(&self, id: Id, level: log::Level, msg: fmt::Arguments) {
        let entity = self
            .entity_manager
            .name_of(id)
            .unwrap_or_else(|| id.to_string());
        self.events.borrow_mut().push(Event::Log {
            entity,
            level,
            text: msg.to_string(),
        });
    }

    fn shutdown(&self) {}
}
