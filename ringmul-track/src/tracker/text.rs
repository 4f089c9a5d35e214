// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

use crate::tracker::{EntityManager, Track};
use crate::{Id, SharedWriter, Writer};

/// Writes one line of text per event.
///
/// Each line starts with the level and the full name of the entity:
///
/// ```text
/// INFO  top::ring::participant3: compute and communication took 1.2ms
/// ```
pub struct TextTracker {
    entity_manager: EntityManager,
    writer: SharedWriter,
}

impl TextTracker {
    /// Write to `writer` the events `entity_manager` enables.
    #[must_use]
    pub fn new(entity_manager: EntityManager, writer: Writer) -> Self {
        Self {
            entity_manager,
            writer: Rc::new(RefCell::new(writer)),
        }
    }

    fn name(&self, id: Id) -> String {
        self.entity_manager
            .name_of(id)
            .unwrap_or_else(|| id.to_string())
    }

    fn write_line(&self, line: fmt::Arguments) {
        let _ = writeln!(self.writer.borrow_mut(), "{line}");
    }
}

impl Track for TextTracker {
    fn unique_id(&self) -> Id {
        self.entity_manager.unique_id()
    }

    fn is_entity_enabled(&self, id: Id, level: log::Level) -> bool {
        self.entity_manager.is_log_enabled_at_level(id, level)
    }

    fn add_entity(&self, id: Id, entity_name: &str) {
        self.entity_manager.add_entity(id, entity_name);
    }

    fn create(&self, created_by: Id, created: Id, name: &str) {
        self.write_line(format_args!(
            "{:<5} {}: created {name} ({created})",
            log::Level::Trace,
            self.name(created_by)
        ));
    }

    fn destroy(&self, destroyed_by: Id, destroyed: Id) {
        self.write_line(format_args!(
            "{:<5} {}: destroyed {}",
            log::Level::Trace,
            self.name(destroyed_by),
            self.name(destroyed)
        ));
    }

    fn log(&self, id: Id, level: log::Level, msg: fmt::Arguments) {
        self.write_line(format_args!("{level:<5} {}: {msg}", self.name(id)));
    }

    fn shutdown(&self) {
        let _ = self.writer.borrow_mut().flush();
    }
}
