// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Logging for ring entities.
//!
//! Every event names the [`Entity`](crate::entity::Entity) that produced it.
//! Log messages are emitted with the [`trace!`], [`debug!`], [`info!`],
//! [`warn!`] and [`error!`] macros, and entity creation and destruction are
//! reported at `Trace`. A [`Tracker`] decides per entity whether an event is
//! written.

#![warn(missing_docs)]

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub use log;

pub mod builder;
pub mod entity;
pub mod test_helpers;

pub mod tracker;
pub use tracker::{Track, Tracker};

/// Destination of formatted log text.
pub type Writer = Box<dyn std::io::Write>;
type SharedWriter = Rc<RefCell<Writer>>;

/// Identifies an [`Entity`](crate::entity::Entity) within one tracker.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Id(pub u64);

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stands for a missing entity, e.g. the parent of the top level.
pub const NO_ID: Id = Id(0);

/// Reserved. Allocated ids start after it.
pub const ROOT: Id = Id(1);

/// Report the creation of `$entity` to its tracker.
#[macro_export]
macro_rules! create {
    ($entity:expr) => {{
        let entity = &$entity;
        if entity
            .tracker
            .is_entity_enabled(entity.id, $crate::log::Level::Trace)
        {
            entity
                .tracker
                .create(entity.parent_id(), entity.id, &entity.full_name());
        }
    }};
}

/// Report the destruction of `$entity` to its tracker.
#[macro_export]
macro_rules! destroy {
    ($entity:expr) => {{
        let entity = &$entity;
        if entity
            .tracker
            .is_entity_enabled(entity.id, $crate::log::Level::Trace)
        {
            entity.tracker.destroy(entity.parent_id(), entity.id);
        }
    }};
}

/// Log `$arg` from `$entity` at `$lvl`.
///
/// Arguments are only formatted when the entity is enabled at `$lvl`.
#[macro_export]
macro_rules! log_base {
    ($entity:expr ; $lvl:expr, $($arg:tt)+) => (
        if $entity.tracker.is_entity_enabled($entity.id, $lvl) {
            $entity.tracker.log($entity.id, $lvl, format_args!($($arg)+));
        }
    );
}

/// Log at [`log::Level::Trace`].
#[macro_export]
macro_rules! trace {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Trace, $($arg)+);
    );
}

/// Log at [`log::Level::Debug`].
#[macro_export]
macro_rules! debug {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Debug, $($arg)+);
    );
}

/// Log at [`log::Level::Info`].
#[macro_export]
macro_rules! info {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Info, $($arg)+);
    );
}

/// Log at [`log::Level::Warn`].
#[macro_export]
macro_rules! warn {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Warn, $($arg)+);
    );
}

/// Log at [`log::Level::Error`].
#[macro_export]
macro_rules! error {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Error, $($arg)+);
    );
}
