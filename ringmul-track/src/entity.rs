// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Entities form the naming hierarchy of a ring.
//!
//! The ring, its participants, links and fences each own an [`Entity`]. Log
//! messages carry the entity [`Id`] and trackers filter on the entity name.

use std::fmt;
use std::rc::Rc;

use crate::{Id, NO_ID, Tracker, create, destroy};

/// Separates the levels of a full entity name, e.g. `top::ring::link0->1`.
pub const NAME_SEPARATOR: &str = "::";

/// A named node in the entity hierarchy.
pub struct Entity {
    /// Local name of this entity.
    pub name: String,

    /// The enclosing entity. `None` only for the [`toplevel`] entity.
    pub parent: Option<Rc<Entity>>,

    /// Identifier allocated by the tracker.
    pub id: Id,

    /// Receives every event this entity emits.
    pub tracker: Tracker,

    qualified_name: String,
}

impl Entity {
    /// Create a child of `parent` named `name`.
    #[must_use]
    pub fn new(parent: &Rc<Entity>, name: &str) -> Self {
        let qualified_name = format!("{}{NAME_SEPARATOR}{name}", parent.qualified_name);
        Self::register(Some(parent.clone()), name, qualified_name, &parent.tracker)
    }

    fn register(
        parent: Option<Rc<Entity>>,
        name: &str,
        qualified_name: String,
        tracker: &Tracker,
    ) -> Self {
        let id = tracker.unique_id();
        tracker.add_entity(id, &qualified_name);
        let entity = Self {
            name: name.to_owned(),
            parent,
            id,
            tracker: tracker.clone(),
            qualified_name,
        };
        create!(entity);
        entity
    }

    /// The name of this entity prefixed by the names of all its ancestors.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.qualified_name.clone()
    }

    /// The [`Id`] of the parent, or [`NO_ID`] for the top-level entity.
    #[must_use]
    pub fn parent_id(&self) -> Id {
        self.parent.as_ref().map_or(NO_ID, |parent| parent.id)
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        destroy!(self);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({} #{})", self.qualified_name, self.id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name)
    }
}

/// Create the root of an entity hierarchy.
#[must_use]
pub fn toplevel(tracker: &Tracker, name: &str) -> Rc<Entity> {
    Rc::new(Entity::register(None, name, name.to_owned(), tracker))
}
