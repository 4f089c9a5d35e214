// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The [`Engine`] owns the executor and the top-level entity of a ring.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use ringmul_track::Tracker;
use ringmul_track::entity::{Entity, toplevel};
use ringmul_track::tracker::stdout_tracker;

use crate::executor::{self, Executor, Spawner};
use crate::types::{Component, RingResult};

/// Runs the tasks of one ring to completion.
pub struct Engine {
    pub executor: Executor,
    pub spawner: Spawner,
    toplevel: Rc<Entity>,
    tracker: Tracker,
    registered: RefCell<Vec<Component>>,
}

impl Engine {
    /// Create a standalone engine.
    pub fn new(tracker: &Tracker) -> Self {
        let toplevel = toplevel(tracker, "top");
        let (executor, spawner) = executor::new_executor_and_spawner(&toplevel);
        Self {
            executor,
            spawner,
            toplevel,
            tracker: tracker.clone(),
            registered: RefCell::new(Vec::new()),
        }
    }

    /// Register a component to be spawned when the engine is run.
    pub fn register(&self, component: Component) {
        self.registered.borrow_mut().push(component);
    }

    /// Spawn all registered components and run until every task completes.
    pub fn run(&mut self) -> RingResult {
        for component in self.registered.borrow_mut().drain(..) {
            self.executor.spawn(async move { component.run().await });
        }
        self.executor.run()
    }

    pub fn spawn(&self, future: impl Future<Output = RingResult> + 'static) {
        self.executor.spawn(future);
    }

    #[must_use]
    pub fn spawner(&self) -> Spawner {
        self.spawner.clone()
    }

    #[must_use]
    pub fn top(&self) -> &Rc<Entity> {
        &self.toplevel
    }

    #[must_use]
    pub fn tracker(&self) -> Tracker {
        self.tracker.clone()
    }
}

/// An engine logging warnings and errors to stdout.
impl Default for Engine {
    fn default() -> Self {
        let tracker = stdout_tracker(log::Level::Warn);
        Self::new(&tracker)
    }
}
