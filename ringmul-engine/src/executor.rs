// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Single-threaded cooperative executor.
//!
//! Every participant runs as a task on this executor. A task that is waiting
//! for a transfer parks itself by leaving its [`Waker`] with the channel, and
//! is only polled again once that waker is used.
//!
//! The executor counts the tasks that have not yet completed. When no task
//! can make progress but some have not finished, the ring has stalled (for
//! example a receive whose matching send is never issued) and `run` reports
//! a transfer error rather than hanging.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use ringmul_track::entity::Entity;
use ringmul_track::trace;

use crate::transfer_error;
use crate::types::RingResult;

static TASK_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
    clone_raw_waker,
    wake_task,
    wake_task_by_ref,
    drop_raw_waker,
);

fn waker_for_task(task: Rc<Task>) -> Waker {
    let ptr = Rc::into_raw(task) as *const ();
    // The pointer is owned by the waker and released by `drop_raw_waker` or
    // `wake_task`.
    unsafe { Waker::from_raw(RawWaker::new(ptr, &TASK_WAKER_VTABLE)) }
}

unsafe fn clone_raw_waker(data: *const ()) -> RawWaker {
    unsafe {
        Rc::increment_strong_count(data as *const Task);
    }
    RawWaker::new(data, &TASK_WAKER_VTABLE)
}

unsafe fn wake_task(data: *const ()) {
    let task = unsafe { Rc::from_raw(data as *const Task) };
    Task::schedule(task);
}

unsafe fn wake_task_by_ref(data: *const ()) {
    let task = unsafe {
        Rc::increment_strong_count(data as *const Task);
        Rc::from_raw(data as *const Task)
    };
    Task::schedule(task);
}

unsafe fn drop_raw_waker(data: *const ()) {
    unsafe {
        drop(Rc::from_raw(data as *const Task));
    }
}

type TaskFuture = Pin<Box<dyn Future<Output = RingResult>>>;

struct Task {
    /// `None` once the future has completed.
    future: RefCell<Option<TaskFuture>>,
    executor_state: Rc<ExecutorState>,
    queued: Cell<bool>,
}

impl Task {
    fn new(
        future: impl Future<Output = RingResult> + 'static,
        executor_state: Rc<ExecutorState>,
    ) -> Task {
        Task {
            future: RefCell::new(Some(Box::pin(future))),
            executor_state,
            queued: Cell::new(true),
        }
    }

    /// Queue the task to be polled, unless it already is.
    fn schedule(task: Rc<Task>) {
        if !task.queued.replace(true) {
            let state = task.executor_state.clone();
            state.new_tasks.borrow_mut().push(task);
        }
    }

    fn is_complete(&self) -> bool {
        self.future.borrow().is_none()
    }

    fn poll(&self, context: &mut Context) -> Poll<RingResult> {
        let mut slot = self.future.borrow_mut();
        let Some(future) = slot.as_mut() else {
            return Poll::Ready(Ok(()));
        };
        let result = future.as_mut().poll(context);
        if result.is_ready() {
            *slot = None;
        }
        result
    }
}

struct ExecutorState {
    task_queue: RefCell<Vec<Rc<Task>>>,
    new_tasks: RefCell<Vec<Rc<Task>>>,
    num_unfinished: Cell<usize>,
}

impl ExecutorState {
    fn new() -> Self {
        Self {
            task_queue: RefCell::new(Vec::new()),
            new_tasks: RefCell::new(Vec::new()),
            num_unfinished: Cell::new(0),
        }
    }

    fn spawn(self: &Rc<Self>, future: impl Future<Output = RingResult> + 'static) {
        self.num_unfinished.set(self.num_unfinished.get() + 1);
        self.new_tasks
            .borrow_mut()
            .push(Rc::new(Task::new(future, self.clone())));
    }
}

/// Single-threaded executor
///
/// This is a thin-wrapper (using [`Rc`]) around the real executor, so that this
/// struct can be cloned and passed around.
///
/// See the [module documentation] for more details.
///
/// [module documentation]: index.html
#[derive(Clone)]
pub struct Executor {
    pub entity: Rc<Entity>,
    state: Rc<ExecutorState>,
}

impl Executor {
    pub fn spawn(&self, future: impl Future<Output = RingResult> + 'static) {
        self.state.spawn(future);
    }

    /// Run until every task has completed.
    ///
    /// Returns the first error raised by any task, or a transfer error if the
    /// remaining tasks can never be woken.
    pub fn run(&self) -> RingResult {
        loop {
            self.step()?;
            if self.state.new_tasks.borrow().is_empty() {
                break;
            }
        }

        let stalled = self.state.num_unfinished.get();
        if stalled > 0 {
            return transfer_error!(
                "{stalled} task(s) stalled waiting for transfers that are never sent"
            );
        }
        Ok(())
    }

    pub fn step(&self) -> RingResult {
        // Append tasks spawned or woken since the last step
        let mut task_queue = self.state.task_queue.borrow_mut();
        task_queue.append(&mut self.state.new_tasks.borrow_mut());
        trace!(self.entity ; "step: polling {} task(s)", task_queue.len());

        for task in task_queue.drain(..) {
            task.queued.set(false);
            if task.is_complete() {
                continue;
            }

            let waker = waker_for_task(task.clone());
            let mut context = Context::from_waker(&waker);

            match task.poll(&mut context) {
                Poll::Ready(result) => {
                    self.state
                        .num_unfinished
                        .set(self.state.num_unfinished.get() - 1);
                    // Error - return early
                    result?;
                }
                Poll::Pending => {
                    // Task will have parked itself waiting somewhere
                }
            }
        }
        Ok(())
    }

    /// Number of spawned tasks that have not yet completed.
    #[must_use]
    pub fn num_unfinished(&self) -> usize {
        self.state.num_unfinished.get()
    }
}

/// `Spawner` spawns new futures into the executor.
#[derive(Clone)]
pub struct Spawner {
    state: Rc<ExecutorState>,
}

impl Spawner {
    pub fn spawn(&self, future: impl Future<Output = RingResult> + 'static) {
        self.state.spawn(future);
    }
}

pub fn new_executor_and_spawner(top: &Rc<Entity>) -> (Executor, Spawner) {
    let state = Rc::new(ExecutorState::new());
    let entity = Rc::new(Entity::new(top, "executor"));
    (
        Executor {
            entity,
            state: state.clone(),
        },
        Spawner { state },
    )
}
