// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A one-shot event carrying a value.
//!
//! Tasks that listen before the event fires are woken when it does; tasks
//! that listen afterwards complete on their first poll.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use futures::future::FusedFuture;

use crate::traits::{BoxFuture, Event};
use crate::transfer_error;
use crate::types::RingResult;

enum Signal {
    Pending(Vec<Waker>),
    Fired,
}

struct Shared<T> {
    value: T,
    signal: RefCell<Signal>,
}

/// Cloning a [`Once`] gives another handle to the same event.
#[derive(Clone)]
pub struct Once<T: Copy> {
    shared: Rc<Shared<T>>,
}

impl<T: Copy + 'static> Once<T> {
    /// An event that will deliver `value` to its listeners.
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                value,
                signal: RefCell::new(Signal::Pending(Vec::new())),
            }),
        }
    }

    /// Fire the event. It is an error to fire it a second time.
    pub fn notify(&self) -> RingResult {
        let previous = self.shared.signal.replace(Signal::Fired);
        match previous {
            Signal::Fired => transfer_error!("once event already triggered"),
            Signal::Pending(wakers) => {
                wakers.into_iter().for_each(Waker::wake);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        matches!(*self.shared.signal.borrow(), Signal::Fired)
    }
}

impl Default for Once<()> {
    fn default() -> Self {
        Self::new(())
    }
}

impl<T: Copy + 'static> Event<T> for Once<T> {
    fn listen(&self) -> BoxFuture<'static, T> {
        Box::pin(OnceFuture {
            shared: self.shared.clone(),
            done: false,
        })
    }
}

/// Completes with the value of a [`Once`] after it has fired.
pub struct OnceFuture<T> {
    shared: Rc<Shared<T>>,
    done: bool,
}

impl<T: Copy> Future for OnceFuture<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        if let Signal::Pending(wakers) = &mut *self.shared.signal.borrow_mut() {
            wakers.push(cx.waker().clone());
            return Poll::Pending;
        }
        self.done = true;
        Poll::Ready(self.shared.value)
    }
}

impl<T: Copy> FusedFuture for OnceFuture<T> {
    fn is_terminated(&self) -> bool {
        self.done
    }
}
