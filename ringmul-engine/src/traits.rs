// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A set of common traits used across the ringmul engine.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::types::RingResult;

/// Objects that travel on the [ring channel](crate::channel).
///
/// The channel checks the element count of every payload against the count
/// the receiver expects, so that a short or long transfer is never mistaken
/// for a valid one.
pub trait Payload: Debug + 'static {
    fn num_elements(&self) -> usize;
}

impl<E> Payload for Vec<E>
where
    E: Debug + 'static,
{
    fn num_elements(&self) -> usize {
        self.len()
    }
}

/// A component that is spawned by the [Engine](crate::engine::Engine) when it
/// is run.
#[async_trait(?Send)]
pub trait Runnable {
    async fn run(&self) -> RingResult;
}

/// The `Event` trait defines an object that can be waited on.
///
/// `listen` returns a future so that it can be used in `async` code.
pub trait Event<T> {
    #[must_use = "Futures do nothing unless you `.await` or otherwise use them"]
    fn listen(&self) -> BoxFuture<'static, T>;
}

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
