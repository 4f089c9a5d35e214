// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! The ringmul engine.
//!
//! This library provides the [Engine](crate::engine::Engine) which executes
//! ring participants as asynchronous tasks, together with the
//! [ring channel](crate::channel) through which they exchange buffers.
//!
//! Each participant is a [`Runnable`](crate::traits::Runnable) component that
//! owns all of its state. Participants never share memory; a buffer moves
//! from one participant to another only by being sent on the channel.
//!
//! # Simple Application
//!
//! ```rust
//! use ringmul_engine::channel::{RingChannel, Tag};
//! use ringmul_engine::engine::Engine;
//! use ringmul_engine::run_ring;
//!
//! let mut engine = Engine::default();
//! let channel = RingChannel::<Vec<i32>>::new(engine.top(), "channel", 2);
//! let sender = channel.endpoint(0).unwrap();
//! let receiver = channel.endpoint(1).unwrap();
//!
//! engine.spawn(async move {
//!     let values = receiver.receive(0, Tag::panel(0), 3)?.await?;
//!     assert_eq!(values, vec![1, 2, 3]);
//!     Ok(())
//! });
//! engine.spawn(async move { sender.send(1, Tag::panel(0), vec![1, 2, 3]) });
//! run_ring!(engine);
//! ```

pub mod channel;
pub mod engine;
pub mod events;
pub mod executor;
pub mod test_helpers;
pub mod traits;
pub mod types;

#[macro_export]
/// Run the engine and either expect success or the given error message.
macro_rules! run_ring {
    ($engine:ident) => {
        $engine.run().unwrap();
    };
    ($engine:ident, $expect:expr) => {
        match $engine.run() {
            Ok(()) => panic!("Expected an error!"),
            Err(e) => assert_eq!(format!("{e}").as_str(), $expect),
        }
    };
}
