// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::fmt;
use std::rc::Rc;

use crate::traits::Runnable;

/// The type of a component that can be registered with the `Engine` so that it
/// will automatically be spawned.
pub type Component = Rc<dyn Runnable + 'static>;

/// Build a [RingError::Config] from format arguments.
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)+) => {
        Err($crate::types::RingError::Config(format!($($arg)+)))
    };
}

/// Build a [RingError::Transfer] from format arguments.
#[macro_export]
macro_rules! transfer_error {
    ($($arg:tt)+) => {
        Err($crate::types::RingError::Transfer(format!($($arg)+)))
    };
}

/// Build a [RingError::Reshape] from format arguments.
#[macro_export]
macro_rules! reshape_error {
    ($($arg:tt)+) => {
        Err($crate::types::RingError::Reshape(format!($($arg)+)))
    };
}

/// Build a [RingError::Overflow] from format arguments.
#[macro_export]
macro_rules! overflow_error {
    ($($arg:tt)+) => {
        Err($crate::types::RingError::Overflow(format!($($arg)+)))
    };
}

/// Build a [RingError::Io] from format arguments.
#[macro_export]
macro_rules! io_error {
    ($($arg:tt)+) => {
        Err($crate::types::RingError::Io(format!($($arg)+)))
    };
}

/// Every failure is fatal to the run; nothing is recovered locally.
#[derive(Clone, Debug, PartialEq)]
pub enum RingError {
    /// Invalid settings, dimensions that the ring cannot divide, or input
    /// that cannot be read. Raised before any participant communicates.
    Config(String),

    /// A send or receive that cannot complete or delivers the wrong count.
    Transfer(String),

    /// A flat buffer that does not fit the shape it is being given.
    Reshape(String),

    /// An integer result does not fit the element type.
    Overflow(String),

    /// The output could not be written.
    Io(String),
}

impl RingError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RingError::Config(_) => "Config",
            RingError::Transfer(_) => "Transfer",
            RingError::Reshape(_) => "Reshape",
            RingError::Overflow(_) => "Overflow",
            RingError::Io(_) => "Io",
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            RingError::Config(msg)
            | RingError::Transfer(msg)
            | RingError::Reshape(msg)
            | RingError::Overflow(msg)
            | RingError::Io(msg) => msg,
        }
    }
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} error: {}", self.kind(), self.message())
    }
}

impl Error for RingError {}

/// The RingResult is the return type for most ring functions
pub type RingResult<T = ()> = Result<T, RingError>;
