//! Error types for the message bus.
//!
//! Wiring mistakes (duplicate registration, posting to an unknown thread) are
//! programming errors and the non-`try_` entry points panic on them. The
//! variants here exist for the `try_` variants and for the few conditions a
//! caller can actually react to.

use crate::commutator::ThreadName;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by the bus.
#[derive(Error, Debug)]
pub enum BusError {
    /// A thread name was registered twice.
    #[error("thread {0} is already registered")]
    ThreadAlreadyRegistered(ThreadName),

    /// A message was posted to a thread that has no acceptor.
    #[error("thread {0} is not registered")]
    ThreadNotRegistered(ThreadName),

    /// The consumer side of an inbox has gone away.
    #[error("inbox of thread {0} is disconnected")]
    InboxDisconnected(ThreadName),

    /// A bounded wait on a blocker elapsed before the message was destroyed.
    #[error("blocking message was not completed within {0:?}")]
    WaitTimedOut(Duration),

    /// Configuration could not be parsed.
    #[error("invalid bus configuration: {0}")]
    Config(#[from] toml::de::Error),
}
