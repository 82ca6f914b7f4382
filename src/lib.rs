//! # Drape Bus
//!
//! The cross-thread command bus of a map rendering engine.
//!
//! Engine threads (frontend, backend, render, tile reader) never share scene
//! state directly. They post typed [`Message`]s to each other through a
//! [`ThreadsCommutator`], which routes every message to the inbox of the
//! thread that owns it.
//!
//! ## Core Concepts
//!
//! - **Closed message set**: [`Message`] has one variant per [`MessageType`]
//! - **Fire-and-forget by default**: posting never waits for the consumer
//! - **Blocking round-trips**: a [`Blocker`] wakes the producer when the
//!   consumer drops the message, carrying an optional answer
//! - **Move-once payloads**: GPU-bound resources are taken out of a message
//!   with `accept_*` exactly once
//! - **Context gating**: GL-dependent messages wait while no GPU context is
//!   current and replay in arrival order
//!
//! ## Example
//!
//! ```rust,ignore
//! use drape_bus::{BusConfig, Inbox, Message, ThreadActor, ThreadName, ThreadsCommutator};
//!
//! let config = BusConfig::default();
//! let (inbox, receiver) = Inbox::new(ThreadName::Render, config.inbox_capacity);
//! let actor = ThreadActor::spawn(receiver, render_handler, &config)?;
//!
//! let mut commutator = ThreadsCommutator::with_config(config);
//! commutator.register_thread(ThreadName::Render, inbox);
//! commutator.post_message(ThreadName::Render, Message::Invalidate);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod acceptor;
pub mod commutator;
pub mod config;
pub mod consumer;
pub mod error;
pub mod geometry;
pub mod message;

// Re-exports for convenience
pub use acceptor::{ContextGate, Inbox, InboxReceiver, MessageHandler, ThreadActor};
pub use commutator::{MessageAcceptor, ThreadName, ThreadsCommutator};
pub use config::BusConfig;
pub use consumer::{GpsTrackPoints, TileStore};
pub use error::BusError;
pub use geometry::{PointD, PointF, RectD};
pub use message::{Blocker, Completion, Message, MessageType, Slot, TileKey, TileMessage};
