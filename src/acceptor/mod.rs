//! Acceptor side of the bus.
//!
//! Each logical thread owns an [`Inbox`]: the producer half is registered with
//! the [`ThreadsCommutator`](crate::ThreadsCommutator), the receiver half is
//! drained by a [`ThreadActor`] that feeds a [`MessageHandler`].
//!
//! ```text
//! Commutator ──▶ Inbox ══ channel ══▶ InboxReceiver ──▶ ContextGate ──▶ MessageHandler
//!                                      (ThreadActor thread)
//! ```

mod context_gate;
mod inbox;
mod worker;

pub use context_gate::ContextGate;
pub use inbox::{Inbox, InboxReceiver};
pub use worker::{MessageHandler, ThreadActor};
