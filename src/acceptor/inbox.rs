//! Inbox: crossbeam-channel backed acceptor for one thread.

use crate::commutator::{MessageAcceptor, ThreadName};
use crate::error::BusError;
use crate::message::Message;
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// Producer half of a thread's inbox. Register it with the commutator.
#[derive(Debug, Clone)]
pub struct Inbox {
    name: ThreadName,
    sender: Sender<Message>,
}

/// Consumer half of a thread's inbox. Owned by the consumer thread.
#[derive(Debug)]
pub struct InboxReceiver {
    name: ThreadName,
    receiver: Receiver<Message>,
}

impl Inbox {
    /// Create an inbox for `name`.
    ///
    /// With a capacity, posting blocks while the inbox is full; without one
    /// the inbox grows as needed.
    pub fn new(name: ThreadName, capacity: Option<usize>) -> (Self, InboxReceiver) {
        let (sender, receiver) = capacity.map_or_else(unbounded::<Message>, bounded::<Message>);
        (
            Self { name, sender },
            InboxReceiver { name, receiver },
        )
    }

    /// Thread this inbox belongs to.
    pub const fn name(&self) -> ThreadName {
        self.name
    }
}

impl MessageAcceptor for Inbox {
    fn accept_message(&self, message: Message) -> Result<(), BusError> {
        // On failure the SendError owns the message and drops it here.
        self.sender
            .send(message)
            .map_err(|_| BusError::InboxDisconnected(self.name))
    }
}

impl InboxReceiver {
    /// Thread this inbox belongs to.
    pub const fn name(&self) -> ThreadName {
        self.name
    }

    /// Pop the next message, waiting up to `timeout`.
    ///
    /// Returns `Ok(None)` on timeout and an error once every producer is gone
    /// and the inbox is empty.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<Message>, BusError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(message) => Ok(Some(message)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(BusError::InboxDisconnected(self.name)),
        }
    }

    /// Pop the next message without waiting.
    pub fn try_recv(&self) -> Option<Message> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drain every message currently queued.
    pub fn drain(&self) -> Vec<Message> {
        self.receiver.try_iter().collect()
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether the inbox is empty.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
