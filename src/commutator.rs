//! Commutator: Routes messages to the thread that owns them.
//!
//! The commutator is built once by the application's composition root:
//! every logical thread registers its acceptor (usually an [`Inbox`]) during
//! the single-threaded startup phase, then the commutator is shared behind an
//! `Arc` and producers post through it concurrently.
//!
//! ```text
//! ┌──────────────┐  post_message(Render, msg)  ┌──────────────┐   accept    ┌──────────────┐
//! │  Producer    │ ──────────────────────────▶ │  Commutator  │ ──────────▶ │ Render inbox │
//! └──────────────┘                             └──────────────┘             └──────────────┘
//! ```
//!
//! [`Inbox`]: crate::acceptor::Inbox

use crate::config::BusConfig;
use crate::error::BusError;
use crate::message::{Blocker, Message};
use std::collections::HashMap;
use std::fmt;

/// Logical execution contexts of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThreadName {
    /// UI/content thread driving the map.
    Frontend,
    /// Scene builder thread.
    Backend,
    /// Thread owning the GPU context.
    Render,
    /// Auxiliary tile reader.
    TileReader,
}

impl ThreadName {
    /// Lowercase name, used for thread names and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Render => "render",
            Self::TileReader => "tile-reader",
        }
    }
}

impl fmt::Display for ThreadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink that receives the messages posted to one thread.
///
/// An acceptor takes ownership of each message, queues it for its thread and
/// guarantees the message is eventually dropped on that thread. Messages from
/// one producer must be kept in post order.
pub trait MessageAcceptor: Send + Sync {
    /// Take ownership of `message`.
    ///
    /// On error the message has already been dropped.
    fn accept_message(&self, message: Message) -> Result<(), BusError>;
}

/// Registry mapping thread identities to their acceptors.
pub struct ThreadsCommutator {
    acceptors: HashMap<ThreadName, Box<dyn MessageAcceptor>>,
    config: BusConfig,
}

impl ThreadsCommutator {
    /// Create an empty commutator with default configuration.
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Create an empty commutator.
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            acceptors: HashMap::new(),
            config,
        }
    }

    /// Configuration the commutator was built with.
    pub const fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Register the acceptor for `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    pub fn register_thread(&mut self, name: ThreadName, acceptor: impl MessageAcceptor + 'static) {
        if let Err(err) = self.try_register_thread(name, acceptor) {
            panic!("{err}");
        }
    }

    /// Register the acceptor for `name`, reporting duplicates as an error.
    pub fn try_register_thread(
        &mut self,
        name: ThreadName,
        acceptor: impl MessageAcceptor + 'static,
    ) -> Result<(), BusError> {
        if self.acceptors.contains_key(&name) {
            return Err(BusError::ThreadAlreadyRegistered(name));
        }
        self.acceptors.insert(name, Box::new(acceptor));
        tracing::debug!(thread = %name, "registered thread acceptor");
        Ok(())
    }

    /// Whether `name` has an acceptor.
    pub fn is_registered(&self, name: ThreadName) -> bool {
        self.acceptors.contains_key(&name)
    }

    /// Hand `message` to the thread registered as `name`.
    ///
    /// Delivery is fire-and-forget. If the destination's inbox is gone the
    /// message is dropped (releasing any blocker it carries) and a warning is
    /// logged.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not registered.
    pub fn post_message(&self, name: ThreadName, message: Message) {
        match self.try_post_message(name, message) {
            Ok(()) => {}
            Err(err @ BusError::ThreadNotRegistered(_)) => panic!("{err}"),
            Err(err) => tracing::warn!(thread = %name, error = %err, "message dropped"),
        }
    }

    /// Hand `message` to the thread registered as `name`, reporting failures.
    pub fn try_post_message(&self, name: ThreadName, message: Message) -> Result<(), BusError> {
        let acceptor = self
            .acceptors
            .get(&name)
            .ok_or(BusError::ThreadNotRegistered(name))?;
        tracing::trace!(thread = %name, kind = ?message.kind(), "post");
        acceptor.accept_message(message)
    }

    /// Post a blocking message and wait until the consumer destroys it.
    ///
    /// `build` receives a fresh blocker and must pair it with the message it
    /// returns. Waits indefinitely unless `blocking_timeout_ms` is configured.
    /// Must not be called from the destination thread itself.
    pub fn post_blocking<T, F>(&self, name: ThreadName, build: F) -> Result<Option<T>, BusError>
    where
        F: FnOnce(&Blocker<T>) -> Message,
    {
        let blocker = Blocker::new();
        let message = build(&blocker);
        debug_assert!(message.is_blocking(), "{:?} is not a blocking message", message.kind());
        self.post_message(name, message);
        match self.config.blocking_timeout() {
            Some(timeout) => blocker.wait_timeout(timeout),
            None => Ok(blocker.wait()),
        }
    }
}

impl Default for ThreadsCommutator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ThreadsCommutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.acceptors.keys().collect();
        names.sort();
        f.debug_struct("ThreadsCommutator")
            .field("threads", &names)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{GetSelectedObjectMessage, MessageType, SelectedObject};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Acceptor that records message kinds and drops the messages.
    #[derive(Clone, Default)]
    struct Recorder {
        seen: Arc<Mutex<Vec<MessageType>>>,
    }

    impl MessageAcceptor for Recorder {
        fn accept_message(&self, message: Message) -> Result<(), BusError> {
            self.seen.lock().push(message.kind());
            Ok(())
        }
    }

    struct Closed;

    impl MessageAcceptor for Closed {
        fn accept_message(&self, _message: Message) -> Result<(), BusError> {
            Err(BusError::InboxDisconnected(ThreadName::Backend))
        }
    }

    #[test]
    fn test_register_and_post() {
        let recorder = Recorder::default();
        let mut commutator = ThreadsCommutator::new();
        commutator.register_thread(ThreadName::Render, recorder.clone());
        assert!(commutator.is_registered(ThreadName::Render));
        assert!(!commutator.is_registered(ThreadName::Backend));

        commutator.post_message(ThreadName::Render, Message::Invalidate);
        commutator.post_message(ThreadName::Render, Message::UpdateMetalines);
        assert_eq!(
            *recorder.seen.lock(),
            vec![MessageType::Invalidate, MessageType::UpdateMetalines]
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut commutator = ThreadsCommutator::new();
        commutator.register_thread(ThreadName::Backend, Recorder::default());
        let result = commutator.try_register_thread(ThreadName::Backend, Recorder::default());
        assert!(matches!(result, Err(BusError::ThreadAlreadyRegistered(ThreadName::Backend))));
    }

    #[test]
    #[should_panic(expected = "thread backend is already registered")]
    fn test_duplicate_registration_panics() {
        let mut commutator = ThreadsCommutator::new();
        commutator.register_thread(ThreadName::Backend, Recorder::default());
        commutator.register_thread(ThreadName::Backend, Recorder::default());
    }

    #[test]
    fn test_post_unregistered_rejected() {
        let commutator = ThreadsCommutator::new();
        let result = commutator.try_post_message(ThreadName::Frontend, Message::Invalidate);
        assert!(matches!(result, Err(BusError::ThreadNotRegistered(ThreadName::Frontend))));
    }

    #[test]
    #[should_panic(expected = "thread tile-reader is not registered")]
    fn test_post_unregistered_panics() {
        let commutator = ThreadsCommutator::new();
        commutator.post_message(ThreadName::TileReader, Message::FinishReading);
    }

    #[test]
    fn test_rejected_blocking_message_releases_producer() {
        let mut commutator = ThreadsCommutator::new();
        commutator.register_thread(ThreadName::Backend, Closed);

        let result = commutator.post_blocking(ThreadName::Backend, |blocker| {
            Message::GetSelectedObject(GetSelectedObjectMessage::new(blocker))
        });
        let selected: Option<SelectedObject> = result.unwrap();
        assert_eq!(selected, None);
    }

    #[test]
    fn test_debug_lists_threads() {
        let mut commutator = ThreadsCommutator::new();
        commutator.register_thread(ThreadName::Render, Recorder::default());
        commutator.register_thread(ThreadName::Frontend, Recorder::default());
        let debug = format!("{commutator:?}");
        assert!(debug.contains("[Frontend, Render]"));
    }
}
