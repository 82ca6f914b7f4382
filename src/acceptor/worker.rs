//! Consumer thread: Pops messages from an inbox and hands them to a handler.
//!
//! The actor owns the receiving half of one thread's inbox. Every message is
//! routed through a [`ContextGate`], so GL-dependent messages wait while the
//! handler reports no current context. When the actor stops, whatever is still
//! queued is dropped on the actor thread, which releases any blocked producer.

use super::context_gate::ContextGate;
use super::inbox::InboxReceiver;
use crate::config::BusConfig;
use crate::message::Message;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Thread-side logic that applies messages.
pub trait MessageHandler: Send + 'static {
    /// Apply one message. The handler owns it and drops it when done.
    fn handle(&mut self, message: Message);

    /// Whether a GPU context is current on this thread.
    fn is_context_current(&self) -> bool {
        true
    }
}

/// Handle to a running consumer thread.
pub struct ThreadActor<H> {
    /// Handle to the consumer thread.
    handle: Option<JoinHandle<H>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl<H: MessageHandler> ThreadActor<H> {
    /// Spawn the consumer thread for `receiver`.
    ///
    /// The thread is named after the inbox it drains and wakes every
    /// `poll_interval_ms` to check for shutdown and context changes.
    pub fn spawn(receiver: InboxReceiver, handler: H, config: &BusConfig) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let poll_interval = config.poll_interval();
        let warn_threshold = config.deferred_warn_threshold;

        let handle = thread::Builder::new()
            .name(format!("drape-{}", receiver.name()))
            .spawn(move || {
                Self::run_loop(&receiver, &shutdown_clone, handler, poll_interval, warn_threshold)
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the consumer thread to stop.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Stop the thread and take back its handler.
    ///
    /// Returns `None` if the handler panicked.
    pub fn join(mut self) -> Option<H> {
        self.shutdown();
        self.handle.take().and_then(|handle| handle.join().ok())
    }

    /// Main consumer loop.
    fn run_loop(
        receiver: &InboxReceiver,
        shutdown: &AtomicBool,
        mut handler: H,
        poll_interval: Duration,
        warn_threshold: usize,
    ) -> H {
        let name = receiver.name();
        let mut gate = ContextGate::new(handler.is_context_current(), warn_threshold);
        tracing::debug!(thread = %name, "consumer thread started");

        while !shutdown.load(Ordering::Relaxed) {
            match receiver.recv_timeout(poll_interval) {
                Ok(Some(message)) => {
                    Self::sync_context(&mut gate, &mut handler);
                    gate.submit(message, |message| handler.handle(message));
                }
                // Timeout: pick up context changes even when idle
                Ok(None) => Self::sync_context(&mut gate, &mut handler),
                Err(err) => {
                    tracing::debug!(thread = %name, error = %err, "inbox closed");
                    break;
                }
            }
        }

        let pending = receiver.drain();
        let deferred = gate.deferred_len();
        if !pending.is_empty() || deferred > 0 {
            tracing::info!(
                thread = %name,
                pending = pending.len(),
                deferred,
                "dropping unprocessed messages on shutdown"
            );
        }
        drop(pending);
        drop(gate);

        tracing::debug!(thread = %name, "consumer thread stopped");
        handler
    }

    fn sync_context(gate: &mut ContextGate, handler: &mut H) {
        let current = handler.is_context_current();
        gate.sync(current, |message| handler.handle(message));
    }
}

impl<H> Drop for ThreadActor<H> {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acceptor::Inbox;
    use crate::commutator::{ThreadName, ThreadsCommutator};
    use crate::consumer::TileStore;
    use crate::geometry::PointD;
    use crate::message::{
        DepthLayer, FlushRenderBucketMessage, FlushRouteMessage, GetMyPositionMessage,
        GetSelectedObjectMessage, GlState, MessageType, RenderBucket, RouteData, SelectedObject,
        TileKey,
    };

    /// Render-side handler used by the tests.
    struct RenderHandler {
        kinds: Vec<MessageType>,
        tiles: TileStore<RenderBucket>,
        routes: Vec<RouteData>,
        context: Arc<AtomicBool>,
    }

    impl RenderHandler {
        fn new(context: Arc<AtomicBool>) -> Self {
            Self {
                kinds: Vec::new(),
                tiles: TileStore::new(),
                routes: Vec::new(),
                context,
            }
        }
    }

    impl MessageHandler for RenderHandler {
        fn handle(&mut self, message: Message) {
            self.kinds.push(message.kind());
            match message {
                Message::FlushTile(mut message) => {
                    if let Some(bucket) = message.accept_buffer() {
                        self.tiles.apply(&message, bucket);
                    }
                    assert!(message.accept_buffer().is_none());
                }
                Message::FlushRoute(mut message) => {
                    self.routes.extend(message.accept_route_data());
                    assert!(message.accept_route_data().is_none());
                }
                Message::GetMyPosition(mut message) => {
                    message.set_my_position(Some(PointD::new(1.0, 2.0)));
                }
                Message::GetSelectedObject(mut message) => {
                    message.set_selected_object(SelectedObject::Poi);
                }
                _ => {}
            }
        }

        fn is_context_current(&self) -> bool {
            self.context.load(Ordering::SeqCst)
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn start(
        name: ThreadName,
        context: bool,
    ) -> (ThreadsCommutator, ThreadActor<RenderHandler>, Arc<AtomicBool>) {
        init_tracing();
        let config = BusConfig::default();
        let (inbox, receiver) = Inbox::new(name, config.inbox_capacity);
        let context = Arc::new(AtomicBool::new(context));
        let actor = ThreadActor::spawn(receiver, RenderHandler::new(context.clone()), &config).unwrap();
        let mut commutator = ThreadsCommutator::with_config(config);
        commutator.register_thread(name, inbox);
        (commutator, actor, context)
    }

    /// Round-trip a blocking query so every earlier message has been handled.
    fn barrier(commutator: &ThreadsCommutator, name: ThreadName) -> Option<Option<PointD>> {
        commutator
            .post_blocking(name, |blocker| {
                Message::GetMyPosition(GetMyPositionMessage::new(blocker))
            })
            .unwrap()
    }

    fn flush_tile(key: TileKey, tag: f32) -> Message {
        Message::FlushTile(FlushRenderBucketMessage::new(
            key,
            0,
            GlState::new(1, DepthLayer::Geometry),
            RenderBucket::new(vec![tag], vec![0, 1, 2]),
        ))
    }

    #[test]
    fn test_later_tile_payload_wins() {
        let (commutator, actor, _context) = start(ThreadName::Render, true);
        let key = TileKey::new(3, 4, 8);

        commutator.post_message(ThreadName::Render, flush_tile(key, 1.0));
        commutator.post_message(ThreadName::Render, flush_tile(key, 2.0));
        barrier(&commutator, ThreadName::Render);

        let handler = actor.join().unwrap();
        assert_eq!(handler.tiles.len(), 1);
        assert_eq!(handler.tiles.get(&key).map(|b| b.vertices.clone()), Some(vec![2.0]));
    }

    #[test]
    fn test_blocking_query_round_trip() {
        let (commutator, actor, _context) = start(ThreadName::Backend, true);

        let selected = commutator
            .post_blocking(ThreadName::Backend, |blocker| {
                Message::GetSelectedObject(GetSelectedObjectMessage::new(blocker))
            })
            .unwrap();
        assert_eq!(selected, Some(SelectedObject::Poi));
        assert_eq!(barrier(&commutator, ThreadName::Backend), Some(Some(PointD::new(1.0, 2.0))));

        actor.join().unwrap();
    }

    #[test]
    fn test_ownership_transfers_accepted_once() {
        let (commutator, actor, _context) = start(ThreadName::Render, true);

        for segment_id in [11, 12, 13] {
            commutator.post_message(
                ThreadName::Render,
                Message::FlushRoute(FlushRouteMessage::new(RouteData {
                    segment_id,
                    recache_id: None,
                    buckets: vec![RenderBucket::new(vec![0.0; 4], vec![0, 1, 2])],
                })),
            );
        }
        barrier(&commutator, ThreadName::Render);

        let handler = actor.join().unwrap();
        assert_eq!(handler.routes.len(), 3);
        for (route, segment_id) in handler.routes.iter().zip([11, 12, 13]) {
            assert_eq!(route.segment_id, segment_id);
            assert_eq!(route.buckets, vec![RenderBucket::new(vec![0.0; 4], vec![0, 1, 2])]);
        }
    }

    #[test]
    fn test_messages_handled_in_post_order() {
        let (commutator, actor, _context) = start(ThreadName::Frontend, true);
        for mode in 0..50 {
            commutator.post_message(ThreadName::Frontend, Message::SetDisplacementMode { mode });
        }
        barrier(&commutator, ThreadName::Frontend);

        let handler = actor.join().unwrap();
        assert_eq!(handler.kinds.len(), 51);
        assert!(handler.kinds[..50]
            .iter()
            .all(|kind| *kind == MessageType::SetDisplacementMode));
        assert_eq!(handler.kinds[50], MessageType::GetMyPosition);
    }

    #[test]
    fn test_gl_messages_wait_for_context() {
        let (commutator, actor, context) = start(ThreadName::Render, false);
        let key = TileKey::new(0, 0, 4);

        commutator.post_message(ThreadName::Render, flush_tile(key, 5.0));
        commutator.post_message(ThreadName::Render, Message::Invalidate);
        barrier(&commutator, ThreadName::Render);

        context.store(true, Ordering::SeqCst);
        barrier(&commutator, ThreadName::Render);

        let handler = actor.join().unwrap();
        // The query answers at once; the invalidate stays behind the tile.
        assert_eq!(
            handler.kinds,
            vec![
                MessageType::GetMyPosition,
                MessageType::FlushTile,
                MessageType::Invalidate,
                MessageType::GetMyPosition,
            ]
        );
        assert_eq!(handler.tiles.generation(&key), Some(0));
    }

    #[test]
    fn test_dropped_commutator_stops_actor() {
        let (commutator, actor, _context) = start(ThreadName::TileReader, true);
        commutator.post_message(ThreadName::TileReader, Message::FinishReading);
        drop(commutator);

        let handler = actor.join().unwrap();
        assert!(handler.kinds.len() <= 1);
    }

    #[test]
    fn test_shutdown_releases_blocked_producer() {
        init_tracing();
        let (inbox, receiver) = Inbox::new(ThreadName::Render, None);
        let mut commutator = ThreadsCommutator::new();
        commutator.register_thread(ThreadName::Render, inbox);
        let commutator = Arc::new(commutator);

        // Post before the actor exists so the query is still queued at shutdown.
        let producer = {
            let commutator = commutator.clone();
            thread::spawn(move || barrier(&commutator, ThreadName::Render))
        };
        while receiver.is_empty() {
            thread::yield_now();
        }

        let context = Arc::new(AtomicBool::new(true));
        let actor = ThreadActor::spawn(receiver, RenderHandler::new(context), &BusConfig::default())
            .unwrap();
        actor.shutdown();
        actor.join().unwrap();

        // Either handled (answered) or dropped at shutdown (no answer).
        let answer = producer.join().unwrap();
        assert!(answer.is_none() || answer == Some(Some(PointD::new(1.0, 2.0))));
    }
}
