//! Blocking request/response protocol.
//!
//! A producer that needs a consumer-side answer creates a [`Blocker`], builds
//! a blocking message from it, posts the message and calls [`Blocker::wait`].
//! The message owns the matching [`Completion`]. Dropping the completion is
//! the one and only signal: it publishes the response (if the consumer wrote
//! one) and wakes the producer. Because it lives in `Drop`, the signal fires on
//! every path that destroys the message: normal handling, a deferred message
//! dropped at shutdown, a rejected post, or unwinding out of a handler.
//!
//! There is no built-in deadline. If the consumer never destroys the message
//! the producer waits forever; `wait_timeout` exists for callers that opt in.
//!
//! ```ignore
//! let blocker = Blocker::new();
//! commutator.post_message(ThreadName::Render, Message::GetSelectedObject(GetSelectedObjectMessage::new(&blocker)));
//! let selected = blocker.wait().unwrap_or_default();
//! ```

use super::payload::{FeatureId, SelectedObject};
use super::tile::{TileKey, TilesCollection};
use crate::error::BusError;
use crate::geometry::PointD;
use parking_lot::{Condvar, Mutex};
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

struct BlockerState<T> {
    blocked: bool,
    response: Option<T>,
}

struct Shared<T> {
    state: Mutex<BlockerState<T>>,
    signal: Condvar,
}

/// Producer side of a one-shot synchronous request.
///
/// Pair it with exactly one message through [`Blocker::completion`], post the
/// message, then [`wait`](Blocker::wait). Waiting consumes the blocker.
pub struct Blocker<T = ()> {
    shared: Arc<Shared<T>>,
    paired: Cell<bool>,
}

impl<T> Blocker<T> {
    /// Create an unpaired blocker.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(BlockerState {
                    blocked: true,
                    response: None,
                }),
                signal: Condvar::new(),
            }),
            paired: Cell::new(false),
        }
    }

    /// Create the completion handle a blocking message carries.
    ///
    /// # Panics
    ///
    /// Panics if the blocker is already paired with another message.
    pub fn completion(&self) -> Completion<T> {
        assert!(
            !self.paired.replace(true),
            "blocker is already paired with a message"
        );
        Completion {
            shared: Arc::clone(&self.shared),
            response: None,
        }
    }

    /// Whether the paired message has been destroyed.
    pub fn is_signaled(&self) -> bool {
        !self.shared.state.lock().blocked
    }

    /// Block until the paired message is destroyed, then return its response.
    ///
    /// `None` means the consumer destroyed the message without responding.
    ///
    /// # Panics
    ///
    /// Panics if no message was ever paired with this blocker, since nothing
    /// could wake the caller.
    pub fn wait(self) -> Option<T> {
        assert!(self.paired.get(), "waiting on a blocker that no message will signal");
        let mut state = self.shared.state.lock();
        self.shared.signal.wait_while(&mut state, |state| state.blocked);
        state.response.take()
    }

    /// Like [`wait`](Blocker::wait), but gives up after `timeout`.
    ///
    /// Timing out does not cancel the message; it is still delivered and
    /// destroyed on the consumer thread, its response is just discarded.
    pub fn wait_timeout(self, timeout: Duration) -> Result<Option<T>, BusError> {
        assert!(self.paired.get(), "waiting on a blocker that no message will signal");
        let mut state = self.shared.state.lock();
        self.shared
            .signal
            .wait_while_for(&mut state, |state| state.blocked, timeout);
        if state.blocked {
            return Err(BusError::WaitTimedOut(timeout));
        }
        Ok(state.response.take())
    }
}

impl<T> Default for Blocker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Blocker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blocker")
            .field("paired", &self.paired.get())
            .field("signaled", &self.is_signaled())
            .finish()
    }
}

/// Consumer side of a blocking request, owned by the message.
///
/// Signals its blocker exactly once, when dropped.
pub struct Completion<T> {
    shared: Arc<Shared<T>>,
    response: Option<T>,
}

impl<T> Completion<T> {
    /// Store the response handed to the producer once the message is destroyed.
    pub fn respond(&mut self, value: T) {
        self.response = Some(value);
    }
}

impl<T> Drop for Completion<T> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        debug_assert!(state.blocked, "blocker signalled twice");
        state.response = self.response.take();
        state.blocked = false;
        self.shared.signal.notify_one();
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("responded", &self.response.is_some())
            .finish()
    }
}

// =============================================================================
// Blocking messages
// =============================================================================

/// Drop read tiles so they are read again.
#[derive(Debug)]
pub struct InvalidateReadManagerRectMessage {
    _completion: Completion<()>,
    tiles: Option<TilesCollection>,
}

impl InvalidateReadManagerRectMessage {
    /// Invalidate the given tiles.
    pub fn new(blocker: &Blocker, tiles: TilesCollection) -> Self {
        Self {
            _completion: blocker.completion(),
            tiles: Some(tiles),
        }
    }

    /// Invalidate every read tile.
    pub fn all(blocker: &Blocker) -> Self {
        Self {
            _completion: blocker.completion(),
            tiles: None,
        }
    }

    /// Tiles to invalidate; empty when everything is invalidated.
    pub fn tiles_for_invalidate(&self) -> impl Iterator<Item = &TileKey> {
        self.tiles.iter().flatten()
    }

    /// Whether every tile must be invalidated.
    pub const fn need_invalidate_all(&self) -> bool {
        self.tiles.is_none()
    }
}

/// Ask which POI is visible at a map point.
#[derive(Debug)]
pub struct FindVisiblePoiMessage {
    completion: Completion<FeatureId>,
    point: PointD,
}

impl FindVisiblePoiMessage {
    /// Create the request.
    pub fn new(blocker: &Blocker<FeatureId>, point: PointD) -> Self {
        Self {
            completion: blocker.completion(),
            point,
        }
    }

    /// Point to look at, in map coordinates.
    pub const fn point(&self) -> PointD {
        self.point
    }

    /// Answer with the POI found.
    pub fn set_feature_id(&mut self, id: FeatureId) {
        self.completion.respond(id);
    }
}

/// Ask what is currently selected.
#[derive(Debug)]
pub struct GetSelectedObjectMessage {
    completion: Completion<SelectedObject>,
}

impl GetSelectedObjectMessage {
    /// Create the request.
    pub fn new(blocker: &Blocker<SelectedObject>) -> Self {
        Self {
            completion: blocker.completion(),
        }
    }

    /// Answer with the current selection.
    pub fn set_selected_object(&mut self, object: SelectedObject) {
        self.completion.respond(object);
    }
}

/// Ask for the user's current position.
///
/// The response is `None` when no position is known.
#[derive(Debug)]
pub struct GetMyPositionMessage {
    completion: Completion<Option<PointD>>,
}

impl GetMyPositionMessage {
    /// Create the request.
    pub fn new(blocker: &Blocker<Option<PointD>>) -> Self {
        Self {
            completion: blocker.completion(),
        }
    }

    /// Answer with the current position, if any.
    pub fn set_my_position(&mut self, position: Option<PointD>) {
        self.completion.respond(position);
    }
}

/// Style change that the producer waits on before continuing.
///
/// Used for both `UpdateMapStyle` and `SwitchMapStyle`.
#[derive(Debug)]
pub struct MapStyleMessage {
    _completion: Completion<()>,
}

impl MapStyleMessage {
    /// Create the message.
    pub fn new(blocker: &Blocker) -> Self {
        Self {
            _completion: blocker.completion(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::payload::MwmId;
    use std::thread;

    #[test]
    fn test_drop_signals_waiter() {
        let blocker: Blocker<SelectedObject> = Blocker::new();
        let mut message = GetSelectedObjectMessage::new(&blocker);
        assert!(!blocker.is_signaled());

        let consumer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            message.set_selected_object(SelectedObject::Poi);
            drop(message);
        });

        assert_eq!(blocker.wait(), Some(SelectedObject::Poi));
        consumer.join().unwrap();
    }

    #[test]
    fn test_drop_without_response() {
        let blocker = Blocker::new();
        let message = MapStyleMessage::new(&blocker);
        drop(message);
        assert!(blocker.is_signaled());
        assert_eq!(blocker.wait(), None);
    }

    #[test]
    fn test_signal_on_unwind() {
        let blocker: Blocker<FeatureId> = Blocker::new();
        let message = FindVisiblePoiMessage::new(&blocker, PointD::new(1.0, 2.0));

        let consumer = thread::spawn(move || {
            let mut message = message;
            message.set_feature_id(FeatureId::new(MwmId(1), 9));
            panic!("handler failed");
        });

        assert!(consumer.join().is_err());
        assert_eq!(blocker.wait(), Some(FeatureId::new(MwmId(1), 9)));
    }

    #[test]
    fn test_wait_timeout_elapses() {
        let blocker = Blocker::new();
        let message = MapStyleMessage::new(&blocker);
        let result = blocker.wait_timeout(Duration::from_millis(10));
        assert!(matches!(result, Err(BusError::WaitTimedOut(_))));
        drop(message);
    }

    #[test]
    fn test_wait_timeout_completed() {
        let blocker: Blocker<Option<PointD>> = Blocker::new();
        let mut message = GetMyPositionMessage::new(&blocker);
        message.set_my_position(Some(PointD::new(3.0, 4.0)));
        drop(message);
        let result = blocker.wait_timeout(Duration::from_millis(10)).unwrap();
        assert_eq!(result, Some(Some(PointD::new(3.0, 4.0))));
    }

    #[test]
    #[should_panic(expected = "already paired")]
    fn test_double_pairing_panics() {
        let blocker = Blocker::new();
        let _first = MapStyleMessage::new(&blocker);
        let _second = MapStyleMessage::new(&blocker);
    }

    #[test]
    #[should_panic(expected = "no message will signal")]
    fn test_wait_unpaired_panics() {
        let blocker: Blocker = Blocker::new();
        blocker.wait();
    }

    #[test]
    fn test_invalidate_read_manager_rect() {
        let blocker = Blocker::new();
        let tiles: TilesCollection = [TileKey::new(1, 1, 5)].into();
        let message = InvalidateReadManagerRectMessage::new(&blocker, tiles);
        assert!(!message.need_invalidate_all());
        assert_eq!(message.tiles_for_invalidate().count(), 1);
        drop(message);
        assert!(blocker.is_signaled());

        let blocker = Blocker::new();
        let message = InvalidateReadManagerRectMessage::all(&blocker);
        assert!(message.need_invalidate_all());
        assert_eq!(message.tiles_for_invalidate().count(), 0);
    }
}
