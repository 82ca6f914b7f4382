//! User mark layer messages.
//!
//! The frontend owns a [`UserMarksProvider`] per layer and keeps editing it
//! after asking the backend to rebuild the layer. The update message holds a
//! shared handle; the backend read-locks it while it builds geometry, and the
//! provider is released when the last message referencing it is destroyed.

use super::payload::UserMarkShapes;
use super::slot::Slot;
use crate::geometry::PointD;
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

/// One mark on a user layer.
#[derive(Debug, Clone, PartialEq)]
pub struct UserMark {
    /// Stable mark id.
    pub id: u64,
    /// Position in map coordinates.
    pub position: PointD,
    /// Symbol name.
    pub symbol: String,
}

/// Source of marks for one layer.
#[derive(Debug, Default)]
pub struct UserMarksProvider {
    marks: Vec<UserMark>,
}

impl UserMarksProvider {
    /// Create a provider with the given marks.
    pub const fn new(marks: Vec<UserMark>) -> Self {
        Self { marks }
    }

    /// Current marks.
    pub fn marks(&self) -> &[UserMark] {
        &self.marks
    }

    /// Replace the marks.
    pub fn set_marks(&mut self, marks: Vec<UserMark>) {
        self.marks = marks;
    }
}

/// Provider handle shared between the frontend and in-flight messages.
pub type SharedUserMarks = Arc<RwLock<UserMarksProvider>>;

/// Rebuild a user mark layer from its provider.
#[derive(Debug)]
pub struct UpdateUserMarkLayerMessage {
    layer_id: usize,
    provider: SharedUserMarks,
}

impl UpdateUserMarkLayerMessage {
    /// Create the message; it keeps the provider alive until destroyed.
    pub fn new(layer_id: usize, provider: &SharedUserMarks) -> Self {
        Self {
            layer_id,
            provider: Arc::clone(provider),
        }
    }

    /// Layer to rebuild.
    pub const fn layer_id(&self) -> usize {
        self.layer_id
    }

    /// Read-lock the provider for processing. The lock is released when the
    /// guard is dropped.
    pub fn start_process(&self) -> RwLockReadGuard<'_, UserMarksProvider> {
        self.provider.read()
    }
}

/// Compiled user mark geometry for a layer.
#[derive(Debug)]
pub struct FlushUserMarksMessage {
    layer_id: usize,
    shapes: Slot<UserMarkShapes>,
}

impl FlushUserMarksMessage {
    /// Create the message.
    pub const fn new(layer_id: usize, shapes: UserMarkShapes) -> Self {
        Self {
            layer_id,
            shapes: Slot::new(shapes),
        }
    }

    /// Layer the shapes belong to.
    pub const fn layer_id(&self) -> usize {
        self.layer_id
    }

    /// Take the compiled shapes.
    pub fn accept_shapes(&mut self) -> Option<UserMarkShapes> {
        self.shapes.accept()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_layer_keeps_provider_alive() {
        let provider: SharedUserMarks = Arc::new(RwLock::new(UserMarksProvider::new(vec![UserMark {
            id: 1,
            position: PointD::new(0.5, 0.5),
            symbol: "pin".to_string(),
        }])));

        let message = UpdateUserMarkLayerMessage::new(4, &provider);
        assert_eq!(Arc::strong_count(&provider), 2);
        assert_eq!(message.layer_id(), 4);

        {
            let marks = message.start_process();
            assert_eq!(marks.marks().len(), 1);
            assert!(provider.try_write().is_none());
        }
        assert!(provider.try_write().is_some());

        drop(message);
        assert_eq!(Arc::strong_count(&provider), 1);
    }
}
