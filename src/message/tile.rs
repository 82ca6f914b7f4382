//! Tile-scoped messages.
//!
//! A tile message carries the [`TileKey`] it belongs to and the generation of
//! the read pass that produced it. Consumers keep the latest payload per tile
//! and use the generation as a freshness marker to drop stale payloads that
//! were already in flight when an invalidation happened.

use super::payload::{GlState, OverlayRenderData, RenderBucket, TrafficSegmentsGeometry};
use super::slot::Slot;
use crate::geometry::RectD;
use std::collections::BTreeSet;
use std::fmt;

/// Identifies a map tile by its coordinates and zoom level.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    /// Zoom level.
    pub zoom: u8,
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
}

impl TileKey {
    /// Create a tile key.
    #[inline]
    pub const fn new(x: i32, y: i32, zoom: u8) -> Self {
        Self { zoom, x, y }
    }

    /// Extent of the tile in map coordinates.
    ///
    /// The world spans `[-180, 180]` on both axes with tile `(0, 0)` starting
    /// at the origin, so a tile at zoom `z` is `360 / 2^z` wide.
    pub fn global_rect(&self) -> RectD {
        let size = WORLD_SIZE / f64::from(1_u32 << u32::from(self.zoom.min(MAX_ZOOM)));
        let min_x = f64::from(self.x) * size;
        let min_y = f64::from(self.y) * size;
        RectD::new(min_x, min_y, min_x + size, min_y + size)
    }
}

const WORLD_SIZE: f64 = 360.0;
const MAX_ZOOM: u8 = 30;

impl fmt::Debug for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileKey({}, {}, z{})", self.x, self.y, self.zoom)
    }
}

/// Ordered set of tiles.
pub type TilesCollection = BTreeSet<TileKey>;

/// Common accessors of tile-scoped messages.
pub trait TileMessage {
    /// Tile the message belongs to.
    fn key(&self) -> TileKey;

    /// Read-pass generation that produced the payload.
    fn generation(&self) -> u64;
}

/// Geometry bucket for one tile, drawn with a specific GPU state.
#[derive(Debug)]
pub struct FlushRenderBucketMessage {
    key: TileKey,
    generation: u64,
    state: GlState,
    buffer: Slot<RenderBucket>,
}

impl FlushRenderBucketMessage {
    /// Create the message.
    pub const fn new(key: TileKey, generation: u64, state: GlState, buffer: RenderBucket) -> Self {
        Self {
            key,
            generation,
            state,
            buffer: Slot::new(buffer),
        }
    }

    /// GPU state the bucket must be drawn with.
    pub const fn state(&self) -> &GlState {
        &self.state
    }

    /// Take ownership of the bucket. Returns `None` after the first call.
    pub fn accept_buffer(&mut self) -> Option<RenderBucket> {
        self.buffer.accept()
    }
}

impl TileMessage for FlushRenderBucketMessage {
    fn key(&self) -> TileKey {
        self.key
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

/// Traffic segment geometry for one tile.
#[derive(Debug)]
pub struct FlushTrafficGeometryMessage {
    key: TileKey,
    generation: u64,
    segments: Slot<TrafficSegmentsGeometry>,
}

impl FlushTrafficGeometryMessage {
    /// Create the message.
    pub const fn new(key: TileKey, generation: u64, segments: TrafficSegmentsGeometry) -> Self {
        Self {
            key,
            generation,
            segments: Slot::new(segments),
        }
    }

    /// Take ownership of the segment geometry.
    pub fn accept_segments(&mut self) -> Option<TrafficSegmentsGeometry> {
        self.segments.accept()
    }
}

impl TileMessage for FlushTrafficGeometryMessage {
    fn key(&self) -> TileKey {
        self.key
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

/// A set of tiles finished reading.
#[derive(Debug)]
pub struct FinishTileReadMessage {
    tiles: Slot<TilesCollection>,
}

impl FinishTileReadMessage {
    /// Create the message.
    pub fn new(tiles: impl Into<TilesCollection>) -> Self {
        Self {
            tiles: Slot::new(tiles.into()),
        }
    }

    /// Borrow the tiles, if they have not been taken yet.
    pub const fn tiles(&self) -> Option<&TilesCollection> {
        self.tiles.peek()
    }

    /// Take the tiles.
    pub fn accept_tiles(&mut self) -> Option<TilesCollection> {
        self.tiles.accept()
    }
}

/// Overlay geometry for a batch of tiles.
#[derive(Debug)]
pub struct FlushOverlaysMessage {
    data: Slot<Vec<OverlayRenderData>>,
}

impl FlushOverlaysMessage {
    /// Create the message.
    pub const fn new(data: Vec<OverlayRenderData>) -> Self {
        Self {
            data: Slot::new(data),
        }
    }

    /// Take ownership of the overlay data.
    pub fn accept_render_data(&mut self) -> Option<Vec<OverlayRenderData>> {
        self.data.accept()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::payload::DepthLayer;

    #[test]
    fn test_tile_key_ordering() {
        let a = TileKey::new(3, 4, 8);
        let b = TileKey::new(0, 0, 9);
        assert!(a < b, "lower zoom sorts first");
        assert_eq!(a, TileKey::new(3, 4, 8));
        assert_eq!(format!("{a:?}"), "TileKey(3, 4, z8)");
    }

    #[test]
    fn test_tile_global_rect() {
        let rect = TileKey::new(0, 0, 0).global_rect();
        assert_eq!((rect.min_x, rect.max_x), (0.0, 360.0));

        let rect = TileKey::new(-1, 2, 3).global_rect();
        assert_eq!(rect.width(), 45.0);
        assert_eq!((rect.min_x, rect.min_y), (-45.0, 90.0));
    }

    #[test]
    fn test_flush_bucket_accept_once() {
        let bucket = RenderBucket::new(vec![0.0, 1.0], vec![0, 1, 2]);
        let state = GlState::new(7, DepthLayer::Geometry);
        let mut message = FlushRenderBucketMessage::new(TileKey::new(1, 2, 10), 3, state, bucket);

        assert_eq!(message.key(), TileKey::new(1, 2, 10));
        assert_eq!(message.generation(), 3);
        assert_eq!(message.state().program, 7);

        let first = message.accept_buffer().unwrap();
        assert_eq!(first.index_count(), 3);
        assert!(message.accept_buffer().is_none());
    }

    #[test]
    fn test_finish_tile_read_tiles() {
        let tiles: TilesCollection = [TileKey::new(0, 0, 1), TileKey::new(1, 0, 1)].into();
        let mut message = FinishTileReadMessage::new(tiles);
        assert_eq!(message.tiles().map(BTreeSet::len), Some(2));
        assert_eq!(message.accept_tiles().map(|t| t.len()), Some(2));
        assert!(message.tiles().is_none());
    }
}
