//! TileStore: Per-tile aggregation on the consumer side.
//!
//! The latest payload delivered for a tile replaces the previous one; nothing
//! is merged. Each payload carries the generation of the read pass that
//! produced it. Invalidation records a marker so that payloads already in
//! flight from an older pass are rejected when they arrive.

use crate::geometry::RectD;
use crate::message::{TileKey, TileMessage};
use std::collections::BTreeMap;

#[derive(Debug)]
struct Entry<T> {
    generation: u64,
    data: T,
}

/// Last-writer-wins store of tile payloads.
#[derive(Debug)]
pub struct TileStore<T> {
    tiles: BTreeMap<TileKey, Entry<T>>,
    /// Per-tile invalidation markers.
    markers: BTreeMap<TileKey, u64>,
    /// Rectangle invalidation markers, in map coordinates.
    rect_markers: Vec<(RectD, u64)>,
    /// Global invalidation marker.
    floor: u64,
}

impl<T> TileStore<T> {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            tiles: BTreeMap::new(),
            markers: BTreeMap::new(),
            rect_markers: Vec::new(),
            floor: 0,
        }
    }

    /// Whether a payload of `generation` for `key` would be rejected.
    pub fn is_stale(&self, key: TileKey, generation: u64) -> bool {
        if generation < self.floor {
            return true;
        }
        if self.markers.get(&key).is_some_and(|&marker| generation < marker) {
            return true;
        }
        if self.rect_markers.iter().any(|(rect, marker)| {
            generation < *marker && key.global_rect().intersects(rect)
        }) {
            return true;
        }
        self.tiles
            .get(&key)
            .is_some_and(|entry| generation < entry.generation)
    }

    /// Store `data` for `key`, replacing any previous payload.
    ///
    /// Returns `false` and drops `data` if it is stale.
    pub fn insert(&mut self, key: TileKey, generation: u64, data: T) -> bool {
        if self.is_stale(key, generation) {
            tracing::trace!(?key, generation, "rejected stale tile payload");
            return false;
        }
        // The stored generation now guards the tile on its own.
        self.markers.remove(&key);
        self.tiles.insert(key, Entry { generation, data });
        true
    }

    /// Store the payload of a tile message.
    pub fn apply<M: TileMessage + ?Sized>(&mut self, message: &M, data: T) -> bool {
        self.insert(message.key(), message.generation(), data)
    }

    /// Current payload of `key`.
    pub fn get(&self, key: &TileKey) -> Option<&T> {
        self.tiles.get(key).map(|entry| &entry.data)
    }

    /// Generation of the current payload of `key`.
    pub fn generation(&self, key: &TileKey) -> Option<u64> {
        self.tiles.get(key).map(|entry| entry.generation)
    }

    /// Remove the payload of `key`.
    pub fn remove(&mut self, key: &TileKey) -> Option<T> {
        self.tiles.remove(key).map(|entry| entry.data)
    }

    /// Drop `tiles` and reject their payloads older than `generation`.
    pub fn invalidate_tiles<'a, I>(&mut self, tiles: I, generation: u64) -> usize
    where
        I: IntoIterator<Item = &'a TileKey>,
    {
        let mut removed = 0;
        for key in tiles {
            self.mark(*key, generation);
            if self.tiles.remove(key).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Drop every tile intersecting `rect` and reject payloads older than
    /// `generation` for any tile intersecting it, including tiles whose first
    /// payload has not arrived yet.
    pub fn invalidate_rect(&mut self, rect: &RectD, generation: u64) -> usize {
        let before = self.tiles.len();
        self.tiles.retain(|key, _| !key.global_rect().intersects(rect));
        self.rect_markers
            .retain(|(old, marker)| *marker > generation || !covers(rect, old));
        self.rect_markers.push((*rect, generation));
        before - self.tiles.len()
    }

    /// Drop every tile and reject all payloads older than `generation`.
    pub fn invalidate_all(&mut self, generation: u64) -> usize {
        let removed = self.tiles.len();
        self.tiles.clear();
        self.markers.retain(|_, marker| *marker > generation);
        self.rect_markers.retain(|(_, marker)| *marker > generation);
        self.floor = self.floor.max(generation);
        removed
    }

    /// Number of tiles with a payload.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tile has a payload.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles and their payloads in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&TileKey, &T)> {
        self.tiles.iter().map(|(key, entry)| (key, &entry.data))
    }

    fn mark(&mut self, key: TileKey, generation: u64) {
        let marker = self.markers.entry(key).or_insert(0);
        *marker = (*marker).max(generation);
    }
}

fn covers(outer: &RectD, inner: &RectD) -> bool {
    outer.min_x <= inner.min_x
        && outer.min_y <= inner.min_y
        && outer.max_x >= inner.max_x
        && outer.max_y >= inner.max_y
}

impl<T> Default for TileStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
