//! Route messages that transfer compiled route geometry.

use super::payload::{DrapeId, RouteArrowsData, RouteData, RouteSegment};
use super::slot::Slot;

/// Route geometry to be compiled by the backend.
#[derive(Debug)]
pub struct AddRouteSegmentMessage {
    segment_id: DrapeId,
    segment: Slot<RouteSegment>,
    recache_id: Option<u32>,
}

impl AddRouteSegmentMessage {
    /// Add a new segment.
    pub const fn new(segment_id: DrapeId, segment: RouteSegment) -> Self {
        Self {
            segment_id,
            segment: Slot::new(segment),
            recache_id: None,
        }
    }

    /// Rebuild an existing segment as part of recache `recache_id`.
    pub const fn recache(segment_id: DrapeId, segment: RouteSegment, recache_id: u32) -> Self {
        Self {
            segment_id,
            segment: Slot::new(segment),
            recache_id: Some(recache_id),
        }
    }

    /// Segment id.
    pub const fn segment_id(&self) -> DrapeId {
        self.segment_id
    }

    /// Recache generation, if this is a recache.
    pub const fn recache_id(&self) -> Option<u32> {
        self.recache_id
    }

    /// Take the segment geometry.
    pub fn accept_route_segment(&mut self) -> Option<RouteSegment> {
        self.segment.accept()
    }
}

/// Compiled route segment.
#[derive(Debug)]
pub struct FlushRouteMessage {
    route_data: Slot<RouteData>,
}

impl FlushRouteMessage {
    /// Create the message.
    pub const fn new(route_data: RouteData) -> Self {
        Self {
            route_data: Slot::new(route_data),
        }
    }

    /// Take the compiled route.
    pub fn accept_route_data(&mut self) -> Option<RouteData> {
        self.route_data.accept()
    }
}

/// Compiled turn arrows.
#[derive(Debug)]
pub struct FlushRouteArrowsMessage {
    arrows_data: Slot<RouteArrowsData>,
}

impl FlushRouteArrowsMessage {
    /// Create the message.
    pub const fn new(arrows_data: RouteArrowsData) -> Self {
        Self {
            arrows_data: Slot::new(arrows_data),
        }
    }

    /// Take the compiled arrows.
    pub fn accept_route_arrows_data(&mut self) -> Option<RouteArrowsData> {
        self.arrows_data.accept()
    }
}
