//! Messages: typed commands passed between engine threads.
//!
//! A [`Message`] is created on the producer thread, moved into the
//! [`ThreadsCommutator`](crate::ThreadsCommutator), and consumed and dropped
//! exactly once on the destination thread. Dropping it is meaningful: blocking
//! messages wake their producer from `Drop`, and any ownership-transfer
//! payload that was never accepted is released there.
//!
//! Simple commands are inline variants. Variants that transfer ownership,
//! block the producer or belong to a tile wrap a dedicated struct.

mod blocking;
mod gui;
mod kind;
mod payload;
mod resources;
mod route;
mod slot;
mod tile;
mod user_marks;

pub use blocking::{
    Blocker, Completion, FindVisiblePoiMessage, GetMyPositionMessage, GetSelectedObjectMessage,
    InvalidateReadManagerRectMessage, MapStyleMessage,
};
pub use gui::{
    GuiLayerLayoutMessage, GuiLayerRecachedMessage, MapShapesMessage, SelectObjectMessage,
    SetAddNewPlaceModeMessage,
};
pub use kind::MessageType;
pub use payload::{
    ArrowBorders, CirclesPackDestination, CirclesPackRenderData, CompassInfo, CustomSymbols,
    DepthLayer, DrapeApiLine, DrapeApiLines, DrapeApiRenderProperty, DrapeId, FeatureId, GlState,
    GpsInfo, GpsTrackPoint, GuiWidget, LayerRenderer, MwmId, MyPositionChange, MyPositionShape,
    OverlayRenderData, PostEffect, PostprocessStaticTextures, Removal, RenderBucket,
    RouteArrowsData, RouteData, RouteMatchingInfo, RouteSegment, SelectedObject, SelectionShape,
    Texture, TrafficRenderData, TrafficSegmentsColoring, TrafficSegmentsGeometry, Triangle,
    UserMarkShapes, WidgetsInitInfo, WidgetsLayoutInfo,
};
pub use resources::{
    AddCustomSymbolsMessage, DrapeApiFlushMessage, FlushCirclesPackMessage,
    FlushTrafficDataMessage, RequestSymbolsSizeMessage, SetPostprocessStaticTexturesMessage,
    SymbolsSizeCallback, UpdateCustomSymbolsMessage,
};
pub use route::{AddRouteSegmentMessage, FlushRouteArrowsMessage, FlushRouteMessage};
pub use slot::Slot;
pub use tile::{
    FinishTileReadMessage, FlushOverlaysMessage, FlushRenderBucketMessage,
    FlushTrafficGeometryMessage, TileKey, TileMessage, TilesCollection,
};
pub use user_marks::{
    FlushUserMarksMessage, SharedUserMarks, UpdateUserMarkLayerMessage, UserMark,
    UserMarksProvider,
};

use crate::geometry::{PointD, RectD};
use std::fmt;

/// A command for another engine thread.
pub enum Message {
    // Reading and tiles
    /// The tile reader finished a reading pass.
    FinishReading,
    /// A set of tiles finished reading.
    FinishTileRead(FinishTileReadMessage),
    /// Geometry bucket for one tile.
    FlushTile(FlushRenderBucketMessage),
    /// Overlay geometry for several tiles.
    FlushOverlays(FlushOverlaysMessage),
    /// A map rectangle needs repainting.
    InvalidateRect {
        /// Rectangle in map coordinates.
        rect: RectD,
    },
    /// Re-evaluate visible tiles.
    UpdateReadManager,
    /// Drop read tiles (blocking).
    InvalidateReadManagerRect(InvalidateReadManagerRectMessage),
    /// Traffic geometry for one tile.
    FlushTrafficGeometry(FlushTrafficGeometryMessage),

    // User marks
    /// Remove every mark of a layer.
    ClearUserMarkLayer {
        /// Layer id.
        layer_id: usize,
    },
    /// Show or hide a mark layer.
    ChangeUserMarkLayerVisibility {
        /// Layer id.
        layer_id: usize,
        /// New visibility.
        visible: bool,
    },
    /// Rebuild a mark layer from its provider.
    UpdateUserMarkLayer(UpdateUserMarkLayerMessage),
    /// Compiled mark geometry.
    FlushUserMarks(FlushUserMarksMessage),

    // GUI and map shapes
    /// Compiled GUI layer.
    GuiLayerRecached(GuiLayerRecachedMessage),
    /// Rebuild GUI widgets.
    GuiRecache {
        /// Widgets to build and their pivots.
        init_info: WidgetsInitInfo,
        /// Discard the previous layer instead of merging.
        need_reset_old_gui: bool,
    },
    /// Rebuild my-position and selection shapes.
    MapShapesRecache,
    /// Move already cached widgets.
    GuiLayerLayout(GuiLayerLayoutMessage),
    /// Show the "choose position" pin.
    ShowChoosePositionMark,
    /// Toggle kinetic scrolling.
    SetKineticScrollEnabled {
        /// New state.
        enabled: bool,
    },
    /// Enter or leave "add new place" mode.
    SetAddNewPlaceMode(SetAddNewPlaceModeMessage),
    /// Block or unblock tap handling.
    BlockTapEvents {
        /// Whether taps are blocked.
        block: bool,
    },
    /// Compiled my-position and selection shapes.
    MapShapes(MapShapesMessage),
    /// Change the my-position mode.
    ChangeMyPositionMode {
        /// Requested transition.
        change: MyPositionChange,
    },
    /// New compass reading.
    CompassInfo(CompassInfo),
    /// New GPS fix.
    GpsInfo {
        /// The fix.
        info: GpsInfo,
        /// Whether a route is being navigated.
        is_navigable: bool,
        /// Route matching result for the fix.
        route_info: RouteMatchingInfo,
    },
    /// Ask which POI is visible at a point (blocking).
    FindVisiblePoi(FindVisiblePoiMessage),
    /// Select an object or dismiss the selection.
    SelectObject(SelectObjectMessage),
    /// Ask what is selected (blocking).
    GetSelectedObject(GetSelectedObjectMessage),
    /// Ask for the current position (blocking).
    GetMyPosition(GetMyPositionMessage),

    // Routes
    /// Route geometry to compile.
    AddRouteSegment(AddRouteSegmentMessage),
    /// Compile turn arrows for a segment.
    CacheRouteArrows {
        /// Segment id.
        segment_id: DrapeId,
        /// Arrow extents.
        borders: Vec<ArrowBorders>,
        /// Recache generation, if this is a recache.
        recache_id: Option<u32>,
    },
    /// Remove a route segment.
    RemoveRouteSegment {
        /// Segment id.
        segment_id: DrapeId,
        /// Also stop following the route.
        deactivate_following: bool,
    },
    /// Compiled route segment.
    FlushRoute(FlushRouteMessage),
    /// Compiled turn arrows.
    FlushRouteArrows(FlushRouteArrowsMessage),
    /// Add a straight preview segment.
    AddRoutePreviewSegment {
        /// Segment id.
        segment_id: DrapeId,
        /// Start point.
        start: PointD,
        /// Finish point.
        finish: PointD,
    },
    /// Remove one or all preview segments.
    RemoveRoutePreviewSegment {
        /// What to remove.
        target: Removal<DrapeId>,
    },
    /// Show or hide a route segment.
    SetRouteSegmentVisibility {
        /// Segment id.
        segment_id: DrapeId,
        /// New visibility.
        visible: bool,
    },
    /// Start following the route.
    FollowRoute {
        /// Zoom level to follow at in 2D.
        preferred_zoom: i32,
        /// Zoom level to follow at in 3D.
        preferred_zoom_3d: i32,
        /// Whether auto zoom is on.
        enable_auto_zoom: bool,
    },
    /// Stop following the route.
    DeactivateRouteFollowing,

    // Style, viewport and miscellany
    /// Apply a modified map style (blocking).
    UpdateMapStyle(MapStyleMessage),
    /// Switch to another map style (blocking).
    SwitchMapStyle(MapStyleMessage),
    /// Request a repaint.
    Invalidate,
    /// Rebuild GPU resources after context loss.
    RecoverGlResources,
    /// Set the unobscured part of the screen.
    SetVisibleViewport {
        /// Viewport rectangle in pixels.
        rect: RectD,
    },
    /// Allow perspective mode and 3D buildings.
    Allow3dMode {
        /// Allow perspective.
        allow_perspective: bool,
        /// Allow 3D buildings.
        allow_3d_buildings: bool,
    },
    /// Allow automatic zoom while navigating.
    AllowAutoZoom {
        /// New state.
        allow: bool,
    },
    /// Allow 3D buildings.
    Allow3dBuildings {
        /// New state.
        allow: bool,
    },
    /// Turn perspective on.
    EnablePerspective,
    /// Compile a circles pack.
    CacheCirclesPack {
        /// Capacity of the pack.
        points_count: u32,
        /// Who the pack is for.
        destination: CirclesPackDestination,
    },
    /// Compiled circles pack.
    FlushCirclesPack(FlushCirclesPackMessage),
    /// Add and remove GPS track points. Applied incrementally.
    UpdateGpsTrackPoints {
        /// Points to add.
        to_add: Vec<GpsTrackPoint>,
        /// Ids of points to remove.
        to_remove: Vec<u32>,
    },
    /// Remove every GPS track point.
    ClearGpsTrackPoints,
    /// Report how long the app spent in background.
    SetTimeInBackground {
        /// Seconds spent in background.
        seconds: f64,
    },
    /// Set the overlay displacement mode.
    SetDisplacementMode {
        /// Mode id.
        mode: u8,
    },
    /// Ask for symbol sizes.
    RequestSymbolsSize(RequestSymbolsSizeMessage),
    /// Toggle a postprocess effect.
    SetPosteffectEnabled {
        /// Effect.
        effect: PostEffect,
        /// New state.
        enabled: bool,
    },
    /// Postprocess lookup textures.
    SetPostprocessStaticTextures(SetPostprocessStaticTexturesMessage),
    /// Play the first-launch animation.
    RunFirstLaunchAnimation,
    /// Reload metalines.
    UpdateMetalines,

    // Traffic
    /// Toggle traffic.
    EnableTraffic {
        /// New state.
        enabled: bool,
    },
    /// Rebuild traffic geometry.
    RegenerateTraffic,
    /// New traffic coloring.
    UpdateTraffic {
        /// Speed group per segment.
        coloring: TrafficSegmentsColoring,
    },
    /// Compiled traffic layer.
    FlushTrafficData(FlushTrafficDataMessage),
    /// Drop traffic for a region.
    ClearTrafficData {
        /// Region.
        mwm: MwmId,
    },
    /// Use simplified traffic colors.
    SetSimplifiedTrafficColors {
        /// New state.
        simplified: bool,
    },

    // Drape API and custom symbols
    /// Add drape API lines.
    DrapeApiAddLines {
        /// Lines by id.
        lines: DrapeApiLines,
    },
    /// Remove one or all drape API lines.
    DrapeApiRemove {
        /// What to remove.
        target: Removal<String>,
    },
    /// Compiled drape API lines.
    DrapeApiFlush(DrapeApiFlushMessage),
    /// Custom symbols to show.
    AddCustomSymbols(AddCustomSymbolsMessage),
    /// Remove custom symbols for a region or everywhere.
    RemoveCustomSymbols {
        /// What to remove.
        target: Removal<MwmId>,
    },
    /// Features whose custom symbols changed.
    UpdateCustomSymbols(UpdateCustomSymbolsMessage),
}

impl Message {
    /// Discriminant of this message.
    pub const fn kind(&self) -> MessageType {
        match self {
            Self::FinishReading => MessageType::FinishReading,
            Self::FinishTileRead(_) => MessageType::FinishTileRead,
            Self::FlushTile(_) => MessageType::FlushTile,
            Self::FlushOverlays(_) => MessageType::FlushOverlays,
            Self::InvalidateRect { .. } => MessageType::InvalidateRect,
            Self::UpdateReadManager => MessageType::UpdateReadManager,
            Self::InvalidateReadManagerRect(_) => MessageType::InvalidateReadManagerRect,
            Self::FlushTrafficGeometry(_) => MessageType::FlushTrafficGeometry,
            Self::ClearUserMarkLayer { .. } => MessageType::ClearUserMarkLayer,
            Self::ChangeUserMarkLayerVisibility { .. } => MessageType::ChangeUserMarkLayerVisibility,
            Self::UpdateUserMarkLayer(_) => MessageType::UpdateUserMarkLayer,
            Self::FlushUserMarks(_) => MessageType::FlushUserMarks,
            Self::GuiLayerRecached(_) => MessageType::GuiLayerRecached,
            Self::GuiRecache { .. } => MessageType::GuiRecache,
            Self::MapShapesRecache => MessageType::MapShapesRecache,
            Self::GuiLayerLayout(_) => MessageType::GuiLayerLayout,
            Self::ShowChoosePositionMark => MessageType::ShowChoosePositionMark,
            Self::SetKineticScrollEnabled { .. } => MessageType::SetKineticScrollEnabled,
            Self::SetAddNewPlaceMode(_) => MessageType::SetAddNewPlaceMode,
            Self::BlockTapEvents { .. } => MessageType::BlockTapEvents,
            Self::MapShapes(_) => MessageType::MapShapes,
            Self::ChangeMyPositionMode { .. } => MessageType::ChangeMyPositionMode,
            Self::CompassInfo(_) => MessageType::CompassInfo,
            Self::GpsInfo { .. } => MessageType::GpsInfo,
            Self::FindVisiblePoi(_) => MessageType::FindVisiblePoi,
            Self::SelectObject(_) => MessageType::SelectObject,
            Self::GetSelectedObject(_) => MessageType::GetSelectedObject,
            Self::GetMyPosition(_) => MessageType::GetMyPosition,
            Self::AddRouteSegment(_) => MessageType::AddRouteSegment,
            Self::CacheRouteArrows { .. } => MessageType::CacheRouteArrows,
            Self::RemoveRouteSegment { .. } => MessageType::RemoveRouteSegment,
            Self::FlushRoute(_) => MessageType::FlushRoute,
            Self::FlushRouteArrows(_) => MessageType::FlushRouteArrows,
            Self::AddRoutePreviewSegment { .. } => MessageType::AddRoutePreviewSegment,
            Self::RemoveRoutePreviewSegment { .. } => MessageType::RemoveRoutePreviewSegment,
            Self::SetRouteSegmentVisibility { .. } => MessageType::SetRouteSegmentVisibility,
            Self::FollowRoute { .. } => MessageType::FollowRoute,
            Self::DeactivateRouteFollowing => MessageType::DeactivateRouteFollowing,
            Self::UpdateMapStyle(_) => MessageType::UpdateMapStyle,
            Self::SwitchMapStyle(_) => MessageType::SwitchMapStyle,
            Self::Invalidate => MessageType::Invalidate,
            Self::RecoverGlResources => MessageType::RecoverGlResources,
            Self::SetVisibleViewport { .. } => MessageType::SetVisibleViewport,
            Self::Allow3dMode { .. } => MessageType::Allow3dMode,
            Self::AllowAutoZoom { .. } => MessageType::AllowAutoZoom,
            Self::Allow3dBuildings { .. } => MessageType::Allow3dBuildings,
            Self::EnablePerspective => MessageType::EnablePerspective,
            Self::CacheCirclesPack { .. } => MessageType::CacheCirclesPack,
            Self::FlushCirclesPack(_) => MessageType::FlushCirclesPack,
            Self::UpdateGpsTrackPoints { .. } => MessageType::UpdateGpsTrackPoints,
            Self::ClearGpsTrackPoints => MessageType::ClearGpsTrackPoints,
            Self::SetTimeInBackground { .. } => MessageType::SetTimeInBackground,
            Self::SetDisplacementMode { .. } => MessageType::SetDisplacementMode,
            Self::RequestSymbolsSize(_) => MessageType::RequestSymbolsSize,
            Self::SetPosteffectEnabled { .. } => MessageType::SetPosteffectEnabled,
            Self::SetPostprocessStaticTextures(_) => MessageType::SetPostprocessStaticTextures,
            Self::RunFirstLaunchAnimation => MessageType::RunFirstLaunchAnimation,
            Self::UpdateMetalines => MessageType::UpdateMetalines,
            Self::EnableTraffic { .. } => MessageType::EnableTraffic,
            Self::RegenerateTraffic => MessageType::RegenerateTraffic,
            Self::UpdateTraffic { .. } => MessageType::UpdateTraffic,
            Self::FlushTrafficData(_) => MessageType::FlushTrafficData,
            Self::ClearTrafficData { .. } => MessageType::ClearTrafficData,
            Self::SetSimplifiedTrafficColors { .. } => MessageType::SetSimplifiedTrafficColors,
            Self::DrapeApiAddLines { .. } => MessageType::DrapeApiAddLines,
            Self::DrapeApiRemove { .. } => MessageType::DrapeApiRemove,
            Self::DrapeApiFlush(_) => MessageType::DrapeApiFlush,
            Self::AddCustomSymbols(_) => MessageType::AddCustomSymbols,
            Self::RemoveCustomSymbols { .. } => MessageType::RemoveCustomSymbols,
            Self::UpdateCustomSymbols(_) => MessageType::UpdateCustomSymbols,
        }
    }

    /// Whether applying this message requires a current GPU context.
    #[inline]
    pub const fn is_gl_context_dependent(&self) -> bool {
        self.kind().is_gl_context_dependent()
    }

    /// Whether a producer is waiting for this message to be destroyed.
    #[inline]
    pub const fn is_blocking(&self) -> bool {
        self.kind().is_blocking()
    }

    /// The tile-scoped view of this message, if it belongs to a tile.
    pub fn as_tile_message(&self) -> Option<&dyn TileMessage> {
        match self {
            Self::FlushTile(message) => Some(message as &dyn TileMessage),
            Self::FlushTrafficGeometry(message) => Some(message as &dyn TileMessage),
            _ => None,
        }
    }

    /// Tile the message belongs to, if it is tile-scoped.
    pub fn tile_key(&self) -> Option<TileKey> {
        self.as_tile_message().map(TileMessage::key)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple("Message");
        tuple.field(&self.kind());
        if let Some(key) = self.tile_key() {
            tuple.field(&key);
        }
        tuple.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(tag: f32) -> RenderBucket {
        RenderBucket::new(vec![tag], vec![0, 1, 2])
    }

    #[test]
    fn test_kind_matches_variant() {
        let key = TileKey::new(3, 4, 8);
        let state = GlState::new(1, DepthLayer::Geometry);
        let message = Message::FlushTile(FlushRenderBucketMessage::new(key, 0, state, bucket(1.0)));
        assert_eq!(message.kind(), MessageType::FlushTile);
        assert!(message.is_gl_context_dependent());
        assert!(!message.is_blocking());
        assert_eq!(message.tile_key(), Some(key));
        assert_eq!(format!("{message:?}"), "Message(FlushTile, TileKey(3, 4, z8))");

        let message = Message::Invalidate;
        assert_eq!(message.kind(), MessageType::Invalidate);
        assert!(!message.is_gl_context_dependent());
        assert_eq!(message.tile_key(), None);
    }

    #[test]
    fn test_blocking_variant_flags() {
        let blocker = Blocker::new();
        let message = Message::SwitchMapStyle(MapStyleMessage::new(&blocker));
        assert!(message.is_blocking());
        assert!(!message.is_gl_context_dependent());
        drop(message);
        assert!(blocker.is_signaled());
    }

    #[test]
    fn test_kind_and_tile_scope_agree() {
        let traffic = Message::FlushTrafficGeometry(FlushTrafficGeometryMessage::new(
            TileKey::new(0, 0, 2),
            5,
            TrafficSegmentsGeometry::new(),
        ));
        assert!(traffic.kind().is_tile_scoped());
        assert_eq!(traffic.as_tile_message().map(TileMessage::generation), Some(5));
        assert!(!Message::FinishReading.kind().is_tile_scoped());
    }

    #[test]
    fn test_accepted_slot_stays_empty_inside_message() {
        let mut inner = FlushRouteMessage::new(RouteData {
            segment_id: 9,
            recache_id: None,
            buckets: vec![bucket(2.0)],
        });
        assert!(inner.accept_route_data().is_some());
        let message = Message::FlushRoute(inner);
        match message {
            Message::FlushRoute(mut inner) => assert!(inner.accept_route_data().is_none()),
            _ => unreachable!(),
        }
    }
}
