//! Closed discriminant of every message the bus carries.

/// Identifies the concrete variant of a [`Message`](super::Message).
///
/// Consumers route on this value. Adding a message means adding a member here
/// and a variant to `Message`; both matches are exhaustive, so the compiler
/// points at every place that needs a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageType {
    // Reading and tiles
    /// The tile reader finished a reading pass.
    FinishReading,
    /// A set of tiles finished reading.
    FinishTileRead,
    /// Geometry bucket for one tile.
    FlushTile,
    /// Overlay geometry for several tiles.
    FlushOverlays,
    /// A map rectangle needs repainting.
    InvalidateRect,
    /// The read manager should re-evaluate visible tiles.
    UpdateReadManager,
    /// Drop read tiles in a set (or all of them).
    InvalidateReadManagerRect,
    /// Traffic geometry for one tile.
    FlushTrafficGeometry,

    // User marks
    /// Remove every mark of a layer.
    ClearUserMarkLayer,
    /// Show or hide a mark layer.
    ChangeUserMarkLayerVisibility,
    /// Rebuild a mark layer from its provider.
    UpdateUserMarkLayer,
    /// Compiled mark geometry.
    FlushUserMarks,

    // GUI and map shapes
    /// Compiled GUI layer.
    GuiLayerRecached,
    /// Rebuild GUI widgets.
    GuiRecache,
    /// Rebuild my-position and selection shapes.
    MapShapesRecache,
    /// Move already cached widgets.
    GuiLayerLayout,
    /// Show the "choose position" pin.
    ShowChoosePositionMark,
    /// Toggle kinetic scrolling.
    SetKineticScrollEnabled,
    /// Enter or leave "add new place" mode.
    SetAddNewPlaceMode,
    /// Block or unblock tap handling.
    BlockTapEvents,
    /// Compiled my-position and selection shapes.
    MapShapes,
    /// Change the my-position mode.
    ChangeMyPositionMode,
    /// New compass reading.
    CompassInfo,
    /// New GPS fix.
    GpsInfo,
    /// Ask which POI is visible at a point.
    FindVisiblePoi,
    /// Select an object (or dismiss the selection).
    SelectObject,
    /// Ask what is currently selected.
    GetSelectedObject,
    /// Ask for the current position.
    GetMyPosition,

    // Routes
    /// Route geometry to compile.
    AddRouteSegment,
    /// Compile turn arrows for a segment.
    CacheRouteArrows,
    /// Remove a route segment.
    RemoveRouteSegment,
    /// Compiled route segment.
    FlushRoute,
    /// Compiled turn arrows.
    FlushRouteArrows,
    /// Add a straight preview segment.
    AddRoutePreviewSegment,
    /// Remove one or all preview segments.
    RemoveRoutePreviewSegment,
    /// Show or hide a route segment.
    SetRouteSegmentVisibility,
    /// Start following the route.
    FollowRoute,
    /// Stop following the route.
    DeactivateRouteFollowing,

    // Style, viewport and miscellany
    /// Apply a modified map style.
    UpdateMapStyle,
    /// Switch to another map style.
    SwitchMapStyle,
    /// Request a repaint.
    Invalidate,
    /// Rebuild GPU resources after context loss.
    RecoverGlResources,
    /// Set the unobscured part of the screen.
    SetVisibleViewport,
    /// Allow perspective mode and 3D buildings.
    Allow3dMode,
    /// Allow automatic zoom while navigating.
    AllowAutoZoom,
    /// Allow 3D buildings.
    Allow3dBuildings,
    /// Turn perspective on.
    EnablePerspective,
    /// Compile a circles pack.
    CacheCirclesPack,
    /// Compiled circles pack.
    FlushCirclesPack,
    /// Add and remove GPS track points.
    UpdateGpsTrackPoints,
    /// Remove every GPS track point.
    ClearGpsTrackPoints,
    /// Report how long the app spent in background.
    SetTimeInBackground,
    /// Set the overlay displacement mode.
    SetDisplacementMode,
    /// Ask for symbol sizes.
    RequestSymbolsSize,
    /// Toggle a postprocess effect.
    SetPosteffectEnabled,
    /// Postprocess lookup textures.
    SetPostprocessStaticTextures,
    /// Play the first-launch animation.
    RunFirstLaunchAnimation,
    /// Reload metalines.
    UpdateMetalines,

    // Traffic
    /// Toggle traffic.
    EnableTraffic,
    /// Rebuild traffic geometry.
    RegenerateTraffic,
    /// New traffic coloring.
    UpdateTraffic,
    /// Compiled traffic layer.
    FlushTrafficData,
    /// Drop traffic for a region.
    ClearTrafficData,
    /// Use simplified traffic colors.
    SetSimplifiedTrafficColors,

    // Drape API and custom symbols
    /// Add drape API lines.
    DrapeApiAddLines,
    /// Remove one or all drape API lines.
    DrapeApiRemove,
    /// Compiled drape API lines.
    DrapeApiFlush,
    /// Custom symbols to show.
    AddCustomSymbols,
    /// Remove custom symbols for a region or everywhere.
    RemoveCustomSymbols,
    /// Features whose custom symbols changed.
    UpdateCustomSymbols,
}

impl MessageType {
    /// Every message type, in declaration order.
    pub const ALL: &'static [Self] = &[
        Self::FinishReading,
        Self::FinishTileRead,
        Self::FlushTile,
        Self::FlushOverlays,
        Self::InvalidateRect,
        Self::UpdateReadManager,
        Self::InvalidateReadManagerRect,
        Self::FlushTrafficGeometry,
        Self::ClearUserMarkLayer,
        Self::ChangeUserMarkLayerVisibility,
        Self::UpdateUserMarkLayer,
        Self::FlushUserMarks,
        Self::GuiLayerRecached,
        Self::GuiRecache,
        Self::MapShapesRecache,
        Self::GuiLayerLayout,
        Self::ShowChoosePositionMark,
        Self::SetKineticScrollEnabled,
        Self::SetAddNewPlaceMode,
        Self::BlockTapEvents,
        Self::MapShapes,
        Self::ChangeMyPositionMode,
        Self::CompassInfo,
        Self::GpsInfo,
        Self::FindVisiblePoi,
        Self::SelectObject,
        Self::GetSelectedObject,
        Self::GetMyPosition,
        Self::AddRouteSegment,
        Self::CacheRouteArrows,
        Self::RemoveRouteSegment,
        Self::FlushRoute,
        Self::FlushRouteArrows,
        Self::AddRoutePreviewSegment,
        Self::RemoveRoutePreviewSegment,
        Self::SetRouteSegmentVisibility,
        Self::FollowRoute,
        Self::DeactivateRouteFollowing,
        Self::UpdateMapStyle,
        Self::SwitchMapStyle,
        Self::Invalidate,
        Self::RecoverGlResources,
        Self::SetVisibleViewport,
        Self::Allow3dMode,
        Self::AllowAutoZoom,
        Self::Allow3dBuildings,
        Self::EnablePerspective,
        Self::CacheCirclesPack,
        Self::FlushCirclesPack,
        Self::UpdateGpsTrackPoints,
        Self::ClearGpsTrackPoints,
        Self::SetTimeInBackground,
        Self::SetDisplacementMode,
        Self::RequestSymbolsSize,
        Self::SetPosteffectEnabled,
        Self::SetPostprocessStaticTextures,
        Self::RunFirstLaunchAnimation,
        Self::UpdateMetalines,
        Self::EnableTraffic,
        Self::RegenerateTraffic,
        Self::UpdateTraffic,
        Self::FlushTrafficData,
        Self::ClearTrafficData,
        Self::SetSimplifiedTrafficColors,
        Self::DrapeApiAddLines,
        Self::DrapeApiRemove,
        Self::DrapeApiFlush,
        Self::AddCustomSymbols,
        Self::RemoveCustomSymbols,
        Self::UpdateCustomSymbols,
    ];

    /// Whether applying this message touches GPU state.
    ///
    /// Such messages must only be applied while a rendering context is current
    /// on the consumer thread.
    pub const fn is_gl_context_dependent(self) -> bool {
        matches!(
            self,
            Self::FlushTile
                | Self::FlushOverlays
                | Self::FlushUserMarks
                | Self::GuiLayerRecached
                | Self::GuiRecache
                | Self::MapShapesRecache
                | Self::GuiLayerLayout
                | Self::MapShapes
                | Self::SelectObject
                | Self::FlushRoute
                | Self::RecoverGlResources
                | Self::FlushCirclesPack
                | Self::FlushTrafficData
        )
    }

    /// Whether the producer waits for this message to be destroyed.
    pub const fn is_blocking(self) -> bool {
        matches!(
            self,
            Self::InvalidateReadManagerRect
                | Self::FindVisiblePoi
                | Self::GetSelectedObject
                | Self::GetMyPosition
                | Self::UpdateMapStyle
                | Self::SwitchMapStyle
        )
    }

    /// Whether the message is scoped to a single tile.
    pub const fn is_tile_scoped(self) -> bool {
        matches!(self, Self::FlushTile | Self::FlushTrafficGeometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_is_unique() {
        let unique: HashSet<_> = MessageType::ALL.iter().collect();
        assert_eq!(unique.len(), MessageType::ALL.len());
        assert_eq!(MessageType::ALL.len(), 70);
    }

    #[test]
    fn test_gl_dependency_flags() {
        assert!(MessageType::FlushTile.is_gl_context_dependent());
        assert!(MessageType::RecoverGlResources.is_gl_context_dependent());
        assert!(!MessageType::FlushRouteArrows.is_gl_context_dependent());
        assert!(!MessageType::Invalidate.is_gl_context_dependent());

        let count = MessageType::ALL
            .iter()
            .filter(|kind| kind.is_gl_context_dependent())
            .count();
        assert_eq!(count, 13);
    }

    #[test]
    fn test_blocking_types_never_need_context() {
        for kind in MessageType::ALL.iter().filter(|kind| kind.is_blocking()) {
            assert!(!kind.is_gl_context_dependent(), "{kind:?}");
        }
    }
}
