//! Payload types carried by messages.
//!
//! The resource types here (`RenderBucket`, `LayerRenderer`, `Texture`, ...)
//! stand for GPU-bound objects built on one thread and consumed on another.
//! They are deliberately not `Clone`: they move through a [`Slot`] exactly once.
//!
//! [`Slot`]: super::Slot

use super::tile::TileKey;
use crate::geometry::{PointD, PointF};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a drape-managed object (route segment, preview segment, ...).
pub type DrapeId = u64;

/// Identifier of a loaded map region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MwmId(pub u32);

/// Identifier of a map feature inside a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FeatureId {
    /// Region the feature belongs to.
    pub mwm: MwmId,
    /// Index of the feature inside the region.
    pub index: u32,
}

impl FeatureId {
    /// Create a feature id.
    pub const fn new(mwm: MwmId, index: u32) -> Self {
        Self { mwm, index }
    }
}

/// Target of a removal: everything, or one specific item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal<T> {
    /// Remove every item.
    All,
    /// Remove a single item.
    One(T),
}

// =============================================================================
// GPU resources
// =============================================================================

/// Layer a render state draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthLayer {
    /// Regular map geometry.
    Geometry,
    /// Labels and icons subject to overlay resolution.
    Overlay,
    /// User marks (bookmarks, search results).
    UserMark,
    /// Screen-space GUI widgets.
    Gui,
}

/// GPU pipeline state a bucket must be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlState {
    /// Shader program id.
    pub program: u32,
    /// Bound texture id, if any.
    pub texture: Option<u32>,
    /// Target layer.
    pub depth_layer: DepthLayer,
}

impl GlState {
    /// Create a state for `program` in `depth_layer` without a texture.
    pub const fn new(program: u32, depth_layer: DepthLayer) -> Self {
        Self {
            program,
            texture: None,
            depth_layer,
        }
    }

    /// Attach a texture.
    #[must_use]
    pub const fn with_texture(mut self, texture: u32) -> Self {
        self.texture = Some(texture);
        self
    }
}

/// Batched geometry ready for upload.
#[derive(Debug, Default, PartialEq)]
pub struct RenderBucket {
    /// Interleaved vertex data.
    pub vertices: Vec<f32>,
    /// Index data.
    pub indices: Vec<u32>,
}

impl RenderBucket {
    /// Create a bucket from vertex and index data.
    pub const fn new(vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of indices to draw.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Check whether the bucket draws anything.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// A GPU texture handle with its dimensions.
#[derive(Debug, PartialEq, Eq)]
pub struct Texture {
    /// Texture id.
    pub id: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Lookup textures used by the postprocess pass.
#[derive(Debug, PartialEq, Eq)]
pub struct PostprocessStaticTextures {
    /// Antialiasing area lookup.
    pub area: Texture,
    /// Antialiasing search lookup.
    pub search: Texture,
}

/// Postprocess effects that can be toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostEffect {
    /// Subpixel morphological antialiasing.
    Antialiasing,
}

/// Overlay geometry for one tile.
#[derive(Debug)]
pub struct OverlayRenderData {
    /// Tile the overlays belong to.
    pub tile: TileKey,
    /// State to draw with.
    pub state: GlState,
    /// Overlay geometry.
    pub bucket: RenderBucket,
}

// =============================================================================
// GUI
// =============================================================================

/// Screen-space GUI widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GuiWidget {
    /// Distance ruler.
    Ruler,
    /// Compass rose.
    Compass,
    /// Copyright label.
    Copyright,
    /// Country download status.
    CountryStatus,
    /// Map scale label.
    ScaleLabel,
    /// "Choose position" pin.
    ChoosePositionMark,
    /// Watermark.
    Watermark,
}

/// Pivot positions for widgets that need (re)caching.
pub type WidgetsInitInfo = BTreeMap<GuiWidget, PointF>;

/// Updated pivot positions for already cached widgets.
pub type WidgetsLayoutInfo = BTreeMap<GuiWidget, PointF>;

/// Compiled GUI layer: one bucket per widget.
#[derive(Debug, Default)]
pub struct LayerRenderer {
    /// Widget geometry.
    pub widgets: BTreeMap<GuiWidget, RenderBucket>,
}

impl LayerRenderer {
    /// Check whether the layer contains a widget.
    pub fn has_widget(&self, widget: GuiWidget) -> bool {
        self.widgets.contains_key(&widget)
    }
}

/// Compiled "my position" arrow and accuracy circle.
#[derive(Debug, Default)]
pub struct MyPositionShape {
    /// Arrow and circle geometry.
    pub bucket: RenderBucket,
}

/// Compiled selection highlight.
#[derive(Debug, Default)]
pub struct SelectionShape {
    /// Highlight geometry.
    pub bucket: RenderBucket,
}

/// What kind of object is currently selected on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectedObject {
    /// Nothing is selected.
    #[default]
    Empty,
    /// The user's own position.
    MyPosition,
    /// A point of interest.
    Poi,
    /// A user mark.
    UserMark,
}

/// Transition requested for the "my position" mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MyPositionChange {
    /// Advance to the next mode (follow, follow-and-rotate, ...).
    SwitchNextMode,
    /// Location was lost.
    LoseLocation,
    /// Stop following the user.
    StopFollowing,
}

/// A triangle in map coordinates.
pub type Triangle = [PointD; 3];

// =============================================================================
// Location
// =============================================================================

/// Compass reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompassInfo {
    /// Bearing in radians.
    pub bearing: f64,
}

/// GPS fix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GpsInfo {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Horizontal accuracy in metres.
    pub horizontal_accuracy: f64,
    /// Speed in metres per second.
    pub speed: f64,
    /// Bearing in degrees, if known.
    pub bearing: Option<f64>,
    /// Unix timestamp of the fix.
    pub timestamp: f64,
}

/// Result of matching a fix against the active route.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteMatchingInfo {
    /// Whether the fix was matched to the route.
    pub matched: bool,
    /// Matched position on the route.
    pub position: PointD,
    /// Index of the matched route segment.
    pub segment_index: usize,
}

/// One recorded point of the GPS track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsTrackPoint {
    /// Stable id of the point.
    pub id: u32,
    /// Position in map coordinates.
    pub point: PointD,
    /// Speed in metres per second.
    pub speed: f64,
    /// Unix timestamp.
    pub timestamp: f64,
}

/// Consumer of a circles pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CirclesPackDestination {
    /// GPS track rendering.
    GpsTrack,
    /// Route preview rendering.
    RoutePreview,
}

/// Compiled circles pack.
#[derive(Debug, Default)]
pub struct CirclesPackRenderData {
    /// Number of circles the pack can hold.
    pub points_count: u32,
    /// Circle geometry.
    pub bucket: RenderBucket,
}

// =============================================================================
// Routes
// =============================================================================

/// Route geometry before compilation.
#[derive(Debug, Default)]
pub struct RouteSegment {
    /// Polyline in map coordinates.
    pub polyline: Vec<PointD>,
    /// Line color, RGBA.
    pub color: u32,
}

/// Compiled route segment.
#[derive(Debug, Default)]
pub struct RouteData {
    /// Segment the data belongs to.
    pub segment_id: DrapeId,
    /// Recache generation the data was built for, if it is a recache.
    pub recache_id: Option<u32>,
    /// Route geometry.
    pub buckets: Vec<RenderBucket>,
}

/// Compiled direction arrows for a route segment.
#[derive(Debug, Default)]
pub struct RouteArrowsData {
    /// Segment the arrows belong to.
    pub segment_id: DrapeId,
    /// Arrow geometry.
    pub buckets: Vec<RenderBucket>,
}

/// Extent of one group of turn arrows along a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowBorders {
    /// Distance from route start where the arrow begins.
    pub start_distance: f64,
    /// Distance from route start where the arrow ends.
    pub end_distance: f64,
    /// Arrow group.
    pub group_index: u32,
}

// =============================================================================
// Traffic
// =============================================================================

/// Geometry of traffic segments, keyed by segment id.
pub type TrafficSegmentsGeometry = BTreeMap<u32, Vec<PointD>>;

/// Speed group per traffic segment.
pub type TrafficSegmentsColoring = BTreeMap<u32, u8>;

/// Compiled traffic layer for one tile.
#[derive(Debug)]
pub struct TrafficRenderData {
    /// Tile the data belongs to.
    pub tile: TileKey,
    /// State to draw with.
    pub state: GlState,
    /// Traffic geometry.
    pub bucket: RenderBucket,
}

// =============================================================================
// User marks, drape API, custom symbols
// =============================================================================

/// Compiled user mark geometry, one bucket per state.
pub type UserMarkShapes = Vec<(GlState, RenderBucket)>;

/// A line added through the drape API.
#[derive(Debug, Clone, PartialEq)]
pub struct DrapeApiLine {
    /// Polyline in map coordinates.
    pub points: Vec<PointD>,
    /// Color, RGBA.
    pub color: u32,
    /// Width in pixels.
    pub width: f32,
}

/// Lines added through the drape API, keyed by caller-chosen id.
pub type DrapeApiLines = BTreeMap<String, DrapeApiLine>;

/// Compiled drape API line.
#[derive(Debug)]
pub struct DrapeApiRenderProperty {
    /// Line id.
    pub id: String,
    /// Line geometry.
    pub buckets: Vec<RenderBucket>,
}

/// Custom symbol name per feature.
pub type CustomSymbols = HashMap<FeatureId, String>;
