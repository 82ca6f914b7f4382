//! GUI layer, map shapes and selection messages.

use super::payload::{
    FeatureId, LayerRenderer, MyPositionShape, SelectedObject, SelectionShape, Triangle,
    WidgetsLayoutInfo,
};
use super::slot::Slot;
use crate::geometry::PointD;

/// Compiled GUI layer handed to the render thread.
#[derive(Debug)]
pub struct GuiLayerRecachedMessage {
    renderer: Slot<LayerRenderer>,
    need_reset_old_gui: bool,
}

impl GuiLayerRecachedMessage {
    /// Create the message.
    pub const fn new(renderer: LayerRenderer, need_reset_old_gui: bool) -> Self {
        Self {
            renderer: Slot::new(renderer),
            need_reset_old_gui,
        }
    }

    /// Take ownership of the compiled layer.
    pub fn accept_renderer(&mut self) -> Option<LayerRenderer> {
        self.renderer.accept()
    }

    /// Whether the previous layer must be discarded instead of merged.
    pub const fn need_reset_old_gui(&self) -> bool {
        self.need_reset_old_gui
    }
}

/// New pivots for already cached widgets.
#[derive(Debug)]
pub struct GuiLayerLayoutMessage {
    layout_info: Slot<WidgetsLayoutInfo>,
}

impl GuiLayerLayoutMessage {
    /// Create the message.
    pub const fn new(layout_info: WidgetsLayoutInfo) -> Self {
        Self {
            layout_info: Slot::new(layout_info),
        }
    }

    /// Borrow the layout, if it has not been taken yet.
    pub const fn layout_info(&self) -> Option<&WidgetsLayoutInfo> {
        self.layout_info.peek()
    }

    /// Take the layout.
    pub fn accept_layout_info(&mut self) -> Option<WidgetsLayoutInfo> {
        self.layout_info.accept()
    }
}

/// Compiled my-position and selection shapes.
///
/// The two shapes are independent: each can be accepted on its own.
#[derive(Debug)]
pub struct MapShapesMessage {
    shape: Slot<MyPositionShape>,
    selection: Slot<SelectionShape>,
}

impl MapShapesMessage {
    /// Create the message.
    pub const fn new(shape: MyPositionShape, selection: SelectionShape) -> Self {
        Self {
            shape: Slot::new(shape),
            selection: Slot::new(selection),
        }
    }

    /// Take the my-position shape.
    pub fn accept_shape(&mut self) -> Option<MyPositionShape> {
        self.shape.accept()
    }

    /// Take the selection shape.
    pub fn accept_selection(&mut self) -> Option<SelectionShape> {
        self.selection.accept()
    }
}

/// Enter or leave "add new place" mode.
#[derive(Debug)]
pub struct SetAddNewPlaceModeMessage {
    enable: bool,
    bound_area: Slot<Vec<Triangle>>,
    enable_kinetic_scroll: bool,
    position: Option<PointD>,
}

impl SetAddNewPlaceModeMessage {
    /// Create the message. `position` is where the pin starts, if known.
    pub const fn new(
        enable: bool,
        bound_area: Vec<Triangle>,
        enable_kinetic_scroll: bool,
        position: Option<PointD>,
    ) -> Self {
        Self {
            enable,
            bound_area: Slot::new(bound_area),
            enable_kinetic_scroll,
            position,
        }
    }

    /// Take the area the pin may move in.
    pub fn accept_bound_area(&mut self) -> Option<Vec<Triangle>> {
        self.bound_area.accept()
    }

    /// Whether the mode is being entered.
    pub const fn is_enabled(&self) -> bool {
        self.enable
    }

    /// Whether kinetic scrolling stays on in this mode.
    pub const fn is_kinetic_scroll_enabled(&self) -> bool {
        self.enable_kinetic_scroll
    }

    /// Initial pin position.
    pub const fn position(&self) -> Option<PointD> {
        self.position
    }
}

/// Select an object on the map, or dismiss the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectObjectMessage {
    selected: SelectedObject,
    point: PointD,
    feature_id: Option<FeatureId>,
    is_anim: bool,
    is_dismiss: bool,
}

impl SelectObjectMessage {
    /// Select `selected` at `point`.
    pub const fn new(
        selected: SelectedObject,
        point: PointD,
        feature_id: Option<FeatureId>,
        is_anim: bool,
    ) -> Self {
        Self {
            selected,
            point,
            feature_id,
            is_anim,
            is_dismiss: false,
        }
    }

    /// Dismiss the current selection.
    pub const fn dismiss() -> Self {
        Self {
            selected: SelectedObject::Empty,
            point: PointD::ZERO,
            feature_id: None,
            is_anim: false,
            is_dismiss: true,
        }
    }

    /// Kind of object selected.
    pub const fn selected_object(&self) -> SelectedObject {
        self.selected
    }

    /// Position of the selection.
    pub const fn position(&self) -> PointD {
        self.point
    }

    /// Feature selected, if the selection is a feature.
    pub const fn feature_id(&self) -> Option<FeatureId> {
        self.feature_id
    }

    /// Whether the selection should animate.
    pub const fn is_anim(&self) -> bool {
        self.is_anim
    }

    /// Whether this dismisses the selection.
    pub const fn is_dismiss(&self) -> bool {
        self.is_dismiss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::payload::{GuiWidget, RenderBucket};
    use crate::geometry::PointF;

    #[test]
    fn test_map_shapes_independent_accept() {
        let mut message = MapShapesMessage::new(
            MyPositionShape {
                bucket: RenderBucket::new(vec![1.0], vec![0]),
            },
            SelectionShape::default(),
        );

        assert!(message.accept_selection().is_some());
        assert!(message.accept_selection().is_none());
        let shape = message.accept_shape().unwrap();
        assert_eq!(shape.bucket.index_count(), 1);
        assert!(message.accept_shape().is_none());
    }

    #[test]
    fn test_gui_layout_peek_then_accept() {
        let mut layout = WidgetsLayoutInfo::new();
        layout.insert(GuiWidget::Compass, PointF::new(10.0, 20.0));
        let mut message = GuiLayerLayoutMessage::new(layout);

        assert_eq!(message.layout_info().map(|l| l.len()), Some(1));
        let taken = message.accept_layout_info().unwrap();
        assert_eq!(taken.get(&GuiWidget::Compass), Some(&PointF::new(10.0, 20.0)));
        assert!(message.layout_info().is_none());
    }

    #[test]
    fn test_select_object_dismiss() {
        let message = SelectObjectMessage::dismiss();
        assert!(message.is_dismiss());
        assert_eq!(message.selected_object(), SelectedObject::Empty);

        let message = SelectObjectMessage::new(SelectedObject::Poi, PointD::new(1.0, 1.0), None, true);
        assert!(!message.is_dismiss());
        assert!(message.is_anim());
    }
}
