//! Host capability traits.
//!
//! The coordination algorithms never touch a real UI tree. Everything the
//! host document provides — global attribute hooks, indicator rendering,
//! item preview movement, hit testing, zone geometry — enters through the
//! traits in this module. A webview bridge implements them against the DOM;
//! tests implement them with synthetic rectangles.

use dragcula_core::geometry::{Axis, Rect};
use dragcula_core::math::Vec2;
use dragcula_core::{ItemId, ZoneId};

use crate::operation::DragOutcome;

/// Document-level side effects of a drag operation.
///
/// The `set_dragging`/`set_drag_target` hooks back the stylesheet-visible
/// body attributes; leaving them stuck on is the bug class the coordinator's
/// cleanup path exists to prevent.
pub trait DragSurface {
    /// Toggle the process-wide "a drag is active" hook.
    fn set_dragging(&mut self, active: bool);

    /// Mirror the current target zone into the document hook, or clear it.
    fn set_drag_target(&mut self, zone: Option<ZoneId>);

    /// Create the insertion indicator for a zone. Called lazily, on first
    /// need only.
    fn show_indicator(&mut self, zone: ZoneId, axis: Axis);

    /// Move a zone's indicator to `offset` along the zone's axis,
    /// content-relative. Only called when the computed index changed.
    fn move_indicator(&mut self, zone: ZoneId, offset: f32);

    /// Remove a zone's indicator.
    fn hide_indicator(&mut self, zone: ZoneId);

    /// Lift an item out of normal flow when its drag starts.
    fn lift_item(&mut self, _item: ItemId) {}

    /// Move the floating preview of a dragged item.
    fn move_item_preview(&mut self, _item: ItemId, _position: Vec2) {}

    /// Return an item to normal flow when its drag ends.
    fn settle_item(&mut self, _item: ItemId, _outcome: DragOutcome) {}

    /// Whether the host can run view transitions. When `false`, every
    /// transition-related path degrades to a plain update.
    fn supports_view_transitions(&self) -> bool {
        false
    }

    /// Run `update` inside a view transition if supported; hosts without
    /// support just invoke it directly.
    fn run_view_transition(&mut self, update: &mut dyn FnMut()) {
        update();
    }
}

/// A surface that does nothing. Useful for headless tests of the pure
/// algorithms and as a placeholder before a host attaches.
#[derive(Debug, Default)]
pub struct NullSurface;

impl DragSurface for NullSurface {
    fn set_dragging(&mut self, _active: bool) {}
    fn set_drag_target(&mut self, _zone: Option<ZoneId>) {}
    fn show_indicator(&mut self, _zone: ZoneId, _axis: Axis) {}
    fn move_indicator(&mut self, _zone: ZoneId, _offset: f32) {}
    fn hide_indicator(&mut self, _zone: ZoneId) {}
}

/// Resolves which zones enclose a point or an item.
///
/// Chains are innermost-first; the registry picks the first entry that is
/// actually registered, so "nearest ancestor wins" without the lookup code
/// knowing anything about the host's tree structure.
pub trait HitTester {
    /// Candidate zone ids enclosing `point`, innermost first.
    fn zone_chain_at(&self, point: Vec2) -> Vec<ZoneId>;

    /// Candidate zone ids enclosing an item's element, innermost first.
    fn zone_chain_of_item(&self, item: ItemId) -> Vec<ZoneId>;
}

/// A hit tester that never finds a zone.
#[derive(Debug, Default)]
pub struct NullHitTester;

impl HitTester for NullHitTester {
    fn zone_chain_at(&self, _point: Vec2) -> Vec<ZoneId> {
        Vec::new()
    }

    fn zone_chain_of_item(&self, _item: ItemId) -> Vec<ZoneId> {
        Vec::new()
    }
}

/// Geometry source for an axis drop zone.
///
/// `child_rects` must return only eligible children: elements carrying the
/// drag-item marker, excluding the item currently being dragged. Rects are
/// container-relative. The zone snapshots this once per drag-enter and
/// never queries mid-gesture, so implementations may measure eagerly.
pub trait ZoneGeometry {
    fn container_rect(&self) -> Rect;

    fn scroll_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn child_rects(&self) -> Vec<Rect>;
}
