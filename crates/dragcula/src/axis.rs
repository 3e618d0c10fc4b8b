//! Ordered drop zones: insertion-index computation along one axis.
//!
//! All expensive work happens in the frame callback so fast pointer
//! movement never touches geometry more than once per animation frame.

use std::any::Any;

use dragcula_core::geometry::{Axis, Rect};
use dragcula_core::math::Vec2;
use dragcula_core::ZoneId;

use crate::effect::PointerSample;
use crate::operation::{DragOperation, DragOutcome};
use crate::surface::{DragSurface, ZoneGeometry};
use crate::zone::{DropZone, ZoneCore, ZoneCtx};

/// A drop zone that orders its children along one axis and computes the
/// insertion index the pointer currently implies.
///
/// Geometry is snapshotted once per drag-enter through the injected
/// [`ZoneGeometry`] provider and invalidated on leave/drop; recomputes are
/// coalesced to at most one per animation frame via a pending flag.
pub struct AxisDragZone {
    core: ZoneCore,
    axis: Axis,
    geometry: Box<dyn ZoneGeometry>,
    children_cache: Vec<Rect>,
    container_cache: Option<Rect>,
    scroll_cache: Vec2,
    pointer: Vec2,
    /// The in-flight token: a second recompute request while one is
    /// pending must not schedule another frame.
    frame_pending: bool,
    indicator_visible: bool,
    indicator_shown: bool,
    last_index: Option<usize>,
}

impl AxisDragZone {
    pub fn new(id: ZoneId, axis: Axis, geometry: Box<dyn ZoneGeometry>) -> Self {
        Self {
            core: ZoneCore::new(id),
            axis,
            geometry,
            children_cache: Vec::new(),
            container_cache: None,
            scroll_cache: Vec2::ZERO,
            pointer: Vec2::ZERO,
            frame_pending: false,
            indicator_visible: false,
            indicator_shown: false,
            last_index: None,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The last index applied to the indicator. Cleared on drop; callers
    /// must read the final index from the operation, not from here.
    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    fn snapshot_geometry(&mut self) {
        self.container_cache = Some(self.geometry.container_rect());
        self.scroll_cache = self.geometry.scroll_offset();
        self.children_cache = self.geometry.child_rects();
    }

    fn clear_geometry(&mut self) {
        self.children_cache.clear();
        self.container_cache = None;
    }

    fn request_frame(&mut self, ctx: &mut ZoneCtx<'_>) {
        if !self.frame_pending {
            self.frame_pending = true;
            ctx.frames.request(self.core.id());
        }
    }

    /// The insertion index implied by `point`, with the signed distance to
    /// the closest child center along the axis.
    ///
    /// Convention: distance = child center − pointer. The child with the
    /// minimum absolute distance wins (ties to the first in order), and the
    /// index is incremented only when the distance is strictly negative,
    /// i.e. the pointer is past that child's center. With children centered
    /// at x 50/150/250/350 and the pointer at x 140, the result is index 1.
    ///
    /// Returns `Some((0, 0.0))` with no eligible children; `None` only in
    /// the defensive can't-resolve case.
    pub fn index_at_point(&self, point: Vec2) -> Option<(usize, f32)> {
        if self.children_cache.is_empty() {
            return Some((0, 0.0));
        }
        let container = match self.container_cache {
            Some(rect) => rect,
            None => self.geometry.container_rect(),
        };
        let scroll_main = self.axis.main(self.scroll_cache);
        let relative = self.axis.main(point - container.position()) + scroll_main;

        let mut closest: Option<(usize, f32)> = None;
        for (i, rect) in self.children_cache.iter().enumerate() {
            let center = self.axis.center(rect) + scroll_main;
            let distance = center - relative;
            match closest {
                Some((_, best)) if distance.abs() >= best.abs() => {}
                _ => closest = Some((i, distance)),
            }
        }

        let (mut index, distance) = closest?;
        if distance < 0.0 {
            index += 1;
        }
        Some((index, distance))
    }

    /// Content-relative indicator offset for an insertion index: the leading
    /// edge of the first child, the trailing edge of the last, or centered
    /// in the gap before the target child.
    fn indicator_offset(&self, index: usize) -> f32 {
        let scroll_main = self.axis.main(self.scroll_cache);
        let offset = if self.children_cache.is_empty() {
            0.0
        } else if index == 0 {
            self.axis.leading(&self.children_cache[0])
        } else if index >= self.children_cache.len() {
            let last = &self.children_cache[self.children_cache.len() - 1];
            self.axis.trailing(last)
        } else {
            let target = &self.children_cache[index];
            let prev = &self.children_cache[index - 1];
            let gap = self.axis.leading(target) - self.axis.trailing(prev);
            self.axis.leading(target) - gap / 2.0
        };
        offset + scroll_main
    }

    fn recompute(&mut self, surface: &mut dyn DragSurface) {
        self.frame_pending = false;

        if !self.indicator_visible {
            if self.indicator_shown {
                surface.hide_indicator(self.core.id());
                self.indicator_shown = false;
            }
            return;
        }

        let Some((index, _)) = self.index_at_point(self.pointer) else {
            tracing::error!(zone = %self.core.id(), "index computation failed to resolve a child");
            return;
        };

        if !self.indicator_shown {
            surface.show_indicator(self.core.id(), self.axis);
            self.indicator_shown = true;
            // Fresh indicator always needs an offset, whatever we knew before.
            self.last_index = None;
        }

        if self.last_index != Some(index) {
            let offset = self.indicator_offset(index);
            surface.move_indicator(self.core.id(), offset);
            self.last_index = Some(index);
        }
    }
}

impl DropZone for AxisDragZone {
    fn core(&self) -> &ZoneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ZoneCore {
        &mut self.core
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_drag_enter(
        &mut self,
        drag: &mut DragOperation,
        pointer: PointerSample,
        ctx: &mut ZoneCtx<'_>,
    ) -> bool {
        if !self.accept_drag(drag) {
            return self.core.handle_enter(false, drag, pointer);
        }

        self.pointer = pointer.position;
        self.snapshot_geometry();
        self.indicator_visible = true;
        self.last_index = None;
        self.request_frame(ctx);
        // Show the indicator immediately instead of waiting out the first
        // frame; the pending frame then confirms against a fresh pointer.
        self.recompute(&mut *ctx.surface);

        self.core.handle_enter(true, drag, pointer)
    }

    fn on_drag_over(
        &mut self,
        drag: &mut DragOperation,
        pointer: PointerSample,
        ctx: &mut ZoneCtx<'_>,
    ) {
        if !self.core.is_target {
            return;
        }
        if self.pointer != pointer.position {
            self.pointer = pointer.position;
            self.request_frame(ctx);
        }
        self.core.handle_over(drag, pointer);
    }

    fn on_drag_leave(
        &mut self,
        drag: &mut DragOperation,
        pointer: PointerSample,
        ctx: &mut ZoneCtx<'_>,
    ) {
        self.pointer = pointer.position;
        self.indicator_visible = false;
        self.clear_geometry();
        self.last_index = None;
        self.request_frame(ctx);
        self.core.handle_leave(drag, pointer);
    }

    fn on_drop(
        &mut self,
        drag: &mut DragOperation,
        pointer: PointerSample,
        ctx: &mut ZoneCtx<'_>,
    ) -> DragOutcome {
        self.pointer = pointer.position;
        // The operation carries the final index out of the zone; internal
        // state is cleared before the drop handlers even run.
        drag.index = self.last_index;
        self.last_index = None;
        self.indicator_visible = false;
        self.clear_geometry();
        self.recompute(&mut *ctx.surface);

        self.core.handle_drop(drag, pointer)
    }

    fn run_frame(&mut self, surface: &mut dyn DragSurface) {
        self.recompute(surface);
    }
}
