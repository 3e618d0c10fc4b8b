//! Drop zones: the base contract every drop target implements.

use std::any::Any;

use dragcula_core::ZoneId;

use crate::effect::{EffectSet, PointerSample};
use crate::event::{DragEvent, DragEventKind, HandlerTable, HandlerToken};
use crate::operation::{DragOperation, DragOutcome};
use crate::surface::DragSurface;

/// Deduplicated queue of zones with a recompute pending for the next
/// animation frame. The per-zone pending flag is the in-flight token; the
/// queue only remembers who to visit when the host drives a frame.
#[derive(Debug, Default)]
pub struct FrameQueue {
    zones: Vec<ZoneId>,
}

impl FrameQueue {
    pub fn request(&mut self, zone: ZoneId) {
        if !self.zones.contains(&zone) {
            self.zones.push(zone);
        }
    }

    pub fn drain(&mut self) -> Vec<ZoneId> {
        std::mem::take(&mut self.zones)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Coordinator-owned capabilities handed to zone hooks.
pub struct ZoneCtx<'a> {
    pub surface: &'a mut dyn DragSurface,
    pub frames: &'a mut FrameQueue,
}

/// State shared by every zone kind: identity, target flag, allowed effects,
/// and the consumer handler table.
pub struct ZoneCore {
    id: ZoneId,
    /// True only while the pointer is over this zone during an active
    /// operation.
    pub is_target: bool,
    pub effects_allowed: EffectSet,
    handlers: HandlerTable,
}

impl ZoneCore {
    pub fn new(id: ZoneId) -> Self {
        Self {
            id,
            is_target: false,
            effects_allowed: EffectSet::default(),
            handlers: HandlerTable::default(),
        }
    }

    pub fn id(&self) -> ZoneId {
        self.id
    }

    /// Register a consumer handler; the token removes it again.
    pub fn on(
        &mut self,
        kind: DragEventKind,
        handler: impl FnMut(&mut DragEvent) + 'static,
    ) -> HandlerToken {
        self.handlers.on(kind, Box::new(handler))
    }

    pub fn off(&mut self, token: HandlerToken) {
        self.handlers.off(token);
    }

    /// Build an event snapshot, dispatch it guarded, and hand it back so
    /// callers can inspect cancellation.
    pub(crate) fn emit(
        &mut self,
        kind: DragEventKind,
        drag: &DragOperation,
        pointer: PointerSample,
    ) -> DragEvent {
        let mut event = DragEvent::snapshot(kind, drag, pointer);
        self.handlers.dispatch(&mut event);
        event
    }

    /// Base drag-enter behavior: become the target and notify consumers,
    /// but only when the zone accepted the operation.
    pub fn handle_enter(
        &mut self,
        accepted: bool,
        drag: &DragOperation,
        pointer: PointerSample,
    ) -> bool {
        if !accepted {
            tracing::debug!(zone = %self.id, operation = %drag.id(), "drag enter rejected");
            return false;
        }
        tracing::debug!(zone = %self.id, operation = %drag.id(), "drag enter");
        self.is_target = true;
        self.emit(DragEventKind::DragEnter, drag, pointer);
        true
    }

    /// Base drag-over behavior: advisory notification only. Anything
    /// expensive belongs in a specialization's frame callback.
    pub fn handle_over(&mut self, drag: &DragOperation, pointer: PointerSample) {
        self.emit(DragEventKind::DragOver, drag, pointer);
    }

    pub fn handle_leave(&mut self, drag: &DragOperation, pointer: PointerSample) {
        tracing::debug!(zone = %self.id, operation = %drag.id(), "drag leave");
        self.is_target = false;
        self.emit(DragEventKind::DragLeave, drag, pointer);
    }

    /// Base drop behavior: dispatch the cancellable `Drop` event and report
    /// how the gesture should finish.
    pub fn handle_drop(&mut self, drag: &DragOperation, pointer: PointerSample) -> DragOutcome {
        tracing::debug!(zone = %self.id, operation = %drag.id(), index = ?drag.index, "drop");
        self.is_target = false;
        let event = self.emit(DragEventKind::Drop, drag, pointer);
        if event.is_aborted() {
            DragOutcome::Aborted
        } else {
            DragOutcome::Completed
        }
    }
}

/// The drop-target contract.
///
/// All hooks have default implementations delegating to [`ZoneCore`], so a
/// plain zone only supplies the accessors. A zone receiving `on_drag_enter`
/// while already targeted by a different operation treats the new operation
/// as authoritative; there is no state merging.
pub trait DropZone {
    fn core(&self) -> &ZoneCore;
    fn core_mut(&mut self) -> &mut ZoneCore;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Whether this zone will accept the operation at all.
    fn accept_drag(&self, _drag: &DragOperation) -> bool {
        true
    }

    /// Returns whether the zone accepted the operation, setting the target
    /// flag as a side effect when it did.
    fn on_drag_enter(
        &mut self,
        drag: &mut DragOperation,
        pointer: PointerSample,
        _ctx: &mut ZoneCtx<'_>,
    ) -> bool {
        let accepted = self.accept_drag(drag);
        self.core_mut().handle_enter(accepted, drag, pointer)
    }

    /// Called on every (browser-throttled) drag-over tick. Must stay cheap.
    fn on_drag_over(
        &mut self,
        drag: &mut DragOperation,
        pointer: PointerSample,
        _ctx: &mut ZoneCtx<'_>,
    ) {
        self.core_mut().handle_over(drag, pointer);
    }

    fn on_drag_leave(
        &mut self,
        drag: &mut DragOperation,
        pointer: PointerSample,
        _ctx: &mut ZoneCtx<'_>,
    ) {
        self.core_mut().handle_leave(drag, pointer);
    }

    /// Finalize a drop on this zone.
    fn on_drop(
        &mut self,
        drag: &mut DragOperation,
        pointer: PointerSample,
        _ctx: &mut ZoneCtx<'_>,
    ) -> DragOutcome {
        self.core_mut().handle_drop(drag, pointer)
    }

    /// Run a batched geometry recompute. Only specializations that schedule
    /// frames implement this.
    fn run_frame(&mut self, _surface: &mut dyn DragSurface) {}
}

/// A plain drop zone with no index computation.
pub struct BasicDragZone {
    core: ZoneCore,
}

impl BasicDragZone {
    pub fn new(id: ZoneId) -> Self {
        Self {
            core: ZoneCore::new(id),
        }
    }
}

impl DropZone for BasicDragZone {
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
}
