//! Draggable items.

use dragcula_core::ItemId;

use crate::data::{DragData, TransferPayload};
use crate::effect::{DragEffect, PointerSample};
use crate::event::{DragEvent, DragEventKind, HandlerTable, HandlerToken};
use crate::operation::DragOperation;

/// Minimum pointer travel (px) before a pressed item becomes a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;

/// A draggable element: identity, typed payload, requested effect, and the
/// consumer handler table. Items observe their host element; they never own
/// it. Created on mount, destroyed on unmount, never persisted.
pub struct DragItem {
    id: ItemId,
    pub data: DragData,
    pub effect: DragEffect,
    pub is_dragging: bool,
    /// Whether the item is currently over a zone that accepted the drag.
    pub is_over_zone: bool,
    handlers: HandlerTable,
}

impl DragItem {
    pub fn new(id: ItemId, data: DragData) -> Self {
        Self {
            id,
            data,
            effect: DragEffect::None,
            is_dragging: false,
            is_over_zone: false,
            handlers: HandlerTable::default(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// The native payload advertising this item across the process
    /// boundary.
    pub fn transfer_payload(&self) -> TransferPayload {
        let mut payload = TransferPayload::for_item(self.id);
        payload.drop_effect = self.effect;
        payload
    }

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

    pub(crate) fn emit(
        &mut self,
        kind: DragEventKind,
        drag: &DragOperation,
        pointer: PointerSample,
    ) {
        let mut event = DragEvent::snapshot(kind, drag, pointer);
        self.handlers.dispatch(&mut event);
    }
}
