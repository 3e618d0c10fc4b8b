//! The normalized drag event vocabulary.
//!
//! Native browser events and in-process custom drags are both translated
//! into these events, so zone and item implementers only see one shape and
//! can distinguish the origin via [`DragEvent::is_native`].

use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use dragcula_core::{ItemId, OperationId, ZoneId};

use crate::data::{DragData, TransferPayload};
use crate::effect::{DragEffect, PointerSample};
use crate::operation::{DragOperation, DragStatus};

/// Event kinds, mirroring the native drag vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    DragStart,
    Drag,
    DragEnter,
    DragOver,
    DragLeave,
    Drop,
    DragEnd,
}

enum EventPayload {
    Item(DragData),
    Native(Rc<TransferPayload>),
}

/// A snapshot of the active operation delivered to consumer handlers.
///
/// `Drop` events are cancellable: a handler calling [`DragEvent::abort`]
/// makes the gesture finish as aborted instead of completed.
pub struct DragEvent {
    pub kind: DragEventKind,
    pub operation: OperationId,
    pub status: DragStatus,
    pub from: Option<ZoneId>,
    pub to: Option<ZoneId>,
    pub item: Option<ItemId>,
    pub index: Option<usize>,
    pub pointer: PointerSample,
    effect: DragEffect,
    payload: EventPayload,
    aborted: bool,
}

impl DragEvent {
    pub(crate) fn snapshot(kind: DragEventKind, op: &DragOperation, pointer: PointerSample) -> Self {
        let payload = match op.data() {
            Some(data) => EventPayload::Item(data.clone()),
            None => EventPayload::Native(
                op.transfer().map(Rc::clone).unwrap_or_default(),
            ),
        };
        Self {
            kind,
            operation: op.id(),
            status: op.status,
            from: op.from,
            to: op.target(),
            item: op.item(),
            index: op.index,
            pointer,
            effect: op.effect(),
            payload,
            aborted: false,
        }
    }

    pub fn is_native(&self) -> bool {
        self.item.is_none()
    }

    /// The typed item data, for custom drags.
    pub fn data(&self) -> Option<&DragData> {
        match &self.payload {
            EventPayload::Item(data) => Some(data),
            EventPayload::Native(_) => None,
        }
    }

    /// The native transfer payload, for native drags.
    pub fn transfer(&self) -> Option<&TransferPayload> {
        match &self.payload {
            EventPayload::Item(_) => None,
            EventPayload::Native(transfer) => Some(transfer),
        }
    }

    pub fn effect(&self) -> DragEffect {
        self.effect
    }

    /// Cancel a `Drop`: the gesture will finish as aborted. No effect on
    /// other event kinds.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

/// Token returned by handler registration, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerToken(u64);

impl HandlerToken {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

type Handler = Box<dyn FnMut(&mut DragEvent)>;

/// Per-kind handler registration used by zones and items.
#[derive(Default)]
pub(crate) struct HandlerTable {
    next_token: u64,
    entries: Vec<(DragEventKind, HandlerToken, Handler)>,
}

impl HandlerTable {
    pub fn on(&mut self, kind: DragEventKind, handler: Handler) -> HandlerToken {
        self.next_token += 1;
        let token = HandlerToken(self.next_token);
        self.entries.push((kind, token, handler));
        token
    }

    pub fn off(&mut self, token: HandlerToken) {
        self.entries.retain(|(_, t, _)| *t != token);
    }

    /// Dispatch `event` to every handler registered for its kind.
    ///
    /// Each call is guarded: a panicking handler is logged and skipped, so a
    /// broken consumer can never prevent the coordinator's cleanup from
    /// running. Stuck document flags are the failure mode this exists to
    /// rule out.
    pub fn dispatch(&mut self, event: &mut DragEvent) {
        for (kind, _, handler) in &mut self.entries {
            if *kind != event.kind {
                continue;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(&mut *event)));
            if outcome.is_err() {
                tracing::error!(kind = ?event.kind, operation = %event.operation,
                    "drag event handler panicked; continuing with remaining handlers");
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
