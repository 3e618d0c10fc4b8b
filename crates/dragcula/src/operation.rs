//! The drag operation: single source of truth for one gesture.

use std::rc::Rc;

use dragcula_core::{ItemId, OperationId, ZoneId};

use crate::data::{DragData, TransferPayload};
use crate::effect::DragEffect;
use crate::surface::DragSurface;

/// Lifecycle of a drag operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragStatus {
    #[default]
    Active,
    /// Drop accepted, end-of-gesture work (handlers, transitions) running.
    Finalizing,
    Completed,
    Aborted,
}

/// How a gesture ended. Drop and cancel are two variants of the same exit
/// path; the coordinator runs identical cleanup for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Completed,
    Aborted,
}

impl DragOutcome {
    pub fn status(&self) -> DragStatus {
        match self {
            DragOutcome::Completed => DragStatus::Completed,
            DragOutcome::Aborted => DragStatus::Aborted,
        }
    }
}

/// What a drag carries: an in-process item with typed data, or a native
/// transfer payload.
#[derive(Debug, Clone)]
pub enum DragPayload {
    Item {
        id: ItemId,
        data: DragData,
        effect: DragEffect,
    },
    Native(Rc<TransferPayload>),
}

/// One in-flight drag gesture.
///
/// At most one operation exists process-wide; only the coordinator creates
/// and destroys it. Zones may read `from`/`target`/payload and write
/// `index`; the target is only assignable through [`DragOperation::set_target`],
/// which mirrors the value into the surface's document hook.
#[derive(Debug)]
pub struct DragOperation {
    id: OperationId,
    pub from: Option<ZoneId>,
    to: Option<ZoneId>,
    payload: DragPayload,
    /// Insertion index computed by an axis zone, when one is the target.
    pub index: Option<usize>,
    pub status: DragStatus,
}

impl DragOperation {
    pub(crate) fn custom(from: Option<ZoneId>, id: ItemId, data: DragData, effect: DragEffect) -> Self {
        Self {
            id: OperationId::fresh(),
            from,
            to: None,
            payload: DragPayload::Item {
                id,
                data,
                effect,
            },
            index: None,
            status: DragStatus::Active,
        }
    }

    pub(crate) fn native(transfer: TransferPayload) -> Self {
        Self {
            id: OperationId::fresh(),
            from: None,
            to: None,
            payload: DragPayload::Native(Rc::new(transfer)),
            index: None,
            status: DragStatus::Active,
        }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn target(&self) -> Option<ZoneId> {
        self.to
    }

    /// Assign the current target zone, mirroring it into the document hook.
    /// Direct field mutation is not possible by design.
    pub fn set_target(&mut self, target: Option<ZoneId>, surface: &mut dyn DragSurface) {
        self.to = target;
        surface.set_drag_target(target);
    }

    pub fn payload(&self) -> &DragPayload {
        &self.payload
    }

    pub fn item(&self) -> Option<ItemId> {
        match &self.payload {
            DragPayload::Item { id, .. } => Some(*id),
            DragPayload::Native(_) => None,
        }
    }

    pub fn data(&self) -> Option<&DragData> {
        match &self.payload {
            DragPayload::Item { data, .. } => Some(data),
            DragPayload::Native(_) => None,
        }
    }

    pub fn transfer(&self) -> Option<&Rc<TransferPayload>> {
        match &self.payload {
            DragPayload::Item { .. } => None,
            DragPayload::Native(transfer) => Some(transfer),
        }
    }

    /// Whether the payload originates outside the process's own drag
    /// vocabulary (OS file drag, cross-origin drag).
    pub fn is_native(&self) -> bool {
        matches!(self.payload, DragPayload::Native(_))
    }

    pub fn effect(&self) -> DragEffect {
        match &self.payload {
            DragPayload::Item { effect, .. } => *effect,
            DragPayload::Native(transfer) => transfer.drop_effect,
        }
    }

    /// Replace the native transfer payload; used when the terminal drop
    /// event carries richer data than the initial enter did.
    pub(crate) fn replace_transfer(&mut self, transfer: TransferPayload) {
        if self.is_native() {
            self.payload = DragPayload::Native(Rc::new(transfer));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::NullSurface;

    #[test]
    fn native_detection() {
        let op = DragOperation::native(TransferPayload::new());
        assert!(op.is_native());
        assert!(op.item().is_none());
        assert!(op.transfer().is_some());

        let op = DragOperation::custom(None, ItemId::fresh(), DragData::new(), DragEffect::Move);
        assert!(!op.is_native());
        assert!(op.item().is_some());
        assert_eq!(op.effect(), DragEffect::Move);
    }

    #[test]
    fn set_target_updates_field() {
        let mut surface = NullSurface;
        let mut op = DragOperation::native(TransferPayload::new());
        let zone = ZoneId::new("strip");

        op.set_target(Some(zone), &mut surface);
        assert_eq!(op.target(), Some(zone));

        op.set_target(None, &mut surface);
        assert_eq!(op.target(), None);
    }
}
