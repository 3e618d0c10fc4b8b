//! Dragcula — drag-and-drop coordination for nested drop zones.
//!
//! The library tracks a single active drag operation across arbitrarily
//! nested drop zones, normalizing native (OS/browser) drag events and
//! in-process custom drags into one event vocabulary. Axis zones add
//! insertion-index computation along one axis with frame-coalesced
//! recomputes, so fast pointer movement never thrashes layout.
//!
//! The crate is host-agnostic: document hooks, indicator rendering, hit
//! testing, and zone geometry all enter through capability traits in
//! [`surface`]. A host bridge implements them once; the algorithms and all
//! tests run against synthetic implementations.
//!
//! ## Quick start
//!
//! ```
//! use dragcula::{
//!     AxisDragZone, Dragcula, DragEventKind, DropZone, NullHitTester, NullSurface,
//! };
//! use dragcula_core::geometry::{Axis, Rect};
//! use dragcula_core::ZoneId;
//!
//! struct Strip;
//! impl dragcula::ZoneGeometry for Strip {
//!     fn container_rect(&self) -> Rect {
//!         Rect::new(0.0, 0.0, 400.0, 40.0)
//!     }
//!     fn child_rects(&self) -> Vec<Rect> {
//!         (0..4).map(|i| Rect::new(i as f32 * 100.0, 0.0, 80.0, 40.0)).collect()
//!     }
//! }
//!
//! let mut dragcula = Dragcula::new(Box::new(NullSurface), Box::new(NullHitTester));
//! let mut zone = AxisDragZone::new(ZoneId::new("tabs"), Axis::Horizontal, Box::new(Strip));
//! zone.core_mut().on(DragEventKind::Drop, |event| {
//!     let _ = event.index; // insertion index computed by the zone
//! });
//! dragcula.register_zone(Box::new(zone)).unwrap();
//! ```

pub mod axis;
pub mod coordinator;
pub mod data;
pub mod effect;
pub mod error;
pub mod event;
pub mod item;
pub mod operation;
pub mod surface;
pub mod zone;

pub use axis::AxisDragZone;
pub use coordinator::{DragLifecycle, Dragcula};
pub use data::{DragData, TransferPayload};
pub use effect::{DragEffect, EffectSet, Modifiers, PointerSample};
pub use error::RegistryError;
pub use event::{DragEvent, DragEventKind, HandlerToken};
pub use item::{DragItem, DRAG_THRESHOLD};
pub use operation::{DragOperation, DragOutcome, DragPayload, DragStatus};
pub use surface::{DragSurface, HitTester, NullHitTester, NullSurface, ZoneGeometry};
pub use zone::{BasicDragZone, DropZone, FrameQueue, ZoneCore, ZoneCtx};
