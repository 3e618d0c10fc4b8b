//! Drag-reorder glue between an axis drop zone and the tabs service.
//!
//! The strip never persists order itself: it resolves the dragged tab and
//! the target index from the drop event and delegates to the external
//! [`TabsModel`].

use dragcula::DragEvent;
use dragcula_core::TabId;

/// Payload key marking a drag that carries a tab.
pub const TAB_DRAG_KEY: &str = "surf/tab";

/// The external tabs service contract the strip delegates to.
pub trait TabsModel {
    fn tab_ids(&self) -> Vec<TabId>;

    /// Move `tab` so it ends up at `target_index` in the strip's order.
    fn reorder_tab(&mut self, tab: TabId, target_index: usize);
}

/// Runs a visual transition around a reorder. Hosts with view-transition
/// support wrap the update; everyone else applies it directly.
pub type TransitionRunner = Box<dyn FnMut(&mut dyn FnMut())>;

/// Resolve the tab carried by a drag event, if any.
pub fn dragged_tab(event: &DragEvent) -> Option<TabId> {
    let data = event.data()?;
    data.get::<TabId>(TAB_DRAG_KEY).map(|tab| *tab)
}

/// Reorder handling for one tab strip, wired into the strip zone's
/// `DragEnter`/`Drop` handlers by the owning component.
#[derive(Default)]
pub struct TabStripDnd {
    transition: Option<TransitionRunner>,
}

impl TabStripDnd {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transitions(runner: TransitionRunner) -> Self {
        Self {
            transition: Some(runner),
        }
    }

    /// Whether the strip should accept this drag: it must carry a tab the
    /// strip knows, and imply an actual move.
    pub fn accept_tab_drag(&self, event: &DragEvent, tabs: &impl TabsModel) -> bool {
        let Some(tab) = dragged_tab(event) else {
            return false;
        };
        let ids = tabs.tab_ids();
        let Some(current_index) = ids.iter().position(|id| *id == tab) else {
            return false;
        };
        let target_index = event.index.unwrap_or(ids.len());
        target_index != current_index
    }

    /// Finalize a tab drop: read the final index off the operation (the
    /// zone's internal state is already cleared by now) and delegate the
    /// reorder. Returns whether a reorder happened.
    pub fn handle_tab_drop(&mut self, event: &DragEvent, tabs: &mut impl TabsModel) -> bool {
        let Some(tab) = dragged_tab(event) else {
            return false;
        };
        let ids = tabs.tab_ids();
        let Some(current_index) = ids.iter().position(|id| *id == tab) else {
            tracing::warn!(tab = %tab, "dropped tab is not in the strip");
            return false;
        };

        let target_index = event.index.unwrap_or(ids.len());
        if target_index == current_index {
            return false;
        }

        tracing::debug!(tab = %tab, from = current_index, to = target_index, "reordering tab");
        match &mut self.transition {
            Some(run) => run(&mut || tabs.reorder_tab(tab, target_index)),
            None => tabs.reorder_tab(tab, target_index),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragcula::{
        AxisDragZone, DragData, DragEventKind, DragItem, Dragcula, DropZone, HitTester,
        NullSurface, PointerSample, TransferPayload, ZoneGeometry,
    };
    use dragcula_core::geometry::{Axis, Rect};
    use dragcula_core::math::Vec2;
    use dragcula_core::{ItemId, ZoneId};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tabs {
        ids: Vec<TabId>,
        reorders: Vec<(TabId, usize)>,
    }

    impl Tabs {
        fn new(count: usize) -> Self {
            Self {
                ids: (0..count).map(|i| TabId::from_raw(i as u64 + 1)).collect(),
                reorders: Vec::new(),
            }
        }
    }

    impl TabsModel for Tabs {
        fn tab_ids(&self) -> Vec<TabId> {
            self.ids.clone()
        }

        fn reorder_tab(&mut self, tab: TabId, target_index: usize) {
            let Some(current) = self.ids.iter().position(|id| *id == tab) else {
                return;
            };
            let removed = self.ids.remove(current);
            let target = target_index.min(self.ids.len());
            self.ids.insert(target, removed);
            self.reorders.push((tab, target_index));
        }
    }

    /// The strip container covers x 0..300; two remaining tabs (the dragged
    /// one is excluded) centered at x 40 and 140.
    struct StripGeometry;

    impl ZoneGeometry for StripGeometry {
        fn container_rect(&self) -> Rect {
            Rect::new(0.0, 0.0, 300.0, 40.0)
        }

        fn child_rects(&self) -> Vec<Rect> {
            vec![Rect::new(0.0, 0.0, 80.0, 40.0), Rect::new(100.0, 0.0, 80.0, 40.0)]
        }
    }

    struct StripHitTester {
        zone: ZoneId,
    }

    impl HitTester for StripHitTester {
        fn zone_chain_at(&self, point: Vec2) -> Vec<ZoneId> {
            if Rect::new(0.0, 0.0, 300.0, 40.0).contains(point) {
                vec![self.zone]
            } else {
                Vec::new()
            }
        }

        fn zone_chain_of_item(&self, _item: ItemId) -> Vec<ZoneId> {
            vec![self.zone]
        }
    }

    /// Drag the first tab through a real coordinator and drop it at
    /// `drop_x`, returning the reorders the model saw.
    fn drag_first_tab_to(drop_x: f32) -> Tabs {
        let zone_id = ZoneId::new("tab-strip");
        let mut dragcula = Dragcula::new(
            Box::new(NullSurface),
            Box::new(StripHitTester {
                zone: zone_id,
            }),
        );

        let tabs = Rc::new(RefCell::new(Tabs::new(3)));
        let dragged = tabs.borrow().ids[0];

        let mut zone = AxisDragZone::new(zone_id, Axis::Horizontal, Box::new(StripGeometry));
        let dnd = Rc::new(RefCell::new(TabStripDnd::new()));
        let handler_tabs = Rc::clone(&tabs);
        let handler_dnd = Rc::clone(&dnd);
        zone.core_mut().on(DragEventKind::Drop, move |event| {
            handler_dnd
                .borrow_mut()
                .handle_tab_drop(event, &mut *handler_tabs.borrow_mut());
        });
        dragcula.register_zone(Box::new(zone)).unwrap();

        let data = DragData::new();
        data.set(TAB_DRAG_KEY, dragged);
        let item = DragItem::new(ItemId::new("tab-item"), data);
        let item_id = dragcula.register_item(item).unwrap();

        dragcula.press_item(item_id, PointerSample::at(10.0, 20.0));
        dragcula.pointer_moved(PointerSample::at(30.0, 20.0));
        dragcula.on_animation_frame();
        dragcula.pointer_moved(PointerSample::at(drop_x, 20.0));
        dragcula.on_animation_frame();
        dragcula.pointer_released(PointerSample::at(drop_x, 20.0));

        assert!(dragcula.active_drag().is_none());
        drop(dragcula);
        Rc::try_unwrap(tabs).ok().expect("handlers released").into_inner()
    }

    #[test]
    fn drop_past_second_center_reorders_to_index_two() {
        let tabs = drag_first_tab_to(150.0);
        assert_eq!(tabs.reorders, vec![(TabId::from_raw(1), 2)]);
        assert_eq!(
            tabs.ids,
            vec![TabId::from_raw(2), TabId::from_raw(3), TabId::from_raw(1)]
        );
    }

    #[test]
    fn drop_at_own_position_is_skipped() {
        let tabs = drag_first_tab_to(10.0);
        assert!(tabs.reorders.is_empty());
        assert_eq!(tabs.ids.len(), 3);
    }

    #[test]
    fn native_drag_is_rejected() {
        let zone_id = ZoneId::new("strip");
        let mut dragcula = Dragcula::new(
            Box::new(NullSurface),
            Box::new(StripHitTester {
                zone: zone_id,
            }),
        );
        let accepted = Rc::new(RefCell::new(None));
        let tabs = Rc::new(RefCell::new(Tabs::new(2)));

        let mut zone = AxisDragZone::new(zone_id, Axis::Horizontal, Box::new(StripGeometry));
        let slot = Rc::clone(&accepted);
        let handler_tabs = Rc::clone(&tabs);
        zone.core_mut().on(DragEventKind::Drop, move |event| {
            let dnd = TabStripDnd::new();
            *slot.borrow_mut() = Some(dnd.accept_tab_drag(event, &*handler_tabs.borrow()));
        });
        dragcula.register_zone(Box::new(zone)).unwrap();

        let mut transfer = TransferPayload::new();
        transfer.set_data("text/uri-list", "https://example.com");
        dragcula.native_drag_enter(zone_id, Some(transfer.clone()), PointerSample::at(50.0, 20.0));
        dragcula.native_drop(zone_id, Some(transfer), PointerSample::at(50.0, 20.0));

        assert_eq!(*accepted.borrow(), Some(false));
        assert!(tabs.borrow().reorders.is_empty());
    }

    #[test]
    fn missing_index_defaults_to_append() {
        // A drop on a plain (non-axis) zone carries no computed index; the
        // strip treats that as append-at-end.
        let zone_id = ZoneId::new("plain-strip");
        let mut dragcula = Dragcula::new(
            Box::new(NullSurface),
            Box::new(StripHitTester {
                zone: zone_id,
            }),
        );
        let tabs = Rc::new(RefCell::new(Tabs::new(3)));
        let dragged = tabs.borrow().ids[0];

        let mut zone = dragcula::BasicDragZone::new(zone_id);
        let handler_tabs = Rc::clone(&tabs);
        zone.core_mut().on(DragEventKind::Drop, move |event| {
            TabStripDnd::new().handle_tab_drop(event, &mut *handler_tabs.borrow_mut());
        });
        dragcula.register_zone(Box::new(zone)).unwrap();

        let data = DragData::new();
        data.set(TAB_DRAG_KEY, dragged);
        let item_id = dragcula
            .register_item(DragItem::new(ItemId::new("plain-item"), data))
            .unwrap();

        dragcula.press_item(item_id, PointerSample::at(10.0, 20.0));
        dragcula.pointer_moved(PointerSample::at(30.0, 20.0));
        dragcula.pointer_moved(PointerSample::at(150.0, 20.0));
        dragcula.pointer_released(PointerSample::at(150.0, 20.0));

        assert_eq!(tabs.borrow().reorders, vec![(dragged, 3)]);
    }

    #[test]
    fn transition_runner_wraps_reorder() {
        let ran = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&ran);

        // Drive a real drop so the runner wraps an actual reorder.
        let zone_id = ZoneId::new("tab-strip-vt");
        let mut dragcula = Dragcula::new(
            Box::new(NullSurface),
            Box::new(StripHitTester {
                zone: zone_id,
            }),
        );
        let tabs = Rc::new(RefCell::new(Tabs::new(3)));
        let dragged = tabs.borrow().ids[0];

        let dnd_cell = Rc::new(RefCell::new(TabStripDnd::with_transitions(Box::new(
            move |update| {
                *counter.borrow_mut() += 1;
                update();
            },
        ))));
        let mut zone = AxisDragZone::new(zone_id, Axis::Horizontal, Box::new(StripGeometry));
        let handler_tabs = Rc::clone(&tabs);
        let handler_dnd = Rc::clone(&dnd_cell);
        zone.core_mut().on(DragEventKind::Drop, move |event| {
            handler_dnd
                .borrow_mut()
                .handle_tab_drop(event, &mut *handler_tabs.borrow_mut());
        });
        dragcula.register_zone(Box::new(zone)).unwrap();

        let data = DragData::new();
        data.set(TAB_DRAG_KEY, dragged);
        let item_id = dragcula
            .register_item(DragItem::new(ItemId::new("vt-item"), data))
            .unwrap();

        dragcula.press_item(item_id, PointerSample::at(10.0, 20.0));
        dragcula.pointer_moved(PointerSample::at(30.0, 20.0));
        dragcula.pointer_moved(PointerSample::at(150.0, 20.0));
        dragcula.on_animation_frame();
        dragcula.pointer_released(PointerSample::at(150.0, 20.0));

        assert_eq!(*ran.borrow(), 1);
        assert_eq!(tabs.borrow().reorders.len(), 1);
    }
}
