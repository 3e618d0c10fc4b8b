//! Dragcula Tabs — tab-strip layout and drag reorder.
//!
//! Two pieces: a pure layout engine assigning every tab a width and visual
//! tier for the available container width, and the glue that turns an axis
//! drop-zone index into a reorder call on the external tabs service.
//!
//! The rendering component re-invokes [`calculate_tab_layout`] on every
//! container resize and tab-count change and applies the returned widths as
//! presentation state; this crate never touches the UI tree.

pub mod layout;
pub mod strip;

pub use layout::{calculate_tab_layout, LayoutCalculation, TabDimensions, TabLayoutConfig};
pub use strip::{dragged_tab, TabStripDnd, TabsModel, TransitionRunner, TAB_DRAG_KEY};
