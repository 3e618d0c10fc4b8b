//! The tab-strip layout engine.
//!
//! A pure, deterministic function assigning each tab a width and a visual
//! tier so the strip fits the available container width while the active
//! tab stays legible. No side effects, no panics; every degenerate input
//! collapses to a defined minimal layout.

use dragcula_core::TabId;

/// Visual tier flags and sizing for one tab.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TabDimensions {
    pub width: f32,
    /// Icon-only sizing, below the collapsed threshold.
    pub collapsed: bool,
    /// Pinned at the squished floor, the most compressed tier.
    pub squished: bool,
    pub show_close_button: bool,
}

/// The layout for a whole strip; one dimension record per input tab,
/// order-preserving.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutCalculation {
    pub tab_dimensions: Vec<TabDimensions>,
    pub add_button_width: f32,
    /// Exactly `container_padding + Σwidths + gaps + add_button_width`;
    /// callers compare against the container width to decide whether the
    /// strip needs to scroll.
    pub total_width: f32,
}

/// Sizing constants for the strip. All overridable; the defaults match the
/// product stylesheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabLayoutConfig {
    pub min_tab_width: f32,
    pub max_tab_width: f32,
    pub active_tab_min_width: f32,
    pub collapsed_threshold: f32,
    /// Even more compressed than collapsed.
    pub squished_threshold: f32,
    pub tab_gap: f32,
    pub container_padding: f32,
    pub add_button_width: f32,
    pub icon_width: f32,
    pub tab_horizontal_padding: f32,
}

impl Default for TabLayoutConfig {
    fn default() -> Self {
        Self {
            min_tab_width: 92.0,
            max_tab_width: 220.0,
            active_tab_min_width: 200.0,
            collapsed_threshold: 64.0,
            squished_threshold: 40.0,
            tab_gap: 6.0,
            container_padding: 80.0,
            add_button_width: 52.0,
            icon_width: 16.0,
            tab_horizontal_padding: 24.0,
        }
    }
}

impl TabLayoutConfig {
    /// Width of an icon-only collapsed tab.
    fn collapsed_width(&self) -> f32 {
        self.icon_width + self.tab_horizontal_padding
    }

    /// The hard legibility floor for the active tab: whatever space the
    /// strip is squeezed into, the active tab keeps its close button and at
    /// least this width.
    fn active_floor(&self) -> f32 {
        (self.collapsed_threshold + 20.0).max(112.0)
    }
}

/// Compute per-tab widths and tiers for the given container width.
///
/// Priority order: a uniform layout when every tab fits above the collapsed
/// threshold (and the active tab above its floor); otherwise tiered
/// allocation that reserves the active tab's floor first and distributes
/// the remainder across non-active tabs; and a minimal collapsed layout
/// when there is no meaningful space at all.
pub fn calculate_tab_layout(
    tabs: &[TabId],
    container_width: f32,
    active_tab: Option<TabId>,
    cfg: &TabLayoutConfig,
) -> LayoutCalculation {
    if tabs.is_empty() {
        return finish(Vec::new(), 0.0, cfg);
    }

    let gaps_width = (tabs.len() as f32 - 1.0).max(0.0) * cfg.tab_gap;
    let available_width =
        container_width - cfg.container_padding - cfg.add_button_width - gaps_width;
    let active_index = active_tab.and_then(|id| tabs.iter().position(|t| *t == id));

    // Not enough space for anything meaningful.
    if available_width <= 0.0 {
        return minimal_collapsed_layout(tabs.len(), active_index, gaps_width, cfg);
    }

    // Uniform layout first: all tabs the same width. Skipped when that
    // would drop the active tab below its floor.
    let uniform_width = (available_width / tabs.len() as f32).min(cfg.max_tab_width);
    let uniform_fits_active = active_index.is_none() || uniform_width >= cfg.active_floor();
    if uniform_width >= cfg.collapsed_threshold && uniform_fits_active {
        let dims = vec![
            TabDimensions {
                width: uniform_width,
                collapsed: false,
                squished: false,
                show_close_button: true,
            };
            tabs.len()
        ];
        return finish(dims, gaps_width, cfg);
    }

    // Tight space: reserve the active tab first, then distribute.
    tiered_layout(tabs.len(), active_index, available_width, gaps_width, cfg)
}

fn tiered_layout(
    count: usize,
    active_index: Option<usize>,
    available_width: f32,
    gaps_width: f32,
    cfg: &TabLayoutConfig,
) -> LayoutCalculation {
    let collapsed_width = cfg.collapsed_width();
    let squished_width = cfg.squished_threshold;
    let mut dims = vec![TabDimensions::default(); count];
    let mut remaining = available_width;

    let non_active_count = count - usize::from(active_index.is_some());

    if let Some(active) = active_index {
        // Never starve non-active tabs below their collapsed floor just to
        // grow the active tab, but never shrink the active tab below its
        // own floor either.
        let min_for_non_active = collapsed_width * non_active_count as f32;
        let available_for_active = (available_width - min_for_non_active).max(collapsed_width);
        let width = cfg
            .active_floor()
            .max(cfg.max_tab_width.min(cfg.active_tab_min_width.min(available_for_active)));
        dims[active] = TabDimensions {
            width,
            collapsed: false,
            squished: false,
            show_close_button: true,
        };
        remaining -= width;
    }

    if remaining > 0.0 && non_active_count > 0 {
        let per_tab = remaining / non_active_count as f32;
        let dimensions = if per_tab >= cfg.collapsed_threshold {
            TabDimensions {
                width: per_tab.min(cfg.max_tab_width),
                collapsed: false,
                squished: false,
                show_close_button: false,
            }
        } else if per_tab >= cfg.squished_threshold {
            TabDimensions {
                width: collapsed_width.max(per_tab),
                collapsed: true,
                squished: false,
                show_close_button: false,
            }
        } else {
            TabDimensions {
                width: squished_width.max(per_tab).max(1.0),
                collapsed: false,
                squished: true,
                show_close_button: false,
            }
        };
        for (i, dim) in dims.iter_mut().enumerate() {
            if Some(i) != active_index {
                *dim = dimensions;
            }
        }
    } else {
        // No width left at all: keep the whole strip in one tier instead
        // of a mix, picked by the mean width across all tabs.
        let mean = available_width / count as f32;
        let dimensions = if mean < cfg.squished_threshold {
            TabDimensions {
                width: squished_width,
                collapsed: false,
                squished: true,
                show_close_button: false,
            }
        } else {
            TabDimensions {
                width: collapsed_width,
                collapsed: true,
                squished: false,
                show_close_button: false,
            }
        };
        for (i, dim) in dims.iter_mut().enumerate() {
            if Some(i) != active_index {
                *dim = dimensions;
            }
        }
    }

    finish(dims, gaps_width, cfg)
}

/// The degenerate branch: every non-active tab at the minimum width,
/// collapsed; the active tab still keeps its floor and close button.
fn minimal_collapsed_layout(
    count: usize,
    active_index: Option<usize>,
    gaps_width: f32,
    cfg: &TabLayoutConfig,
) -> LayoutCalculation {
    let mut dims = vec![
        TabDimensions {
            width: cfg.min_tab_width,
            collapsed: true,
            squished: false,
            show_close_button: false,
        };
        count
    ];
    if let Some(active) = active_index {
        dims[active] = TabDimensions {
            width: cfg.active_floor(),
            collapsed: false,
            squished: false,
            show_close_button: true,
        };
    }
    finish(dims, gaps_width, cfg)
}

/// Assemble the calculation, computing the total from the parts so width
/// conservation holds on every branch.
fn finish(dims: Vec<TabDimensions>, gaps_width: f32, cfg: &TabLayoutConfig) -> LayoutCalculation {
    let tabs_width: f32 = dims.iter().map(|d| d.width).sum();
    LayoutCalculation {
        tab_dimensions: dims,
        add_button_width: cfg.add_button_width,
        total_width: cfg.container_padding + tabs_width + gaps_width + cfg.add_button_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tabs(n: usize) -> Vec<TabId> {
        (0..n).map(|i| TabId::from_raw(i as u64 + 1)).collect()
    }

    fn assert_conserved(layout: &LayoutCalculation, count: usize, cfg: &TabLayoutConfig) {
        let tabs_width: f32 = layout.tab_dimensions.iter().map(|d| d.width).sum();
        let gaps = (count as f32 - 1.0).max(0.0) * cfg.tab_gap;
        let expected = cfg.container_padding + tabs_width + gaps + cfg.add_button_width;
        assert!(
            (layout.total_width - expected).abs() < 1e-3,
            "total {} != parts {}",
            layout.total_width,
            expected
        );
        for dim in &layout.tab_dimensions {
            assert!(dim.width > 0.0);
        }
    }

    #[test]
    fn five_tabs_wide_container_is_uniform() {
        let cfg = TabLayoutConfig::default();
        let ids = tabs(5);
        let layout = calculate_tab_layout(&ids, 1200.0, None, &cfg);

        // (1200 − 80 − 52 − 4·6) / 5 = 208.8, below the 220 cap.
        for dim in &layout.tab_dimensions {
            assert!((dim.width - 208.8).abs() < 1e-3);
            assert!(!dim.collapsed && !dim.squished);
            assert!(dim.show_close_button);
        }
        assert_conserved(&layout, 5, &cfg);
    }

    #[test]
    fn uniform_width_caps_at_max() {
        let cfg = TabLayoutConfig::default();
        let ids = tabs(2);
        let layout = calculate_tab_layout(&ids, 2000.0, None, &cfg);
        for dim in &layout.tab_dimensions {
            assert_eq!(dim.width, cfg.max_tab_width);
        }
        assert_conserved(&layout, 2, &cfg);
    }

    #[test]
    fn twenty_tabs_narrow_container_goes_tiered() {
        let cfg = TabLayoutConfig::default();
        let ids = tabs(20);
        let active = ids[9];
        let layout = calculate_tab_layout(&ids, 800.0, Some(active), &cfg);

        // Uniform would be ≈27.7 < 64, so tiering kicks in.
        let active_dim = layout.tab_dimensions[9];
        assert!(active_dim.width >= 112.0 && active_dim.width <= 200.0);
        assert!(active_dim.show_close_button);
        for (i, dim) in layout.tab_dimensions.iter().enumerate() {
            if i != 9 {
                assert!(dim.collapsed || dim.squished);
                assert!(!dim.show_close_button);
            }
        }
        assert_conserved(&layout, 20, &cfg);
    }

    #[test]
    fn active_tab_floor_holds_down_to_zero_width() {
        let cfg = TabLayoutConfig::default();
        let ids = tabs(8);
        let active = ids[3];
        for width in [0.0, 50.0, 150.0, 300.0, 500.0, 900.0, 2000.0] {
            let layout = calculate_tab_layout(&ids, width, Some(active), &cfg);
            let dim = layout.tab_dimensions[3];
            assert!(dim.width >= 112.0, "active width {} at container {width}", dim.width);
            assert!(dim.show_close_button, "close button hidden at container {width}");
            assert_conserved(&layout, 8, &cfg);
        }
    }

    #[test]
    fn degenerate_width_collapses_non_active() {
        let cfg = TabLayoutConfig::default();
        let ids = tabs(4);
        let layout = calculate_tab_layout(&ids, 0.0, Some(ids[0]), &cfg);

        assert!(layout.tab_dimensions[0].show_close_button);
        for dim in &layout.tab_dimensions[1..] {
            assert_eq!(dim.width, cfg.min_tab_width);
            assert!(dim.collapsed);
        }
        assert_conserved(&layout, 4, &cfg);
    }

    #[test]
    fn extreme_starvation_keeps_one_tier() {
        let cfg = TabLayoutConfig::default();
        let ids = tabs(30);
        let active = ids[0];
        // Barely positive available width: the active tab swallows it all.
        let layout = calculate_tab_layout(&ids, 400.0, Some(active), &cfg);

        let non_active: Vec<_> = layout.tab_dimensions[1..].to_vec();
        let all_squished = non_active.iter().all(|d| d.squished);
        let all_collapsed = non_active.iter().all(|d| d.collapsed);
        assert!(all_squished || all_collapsed, "mixed tiers under starvation");
        assert_conserved(&layout, 30, &cfg);
    }

    #[test]
    fn no_tabs_is_chrome_only() {
        let cfg = TabLayoutConfig::default();
        let layout = calculate_tab_layout(&[], 500.0, None, &cfg);
        assert!(layout.tab_dimensions.is_empty());
        assert_eq!(
            layout.total_width,
            cfg.container_padding + cfg.add_button_width
        );
    }

    #[test]
    fn unknown_active_id_is_ignored() {
        let cfg = TabLayoutConfig::default();
        let ids = tabs(3);
        let stranger = TabId::from_raw(999);
        let with_unknown = calculate_tab_layout(&ids, 700.0, Some(stranger), &cfg);
        let without = calculate_tab_layout(&ids, 700.0, None, &cfg);
        assert_eq!(with_unknown, without);
    }

    #[test]
    fn conservation_over_input_grid() {
        let cfg = TabLayoutConfig::default();
        for count in [1, 2, 3, 5, 9, 16, 40] {
            let ids = tabs(count);
            for width in [0.0, 120.0, 333.3, 640.0, 1024.0, 1920.0, 5000.0] {
                for active in [None, Some(ids[0]), Some(ids[count - 1])] {
                    let layout = calculate_tab_layout(&ids, width, active, &cfg);
                    assert_eq!(layout.tab_dimensions.len(), count);
                    assert_conserved(&layout, count, &cfg);
                }
            }
        }
    }
}
