//! Layout engine properties at the crate boundary.

use dragcula_core::TabId;
use dragcula_tabs::{calculate_tab_layout, TabLayoutConfig};

fn tabs(n: usize) -> Vec<TabId> {
    (0..n).map(|i| TabId::from_raw(i as u64 + 1)).collect()
}

#[test]
fn width_conservation_holds_everywhere() {
    let cfg = TabLayoutConfig::default();
    for count in 1..=25 {
        let ids = tabs(count);
        let mut width = 0.0_f32;
        while width <= 2600.0 {
            for active in [None, Some(ids[count / 2])] {
                let layout = calculate_tab_layout(&ids, width, active, &cfg);
                let tabs_width: f32 = layout.tab_dimensions.iter().map(|d| d.width).sum();
                let gaps = (count as f32 - 1.0) * cfg.tab_gap;
                let expected = cfg.container_padding + tabs_width + gaps + cfg.add_button_width;
                assert!(
                    (layout.total_width - expected).abs() < 1e-3,
                    "conservation broken at count={count} width={width}"
                );
                assert!(layout.tab_dimensions.iter().all(|d| d.width > 0.0));
            }
            width += 130.0;
        }
    }
}

#[test]
fn active_tab_never_loses_close_button() {
    let cfg = TabLayoutConfig::default();
    for count in 1..=25 {
        let ids = tabs(count);
        let active = ids[count - 1];
        for width in [0.0, 37.0, 180.0, 400.0, 799.0, 1601.0] {
            let layout = calculate_tab_layout(&ids, width, Some(active), &cfg);
            let dim = layout.tab_dimensions[count - 1];
            assert!(
                dim.width >= 112.0,
                "active tab width {} at count={count} width={width}",
                dim.width
            );
            assert!(dim.show_close_button);
        }
    }
}

#[test]
fn wide_strip_with_five_tabs_matches_reference_numbers() {
    let cfg = TabLayoutConfig::default();
    let ids = tabs(5);
    let layout = calculate_tab_layout(&ids, 1200.0, None, &cfg);

    for dim in &layout.tab_dimensions {
        assert!((dim.width - 208.8).abs() < 1e-3);
        assert!(!dim.collapsed && !dim.squished);
    }
    assert_eq!(layout.add_button_width, 52.0);
    let expected_total = 80.0 + 208.8 * 5.0 + 4.0 * 6.0 + 52.0;
    assert!((layout.total_width - expected_total).abs() < 1e-3);
}

#[test]
fn narrow_strip_with_twenty_tabs_tiers_and_sums_exactly() {
    let cfg = TabLayoutConfig::default();
    let ids = tabs(20);
    let active = ids[9];
    let layout = calculate_tab_layout(&ids, 800.0, Some(active), &cfg);

    let active_dim = layout.tab_dimensions[9];
    assert!(active_dim.width >= 112.0 && active_dim.width <= 200.0);
    for (i, dim) in layout.tab_dimensions.iter().enumerate() {
        if i != 9 {
            assert!(dim.collapsed || dim.squished);
        }
    }

    let tabs_width: f32 = layout.tab_dimensions.iter().map(|d| d.width).sum();
    let gaps = 19.0 * cfg.tab_gap;
    assert!(
        (layout.total_width - (cfg.container_padding + tabs_width + gaps + cfg.add_button_width))
            .abs()
            < 1e-3
    );
}

#[test]
fn custom_config_is_respected() {
    let cfg = TabLayoutConfig {
        max_tab_width: 150.0,
        ..TabLayoutConfig::default()
    };
    let ids = tabs(3);
    let layout = calculate_tab_layout(&ids, 1600.0, None, &cfg);
    for dim in &layout.tab_dimensions {
        assert_eq!(dim.width, 150.0);
    }
}
