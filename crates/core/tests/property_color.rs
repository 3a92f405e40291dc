// Property-based tests for color conversions and gradient stop editing.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use sitetools_core::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_rgb() -> impl Strategy<Value = Rgb> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb::new(r, g, b))
}

fn arb_stops() -> impl Strategy<Value = GradientStops> {
    prop::collection::vec(arb_rgb(), 2..8)
        .prop_map(|v| GradientStops::new(v.into_iter().map(Color::from).collect()).unwrap())
}

fn sorted(stops: &GradientStops) -> Vec<String> {
    let mut v: Vec<String> = stops.iter().map(Color::to_hex).collect();
    v.sort();
    v
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn hex_round_trips_exactly(rgb in arb_rgb()) {
        let hex = rgb_to_hex(rgb.r, rgb.g, rgb.b);
        prop_assert_eq!(hex_to_rgb(&hex), rgb);
        prop_assert_eq!(hex_to_rgb(&hex.to_uppercase()), rgb);
    }

    #[test]
    fn hsb_round_trip_within_one(rgb in arb_rgb()) {
        let back = hsb_to_rgb(rgb_to_hsb(rgb));
        prop_assert!((back.r as i16 - rgb.r as i16).abs() <= 1);
        prop_assert!((back.g as i16 - rgb.g as i16).abs() <= 1);
        prop_assert!((back.b as i16 - rgb.b as i16).abs() <= 1);
    }

    #[test]
    fn hsb_components_in_range(rgb in arb_rgb()) {
        let hsb = rgb_to_hsb(rgb);
        prop_assert!((0.0..360.0).contains(&hsb.h));
        prop_assert!((0.0..=100.0).contains(&hsb.s));
        prop_assert!((0.0..=100.0).contains(&hsb.b));
    }

    #[test]
    fn reorder_preserves_stops(mut stops in arb_stops(), from in 0usize..8, to in 0usize..8) {
        let before = sorted(&stops);
        let len = stops.len();
        let result = stops.reorder(from, to);
        prop_assert_eq!(result.is_ok(), from < len && to < len);
        prop_assert_eq!(sorted(&stops), before);
    }

    #[test]
    fn display_mapping_is_involution(stops in arb_stops()) {
        for i in 0..stops.len() {
            prop_assert_eq!(stops.display_index(stops.display_index(i)), i);
        }
    }

    #[test]
    fn append_then_remove_never_drops_below_floor(mut stops in arb_stops(), removals in 0usize..10) {
        let last = stops.as_slice()[stops.len() - 1];
        let len = stops.len();
        prop_assert_eq!(stops.append(), last);
        prop_assert_eq!(stops.len(), len + 1);
        for _ in 0..removals {
            let _ = stops.remove(0);
        }
        prop_assert!(stops.len() >= MIN_STOPS);
    }
}
