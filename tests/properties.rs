//! Property tests for hex encoding and color matching

use pod_colors::color::{hex_of, rgb_of, Pixel};
use pod_colors::matching::{distance, is_match};
use proptest::prelude::*;

fn any_pixel() -> impl Strategy<Value = Pixel> {
    any::<[u8; 3]>().prop_map(|[r, g, b]| Pixel::new(r, g, b))
}

proptest! {
    #[test]
    fn prop_hex_roundtrip(pixel in any_pixel()) {
        let hex = hex_of(pixel);
        prop_assert_eq!(hex.len(), 6);
        prop_assert_eq!(hex.to_lowercase(), hex.clone());
        prop_assert_eq!(rgb_of(&hex).unwrap(), pixel);
        prop_assert_eq!(rgb_of(&format!("#{}", hex.to_uppercase())).unwrap(), pixel);
    }

    #[test]
    fn prop_match_is_symmetric(a in any_pixel(), b in any_pixel(), tolerance in 0.0f32..450.0) {
        prop_assert_eq!(
            is_match(Some(a), Some(b), tolerance),
            is_match(Some(b), Some(a), tolerance)
        );
        prop_assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn prop_match_is_reflexive(a in any_pixel(), tolerance in 0.0f32..450.0) {
        prop_assert!(is_match(Some(a), Some(a), tolerance));
        prop_assert!(!is_match(Some(a), None, tolerance));
        prop_assert!(!is_match(None, Some(a), tolerance));
    }

    #[test]
    fn prop_match_is_monotone_in_tolerance(
        a in any_pixel(),
        b in any_pixel(),
        t1 in 0.0f32..450.0,
        extra in 0.0f32..450.0,
    ) {
        let t2 = t1 + extra;
        if is_match(Some(a), Some(b), t1) {
            prop_assert!(is_match(Some(a), Some(b), t2));
        }
    }
}
