//! Property-based invariant tests for length parsing and resolution.
//!
//! 1. Display/parse round-trips for both length variants.
//! 2. Percentage resolution scales linearly with the parent extent.
//! 3. The centering adjustment is the identity at the standard aspect and
//!    only ever touches center-aligned percentages.
//! 4. EMU conversions invert each other.

use deckgrid_core::units::{
    EMU_PER_INCH, HAlign, Length, STANDARD_ASPECT, emu_to_inches, inches_to_emu,
};
use proptest::prelude::*;

fn length_strategy() -> impl Strategy<Value = Length> {
    prop_oneof![
        (-1000.0f64..1000.0).prop_map(Length::Abs),
        (-200.0f64..200.0).prop_map(Length::Percent),
    ]
}

fn align_strategy() -> impl Strategy<Value = HAlign> {
    prop_oneof![Just(HAlign::Left), Just(HAlign::Center), Just(HAlign::Right)]
}

proptest! {
    #[test]
    fn display_parse_round_trip(length in length_strategy()) {
        let rendered = length.to_string();
        let parsed: Length = rendered.parse().expect("rendered lengths parse");
        prop_assert_eq!(parsed, length);
    }

    #[test]
    fn percent_resolution_is_linear(percent in -200.0f64..200.0, extent in 0.0f64..100.0) {
        let one = Length::Percent(percent).resolve(extent);
        let two = Length::Percent(percent).resolve(extent * 2.0);
        prop_assert!((two - one * 2.0).abs() < 1e-9);
        // Absolute lengths ignore the extent entirely.
        prop_assert_eq!(Length::Abs(percent).resolve(extent), percent);
    }

    #[test]
    fn standard_aspect_never_adjusts(
        length in length_strategy(),
        align in align_strategy(),
        extent in 0.1f64..100.0,
    ) {
        let plain = length.resolve(extent);
        let aligned = length.resolve_aligned(extent, STANDARD_ASPECT, align);
        prop_assert_eq!(plain, aligned);
    }

    #[test]
    fn only_centered_percents_adjust(
        percent in 1.0f64..100.0,
        extent in 1.0f64..100.0,
        aspect in 0.5f64..1.6,
    ) {
        // All aspects in range differ from 16:9 by more than the tolerance.
        let plain = Length::Percent(percent).resolve(extent);
        let centered = Length::Percent(percent).resolve_aligned(extent, aspect, HAlign::Center);
        prop_assert!(plain != centered, "expected adjustment at aspect {aspect}");
        for align in [HAlign::Left, HAlign::Right] {
            prop_assert_eq!(Length::Percent(percent).resolve_aligned(extent, aspect, align), plain);
        }
        prop_assert_eq!(Length::Abs(percent).resolve_aligned(extent, aspect, HAlign::Center), percent);
    }

    #[test]
    fn emu_conversions_invert(inches in 0.0f64..1000.0) {
        let emu = inches_to_emu(inches);
        prop_assert!((emu_to_inches(emu) - inches).abs() < 1e-9);
        prop_assert!((emu / EMU_PER_INCH - inches).abs() < 1e-9);
    }
}
