use proptest::prelude::*;

use feeder_types::Dec;

proptest! {
    /// The rendered price always carries exactly 18 fractional digits.
    #[test]
    fn dec_text_has_fixed_precision(raw in any::<i64>()) {
        let text = Dec::from_raw(raw as i128).to_string();
        let (_, frac) = text.split_once('.').unwrap();
        prop_assert_eq!(frac.len(), 18);
    }

    /// Parsing the rendered form yields the same value.
    #[test]
    fn dec_text_parses_back(raw in any::<i64>(), scale in 0u32..6) {
        let dec = Dec::from_raw(raw as i128 * 10i128.pow(scale));
        let parsed: Dec = dec.to_string().parse().unwrap();
        prop_assert_eq!(parsed, dec);
    }

    /// Ordering follows the unscaled value.
    #[test]
    fn dec_order_matches_value(a in 0i64..1_000_000, b in 0i64..1_000_000) {
        let da = Dec::with_prec(a, 3).unwrap();
        let db = Dec::with_prec(b, 3).unwrap();
        prop_assert_eq!(da < db, a < b);
    }
}
