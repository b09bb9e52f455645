//! Property tests for the text encoding rules.

use num_bigint::BigUint;
use predsat_core::encode::{bit_string, decimal_string, literal_width};
use proptest::prelude::*;

proptest! {
    /// Every character contributes exactly sixteen digits, truncation
    /// included.
    #[test]
    fn length_law(s in ".{0,8}") {
        let bits = bit_string(&s);
        prop_assert_eq!(bits.len(), s.chars().count() * 16);
        prop_assert_eq!(literal_width(&s) as usize, bits.len());
        prop_assert!(bits.bytes().all(|b| b == b'0' || b == b'1'));
    }

    /// For equal-length BMP strings, the unsigned order of the encodings
    /// is the lexicographic order of the strings.
    #[test]
    fn ordering_law(a in "[a-z]{3}", b in "[a-z]{3}") {
        prop_assert_eq!(a < b, bit_string(&a) < bit_string(&b));
    }

    /// The decimal rendering is the binary rendering, read as a numeral.
    #[test]
    fn rendering_equivalence(s in "[a-z]{0,4}") {
        let bits = bit_string(&s);
        let from_binary = bits
            .bytes()
            .fold(BigUint::ZERO, |acc, b| (acc << 1u32) + BigUint::from(u8::from(b == b'1')));
        prop_assert_eq!(decimal_string(&s), from_binary.to_string());
    }
}
