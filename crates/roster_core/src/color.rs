/// Maps a coordinator name to one of eight visual categories.
///
/// Cosmetic grouping only: identical names always land in the same
/// category, but distinct names may collide. The hash folds UTF-16 code
/// units as `acc = code + ((acc << 5) - acc)`, where only the shift
/// operand is wrapped to 32 bits and the rest of the arithmetic runs in
/// `f64`, then reduces `|acc % 8|` into `1..=8`. Kept bit-for-bit stable
/// because rendered row colors key off it.
pub fn coordinator_category(name: &str) -> Option<u8> {
    if name.is_empty() {
        return None;
    }
    let mut acc: f64 = 0.0;
    for code in name.encode_utf16() {
        let shifted = to_int32(acc).wrapping_shl(5);
        acc = f64::from(code) + (f64::from(shifted) - acc);
    }
    Some((acc % 8.0).abs() as u8 + 1)
}

/// Truncates a finite integer-valued float into the signed 32-bit range
/// with modular wrapping.
fn to_int32(value: f64) -> i32 {
    let wrapped = value.trunc().rem_euclid(4_294_967_296.0);
    if wrapped >= 2_147_483_648.0 {
        (wrapped - 4_294_967_296.0) as i32
    } else {
        wrapped as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_hash_to_fixed_categories() {
        // 'A','l','e','x' -> 2043454 -> |2043454 % 8| = 6 -> category 7.
        assert_eq!(coordinator_category("Alex"), Some(7));
        assert_eq!(coordinator_category("Priya"), Some(8));
        assert_eq!(coordinator_category("万里"), Some(6));
    }

    #[test]
    fn long_names_overflow_the_shift_operand_only() {
        // The accumulator for "Christopher" reaches -2563438889, outside
        // i32; only the shifted operand wraps, the running sum does not.
        assert_eq!(coordinator_category("Christopher"), Some(2));
        assert_eq!(coordinator_category("Maya Raghavan"), Some(7));
        assert_eq!(
            coordinator_category("a very long coordinator name indeed"),
            Some(2)
        );
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let first = coordinator_category("Maya Raghavan");
        for _ in 0..16 {
            assert_eq!(coordinator_category("Maya Raghavan"), first);
        }
    }

    #[test]
    fn categories_stay_in_display_range() {
        for name in ["a", "zz", "Priya", "万里", "a very long coordinator name indeed"] {
            let category = coordinator_category(name).expect("non-empty name");
            assert!((1..=8).contains(&category));
        }
    }

    #[test]
    fn unassigned_has_no_category() {
        assert_eq!(coordinator_category(""), None);
    }

    #[test]
    fn negative_accumulators_wrap_like_a_signed_word() {
        assert_eq!(to_int32(0.0), 0);
        assert_eq!(to_int32(-1.0), -1);
        assert_eq!(to_int32(2_147_483_648.0), -2_147_483_648);
        assert_eq!(to_int32(-2_563_438_889.0), 1_731_528_407);
        assert_eq!(to_int32(4_294_967_296.0), 0);
    }
}
