//! Identifier and scan-code generation
//!
//! Product ids are `P` followed by the last six digits of a time-derived
//! counter; movement ids are `M` followed by the full counter. The counter is
//! strictly increasing even when the clock stands still or moves backwards.
//! Product ids are additionally checked against the catalog, since six digits
//! wrap around and reloaded data may already hold the candidate.

/// Fixed prefix of generated product ids
pub const PRODUCT_ID_PREFIX: char = 'P';

/// Fixed prefix of generated movement ids
pub const MOVEMENT_ID_PREFIX: char = 'M';

/// Fixed prefix of generated scan codes
pub const QR_CODE_PREFIX: &str = "PROD";

const PRODUCT_ID_MODULUS: i64 = 1_000_000;

/// Monotonic time-derived counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdSequence {
    last: i64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue after a previously issued value
    pub fn resume_from(last: i64) -> Self {
        IdSequence { last }
    }

    /// Next value: the current time in milliseconds, or one past the last
    /// value if the clock has not moved forward
    pub fn next(&mut self, now_millis: i64) -> i64 {
        let value = now_millis.max(self.last.saturating_add(1));
        self.last = value;
        value
    }
}

/// Product id for a counter value (`P` + last six digits)
pub fn product_id(counter: i64) -> String {
    format!("{}{:06}", PRODUCT_ID_PREFIX, counter.rem_euclid(PRODUCT_ID_MODULUS))
}

/// Movement id for a counter value
pub fn movement_id(counter: i64) -> String {
    format!("{}{}", MOVEMENT_ID_PREFIX, counter)
}

/// Counter value encoded in a movement id, if it has the generated shape
pub fn movement_counter(id: &str) -> Option<i64> {
    id.strip_prefix(MOVEMENT_ID_PREFIX)?.parse().ok()
}

/// Trimmed name with whitespace runs replaced by `_`, upper-cased
pub fn name_slug(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

/// Scan code `PROD_<id>_<NAME_SLUG>`
pub fn qr_code(id: &str, name: &str) -> String {
    format!("{}_{}_{}", QR_CODE_PREFIX, id, name_slug(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_sequence_follows_clock() {
        let mut seq = IdSequence::new();
        assert_eq!(seq.next(1_000), 1_000);
        assert_eq!(seq.next(2_500), 2_500);
    }

    #[test]
    fn test_sequence_never_repeats_when_clock_stalls_or_rewinds() {
        let mut seq = IdSequence::resume_from(5_000);
        assert_eq!(seq.next(5_000), 5_001);
        assert_eq!(seq.next(4_000), 5_002);
    }

    #[rstest]
    #[case(1_741_600_123_456, "P123456")]
    #[case(42, "P000042")]
    #[case(3_000_000, "P000000")]
    fn test_product_id_keeps_last_six_digits(#[case] counter: i64, #[case] expected: &str) {
        assert_eq!(product_id(counter), expected);
    }

    #[rstest]
    #[case("Mouse", "MOUSE")]
    #[case("  Mouse   Gamer  ", "MOUSE_GAMER")]
    #[case("Cabo\tHDMI 2m", "CABO_HDMI_2M")]
    fn test_name_slug(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(name_slug(name), expected);
    }

    #[test]
    fn test_qr_code_format() {
        assert_eq!(qr_code("P000042", "Teclado sem fio"), "PROD_P000042_TECLADO_SEM_FIO");
    }

    #[rstest]
    #[case("M1741600123456", Some(1_741_600_123_456))]
    #[case("M", None)]
    #[case("legacy-7", None)]
    fn test_movement_counter(#[case] id: &str, #[case] expected: Option<i64>) {
        assert_eq!(movement_counter(id), expected);
    }
}
