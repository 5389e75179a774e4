//! Amount scaling between whole tokens and smallest units.
//!
//! Balances, fees and withheld amounts are stored as `u64` smallest units.
//! A mint's `decimals` fixes the scale: one whole token is `10^decimals` units.

/// The scale factor `10^decimals`, or `None` if it does not fit in a `u64`.
pub fn unit(decimals: u8) -> Option<u64> {
    10u64.checked_pow(u32::from(decimals))
}

/// Convert a whole-token amount into smallest units.
///
/// Returns `None` on overflow (e.g. 10^12 tokens at 9 decimals).
pub fn to_raw(whole_tokens: u64, decimals: u8) -> Option<u64> {
    unit(decimals)?.checked_mul(whole_tokens)
}

/// Render a raw amount as a decimal string with exactly `decimals` fractional digits,
/// e.g. `format_ui(1_500_000_000, 9) == "1.500000000"`.
pub fn format_ui(raw: u64, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }
    let digits = format!("{:0>width$}", raw, width = usize::from(decimals) + 1);
    let split = digits.len() - usize::from(decimals);
    format!("{}.{}", &digits[..split], &digits[split..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_decimals() {
        assert_eq!(to_raw(1_000, 9), Some(1_000_000_000_000));
        assert_eq!(unit(9), Some(1_000_000_000));
    }

    #[test]
    fn overflow_is_none() {
        assert_eq!(to_raw(u64::MAX, 9), None);
        assert_eq!(unit(20), None);
    }

    #[test]
    fn format_pads_small_values() {
        assert_eq!(format_ui(5, 3), "0.005");
        assert_eq!(format_ui(9_000_000_000, 9), "9.000000000");
        assert_eq!(format_ui(42, 0), "42");
    }
}
