//! Card BIN prefix to payment network lookup.
//!
//! Pure table lookup over the first digits of a card number.  Rules either
//! match an exact prefix or a numeric range over a fixed number of leading
//! digits.

/// One BIN matching rule.
#[derive(Debug, Clone, Copy)]
enum BinMatch {
    /// The leading digits equal this literal prefix.
    Equal(&'static str),
    /// The first `digits` digits parse into this inclusive range.
    Range {
        digits: usize,
        low: u32,
        high: u32,
    },
}

/// Provider rule table, checked in order.
static BIN_TO_PROVIDER: &[(&str, &[BinMatch])] = &[
    ("visa", &[BinMatch::Equal("4")]),
    ("amex", &[BinMatch::Equal("34"), BinMatch::Equal("37")]),
    (
        "mastercard",
        &[
            BinMatch::Range {
                digits: 2,
                low: 51,
                high: 55,
            },
            BinMatch::Range {
                digits: 4,
                low: 2221,
                high: 2720,
            },
        ],
    ),
];

/// Map the first six digits of a card number to its payment network.
///
/// Unrecognized (or non-numeric) prefixes map to `"other"`.
pub fn bin_to_provider(bin_first_six: &str) -> &'static str {
    for (provider, rules) in BIN_TO_PROVIDER {
        if rules.iter().any(|rule| rule.matches(bin_first_six)) {
            return provider;
        }
    }
    "other"
}

impl BinMatch {
    fn matches(&self, bin: &str) -> bool {
        match *self {
            BinMatch::Equal(prefix) => bin.starts_with(prefix),
            BinMatch::Range { digits, low, high } => bin
                .get(..digits)
                .and_then(|head| head.parse::<u32>().ok())
                .is_some_and(|value| (low..=high).contains(&value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visa_prefix() {
        assert_eq!(bin_to_provider("424242"), "visa");
    }

    #[test]
    fn amex_prefixes() {
        assert_eq!(bin_to_provider("341111"), "amex");
        assert_eq!(bin_to_provider("371449"), "amex");
    }

    #[test]
    fn mastercard_ranges() {
        assert_eq!(bin_to_provider("510000"), "mastercard");
        assert_eq!(bin_to_provider("559999"), "mastercard");
        assert_eq!(bin_to_provider("222100"), "mastercard");
        assert_eq!(bin_to_provider("272099"), "mastercard");
    }

    #[test]
    fn range_boundaries_are_inclusive() {
        assert_eq!(bin_to_provider("500000"), "other");
        assert_eq!(bin_to_provider("560000"), "other");
        assert_eq!(bin_to_provider("222099"), "other");
        assert_eq!(bin_to_provider("272100"), "other");
    }

    #[test]
    fn unknown_and_non_numeric_prefixes_fall_through() {
        assert_eq!(bin_to_provider("601100"), "other");
        assert_eq!(bin_to_provider("abcdef"), "other");
    }
}
