//! Token amounts in the chain's smallest denomination.
use core::fmt;
use core::str::FromStr;

/// Unsigned amount of micro units (CosmWasm `Uint128`).
///
/// The contract encodes amounts as decimal strings; decoding also accepts plain
/// JSON integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount {0:?}")]
pub struct ParseAmountError(pub String);

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseAmountError(s.to_string()));
        }
        trimmed
            .parse::<u128>()
            .map(Self)
            .map_err(|_| ParseAmountError(s.to_string()))
    }
}

/// Render `amount` micro units as a display value with two fractional digits.
///
/// `decimals` is the exponent between the micro and display denominations
/// (9 for `nshr` -> `SHR`). The fractional part is rounded half up.
pub fn format_amount(amount: Amount, decimals: u32) -> String {
    let scale = 10u128.pow(decimals.min(30));
    let mut whole = amount.0 / scale;
    let rem = amount.0 % scale;

    let cents = if decimals >= 2 {
        let mut cents = (rem * 100 + scale / 2) / scale;
        if cents == 100 {
            whole += 1;
            cents = 0;
        }
        cents
    } else {
        rem * 100 / scale
    };

    format!("{whole}.{cents:02}")
}

#[cfg(feature = "serde")]
mod serde_impl {
    use core::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Amount;

    impl Serialize for Amount {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(&self.0)
        }
    }

    struct AmountVisitor;

    impl Visitor<'_> for AmountVisitor {
        type Value = Amount;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or a decimal string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
            Ok(Amount::from(v))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
            Ok(Amount::new(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
            u64::try_from(v)
                .map(Amount::from)
                .map_err(|_| E::custom(format!("negative amount {v}")))
        }
    }

    impl<'de> Deserialize<'de> for Amount {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(AmountVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_strings() {
        assert_eq!("15000000000".parse::<Amount>(), Ok(Amount::new(15_000_000_000)));
        assert_eq!(" 42 ".parse::<Amount>(), Ok(Amount::new(42)));
        assert!("-1".parse::<Amount>().is_err());
        assert!("1.5".parse::<Amount>().is_err());
        assert!("".parse::<Amount>().is_err());
    }

    #[test]
    fn formats_nano_units_with_two_decimals() {
        assert_eq!(format_amount(Amount::new(5_000_000_000), 9), "5.00");
        assert_eq!(format_amount(Amount::new(15_000_000_000), 9), "15.00");
        assert_eq!(format_amount(Amount::new(1_234_567_890), 9), "1.23");
        assert_eq!(format_amount(Amount::new(999_999_999), 9), "1.00");
        assert_eq!(format_amount(Amount::ZERO, 9), "0.00");
        assert_eq!(format_amount(Amount::new(7), 0), "7.00");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn decodes_string_and_number_forms() {
        let from_str: Amount = serde_json::from_str("\"5000000000\"").unwrap();
        let from_num: Amount = serde_json::from_str("5000000000").unwrap();
        assert_eq!(from_str, from_num);
        assert_eq!(serde_json::to_string(&from_str).unwrap(), "\"5000000000\"");
        assert!(serde_json::from_str::<Amount>("-3").is_err());
    }
}
