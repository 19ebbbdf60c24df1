//! Peso amounts held as whole centavos.
//!
//! The backend sends fees and budget figures as JSON numbers, sometimes as
//! strings. Both decode through their decimal text so no binary float
//! rounding leaks into totals.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

/// Centavos per peso.
const CENTAVOS_PER_PESO: i64 = 100;

/// Longest run of significant digits an `i64` of centavos can hold.
const MAX_DIGITS: usize = 18;

/// An amount of Philippine pesos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pesos(i64);

impl Pesos {
    /// No money.
    pub const ZERO: Self = Self(0);

    /// Wrap a centavo count.
    #[must_use]
    pub const fn from_centavos(centavos: i64) -> Self {
        Self(centavos)
    }

    /// The amount in centavos.
    #[must_use]
    pub const fn centavos(self) -> i64 {
        self.0
    }

    /// `self - other`, clamped at the `i64` range.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Parse decimal text such as `1500`, `1500.5` or `1.5e3`, rounding half
    /// up at the centavo.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let (negative, unsigned) = trimmed
            .strip_prefix('-')
            .map_or((false, trimmed), |rest| (true, rest));
        let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().ok()?),
            None => (unsigned, 0),
        };
        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        let digits: Vec<u32> = whole
            .chars()
            .chain(fraction.chars())
            .map(|character| character.to_digit(10))
            .collect::<Option<_>>()?;

        // Digits left of the point once the value is scaled to centavos.
        let integral = i32::try_from(whole.len())
            .ok()?
            .checked_add(exponent)?
            .checked_add(2)?;
        let kept = usize::try_from(integral).unwrap_or(0);
        if kept > digits.len().saturating_add(MAX_DIGITS) {
            return digits.iter().all(|digit| *digit == 0).then_some(Self::ZERO);
        }

        let mut centavos: i64 = 0;
        for position in 0..kept {
            let digit = digits.get(position).copied().unwrap_or(0);
            centavos = centavos.checked_mul(10)?.checked_add(i64::from(digit))?;
        }
        if digits.get(kept).is_some_and(|digit| *digit >= 5) {
            centavos = centavos.checked_add(1)?;
        }
        Some(Self(if negative { -centavos } else { centavos }))
    }
}

impl fmt::Display for Pesos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let per_peso = CENTAVOS_PER_PESO.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            magnitude.div_euclid(per_peso),
            magnitude.rem_euclid(per_peso)
        )
    }
}

struct PesosVisitor;

impl Visitor<'_> for PesosVisitor {
    type Value = Pesos;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a peso amount as a number or decimal string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Pesos, E> {
        value
            .checked_mul(CENTAVOS_PER_PESO)
            .map(Pesos)
            .ok_or_else(|| E::custom(format!("{value} pesos is out of range")))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Pesos, E> {
        let signed = i64::try_from(value)
            .map_err(|_| E::custom(format!("{value} pesos is out of range")))?;
        self.visit_i64(signed)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Pesos, E> {
        self.visit_str(&value.to_string())
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Pesos, E> {
        Pesos::parse(value).ok_or_else(|| E::custom(format!("{value:?} is not a peso amount")))
    }
}

impl<'de> Deserialize<'de> for Pesos {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PesosVisitor)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("1500", 150_000)]
    #[case("1500.5", 150_050)]
    #[case(" 0.10 ", 10)]
    #[case(".75", 75)]
    #[case("12.345", 1_235)]
    #[case("12.344", 1_234)]
    #[case("1.5e3", 150_000)]
    #[case("25E-2", 25)]
    #[case("-40.25", -4_025)]
    #[case("0e999999", 0)]
    fn parses_decimal_text(#[case] text: &str, #[case] centavos: i64) {
        assert_eq!(Pesos::parse(text), Some(Pesos::from_centavos(centavos)));
    }

    #[rstest]
    #[case("")]
    #[case("-")]
    #[case("12,50")]
    #[case("1.2.3")]
    #[case("ten")]
    #[case("1e99")]
    fn rejects_malformed_text(#[case] text: &str) {
        assert_eq!(Pesos::parse(text), None);
    }

    #[test]
    fn decodes_json_numbers_and_strings() {
        let decoded: Vec<Pesos> =
            serde_json::from_value(json!([50, 0.1, 150_000.0, "75.50"])).expect("decode amounts");
        assert_eq!(
            decoded,
            vec![
                Pesos::from_centavos(5_000),
                Pesos::from_centavos(10),
                Pesos::from_centavos(15_000_000),
                Pesos::from_centavos(7_550),
            ]
        );
    }

    #[test]
    fn tenths_do_not_drift() {
        let amount: Pesos = serde_json::from_value(json!(0.3)).expect("decode");
        let spent: Pesos = serde_json::from_value(json!(0.1)).expect("decode");
        assert_eq!(amount.saturating_sub(spent), Pesos::from_centavos(20));
    }

    #[rstest]
    #[case(150_000, "1500.00")]
    #[case(5, "0.05")]
    #[case(-1_999, "-19.99")]
    fn displays_two_decimal_places(#[case] centavos: i64, #[case] shown: &str) {
        assert_eq!(Pesos::from_centavos(centavos).to_string(), shown);
    }
}
