//! Catalog price tokens and money formatting.
//!
//! Catalog prices arrive as loosely-typed tokens: `"1245"`, `"1,245"`,
//! `"Free"`, `"-"`, a bare JSON number, or `null`. [`PriceToken`] preserves
//! the raw token for display while exposing a [`Decimal`] amount for
//! arithmetic. Anything unparseable is worth zero, matching the storefront's
//! "treat garbage as Free" behavior.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};

/// A raw price token as found in the catalog file.
///
/// Numeric JSON values are coerced to their string form on deserialize, so
/// `1245` and `"1245"` are equivalent tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PriceToken(String);

impl PriceToken {
    /// Wrap a raw token.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The monetary amount this token denotes.
    ///
    /// `"Free"`, `"-"`, and empty tokens are zero. Otherwise every character
    /// that is not a digit or a decimal point is stripped before parsing;
    /// a token that still fails to parse is zero.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        let trimmed = self.0.trim();
        if trimmed.is_empty() || trimmed == "-" || trimmed.eq_ignore_ascii_case("free") {
            return Decimal::ZERO;
        }

        let digits: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        Decimal::from_str(&digits).unwrap_or(Decimal::ZERO)
    }

    /// True when the token denotes a zero amount.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.amount().is_zero()
    }

    /// Display form: `"Free"` for zero amounts, `"฿1,245"` otherwise.
    #[must_use]
    pub fn display(&self) -> String {
        let amount = self.amount();
        if amount.is_zero() {
            "Free".to_owned()
        } else {
            format!("฿{}", format_amount(amount))
        }
    }
}

impl fmt::Display for PriceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PriceToken {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl<'de> Deserialize<'de> for PriceToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TokenVisitor;

        impl de::Visitor<'_> for TokenVisitor {
            type Value = PriceToken;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a price string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(PriceToken::new(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(PriceToken::new(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(PriceToken::new(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(PriceToken::new(v.to_string()))
            }
        }

        deserializer.deserialize_any(TokenVisitor)
    }
}

/// Format an amount with thousands separators, keeping only the significant
/// fraction (`1245` → `"1,245"`, `12.5` → `"12.5"`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let normalized = amount.normalize();
    let text = normalized.to_string();
    text.split_once('.').map_or_else(
        || group_digits(&text),
        |(int_part, frac_part)| format!("{}.{frac_part}", group_digits(int_part)),
    )
}

/// Format an amount with thousands separators and exactly two decimal
/// places (`1255.49` → `"1,255.49"`), as the checkout page shows money.
#[must_use]
pub fn format_amount_2dp(amount: Decimal) -> String {
    let text = format!("{:.2}", amount.round_dp(2));
    text.split_once('.').map_or_else(
        || group_digits(&text),
        |(int_part, frac_part)| format!("{}.{frac_part}", group_digits(int_part)),
    )
}

/// Insert a `,` every three digits, preserving a leading sign.
fn group_digits(digits: &str) -> String {
    let (sign, digits) = digits
        .strip_prefix('-')
        .map_or(("", digits), |rest| ("-", rest));

    let chars: Vec<char> = digits.chars().collect();
    let mut grouped = String::with_capacity(chars.len() + chars.len() / 3 + 1);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("{sign}{grouped}")
}
