//! Amount type for handling monetary values as they travel to and from the transaction service.
//!
//! This module provides the `Amount` type which wraps `Decimal`. The service may send amounts as
//! JSON numbers (`-4.5`) or as numeric strings (`"-4.50"`, which is how many SQL drivers render
//! `NUMERIC` columns). `Amount` accepts both and remembers which one it saw, so that a parsed
//! record serializes back to exactly what the service sent.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// How an amount was (or should be) represented in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum AmountRepr {
    /// A JSON number, e.g. `-12.5`. This is what the client sends.
    #[default]
    Number,
    /// A JSON string holding a decimal, e.g. `"-12.50"`.
    Text,
}

/// Represents a dollar amount.
///
/// The JSON representation is considered significant for the purposes of equality, so for
/// numeric comparisons you should access the `Decimal` value and use that.
///
/// `Display` always renders the amount for people, with a dollar sign and commas:
/// ```
/// # use expense_sync::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-1234.5").unwrap();
/// assert_eq!(amount.to_string(), "-$1,234.50");
/// ```
///
/// Parsing tolerates a dollar sign and thousands separators:
/// ```
/// # use expense_sync::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("$5,000.00").unwrap();
/// let b = Amount::from_str("5000").unwrap();
/// assert_eq!(a.value(), b.value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    /// The parsed numerical value.
    value: Decimal,
    /// The way the value was received from, or should be written to, JSON.
    repr: AmountRepr,
    /// The bits of the floating-point number the service sent, written back unchanged.
    received_f64: Option<u64>,
}

impl Amount {
    /// Creates a new Amount from a Decimal value that serializes as a JSON number.
    pub const fn new(value: Decimal) -> Self {
        Self {
            value,
            repr: AmountRepr::Number,
            received_f64: None,
        }
    }

    /// Creates a new Amount with the specified JSON representation.
    pub const fn new_with_repr(value: Decimal, repr: AmountRepr) -> Self {
        Self {
            value,
            repr,
            received_f64: None,
        }
    }

    /// An amount received as a JSON floating-point number. It serializes back to the very same
    /// `f64`, while `value` holds the nearest `Decimal`. Numbers beyond the range of `Decimal` are
    /// clamped to `Decimal::MAX` or `Decimal::MIN` for arithmetic and display.
    pub fn from_f64(v: f64) -> Self {
        let value = Decimal::from_f64(v).unwrap_or(if v.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        });
        Self {
            value,
            repr: AmountRepr::Number,
            received_f64: Some(v.to_bits()),
        }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn repr(&self) -> AmountRepr {
        self.repr
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }

    /// Returns the amount with its sign forced negative (an expense).
    pub fn expense(&self) -> Self {
        Self::new(-self.value.abs())
    }

    /// Returns the amount with its sign forced positive (income).
    pub fn income(&self) -> Self {
        Self::new(self.value.abs())
    }

    /// Renders the amount with an explicit sign, as shown next to a transaction: `+$12.50`,
    /// `-$4.50`.
    pub fn signed(&self) -> String {
        if self.is_negative() {
            self.to_string()
        } else {
            format!("+{self}")
        }
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses user- or server-supplied text. The result has the `Text` representation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Ok(Amount::new_with_repr(Decimal::ZERO, AmountRepr::Text));
        }

        // "-$50.00" or "$50.00"
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        let without_commas = without_dollar.replace(',', "");
        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount::new_with_repr(value, AmountRepr::Text))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.value().abs();
        write!(
            f,
            "{sign}${}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.repr {
            AmountRepr::Text => serializer.serialize_str(&self.value.to_string()),
            AmountRepr::Number => {
                if let Some(bits) = self.received_f64 {
                    return serializer.serialize_f64(f64::from_bits(bits));
                }
                // Whole numbers go out as JSON integers so that `10` does not become `10.0`.
                if self.value.fract().is_zero() {
                    if let Some(i) = self.value.to_i64() {
                        return serializer.serialize_i64(i);
                    }
                    if let Some(u) = self.value.to_u64() {
                        return serializer.serialize_u64(u);
                    }
                }
                match self.value.to_f64() {
                    Some(f) => serializer.serialize_f64(f),
                    None => Err(serde::ser::Error::custom(format!(
                        "Amount {} cannot be represented as a JSON number",
                        self.value
                    ))),
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a string holding a decimal amount")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount::new(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::new(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Ok(Amount::from_f64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_str(v).map_err(E::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
