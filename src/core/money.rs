//! Monetary values held as integer minor units

use anyhow::{Result, anyhow, bail};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Display;

/// Normalizes a currency code for comparison and storage.
pub fn normalize_currency(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Number of decimal places between the major and minor unit of a currency.
pub fn minor_unit_exponent(currency: &str) -> u32 {
    match currency.trim().to_uppercase().as_str() {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" => 0,
        "BHD" | "KWD" | "OMR" | "JOD" | "TND" | "IQD" | "LYD" => 3,
        _ => 2,
    }
}

/// An amount of money in the smallest denomination of its currency.
///
/// The currency code is kept lower-cased so two values built from `"USD"` and
/// `"usd"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Money {
    cents: i64,
    currency: String,
}

impl Money {
    pub fn new(cents: i64, currency: &str) -> Self {
        Self {
            cents,
            currency: normalize_currency(currency),
        }
    }

    pub fn zero(currency: &str) -> Self {
        Self::new(0, currency)
    }

    /// Builds a value from a major-unit decimal, e.g. `12.12` dollars.
    ///
    /// Fractions of a minor unit are rounded half away from zero.
    pub fn from_amount(amount: Decimal, currency: &str) -> Result<Self> {
        let factor = Decimal::from(10_i64.pow(minor_unit_exponent(currency)));
        let cents = amount
            .checked_mul(factor)
            .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|scaled| scaled.to_i64())
            .ok_or_else(|| anyhow!("Amount {amount} {currency} is out of range"))?;
        Ok(Self::new(cents, currency))
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// The amount in major units, scaled to the currency's precision.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.cents, minor_unit_exponent(&self.currency))
    }

    pub fn checked_add(&self, other: &Money) -> Result<Money> {
        if self.currency != other.currency {
            bail!(
                "Cannot add {} to {}: currencies differ",
                other.currency,
                self.currency
            );
        }
        let cents = self
            .cents
            .checked_add(other.cents)
            .ok_or_else(|| anyhow!("Overflow adding {other} to {self}"))?;
        Ok(Self::new(cents, &self.currency))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.to_decimal(), self.currency.to_uppercase())
    }
}
