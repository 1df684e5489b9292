//! # Money Types
//!
//! Currency and price types for FlexOrder.
//! Amounts are kept in the smallest currency unit to keep chains deterministic.

use crate::error::{CheckoutError, FlexResult};
use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    BRL,
    USD,
    EUR,
    GBP,
    JPY,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::BRL => "brl",
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, the others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
        }
    }

    /// Convert a decimal amount to the smallest currency unit (cents, etc.)
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        (amount * multiplier).round() as i64
    }

    /// Convert from smallest unit back to decimal
    pub fn from_smallest_unit(&self, amount: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        amount as f64 / divisor
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::BRL
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (centavos for BRL)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a new price from decimal amount
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_smallest_unit(amount),
            currency,
        }
    }

    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: 0,
            currency,
        }
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_smallest_unit(self.amount)
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    /// `percent`% of this price, rounded half away from zero to the smallest unit
    pub fn percent_of(&self, percent: f64) -> Price {
        Price {
            amount: (self.amount as f64 * percent / 100.0).round() as i64,
            currency: self.currency,
        }
    }

    /// Add two prices of the same currency
    pub fn checked_add(&self, other: &Price) -> FlexResult<Price> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| overflow("add", self, other))?;
        Ok(Price {
            amount,
            currency: self.currency,
        })
    }

    /// Subtract a price of the same currency
    pub fn checked_sub(&self, other: &Price) -> FlexResult<Price> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| overflow("subtract", self, other))?;
        Ok(Price {
            amount,
            currency: self.currency,
        })
    }

    /// Multiply by a quantity
    pub fn checked_mul(&self, quantity: u32) -> FlexResult<Price> {
        let amount = self.amount.checked_mul(i64::from(quantity)).ok_or_else(|| {
            CheckoutError::InvalidOrder(format!("{} x {} overflows", self, quantity))
        })?;
        Ok(Price {
            amount,
            currency: self.currency,
        })
    }

    fn ensure_same_currency(&self, other: &Price) -> FlexResult<()> {
        if self.currency != other.currency {
            return Err(CheckoutError::CurrencyMismatch {
                expected: self.currency.to_string(),
                found: other.currency.to_string(),
            });
        }
        Ok(())
    }

    /// Format for display (e.g., "R$10.00")
    pub fn display(&self) -> String {
        let symbol = self.currency.symbol();
        if self.currency.decimal_places() == 0 {
            format!("{}{}", symbol, self.amount)
        } else {
            format!("{}{:.2}", symbol, self.as_decimal())
        }
    }
}

fn overflow(op: &str, a: &Price, b: &Price) -> CheckoutError {
    CheckoutError::InvalidOrder(format!("cannot {} {} and {}: amount overflows", op, a, b))
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_conversion() {
        let brl = Currency::BRL;
        assert_eq!(brl.to_smallest_unit(10.99), 1099);
        assert_eq!(brl.from_smallest_unit(1099), 10.99);

        let jpy = Currency::JPY;
        assert_eq!(jpy.to_smallest_unit(1000.0), 1000);
        assert_eq!(jpy.from_smallest_unit(1000), 1000.0);
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::new(29.99, Currency::BRL).display(), "R$29.99");
        assert_eq!(Price::new(19.99, Currency::EUR).to_string(), "€19.99");
        assert_eq!(Price::new(500.0, Currency::JPY).display(), "¥500");
    }

    #[test]
    fn test_percent_of_rounds_to_smallest_unit() {
        let price = Price::from_cents(10_005, Currency::USD);
        assert_eq!(price.percent_of(10.0).amount, 1001); // 1000.5 rounds away from zero
        assert_eq!(Price::new(100.0, Currency::USD).percent_of(0.0).amount, 0);
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Price::new(10.0, Currency::BRL);
        let b = Price::new(2.5, Currency::BRL);
        assert_eq!(a.checked_add(&b).unwrap().amount, 1250);
        assert_eq!(a.checked_sub(&b).unwrap().amount, 750);

        let usd = Price::new(1.0, Currency::USD);
        assert!(matches!(
            a.checked_add(&usd),
            Err(CheckoutError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        let max = Price::from_cents(i64::MAX, Currency::BRL);
        let one = Price::from_cents(1, Currency::BRL);
        assert!(matches!(max.checked_add(&one), Err(CheckoutError::InvalidOrder(_))));

        let min = Price::from_cents(i64::MIN, Currency::BRL);
        assert!(matches!(min.checked_sub(&one), Err(CheckoutError::InvalidOrder(_))));

        let half = Price::from_cents(i64::MAX / 2 + 1, Currency::BRL);
        assert!(matches!(half.checked_mul(2), Err(CheckoutError::InvalidOrder(_))));
        assert_eq!(one.checked_mul(3).unwrap().amount, 3);
    }
}
