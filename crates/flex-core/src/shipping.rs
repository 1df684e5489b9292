//! # Shipping Strategies
//!
//! Interchangeable delivery cost calculations. Costs are a flat fee plus a
//! percentage of the (already decorated and discounted) goods total.

use crate::error::{CheckoutError, FlexResult};
use crate::money::Price;
use crate::order::Order;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cost and delivery estimate for one order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingQuote {
    /// Method that produced the quote
    pub method: String,
    /// Delivery cost
    pub cost: Price,
    /// Estimated delivery, e.g. "1-2 business days"
    pub estimate: String,
}

/// Core trait for shipping method implementations.
pub trait ShippingStrategy: Send + Sync {
    /// Quote delivery of `order`, whose goods total is `subtotal`.
    fn quote(&self, order: &Order, subtotal: &Price) -> FlexResult<ShippingQuote>;

    /// Get the method name (for logging and results).
    fn method_name(&self) -> &'static str;
}

/// Flat fee plus percentage of the subtotal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShippingRate {
    /// Fixed part of the cost, in the order's currency (decimal)
    #[serde(default)]
    pub flat: f64,
    /// Percentage of the subtotal
    #[serde(default)]
    pub percent: f64,
}

impl ShippingRate {
    pub fn flat(flat: f64) -> Self {
        Self { flat, percent: 0.0 }
    }

    pub fn percent(percent: f64) -> Self {
        Self { flat: 0.0, percent }
    }

    pub fn new(flat: f64, percent: f64) -> Self {
        Self { flat, percent }
    }

    /// Apply the rate to a subtotal
    pub fn cost_for(&self, subtotal: &Price) -> FlexResult<Price> {
        Price::new(self.flat, subtotal.currency).checked_add(&subtotal.percent_of(self.percent))
    }

    /// Standard delivery: 5% of the subtotal
    pub fn standard_default() -> Self {
        Self::percent(5.0)
    }

    /// Express delivery: 10% of the subtotal plus 15.00
    pub fn express_default() -> Self {
        Self::new(15.0, 10.0)
    }

    /// Teleport: free and instant
    pub fn teleport_default() -> Self {
        Self::flat(0.0)
    }
}

fn require_destination(method: &str, destination: &Option<String>) -> FlexResult<String> {
    match destination.as_deref().map(str::trim) {
        Some(dest) if !dest.is_empty() => Ok(dest.to_string()),
        _ => Err(CheckoutError::UnsupportedDestination {
            method: method.to_string(),
        }),
    }
}

/// Ground delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardShipping {
    #[serde(default)]
    pub destination: Option<String>,
    pub rate: ShippingRate,
}

impl StandardShipping {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: Some(destination.into()),
            rate: ShippingRate::standard_default(),
        }
    }

    pub fn with_rate(mut self, rate: ShippingRate) -> Self {
        self.rate = rate;
        self
    }
}

impl ShippingStrategy for StandardShipping {
    fn quote(&self, order: &Order, subtotal: &Price) -> FlexResult<ShippingQuote> {
        let destination = require_destination(self.method_name(), &self.destination)?;
        let cost = self.rate.cost_for(subtotal)?;
        debug!(order_id = %order.id, %destination, "Standard shipping: {}", cost);
        Ok(ShippingQuote {
            method: self.method_name().to_string(),
            cost,
            estimate: "5-10 business days".to_string(),
        })
    }

    fn method_name(&self) -> &'static str {
        "standard"
    }
}

/// Priority courier delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressShipping {
    #[serde(default)]
    pub destination: Option<String>,
    pub rate: ShippingRate,
}

impl ExpressShipping {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: Some(destination.into()),
            rate: ShippingRate::express_default(),
        }
    }

    pub fn with_rate(mut self, rate: ShippingRate) -> Self {
        self.rate = rate;
        self
    }
}

impl ShippingStrategy for ExpressShipping {
    fn quote(&self, order: &Order, subtotal: &Price) -> FlexResult<ShippingQuote> {
        let destination = require_destination(self.method_name(), &self.destination)?;
        let cost = self.rate.cost_for(subtotal)?;
        debug!(order_id = %order.id, %destination, "Express shipping (with fee): {}", cost);
        Ok(ShippingQuote {
            method: self.method_name().to_string(),
            cost,
            estimate: "1-2 business days".to_string(),
        })
    }

    fn method_name(&self) -> &'static str {
        "express"
    }
}

/// Teleportation. Needs no destination; the parcel finds its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleportShipping {
    pub rate: ShippingRate,
}

impl TeleportShipping {
    pub fn new() -> Self {
        Self {
            rate: ShippingRate::teleport_default(),
        }
    }

    pub fn with_rate(mut self, rate: ShippingRate) -> Self {
        self.rate = rate;
        self
    }
}

impl Default for TeleportShipping {
    fn default() -> Self {
        Self::new()
    }
}

impl ShippingStrategy for TeleportShipping {
    fn quote(&self, order: &Order, subtotal: &Price) -> FlexResult<ShippingQuote> {
        let cost = self.rate.cost_for(subtotal)?;
        debug!(order_id = %order.id, "Teleport shipping: {}", cost);
        Ok(ShippingQuote {
            method: self.method_name().to_string(),
            cost,
            estimate: "instant".to_string(),
        })
    }

    fn method_name(&self) -> &'static str {
        "teleport"
    }
}

/// The shipping method selected for one checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ShippingMethod {
    Standard(StandardShipping),
    Express(ExpressShipping),
    Teleport(TeleportShipping),
}

impl ShippingMethod {
    pub fn standard(destination: impl Into<String>) -> Self {
        ShippingMethod::Standard(StandardShipping::new(destination))
    }

    pub fn express(destination: impl Into<String>) -> Self {
        ShippingMethod::Express(ExpressShipping::new(destination))
    }

    pub fn teleport() -> Self {
        ShippingMethod::Teleport(TeleportShipping::new())
    }

    fn strategy(&self) -> &dyn ShippingStrategy {
        match self {
            ShippingMethod::Standard(s) => s,
            ShippingMethod::Express(s) => s,
            ShippingMethod::Teleport(s) => s,
        }
    }
}

impl ShippingStrategy for ShippingMethod {
    fn quote(&self, order: &Order, subtotal: &Price) -> FlexResult<ShippingQuote> {
        self.strategy().quote(order, subtotal)
    }

    fn method_name(&self) -> &'static str {
        self.strategy().method_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn subtotal(amount: f64) -> Price {
        Price::new(amount, Currency::BRL)
    }

    #[test]
    fn test_standard_default_rate() {
        let order = Order::new(Currency::BRL);
        let quote = StandardShipping::new("Hogsmeade")
            .quote(&order, &subtotal(230.0))
            .unwrap();
        assert_eq!(quote.cost, subtotal(11.5));
        assert_eq!(quote.estimate, "5-10 business days");
    }

    #[test]
    fn test_express_default_rate() {
        let order = Order::new(Currency::BRL);
        let quote = ExpressShipping::new("Rivendell")
            .quote(&order, &subtotal(545.0))
            .unwrap();
        assert_eq!(quote.cost, subtotal(69.5));
        assert_eq!(quote.method, "express");
    }

    #[test]
    fn test_teleport_needs_no_destination() {
        let order = Order::new(Currency::BRL);
        let quote = ShippingMethod::teleport().quote(&order, &subtotal(420.0)).unwrap();
        assert_eq!(quote.cost, Price::zero(Currency::BRL));
        assert_eq!(quote.estimate, "instant");

        let paid = TeleportShipping::new()
            .with_rate(ShippingRate::flat(50.0))
            .quote(&order, &subtotal(420.0))
            .unwrap();
        assert_eq!(paid.cost, subtotal(50.0));
    }

    #[test]
    fn test_missing_destination() {
        let order = Order::new(Currency::BRL);
        let standard = ShippingMethod::Standard(StandardShipping {
            destination: None,
            rate: ShippingRate::standard_default(),
        });
        assert!(matches!(
            standard.quote(&order, &subtotal(10.0)),
            Err(CheckoutError::UnsupportedDestination { .. })
        ));

        let express = ShippingMethod::express("  ");
        assert!(matches!(
            express.quote(&order, &subtotal(10.0)),
            Err(CheckoutError::UnsupportedDestination { .. })
        ));
    }
}
