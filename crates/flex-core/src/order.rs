//! # Order Types
//!
//! The order a customer checks out. Orders are built by the caller and then
//! only ever borrowed by calculators, strategies and the facade.

use crate::error::{CheckoutError, FlexResult};
use crate::money::{Currency, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line item in an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stock-keeping reference, used by the inventory collaborator
    pub sku: String,

    /// Display name
    pub name: String,

    /// Unit price
    pub unit_price: Price,

    /// Quantity
    pub quantity: u32,
}

impl LineItem {
    pub fn new(sku: impl Into<String>, name: impl Into<String>, unit_price: Price, quantity: u32) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> FlexResult<Price> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// An order to be checked out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID (generated)
    pub id: String,

    /// Line items
    pub line_items: Vec<LineItem>,

    /// Currency (must be same for all items)
    pub currency: Currency,

    /// Whether the customer asked for gift wrapping
    #[serde(default)]
    pub gift_wrap: bool,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order with generated ID
    pub fn new(currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            line_items: Vec::new(),
            currency,
            gift_wrap: false,
            created_at: Utc::now(),
        }
    }

    /// Add a line item, rejecting negative prices, foreign currencies and
    /// amounts that would overflow the order total
    pub fn add_item(&mut self, item: LineItem) -> FlexResult<()> {
        if item.unit_price.currency != self.currency {
            return Err(CheckoutError::CurrencyMismatch {
                expected: self.currency.to_string(),
                found: item.unit_price.currency.to_string(),
            });
        }
        if item.unit_price.is_negative() {
            return Err(CheckoutError::InvalidOrder(format!(
                "line item {} has a negative unit price",
                item.sku
            )));
        }
        self.base_amount()?.checked_add(&item.total()?)?;
        self.line_items.push(item);
        Ok(())
    }

    /// Builder: add a line item
    pub fn with_item(mut self, item: LineItem) -> FlexResult<Self> {
        self.add_item(item)?;
        Ok(self)
    }

    /// Builder: request gift wrapping
    pub fn with_gift_wrap(mut self, gift_wrap: bool) -> Self {
        self.gift_wrap = gift_wrap;
        self
    }

    /// Sum of all line totals, before any decoration
    pub fn base_amount(&self) -> FlexResult<Price> {
        self.line_items
            .iter()
            .try_fold(Price::zero(self.currency), |sum, item| sum.checked_add(&item.total()?))
    }

    /// Check if order is empty
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Get item count
    pub fn item_count(&self) -> u32 {
        self.line_items
            .iter()
            .fold(0u32, |count, i| count.saturating_add(i.quantity))
    }
}
