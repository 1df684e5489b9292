//! # Payment Strategies
//!
//! Strategy pattern for payment methods. The facade only talks to the
//! `PaymentStrategy` trait; swapping instant transfer for a card is a matter of
//! passing a different value.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   PaymentStrategy (trait)                   │
//! │  ├── process()                                              │
//! │  ├── discount_percent()                                     │
//! │  └── method_name()                                          │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!          ┌─────────────────┼─────────────────┐
//!          │                 │                 │
//!  ┌───────┴───────┐ ┌───────┴───────┐ ┌───────┴───────┐
//!  │InstantTransfer│ │  CardPayment  │ │ ManaTransfer  │
//!  └───────────────┘ └───────────────┘ └───────────────┘
//! ```

use crate::error::{CheckoutError, FlexResult};
use crate::money::Price;
use crate::order::Order;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of running a payment strategy.
///
/// A decline is a normal outcome (`approved == false`), not an error; errors
/// are reserved for parameters the strategy cannot work with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// Whether the payment went through
    pub approved: bool,
    /// Human-readable description of what happened
    pub label: String,
    /// Method that produced this outcome
    pub method: String,
}

impl PaymentOutcome {
    pub fn approved(method: &str, label: impl Into<String>) -> Self {
        Self {
            approved: true,
            label: label.into(),
            method: method.to_string(),
        }
    }

    pub fn declined(method: &str, label: impl Into<String>) -> Self {
        Self {
            approved: false,
            label: label.into(),
            method: method.to_string(),
        }
    }
}

/// Core trait for payment method implementations.
pub trait PaymentStrategy: Send + Sync {
    /// Validate parameters and "charge" `amount` for `order`.
    ///
    /// # Arguments
    /// * `order` - The order being paid for
    /// * `amount` - Goods total plus shipping
    fn process(&self, order: &Order, amount: &Price) -> FlexResult<PaymentOutcome>;

    /// Get the method name (for logging and results).
    fn method_name(&self) -> &'static str;

    /// Discount this method grants on the goods total, in percent.
    fn discount_percent(&self) -> f64 {
        0.0
    }
}

/// Type alias for a shared payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

fn reject_negative(method: &str, amount: &Price) -> FlexResult<()> {
    if amount.is_negative() {
        return Err(CheckoutError::invalid_payment(
            method,
            format!("amount {} is negative", amount),
        ));
    }
    Ok(())
}

/// Instant bank transfer (QR code). Always approved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstantTransfer {
    /// Discount granted for paying instantly
    #[serde(default)]
    pub discount_percent: f64,
}

impl InstantTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_discount(discount_percent: f64) -> Self {
        Self { discount_percent }
    }
}

impl PaymentStrategy for InstantTransfer {
    fn process(&self, order: &Order, amount: &Price) -> FlexResult<PaymentOutcome> {
        reject_negative(self.method_name(), amount)?;
        info!(order_id = %order.id, "Processing {} via instant transfer", amount);
        Ok(PaymentOutcome::approved(
            self.method_name(),
            format!("Instant transfer of {} approved (QR code issued)", amount),
        ))
    }

    fn method_name(&self) -> &'static str {
        "instant_transfer"
    }

    fn discount_percent(&self) -> f64 {
        self.discount_percent
    }
}

/// Credit card with a spending limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPayment {
    /// Card number stub; never a real PAN
    pub card_number: String,
    /// Amounts at or above this are declined
    pub limit: Price,
}

impl CardPayment {
    pub fn new(card_number: impl Into<String>, limit: Price) -> Self {
        Self {
            card_number: card_number.into(),
            limit,
        }
    }

    /// Last four characters of the card stub, for labels
    fn masked(&self) -> String {
        let digits: Vec<char> = self.card_number.trim().chars().collect();
        let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        format!("****{}", tail)
    }
}

impl PaymentStrategy for CardPayment {
    fn process(&self, order: &Order, amount: &Price) -> FlexResult<PaymentOutcome> {
        let method = self.method_name();
        if self.card_number.trim().is_empty() {
            return Err(CheckoutError::invalid_payment(method, "card number is empty"));
        }
        reject_negative(method, amount)?;
        if amount.currency != self.limit.currency {
            return Err(CheckoutError::invalid_payment(
                method,
                format!(
                    "card limit is in {}, charge is in {}",
                    self.limit.currency, amount.currency
                ),
            ));
        }

        info!(order_id = %order.id, card = %self.masked(), "Processing {} via card", amount);

        if amount.amount < self.limit.amount {
            Ok(PaymentOutcome::approved(
                method,
                format!("Card {} charged {}", self.masked(), amount),
            ))
        } else {
            warn!(order_id = %order.id, limit = %self.limit, "Card payment rejected, limit exceeded");
            Ok(PaymentOutcome::declined(
                method,
                format!("Card {} declined: limit of {} exceeded", self.masked(), self.limit),
            ))
        }
    }

    fn method_name(&self) -> &'static str {
        "card"
    }
}

/// Mana transfer between wizard wallets. Fictional, always approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManaTransfer {
    /// Source wallet
    pub wallet: String,
}

impl ManaTransfer {
    pub fn new(wallet: impl Into<String>) -> Self {
        Self {
            wallet: wallet.into(),
        }
    }
}

impl PaymentStrategy for ManaTransfer {
    fn process(&self, order: &Order, amount: &Price) -> FlexResult<PaymentOutcome> {
        let method = self.method_name();
        if self.wallet.trim().is_empty() {
            return Err(CheckoutError::invalid_payment(method, "mana wallet is empty"));
        }
        reject_negative(method, amount)?;
        debug!(order_id = %order.id, wallet = %self.wallet, "Channelling mana");
        Ok(PaymentOutcome::approved(
            method,
            format!("Mana transfer of {} from {} approved", amount, self.wallet),
        ))
    }

    fn method_name(&self) -> &'static str {
        "mana"
    }
}

/// The payment method selected for one checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    InstantTransfer(InstantTransfer),
    Card(CardPayment),
    Mana(ManaTransfer),
}

impl PaymentMethod {
    pub fn instant_transfer() -> Self {
        PaymentMethod::InstantTransfer(InstantTransfer::new())
    }

    pub fn card(card_number: impl Into<String>, limit: Price) -> Self {
        PaymentMethod::Card(CardPayment::new(card_number, limit))
    }

    pub fn mana(wallet: impl Into<String>) -> Self {
        PaymentMethod::Mana(ManaTransfer::new(wallet))
    }

    fn strategy(&self) -> &dyn PaymentStrategy {
        match self {
            PaymentMethod::InstantTransfer(s) => s,
            PaymentMethod::Card(s) => s,
            PaymentMethod::Mana(s) => s,
        }
    }
}

impl PaymentStrategy for PaymentMethod {
    fn process(&self, order: &Order, amount: &Price) -> FlexResult<PaymentOutcome> {
        self.strategy().process(order, amount)
    }

    fn method_name(&self) -> &'static str {
        self.strategy().method_name()
    }

    fn discount_percent(&self) -> f64 {
        self.strategy().discount_percent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn order() -> Order {
        Order::new(Currency::BRL)
    }

    #[test]
    fn test_instant_transfer_approves() {
        let outcome = InstantTransfer::new()
            .process(&order(), &Price::new(110.0, Currency::BRL))
            .unwrap();
        assert!(outcome.approved);
        assert_eq!(outcome.method, "instant_transfer");
        assert!(outcome.label.contains("R$110.00"));
    }

    #[test]
    fn test_card_empty_number_is_invalid() {
        let card = CardPayment::new("   ", Price::new(1000.0, Currency::BRL));
        let err = card
            .process(&order(), &Price::new(10.0, Currency::BRL))
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidPaymentParameters { .. }));
    }

    #[test]
    fn test_card_limit_is_exclusive() {
        let card = CardPayment::new("4111111111111111", Price::new(1000.0, Currency::BRL));

        let below = card.process(&order(), &Price::new(999.99, Currency::BRL)).unwrap();
        assert!(below.approved);
        assert!(below.label.contains("****1111"));

        let at = card.process(&order(), &Price::new(1000.0, Currency::BRL)).unwrap();
        assert!(!at.approved);
    }

    #[test]
    fn test_mana_requires_wallet() {
        let err = ManaTransfer::new("")
            .process(&order(), &Price::new(1.0, Currency::BRL))
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidPaymentParameters { .. }));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = InstantTransfer::new()
            .process(&order(), &Price::from_cents(-100, Currency::BRL))
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidPaymentParameters { .. }));
    }

    #[test]
    fn test_payment_method_delegates() {
        let method = PaymentMethod::InstantTransfer(InstantTransfer::with_discount(5.0));
        assert_eq!(method.method_name(), "instant_transfer");
        assert_eq!(method.discount_percent(), 5.0);

        let card = PaymentMethod::card("4242", Price::new(1000.0, Currency::BRL));
        assert_eq!(card.method_name(), "card");
        assert_eq!(card.discount_percent(), 0.0);

        let shared: BoxedPaymentStrategy = Arc::new(PaymentMethod::mana("archmage"));
        assert_eq!(shared.method_name(), "mana");
    }
}
