//! # Checkout Facade
//!
//! One call that runs the whole checkout protocol:
//!
//! 1. compute the goods total through the calculator chain, then apply the
//!    payment method's own discount
//! 2. quote shipping on that total
//! 3. charge goods + shipping through the payment strategy
//! 4. on approval, decrement stock and emit the invoice
//! 5. return a `CheckoutResult`
//!
//! Every failure ends the sequence early and is reported in the result; the
//! facade never retries and never substitutes another strategy.

use crate::error::{CheckoutError, FailureKind, FlexResult};
use crate::fulfillment::{Inventory, InvoiceEmitter, LoggingInvoiceEmitter, UnlimitedInventory};
use crate::money::Price;
use crate::order::Order;
use crate::payment::PaymentStrategy;
use crate::pricing::PriceCalculator;
use crate::shipping::{ShippingQuote, ShippingStrategy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Outcome of a checkout call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    /// Payment approved and fulfilment done
    Success,
    /// Something failed; see `CheckoutResult::failure`
    Failed,
}

/// Why a checkout failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutFailure {
    pub kind: FailureKind,
    pub message: String,
    /// Whether retrying the same checkout later may succeed
    pub retryable: bool,
}

impl From<&CheckoutError> for CheckoutFailure {
    fn from(err: &CheckoutError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// What a checkout call returns. Built once per call, never retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResult {
    pub order_id: String,
    pub status: CheckoutStatus,

    /// Goods total after decorators and payment discount
    pub price: Price,

    /// Shipping quote, once obtained
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingQuote>,

    /// Goods plus shipping
    pub amount_charged: Price,

    /// Payment method used
    pub payment_method: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_label: Option<String>,

    /// Only set on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_id: Option<String>,

    /// Only set on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<CheckoutFailure>,

    /// Description of the calculator chain for this order
    pub description: String,

    pub completed_at: DateTime<Utc>,
}

impl CheckoutResult {
    pub(crate) fn pending(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            status: CheckoutStatus::Failed,
            price: Price::zero(order.currency),
            shipping: None,
            amount_charged: Price::zero(order.currency),
            payment_method: String::new(),
            payment_label: None,
            confirmation_id: None,
            invoice_id: None,
            failure: None,
            description: String::new(),
            completed_at: Utc::now(),
        }
    }

    fn fail(mut self, err: &CheckoutError) -> Self {
        self.status = CheckoutStatus::Failed;
        self.confirmation_id = None;
        self.invoice_id = None;
        self.failure = Some(CheckoutFailure::from(err));
        self.completed_at = Utc::now();
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == CheckoutStatus::Success
    }

    /// Shipping cost, zero if no quote was obtained
    pub fn shipping_cost(&self) -> Price {
        self.shipping
            .as_ref()
            .map(|q| q.cost)
            .unwrap_or(Price::zero(self.price.currency))
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(|f| f.kind)
    }
}

/// Single entry point for checkouts.
///
/// Holds only its collaborators; nothing about a checkout survives the call.
pub struct CheckoutFacade<I = UnlimitedInventory, V = LoggingInvoiceEmitter> {
    inventory: I,
    invoices: V,
}

impl CheckoutFacade {
    /// Facade with a recording-only inventory and log-only invoices
    pub fn new() -> Self {
        Self {
            inventory: UnlimitedInventory::new(),
            invoices: LoggingInvoiceEmitter,
        }
    }
}

impl Default for CheckoutFacade {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Inventory, V: InvoiceEmitter> CheckoutFacade<I, V> {
    pub fn with_collaborators(inventory: I, invoices: V) -> Self {
        Self {
            inventory,
            invoices,
        }
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    pub fn invoices(&self) -> &V {
        &self.invoices
    }

    /// Run a complete checkout.
    ///
    /// Exactly one payment and one shipping strategy take part. The order is
    /// only borrowed; the result reports success or the first failure.
    #[instrument(
        skip_all,
        fields(
            order_id = %order.id,
            payment = payment.method_name(),
            shipping = shipping.method_name()
        )
    )]
    pub fn checkout(
        &self,
        order: &Order,
        payment: &dyn PaymentStrategy,
        shipping: &dyn ShippingStrategy,
        calculator: &dyn PriceCalculator,
    ) -> CheckoutResult {
        let mut result = CheckoutResult::pending(order);
        result.payment_method = payment.method_name().to_string();

        match self.run(order, payment, shipping, calculator, &mut result) {
            Ok(()) => {
                info!(
                    confirmation_id = ?result.confirmation_id,
                    "Checkout approved, charged {}",
                    result.amount_charged
                );
                result
            }
            Err(err) => {
                warn!(kind = ?err.kind(), "Checkout aborted: {}", err);
                result.fail(&err)
            }
        }
    }

    fn run(
        &self,
        order: &Order,
        payment: &dyn PaymentStrategy,
        shipping: &dyn ShippingStrategy,
        calculator: &dyn PriceCalculator,
        result: &mut CheckoutResult,
    ) -> FlexResult<()> {
        if order.is_empty() {
            return Err(CheckoutError::InvalidOrder("Order has no items".to_string()));
        }

        // 1. goods total
        let breakdown = calculator.evaluate(order)?;
        result.description = breakdown.description;
        let price = apply_payment_discount(payment, breakdown.total)?;
        result.price = price;

        // 2. shipping
        let quote = shipping.quote(order, &price)?;
        let charged = price.checked_add(&quote.cost)?;
        result.shipping = Some(quote);
        result.amount_charged = charged;

        // 3. payment
        let outcome = payment.process(order, &charged)?;
        result.payment_label = Some(outcome.label.clone());
        if !outcome.approved {
            return Err(CheckoutError::PaymentDeclined {
                reason: outcome.label,
            });
        }

        // 4. side effects; the invoice sees the completed result
        self.reserve_stock(order)?;
        result.confirmation_id = Some(Uuid::new_v4().to_string());
        result.status = CheckoutStatus::Success;
        result.completed_at = Utc::now();
        match self.invoices.emit(order, result) {
            Ok(invoice_id) => result.invoice_id = Some(invoice_id),
            Err(err) => {
                self.release_stock(order, order.line_items.len());
                return Err(err);
            }
        }

        Ok(())
    }

    /// Decrement every line; on the first shortage put back what was taken.
    fn reserve_stock(&self, order: &Order) -> FlexResult<()> {
        for (taken, item) in order.line_items.iter().enumerate() {
            if let Err(err) = self.inventory.decrement(&item.sku, item.quantity) {
                self.release_stock(order, taken);
                return Err(err);
            }
        }
        Ok(())
    }

    fn release_stock(&self, order: &Order, lines: usize) {
        for item in order.line_items.iter().take(lines) {
            if let Err(err) = self.inventory.restore(&item.sku, item.quantity) {
                warn!(sku = %item.sku, "Failed to restore stock: {}", err);
            }
        }
    }
}

fn apply_payment_discount(payment: &dyn PaymentStrategy, total: Price) -> FlexResult<Price> {
    let percent = payment.discount_percent();
    if !(0.0..=100.0).contains(&percent) {
        return Err(CheckoutError::invalid_payment(
            payment.method_name(),
            format!("discount of {}% is out of range", percent),
        ));
    }
    if percent == 0.0 {
        return Ok(total);
    }
    info!(percent, "Applying payment method discount");
    total.checked_sub(&total.percent_of(percent))
}
