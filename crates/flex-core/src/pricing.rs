//! # Price Decorators
//!
//! Order totals are computed by a chain of calculators. The chain ends in
//! `BaseCalculator`; every decorator owns exactly one inner calculator, asks it
//! for a total first and then applies its own adjustment.
//!
//! ```text
//!   GiftWrapFee( BulkDiscount( BaseCalculator ) )
//!        │             │              │
//!        │             │              └── Σ line items
//!        │             └── - percent, if the trigger holds
//!        └── + fee, if the order asked for gift wrapping
//! ```

use crate::error::{CheckoutError, FlexResult};
use crate::money::{Currency, Price};
use crate::order::Order;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Total and description produced by one pass over a calculator chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub total: Price,
    /// e.g. "Order with 2 item(s) + Gift wrap (R$5.00)"
    pub description: String,
}

/// Maps an order to a monetary amount.
///
/// Implementations must be deterministic and must not mutate the order.
/// Each calculator evaluates its inner calculator exactly once per call.
pub trait PriceCalculator: Send + Sync {
    /// Walk the chain once, producing both the total and its description
    fn evaluate(&self, order: &Order) -> FlexResult<PriceBreakdown>;

    /// Compute the total for `order`
    fn compute_total(&self, order: &Order) -> FlexResult<Price> {
        Ok(self.evaluate(order)?.total)
    }

    /// Human-readable description of the chain
    fn describe(&self, order: &Order) -> FlexResult<String> {
        Ok(self.evaluate(order)?.description)
    }
}

/// Type alias for a boxed calculator (dynamic dispatch)
pub type BoxedPriceCalculator = Box<dyn PriceCalculator>;

impl<C: PriceCalculator + ?Sized> PriceCalculator for Box<C> {
    fn evaluate(&self, order: &Order) -> FlexResult<PriceBreakdown> {
        (**self).evaluate(order)
    }
}

/// Chain terminus: the sum of the order's line items
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseCalculator;

impl PriceCalculator for BaseCalculator {
    fn evaluate(&self, order: &Order) -> FlexResult<PriceBreakdown> {
        Ok(PriceBreakdown {
            total: order.base_amount()?,
            description: format!("Order with {} item(s)", order.item_count()),
        })
    }
}

/// When a bulk discount kicks in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTrigger {
    /// Item count at or above the threshold
    MinItems(u32),
    /// Inner total strictly above the amount (decimal, order currency)
    SubtotalAbove(f64),
}

impl DiscountTrigger {
    fn holds(&self, order: &Order, inner_total: &Price) -> bool {
        match *self {
            DiscountTrigger::MinItems(n) => order.item_count() >= n,
            DiscountTrigger::SubtotalAbove(amount) => {
                inner_total.amount > Price::new(amount, inner_total.currency).amount
            }
        }
    }
}

/// Subtracts a percentage of the inner total when its trigger holds
#[derive(Debug, Clone)]
pub struct BulkDiscount<C> {
    inner: C,
    trigger: DiscountTrigger,
    percent: f64,
}

impl<C: PriceCalculator> BulkDiscount<C> {
    pub fn new(inner: C, trigger: DiscountTrigger, percent: f64) -> Self {
        Self {
            inner,
            trigger,
            percent,
        }
    }

    /// Borrow the wrapped calculator
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// The adjustment alone, applied to an already computed inner total
    pub fn adjust(&self, order: &Order, inner_total: Price) -> FlexResult<Price> {
        if !self.trigger.holds(order, &inner_total) {
            return Ok(inner_total);
        }
        let discount = inner_total.percent_of(self.percent);
        debug!(order_id = %order.id, percent = self.percent, "Applying bulk discount of {}", discount);
        inner_total.checked_sub(&discount)
    }
}

impl<C: PriceCalculator> PriceCalculator for BulkDiscount<C> {
    fn evaluate(&self, order: &Order) -> FlexResult<PriceBreakdown> {
        let mut breakdown = self.inner.evaluate(order)?;
        if self.trigger.holds(order, &breakdown.total) {
            breakdown.total = self.adjust(order, breakdown.total)?;
            breakdown
                .description
                .push_str(&format!(" + Bulk discount ({}%)", self.percent));
        }
        Ok(breakdown)
    }
}

/// Adds a fixed fee when the order asks for gift wrapping
#[derive(Debug, Clone)]
pub struct GiftWrapFee<C> {
    inner: C,
    fee: Price,
}

impl<C: PriceCalculator> GiftWrapFee<C> {
    pub fn new(inner: C, fee: Price) -> Self {
        Self { inner, fee }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn adjust(&self, order: &Order, inner_total: Price) -> FlexResult<Price> {
        if !order.gift_wrap {
            return Ok(inner_total);
        }
        if self.fee.currency != order.currency {
            return Err(CheckoutError::CurrencyMismatch {
                expected: order.currency.to_string(),
                found: self.fee.currency.to_string(),
            });
        }
        debug!(order_id = %order.id, "Adding {} gift wrap fee", self.fee);
        inner_total.checked_add(&self.fee)
    }
}

impl<C: PriceCalculator> PriceCalculator for GiftWrapFee<C> {
    fn evaluate(&self, order: &Order) -> FlexResult<PriceBreakdown> {
        let mut breakdown = self.inner.evaluate(order)?;
        if order.gift_wrap {
            breakdown.total = self.adjust(order, breakdown.total)?;
            breakdown
                .description
                .push_str(&format!(" + Gift wrap ({})", self.fee));
        }
        Ok(breakdown)
    }
}

/// Fluent wrapping: `BaseCalculator.with_bulk_discount(..).with_gift_wrap(..)`
/// builds `GiftWrapFee(BulkDiscount(BaseCalculator))`.
pub trait PriceCalculatorExt: PriceCalculator + Sized {
    fn with_bulk_discount(self, trigger: DiscountTrigger, percent: f64) -> BulkDiscount<Self> {
        BulkDiscount::new(self, trigger, percent)
    }

    fn with_gift_wrap(self, fee: Price) -> GiftWrapFee<Self> {
        GiftWrapFee::new(self, fee)
    }

    fn boxed(self) -> BoxedPriceCalculator
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<C: PriceCalculator + Sized> PriceCalculatorExt for C {}

/// One configurable decoration step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    BulkDiscount {
        #[serde(flatten)]
        trigger: DiscountTrigger,
        percent: f64,
    },
    GiftWrap {
        fee: f64,
    },
}

impl Adjustment {
    pub fn validate(&self) -> FlexResult<()> {
        match self {
            Adjustment::BulkDiscount { trigger, percent } => {
                if !(0.0..=100.0).contains(percent) {
                    return Err(CheckoutError::Configuration(format!(
                        "bulk discount percent must be within 0..=100, got {}",
                        percent
                    )));
                }
                if let DiscountTrigger::SubtotalAbove(amount) = trigger {
                    if !amount.is_finite() || *amount < 0.0 {
                        return Err(CheckoutError::Configuration(
                            "bulk discount subtotal_above must be a non-negative number".to_string(),
                        ));
                    }
                }
            }
            Adjustment::GiftWrap { fee } => {
                if !fee.is_finite() || *fee < 0.0 {
                    return Err(CheckoutError::Configuration(
                        "gift wrap fee must be a non-negative number".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Fold `adjustments` over the base calculator. The first adjustment wraps
/// the base directly, so it is applied first.
pub fn build_chain(
    adjustments: &[Adjustment],
    currency: Currency,
) -> FlexResult<BoxedPriceCalculator> {
    adjustments
        .iter()
        .try_fold(BaseCalculator.boxed(), |chain, adjustment| {
            adjustment.validate()?;
            Ok(match *adjustment {
                Adjustment::BulkDiscount { trigger, percent } => {
                    chain.with_bulk_discount(trigger, percent).boxed()
                }
                Adjustment::GiftWrap { fee } => {
                    chain.with_gift_wrap(Price::new(fee, currency)).boxed()
                }
            })
        })
}
