//! # flex-core
//!
//! Checkout engine for FlexOrder.
//!
//! This crate provides:
//! - `PaymentStrategy` with instant transfer, card and mana variants
//! - `ShippingStrategy` with standard, express and teleport variants
//! - `PriceCalculator` chains: `BaseCalculator` wrapped in `BulkDiscount` / `GiftWrapFee`
//! - `CheckoutFacade`, which runs pricing, shipping, payment and fulfilment in one call
//! - `CheckoutConfig` for the numeric knobs, loaded from TOML
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use flex_core::{
//!     BaseCalculator, CheckoutFacade, Currency, LineItem, Order, PaymentMethod, Price,
//!     PriceCalculatorExt, ShippingMethod,
//! };
//!
//! let order = Order::new(Currency::BRL)
//!     .with_item(LineItem::new("crystal", "Magic Crystal", Price::new(600.0, Currency::BRL), 1))?
//!     .with_gift_wrap(true);
//!
//! let calculator = BaseCalculator.with_gift_wrap(Price::new(5.0, Currency::BRL));
//!
//! let result = CheckoutFacade::new().checkout(
//!     &order,
//!     &PaymentMethod::instant_transfer(),
//!     &ShippingMethod::express("Rivendell"),
//!     &calculator,
//! );
//! assert!(result.is_success());
//! ```

pub mod checkout;
pub mod config;
pub mod error;
pub mod fulfillment;
pub mod money;
pub mod order;
pub mod payment;
pub mod pricing;
pub mod shipping;

// Re-exports for convenience
pub use checkout::{CheckoutFacade, CheckoutFailure, CheckoutResult, CheckoutStatus};
pub use config::{CheckoutConfig, PaymentConfig, PricingConfig, ShippingConfig};
pub use error::{CheckoutError, FailureKind, FlexResult};
pub use fulfillment::{
    InMemoryInventory, Inventory, Invoice, InvoiceEmitter, InvoiceLedger, LoggingInvoiceEmitter,
    UnlimitedInventory,
};
pub use money::{Currency, Price};
pub use order::{LineItem, Order};
pub use payment::{
    BoxedPaymentStrategy, CardPayment, InstantTransfer, ManaTransfer, PaymentMethod,
    PaymentOutcome, PaymentStrategy,
};
pub use pricing::{
    build_chain, Adjustment, BaseCalculator, BoxedPriceCalculator, BulkDiscount, DiscountTrigger,
    GiftWrapFee, PriceBreakdown, PriceCalculator, PriceCalculatorExt,
};
pub use shipping::{
    ExpressShipping, ShippingMethod, ShippingQuote, ShippingRate, ShippingStrategy,
    StandardShipping, TeleportShipping,
};
