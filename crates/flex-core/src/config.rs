//! # Checkout Configuration
//!
//! Every numeric knob (discounts, fees, shipping rates, card limit) lives here
//! rather than in the strategies. Loaded from `config/checkout.toml`.
//!
//! ```toml
//! currency = "brl"
//!
//! [payment]
//! instant_transfer_discount_percent = 5.0
//! card_limit = 1000.0
//!
//! [shipping.express]
//! flat = 15.0
//! percent = 10.0
//!
//! [[pricing.adjustments]]
//! kind = "bulk_discount"
//! subtotal_above = 500.0
//! percent = 10.0
//! ```

use crate::error::{CheckoutError, FlexResult};
use crate::money::{Currency, Price};
use crate::payment::{CardPayment, InstantTransfer, ManaTransfer, PaymentMethod};
use crate::pricing::{build_chain, Adjustment, BoxedPriceCalculator, DiscountTrigger};
use crate::shipping::{ExpressShipping, ShippingMethod, ShippingRate, StandardShipping, TeleportShipping};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Payment knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default = "default_instant_discount")]
    pub instant_transfer_discount_percent: f64,
    #[serde(default = "default_card_limit")]
    pub card_limit: f64,
}

fn default_instant_discount() -> f64 {
    5.0
}

fn default_card_limit() -> f64 {
    1000.0
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            instant_transfer_discount_percent: default_instant_discount(),
            card_limit: default_card_limit(),
        }
    }
}

/// Shipping rates per method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingConfig {
    #[serde(default = "ShippingRate::standard_default")]
    pub standard: ShippingRate,
    #[serde(default = "ShippingRate::express_default")]
    pub express: ShippingRate,
    #[serde(default = "ShippingRate::teleport_default")]
    pub teleport: ShippingRate,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            standard: ShippingRate::standard_default(),
            express: ShippingRate::express_default(),
            teleport: ShippingRate::teleport_default(),
        }
    }
}

/// Price decoration, innermost first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            adjustments: vec![
                Adjustment::BulkDiscount {
                    trigger: DiscountTrigger::SubtotalAbove(500.0),
                    percent: 10.0,
                },
                Adjustment::GiftWrap { fee: 5.0 },
            ],
        }
    }
}

/// Complete checkout configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub shipping: ShippingConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl CheckoutConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(toml_str: &str) -> FlexResult<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| CheckoutError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> FlexResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CheckoutError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Reject values no strategy can work with
    pub fn validate(&self) -> FlexResult<()> {
        let discount = self.payment.instant_transfer_discount_percent;
        if !(0.0..=100.0).contains(&discount) {
            return Err(CheckoutError::Configuration(format!(
                "instant_transfer_discount_percent must be within 0..=100, got {}",
                discount
            )));
        }
        if !self.payment.card_limit.is_finite() || self.payment.card_limit < 0.0 {
            return Err(CheckoutError::Configuration(
                "card_limit must be a non-negative number".to_string(),
            ));
        }
        for (name, rate) in [
            ("standard", &self.shipping.standard),
            ("express", &self.shipping.express),
            ("teleport", &self.shipping.teleport),
        ] {
            let valid = |v: f64| v.is_finite() && v >= 0.0;
            if !valid(rate.flat) || !valid(rate.percent) {
                return Err(CheckoutError::Configuration(format!(
                    "{} shipping rate must be a non-negative number",
                    name
                )));
            }
        }
        self.pricing
            .adjustments
            .iter()
            .try_for_each(Adjustment::validate)
    }

    /// Build the configured calculator chain
    pub fn build_calculator(&self) -> FlexResult<BoxedPriceCalculator> {
        build_chain(&self.pricing.adjustments, self.currency)
    }

    pub fn instant_transfer(&self) -> PaymentMethod {
        PaymentMethod::InstantTransfer(InstantTransfer::with_discount(
            self.payment.instant_transfer_discount_percent,
        ))
    }

    pub fn card(&self, card_number: impl Into<String>) -> PaymentMethod {
        PaymentMethod::Card(CardPayment::new(
            card_number,
            Price::new(self.payment.card_limit, self.currency),
        ))
    }

    pub fn mana(&self, wallet: impl Into<String>) -> PaymentMethod {
        PaymentMethod::Mana(ManaTransfer::new(wallet))
    }

    pub fn standard_shipping(&self, destination: impl Into<String>) -> ShippingMethod {
        ShippingMethod::Standard(StandardShipping::new(destination).with_rate(self.shipping.standard))
    }

    pub fn express_shipping(&self, destination: impl Into<String>) -> ShippingMethod {
        ShippingMethod::Express(ExpressShipping::new(destination).with_rate(self.shipping.express))
    }

    pub fn teleport_shipping(&self) -> ShippingMethod {
        ShippingMethod::Teleport(TeleportShipping::new().with_rate(self.shipping.teleport))
    }
}
