//! # Showcase Checkouts
//!
//! Three checkouts that exercise every payment and shipping variant through
//! the same facade and the same configured calculator chain.

use flex_core::{
    BoxedPaymentStrategy, CheckoutConfig, CheckoutFacade, CheckoutResult, FlexResult, Inventory,
    InvoiceEmitter, LineItem, Order, Price, ShippingMethod,
};
use std::sync::Arc;
use tracing::info;

/// One showcase checkout
pub struct Scenario {
    pub title: &'static str,
    pub order: Order,
    pub payment: BoxedPaymentStrategy,
    pub shipping: ShippingMethod,
}

/// Build the showcase checkouts for `config`
pub fn showcase(config: &CheckoutConfig) -> FlexResult<Vec<Scenario>> {
    let currency = config.currency;
    let price = |amount: f64| Price::new(amount, currency);

    let small = Order::new(currency)
        .with_item(LineItem::new("invisibility-cloak", "Invisibility Cloak", price(150.0), 1))?
        .with_item(LineItem::new("flight-potion", "Flight Potion", price(80.0), 1))?;

    let large = Order::new(currency)
        .with_item(LineItem::new("magic-crystal", "Magic Crystal", price(600.0), 1))?
        .with_gift_wrap(true);

    let gift = Order::new(currency)
        .with_item(LineItem::new("elven-wand", "Elven Wand", price(300.0), 1))?
        .with_item(LineItem::new("ancient-scroll", "Ancient Scroll", price(120.0), 1))?
        .with_gift_wrap(true);

    Ok(vec![
        Scenario {
            title: "Instant transfer + standard shipping",
            order: small,
            payment: Arc::new(config.instant_transfer()),
            shipping: config.standard_shipping("Hogsmeade"),
        },
        Scenario {
            title: "Card + express shipping + gift wrap",
            order: large,
            payment: Arc::new(config.card("4242424242424242")),
            shipping: config.express_shipping("Rivendell"),
        },
        Scenario {
            title: "Mana + teleport",
            order: gift,
            payment: Arc::new(config.mana("archmage-vault")),
            shipping: config.teleport_shipping(),
        },
    ])
}

/// Run every scenario through `facade`, returning the results in order
pub fn run_all<I: Inventory, V: InvoiceEmitter>(
    config: &CheckoutConfig,
    facade: &CheckoutFacade<I, V>,
) -> FlexResult<Vec<(&'static str, CheckoutResult)>> {
    let calculator = config.build_calculator()?;

    let results = showcase(config)?
        .into_iter()
        .map(|scenario| {
            info!("=== {} ===", scenario.title);
            let result = facade.checkout(
                &scenario.order,
                scenario.payment.as_ref(),
                &scenario.shipping,
                &calculator,
            );
            (scenario.title, result)
        })
        .collect();

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flex_core::{Currency, InvoiceLedger, UnlimitedInventory};

    fn brl(amount: f64) -> Price {
        Price::new(amount, Currency::BRL)
    }

    #[test]
    fn test_showcase_with_defaults() {
        let config = CheckoutConfig::default();
        let facade = CheckoutFacade::with_collaborators(UnlimitedInventory::new(), InvoiceLedger::new());

        let results = run_all(&config, &facade).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|(_, r)| r.is_success()));

        // 230.00 - 5% instant transfer discount, standard 5%
        let (_, small) = &results[0];
        assert_eq!(small.price, brl(218.5));
        assert_eq!(small.amount_charged, brl(229.43));

        // 600.00 - 10% + 5.00 gift wrap, express 10% + 15.00
        let (_, large) = &results[1];
        assert_eq!(large.price, brl(545.0));
        assert_eq!(large.amount_charged, brl(614.5));

        // 420.00 + 5.00 gift wrap, free teleport
        let (_, gift) = &results[2];
        assert_eq!(gift.price, brl(425.0));
        assert_eq!(gift.amount_charged, brl(425.0));

        assert_eq!(facade.invoices().len().unwrap(), 3);
        assert_eq!(facade.inventory().sold("magic-crystal").unwrap(), 1);
    }

    #[test]
    fn test_low_card_limit_declines_large_order() {
        let config = CheckoutConfig::from_toml("[payment]\ncard_limit = 100.0").unwrap();
        let facade = CheckoutFacade::with_collaborators(UnlimitedInventory::new(), InvoiceLedger::new());

        let results = run_all(&config, &facade).unwrap();
        let (_, large) = &results[1];
        assert!(!large.is_success());
        assert_eq!(large.failure_kind(), Some(flex_core::FailureKind::PaymentDeclined));
        assert_eq!(facade.invoices().len().unwrap(), 2);
        assert_eq!(facade.inventory().sold("magic-crystal").unwrap(), 0);
    }
}
