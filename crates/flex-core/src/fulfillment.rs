//! # Fulfillment Collaborators
//!
//! The side effects that follow an approved payment: stock is decremented and
//! an invoice is emitted. Both are traits so the facade can be driven by real
//! services or by the in-memory versions below.

use crate::checkout::CheckoutResult;
use crate::error::{CheckoutError, FlexResult};
use crate::money::Price;
use crate::order::Order;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Stock keeping collaborator
pub trait Inventory: Send + Sync {
    /// Take `quantity` units of `sku` out of stock
    fn decrement(&self, sku: &str, quantity: u32) -> FlexResult<()>;

    /// Put back units taken by an earlier `decrement`. Used to undo a
    /// partially fulfilled order.
    fn restore(&self, sku: &str, quantity: u32) -> FlexResult<()> {
        debug!(sku, quantity, "restore is a no-op for this inventory");
        Ok(())
    }
}

/// Invoice collaborator
pub trait InvoiceEmitter: Send + Sync {
    /// Emit an invoice for a successful checkout, returning its id
    fn emit(&self, order: &Order, result: &CheckoutResult) -> FlexResult<String>;
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> FlexResult<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| CheckoutError::Internal(format!("{} lock poisoned", what)))
}

/// Inventory that only records what was sold
#[derive(Debug, Default)]
pub struct UnlimitedInventory {
    sold: Mutex<HashMap<String, u32>>,
}

impl UnlimitedInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units sold so far for `sku`
    pub fn sold(&self, sku: &str) -> FlexResult<u32> {
        Ok(lock(&self.sold, "inventory")?.get(sku).copied().unwrap_or(0))
    }
}

impl Inventory for UnlimitedInventory {
    fn decrement(&self, sku: &str, quantity: u32) -> FlexResult<()> {
        *lock(&self.sold, "inventory")?.entry(sku.to_string()).or_insert(0) += quantity;
        info!(sku, quantity, "Order registered in the stock system");
        Ok(())
    }

    fn restore(&self, sku: &str, quantity: u32) -> FlexResult<()> {
        let mut sold = lock(&self.sold, "inventory")?;
        if let Some(count) = sold.get_mut(sku) {
            *count = count.saturating_sub(quantity);
        }
        Ok(())
    }
}

/// Inventory with finite stock per SKU
#[derive(Debug, Default)]
pub struct InMemoryInventory {
    stock: Mutex<HashMap<String, u32>>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set stock for a SKU
    pub fn with_stock(mut self, sku: impl Into<String>, quantity: u32) -> Self {
        if let Ok(stock) = self.stock.get_mut() {
            stock.insert(sku.into(), quantity);
        }
        self
    }

    /// Add stock for a SKU
    pub fn stock(&self, sku: impl Into<String>, quantity: u32) -> FlexResult<()> {
        *lock(&self.stock, "inventory")?.entry(sku.into()).or_insert(0) += quantity;
        Ok(())
    }

    /// Units available for `sku`
    pub fn available(&self, sku: &str) -> FlexResult<u32> {
        Ok(lock(&self.stock, "inventory")?.get(sku).copied().unwrap_or(0))
    }
}

impl Inventory for InMemoryInventory {
    fn decrement(&self, sku: &str, quantity: u32) -> FlexResult<()> {
        let mut stock = lock(&self.stock, "inventory")?;
        let available = stock.get(sku).copied().unwrap_or(0);
        if available < quantity {
            warn!(sku, requested = quantity, available, "Insufficient stock");
            return Err(CheckoutError::InventoryUnavailable {
                sku: sku.to_string(),
                requested: quantity,
                available,
            });
        }
        stock.insert(sku.to_string(), available - quantity);
        debug!(sku, quantity, remaining = available - quantity, "Stock decremented");
        Ok(())
    }

    fn restore(&self, sku: &str, quantity: u32) -> FlexResult<()> {
        *lock(&self.stock, "inventory")?.entry(sku.to_string()).or_insert(0) += quantity;
        Ok(())
    }
}

/// An emitted invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub order_id: String,
    pub confirmation_id: Option<String>,
    pub description: String,
    /// Goods plus shipping
    pub total: Price,
    pub issued_at: DateTime<Utc>,
}

impl Invoice {
    fn for_checkout(order: &Order, result: &CheckoutResult) -> Self {
        Self {
            invoice_id: format!("INV-{}", Uuid::new_v4()),
            order_id: order.id.clone(),
            confirmation_id: result.confirmation_id.clone(),
            description: result.description.clone(),
            total: result.amount_charged,
            issued_at: Utc::now(),
        }
    }
}

/// Emits invoices to the log only
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInvoiceEmitter;

impl InvoiceEmitter for LoggingInvoiceEmitter {
    fn emit(&self, order: &Order, result: &CheckoutResult) -> FlexResult<String> {
        let invoice = Invoice::for_checkout(order, result);
        info!(
            invoice_id = %invoice.invoice_id,
            order_id = %invoice.order_id,
            "Emitting invoice, total {}",
            invoice.total
        );
        Ok(invoice.invoice_id)
    }
}

/// Keeps every emitted invoice in memory
#[derive(Debug, Default)]
pub struct InvoiceLedger {
    invoices: Mutex<Vec<Invoice>>,
}

impl InvoiceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all invoices emitted so far
    pub fn invoices(&self) -> FlexResult<Vec<Invoice>> {
        Ok(lock(&self.invoices, "invoice ledger")?.clone())
    }

    pub fn len(&self) -> FlexResult<usize> {
        Ok(lock(&self.invoices, "invoice ledger")?.len())
    }

    pub fn is_empty(&self) -> FlexResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl InvoiceEmitter for InvoiceLedger {
    fn emit(&self, order: &Order, result: &CheckoutResult) -> FlexResult<String> {
        let invoice = Invoice::for_checkout(order, result);
        let id = invoice.invoice_id.clone();
        info!(invoice_id = %id, order_id = %order.id, "Invoice recorded, total {}", invoice.total);
        lock(&self.invoices, "invoice ledger")?.push(invoice);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_in_memory_inventory() {
        let inventory = InMemoryInventory::new().with_stock("wand", 3);

        inventory.decrement("wand", 2).unwrap();
        assert_eq!(inventory.available("wand").unwrap(), 1);

        let err = inventory.decrement("wand", 2).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::InventoryUnavailable {
                sku: "wand".into(),
                requested: 2,
                available: 1
            }
        );
        assert_eq!(inventory.available("wand").unwrap(), 1);

        inventory.restore("wand", 2).unwrap();
        assert_eq!(inventory.available("wand").unwrap(), 3);
    }

    #[test]
    fn test_unknown_sku_has_no_stock() {
        let inventory = InMemoryInventory::new();
        assert!(inventory.decrement("ghost", 1).is_err());
        inventory.stock("ghost", 1).unwrap();
        assert!(inventory.decrement("ghost", 1).is_ok());
    }

    #[test]
    fn test_unlimited_inventory_records_sales() {
        let inventory = UnlimitedInventory::new();
        inventory.decrement("scroll", 5).unwrap();
        inventory.decrement("scroll", 1).unwrap();
        assert_eq!(inventory.sold("scroll").unwrap(), 6);
        inventory.restore("scroll", 1).unwrap();
        assert_eq!(inventory.sold("scroll").unwrap(), 5);
    }

    #[test]
    fn test_invoice_ledger() {
        let ledger = InvoiceLedger::new();
        let order = Order::new(Currency::BRL);
        let mut result = CheckoutResult::pending(&order);
        result.amount_charged = Price::new(42.0, Currency::BRL);

        let id = ledger.emit(&order, &result).unwrap();
        assert!(id.starts_with("INV-"));
        assert_eq!(ledger.len().unwrap(), 1);

        let invoices = ledger.invoices().unwrap();
        assert_eq!(invoices[0].order_id, order.id);
        assert_eq!(invoices[0].total, Price::new(42.0, Currency::BRL));
    }

    #[test]
    fn test_logging_emitter_ids_are_unique() {
        let order = Order::new(Currency::BRL);
        let result = CheckoutResult::pending(&order);
        let a = LoggingInvoiceEmitter.emit(&order, &result).unwrap();
        let b = LoggingInvoiceEmitter.emit(&order, &result).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_poisoned_ledger_reports_error() {
        let ledger = std::sync::Arc::new(InvoiceLedger::new());
        let poisoner = std::sync::Arc::clone(&ledger);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.invoices.lock().unwrap();
            panic!("poison the ledger");
        })
        .join();

        assert!(matches!(ledger.len(), Err(CheckoutError::Internal(_))));
        assert!(ledger.is_empty().is_err());
        assert!(ledger.invoices().is_err());
    }
}
