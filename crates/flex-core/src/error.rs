//! # Checkout Error Types
//!
//! Typed error handling for the FlexOrder checkout engine.
//! All fallible operations return `Result<T, CheckoutError>`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// A payment variant rejected its own parameters (empty card, blank wallet, ...)
    #[error("Invalid payment parameters [{method}]: {reason}")]
    InvalidPaymentParameters { method: String, reason: String },

    /// Shipping variant needs a destination it was not given
    #[error("Unsupported destination for {method} shipping")]
    UnsupportedDestination { method: String },

    /// Payment was declined
    #[error("Payment declined: {reason}")]
    PaymentDeclined { reason: String },

    /// Not enough stock to fulfil a line item
    #[error("Inventory unavailable for {sku}: requested {requested}, available {available}")]
    InventoryUnavailable {
        sku: String,
        requested: u32,
        available: u32,
    },

    /// Malformed order data
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// Two amounts in different currencies were combined
    #[error("Currency mismatch: expected {expected}, got {found}")]
    CurrencyMismatch { expected: String, found: String },

    /// Configuration errors (bad percentages, unreadable file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Serializable classification of a checkout failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidPaymentParameters,
    UnsupportedDestination,
    PaymentDeclined,
    InventoryUnavailable,
    InvalidOrder,
    CurrencyMismatch,
    Configuration,
    Internal,
}

impl CheckoutError {
    /// Returns true if the caller may reasonably retry the same checkout later.
    ///
    /// Declines are final: the facade never retries and neither should callers
    /// without changing the payment method.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::InventoryUnavailable { .. })
    }

    /// Classification used in `CheckoutResult`
    pub fn kind(&self) -> FailureKind {
        match self {
            CheckoutError::InvalidPaymentParameters { .. } => FailureKind::InvalidPaymentParameters,
            CheckoutError::UnsupportedDestination { .. } => FailureKind::UnsupportedDestination,
            CheckoutError::PaymentDeclined { .. } => FailureKind::PaymentDeclined,
            CheckoutError::InventoryUnavailable { .. } => FailureKind::InventoryUnavailable,
            CheckoutError::InvalidOrder(_) => FailureKind::InvalidOrder,
            CheckoutError::CurrencyMismatch { .. } => FailureKind::CurrencyMismatch,
            CheckoutError::Configuration(_) => FailureKind::Configuration,
            CheckoutError::Internal(_) => FailureKind::Internal,
        }
    }

    pub(crate) fn invalid_payment(method: &str, reason: impl Into<String>) -> Self {
        CheckoutError::InvalidPaymentParameters {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for checkout operations
pub type FlexResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(CheckoutError::InventoryUnavailable {
            sku: "wand".into(),
            requested: 2,
            available: 1
        }
        .is_retryable());
        assert!(!CheckoutError::PaymentDeclined {
            reason: "limit".into()
        }
        .is_retryable());
        assert!(!CheckoutError::UnsupportedDestination {
            method: "express".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_failure_kinds() {
        assert_eq!(
            CheckoutError::invalid_payment("card", "empty").kind(),
            FailureKind::InvalidPaymentParameters
        );
        assert_eq!(
            CheckoutError::InvalidOrder("test".into()).kind(),
            FailureKind::InvalidOrder
        );
        assert_eq!(
            serde_json::to_string(&FailureKind::PaymentDeclined).unwrap(),
            "\"payment_declined\""
        );
    }

    #[test]
    fn test_error_messages() {
        let err = CheckoutError::invalid_payment("card", "card number is empty");
        assert_eq!(
            err.to_string(),
            "Invalid payment parameters [card]: card number is empty"
        );
    }
}
