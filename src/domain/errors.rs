use std::sync::PoisonError;

use thiserror::Error;

use crate::domain::OrderId;
use crate::domain::PaymentId;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Transaction {txn_id} not found for order {order_id} and payment {payment_id}")]
    TransactionNotFound {
        txn_id: String,
        order_id: OrderId,
        payment_id: PaymentId,
    },
    #[error("Order link not found for order {0}")]
    OrderLinkNotFound(OrderId),
    #[error("Invalid state - {0}")]
    InvalidState(String),
    #[error("Invalid argument - {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PaymentError {
    /// Whether this error means the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PaymentError::TransactionNotFound { .. } | PaymentError::OrderLinkNotFound(_)
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Error synchronizing storage access - {0}")]
    Poisoned(String),
    #[error("Duplicate entry {key} for unique key of table {table}")]
    UniqueConstraint { table: &'static str, key: String },
    #[error("Row of table {table} has no value for primary key {primary_key}")]
    MissingPrimaryKey {
        table: &'static str,
        primary_key: &'static str,
    },
    #[error("Row with {primary_key} {id} not found in table {table}")]
    RowNotFound {
        table: &'static str,
        primary_key: &'static str,
        id: u64,
    },
}

impl<T> From<PoisonError<T>> for StorageError {
    fn from(err: PoisonError<T>) -> Self {
        StorageError::Poisoned(err.to_string())
    }
}
