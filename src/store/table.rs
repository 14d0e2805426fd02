//! Table descriptors for every persisted entity.
use crate::domain::Order;
use crate::domain::OrderLink;
use crate::domain::PendingAuthorization;
use crate::domain::PendingCapture;
use crate::domain::PendingRefund;
use crate::domain::Transaction;

/// Name and primary key column of a backing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub primary_key: &'static str,
}

pub const PENDING_CAPTURE_TABLE: Table = Table {
    name: "amazon_pending_capture",
    primary_key: "entity_id",
};

pub const PENDING_AUTHORIZATION_TABLE: Table = Table {
    name: "amazon_pending_authorization",
    primary_key: "entity_id",
};

pub const PENDING_REFUND_TABLE: Table = Table {
    name: "amazon_pending_refund",
    primary_key: "entity_id",
};

pub const ORDER_LINK_TABLE: Table = Table {
    name: "amazon_sales_order",
    primary_key: "entity_id",
};

pub const ORDER_TABLE: Table = Table {
    name: "sales_order",
    primary_key: "entity_id",
};

pub const TRANSACTION_TABLE: Table = Table {
    name: "sales_payment_transaction",
    primary_key: "transaction_id",
};

/// A value stored as a row of [`Entity::TABLE`].
pub trait Entity: Clone {
    const TABLE: Table;

    /// Value of the table's unique key for this row, when the table has one.
    fn unique_key(&self) -> Option<String> {
        None
    }
}

impl Entity for PendingCapture {
    const TABLE: Table = PENDING_CAPTURE_TABLE;
}

impl Entity for PendingAuthorization {
    const TABLE: Table = PENDING_AUTHORIZATION_TABLE;
}

impl Entity for PendingRefund {
    const TABLE: Table = PENDING_REFUND_TABLE;
}

impl Entity for OrderLink {
    const TABLE: Table = ORDER_LINK_TABLE;

    fn unique_key(&self) -> Option<String> {
        self.order_id().map(|order_id| order_id.to_string())
    }
}

impl Entity for Order {
    const TABLE: Table = ORDER_TABLE;
}

impl Entity for Transaction {
    const TABLE: Table = TRANSACTION_TABLE;
}
