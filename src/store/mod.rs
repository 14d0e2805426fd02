//! Storage collaborators used by the payment management services and their memory
//! implementation.
mod criteria;
mod memory;
mod table;

pub use criteria::Filter;
pub use criteria::FilterValue;
pub use criteria::SearchCriteria;
pub use criteria::SearchCriteriaBuilder;
pub use criteria::TransactionField;
pub use criteria::TransactionList;
pub use memory::MemoryStore;
pub use table::*;

#[cfg(test)]
use mockall::automock;

use crate::domain::EntityId;
use crate::domain::Order;
use crate::domain::OrderId;
use crate::domain::OrderLink;
use crate::domain::PendingCapture;
use crate::domain::PendingRefund;
use crate::domain::StorageError;
use crate::domain::Transaction;

/// Writes pending capture and refund rows. Every call is an immediate, independent write.
#[cfg_attr(test, automock)]
pub trait PendingEventStore {
    fn save_capture(&self, capture: &PendingCapture) -> Result<EntityId, StorageError>;
    fn save_refund(&self, refund: &PendingRefund) -> Result<EntityId, StorageError>;
}

/// Access to the gateway transactions owned by the payment layer.
#[cfg_attr(test, automock)]
pub trait TransactionRepository {
    fn get_list(&self, criteria: &SearchCriteria) -> Result<TransactionList, StorageError>;
    /// Replaces the stored row with the same primary key.
    fn save(&self, transaction: &Transaction) -> Result<(), StorageError>;
}

/// Unit of work for the order aggregate.
#[cfg_attr(test, automock)]
pub trait OrderRepository {
    /// Writes the order row and every related object attached to it in one atomic step. On
    /// success the order is marked as saved, on failure it is left untouched.
    fn save(&self, order: &mut Order) -> Result<OrderId, StorageError>;
}

#[cfg_attr(test, automock)]
pub trait OrderLinkRepository {
    fn get_by_order_id(&self, order_id: OrderId) -> Result<Option<OrderLink>, StorageError>;
}
