//! This module contains the payment management contract used by checkout and order processing
//! code, and its implementation on top of the storage collaborators.
//!
//! # Example
//!
//! ```no_run
//! use amazon_payment_management::*;
//!
//! let store = MemoryStore::new();
//! let management = AmazonPaymentManagement::with_store(&store);
//!
//! let mut order = Order::new("000000001");
//! let details = AmazonAuthorizationDetails::new("P01-0000000-0000000-A000001")
//!     .with_capture("P01-0000000-0000000-C000001");
//! management.record_pending_authorization(&details, &mut order);
//! management.link_order(&mut order, "P01-0000000-0000000");
//!
//! // The pending authorization and the link are written by the order save.
//! OrderRepository::save(&store, &mut order).unwrap();
//! ```
mod order_link;
mod recorder;
mod resolver;

pub use order_link::OrderLinkRecorder;
pub use recorder::PendingEventRecorder;
pub use resolver::ResolvedTransaction;
pub use resolver::TransactionResolver;

use crate::domain::AmazonAuthorizationDetails;
use crate::domain::AmazonCaptureDetails;
use crate::domain::AmazonRefundDetails;
use crate::domain::Order;
use crate::domain::OrderId;
use crate::domain::OrderLink;
use crate::domain::Payment;
use crate::domain::PaymentError;
use crate::domain::PaymentId;
use crate::store::MemoryStore;
use crate::store::OrderLinkRepository;
use crate::store::PendingEventStore;
use crate::store::TransactionRepository;

/// Payment management operations for Amazon Pay orders.
pub trait PaymentManagement {
    /// Records a capture that the gateway has not confirmed yet.
    fn record_pending_capture(
        &self,
        details: &AmazonCaptureDetails,
        payment_id: PaymentId,
        order_id: OrderId,
    ) -> Result<(), PaymentError>;

    /// Records an authorization, and its capture if any, as part of `order`.
    ///
    /// The record is persisted by the next save of `order`.
    fn record_pending_authorization(
        &self,
        details: &AmazonAuthorizationDetails,
        order: &mut Order,
    );

    /// Records a refund that the gateway has not confirmed yet.
    ///
    /// # Errors
    ///
    /// `InvalidState` if `payment` is not associated with an order.
    fn record_pending_refund(
        &self,
        details: &AmazonRefundDetails,
        payment: &Payment,
    ) -> Result<(), PaymentError>;

    /// Finds the gateway transaction `transaction_id` of `payment` and `order`.
    ///
    /// # Returns
    ///
    /// The transaction with `payment` and `order` attached, or `TransactionNotFound`.
    fn find_transaction<'a>(
        &self,
        transaction_id: &str,
        payment: &'a Payment,
        order: &'a Order,
    ) -> Result<ResolvedTransaction<'a>, PaymentError>;

    /// Marks the gateway transaction `transaction_id` of `payment` and `order` as closed.
    fn close_transaction(
        &self,
        transaction_id: &str,
        payment: &Payment,
        order: &Order,
    ) -> Result<(), PaymentError>;

    /// Links `order` to its Amazon order reference. The link is persisted by the next save of
    /// `order`.
    fn link_order(&self, order: &mut Order, amazon_order_reference_id: &str);

    fn find_order_link(&self, order_id: OrderId) -> Result<OrderLink, PaymentError>;
}

/// [`PaymentManagement`] implementation that delegates every call to its recorders and resolver.
#[derive(Debug, Clone)]
pub struct AmazonPaymentManagement<S, R, L> {
    recorder: PendingEventRecorder<S>,
    resolver: TransactionResolver<R>,
    order_links: OrderLinkRecorder<L>,
}

impl<S, R, L> AmazonPaymentManagement<S, R, L>
where
    S: PendingEventStore,
    R: TransactionRepository,
    L: OrderLinkRepository,
{
    /// Creates a new `AmazonPaymentManagement`.
    ///
    /// # Arguments
    ///
    /// * `pending_events` - Store for pending captures and refunds.
    /// * `transactions` - Repository of gateway transactions.
    /// * `order_links` - Repository of order links.
    pub fn new(pending_events: S, transactions: R, order_links: L) -> Self {
        AmazonPaymentManagement {
            recorder: PendingEventRecorder::new(pending_events),
            resolver: TransactionResolver::new(transactions),
            order_links: OrderLinkRecorder::new(order_links),
        }
    }
}

impl AmazonPaymentManagement<MemoryStore, MemoryStore, MemoryStore> {
    /// Creates an `AmazonPaymentManagement` whose collaborators all share `store`.
    pub fn with_store(store: &MemoryStore) -> Self {
        Self::new(store.clone(), store.clone(), store.clone())
    }
}

impl<S, R, L> PaymentManagement for AmazonPaymentManagement<S, R, L>
where
    S: PendingEventStore,
    R: TransactionRepository,
    L: OrderLinkRepository,
{
    fn record_pending_capture(
        &self,
        details: &AmazonCaptureDetails,
        payment_id: PaymentId,
        order_id: OrderId,
    ) -> Result<(), PaymentError> {
        self.recorder
            .record_pending_capture(details, payment_id, order_id)
    }

    fn record_pending_authorization(
        &self,
        details: &AmazonAuthorizationDetails,
        order: &mut Order,
    ) {
        self.recorder.record_pending_authorization(details, order)
    }

    fn record_pending_refund(
        &self,
        details: &AmazonRefundDetails,
        payment: &Payment,
    ) -> Result<(), PaymentError> {
        self.recorder.record_pending_refund(details, payment)
    }

    fn find_transaction<'a>(
        &self,
        transaction_id: &str,
        payment: &'a Payment,
        order: &'a Order,
    ) -> Result<ResolvedTransaction<'a>, PaymentError> {
        self.resolver
            .find_transaction(transaction_id, payment, order)
    }

    fn close_transaction(
        &self,
        transaction_id: &str,
        payment: &Payment,
        order: &Order,
    ) -> Result<(), PaymentError> {
        self.resolver
            .close_transaction(transaction_id, payment, order)
    }

    fn link_order(&self, order: &mut Order, amazon_order_reference_id: &str) {
        self.order_links.link_order(order, amazon_order_reference_id)
    }

    fn find_order_link(&self, order_id: OrderId) -> Result<OrderLink, PaymentError> {
        self.order_links.find_order_link(order_id)
    }
}
