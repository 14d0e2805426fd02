use log::debug;

use crate::domain::AmazonAuthorizationDetails;
use crate::domain::AmazonCaptureDetails;
use crate::domain::AmazonRefundDetails;
use crate::domain::Order;
use crate::domain::OrderId;
use crate::domain::Payment;
use crate::domain::PaymentError;
use crate::domain::PaymentId;
use crate::domain::PendingAuthorization;
use crate::domain::PendingCapture;
use crate::domain::PendingRefund;
use crate::store::PendingEventStore;

/// Turns gateway responses into pending event records.
#[derive(Debug, Clone)]
pub struct PendingEventRecorder<S> {
    store: S,
}

impl<S> PendingEventRecorder<S>
where
    S: PendingEventStore,
{
    pub fn new(store: S) -> Self {
        PendingEventRecorder { store }
    }

    /// Writes a pending capture for the capture transaction of `details` right away.
    pub fn record_pending_capture(
        &self,
        details: &AmazonCaptureDetails,
        payment_id: PaymentId,
        order_id: OrderId,
    ) -> Result<(), PaymentError> {
        let capture = PendingCapture::builder()
            .capture_id(details.transaction_id())
            .payment_id(payment_id)
            .order_id(order_id)
            .build();
        let id = self.store.save_capture(&capture)?;
        debug!(
            "Pending capture {} recorded for payment {} as {}",
            details.transaction_id(),
            payment_id,
            id
        );
        Ok(())
    }

    /// Attaches a pending authorization to `order`. Nothing is written until the order is saved.
    pub fn record_pending_authorization(
        &self,
        details: &AmazonAuthorizationDetails,
        order: &mut Order,
    ) {
        let mut authorization = PendingAuthorization::new(details.authorize_transaction_id());
        if let Some(capture_id) = details.capture_transaction_id() {
            authorization = authorization.with_capture(capture_id);
        }
        debug!(
            "Pending authorization {} attached to order {}",
            details.authorize_transaction_id(),
            order.increment_id()
        );
        order.add_related_object(authorization);
    }

    /// Writes a pending refund for `payment` and the order it belongs to.
    ///
    /// Fails with `InvalidState` without writing when the payment has no order.
    pub fn record_pending_refund(
        &self,
        details: &AmazonRefundDetails,
        payment: &Payment,
    ) -> Result<(), PaymentError> {
        let order_id = payment.order_id().ok_or_else(|| {
            PaymentError::InvalidState(format!("payment {} has no order", payment.id()))
        })?;
        let refund = PendingRefund::builder()
            .refund_id(details.refund_id())
            .payment_id(payment.id())
            .order_id(order_id)
            .build();
        let id = self.store.save_refund(&refund)?;
        debug!(
            "Pending refund {} recorded for payment {} as {}",
            details.refund_id(),
            payment.id(),
            id
        );
        Ok(())
    }
}
