use log::debug;

use crate::domain::Order;
use crate::domain::OrderId;
use crate::domain::OrderLink;
use crate::domain::PaymentError;
use crate::store::OrderLinkRepository;

/// Keeps track of the Amazon order reference each order was placed with.
#[derive(Debug, Clone)]
pub struct OrderLinkRecorder<L> {
    repository: L,
}

impl<L> OrderLinkRecorder<L>
where
    L: OrderLinkRepository,
{
    pub fn new(repository: L) -> Self {
        OrderLinkRecorder { repository }
    }

    /// Attaches the link to `order`. It is written together with the order.
    pub fn link_order(&self, order: &mut Order, amazon_order_reference_id: &str) {
        debug!(
            "Order {} linked to Amazon order reference {}",
            order.increment_id(),
            amazon_order_reference_id
        );
        order.add_related_object(OrderLink::new(amazon_order_reference_id));
    }

    pub fn find_order_link(&self, order_id: OrderId) -> Result<OrderLink, PaymentError> {
        self.repository
            .get_by_order_id(order_id)?
            .ok_or(PaymentError::OrderLinkNotFound(order_id))
    }
}
