use typed_builder::TypedBuilder;

pub type EntityId = u64;
pub type OrderId = u64;
pub type PaymentId = u64;

/// A capture requested against the gateway that is not confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct PendingCapture {
    #[builder(setter(into))]
    capture_id: String,
    payment_id: PaymentId,
    order_id: OrderId,
}

impl PendingCapture {
    pub fn capture_id(&self) -> &str {
        &self.capture_id
    }

    pub fn payment_id(&self) -> PaymentId {
        self.payment_id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }
}

/// An authorization request, optionally bundled with an immediate capture.
///
/// It never gets saved on its own. It is attached to an [`Order`] and the store stamps the
/// order id on it when the order is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAuthorization {
    authorization_id: String,
    capture_id: Option<String>,
    capture: bool,
    order_id: Option<OrderId>,
}

impl PendingAuthorization {
    pub fn new(authorization_id: impl Into<String>) -> Self {
        PendingAuthorization {
            authorization_id: authorization_id.into(),
            capture_id: None,
            capture: false,
            order_id: None,
        }
    }

    /// Marks this authorization as carrying an immediate capture. The capture id and the capture
    /// flag only ever change together.
    pub fn with_capture(mut self, capture_id: impl Into<String>) -> Self {
        self.capture_id = Some(capture_id.into());
        self.capture = true;
        self
    }

    pub fn authorization_id(&self) -> &str {
        &self.authorization_id
    }

    pub fn capture_id(&self) -> Option<&str> {
        self.capture_id.as_deref()
    }

    pub fn is_capture(&self) -> bool {
        self.capture
    }

    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }

    pub fn set_order_id(&mut self, order_id: OrderId) {
        self.order_id = Some(order_id);
    }
}

/// A refund requested against the gateway that is not confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct PendingRefund {
    #[builder(setter(into))]
    refund_id: String,
    payment_id: PaymentId,
    order_id: OrderId,
}

impl PendingRefund {
    pub fn refund_id(&self) -> &str {
        &self.refund_id
    }

    pub fn payment_id(&self) -> PaymentId {
        self.payment_id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }
}

/// Link between an order and the Amazon order reference it was placed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLink {
    amazon_order_reference_id: String,
    order_id: Option<OrderId>,
}

impl OrderLink {
    pub fn new(amazon_order_reference_id: impl Into<String>) -> Self {
        OrderLink {
            amazon_order_reference_id: amazon_order_reference_id.into(),
            order_id: None,
        }
    }

    pub fn amazon_order_reference_id(&self) -> &str {
        &self.amazon_order_reference_id
    }

    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }

    pub fn set_order_id(&mut self, order_id: OrderId) {
        self.order_id = Some(order_id);
    }
}

/// Gateway transaction record. Created by the payment layer of the host platform, this crate only
/// reads it and flips its closed flag.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct Transaction {
    #[builder(default, setter(strip_option))]
    entity_id: Option<EntityId>,
    #[builder(setter(into))]
    txn_id: String,
    order_id: OrderId,
    payment_id: PaymentId,
    #[builder(default)]
    is_closed: bool,
}

impl Transaction {
    pub fn entity_id(&self) -> Option<EntityId> {
        self.entity_id
    }

    pub fn with_entity_id(mut self, entity_id: EntityId) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub fn txn_id(&self) -> &str {
        &self.txn_id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn payment_id(&self) -> PaymentId {
        self.payment_id
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    pub fn set_is_closed(&mut self, is_closed: bool) {
        self.is_closed = is_closed;
    }
}

/// Child entities persisted together with their order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelatedObject {
    PendingAuthorization(PendingAuthorization),
    OrderLink(OrderLink),
}

impl RelatedObject {
    pub fn set_order_id(&mut self, order_id: OrderId) {
        match self {
            RelatedObject::PendingAuthorization(authorization) => {
                authorization.set_order_id(order_id)
            }
            RelatedObject::OrderLink(link) => link.set_order_id(order_id),
        }
    }
}

impl From<PendingAuthorization> for RelatedObject {
    fn from(value: PendingAuthorization) -> Self {
        RelatedObject::PendingAuthorization(value)
    }
}

impl From<OrderLink> for RelatedObject {
    fn from(value: OrderLink) -> Self {
        RelatedObject::OrderLink(value)
    }
}

/// Order aggregate. Related objects added here are written by the same atomic save as the order
/// row itself, see [`crate::OrderRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: Option<OrderId>,
    increment_id: String,
    related_objects: Vec<RelatedObject>,
}

impl Order {
    /// An order that has not been saved yet.
    pub fn new(increment_id: impl Into<String>) -> Self {
        Order {
            id: None,
            increment_id: increment_id.into(),
            related_objects: vec![],
        }
    }

    /// An order already known to the store.
    pub fn existing(id: OrderId, increment_id: impl Into<String>) -> Self {
        Order {
            id: Some(id),
            increment_id: increment_id.into(),
            related_objects: vec![],
        }
    }

    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    pub fn increment_id(&self) -> &str {
        &self.increment_id
    }

    pub fn add_related_object(&mut self, object: impl Into<RelatedObject>) {
        self.related_objects.push(object.into());
    }

    pub fn related_objects(&self) -> &[RelatedObject] {
        &self.related_objects
    }

    /// Called by a store once the order and all of its related objects were written.
    pub fn mark_saved(&mut self, id: OrderId) {
        self.id = Some(id);
        self.related_objects.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct Payment {
    id: PaymentId,
    #[builder(default, setter(strip_option))]
    order_id: Option<OrderId>,
}

impl Payment {
    pub fn id(&self) -> PaymentId {
        self.id
    }

    /// Id of the order this payment belongs to, if the association is set.
    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_authorization_without_capture() {
        let authorization = PendingAuthorization::new("AUTH-1");

        assert_eq!(authorization.authorization_id(), "AUTH-1");
        assert_eq!(authorization.capture_id(), None);
        assert!(!authorization.is_capture());
        assert_eq!(authorization.order_id(), None);
    }

    #[test]
    fn test_pending_authorization_with_capture_sets_both_fields() {
        let authorization = PendingAuthorization::new("AUTH-1").with_capture("CAP-2");

        assert_eq!(authorization.capture_id(), Some("CAP-2"));
        assert!(authorization.is_capture());
    }

    #[test]
    fn test_related_object_receives_order_id() {
        let mut object: RelatedObject = OrderLink::new("S01-1234567-1234567").into();
        object.set_order_id(3);

        match object {
            RelatedObject::OrderLink(link) => assert_eq!(link.order_id(), Some(3)),
            other => panic!("unexpected related object {:?}", other),
        }
    }

    #[test]
    fn test_order_mark_saved_clears_related_objects() {
        let mut order = Order::new("000000001");
        order.add_related_object(PendingAuthorization::new("AUTH-1"));
        assert_eq!(order.related_objects().len(), 1);

        order.mark_saved(10);

        assert_eq!(order.id(), Some(10));
        assert!(order.related_objects().is_empty());
    }

    #[test]
    fn test_payment_builder_without_order() {
        let payment = Payment::builder().id(5).build();

        assert_eq!(payment.id(), 5);
        assert_eq!(payment.order_id(), None);
    }
}
