//! Module that describe domain entities, gateway details and errors.
mod details;
mod entities;
mod errors;

pub use details::AmazonAuthorizationDetails;
pub use details::AmazonCaptureDetails;
pub use details::AmazonRefundDetails;
pub use entities::EntityId;
pub use entities::Order;
pub use entities::OrderId;
pub use entities::OrderLink;
pub use entities::Payment;
pub use entities::PaymentId;
pub use entities::PendingAuthorization;
pub use entities::PendingCapture;
pub use entities::PendingRefund;
pub use entities::RelatedObject;
pub use entities::Transaction;
pub use errors::*;
