//! Detail objects handed over by the gateway integration layer.

/// Result of a capture call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(fake::Dummy))]
pub struct AmazonCaptureDetails {
    transaction_id: String,
}

impl AmazonCaptureDetails {
    pub fn new(transaction_id: impl Into<String>) -> Self {
        AmazonCaptureDetails {
            transaction_id: transaction_id.into(),
        }
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }
}

/// Result of an authorization call, with the capture transaction when the authorization was
/// requested with capture now.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(fake::Dummy))]
pub struct AmazonAuthorizationDetails {
    authorize_transaction_id: String,
    capture_transaction_id: Option<String>,
}

impl AmazonAuthorizationDetails {
    pub fn new(authorize_transaction_id: impl Into<String>) -> Self {
        AmazonAuthorizationDetails {
            authorize_transaction_id: authorize_transaction_id.into(),
            capture_transaction_id: None,
        }
    }

    pub fn with_capture(mut self, capture_transaction_id: impl Into<String>) -> Self {
        self.capture_transaction_id = Some(capture_transaction_id.into());
        self
    }

    pub fn authorize_transaction_id(&self) -> &str {
        &self.authorize_transaction_id
    }

    pub fn capture_transaction_id(&self) -> Option<&str> {
        self.capture_transaction_id.as_deref()
    }

    pub fn has_capture(&self) -> bool {
        self.capture_transaction_id.is_some()
    }
}

/// Result of a refund call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(fake::Dummy))]
pub struct AmazonRefundDetails {
    refund_id: String,
}

impl AmazonRefundDetails {
    pub fn new(refund_id: impl Into<String>) -> Self {
        AmazonRefundDetails {
            refund_id: refund_id.into(),
        }
    }

    pub fn refund_id(&self) -> &str {
        &self.refund_id
    }
}
