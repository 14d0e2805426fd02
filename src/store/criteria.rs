//! Search criteria for querying gateway transactions.
use crate::domain::OrderId;
use crate::domain::PaymentId;
use crate::domain::Transaction;

/// Columns of the transaction table that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    TxnId,
    OrderId,
    PaymentId,
    IsClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Id(u64),
    Flag(bool),
}

/// Exact match of a field against a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: TransactionField,
    pub value: FilterValue,
}

impl Filter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match (self.field, &self.value) {
            (TransactionField::TxnId, FilterValue::Text(value)) => transaction.txn_id() == value,
            (TransactionField::OrderId, FilterValue::Id(value)) => transaction.order_id() == *value,
            (TransactionField::PaymentId, FilterValue::Id(value)) => {
                transaction.payment_id() == *value
            }
            (TransactionField::IsClosed, FilterValue::Flag(value)) => {
                transaction.is_closed() == *value
            }
            _ => false,
        }
    }
}

/// Conjunction of filters plus an optional page. Pages are numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    filters: Vec<Filter>,
    page_size: Option<usize>,
    current_page: usize,
}

impl SearchCriteria {
    pub fn builder() -> SearchCriteriaBuilder {
        SearchCriteriaBuilder::default()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.filters.iter().all(|filter| filter.matches(transaction))
    }

    /// Number of matching rows to skip before the requested page starts.
    pub fn offset(&self) -> usize {
        self.page_size
            .map(|size| size.saturating_mul(self.current_page.saturating_sub(1)))
            .unwrap_or(0)
    }
}

#[derive(Debug, Default)]
pub struct SearchCriteriaBuilder {
    filters: Vec<Filter>,
    page_size: Option<usize>,
    current_page: Option<usize>,
}

impl SearchCriteriaBuilder {
    pub fn add_filter(mut self, field: TransactionField, value: FilterValue) -> Self {
        self.filters.push(Filter { field, value });
        self
    }

    pub fn txn_id(self, txn_id: impl Into<String>) -> Self {
        self.add_filter(TransactionField::TxnId, FilterValue::Text(txn_id.into()))
    }

    pub fn order_id(self, order_id: OrderId) -> Self {
        self.add_filter(TransactionField::OrderId, FilterValue::Id(order_id))
    }

    pub fn payment_id(self, payment_id: PaymentId) -> Self {
        self.add_filter(TransactionField::PaymentId, FilterValue::Id(payment_id))
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn current_page(mut self, current_page: usize) -> Self {
        self.current_page = Some(current_page);
        self
    }

    pub fn create(self) -> SearchCriteria {
        SearchCriteria {
            filters: self.filters,
            page_size: self.page_size,
            current_page: self.current_page.unwrap_or(1).max(1),
        }
    }
}

/// One page of a transaction query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionList {
    pub items: Vec<Transaction>,
    /// Number of matches before pagination.
    pub total_count: usize,
}
