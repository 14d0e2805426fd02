use log::info;
use log::warn;

use crate::domain::Order;
use crate::domain::Payment;
use crate::domain::PaymentError;
use crate::domain::Transaction;
use crate::store::SearchCriteria;
use crate::store::TransactionRepository;

/// A gateway transaction together with the payment and order it was resolved for.
///
/// The payment and order are the caller's own values, not copies reloaded from the store.
#[derive(Debug)]
pub struct ResolvedTransaction<'a> {
    transaction: Transaction,
    payment: &'a Payment,
    order: &'a Order,
}

impl<'a> ResolvedTransaction<'a> {
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn payment(&self) -> &'a Payment {
        self.payment
    }

    pub fn order(&self) -> &'a Order {
        self.order
    }

    pub fn is_closed(&self) -> bool {
        self.transaction.is_closed()
    }

    pub fn into_transaction(self) -> Transaction {
        self.transaction
    }
}

/// Looks up gateway transactions scoped to a payment and an order.
#[derive(Debug, Clone)]
pub struct TransactionResolver<R> {
    repository: R,
}

impl<R> TransactionResolver<R>
where
    R: TransactionRepository,
{
    pub fn new(repository: R) -> Self {
        TransactionResolver { repository }
    }

    /// Finds the transaction with the given gateway id that belongs to `payment` and `order`.
    ///
    /// Only the first page of size one is requested. When the store holds more than one match,
    /// the first one it returns wins and the duplicate is logged.
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` if `transaction_id` is empty.
    /// * `InvalidState` if `order` has never been saved.
    /// * `TransactionNotFound` if nothing matches.
    /// * `Storage` for any failure of the repository.
    pub fn find_transaction<'a>(
        &self,
        transaction_id: &str,
        payment: &'a Payment,
        order: &'a Order,
    ) -> Result<ResolvedTransaction<'a>, PaymentError> {
        if transaction_id.is_empty() {
            return Err(PaymentError::InvalidArgument(
                "transaction id must not be empty".to_string(),
            ));
        }
        let order_id = order.id().ok_or_else(|| {
            PaymentError::InvalidState(format!(
                "order {} has not been saved",
                order.increment_id()
            ))
        })?;

        let criteria = SearchCriteria::builder()
            .txn_id(transaction_id)
            .order_id(order_id)
            .payment_id(payment.id())
            .page_size(1)
            .current_page(1)
            .create();
        let list = self.repository.get_list(&criteria)?;
        if list.total_count > 1 {
            warn!(
                "{} transactions match {} for order {} and payment {}, using the first one",
                list.total_count,
                transaction_id,
                order_id,
                payment.id()
            );
        }

        match list.items.into_iter().next() {
            Some(transaction) => Ok(ResolvedTransaction {
                transaction,
                payment,
                order,
            }),
            None => Err(PaymentError::TransactionNotFound {
                txn_id: transaction_id.to_string(),
                order_id,
                payment_id: payment.id(),
            }),
        }
    }

    /// Marks the matching transaction as closed and saves it.
    ///
    /// Closing an already closed transaction writes it again. Two concurrent closes of the same
    /// transaction race on the row, the last write wins and both leave it closed.
    pub fn close_transaction(
        &self,
        transaction_id: &str,
        payment: &Payment,
        order: &Order,
    ) -> Result<(), PaymentError> {
        let mut transaction = self
            .find_transaction(transaction_id, payment, order)?
            .into_transaction();
        transaction.set_is_closed(true);
        self.repository.save(&transaction)?;
        info!(
            "Transaction {} of payment {} closed",
            transaction_id,
            payment.id()
        );
        Ok(())
    }
}
