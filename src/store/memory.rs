//! Memory implementation of every storage collaborator.
use log::debug;
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::RwLock;

use super::Entity;
use super::OrderLinkRepository;
use super::OrderRepository;
use super::PendingEventStore;
use super::SearchCriteria;
use super::TransactionList;
use super::TransactionRepository;
use crate::domain::EntityId;
use crate::domain::Order;
use crate::domain::OrderId;
use crate::domain::OrderLink;
use crate::domain::PendingAuthorization;
use crate::domain::PendingCapture;
use crate::domain::PendingRefund;
use crate::domain::RelatedObject;
use crate::domain::StorageError;
use crate::domain::Transaction;

/// Rows of one table keyed by an auto-incremented primary key. Iteration follows the primary key
/// in ascending order.
#[derive(Debug, Clone)]
struct Rows<T> {
    next_id: EntityId,
    rows: BTreeMap<EntityId, T>,
}

impl<T: Entity> Rows<T> {
    fn new() -> Self {
        Rows {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    /// Checks a batch of new rows against the table's unique key, both against stored rows and
    /// among themselves.
    fn check_unique<'a>(&self, values: impl IntoIterator<Item = &'a T>) -> Result<(), StorageError>
    where
        T: 'a,
    {
        let keys: Vec<String> = values.into_iter().filter_map(T::unique_key).collect();
        if keys.is_empty() {
            return Ok(());
        }
        let mut seen: HashSet<String> = self.rows.values().filter_map(T::unique_key).collect();
        for key in keys {
            if !seen.insert(key.clone()) {
                return Err(StorageError::UniqueConstraint {
                    table: T::TABLE.name,
                    key,
                });
            }
        }
        Ok(())
    }

    fn insert(&mut self, value: T) -> Result<EntityId, StorageError> {
        self.check_unique([&value])?;
        Ok(self.push(value))
    }

    /// Inserts without constraint checks, callers must have validated the row.
    fn push(&mut self, value: T) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.insert(id, value);
        id
    }

    fn update(&mut self, id: EntityId, value: T) -> Result<(), StorageError> {
        match self.rows.get_mut(&id) {
            Some(row) => {
                *row = value;
                Ok(())
            }
            None => Err(StorageError::RowNotFound {
                table: T::TABLE.name,
                primary_key: T::TABLE.primary_key,
                id,
            }),
        }
    }

    fn contains(&self, id: EntityId) -> bool {
        self.rows.contains_key(&id)
    }

    fn values(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

#[derive(Debug, Clone)]
struct Tables {
    captures: Rows<PendingCapture>,
    authorizations: Rows<PendingAuthorization>,
    refunds: Rows<PendingRefund>,
    order_links: Rows<OrderLink>,
    orders: Rows<Order>,
    transactions: Rows<Transaction>,
}

impl Tables {
    fn new() -> Self {
        Tables {
            captures: Rows::new(),
            authorizations: Rows::new(),
            refunds: Rows::new(),
            order_links: Rows::new(),
            orders: Rows::new(),
            transactions: Rows::new(),
        }
    }
}

/// A thread-safe store that keeps every table in memory.
/// All tables sit behind a single `RwLock`, so every call, including the save of an order
/// together with its related objects, is atomic with respect to other calls.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore").finish()
    }
}

impl MemoryStore {
    /// Creates a new empty `MemoryStore`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use amazon_payment_management::MemoryStore;
    ///
    /// let store = MemoryStore::new();
    /// ```
    pub fn new() -> Self {
        MemoryStore {
            tables: Arc::new(RwLock::new(Tables::new())),
        }
    }

    /// Adds a gateway transaction to the transaction table.
    ///
    /// Transactions are created by the payment layer of the platform, this is the entry point for
    /// it to register them.
    ///
    /// # Returns
    ///
    /// The primary key assigned to the transaction.
    pub fn insert_transaction(&self, transaction: Transaction) -> Result<EntityId, StorageError> {
        let mut tables = self.tables.write()?;
        let id = tables.transactions.next_id;
        let id = tables.transactions.insert(transaction.with_entity_id(id))?;
        debug!("Transaction row {} inserted", id);
        Ok(id)
    }

    pub fn pending_captures(&self) -> Result<Vec<PendingCapture>, StorageError> {
        Ok(self.tables.read()?.captures.values())
    }

    pub fn pending_authorizations(&self) -> Result<Vec<PendingAuthorization>, StorageError> {
        Ok(self.tables.read()?.authorizations.values())
    }

    pub fn pending_refunds(&self) -> Result<Vec<PendingRefund>, StorageError> {
        Ok(self.tables.read()?.refunds.values())
    }

    pub fn order_links(&self) -> Result<Vec<OrderLink>, StorageError> {
        Ok(self.tables.read()?.order_links.values())
    }

    pub fn orders(&self) -> Result<Vec<Order>, StorageError> {
        Ok(self.tables.read()?.orders.values())
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>, StorageError> {
        Ok(self.tables.read()?.transactions.values())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingEventStore for MemoryStore {
    fn save_capture(&self, capture: &PendingCapture) -> Result<EntityId, StorageError> {
        let id = self.tables.write()?.captures.insert(capture.clone())?;
        debug!("Pending capture {} stored as row {}", capture.capture_id(), id);
        Ok(id)
    }

    fn save_refund(&self, refund: &PendingRefund) -> Result<EntityId, StorageError> {
        let id = self.tables.write()?.refunds.insert(refund.clone())?;
        debug!("Pending refund {} stored as row {}", refund.refund_id(), id);
        Ok(id)
    }
}

impl TransactionRepository for MemoryStore {
    /// Returns the requested page of matching transactions, lowest primary key first.
    fn get_list(&self, criteria: &SearchCriteria) -> Result<TransactionList, StorageError> {
        let tables = self.tables.read()?;
        let matching: Vec<&Transaction> = tables
            .transactions
            .rows
            .values()
            .filter(|transaction| criteria.matches(transaction))
            .collect();
        let total_count = matching.len();
        let page = matching.into_iter().skip(criteria.offset());
        let items = match criteria.page_size() {
            Some(size) => page.take(size).cloned().collect(),
            None => page.cloned().collect(),
        };
        Ok(TransactionList { items, total_count })
    }

    fn save(&self, transaction: &Transaction) -> Result<(), StorageError> {
        let id = transaction
            .entity_id()
            .ok_or(StorageError::MissingPrimaryKey {
                table: Transaction::TABLE.name,
                primary_key: Transaction::TABLE.primary_key,
            })?;
        self.tables
            .write()?
            .transactions
            .update(id, transaction.clone())?;
        debug!("Transaction row {} updated", id);
        Ok(())
    }
}

impl OrderRepository for MemoryStore {
    /// Saves the order and its related objects.
    ///
    /// Every related object is stamped with the order id and validated against the constraints
    /// of its table before anything is written, so a failing save leaves all tables unchanged.
    fn save(&self, order: &mut Order) -> Result<OrderId, StorageError> {
        let mut tables = self.tables.write()?;
        let order_id = match order.id() {
            Some(id) if tables.orders.contains(id) => id,
            Some(id) => {
                return Err(StorageError::RowNotFound {
                    table: Order::TABLE.name,
                    primary_key: Order::TABLE.primary_key,
                    id,
                })
            }
            None => tables.orders.next_id,
        };

        let mut authorizations = vec![];
        let mut links = vec![];
        for object in order.related_objects() {
            let mut object = object.clone();
            object.set_order_id(order_id);
            match object {
                RelatedObject::PendingAuthorization(authorization) => {
                    authorizations.push(authorization)
                }
                RelatedObject::OrderLink(link) => links.push(link),
            }
        }
        tables.authorizations.check_unique(&authorizations)?;
        tables.order_links.check_unique(&links)?;

        let mut row = order.clone();
        row.mark_saved(order_id);
        match order.id() {
            Some(id) => tables.orders.update(id, row)?,
            None => {
                tables.orders.push(row);
            }
        }
        let related = authorizations.len() + links.len();
        for authorization in authorizations {
            tables.authorizations.push(authorization);
        }
        for link in links {
            tables.order_links.push(link);
        }
        drop(tables);

        order.mark_saved(order_id);
        debug!(
            "Order {} saved as row {} with {} related objects",
            order.increment_id(),
            order_id,
            related
        );
        Ok(order_id)
    }
}

impl OrderLinkRepository for MemoryStore {
    fn get_by_order_id(&self, order_id: OrderId) -> Result<Option<OrderLink>, StorageError> {
        Ok(self
            .tables
            .read()?
            .order_links
            .rows
            .values()
            .find(|link| link.order_id() == Some(order_id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::store::FilterValue;
    use crate::store::TransactionField;

    fn transaction(txn_id: &str, order_id: OrderId, payment_id: u64) -> Transaction {
        Transaction::builder()
            .txn_id(txn_id)
            .order_id(order_id)
            .payment_id(payment_id)
            .build()
    }

    #[test]
    fn test_save_capture_from_many_threads() {
        let store = MemoryStore::new();

        let num_threads = 10;
        let handles: Vec<_> = (0..num_threads)
            .map(|n| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..5 {
                        let capture = PendingCapture::builder()
                            .capture_id(format!("CAP-{}-{}", n, i))
                            .payment_id(n)
                            .order_id(n)
                            .build();
                        store.save_capture(&capture).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.pending_captures().unwrap().len(), 50);
    }

    #[test]
    fn test_save_refund_allows_duplicates() {
        let store = MemoryStore::new();
        let refund = PendingRefund::builder()
            .refund_id("REF-1")
            .payment_id(5)
            .order_id(9)
            .build();

        let first = store.save_refund(&refund).unwrap();
        let second = store.save_refund(&refund).unwrap();

        assert_ne!(first, second);
        assert_eq!(store.pending_refunds().unwrap(), vec![refund.clone(), refund]);
    }

    #[test]
    fn test_get_list_returns_lowest_primary_key_first() {
        let store = MemoryStore::new();
        let first = store.insert_transaction(transaction("TXN-1", 7, 42)).unwrap();
        store.insert_transaction(transaction("TXN-2", 7, 42)).unwrap();
        store.insert_transaction(transaction("TXN-1", 7, 42)).unwrap();

        let criteria = SearchCriteria::builder()
            .txn_id("TXN-1")
            .order_id(7)
            .payment_id(42)
            .page_size(1)
            .current_page(1)
            .create();
        let list = store.get_list(&criteria).unwrap();

        assert_eq!(list.total_count, 2);
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].entity_id(), Some(first));
    }

    #[test]
    fn test_get_list_paginates() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .insert_transaction(transaction(&format!("TXN-{}", i), 7, 42))
                .unwrap();
        }

        let criteria = SearchCriteria::builder()
            .order_id(7)
            .page_size(2)
            .current_page(3)
            .create();
        let list = store.get_list(&criteria).unwrap();

        assert_eq!(list.total_count, 5);
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].txn_id(), "TXN-4");
    }

    #[test]
    fn test_get_list_past_last_page_is_empty() {
        let store = MemoryStore::new();
        store.insert_transaction(transaction("TXN-1", 7, 42)).unwrap();

        let criteria = SearchCriteria::builder()
            .page_size(usize::MAX / 2 + 1)
            .current_page(3)
            .create();
        let list = store.get_list(&criteria).unwrap();

        assert_eq!(list.total_count, 1);
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_get_list_filters_on_closed_flag() {
        let store = MemoryStore::new();
        store.insert_transaction(transaction("TXN-1", 7, 42)).unwrap();
        let closed = store
            .insert_transaction(
                Transaction::builder()
                    .txn_id("TXN-2")
                    .order_id(7)
                    .payment_id(42)
                    .is_closed(true)
                    .build(),
            )
            .unwrap();

        let criteria = SearchCriteria::builder()
            .add_filter(TransactionField::IsClosed, FilterValue::Flag(true))
            .create();
        let list = store.get_list(&criteria).unwrap();

        assert_eq!(list.total_count, 1);
        assert_eq!(list.items[0].entity_id(), Some(closed));
        assert_eq!(list.items[0].txn_id(), "TXN-2");
    }

    #[test]
    fn test_save_transaction_replaces_row() {
        let store = MemoryStore::new();
        let id = store.insert_transaction(transaction("TXN-1", 7, 42)).unwrap();

        let mut stored = store.transactions().unwrap().remove(0);
        assert_eq!(stored.entity_id(), Some(id));
        stored.set_is_closed(true);
        TransactionRepository::save(&store, &stored).unwrap();

        assert!(store.transactions().unwrap()[0].is_closed());
    }

    #[test]
    fn test_save_transaction_without_primary_key() {
        let store = MemoryStore::new();

        let result = TransactionRepository::save(&store, &transaction("TXN-1", 7, 42));

        assert_eq!(
            result,
            Err(StorageError::MissingPrimaryKey {
                table: "sales_payment_transaction",
                primary_key: "transaction_id",
            })
        );
    }

    #[test]
    fn test_missing_row_error_names_primary_key() {
        let store = MemoryStore::new();

        let err =
            TransactionRepository::save(&store, &transaction("TXN-1", 7, 42).with_entity_id(3))
                .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Row with transaction_id 3 not found in table sales_payment_transaction"
        );
    }

    #[test]
    fn test_save_unknown_transaction() {
        let store = MemoryStore::new();

        let result =
            TransactionRepository::save(&store, &transaction("TXN-1", 7, 42).with_entity_id(3));

        assert_eq!(
            result,
            Err(StorageError::RowNotFound {
                table: "sales_payment_transaction",
                primary_key: "transaction_id",
                id: 3
            })
        );
    }

    #[test]
    fn test_save_order_with_related_objects() {
        let store = MemoryStore::new();
        let mut order = Order::new("000000001");
        order.add_related_object(PendingAuthorization::new("AUTH-1").with_capture("CAP-1"));
        order.add_related_object(OrderLink::new("S01-1111111-1111111"));

        let order_id = OrderRepository::save(&store, &mut order).unwrap();

        assert_eq!(order.id(), Some(order_id));
        assert!(order.related_objects().is_empty());
        let authorizations = store.pending_authorizations().unwrap();
        assert_eq!(authorizations.len(), 1);
        assert_eq!(authorizations[0].order_id(), Some(order_id));
        assert_eq!(
            store.get_by_order_id(order_id).unwrap().unwrap().amazon_order_reference_id(),
            "S01-1111111-1111111"
        );
        assert_eq!(store.orders().unwrap().len(), 1);
    }

    #[test]
    fn test_save_existing_order_keeps_id() {
        let store = MemoryStore::new();
        let mut order = Order::new("000000001");
        let order_id = OrderRepository::save(&store, &mut order).unwrap();

        order.add_related_object(PendingAuthorization::new("AUTH-2"));
        let saved_again = OrderRepository::save(&store, &mut order).unwrap();

        assert_eq!(order_id, saved_again);
        assert_eq!(store.orders().unwrap().len(), 1);
        assert_eq!(store.pending_authorizations().unwrap()[0].order_id(), Some(order_id));
    }

    #[test]
    fn test_save_unknown_order_fails() {
        let store = MemoryStore::new();
        let mut order = Order::existing(99, "000000099");
        order.add_related_object(PendingAuthorization::new("AUTH-1"));

        let result = OrderRepository::save(&store, &mut order);

        assert_eq!(
            result,
            Err(StorageError::RowNotFound {
                table: "sales_order",
                primary_key: "entity_id",
                id: 99
            })
        );
        assert!(store.pending_authorizations().unwrap().is_empty());
        assert_eq!(order.related_objects().len(), 1);
    }

    #[test]
    fn test_save_order_is_atomic() {
        let store = MemoryStore::new();
        let mut order = Order::new("000000001");
        order.add_related_object(PendingAuthorization::new("AUTH-1"));
        order.add_related_object(OrderLink::new("S01-1111111-1111111"));
        order.add_related_object(OrderLink::new("S01-2222222-2222222"));

        let result = OrderRepository::save(&store, &mut order);

        assert!(matches!(
            result,
            Err(StorageError::UniqueConstraint {
                table: "amazon_sales_order",
                ..
            })
        ));
        assert!(store.orders().unwrap().is_empty());
        assert!(store.pending_authorizations().unwrap().is_empty());
        assert!(store.order_links().unwrap().is_empty());
        assert_eq!(order.id(), None);
        assert_eq!(order.related_objects().len(), 3);
    }

    #[test]
    fn test_order_link_is_unique_per_order() {
        let store = MemoryStore::new();
        let mut order = Order::new("000000001");
        order.add_related_object(OrderLink::new("S01-1111111-1111111"));
        OrderRepository::save(&store, &mut order).unwrap();

        order.add_related_object(OrderLink::new("S01-2222222-2222222"));
        let result = OrderRepository::save(&store, &mut order);

        assert!(result.is_err());
        assert_eq!(store.order_links().unwrap().len(), 1);
    }
}
