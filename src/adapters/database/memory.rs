use crate::{
    domain::{Customer, LedgerOperation},
    ports::database::{DatabasePort, Error, LedgerUpdate},
};
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, Mutex, PoisonError},
};
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct MemoryDatabase {
    store: Arc<Mutex<CustomerArena>>,
}

/// Customers stored by slot, with a name index on top
///
/// Removing a customer vacates its slot. Slots are never reused, so walking the
/// arena yields customers in insertion order.
#[derive(Debug, Default)]
struct CustomerArena {
    slots: Vec<Option<Customer>>,
    by_name: HashMap<String, usize>,
}

impl CustomerArena {
    fn insert(&mut self, customer: Customer) -> Result<usize, Error> {
        match self.by_name.entry(customer.name().to_string()) {
            Entry::Occupied(entry) => Err(Error::DuplicateCustomer(entry.key().clone())),
            Entry::Vacant(entry) => {
                let slot = self.slots.len();
                self.slots.push(Some(customer));
                entry.insert(slot);
                Ok(slot)
            }
        }
    }

    fn get(&self, name: &str) -> Option<&Customer> {
        self.by_name
            .get(name)
            .and_then(|slot| self.slots.get(*slot))
            .and_then(Option::as_ref)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Customer> {
        let slot = *self.by_name.get(name)?;
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    fn remove(&mut self, name: &str) -> Option<Customer> {
        let slot = self.by_name.remove(name)?;
        self.slots.get_mut(slot).and_then(Option::take)
    }

    fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.slots.iter().flatten()
    }
}

#[async_trait::async_trait]
impl DatabasePort for MemoryDatabase {
    async fn add_customer(&self, customer: Customer) -> Result<(), Error> {
        let mut store = self.store.lock()?;
        let slot = store.insert(customer)?;
        debug!(slot, customers = store.by_name.len(), "Stored customer");
        Ok(())
    }

    async fn get_customer(&self, name: &str) -> Result<Customer, Error> {
        self.store
            .lock()?
            .get(name)
            .cloned()
            .ok_or_else(|| Error::CustomerNotFound(name.to_string()))
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, Error> {
        Ok(self.store.lock()?.iter().cloned().collect())
    }

    async fn apply_operation(
        &self,
        name: &str,
        operation: LedgerOperation,
    ) -> Result<LedgerUpdate, Error> {
        let mut store = self.store.lock()?;
        let customer = store
            .get_mut(name)
            .ok_or_else(|| Error::CustomerNotFound(name.to_string()))?;

        let old_balance = customer.balance();
        let points = operation.apply(customer)?;
        let update = LedgerUpdate {
            tier: customer.tier(),
            old_balance,
            new_balance: customer.balance(),
            points,
        };

        debug!(
            customer = %name,
            operation = operation.name(),
            points = %update.points,
            balance = %update.new_balance,
            "Applied ledger operation"
        );
        Ok(update)
    }

    async fn remove_customer(&self, name: &str) -> Result<Customer, Error> {
        self.store
            .lock()?
            .remove(name)
            .ok_or_else(|| Error::CustomerNotFound(name.to_string()))
    }

    async fn remove_zero_balance(&self) -> Result<usize, Error> {
        let mut store = self.store.lock()?;
        let empty: Vec<String> = store
            .iter()
            .filter(|customer| customer.balance().is_zero())
            .map(|customer| customer.name().to_string())
            .collect();
        for name in &empty {
            store.remove(name);
        }

        debug!(removed = empty.len(), "Removed customers without points");
        Ok(empty.len())
    }
}

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}
