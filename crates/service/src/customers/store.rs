use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::customers::{allocator::IdAllocator, domain::Customer, repository::CustomerRepository};
use crate::errors::ServiceError;

const ENTITY: &str = "customer";

/// In-memory customer store keyed by id.
///
/// Every stored record satisfies `record.id == key`. Mutations hold the write
/// lock across their existence checks and map changes, so a create's
/// check-then-insert and an update's rename are never interleaved with
/// another request.
#[derive(Clone)]
pub struct CustomerStore {
    inner: Arc<RwLock<HashMap<String, Customer>>>,
    allocator: IdAllocator,
}

impl CustomerStore {
    /// Empty store.
    pub fn new(allocator: IdAllocator) -> Arc<Self> {
        Self::with_customers(allocator, Vec::new())
    }

    /// Store preloaded with `customers`, keyed by their own ids.
    /// A later record with a duplicate id replaces the earlier one.
    pub fn with_customers<I>(allocator: IdAllocator, customers: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Customer>,
    {
        let map: HashMap<String, Customer> = customers
            .into_iter()
            .filter(Customer::has_id)
            .map(|c| (c.id.clone(), c))
            .collect();
        Arc::new(Self { inner: Arc::new(RwLock::new(map)), allocator })
    }

    /// Snapshot of every customer, ordered by id.
    pub async fn list(&self) -> BTreeMap<String, Customer> {
        let map = self.inner.read().await;
        debug!(count = map.len(), "list customers");
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub async fn get(&self, id: &str) -> Result<Customer, ServiceError> {
        let map = self.inner.read().await;
        map.get(id).cloned().ok_or_else(|| {
            debug!(%id, "customer not found");
            ServiceError::not_found(ENTITY, id)
        })
    }

    /// Insert a new customer.
    ///
    /// An empty `input.id` is replaced by an allocated one; a non-empty id is
    /// used as given. Fails with `Conflict` if allocation runs out of attempts
    /// or the resolved id is already taken.
    pub async fn create(&self, input: Customer) -> Result<Customer, ServiceError> {
        let mut map = self.inner.write().await;

        let id = if input.has_id() {
            input.id.clone()
        } else {
            self.allocator.allocate(|candidate| map.contains_key(candidate)).ok_or_else(|| {
                ServiceError::Conflict(format!(
                    "no free {} id after {} attempts",
                    ENTITY,
                    self.allocator.max_attempts()
                ))
            })?
        };

        if id.is_empty() || map.contains_key(&id) {
            warn!(%id, "create rejected: id already in use");
            return Err(ServiceError::id_taken(ENTITY, &id));
        }

        let customer = input.with_id(id.clone());
        map.insert(id.clone(), customer.clone());
        info!(%id, count = map.len(), "customer created");
        Ok(customer)
    }

    /// Replace the customer at `id` with `input`.
    ///
    /// An empty `input.id` keeps the record at `id`. A different `input.id`
    /// renames the record; the rename fails with `Conflict` if that id belongs
    /// to another customer, leaving the store untouched.
    pub async fn update(&self, id: &str, input: Customer) -> Result<Customer, ServiceError> {
        let mut map = self.inner.write().await;
        if !map.contains_key(id) {
            return Err(ServiceError::not_found(ENTITY, id));
        }

        let customer = if input.has_id() { input } else { input.with_id(id) };

        if customer.id != id {
            if map.contains_key(&customer.id) {
                warn!(from = %id, to = %customer.id, "rekey rejected: target id already in use");
                return Err(ServiceError::id_taken(ENTITY, &customer.id));
            }
            map.remove(id);
            info!(from = %id, to = %customer.id, "customer rekeyed");
        } else {
            info!(%id, "customer updated");
        }

        map.insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    /// Remove the customer at `id`, returning what is left.
    pub async fn delete(&self, id: &str) -> Result<BTreeMap<String, Customer>, ServiceError> {
        let mut map = self.inner.write().await;
        if map.remove(id).is_none() {
            return Err(ServiceError::not_found(ENTITY, id));
        }
        info!(%id, count = map.len(), "customer deleted");
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[async_trait::async_trait]
impl CustomerRepository for CustomerStore {
    async fn list(&self) -> BTreeMap<String, Customer> {
        self.list().await
    }

    async fn get(&self, id: &str) -> Result<Customer, ServiceError> {
        self.get(id).await
    }

    async fn create(&self, input: Customer) -> Result<Customer, ServiceError> {
        self.create(input).await
    }

    async fn update(&self, id: &str, input: Customer) -> Result<Customer, ServiceError> {
        self.update(id, input).await
    }

    async fn delete(&self, id: &str) -> Result<BTreeMap<String, Customer>, ServiceError> {
        self.delete(id).await
    }

    async fn len(&self) -> usize {
        self.len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customers::allocator::{is_allocated_shape, DEFAULT_MAX_ATTEMPTS};
    use crate::customers::seed::demo_customers;
    use std::collections::HashSet;

    fn seeded() -> Arc<CustomerStore> {
        CustomerStore::with_customers(IdAllocator::default(), demo_customers())
    }

    fn person(name: &str) -> Customer {
        Customer {
            name: name.into(),
            role: "Visitor".into(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: 5550100000,
            ..Customer::default()
        }
    }

    #[tokio::test]
    async fn create_without_id_allocates_fresh_key() -> Result<(), anyhow::Error> {
        let store = seeded();
        let before: HashSet<String> = store.list().await.into_keys().collect();

        let created = store.create(person("New Person")).await?;
        assert!(is_allocated_shape(&created.id));
        assert!(!before.contains(&created.id));
        assert_eq!(store.len().await, before.len() + 1);

        // round trip
        let fetched = store.get(&created.id).await?;
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "New Person");
        Ok(())
    }

    #[tokio::test]
    async fn create_with_explicit_id_uses_it() -> Result<(), anyhow::Error> {
        let store = CustomerStore::new(IdAllocator::default());
        let created = store.create(person("Robert Muldoon").with_id("custom-1")).await?;
        assert_eq!(created.id, "custom-1");
        assert_eq!(store.get("custom-1").await?.name, "Robert Muldoon");
        Ok(())
    }

    #[tokio::test]
    async fn create_with_taken_id_conflicts() {
        let store = seeded();
        let res = store.create(person("Impostor").with_id("023004163")).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        assert_eq!(store.get("023004163").await.map(|c| c.name), Ok("Alan Grant".to_string()));
        assert_eq!(store.len().await, demo_customers().len());
    }

    #[tokio::test]
    async fn repeated_creates_keep_keys_unique() -> Result<(), anyhow::Error> {
        let store = seeded();
        let mut ids = HashSet::new();
        for i in 0..200 {
            let created = store.create(person(&format!("Guest {i}"))).await?;
            assert!(ids.insert(created.id));
        }
        let all = store.list().await;
        assert_eq!(all.len(), demo_customers().len() + 200);
        assert!(all.iter().all(|(k, v)| k == &v.id));
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_allocation_conflicts_without_inserting() -> Result<(), anyhow::Error> {
        const SEED: u64 = 0xC0FFEE;
        let occupied: Vec<Customer> = IdAllocator::candidates(SEED)
            .take(DEFAULT_MAX_ATTEMPTS)
            .map(|id| person("Occupant").with_id(id))
            .collect();
        let store = CustomerStore::with_customers(
            IdAllocator::with_fixed_seed(DEFAULT_MAX_ATTEMPTS, SEED),
            occupied,
        );
        let size = store.len().await;

        let res = store.create(person("Latecomer")).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        assert_eq!(store.len().await, size);
        Ok(())
    }

    #[tokio::test]
    async fn fixed_seed_allocation_succeeds_once_a_candidate_frees_up() -> Result<(), anyhow::Error> {
        const SEED: u64 = 17;
        let mut stream = IdAllocator::candidates(SEED);
        let first = stream.next().expect("candidate");
        let store = CustomerStore::with_customers(
            IdAllocator::with_fixed_seed(3, SEED),
            vec![person("Occupant").with_id(first.clone())],
        );
        let created = store.create(person("Next")).await?;
        assert_eq!(Some(created.id), stream.next());
        Ok(())
    }

    #[tokio::test]
    async fn each_create_draws_from_a_fresh_seed() -> Result<(), anyhow::Error> {
        let a = CustomerStore::new(IdAllocator::default());
        let b = CustomerStore::new(IdAllocator::default());
        // empty stores: each create keeps its first candidate
        let first = a.create(person("First")).await?;
        let second = b.create(person("Second")).await?;
        assert_ne!(first.id, second.id);
        Ok(())
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = seeded();
        assert!(matches!(store.get("999999999").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_without_id_overwrites_in_place() -> Result<(), anyhow::Error> {
        let store = seeded();
        let mut replacement = person("Alan Grant");
        replacement.role = "Retired Paleontologist".into();
        replacement.contacted = false;

        let updated = store.update("023004163", replacement).await?;
        assert_eq!(updated.id, "023004163");
        assert_eq!(store.get("023004163").await?.role, "Retired Paleontologist");
        assert_eq!(store.len().await, demo_customers().len());
        Ok(())
    }

    #[tokio::test]
    async fn update_with_same_id_overwrites_in_place() -> Result<(), anyhow::Error> {
        let store = seeded();
        let updated = store.update("344061207", person("Ian Malcolm").with_id("344061207")).await?;
        assert_eq!(updated.role, "Visitor");
        assert_eq!(store.len().await, demo_customers().len());
        Ok(())
    }

    #[tokio::test]
    async fn update_with_new_id_renames() -> Result<(), anyhow::Error> {
        let store = seeded();
        let size = store.len().await;

        let updated = store.update("023004163", person("Alan Grant").with_id("111111111")).await?;
        assert_eq!(updated.id, "111111111");
        assert!(matches!(store.get("023004163").await, Err(ServiceError::NotFound(_))));
        assert_eq!(store.get("111111111").await?, updated);
        assert_eq!(store.len().await, size);
        Ok(())
    }

    #[tokio::test]
    async fn update_onto_existing_id_conflicts_and_leaves_store_unchanged() {
        let store = seeded();
        let before = store.list().await;

        let res = store.update("023004163", person("Alan Grant").with_id("400025134")).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn update_missing_target_is_not_found() {
        let store = seeded();
        let res = store.update("000000001", person("Nobody")).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert_eq!(store.len().await, demo_customers().len());
    }

    #[tokio::test]
    async fn delete_twice_second_is_not_found() -> Result<(), anyhow::Error> {
        let store = seeded();
        let remaining = store.delete("730857602").await?;
        assert_eq!(remaining.len(), demo_customers().len() - 1);
        assert!(!remaining.contains_key("730857602"));
        assert!(matches!(store.delete("730857602").await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_with_same_id_admit_exactly_one() {
        let store = CustomerStore::new(IdAllocator::default());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create(person(&format!("Racer {i}")).with_id("555555555")).await
            }));
        }
        let mut ok = 0;
        for h in handles {
            if let Ok(Ok(_)) = h.await {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn works_through_trait_object() -> Result<(), anyhow::Error> {
        let repo: Arc<dyn CustomerRepository> = seeded();
        let created = repo.create(person("Dennis Nedry")).await?;
        assert_eq!(repo.get(&created.id).await?.name, "Dennis Nedry");
        assert_eq!(repo.len().await, demo_customers().len() + 1);
        Ok(())
    }
}
