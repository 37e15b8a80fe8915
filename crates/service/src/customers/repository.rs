use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::customers::domain::Customer;
use crate::errors::ServiceError;

/// Trait abstraction for customer storage.
/// The HTTP layer only talks to this; the in-memory store is the one implementation.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn list(&self) -> BTreeMap<String, Customer>;
    async fn get(&self, id: &str) -> Result<Customer, ServiceError>;
    async fn create(&self, input: Customer) -> Result<Customer, ServiceError>;
    async fn update(&self, id: &str, input: Customer) -> Result<Customer, ServiceError>;
    async fn delete(&self, id: &str) -> Result<BTreeMap<String, Customer>, ServiceError>;
    async fn len(&self) -> usize;
}
