//! Service layer owning the customer records.
//! - Keeps id allocation and CRUD state transitions out of the HTTP layer.
//! - Reports failures through `ServiceError` for the transport to map.

pub mod customers;
pub mod errors;
