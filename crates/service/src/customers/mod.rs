//! Customer records: id allocation, the in-memory store, and its trait seam.

pub mod allocator;
pub mod domain;
pub mod repository;
pub mod seed;
pub mod store;

pub use allocator::IdAllocator;
pub use domain::Customer;
pub use repository::CustomerRepository;
pub use store::CustomerStore;
