use std::sync::Arc;

use service::customers::CustomerRepository;

#[derive(Clone)]
pub struct ServerState {
    pub customers: Arc<dyn CustomerRepository>,
}

impl ServerState {
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }
}
