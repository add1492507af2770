use std::sync::Arc;

use burrow_shortener::{Allocator, Resolver};

#[derive(Clone)]
pub struct AppState {
    pub allocator: Arc<dyn Allocator>,
    pub resolver: Arc<dyn Resolver>,
}

impl AppState {
    pub fn new(allocator: Arc<dyn Allocator>, resolver: Arc<dyn Resolver>) -> Self {
        Self {
            allocator,
            resolver,
        }
    }

    /// Serves both routes from one service instance.
    pub fn from_service<S: Allocator + Resolver>(service: S) -> Self {
        let service = Arc::new(service);
        Self::new(service.clone(), service)
    }
}
