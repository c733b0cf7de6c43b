pub mod handlers;
pub mod routes;

pub use routes::build_router;

use crate::auth::AuthService;
use crate::search::SearchEngine;
use crate::state::{CatalogStore, ReviewStore, UserStore};
use std::sync::Arc;

/// Shared application state, assembled by the composition root
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub users: Arc<dyn UserStore>,
    pub search: Arc<SearchEngine>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        reviews: Arc<dyn ReviewStore>,
        users: Arc<dyn UserStore>,
        search: Arc<SearchEngine>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self {
            catalog,
            reviews,
            users,
            search,
            auth,
        }
    }
}
