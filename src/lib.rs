//! Staff and department directory.
//!
//! Two managers sit between the HTTP routes and a storage gateway:
//! [`DepartmentManager`] and [`StaffManager`]. Each keeps a read-through
//! [`EntityCache`] for lookups by id.

pub mod cache;
pub mod config;
pub mod department;
pub mod error;
pub mod model;
pub mod response;
pub mod routes;
pub mod staff;
pub mod store;
pub mod validation;

use std::sync::Arc;

pub use cache::EntityCache;
pub use department::DepartmentManager;
pub use error::{ServiceError, ServiceResult, StoreError};
pub use staff::StaffManager;
pub use store::{DepartmentStore, MemoryStore, MongoStore, StaffStore};

/// Both managers wired to one store, each with a fresh cache.
#[derive(Clone)]
pub struct Directory {
    pub departments: DepartmentManager,
    pub staff: StaffManager,
}

impl Directory {
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: DepartmentStore + StaffStore + 'static,
    {
        let departments =
            DepartmentManager::new(store.clone(), Arc::new(EntityCache::new("departments")));
        let staff = StaffManager::new(
            store,
            Arc::new(EntityCache::new("staff")),
            departments.clone(),
        );
        Directory { departments, staff }
    }
}
