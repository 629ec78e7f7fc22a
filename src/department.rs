use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::cache::EntityCache;
use crate::error::{ServiceError, ServiceResult, StoreError};
use crate::model::{Department, DepartmentRequest};
use crate::store::DepartmentStore;

/// Owns department records: CRUD, `code` uniqueness and the by-id cache.
#[derive(Clone)]
pub struct DepartmentManager {
    store: Arc<dyn DepartmentStore>,
    cache: Arc<EntityCache<Department>>,
}

fn code_taken(code: &str) -> ServiceError {
    ServiceError::Conflict(format!("Department code already exists: {code}"))
}

fn conflict_on_duplicate(code: &str) -> impl FnOnce(StoreError) -> ServiceError + '_ {
    move |err| match err {
        StoreError::DuplicateKey => code_taken(code),
        other => other.into(),
    }
}

impl DepartmentManager {
    pub fn new(store: Arc<dyn DepartmentStore>, cache: Arc<EntityCache<Department>>) -> Self {
        DepartmentManager { store, cache }
    }

    pub async fn list_all(&self) -> ServiceResult<Vec<Department>> {
        debug!("Getting all departments");
        Ok(self.store.find_all_departments().await?)
    }

    /// Cached read-through lookup.
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Department> {
        debug!(id, "Getting department by id");
        if let Some(department) = self.cache.get(id) {
            return Ok(department);
        }
        let ticket = self.cache.ticket(id);
        let department = self
            .store
            .find_department(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", "id", id))?;
        self.cache.fill(id, ticket, department.clone());
        Ok(department)
    }

    pub async fn get_by_code(&self, code: &str) -> ServiceResult<Department> {
        debug!(code, "Getting department by code");
        self.store
            .find_department_by_code(code)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", "code", code))
    }

    pub async fn list_by_parent(&self, parent_id: i64) -> ServiceResult<Vec<Department>> {
        debug!(parent_id, "Getting departments by parent id");
        Ok(self.store.find_departments_by_parent(parent_id).await?)
    }

    pub async fn search_by_name(&self, name: &str) -> ServiceResult<Vec<Department>> {
        debug!(name, "Searching departments by name");
        Ok(self.store.find_departments_by_name(name).await?)
    }

    pub async fn create(&self, request: DepartmentRequest) -> ServiceResult<Department> {
        debug!(name = %request.name, "Creating new department");

        if self
            .store
            .find_department_by_code(&request.code)
            .await?
            .is_some()
        {
            return Err(code_taken(&request.code));
        }

        let now = Utc::now();
        let department = Department {
            id: self.store.next_department_id().await?,
            code: request.code,
            name: request.name,
            description: request.description,
            parent_id: request.parent_id,
            level: request.level,
            is_active: request.is_active,
            created_at: now,
            updated_at: now,
        };
        self.store
            .insert_department(&department)
            .await
            .map_err(conflict_on_duplicate(&department.code))?;
        Ok(department)
    }

    /// Overwrites every mutable field and refreshes the cache entry.
    pub async fn update(&self, id: i64, request: DepartmentRequest) -> ServiceResult<Department> {
        debug!(id, "Updating department");

        let mut department = self.get_by_id(id).await?;

        if department.code != request.code {
            if let Some(holder) = self.store.find_department_by_code(&request.code).await? {
                if holder.id != id {
                    return Err(code_taken(&request.code));
                }
            }
        }

        department.code = request.code;
        department.name = request.name;
        department.description = request.description;
        department.parent_id = request.parent_id;
        department.level = request.level;
        department.is_active = request.is_active;
        department.updated_at = Utc::now();

        let ticket = self.cache.ticket(id);
        let replaced = self
            .store
            .replace_department(&department)
            .await
            .map_err(conflict_on_duplicate(&department.code))?;
        if !replaced {
            self.cache.evict(id);
            return Err(ServiceError::not_found("Department", "id", id));
        }
        self.cache.refresh(id, ticket, department.clone());
        Ok(department)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        debug!(id, "Deleting department");
        self.get_by_id(id).await?;
        let deleted = self.store.delete_department(id).await;
        self.cache.evict(id);
        if !deleted? {
            return Err(ServiceError::not_found("Department", "id", id));
        }
        Ok(())
    }
}
