//! Storage gateway for the two record collections.
//!
//! Every call is a single read or write. Implementations must reject a write
//! that would duplicate a unique key with `StoreError::DuplicateKey`, even when
//! two writers race past the managers' pre-checks.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Department, Staff};

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DepartmentStore: Send + Sync {
    /// Allocates the next surrogate id.
    async fn next_department_id(&self) -> StoreResult<i64>;
    async fn find_all_departments(&self) -> StoreResult<Vec<Department>>;
    async fn find_department(&self, id: i64) -> StoreResult<Option<Department>>;
    async fn find_department_by_code(&self, code: &str) -> StoreResult<Option<Department>>;
    async fn find_departments_by_parent(&self, parent_id: i64) -> StoreResult<Vec<Department>>;
    async fn find_departments_by_name(&self, fragment: &str) -> StoreResult<Vec<Department>>;
    async fn insert_department(&self, department: &Department) -> StoreResult<()>;
    /// Overwrites the record with the same id. Returns false if none exists.
    async fn replace_department(&self, department: &Department) -> StoreResult<bool>;
    /// Returns false if nothing was deleted.
    async fn delete_department(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait StaffStore: Send + Sync {
    async fn next_staff_id(&self) -> StoreResult<i64>;
    async fn find_all_staff(&self) -> StoreResult<Vec<Staff>>;
    async fn find_staff(&self, id: i64) -> StoreResult<Option<Staff>>;
    async fn find_staff_by_staff_no(&self, staff_no: &str) -> StoreResult<Option<Staff>>;
    async fn find_staff_by_department(&self, department_id: i64) -> StoreResult<Vec<Staff>>;
    async fn find_staff_by_status(&self, status: &str) -> StoreResult<Vec<Staff>>;
    async fn find_staff_by_position(&self, position: &str) -> StoreResult<Vec<Staff>>;
    async fn find_staff_by_name(&self, fragment: &str) -> StoreResult<Vec<Staff>>;
    async fn insert_staff(&self, staff: &Staff) -> StoreResult<()>;
    async fn replace_staff(&self, staff: &Staff) -> StoreResult<bool>;
    async fn delete_staff(&self, id: i64) -> StoreResult<bool>;
}
