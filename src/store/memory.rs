use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{DepartmentStore, StaffStore, StoreResult};
use crate::error::StoreError;
use crate::model::{Department, Staff};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn select(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| pred(row)).cloned().collect()
    }

    fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.values().find(|row| pred(row)).cloned()
    }

    /// Inserts or replaces `row` unless another row already holds its unique key.
    fn write(&mut self, id: i64, row: &T, clashes: impl Fn(&T) -> bool) -> StoreResult<()> {
        let taken = self
            .rows
            .iter()
            .any(|(other_id, other)| *other_id != id && clashes(other));
        if taken {
            return Err(StoreError::DuplicateKey);
        }
        self.rows.insert(id, row.clone());
        Ok(())
    }
}

/// In-process storage with the same contract as [`MongoStore`](super::MongoStore).
///
/// Uniqueness is checked under the table's write lock, so concurrent inserts
/// of the same key cannot both succeed.
#[derive(Default)]
pub struct MemoryStore {
    departments: RwLock<Table<Department>>,
    staff: RwLock<Table<Staff>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DepartmentStore for MemoryStore {
    async fn next_department_id(&self) -> StoreResult<i64> {
        Ok(self.departments.write().next_id())
    }

    async fn find_all_departments(&self) -> StoreResult<Vec<Department>> {
        Ok(self.departments.read().select(|_| true))
    }

    async fn find_department(&self, id: i64) -> StoreResult<Option<Department>> {
        Ok(self.departments.read().rows.get(&id).cloned())
    }

    async fn find_department_by_code(&self, code: &str) -> StoreResult<Option<Department>> {
        Ok(self.departments.read().find(|d| d.code == code))
    }

    async fn find_departments_by_parent(&self, parent_id: i64) -> StoreResult<Vec<Department>> {
        Ok(self
            .departments
            .read()
            .select(|d| d.parent_id == Some(parent_id)))
    }

    async fn find_departments_by_name(&self, fragment: &str) -> StoreResult<Vec<Department>> {
        Ok(self.departments.read().select(|d| d.name.contains(fragment)))
    }

    async fn insert_department(&self, department: &Department) -> StoreResult<()> {
        let mut table = self.departments.write();
        if table.rows.contains_key(&department.id) {
            return Err(StoreError::DuplicateKey);
        }
        table.write(department.id, department, |other| other.code == department.code)
    }

    async fn replace_department(&self, department: &Department) -> StoreResult<bool> {
        let mut table = self.departments.write();
        if !table.rows.contains_key(&department.id) {
            return Ok(false);
        }
        table.write(department.id, department, |other| other.code == department.code)?;
        Ok(true)
    }

    async fn delete_department(&self, id: i64) -> StoreResult<bool> {
        Ok(self.departments.write().rows.remove(&id).is_some())
    }
}

#[async_trait]
impl StaffStore for MemoryStore {
    async fn next_staff_id(&self) -> StoreResult<i64> {
        Ok(self.staff.write().next_id())
    }

    async fn find_all_staff(&self) -> StoreResult<Vec<Staff>> {
        Ok(self.staff.read().select(|_| true))
    }

    async fn find_staff(&self, id: i64) -> StoreResult<Option<Staff>> {
        Ok(self.staff.read().rows.get(&id).cloned())
    }

    async fn find_staff_by_staff_no(&self, staff_no: &str) -> StoreResult<Option<Staff>> {
        Ok(self.staff.read().find(|s| s.staff_no == staff_no))
    }

    async fn find_staff_by_department(&self, department_id: i64) -> StoreResult<Vec<Staff>> {
        Ok(self
            .staff
            .read()
            .select(|s| s.department.as_ref().map(|d| d.id) == Some(department_id)))
    }

    async fn find_staff_by_status(&self, status: &str) -> StoreResult<Vec<Staff>> {
        Ok(self
            .staff
            .read()
            .select(|s| s.status.as_deref() == Some(status)))
    }

    async fn find_staff_by_position(&self, position: &str) -> StoreResult<Vec<Staff>> {
        Ok(self
            .staff
            .read()
            .select(|s| s.position.as_deref() == Some(position)))
    }

    async fn find_staff_by_name(&self, fragment: &str) -> StoreResult<Vec<Staff>> {
        Ok(self.staff.read().select(|s| s.name.contains(fragment)))
    }

    async fn insert_staff(&self, staff: &Staff) -> StoreResult<()> {
        let mut table = self.staff.write();
        if table.rows.contains_key(&staff.id) {
            return Err(StoreError::DuplicateKey);
        }
        table.write(staff.id, staff, |other| other.staff_no == staff.staff_no)
    }

    async fn replace_staff(&self, staff: &Staff) -> StoreResult<bool> {
        let mut table = self.staff.write();
        if !table.rows.contains_key(&staff.id) {
            return Ok(false);
        }
        table.write(staff.id, staff, |other| other.staff_no == staff.staff_no)?;
        Ok(true)
    }

    async fn delete_staff(&self, id: i64) -> StoreResult<bool> {
        Ok(self.staff.write().rows.remove(&id).is_some())
    }
}
