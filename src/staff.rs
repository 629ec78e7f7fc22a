use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::cache::EntityCache;
use crate::department::DepartmentManager;
use crate::error::{ServiceError, ServiceResult, StoreError};
use crate::model::{Staff, StaffRequest};
use crate::store::StaffStore;

/// Owns staff records. Department references are resolved through
/// [`DepartmentManager`] and stored as a snapshot; later department edits
/// do not reach staff records until they are saved again.
#[derive(Clone)]
pub struct StaffManager {
    store: Arc<dyn StaffStore>,
    cache: Arc<EntityCache<Staff>>,
    departments: DepartmentManager,
}

fn staff_no_taken(staff_no: &str) -> ServiceError {
    ServiceError::Conflict(format!("Staff number already exists: {staff_no}"))
}

fn conflict_on_duplicate(staff_no: &str) -> impl FnOnce(StoreError) -> ServiceError + '_ {
    move |err| match err {
        StoreError::DuplicateKey => staff_no_taken(staff_no),
        other => other.into(),
    }
}

impl StaffManager {
    pub fn new(
        store: Arc<dyn StaffStore>,
        cache: Arc<EntityCache<Staff>>,
        departments: DepartmentManager,
    ) -> Self {
        StaffManager {
            store,
            cache,
            departments,
        }
    }

    pub async fn list_all(&self) -> ServiceResult<Vec<Staff>> {
        debug!("Getting all staff");
        Ok(self.store.find_all_staff().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Staff> {
        debug!(id, "Getting staff by id");
        if let Some(staff) = self.cache.get(id) {
            return Ok(staff);
        }
        let ticket = self.cache.ticket(id);
        let staff = self
            .store
            .find_staff(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Staff", "id", id))?;
        self.cache.fill(id, ticket, staff.clone());
        Ok(staff)
    }

    pub async fn get_by_staff_no(&self, staff_no: &str) -> ServiceResult<Staff> {
        debug!(staff_no, "Getting staff by staff number");
        self.store
            .find_staff_by_staff_no(staff_no)
            .await?
            .ok_or_else(|| ServiceError::not_found("Staff", "staff number", staff_no))
    }

    pub async fn list_by_department(&self, department_id: i64) -> ServiceResult<Vec<Staff>> {
        debug!(department_id, "Getting staff by department");
        Ok(self.store.find_staff_by_department(department_id).await?)
    }

    pub async fn list_by_status(&self, status: &str) -> ServiceResult<Vec<Staff>> {
        debug!(status, "Getting staff by status");
        Ok(self.store.find_staff_by_status(status).await?)
    }

    pub async fn list_by_position(&self, position: &str) -> ServiceResult<Vec<Staff>> {
        debug!(position, "Getting staff by position");
        Ok(self.store.find_staff_by_position(position).await?)
    }

    pub async fn search_by_name(&self, name: &str) -> ServiceResult<Vec<Staff>> {
        debug!(name, "Searching staff by name");
        Ok(self.store.find_staff_by_name(name).await?)
    }

    pub async fn create(&self, request: StaffRequest) -> ServiceResult<Staff> {
        debug!(name = %request.name, "Creating new staff");

        if self
            .store
            .find_staff_by_staff_no(&request.staff_no)
            .await?
            .is_some()
        {
            return Err(staff_no_taken(&request.staff_no));
        }

        // Resolve the department before allocating an id so a bad reference writes nothing.
        let department = match request.department_id {
            Some(department_id) => Some(self.departments.get_by_id(department_id).await?),
            None => None,
        };

        let now = Utc::now();
        let mut staff = Staff {
            id: self.store.next_staff_id().await?,
            staff_no: String::new(),
            name: String::new(),
            gender: None,
            birth_date: None,
            phone: None,
            email: None,
            id_card: None,
            department,
            position: None,
            hire_date: None,
            status: None,
            address: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        apply_request(&mut staff, request);

        self.store
            .insert_staff(&staff)
            .await
            .map_err(conflict_on_duplicate(&staff.staff_no))?;
        Ok(staff)
    }

    /// Overwrites every scalar field. The department is replaced only when the
    /// request names one; otherwise the existing snapshot is kept.
    pub async fn update(&self, id: i64, request: StaffRequest) -> ServiceResult<Staff> {
        debug!(id, "Updating staff");

        let mut staff = self.get_by_id(id).await?;

        if staff.staff_no != request.staff_no {
            if let Some(holder) = self.store.find_staff_by_staff_no(&request.staff_no).await? {
                if holder.id != id {
                    return Err(staff_no_taken(&request.staff_no));
                }
            }
        }

        if let Some(department_id) = request.department_id {
            staff.department = Some(self.departments.get_by_id(department_id).await?);
        }
        apply_request(&mut staff, request);
        staff.updated_at = Utc::now();

        let ticket = self.cache.ticket(id);
        let replaced = self
            .store
            .replace_staff(&staff)
            .await
            .map_err(conflict_on_duplicate(&staff.staff_no))?;
        if !replaced {
            self.cache.evict(id);
            return Err(ServiceError::not_found("Staff", "id", id));
        }
        self.cache.refresh(id, ticket, staff.clone());
        Ok(staff)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        debug!(id, "Deleting staff");
        self.get_by_id(id).await?;
        let deleted = self.store.delete_staff(id).await;
        self.cache.evict(id);
        if !deleted? {
            return Err(ServiceError::not_found("Staff", "id", id));
        }
        Ok(())
    }
}

/// Copies the request's scalar fields onto `staff`. The department
/// reference is handled by the caller.
fn apply_request(staff: &mut Staff, request: StaffRequest) {
    staff.staff_no = request.staff_no;
    staff.name = request.name;
    staff.gender = request.gender;
    staff.birth_date = request.birth_date;
    staff.phone = request.phone;
    staff.email = request.email;
    staff.id_card = request.id_card;
    staff.position = request.position;
    staff.hire_date = request.hire_date;
    staff.status = request.status;
    staff.address = request.address;
    staff.is_active = request.is_active;
}
