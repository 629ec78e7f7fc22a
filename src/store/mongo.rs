use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::error::{ErrorKind, WriteError, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use serde::{Serialize, de::DeserializeOwned};

use super::{DepartmentStore, StaffStore, StoreResult};
use crate::error::StoreError;
use crate::model::{Department, Staff};

const DEPARTMENTS: &str = "departments";
const STAFF: &str = "staff";
const COUNTERS: &str = "counters";

const DUPLICATE_KEY: i32 = 11000;

/// MongoDB-backed storage. Staff documents carry the department snapshot
/// inline, so `department.id` is the foreign key.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        MongoStore { db }
    }

    fn departments(&self) -> Collection<Department> {
        self.db.collection(DEPARTMENTS)
    }

    fn staff(&self) -> Collection<Staff> {
        self.db.collection(STAFF)
    }

    /// Creates the unique indexes the managers rely on to reject duplicates
    /// that slip past their pre-checks.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        create_unique_index(&self.departments(), "id").await?;
        create_unique_index(&self.departments(), "code").await?;
        create_unique_index(&self.staff(), "id").await?;
        create_unique_index(&self.staff(), "staffNo").await?;
        self.staff()
            .create_index(IndexModel::builder().keys(doc! { "department.id": 1 }).build())
            .await?;
        Ok(())
    }

    async fn next_id(&self, sequence: &str) -> StoreResult<i64> {
        let counter = self
            .db
            .collection::<Document>(COUNTERS)
            .find_one_and_update(doc! { "_id": sequence }, doc! { "$inc": { "seq": 1_i64 } })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| StoreError::Backend(format!("counter {sequence} was not created")))?;
        counter
            .get_i64("seq")
            .map_err(|err| StoreError::Backend(format!("counter {sequence}: {err}")))
    }
}

async fn create_unique_index<T: Send + Sync>(
    collection: &Collection<T>,
    field: &str,
) -> StoreResult<()> {
    let options = IndexOptions::builder().unique(true).build();
    let model = IndexModel::builder()
        .keys(doc! { field: 1 })
        .options(options)
        .build();
    collection.create_index(model).await?;
    Ok(())
}

fn write_error(err: mongodb::error::Error) -> StoreError {
    let duplicate = matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: DUPLICATE_KEY,
            ..
        }))
    );
    if duplicate {
        StoreError::DuplicateKey
    } else {
        StoreError::from(err)
    }
}

/// Matches `field` containing `fragment` literally, case-sensitive.
fn contains(field: &str, fragment: &str) -> Document {
    doc! { field: { "$regex": regex::escape(fragment) } }
}

async fn find_many<T>(collection: &Collection<T>, filter: Document) -> StoreResult<Vec<T>>
where
    T: DeserializeOwned + Send + Sync,
{
    let cursor = collection.find(filter).await?;
    Ok(cursor.try_collect().await?)
}

async fn replace_by_id<T>(collection: &Collection<T>, id: i64, record: &T) -> StoreResult<bool>
where
    T: Serialize + Send + Sync,
{
    let result = collection
        .replace_one(doc! { "id": id }, record)
        .await
        .map_err(write_error)?;
    Ok(result.matched_count > 0)
}

#[async_trait]
impl DepartmentStore for MongoStore {
    async fn next_department_id(&self) -> StoreResult<i64> {
        self.next_id(DEPARTMENTS).await
    }

    async fn find_all_departments(&self) -> StoreResult<Vec<Department>> {
        find_many(&self.departments(), doc! {}).await
    }

    async fn find_department(&self, id: i64) -> StoreResult<Option<Department>> {
        Ok(self.departments().find_one(doc! { "id": id }).await?)
    }

    async fn find_department_by_code(&self, code: &str) -> StoreResult<Option<Department>> {
        Ok(self.departments().find_one(doc! { "code": code }).await?)
    }

    async fn find_departments_by_parent(&self, parent_id: i64) -> StoreResult<Vec<Department>> {
        find_many(&self.departments(), doc! { "parentId": parent_id }).await
    }

    async fn find_departments_by_name(&self, fragment: &str) -> StoreResult<Vec<Department>> {
        find_many(&self.departments(), contains("name", fragment)).await
    }

    async fn insert_department(&self, department: &Department) -> StoreResult<()> {
        self.departments()
            .insert_one(department)
            .await
            .map_err(write_error)?;
        Ok(())
    }

    async fn replace_department(&self, department: &Department) -> StoreResult<bool> {
        replace_by_id(&self.departments(), department.id, department).await
    }

    async fn delete_department(&self, id: i64) -> StoreResult<bool> {
        let result = self.departments().delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl StaffStore for MongoStore {
    async fn next_staff_id(&self) -> StoreResult<i64> {
        self.next_id(STAFF).await
    }

    async fn find_all_staff(&self) -> StoreResult<Vec<Staff>> {
        find_many(&self.staff(), doc! {}).await
    }

    async fn find_staff(&self, id: i64) -> StoreResult<Option<Staff>> {
        Ok(self.staff().find_one(doc! { "id": id }).await?)
    }

    async fn find_staff_by_staff_no(&self, staff_no: &str) -> StoreResult<Option<Staff>> {
        Ok(self.staff().find_one(doc! { "staffNo": staff_no }).await?)
    }

    async fn find_staff_by_department(&self, department_id: i64) -> StoreResult<Vec<Staff>> {
        find_many(&self.staff(), doc! { "department.id": department_id }).await
    }

    async fn find_staff_by_status(&self, status: &str) -> StoreResult<Vec<Staff>> {
        find_many(&self.staff(), doc! { "status": status }).await
    }

    async fn find_staff_by_position(&self, position: &str) -> StoreResult<Vec<Staff>> {
        find_many(&self.staff(), doc! { "position": position }).await
    }

    async fn find_staff_by_name(&self, fragment: &str) -> StoreResult<Vec<Staff>> {
        find_many(&self.staff(), contains("name", fragment)).await
    }

    async fn insert_staff(&self, staff: &Staff) -> StoreResult<()> {
        self.staff().insert_one(staff).await.map_err(write_error)?;
        Ok(())
    }

    async fn replace_staff(&self, staff: &Staff) -> StoreResult<bool> {
        replace_by_id(&self.staff(), staff.id, staff).await
    }

    async fn delete_staff(&self, id: i64) -> StoreResult<bool> {
        let result = self.staff().delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
