use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_level() -> i32 {
    1
}

fn default_active() -> bool {
    true
}

/// A department as stored and returned to clients.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "CS")]
    pub code: String,
    #[schema(example = "Computer Science")]
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    #[schema(example = 1)]
    pub level: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A staff member. `department` is a copy of the department taken when the
/// record was last written, not a live reference.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "S001")]
    pub staff_no: String,
    #[schema(example = "Alice")]
    pub name: String,
    pub gender: Option<String>,
    #[schema(value_type = Option<String>, format = "date", example = "1990-04-12")]
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub id_card: Option<String>,
    pub department: Option<Department>,
    pub position: Option<String>,
    #[schema(value_type = Option<String>, format = "date", example = "2020-09-01")]
    pub hire_date: Option<NaiveDate>,
    #[schema(example = "active")]
    pub status: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRequest {
    #[schema(example = "CS")]
    pub code: String,
    #[schema(example = "Computer Science")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default = "default_level")]
    pub level: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl DepartmentRequest {
    /// A request with only the required fields set and defaults elsewhere.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            parent_id: None,
            level: default_level(),
            is_active: default_active(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffRequest {
    #[schema(example = "S001")]
    pub staff_no: String,
    #[schema(example = "Alice")]
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = "date")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub id_card: Option<String>,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = "date")]
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl StaffRequest {
    pub fn new(staff_no: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            staff_no: staff_no.into(),
            name: name.into(),
            gender: None,
            birth_date: None,
            phone: None,
            email: None,
            id_card: None,
            department_id: None,
            position: None,
            hire_date: None,
            status: None,
            address: None,
            is_active: default_active(),
        }
    }
}
