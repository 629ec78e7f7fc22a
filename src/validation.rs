//! Field checks run by the HTTP layer before a request reaches a manager.

use serde::Serialize;
use validator::ValidateEmail;

use crate::error::{ServiceError, ServiceResult};
use crate::model::{DepartmentRequest, StaffRequest};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: &str) -> Self {
        FieldError {
            field,
            message: message.to_string(),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Turns a list of field errors into a `ValidationFailed` when non-empty.
pub fn ensure_valid(errors: Vec<FieldError>) -> ServiceResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationFailed(errors))
    }
}

impl DepartmentRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if is_blank(&self.code) {
            errors.push(FieldError::new("code", "Department code is required"));
        }
        if is_blank(&self.name) {
            errors.push(FieldError::new("name", "Department name is required"));
        }
        errors
    }
}

impl StaffRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if is_blank(&self.staff_no) {
            errors.push(FieldError::new("staffNo", "Staff number is required"));
        }
        if is_blank(&self.name) {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if let Some(email) = &self.email {
            if !email.is_empty() && !email.validate_email() {
                errors.push(FieldError::new("email", "Invalid email format"));
            }
        }
        errors
    }
}
