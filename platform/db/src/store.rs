use std::path::PathBuf;

use async_trait::async_trait;
use sea_orm::DbErr;
use serde::Deserialize;
use thiserror::Error;

pub use entity::employees::Model as Employee;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("employee {0} not found")]
    NotFound(i32),
    #[error("employee store is read-only")]
    ReadOnly,
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("duplicate employee id {id} in {path}")]
    DuplicateId { path: PathBuf, id: i32 },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields for a record about to be inserted. The id is assigned by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub is_severed: bool,
    pub mode: String,
}

impl NewEmployee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            department: department.into(),
            is_severed: false,
            mode: entity::employees::default_mode(),
        }
    }

    pub fn severed(mut self, is_severed: bool) -> Self {
        self.is_severed = is_severed;
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }
}

/// Partial update: only the fields that are `Some` overwrite the stored record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct EmployeeChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub is_severed: Option<bool>,
    pub mode: Option<String>,
}

impl EmployeeChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.department.is_none()
            && self.is_severed.is_none()
            && self.mode.is_none()
    }

    /// Applies the supplied fields to an in-memory record.
    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(first_name) = self.first_name {
            employee.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            employee.last_name = last_name;
        }
        if let Some(department) = self.department {
            employee.department = department;
        }
        if let Some(is_severed) = self.is_severed {
            employee.is_severed = is_severed;
        }
        if let Some(mode) = self.mode {
            employee.mode = mode;
        }
    }
}

/// A collection of employee records. Every call is one self-contained unit of
/// work; implementations hold no cross-request state beyond their backend.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Employee>>;

    async fn get(&self, id: i32) -> StoreResult<Employee>;

    async fn create(&self, employee: NewEmployee) -> StoreResult<Employee>;

    async fn update(&self, id: i32, changes: EmployeeChanges) -> StoreResult<Employee>;

    async fn delete(&self, id: i32) -> StoreResult<()>;

    async fn toggle_mode(&self, id: i32) -> StoreResult<Employee>;

    /// Whether the backing storage is reachable.
    async fn ping(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark() -> Employee {
        Employee {
            id: 1,
            first_name: "Mark".into(),
            last_name: "Scout".into(),
            department: "Macrodata Refinement".into(),
            is_severed: true,
            mode: "innie".into(),
        }
    }

    #[test]
    fn empty_changes_leave_record_untouched() {
        let changes: EmployeeChanges = serde_json::from_str("{}").unwrap();
        assert!(changes.is_empty());
        let mut employee = mark();
        changes.apply_to(&mut employee);
        assert_eq!(employee, mark());
    }

    #[test]
    fn partial_changes_overwrite_only_supplied_fields() {
        let changes: EmployeeChanges =
            serde_json::from_str(r#"{"department": "Severed Floor", "id": 42}"#).unwrap();
        assert!(!changes.is_empty());
        let mut employee = mark();
        changes.apply_to(&mut employee);
        assert_eq!(employee.department, "Severed Floor");
        assert_eq!(employee.id, 1);
        assert_eq!(employee.first_name, "Mark");
        assert_eq!(employee.mode, "innie");
    }

    #[test]
    fn new_employee_defaults() {
        let employee = NewEmployee::new("Helly", "R", "Macrodata Refinement");
        assert!(!employee.is_severed);
        assert_eq!(employee.mode, "outie");
    }
}
