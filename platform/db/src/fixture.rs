use std::{collections::HashSet, path::Path};

use async_trait::async_trait;
use tracing::info;

use crate::store::{
    Employee, EmployeeChanges, EmployeeStore, NewEmployee, StoreError, StoreResult,
};

/// Read-only records loaded once from a JSON array at startup.
#[derive(Clone, Debug, Default)]
pub struct StaticEmployeeStore {
    records: Vec<Employee>,
}

impl StaticEmployeeStore {
    pub fn from_records(records: Vec<Employee>) -> Self {
        Self { records }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<Employee> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let mut seen = HashSet::with_capacity(records.len());
        if let Some(duplicate) = records.iter().find(|employee| !seen.insert(employee.id)) {
            return Err(StoreError::DuplicateId {
                path: path.to_path_buf(),
                id: duplicate.id,
            });
        }
        info!(path = %path.display(), count = records.len(), "loaded static employees");
        Ok(Self::from_records(records))
    }
}

#[async_trait]
impl EmployeeStore for StaticEmployeeStore {
    async fn list(&self) -> StoreResult<Vec<Employee>> {
        Ok(self.records.clone())
    }

    async fn get(&self, id: i32) -> StoreResult<Employee> {
        self.records
            .iter()
            .find(|employee| employee.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, _employee: NewEmployee) -> StoreResult<Employee> {
        Err(StoreError::ReadOnly)
    }

    async fn update(&self, _id: i32, _changes: EmployeeChanges) -> StoreResult<Employee> {
        Err(StoreError::ReadOnly)
    }

    async fn delete(&self, _id: i32) -> StoreResult<()> {
        Err(StoreError::ReadOnly)
    }

    async fn toggle_mode(&self, _id: i32) -> StoreResult<Employee> {
        Err(StoreError::ReadOnly)
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"[
        {"id": 1, "first_name": "Mark", "last_name": "Scout", "department": "Macrodata Refinement", "is_severed": true, "mode": "innie"},
        {"id": 4, "first_name": "Harmony", "last_name": "Cobel", "department": "Management"}
    ]"#;

    fn fixture_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("lumon-{}-{}.json", name, std::process::id()));
        path
    }

    #[tokio::test]
    async fn loads_records_and_scans_by_id() {
        let path = fixture_path("load");
        tokio::fs::write(&path, FIXTURE).await.unwrap();
        let store = StaticEmployeeStore::from_path(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(store.list().await.unwrap().len(), 2);
        let harmony = store.get(4).await.unwrap();
        assert_eq!(harmony.last_name, "Cobel");
        assert_eq!(harmony.mode, "outie");
        assert!(matches!(store.get(2).await, Err(StoreError::NotFound(2))));
    }

    #[tokio::test]
    async fn rejects_every_mutation() {
        let store = StaticEmployeeStore::from_records(Vec::new());
        assert!(matches!(
            store.create(NewEmployee::new("Helly", "R", "MDR")).await,
            Err(StoreError::ReadOnly)
        ));
        assert!(matches!(
            store.update(1, EmployeeChanges::default()).await,
            Err(StoreError::ReadOnly)
        ));
        assert!(matches!(store.delete(1).await, Err(StoreError::ReadOnly)));
        assert!(matches!(store.toggle_mode(1).await, Err(StoreError::ReadOnly)));
    }

    #[tokio::test]
    async fn reports_unreadable_and_malformed_files() {
        let missing = fixture_path("missing");
        assert!(matches!(
            StaticEmployeeStore::from_path(&missing).await,
            Err(StoreError::Read { .. })
        ));

        let malformed = fixture_path("malformed");
        tokio::fs::write(&malformed, "{\"id\": 1}").await.unwrap();
        let result = StaticEmployeeStore::from_path(&malformed).await;
        let _ = tokio::fs::remove_file(&malformed).await;
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }

    #[tokio::test]
    async fn rejects_files_with_repeated_ids() {
        let path = fixture_path("duplicate");
        let records = r#"[
            {"id": 1, "first_name": "Mark", "last_name": "Scout", "department": "Macrodata Refinement"},
            {"id": 1, "first_name": "Helly", "last_name": "R", "department": "Macrodata Refinement"}
        ]"#;
        tokio::fs::write(&path, records).await.unwrap();
        let result = StaticEmployeeStore::from_path(&path).await;
        let _ = tokio::fs::remove_file(&path).await;
        assert!(matches!(result, Err(StoreError::DuplicateId { id: 1, .. })));
    }
}
