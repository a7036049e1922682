use async_trait::async_trait;
use entity::employees;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryOrder, Set, Statement,
};
use tracing::{debug, instrument};

use crate::{
    DbPool,
    store::{Employee, EmployeeChanges, EmployeeStore, NewEmployee, StoreError, StoreResult},
};

/// Employee records persisted as rows of the `employees` table.
#[derive(Clone, Debug)]
pub struct DbEmployeeStore {
    pool: DbPool,
}

impl DbEmployeeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn find(&self, id: i32) -> StoreResult<Employee> {
        employees::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }
}

/// A row deleted between the read and the write of an update surfaces as
/// `RecordNotUpdated`; callers see it as the record being gone.
fn vanished_as_not_found(id: i32) -> impl FnOnce(DbErr) -> StoreError {
    move |err| match err {
        DbErr::RecordNotUpdated => StoreError::NotFound(id),
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl EmployeeStore for DbEmployeeStore {
    #[instrument(name = "store.list", skip_all)]
    async fn list(&self) -> StoreResult<Vec<Employee>> {
        let rows = employees::Entity::find()
            .order_by_asc(employees::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows)
    }

    #[instrument(name = "store.get", skip(self))]
    async fn get(&self, id: i32) -> StoreResult<Employee> {
        self.find(id).await
    }

    #[instrument(name = "store.create", skip_all)]
    async fn create(&self, employee: NewEmployee) -> StoreResult<Employee> {
        let model = employees::ActiveModel {
            id: NotSet,
            first_name: Set(employee.first_name),
            last_name: Set(employee.last_name),
            department: Set(employee.department),
            is_severed: Set(employee.is_severed),
            mode: Set(employee.mode),
        };
        let created = model.insert(&self.pool).await?;
        debug!(id = created.id, "employee inserted");
        Ok(created)
    }

    #[instrument(name = "store.update", skip(self, changes))]
    async fn update(&self, id: i32, changes: EmployeeChanges) -> StoreResult<Employee> {
        let current = self.find(id).await?;
        if changes.is_empty() {
            return Ok(current);
        }
        let mut model = current.into_active_model();
        if let Some(first_name) = changes.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(department) = changes.department {
            model.department = Set(department);
        }
        if let Some(is_severed) = changes.is_severed {
            model.is_severed = Set(is_severed);
        }
        if let Some(mode) = changes.mode {
            model.mode = Set(mode);
        }
        model
            .update(&self.pool)
            .await
            .map_err(vanished_as_not_found(id))
    }

    #[instrument(name = "store.delete", skip(self))]
    async fn delete(&self, id: i32) -> StoreResult<()> {
        let result = employees::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    #[instrument(name = "store.toggle_mode", skip(self))]
    async fn toggle_mode(&self, id: i32) -> StoreResult<Employee> {
        let current = self.find(id).await?;
        let next = employees::toggled_mode(&current.mode);
        let mut model = current.into_active_model();
        model.mode = Set(next.to_string());
        model
            .update(&self.pool)
            .await
            .map_err(vanished_as_not_found(id))
    }

    async fn ping(&self) -> bool {
        let backend = self.pool.get_database_backend();
        self.pool
            .execute(Statement::from_string(backend, "SELECT 1".to_string()))
            .await
            .is_ok()
    }
}
