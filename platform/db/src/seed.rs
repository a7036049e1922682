use tracing::info;

use crate::store::{EmployeeStore, NewEmployee, StoreResult};

/// The Macrodata Refinement team every fresh database starts with.
pub fn default_employees() -> Vec<NewEmployee> {
    [("Mark", "Scout"), ("Dylan", "George"), ("Irving", "Bailiff")]
        .into_iter()
        .map(|(first, last)| {
            NewEmployee::new(first, last, "Macrodata Refinement")
                .severed(true)
                .mode(entity::employees::MODE_INNIE)
        })
        .collect()
}

/// Inserts [`default_employees`] when the store is empty and returns how many
/// records were added. The emptiness check and the inserts are separate units
/// of work, so two processes starting together may both seed.
pub async fn ensure_seeded(store: &dyn EmployeeStore) -> StoreResult<usize> {
    if !store.list().await?.is_empty() {
        return Ok(0);
    }
    let mut inserted = 0;
    for employee in default_employees() {
        store.create(employee).await?;
        inserted += 1;
    }
    info!(inserted, "pre-populated employees");
    Ok(inserted)
}
