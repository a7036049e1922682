use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, request::Parts},
    routing::{get, post},
};
use platform_api::{ApiError, ApiResult, MessageBody};
use platform_db::{Employee, EmployeeChanges, NewEmployee};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{info, instrument};

use super::AppState;

const MISSING_DATA: &str = "Missing data for new employee";

/// Routes for the authenticated surface; DELETE answers with an empty 204.
pub fn routes(prefix: &str) -> Router<AppState> {
    Router::new()
        .route(prefix, get(list_employees).post(create_employee))
        .route(
            &format!("{prefix}/{{id}}"),
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
        .route(&format!("{prefix}/{{id}}/toggle-mode"), post(toggle_mode))
}

/// The older unauthenticated surface. Its DELETE returns 204 together with a
/// JSON message, which older clients read.
pub fn legacy_routes(prefix: &str) -> Router<AppState> {
    Router::new()
        .route(prefix, get(list_employees).post(create_employee))
        .route(
            &format!("{prefix}/{{id}}"),
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee_with_message),
        )
        .route(&format!("{prefix}/{{id}}/toggle-mode"), post(toggle_mode))
}

/// Path id. Anything that is not an integer cannot name an employee, so it
/// is reported as not found rather than as a malformed request.
pub struct EmployeeId(pub i32);

impl<S> FromRequestParts<S> for EmployeeId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound)?;
        Ok(Self(id))
    }
}

#[derive(Debug, Default, Deserialize)]
struct CreateEmployee {
    first_name: Option<String>,
    last_name: Option<String>,
    department: Option<String>,
    is_severed: Option<bool>,
    mode: Option<String>,
}

impl CreateEmployee {
    fn into_new(self) -> Option<NewEmployee> {
        let mut employee = NewEmployee::new(self.first_name?, self.last_name?, self.department?);
        if let Some(is_severed) = self.is_severed {
            employee = employee.severed(is_severed);
        }
        if let Some(mode) = self.mode {
            employee = employee.mode(mode);
        }
        Some(employee)
    }
}

/// An empty body decodes to `T::default()`.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::bad_request(format!("Invalid JSON body: {err}")))
}

#[instrument(name = "employees.list", skip_all)]
async fn list_employees(State(state): State<AppState>) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(state.store.list().await?))
}

#[instrument(name = "employees.get", skip(state))]
async fn get_employee(
    State(state): State<AppState>,
    EmployeeId(id): EmployeeId,
) -> ApiResult<Json<Employee>> {
    Ok(Json(state.store.get(id).await?))
}

#[instrument(name = "employees.create", skip_all)]
async fn create_employee(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let payload: CreateEmployee = parse_body(&body)?;
    let new = payload
        .into_new()
        .ok_or_else(|| ApiError::bad_request(MISSING_DATA))?;
    let employee = state.store.create(new).await?;
    info!(id = employee.id, "employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

#[instrument(name = "employees.update", skip(state, body))]
async fn update_employee(
    State(state): State<AppState>,
    EmployeeId(id): EmployeeId,
    body: Bytes,
) -> ApiResult<Json<Employee>> {
    let changes: EmployeeChanges = parse_body(&body)?;
    Ok(Json(state.store.update(id, changes).await?))
}

#[instrument(name = "employees.delete", skip(state))]
async fn delete_employee(
    State(state): State<AppState>,
    EmployeeId(id): EmployeeId,
) -> ApiResult<StatusCode> {
    state.store.delete(id).await?;
    info!(id, "employee deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "employees.delete_legacy", skip(state))]
async fn delete_employee_with_message(
    State(state): State<AppState>,
    EmployeeId(id): EmployeeId,
) -> ApiResult<(StatusCode, Json<MessageBody>)> {
    state.store.delete(id).await?;
    info!(id, "employee deleted");
    Ok((
        StatusCode::NO_CONTENT,
        Json(MessageBody::new("Employee deleted")),
    ))
}

#[instrument(name = "employees.toggle_mode", skip(state))]
async fn toggle_mode(
    State(state): State<AppState>,
    EmployeeId(id): EmployeeId,
) -> ApiResult<Json<Employee>> {
    let employee = state.store.toggle_mode(id).await?;
    info!(id, mode = %employee.mode, "employee mode toggled");
    Ok(Json(employee))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_all_text_fields() {
        let payload: CreateEmployee =
            serde_json::from_str(r#"{"first_name": "Ricken"}"#).unwrap();
        assert!(payload.into_new().is_none());

        let payload: CreateEmployee = serde_json::from_str(
            r#"{"first_name": "Gemma", "last_name": "Scout", "department": "Testing", "mode": "innie"}"#,
        )
        .unwrap();
        let new = payload.into_new().unwrap();
        assert_eq!(new.mode, "innie");
        assert!(!new.is_severed);
    }

    #[test]
    fn blank_bodies_decode_to_defaults() {
        let changes: EmployeeChanges = parse_body(&Bytes::from_static(b"  \n")).unwrap();
        assert!(changes.is_empty());
        let err = parse_body::<EmployeeChanges>(&Bytes::from_static(b"{oops")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
