use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use platform_api::ApiError;
use platform_authn::API_KEY_HEADER;
use tracing::warn;

use super::AppState;

/// Short-circuits with 401 before the handler runs, so callers learn nothing
/// about whether the addressed record exists.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    if let Err(err) = state.gate.verify(presented) {
        warn!(%err, method = %request.method(), path = %request.uri().path(), "request rejected");
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(request).await)
}
