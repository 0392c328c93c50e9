use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
};
use std::collections::HashMap;
use crate::state::AppState;
use std::sync::Arc;

/// Tenant scope for dashboard routes: resolves the `{owner_id}` path segment
/// and rejects requests for owners that do not exist.
pub struct OwnerId(pub String);

impl FromRequestParts<Arc<AppState>> for OwnerId {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?;

        let owner_id = params.get("owner_id").ok_or(StatusCode::BAD_REQUEST)?;

        match state.owner_repo.find_by_id(owner_id).await {
            Ok(Some(_)) => Ok(OwnerId(owner_id.clone())),
            Ok(None) => Err(StatusCode::NOT_FOUND),
            Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
