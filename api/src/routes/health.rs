//! Liveness endpoint reporting backing store reachability

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing_actix_web::RequestId;

use sp_shared::ApiResponse;

use crate::state::AppState;

/// GET /health
///
/// 200 when both the database and the cache answer, 503 otherwise. The
/// body names the side that is down so probes do not have to guess.
pub async fn health(state: web::Data<AppState>, request_id: RequestId) -> HttpResponse {
    let database = state.db.health_check().await.unwrap_or(false);
    let cache = state.cache.health_check().await.unwrap_or(false);

    let body = ApiResponse::success(json!({
        "database": database,
        "cache": cache,
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .with_request_id(request_id.to_string());

    if database && cache {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
