use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(value_type = String, example = "ok")]
    pub status: &'static str,
    pub title: String,
    #[schema(value_type = String)]
    pub version: &'static str,
}

/// ヘルスチェックハンドラー
///
/// GET /health
///
/// サービスの稼働状況を返す。
/// ロードバランサーやモニタリングツールから呼び出される。
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "稼働中", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        title: state.config.app_title.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::User;
    use crate::repositories::memory::MemoryStore;
    use crate::testing::test_config;

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        let state = AppState::new(Arc::new(MemoryStore::<User>::default()), test_config());
        let response = health_check(State(state)).await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.title, "User Management API");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }
}
