//! OpenAPI ドキュメント
//!
//! `/openapi.json` で配信し、Swagger UI は `/swagger` に置く。

use utoipa::OpenApi;

use crate::config::Config;
use crate::error::ErrorResponse;
use crate::handlers::{health, health::HealthResponse, users};
use crate::schemas::{UserCreate, UserSchema, UserUpdate};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::create_user,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
    ),
    components(schemas(
        UserSchema,
        UserCreate,
        UserUpdate,
        ErrorResponse,
        HealthResponse
    )),
    tags(
        (name = "users", description = "ユーザーの作成・参照・更新・削除"),
        (name = "health", description = "稼働確認"),
    )
)]
pub struct ApiDoc;

/// 設定のタイトルと説明文を反映したドキュメントを組み立てる
pub fn api_doc(config: &Config) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = config.app_title.clone();
    doc.info.description = Some(config.app_description.clone());
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc
}
