use axum::{extract::State, http::StatusCode};
use garde::Validate;

use crate::error::{AppError, ErrorResponse};
use crate::extract::{Json, Path, Query};
use crate::models::NewUser;
use crate::schemas::{ListParams, UserCreate, UserSchema, UserUpdate};
use crate::services::password::hash_password;
use crate::state::AppState;

/// ユーザー作成ハンドラー
///
/// POST /users
///
/// # Security
/// - パスワードはログに出力しない
/// - パスワードは即座にハッシュ化
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = UserCreate,
    responses(
        (status = 201, description = "作成成功", body = UserSchema),
        (status = 400, description = "バリデーションエラー", body = ErrorResponse),
        (status = 422, description = "JSON ボディが不正", body = ErrorResponse),
        (status = 500, description = "内部エラー", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserSchema>), AppError> {
    request.validate()?;

    let password_hash = hash_password(request.password).await?;

    let mut repo = state.users.begin().await?;
    let user = repo
        .add(NewUser {
            name: request.name,
            surname: request.surname,
            password_hash,
        })
        .await?;
    repo.commit().await?;

    tracing::info!(user_id = user.id, "ユーザー作成成功");

    Ok((StatusCode::CREATED, Json(UserSchema::from(&user))))
}

/// ユーザー一覧ハンドラー
///
/// GET /users?page=1&page_size=10
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(ListParams),
    responses(
        (status = 200, description = "ID 順の一覧", body = [UserSchema]),
        (status = 400, description = "ページング指定が不正", body = ErrorResponse),
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<UserSchema>>, AppError> {
    params.validate()?;

    let mut repo = state.users.begin().await?;
    let users = repo.list(params.limit(), params.offset()).await?;

    Ok(Json(users.iter().map(UserSchema::from).collect()))
}

/// ユーザー取得ハンドラー
///
/// GET /users/{id}
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "ユーザーID")),
    responses(
        (status = 200, description = "取得成功", body = UserSchema),
        (status = 404, description = "ユーザーが存在しない", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserSchema>, AppError> {
    let mut repo = state.users.begin().await?;
    let user = repo.get(user_id).await?;

    Ok(Json(UserSchema::from(&user)))
}

/// ユーザー更新ハンドラー
///
/// PUT /users/{id}
///
/// 指定されたフィールドのみ更新する。パスワード指定時は再ハッシュ化。
/// ハッシュ化はトランザクション開始前に済ませ、接続を握ったまま待たない。
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "ユーザーID")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "更新成功", body = UserSchema),
        (status = 400, description = "バリデーションエラー", body = ErrorResponse),
        (status = 404, description = "ユーザーが存在しない", body = ErrorResponse),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<UserUpdate>,
) -> Result<Json<UserSchema>, AppError> {
    request.validate()?;

    let password_hash = match request.password {
        Some(password) => Some(hash_password(password).await?),
        None => None,
    };

    let mut repo = state.users.begin().await?;
    let mut user = repo.get(user_id).await?;

    if let Some(name) = request.name {
        user.name = name;
    }
    if let Some(surname) = request.surname {
        user.surname = surname;
    }
    if let Some(password_hash) = password_hash {
        user.password_hash = password_hash;
    }

    let user = repo.update(user).await?;
    repo.commit().await?;

    tracing::info!(user_id = user.id, "ユーザー更新成功");

    Ok(Json(UserSchema::from(&user)))
}

/// ユーザー削除ハンドラー
///
/// DELETE /users/{id}
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "ユーザーID")),
    responses(
        (status = 204, description = "削除成功"),
        (status = 404, description = "ユーザーが存在しない", body = ErrorResponse),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut repo = state.users.begin().await?;
    repo.get(user_id).await?;
    repo.delete(user_id).await?;
    repo.commit().await?;

    tracing::info!(user_id, "ユーザー削除成功");

    Ok(StatusCode::NO_CONTENT)
}
