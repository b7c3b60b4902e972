use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher};
use tokio::task::spawn_blocking;

use crate::error::AppError;

/// パスワードをargon2idでハッシュ化
///
/// CPU を占有する処理のため blocking スレッドで実行し、
/// ランタイムのワーカーを塞がない。
///
/// # Security
/// 平文パスワードはログに出力しない
pub async fn hash_password(password: String) -> Result<String, AppError> {
    spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "パスワードハッシュタスクの実行に失敗");
            AppError::Internal(anyhow::anyhow!("password hash task failed"))
        })?
}

fn hash_blocking(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!(error = ?e, "パスワードハッシュ生成エラー");
            AppError::Internal(anyhow::anyhow!("password hash error"))
        })?;
    Ok(hash.to_string())
}

#[cfg(test)]
pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{PasswordHash, PasswordVerifier};

    let parsed_hash = PasswordHash::new(hash).expect("stored hash is a PHC string");
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
