use std::fmt;

use garde::Validate;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use utoipa::{IntoParams, ToSchema};

use crate::models::User;

// ISO-8601、タイムゾーン指定子なし（値は UTC）
time::serde::format_description!(
    naive_utc,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]"
);

/// ユーザーのレスポンス表現（パスワードは含まない）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserSchema {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(with = "naive_utc")]
    #[schema(value_type = String, example = "2025-04-24T00:38:12.160170")]
    pub created_at: PrimitiveDateTime,
    #[serde(with = "naive_utc")]
    #[schema(value_type = String, example = "2025-04-24T00:38:12.160170")]
    pub updated_at: PrimitiveDateTime,
}

impl From<&User> for UserSchema {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            surname: user.surname.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// ユーザー作成リクエスト
#[derive(Deserialize, Validate, ToSchema)]
pub struct UserCreate {
    /// 1〜100文字
    #[garde(length(chars, min = 1, max = 100))]
    pub name: String,
    /// 1〜100文字
    #[garde(length(chars, min = 1, max = 100))]
    pub surname: String,
    /// 8〜100文字。受信後すぐにハッシュ化する
    #[garde(length(chars, min = 8, max = 100))]
    pub password: String,
}

/// ユーザー更新リクエスト（指定されたフィールドのみ更新）
#[derive(Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UserUpdate {
    #[garde(length(chars, min = 1, max = 100))]
    pub name: Option<String>,
    #[garde(length(chars, min = 1, max = 100))]
    pub surname: Option<String>,
    #[garde(length(chars, min = 8, max = 100))]
    pub password: Option<String>,
}

// パスワードがログに出ないよう Debug は手書き
impl fmt::Debug for UserCreate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCreate")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 10;

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// 一覧取得のページング指定
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// ページ番号（1始まり）
    #[serde(default = "default_page")]
    #[garde(range(min = 1))]
    #[param(minimum = 1, default = 1)]
    pub page: u32,
    /// 1ページあたりの件数（1〜100）
    #[serde(default = "default_page_size")]
    #[garde(range(min = 1, max = 100))]
    #[param(minimum = 1, maximum = 100, default = 10)]
    pub page_size: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListParams {
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }
}
