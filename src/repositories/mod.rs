//! 汎用リポジトリ
//!
//! `Repository<T>` は 1 トランザクションに束縛された作業単位。
//! `Store<T>::begin()` でリクエストごとに取得し、`commit()` しないまま
//! drop されるとロールバックされる。

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use time::PrimitiveDateTime;

pub use postgres::{PgEntity, PgStore};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} (ID: {id}) が見つかりません")]
    NotFound { entity: &'static str, id: i64 },

    #[error("データベースエラー")]
    Database(#[from] sqlx::Error),
}

/// 永続化されるレコード
///
/// `id` と `created_at` / `updated_at` はストア側で採番・設定される。
pub trait Entity: Clone + Send + Sync + Unpin + 'static {
    /// エラーメッセージに使うエンティティ名
    const NAME: &'static str;

    /// 作成時に呼び出し側が渡す値（サーバー採番フィールドを含まない）
    type Draft: Send + Sync + 'static;

    fn id(&self) -> i64;

    /// 採番済みの値から新しいレコードを組み立てる
    fn materialize(id: i64, now: PrimitiveDateTime, draft: Self::Draft) -> Self;

    /// 更新日時を進める
    fn touch(&mut self, now: PrimitiveDateTime);
}

#[async_trait]
pub trait Repository<T: Entity>: Send {
    /// レコードを追加し、採番済みのレコードを返す（確定は `commit`）
    async fn add(&mut self, draft: T::Draft) -> Result<T, RepositoryError>;

    async fn get(&mut self, id: i64) -> Result<T, RepositoryError>;

    /// ID 昇順（= 挿入順）で取得
    async fn list(&mut self, limit: i64, offset: i64) -> Result<Vec<T>, RepositoryError>;

    /// 読み込み済みレコードの変更を保存し、`updated_at` を更新する
    async fn update(&mut self, record: T) -> Result<T, RepositoryError>;

    async fn delete(&mut self, id: i64) -> Result<(), RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}

/// リクエスト単位のリポジトリを払い出すストア
#[async_trait]
pub trait Store<T: Entity>: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn Repository<T>>, RepositoryError>;
}
