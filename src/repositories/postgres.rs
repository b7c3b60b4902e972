use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};

use super::{Entity, Repository, RepositoryError, Store};

/// PostgreSQL のテーブルに対応付けられたエンティティ
pub trait PgEntity: Entity + for<'r> FromRow<'r, PgRow> {
    /// テーブル名（予約語の場合はクォート済みで指定）
    const TABLE: &'static str;
    /// SELECT / RETURNING で取得する列
    const COLUMNS: &'static str;

    /// `(cols) VALUES (...)` を組み立てる
    fn push_insert<'q>(draft: &'q Self::Draft, query: &mut QueryBuilder<'q, Postgres>);

    /// `SET` 以降の代入句を組み立てる（`updated_at` の更新を含む）
    fn push_assignments<'q>(&'q self, query: &mut QueryBuilder<'q, Postgres>);
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<T: PgEntity> Store<T> for PgStore {
    async fn begin(&self) -> Result<Box<dyn Repository<T>>, RepositoryError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgRepository::<T> {
            tx,
            _entity: PhantomData,
        }))
    }
}

/// トランザクションに束縛されたリポジトリ
///
/// drop 時に未コミットであれば sqlx がロールバックし、接続をプールへ返す。
pub struct PgRepository<T> {
    tx: Transaction<'static, Postgres>,
    _entity: PhantomData<fn() -> T>,
}

#[async_trait]
impl<T: PgEntity> Repository<T> for PgRepository<T> {
    async fn add(&mut self, draft: T::Draft) -> Result<T, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("INSERT INTO {} ", T::TABLE));
        T::push_insert(&draft, &mut query);
        query.push(" RETURNING ").push(T::COLUMNS);

        let record = query.build_query_as::<T>().fetch_one(&mut *self.tx).await?;
        Ok(record)
    }

    async fn get(&mut self, id: i64) -> Result<T, RepositoryError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", T::COLUMNS, T::TABLE);
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or(RepositoryError::NotFound {
                entity: T::NAME,
                id,
            })
    }

    async fn list(&mut self, limit: i64, offset: i64) -> Result<Vec<T>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id LIMIT $1 OFFSET $2",
            T::COLUMNS,
            T::TABLE
        );
        let records = sqlx::query_as::<_, T>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(records)
    }

    async fn update(&mut self, record: T) -> Result<T, RepositoryError> {
        let id = record.id();
        let mut query = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", T::TABLE));
        record.push_assignments(&mut query);
        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(T::COLUMNS);

        query
            .build_query_as::<T>()
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or(RepositoryError::NotFound {
                entity: T::NAME,
                id,
            })
    }

    async fn delete(&mut self, id: i64) -> Result<(), RepositoryError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&mut *self.tx).await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound {
                entity: T::NAME,
                id,
            });
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let PgRepository { tx, .. } = *self;
        tx.commit().await?;
        Ok(())
    }
}
