//! テスト用のインメモリストア
//!
//! `begin()` 時点のスナップショットを読み取りに使い、書き込みは変更ログとして
//! 積んでおく。`commit()` では変更ログだけを共有テーブルへ適用するため、
//! 並行するトランザクションは行単位で後勝ちになる。
//! 未コミットの変更は drop で破棄される。ID はロールバックされても再利用しない。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::{OffsetDateTime, PrimitiveDateTime};

use super::{Entity, Repository, RepositoryError, Store};

pub struct MemoryStore<T> {
    rows: Arc<Mutex<BTreeMap<i64, T>>>,
    next_id: Arc<AtomicI64>,
    fail_commits: Arc<AtomicBool>,
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            next_id: self.next_id.clone(),
            fail_commits: self.fail_commits.clone(),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            rows: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            fail_commits: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<T: Entity> MemoryStore<T> {
    /// コミット済みのレコードを ID 順で返す
    pub fn committed(&self) -> Vec<T> {
        self.rows
            .lock()
            .expect("memory table poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// 以降の `commit()` をデータベースエラーにする
    pub fn fail_commits(&self) {
        self.fail_commits.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl<T: Entity> Store<T> for MemoryStore<T> {
    async fn begin(&self) -> Result<Box<dyn Repository<T>>, RepositoryError> {
        let view = self.rows.lock().expect("memory table poisoned").clone();
        Ok(Box::new(MemoryRepository {
            store: self.clone(),
            view,
            changes: Vec::new(),
        }))
    }
}

enum Change<T> {
    Put(T),
    Remove(i64),
}

struct MemoryRepository<T> {
    store: MemoryStore<T>,
    view: BTreeMap<i64, T>,
    changes: Vec<Change<T>>,
}

impl<T: Entity> MemoryRepository<T> {
    fn not_found(id: i64) -> RepositoryError {
        RepositoryError::NotFound {
            entity: T::NAME,
            id,
        }
    }

    fn put(&mut self, record: T) {
        self.view.insert(record.id(), record.clone());
        self.changes.push(Change::Put(record));
    }
}

fn now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn add(&mut self, draft: T::Draft) -> Result<T, RepositoryError> {
        let id = self.store.next_id.fetch_add(1, Ordering::SeqCst);
        let record = T::materialize(id, now_utc(), draft);
        self.put(record.clone());
        Ok(record)
    }

    async fn get(&mut self, id: i64) -> Result<T, RepositoryError> {
        self.view.get(&id).cloned().ok_or(Self::not_found(id))
    }

    async fn list(&mut self, limit: i64, offset: i64) -> Result<Vec<T>, RepositoryError> {
        Ok(self
            .view
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn update(&mut self, mut record: T) -> Result<T, RepositoryError> {
        let id = record.id();
        if !self.view.contains_key(&id) {
            return Err(Self::not_found(id));
        }
        record.touch(now_utc());
        self.put(record.clone());
        Ok(record)
    }

    async fn delete(&mut self, id: i64) -> Result<(), RepositoryError> {
        self.view.remove(&id).ok_or(Self::not_found(id))?;
        self.changes.push(Change::Remove(id));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        if self.store.fail_commits.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        let MemoryRepository { store, changes, .. } = *self;
        let mut rows = store.rows.lock().expect("memory table poisoned");
        for change in changes {
            match change {
                Change::Put(record) => {
                    rows.insert(record.id(), record);
                }
                Change::Remove(id) => {
                    rows.remove(&id);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, User};

    fn draft(name: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            surname: "Doe".to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_interleaved_transactions_keep_both_writes() {
        let store = MemoryStore::<User>::default();
        let mut first: Box<dyn Repository<User>> = store.begin().await.unwrap();
        let mut second: Box<dyn Repository<User>> = store.begin().await.unwrap();

        first.add(draft("John")).await.unwrap();
        second.add(draft("Jane")).await.unwrap();
        second.commit().await.unwrap();
        first.commit().await.unwrap();

        let names: Vec<_> = store.committed().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["John", "Jane"]);
    }

    #[tokio::test]
    async fn test_dropped_transaction_is_discarded() {
        let store = MemoryStore::<User>::default();
        {
            let mut repo: Box<dyn Repository<User>> = store.begin().await.unwrap();
            repo.add(draft("Ghost")).await.unwrap();
        }
        assert!(store.committed().is_empty());
    }
}
