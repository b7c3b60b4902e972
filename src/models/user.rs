use sqlx::{FromRow, Postgres, QueryBuilder};
use time::{Duration, PrimitiveDateTime};

use crate::repositories::{Entity, PgEntity};

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub surname: String,
    /// argon2id の PHC 文字列。レスポンスやログには出さない
    pub password_hash: String,
    /// UTC（タイムゾーン情報なし）
    pub created_at: PrimitiveDateTime,
    /// UTC（タイムゾーン情報なし）
    pub updated_at: PrimitiveDateTime,
}

/// 作成前のユーザー（パスワードはハッシュ化済み）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub password_hash: String,
}

impl Entity for User {
    const NAME: &'static str = "ユーザー";

    type Draft = NewUser;

    fn id(&self) -> i64 {
        self.id
    }

    fn materialize(id: i64, now: PrimitiveDateTime, draft: NewUser) -> Self {
        Self {
            id,
            name: draft.name,
            surname: draft.surname,
            password_hash: draft.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self, now: PrimitiveDateTime) {
        // 同一マイクロ秒内の連続更新でも単調増加させる
        self.updated_at = now.max(self.updated_at + Duration::microseconds(1));
    }
}

impl PgEntity for User {
    const TABLE: &'static str = r#""user""#;
    const COLUMNS: &'static str = "id, name, surname, password_hash, created_at, updated_at";

    fn push_insert<'q>(draft: &'q NewUser, query: &mut QueryBuilder<'q, Postgres>) {
        query.push("(name, surname, password_hash) VALUES (");
        let mut values = query.separated(", ");
        values.push_bind(draft.name.as_str());
        values.push_bind(draft.surname.as_str());
        values.push_bind(draft.password_hash.as_str());
        values.push_unseparated(")");
    }

    fn push_assignments<'q>(&'q self, query: &mut QueryBuilder<'q, Postgres>) {
        let mut set = query.separated(", ");
        set.push("name = ").push_bind_unseparated(self.name.as_str());
        set.push("surname = ")
            .push_bind_unseparated(self.surname.as_str());
        set.push("password_hash = ")
            .push_bind_unseparated(self.password_hash.as_str());
        // 同一トランザクション内の連続更新でも単調増加させる
        set.push(
            "updated_at = GREATEST(NOW() AT TIME ZONE 'UTC', updated_at + INTERVAL '1 microsecond')",
        );
    }
}
