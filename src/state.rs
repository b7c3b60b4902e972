use std::sync::Arc;

use crate::config::Config;
use crate::models::User;
use crate::repositories::Store;

/// アプリケーション共有状態
///
/// axum の State として全ハンドラーで共有される。
/// Clone は必須（axum が内部で clone するため）。
#[derive(Clone)]
pub struct AppState {
    /// ユーザーストア（リクエストごとにトランザクションを払い出す）
    pub users: Arc<dyn Store<User>>,
    /// アプリケーション設定（Arc で共有）
    pub config: Arc<Config>,
}

impl AppState {
    /// 新しい AppState を作成
    pub fn new(users: Arc<dyn Store<User>>, config: Config) -> Self {
        Self {
            users,
            config: Arc::new(config),
        }
    }
}
