//! ハンドラーテスト用のサーバー起動ヘルパー

use std::sync::Arc;

use secrecy::SecretBox;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::models::User;
use crate::repositories::memory::MemoryStore;
use crate::router::create_router;
use crate::state::AppState;

pub struct TestApp {
    /// `http://127.0.0.1:<port>`
    pub address: String,
    pub store: MemoryStore<User>,
}

pub fn test_config() -> Config {
    Config {
        database_url: SecretBox::new(Box::new("postgres://unused".to_string())),
        host: "127.0.0.1".to_string(),
        port: 0,
        max_connections: 1,
        app_title: "User Management API".to_string(),
        app_description: "REST API for managing users".to_string(),
        debug: false,
    }
}

/// インメモリストアでサーバーを空きポートに起動
pub async fn spawn_app() -> TestApp {
    let store = MemoryStore::<User>::default();
    let state = AppState::new(Arc::new(store.clone()), test_config());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    TestApp { address, store }
}
