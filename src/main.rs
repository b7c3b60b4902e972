use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use userapi::{config::Config, repositories::PgStore, router::create_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ログ形式が DEBUG に依存するため設定を先に読む
    let config = Config::load().context("設定の読み込みに失敗")?;
    init_tracing(config.debug);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("HOST / PORT が不正")?;

    let db_pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.database_url.expose_secret())
        .await
        .context("データベース接続に失敗")?;
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("マイグレーションに失敗")?;
    tracing::info!(max_connections = config.max_connections, "データベース準備完了");

    let app = create_router(AppState::new(Arc::new(PgStore::new(db_pool)), config));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} へのバインドに失敗"))?;

    tracing::info!(%addr, "サーバー起動");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("サーバーエラー")?;
    tracing::info!("サーバー終了");

    Ok(())
}

/// RUST_LOG があればそれに従う。DEBUG=true なら人間向け、それ以外は JSON
fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info,tower_http=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(debug.then(|| fmt::layer().pretty()))
        .with((!debug).then(|| fmt::layer().json()))
        .init();
}

/// SIGINT か SIGTERM を受けたら完了する
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = ?e, "SIGINT を待機できません");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = ?e, "SIGTERM を待機できません");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    tracing::info!(signal = received, "graceful shutdown 開始");
}
