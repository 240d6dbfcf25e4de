//! # RTC Token Server エントリポイント
//!
//! ## 起動シーケンス
//! 1. 環境変数の読み込み（`APP_ID`, `APP_CERTIFICATE` は必須）
//! 2. トークンビルダーの選択（`MOCK_MODE=true` ならモック）
//! 3. ルーター構築・待ち受け開始

use std::sync::Arc;

use rtc_token_server::builder::{AccessTokenBuilder, MockTokenBuilder, TokenBuilder};
use rtc_token_server::{router, ServerConfig, ServerState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;

    let token_builder: Arc<dyn TokenBuilder> = if config.mock_mode {
        tracing::warn!("MockTokenBuilderで起動します（開発環境用、署名なし）");
        Arc::new(MockTokenBuilder::new())
    } else {
        Arc::new(AccessTokenBuilder)
    };

    tracing::info!(
        app_id = %config.credentials.app_id,
        builder = token_builder.kind(),
        "設定を読み込みました"
    );

    let state = Arc::new(ServerState {
        credentials: config.credentials,
        token_builder,
    });
    let app = router(state);

    tracing::info!("RTCトークンサーバーを {} で起動します", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
