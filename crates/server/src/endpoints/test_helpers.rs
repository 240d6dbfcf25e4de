//! # エンドポイントテスト用共通ヘルパー

use std::sync::Arc;

use crate::builder::TokenBuilder;
use crate::config::{AppCredentials, ServerState};

pub const TEST_APP_ID: &str = "970ca35de60c44645bbae8a215061b33";
pub const TEST_APP_CERT: &str = "5cfd2fd1755d40ecb72977518be15d3b";

/// テスト用ServerStateを構築する。
pub fn test_state(token_builder: Arc<dyn TokenBuilder>) -> Arc<ServerState> {
    Arc::new(ServerState {
        credentials: AppCredentials::new(TEST_APP_ID, TEST_APP_CERT),
        token_builder,
    })
}

/// 現在のUNIX時刻（秒）。
pub fn unix_now() -> u32 {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    u32::try_from(secs).unwrap()
}

/// ルーター全体をローカルポートで起動し、ポート番号を返す。
pub async fn start_server(state: Arc<ServerState>) -> u16 {
    let app = super::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    port
}
