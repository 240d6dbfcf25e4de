//! # HTTPエンドポイント

pub mod ping;
pub mod rtc;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

use axum::routing::get;

use crate::config::ServerState;

pub use ping::handle_ping;
pub use rtc::handle_rtc_token;

/// ルーターを構築する。
pub fn router(state: Arc<ServerState>) -> axum::Router {
    axum::Router::new()
        .route("/ping", get(handle_ping))
        .route(
            "/rtc/{channel_name}/{role}/{token_type}/{uid}",
            get(handle_rtc_token),
        )
        .with_state(state)
}
