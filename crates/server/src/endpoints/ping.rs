//! # GET /ping
//!
//! ヘルスチェック。

use axum::Json;
use rtc_types::PingResponse;

pub async fn handle_ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ping() {
        let Json(body) = handle_ping().await;
        assert_eq!(body.message, "pong");
    }
}
