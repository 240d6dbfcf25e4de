//! # GET /rtc/{channelName}/{role}/{tokenType}/{uid}?expiry=
//!
//! ## 処理フロー
//! 1. パラメータの検証（ロール → トークン種別 → UID → 有効期限 → チャンネル名）
//! 2. 識別子種別に応じた署名操作の呼び出し
//! 3. `{"rtcToken": "..."}` の返却

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use rtc_types::RtcTokenResponse;
use serde::Deserialize;

use crate::config::ServerState;
use crate::dispatch::issue;
use crate::error::{ServerError, ValidationError};
use crate::request::validate;

/// クエリパラメータ。数値の検証は [`validate`] で行うため文字列のまま受け取る。
#[derive(Debug, Default, Deserialize)]
pub struct RtcQuery {
    pub expiry: Option<String>,
}

/// 現在のUNIX時刻（秒, u32）。
fn unix_now() -> Result<u32, ServerError> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ServerError::Internal(format!("時刻取得失敗: {e}")))?
        .as_secs();
    u32::try_from(secs).map_err(|_| ServerError::Internal(format!("u32範囲外の時刻: {secs}")))
}

/// パスパラメータ（channelName, role, tokenType, uid）
pub type RtcPath = Path<(String, String, String, String)>;

/// RTCトークン発行ハンドラ。
///
/// 抽出器の失敗（不正なUTF-8、重複したクエリ等）もJSONのエラー本文で返す。
pub async fn handle_rtc_token(
    State(state): State<Arc<ServerState>>,
    path: Result<RtcPath, PathRejection>,
    query: Result<Query<RtcQuery>, QueryRejection>,
) -> Result<Json<RtcTokenResponse>, ServerError> {
    let Path((channel_name, role, token_type, uid)) = path.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "パスパラメータの解析に失敗");
        ServerError::BadRequest(rejection.body_text())
    })?;
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "クエリパラメータの解析に失敗");
        ValidationError::InvalidExpiry(rejection.body_text())
    })?;

    let now = unix_now()?;

    let request = validate(
        &channel_name,
        &role,
        &token_type,
        &uid,
        query.expiry.as_deref(),
        now,
    )
    .inspect_err(|e| {
        tracing::debug!(channel = %channel_name, error = %e, "リクエストの検証に失敗");
    })?;

    let token = issue(&state.credentials, state.token_builder.as_ref(), &request).inspect_err(
        |e| {
            tracing::error!(
                channel = %request.channel_name,
                token_type = %request.identity.token_type(),
                error = %e,
                "RTCトークンの生成に失敗"
            );
        },
    )?;

    tracing::info!(
        channel = %request.channel_name,
        role = %request.role,
        token_type = %request.identity.token_type(),
        expires_at = request.expires_at,
        "RTCトークンを発行"
    );

    Ok(Json(RtcTokenResponse { rtc_token: token }))
}
