//! # サーバーエラー型
//!
//! 呼び出し元の入力不備（[`ValidationError`]）と署名処理の失敗（[`IssuanceError`]）は
//! 別の型として扱い、混同しない。

use axum::http::StatusCode;
use axum::Json;
use rtc_types::ErrorResponse;

/// リクエストパラメータの検証エラー。常に400として返却する。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// publisher / subscriber 以外のロール
    #[error("ロールが不正です: {0:?}（publisher または subscriber）")]
    InvalidRole(String),
    /// uid / userAccount 以外のトークン種別
    #[error("未対応のトークン種別: {0:?}（uid または userAccount）")]
    UnsupportedTokenType(String),
    /// 数値として解釈できない、または32ビットを超えるUID、空のアカウント
    #[error("UIDが不正です: {0:?}")]
    InvalidIdentity(String),
    /// 数値として解釈できない、0、またはu32範囲を超える有効期限
    #[error("有効期限が不正です: {0:?}")]
    InvalidExpiry(String),
    /// 空のチャンネル名
    #[error("チャンネル名が空です")]
    EmptyChannelName,
}

/// トークン発行エラー。署名処理の失敗をそのまま伝える。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssuanceError {
    #[error("トークンの署名に失敗: {0}")]
    SigningFailed(String),
}

/// HTTPレスポンスに変換されるエラー型。
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    Validation(#[from] ValidationError),
    /// トークン発行失敗
    #[error("{0}")]
    Issuance(#[from] IssuanceError),
    /// パス・クエリの解析失敗（不正なUTF-8、重複パラメータ等）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// 内部エラー（時刻取得失敗等）
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Issuance(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = ErrorResponse {
            message: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
