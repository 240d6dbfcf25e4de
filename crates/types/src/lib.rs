//! # RTC Token Server 共有型定義
//!
//! トークンサーバーとクライアントの間でやり取りされるデータ構造を提供する。
//!
//! ## エンコーディング規則
//! - JSONフィールド名はcamelCase（`rtcToken`）
//! - ロールはパスパラメータと同じ小文字表記（`publisher` / `subscriber`）

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ロール
// ---------------------------------------------------------------------------

/// トークンが付与する権限レベル。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// メディアの送信が可能
    Publisher,
    /// メディアの受信のみ可能
    Subscriber,
}

impl Role {
    /// パスパラメータ表記を返す。
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Publisher => "publisher",
            Role::Subscriber => "subscriber",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// レスポンス
// ---------------------------------------------------------------------------

/// GET /rtc/... の成功レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtcTokenResponse {
    /// 署名済みトークン（不透明な文字列）
    #[serde(rename = "rtcToken")]
    pub rtc_token: String,
}

/// エラーレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// エラーメッセージ
    pub message: String,
    /// HTTPステータスコード
    pub status: u16,
}

/// GET /ping のレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// rtcTokenフィールド名でシリアライズされることを確認
    #[test]
    fn test_rtc_token_response_field_name() {
        let resp = RtcTokenResponse {
            rtc_token: "006abc".to_string(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, serde_json::json!({ "rtcToken": "006abc" }));
    }

    /// ロールが小文字表記でシリアライズされることを確認
    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&Role::Publisher).unwrap(),
            "\"publisher\""
        );
        let role: Role = serde_json::from_str("\"subscriber\"").unwrap();
        assert_eq!(role, Role::Subscriber);
        assert!(serde_json::from_str::<Role>("\"host\"").is_err());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Publisher.to_string(), "publisher");
        assert_eq!(Role::Subscriber.to_string(), "subscriber");
    }
}
