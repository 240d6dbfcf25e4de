//! # トークンビルダー抽象化
//!
//! チャンネル参加トークンの署名を抽象化するトレイト。
//! 環境変数 `MOCK_MODE` で実装を切り替える。
//!
//! 現在の実装:
//! - `access_token` — HMAC-SHA256署名のアクセストークン（`rtc-crypto`）
//! - `mock` — ローカル開発・テスト用（署名なし、呼び出しを記録）

pub mod access_token;
pub mod mock;

use rtc_types::Role;

pub use access_token::AccessTokenBuilder;
pub use mock::MockTokenBuilder;

/// トークン構築のエラー型
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 署名プリミティブのエラー
    #[error(transparent)]
    Token(#[from] rtc_crypto::TokenError),
    /// 実装がリクエストを拒否した
    #[error("{0}")]
    Rejected(String),
}

/// トークンビルダーのトレイト。
///
/// 呼び出しごとに独立しており、並行に呼び出されても安全でなければならない。
pub trait TokenBuilder: Send + Sync {
    /// 実装の種別名（起動ログ用）。
    fn kind(&self) -> &str;

    /// アカウント文字列を識別子としてトークンを構築する。
    fn build_token_with_account(
        &self,
        app_id: &str,
        app_certificate: &str,
        channel_name: &str,
        account: &str,
        role: Role,
        expires_at: u32,
    ) -> Result<String, BuildError>;

    /// 数値UIDを識別子としてトークンを構築する。
    fn build_token_with_uid(
        &self,
        app_id: &str,
        app_certificate: &str,
        channel_name: &str,
        uid: u32,
        role: Role,
        expires_at: u32,
    ) -> Result<String, BuildError>;
}
