//! # サーバー設定・共有状態
//!
//! 環境変数からの設定読み込みと、リクエスト間で共有する読み取り専用状態の定義。

use std::fmt;
use std::sync::Arc;

use crate::builder::TokenBuilder;

/// デフォルトの待ち受けアドレス
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9090";

/// アプリケーション認証情報。起動時に一度だけ読み込み、以降は変更しない。
#[derive(Clone, PartialEq, Eq)]
pub struct AppCredentials {
    pub app_id: String,
    pub app_certificate: String,
}

impl AppCredentials {
    pub fn new(app_id: impl Into<String>, app_certificate: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_certificate: app_certificate.into(),
        }
    }
}

// App Certificateはログに出さない
impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("app_certificate", &"<redacted>")
            .finish()
    }
}

/// 起動時設定。
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub credentials: AppCredentials,
    /// 待ち受けアドレス（`LISTEN_ADDR`）
    pub listen_addr: String,
    /// `MOCK_MODE=true` ならモックのトークンビルダーを使用する
    pub mock_mode: bool,
}

impl ServerConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー参照関数から構築する。
    ///
    /// `APP_ID` と `APP_CERTIFICATE` は必須。空文字列は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "環境変数 {key} が設定されていません（APP_ID と APP_CERTIFICATE を確認してください）"
                    )
                })
        };

        let app_id = required("APP_ID")?;
        let app_certificate = required("APP_CERTIFICATE")?;

        let listen_addr = lookup("LISTEN_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());

        let mock_mode = lookup("MOCK_MODE").unwrap_or_default() == "true";

        Ok(Self {
            credentials: AppCredentials::new(app_id, app_certificate),
            listen_addr,
            mock_mode,
        })
    }
}

/// サーバーの共有状態。
///
/// 全フィールドは起動後に変更されないため、ハンドラ間で同期なしに共有できる。
pub struct ServerState {
    pub credentials: AppCredentials,
    /// トークン署名の実装
    pub token_builder: Arc<dyn TokenBuilder>,
}
