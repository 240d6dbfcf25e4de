//! # ローカル開発用モックビルダー
//!
//! 署名を行わず、引数を埋め込んだ固定形式の文字列を返す。
//! 呼び出しは記録され、テストから参照できる。

use std::sync::{Mutex, MutexGuard};

use rtc_types::Role;

use super::{BuildError, TokenBuilder};

/// 記録された呼び出し。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildCall {
    WithAccount {
        app_id: String,
        app_certificate: String,
        channel_name: String,
        account: String,
        role: Role,
        expires_at: u32,
    },
    WithUid {
        app_id: String,
        app_certificate: String,
        channel_name: String,
        uid: u32,
        role: Role,
        expires_at: u32,
    },
}

/// モックトークンビルダー。
#[derive(Debug, Default)]
pub struct MockTokenBuilder {
    calls: Mutex<Vec<BuildCall>>,
    /// 設定されている場合、全呼び出しをこのメッセージで失敗させる
    failure: Option<String>,
}

impl MockTokenBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に失敗するビルダーを作成する。
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// これまでの呼び出し履歴を返す。
    pub fn calls(&self) -> Vec<BuildCall> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<BuildCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: BuildCall, token: String) -> Result<String, BuildError> {
        self.lock().push(call);
        match &self.failure {
            Some(message) => Err(BuildError::Rejected(message.clone())),
            None => Ok(token),
        }
    }
}

impl TokenBuilder for MockTokenBuilder {
    fn kind(&self) -> &str {
        "mock"
    }

    fn build_token_with_account(
        &self,
        app_id: &str,
        app_certificate: &str,
        channel_name: &str,
        account: &str,
        role: Role,
        expires_at: u32,
    ) -> Result<String, BuildError> {
        let token = format!("mock-account:{channel_name}:{account}:{role}:{expires_at}");
        self.record(
            BuildCall::WithAccount {
                app_id: app_id.to_string(),
                app_certificate: app_certificate.to_string(),
                channel_name: channel_name.to_string(),
                account: account.to_string(),
                role,
                expires_at,
            },
            token,
        )
    }

    fn build_token_with_uid(
        &self,
        app_id: &str,
        app_certificate: &str,
        channel_name: &str,
        uid: u32,
        role: Role,
        expires_at: u32,
    ) -> Result<String, BuildError> {
        let token = format!("mock-uid:{channel_name}:{uid}:{role}:{expires_at}");
        self.record(
            BuildCall::WithUid {
                app_id: app_id.to_string(),
                app_certificate: app_certificate.to_string(),
                channel_name: channel_name.to_string(),
                uid,
                role,
                expires_at,
            },
            token,
        )
    }
}
