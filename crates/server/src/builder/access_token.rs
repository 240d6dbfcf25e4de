//! # アクセストークンビルダー
//!
//! `rtc-crypto` のHMAC-SHA256署名トークンを使う本番用実装。

use rtc_types::Role;

use super::{BuildError, TokenBuilder};

/// HMAC-SHA256署名のアクセストークンを生成するビルダー。
#[derive(Debug, Default, Clone, Copy)]
pub struct AccessTokenBuilder;

impl TokenBuilder for AccessTokenBuilder {
    fn kind(&self) -> &str {
        "access-token"
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
        Ok(rtc_crypto::build_token_with_account(
            app_id,
            app_certificate,
            channel_name,
            account,
            role,
            expires_at,
        )?)
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
        Ok(rtc_crypto::build_token_with_uid(
            app_id,
            app_certificate,
            channel_name,
            uid,
            role,
            expires_at,
        )?)
    }
}
