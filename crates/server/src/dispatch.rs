//! # トークン発行
//!
//! 検証済みリクエストの識別子種別に応じて、ビルダーの署名操作を1回だけ呼び出す。
//! 失敗時のリトライや原因の解釈は行わない。

use crate::builder::TokenBuilder;
use crate::config::AppCredentials;
use crate::error::IssuanceError;
use crate::request::{CredentialRequest, Identity};

/// トークンを発行する。
///
/// 返却するトークン文字列は加工・記録しない。
pub fn issue(
    credentials: &AppCredentials,
    builder: &dyn TokenBuilder,
    request: &CredentialRequest,
) -> Result<String, IssuanceError> {
    let result = match &request.identity {
        Identity::AccountString(account) => builder.build_token_with_account(
            &credentials.app_id,
            &credentials.app_certificate,
            &request.channel_name,
            account,
            request.role,
            request.expires_at,
        ),
        Identity::NumericId(uid) => builder.build_token_with_uid(
            &credentials.app_id,
            &credentials.app_certificate,
            &request.channel_name,
            *uid,
            request.role,
            request.expires_at,
        ),
    };

    result.map_err(|e| IssuanceError::SigningFailed(e.to_string()))
}
