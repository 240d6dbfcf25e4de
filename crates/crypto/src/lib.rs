//! # RTC アクセストークン暗号処理
//!
//! チャンネル参加用アクセストークンの構築・署名・解析を実装する。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | 署名 | HMAC-SHA256（鍵: App Certificate） |
//! | チャンネル名・UIDのチェックサム | CRC32（IEEE） |
//! | エンコード | Base64（Standard） |
//!
//! ## トークン形式
//! `"006"` ‖ App ID ‖ Base64(署名 ‖ CRC32(チャンネル名) ‖ CRC32(UID) ‖ メッセージ)

pub mod access_token;

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use rtc_types::Role;
use sha2::Sha256;

pub use access_token::{AccessToken, ParsedToken, Privilege, VERSION};

type HmacSha256 = Hmac<Sha256>;

/// App ID / App Certificate の長さ（16進数文字数）
pub const CREDENTIAL_HEX_LEN: usize = 32;

/// トークン自体の有効期間（秒）。メッセージの`ts`に使用する。
pub const TOKEN_LIFETIME_SECS: u32 = 24 * 3600;

/// トークン処理のエラー型
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// App IDが32桁の16進数ではない
    #[error("App IDが不正です（32桁の16進数である必要があります）")]
    InvalidAppId,
    /// App Certificateが32桁の16進数ではない
    #[error("App Certificateが不正です（32桁の16進数である必要があります）")]
    InvalidAppCertificate,
    /// フィールドがu16長プレフィックスに収まらない
    #[error("フィールドが長すぎます: {0}")]
    FieldTooLong(&'static str),
    /// トークンの解析に失敗
    #[error("トークンの解析に失敗: {0}")]
    Malformed(String),
    /// システム時刻の取得に失敗
    #[error("時刻取得失敗: {0}")]
    Clock(String),
}

/// App ID / App Certificate の形式チェック。
fn is_valid_credential(value: &str) -> bool {
    value.len() == CREDENTIAL_HEX_LEN && hex::decode(value).is_ok()
}

pub(crate) fn check_credentials(app_id: &str, app_certificate: &str) -> Result<(), TokenError> {
    if !is_valid_credential(app_id) {
        return Err(TokenError::InvalidAppId);
    }
    if !is_valid_credential(app_certificate) {
        return Err(TokenError::InvalidAppCertificate);
    }
    Ok(())
}

/// HMAC-SHA256による署名。
///
/// 署名対象は `app_id ‖ channel_name ‖ uid ‖ message`。
pub fn hmac_sign(
    app_certificate: &str,
    app_id: &str,
    channel_name: &str,
    uid: &str,
    message: &[u8],
) -> Result<Vec<u8>, TokenError> {
    let mut mac = HmacSha256::new_from_slice(app_certificate.as_bytes())
        .map_err(|_| TokenError::InvalidAppCertificate)?;
    mac.update(app_id.as_bytes());
    mac.update(channel_name.as_bytes());
    mac.update(uid.as_bytes());
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// HMAC-SHA256署名の検証（定数時間比較）。
pub fn hmac_verify(
    app_certificate: &str,
    app_id: &str,
    channel_name: &str,
    uid: &str,
    message: &[u8],
    signature: &[u8],
) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(app_certificate.as_bytes()) else {
        return false;
    };
    mac.update(app_id.as_bytes());
    mac.update(channel_name.as_bytes());
    mac.update(uid.as_bytes());
    mac.update(message);
    mac.verify_slice(signature).is_ok()
}

/// 現在のUNIX時刻（秒, u32）。
pub(crate) fn now_u32() -> Result<u32, TokenError> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| TokenError::Clock(e.to_string()))?
        .as_secs();
    u32::try_from(secs).map_err(|_| TokenError::Clock(format!("u32範囲外の時刻: {secs}")))
}

/// 数値UIDをトークン上の表記に変換する。0はワイルドカード（空文字列）。
pub fn uid_to_account(uid: u32) -> String {
    if uid == 0 {
        String::new()
    } else {
        uid.to_string()
    }
}

/// ロールに応じた権限を付与したトークンを構築する。
fn build_token(
    app_id: &str,
    app_certificate: &str,
    channel_name: &str,
    account: &str,
    role: Role,
    expires_at: u32,
) -> Result<String, TokenError> {
    let mut token = AccessToken::new(app_id, app_certificate, channel_name, account)?;
    token.add_privilege(Privilege::JoinChannel, expires_at);
    match role {
        Role::Publisher => {
            token.add_privilege(Privilege::PublishAudioStream, expires_at);
            token.add_privilege(Privilege::PublishVideoStream, expires_at);
            token.add_privilege(Privilege::PublishDataStream, expires_at);
        }
        Role::Subscriber => {}
    }
    token.build()
}

/// 数値UIDでトークンを構築する。
pub fn build_token_with_uid(
    app_id: &str,
    app_certificate: &str,
    channel_name: &str,
    uid: u32,
    role: Role,
    expires_at: u32,
) -> Result<String, TokenError> {
    build_token(
        app_id,
        app_certificate,
        channel_name,
        &uid_to_account(uid),
        role,
        expires_at,
    )
}

/// ユーザーアカウント文字列でトークンを構築する。
pub fn build_token_with_account(
    app_id: &str,
    app_certificate: &str,
    channel_name: &str,
    account: &str,
    role: Role,
    expires_at: u32,
) -> Result<String, TokenError> {
    build_token(app_id, app_certificate, channel_name, account, role, expires_at)
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
