//! # リクエスト検証
//!
//! パス・クエリパラメータを型付きの [`CredentialRequest`] に変換する。
//!
//! ## 検証順序
//! 1. ロール
//! 2. トークン種別
//! 3. UID / アカウント
//! 4. 有効期限
//! 5. チャンネル名
//!
//! 最初に失敗した検証のエラーのみを返す。

use std::fmt;
use std::str::FromStr;

use rtc_types::Role;

use crate::error::ValidationError;

/// `expiry` 未指定時の有効期間（秒）
pub const DEFAULT_TTL_SECS: u32 = 3000;

/// 識別子の種別（パスパラメータ `tokenType`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Uid,
    UserAccount,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Uid => "uid",
            TokenType::UserAccount => "userAccount",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uid" => Ok(TokenType::Uid),
            "userAccount" => Ok(TokenType::UserAccount),
            other => Err(ValidationError::UnsupportedTokenType(other.to_string())),
        }
    }
}

/// 参加者の識別子。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    NumericId(u32),
    AccountString(String),
}

impl Identity {
    pub fn token_type(&self) -> TokenType {
        match self {
            Identity::NumericId(_) => TokenType::Uid,
            Identity::AccountString(_) => TokenType::UserAccount,
        }
    }
}

/// 検証済みのトークン発行リクエスト。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRequest {
    pub channel_name: String,
    pub identity: Identity,
    pub role: Role,
    /// 有効期限（UNIX秒）
    pub expires_at: u32,
}

/// ロール文字列を解釈する。
pub fn parse_role(raw: &str) -> Result<Role, ValidationError> {
    match raw {
        "publisher" => Ok(Role::Publisher),
        "subscriber" => Ok(Role::Subscriber),
        other => Err(ValidationError::InvalidRole(other.to_string())),
    }
}

/// 符号・空白を許さない10進整数のパース。範囲外は `None`。
fn parse_decimal<T: FromStr>(raw: &str) -> Option<T> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn parse_identity(token_type: TokenType, raw: &str) -> Result<Identity, ValidationError> {
    match token_type {
        TokenType::Uid => parse_decimal::<u32>(raw)
            .map(Identity::NumericId)
            .ok_or_else(|| ValidationError::InvalidIdentity(raw.to_string())),
        TokenType::UserAccount if raw.is_empty() => {
            Err(ValidationError::InvalidIdentity(raw.to_string()))
        }
        TokenType::UserAccount => Ok(Identity::AccountString(raw.to_string())),
    }
}

/// 有効期限（UNIX秒）を計算する。
///
/// `now + ttl` はu32で計算し、オーバーフローする場合は拒否する。
/// TTL 0 は発行時点で失効しているため拒否する。
fn compute_expires_at(raw_expiry: Option<&str>, now: u32) -> Result<u32, ValidationError> {
    let ttl = match raw_expiry {
        None => DEFAULT_TTL_SECS,
        Some(raw) => parse_decimal::<u32>(raw)
            .filter(|ttl| *ttl > 0)
            .ok_or_else(|| ValidationError::InvalidExpiry(raw.to_string()))?,
    };

    now.checked_add(ttl).ok_or_else(|| {
        ValidationError::InvalidExpiry(raw_expiry.unwrap_or_default().to_string())
    })
}

/// 生のパラメータを検証し、[`CredentialRequest`] を構築する。
///
/// `now` はUNIX秒（UTC）。
pub fn validate(
    raw_channel_name: &str,
    raw_role: &str,
    raw_token_type: &str,
    raw_identity: &str,
    raw_expiry: Option<&str>,
    now: u32,
) -> Result<CredentialRequest, ValidationError> {
    let role = parse_role(raw_role)?;
    let token_type: TokenType = raw_token_type.parse()?;
    let identity = parse_identity(token_type, raw_identity)?;
    let expires_at = compute_expires_at(raw_expiry, now)?;

    if raw_channel_name.is_empty() {
        return Err(ValidationError::EmptyChannelName);
    }

    Ok(CredentialRequest {
        channel_name: raw_channel_name.to_string(),
        identity,
        role,
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publisher_uid_default_expiry() {
        let request = validate("room", "publisher", "uid", "12345", None, 1_000_000_000).unwrap();
        assert_eq!(
            request,
            CredentialRequest {
                channel_name: "room".to_string(),
                identity: Identity::NumericId(12345),
                role: Role::Publisher,
                expires_at: 1_000_003_000,
            }
        );
    }

    #[test]
    fn test_subscriber_account_with_expiry() {
        let request =
            validate("room", "subscriber", "userAccount", "alice123", Some("60"), 500).unwrap();
        assert_eq!(request.role, Role::Subscriber);
        assert_eq!(
            request.identity,
            Identity::AccountString("alice123".to_string())
        );
        assert_eq!(request.expires_at, 560);
    }

    /// ロールは他のどのパラメータよりも先に検証されることを確認
    #[test]
    fn test_invalid_role_checked_first() {
        let err = validate("", "host", "email", "not-a-number", Some("x"), 0).unwrap_err();
        assert_eq!(err, ValidationError::InvalidRole("host".to_string()));

        for role in ["", "Publisher", "SUBSCRIBER", "admin", " publisher"] {
            assert!(matches!(
                validate("room", role, "uid", "1", None, 0),
                Err(ValidationError::InvalidRole(r)) if r == role
            ));
        }
    }

    /// 未対応のトークン種別はUIDのパースより先に拒否されることを確認
    #[test]
    fn test_unsupported_token_type_before_identity() {
        for token_type in ["email", "UID", "useraccount", ""] {
            let err = validate("room", "publisher", token_type, "not-a-number", None, 0)
                .unwrap_err();
            assert_eq!(
                err,
                ValidationError::UnsupportedTokenType(token_type.to_string())
            );
        }
    }

    #[test]
    fn test_invalid_numeric_identity() {
        for uid in [
            "999999999999999999999",
            "4294967296",
            "-1",
            "+1",
            "12a",
            " 1",
            "",
            "1.0",
        ] {
            let err = validate("room", "publisher", "uid", uid, None, 0).unwrap_err();
            assert_eq!(err, ValidationError::InvalidIdentity(uid.to_string()), "{uid}");
        }
    }

    #[test]
    fn test_numeric_identity_bounds() {
        let request = validate("room", "publisher", "uid", "4294967295", None, 0).unwrap();
        assert_eq!(request.identity, Identity::NumericId(u32::MAX));

        let request = validate("room", "publisher", "uid", "0", None, 0).unwrap();
        assert_eq!(request.identity, Identity::NumericId(0));

        let request = validate("room", "publisher", "uid", "007", None, 0).unwrap();
        assert_eq!(request.identity, Identity::NumericId(7));
    }

    #[test]
    fn test_empty_account_rejected() {
        let err = validate("room", "publisher", "userAccount", "", None, 0).unwrap_err();
        assert_eq!(err, ValidationError::InvalidIdentity(String::new()));
    }

    /// 数字のみのアカウント文字列は数値に変換されないことを確認
    #[test]
    fn test_numeric_account_stays_string() {
        let request = validate("room", "publisher", "userAccount", "42", None, 0).unwrap();
        assert_eq!(request.identity, Identity::AccountString("42".to_string()));
    }

    #[test]
    fn test_invalid_expiry() {
        for expiry in ["abc", "-5", "", "0", "4294967296", "1e3"] {
            let err = validate("room", "publisher", "uid", "1", Some(expiry), 100).unwrap_err();
            assert_eq!(err, ValidationError::InvalidExpiry(expiry.to_string()), "{expiry}");
        }
    }

    /// now + ttl がu32を超える場合は拒否されることを確認
    #[test]
    fn test_expiry_overflow() {
        let err = validate("room", "publisher", "uid", "1", Some("2"), u32::MAX - 1).unwrap_err();
        assert_eq!(err, ValidationError::InvalidExpiry("2".to_string()));

        let request = validate("room", "publisher", "uid", "1", Some("1"), u32::MAX - 1).unwrap();
        assert_eq!(request.expires_at, u32::MAX);
    }

    #[test]
    fn test_expires_at_strictly_after_now() {
        for (expiry, now) in [(None, 0u32), (Some("1"), 10), (Some("86400"), 1_700_000_000)] {
            let request = validate("room", "subscriber", "uid", "1", expiry, now).unwrap();
            assert!(request.expires_at > now);
        }
    }

    /// 空のチャンネル名は他の検証がすべて通った後に拒否されることを確認
    #[test]
    fn test_empty_channel_name() {
        let err = validate("", "publisher", "uid", "1", None, 0).unwrap_err();
        assert_eq!(err, ValidationError::EmptyChannelName);

        let err = validate("", "publisher", "uid", "x", None, 0).unwrap_err();
        assert_eq!(err, ValidationError::InvalidIdentity("x".to_string()));
    }

    #[test]
    fn test_identity_token_type() {
        assert_eq!(Identity::NumericId(1).token_type(), TokenType::Uid);
        assert_eq!(
            Identity::AccountString("a".into()).token_type(),
            TokenType::UserAccount
        );
        assert_eq!(TokenType::UserAccount.to_string(), "userAccount");
    }
}
