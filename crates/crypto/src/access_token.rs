//! # アクセストークン（version 006 レイアウト）
//!
//! メッセージ・コンテンツはリトルエンディアンでパックする。
//!
//! ```text
//! message = salt:u32 ‖ ts:u32 ‖ count:u16 ‖ (privilege:u16 ‖ expire:u32)*
//! content = len:u16 ‖ signature ‖ crc32(channel):u32 ‖ crc32(uid):u32 ‖ len:u16 ‖ message
//! token   = "006" ‖ app_id ‖ Base64(content)
//! ```

use std::collections::BTreeMap;

use base64::Engine;
use rand::Rng;

use crate::{
    check_credentials, hmac_sign, hmac_verify, now_u32, TokenError, CREDENTIAL_HEX_LEN,
    TOKEN_LIFETIME_SECS,
};

/// トークンのバージョン接頭辞
pub const VERSION: &str = "006";

/// Base64エンジン（Standard）
fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}

/// トークンに付与できる権限。値はメッセージ上のキー。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u16)]
pub enum Privilege {
    JoinChannel = 1,
    PublishAudioStream = 2,
    PublishVideoStream = 3,
    PublishDataStream = 4,
}

/// 構築中のアクセストークン。
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub app_id: String,
    pub app_certificate: String,
    pub channel_name: String,
    /// 参加者の識別子（数値UIDは10進表記、0は空文字列）
    pub uid: String,
    /// ランダムなソルト（1〜99999999）
    pub salt: u32,
    /// トークン自体の有効期限（発行時刻 + 24時間）
    pub ts: u32,
    /// 権限 → 有効期限（UNIX秒）
    pub privileges: BTreeMap<u16, u32>,
}

impl AccessToken {
    /// 認証情報を検証し、ソルトとtsを設定したトークンを作成する。
    pub fn new(
        app_id: &str,
        app_certificate: &str,
        channel_name: &str,
        uid: &str,
    ) -> Result<Self, TokenError> {
        check_credentials(app_id, app_certificate)?;

        let ts = now_u32()?
            .checked_add(TOKEN_LIFETIME_SECS)
            .ok_or_else(|| TokenError::Clock("tsがu32範囲を超えます".to_string()))?;

        Ok(Self {
            app_id: app_id.to_string(),
            app_certificate: app_certificate.to_string(),
            channel_name: channel_name.to_string(),
            uid: uid.to_string(),
            salt: rand::thread_rng().gen_range(1..=99_999_999),
            ts,
            privileges: BTreeMap::new(),
        })
    }

    /// 権限を追加する（同じ権限は上書き）。
    pub fn add_privilege(&mut self, privilege: Privilege, expires_at: u32) {
        self.privileges.insert(privilege as u16, expires_at);
    }

    /// 署名対象メッセージをパックする。
    fn pack_message(&self) -> Result<Vec<u8>, TokenError> {
        let count = u16::try_from(self.privileges.len())
            .map_err(|_| TokenError::FieldTooLong("privileges"))?;

        let mut buf = Vec::with_capacity(10 + self.privileges.len() * 6);
        buf.extend_from_slice(&self.salt.to_le_bytes());
        buf.extend_from_slice(&self.ts.to_le_bytes());
        buf.extend_from_slice(&count.to_le_bytes());
        for (key, expire) in &self.privileges {
            buf.extend_from_slice(&key.to_le_bytes());
            buf.extend_from_slice(&expire.to_le_bytes());
        }
        Ok(buf)
    }

    /// 署名してトークン文字列を生成する。
    pub fn build(&self) -> Result<String, TokenError> {
        check_credentials(&self.app_id, &self.app_certificate)?;

        let message = self.pack_message()?;
        let signature = hmac_sign(
            &self.app_certificate,
            &self.app_id,
            &self.channel_name,
            &self.uid,
            &message,
        )?;

        let mut content = Vec::with_capacity(12 + signature.len() + message.len());
        put_bytes(&mut content, &signature, "signature")?;
        content.extend_from_slice(&crc32(&self.channel_name).to_le_bytes());
        content.extend_from_slice(&crc32(&self.uid).to_le_bytes());
        put_bytes(&mut content, &message, "message")?;

        Ok(format!("{VERSION}{}{}", self.app_id, b64().encode(content)))
    }
}

/// IEEE CRC32
fn crc32(s: &str) -> u32 {
    crc32fast::hash(s.as_bytes())
}

/// u16長プレフィックス付きでバイト列を書き込む。
fn put_bytes(buf: &mut Vec<u8>, bytes: &[u8], field: &'static str) -> Result<(), TokenError> {
    let len = u16::try_from(bytes.len()).map_err(|_| TokenError::FieldTooLong(field))?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(bytes);
    Ok(())
}

/// リトルエンディアンのバイト列リーダー。
struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], TokenError> {
        if self.data.len() < n {
            return Err(TokenError::Malformed(format!(
                "{n}バイト必要ですが残り{}バイトです",
                self.data.len()
            )));
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    fn u16(&mut self) -> Result<u16, TokenError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, TokenError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn bytes(&mut self) -> Result<&'a [u8], TokenError> {
        let len = self.u16()? as usize;
        self.take(len)
    }
}

/// 解析済みトークン。
#[derive(Debug, Clone)]
pub struct ParsedToken {
    pub app_id: String,
    pub signature: Vec<u8>,
    pub crc_channel_name: u32,
    pub crc_uid: u32,
    /// パック済みメッセージ（署名対象）
    pub message: Vec<u8>,
    pub salt: u32,
    pub ts: u32,
    pub privileges: BTreeMap<u16, u32>,
}

impl ParsedToken {
    /// トークン文字列を解析する。署名の検証は行わない。
    pub fn parse(token: &str) -> Result<Self, TokenError> {
        let rest = token
            .strip_prefix(VERSION)
            .ok_or_else(|| TokenError::Malformed("バージョンが一致しません".to_string()))?;
        if rest.len() < CREDENTIAL_HEX_LEN || !rest.is_char_boundary(CREDENTIAL_HEX_LEN) {
            return Err(TokenError::Malformed("App IDが短すぎます".to_string()));
        }
        let (app_id, encoded) = rest.split_at(CREDENTIAL_HEX_LEN);

        let content = b64()
            .decode(encoded)
            .map_err(|e| TokenError::Malformed(format!("Base64デコードに失敗: {e}")))?;

        let mut reader = Reader { data: &content };
        let signature = reader.bytes()?.to_vec();
        let crc_channel_name = reader.u32()?;
        let crc_uid = reader.u32()?;
        let message = reader.bytes()?.to_vec();

        let mut msg = Reader { data: &message };
        let salt = msg.u32()?;
        let ts = msg.u32()?;
        let count = msg.u16()?;
        let mut privileges = BTreeMap::new();
        for _ in 0..count {
            let key = msg.u16()?;
            let expire = msg.u32()?;
            privileges.insert(key, expire);
        }

        Ok(Self {
            app_id: app_id.to_string(),
            signature,
            crc_channel_name,
            crc_uid,
            message,
            salt,
            ts,
            privileges,
        })
    }

    /// CRCと署名を検証する。
    pub fn verify(&self, app_certificate: &str, channel_name: &str, uid: &str) -> bool {
        if self.crc_channel_name != crc32(channel_name) || self.crc_uid != crc32(uid) {
            return false;
        }
        hmac_verify(
            app_certificate,
            &self.app_id,
            channel_name,
            uid,
            &self.message,
            &self.signature,
        )
    }
}
