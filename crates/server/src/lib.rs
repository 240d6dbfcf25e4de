//! # RTC Token Server
//!
//! リアルタイムメディアチャンネルへの参加用トークンを発行するサーバー。
//!
//! ## 構成
//! - [`request`] — パラメータ検証と有効期限の計算
//! - [`dispatch`] — 識別子種別に応じた署名操作の呼び出し
//! - [`builder`] — 署名操作の抽象化（本番用 / モック）
//! - [`endpoints`] — HTTPハンドラとルーター
//!
//! ## API エンドポイント
//! - `GET /rtc/{channelName}/{role}/{tokenType}/{uid}?expiry={秒}` — トークン発行
//! - `GET /ping` — ヘルスチェック

#![forbid(unsafe_code)]

pub mod builder;
pub mod config;
pub mod dispatch;
pub mod endpoints;
pub mod error;
pub mod request;

pub use config::{AppCredentials, ServerConfig, ServerState};
pub use endpoints::router;
pub use error::{IssuanceError, ServerError, ValidationError};
pub use request::{validate, CredentialRequest, Identity, TokenType};
