//! Simplified, user-facing proxy configuration.
//!
//! This is the shape operators write by hand. Every transport block is present
//! (defaulted when missing from the file), but only the one picked by
//! [`ProxyConfig::transport`] is read by the generator.
use serde::Deserialize;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::error::GenerateError;

/// Transport kinds understood by the proxy daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TransportKind {
    /// Raw TCP stream, optionally disguised as HTTP/1.1.
    Tcp,
    /// WebSocket.
    WebSocket,
    /// mKCP, the UDP based reliable transport.
    Kcp,
    /// HTTP/2 multiplexing.
    Http2,
}

impl TransportKind {
    /// Maps the numeric selector used in config files to a transport kind.
    pub fn from_code(code: i64) -> Result<Self, GenerateError> {
        match code {
            1 => Ok(Self::Tcp),
            2 => Ok(Self::WebSocket),
            3 => Ok(Self::Kcp),
            4 => Ok(Self::Http2),
            other => Err(GenerateError::UnsupportedTransport(other)),
        }
    }
}

/// Simplified proxy configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    /// Users allowed to connect.
    #[serde(default)]
    pub clients: Vec<ClientEntry>,
    /// Port the daemon listens on behind the web server.
    #[serde(alias = "v2ray_port")]
    pub port: u16,
    /// Transport selector, see [`TransportKind::from_code`].
    #[serde(alias = "transport_type")]
    pub transport: i64,
    #[serde(default)]
    pub tcp: TcpConfig,
    #[serde(default)]
    pub web_socket: WebSocketConfig,
    #[serde(default)]
    pub kcp: KcpConfig,
    #[serde(default)]
    pub http2: Http2Config,
}

/// A single user. An empty `user_id` asks the generator to create one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientEntry {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub alter_id: u32,
}

/// A header line. For raw-stream headers `value` may hold several values joined by `;;;`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeaderEntry {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Raw TCP transport settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TcpConfig {
    /// Header disguise: `none` or `http`.
    #[serde(rename = "type", default)]
    pub header_type: String,
    #[serde(default)]
    pub request: TcpRequestConfig,
    #[serde(default)]
    pub response: TcpResponseConfig,
}

/// Disguised HTTP request. `path` is a comma-joined list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TcpRequestConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub headers: Vec<HeaderEntry>,
}

/// Disguised HTTP response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TcpResponseConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub headers: Vec<HeaderEntry>,
}

/// WebSocket transport settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebSocketConfig {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub headers: Vec<HeaderEntry>,
}

/// mKCP tuning, copied verbatim into the daemon document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KcpConfig {
    #[serde(rename = "type", default)]
    pub header_type: String,
    #[serde(default)]
    pub mtu: u32,
    #[serde(default)]
    pub tti: u32,
    #[serde(default)]
    pub uplink_capacity: u32,
    #[serde(default)]
    pub downlink_capacity: u32,
    #[serde(default)]
    pub congestion: bool,
    #[serde(default)]
    pub read_buffer_size: u32,
    #[serde(default)]
    pub write_buffer_size: u32,
}

/// HTTP/2 transport settings. `host` is a comma-joined list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Http2Config {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub path: String,
}
