//! The proxy daemon's native configuration document.
//!
//! Field names follow the daemon's JSON schema. Optional blocks are skipped
//! rather than written as `null`, and the per-transport settings live in a single
//! [`TransportSettings`] enum so that exactly one of them can ever be emitted.
use std::collections::BTreeMap;

use serde::Serialize;
use strum_macros::AsRefStr;

use crate::constants::{
    INBOUND_LISTEN_ADDR, INBOUND_PROTOCOL, OUTBOUND_PROTOCOL, STREAM_SECURITY_NONE,
};

/// Root of the generated file.
#[derive(Debug, Clone, Serialize)]
pub struct DaemonConfig {
    pub inbounds: Vec<Inbound>,
    pub outbounds: Vec<Outbound>,
}

impl DaemonConfig {
    /// Builds the document around a single inbound and the direct outbound.
    pub fn new(inbound: Inbound) -> Self {
        Self {
            inbounds: vec![inbound],
            outbounds: vec![Outbound::direct()],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbound {
    pub listen: String,
    pub port: u16,
    pub protocol: String,
    pub settings: InboundSettings,
    pub stream_settings: StreamSettings,
}

impl Inbound {
    /// Loopback inbound on `port` for the given clients.
    pub fn loopback(
        port: u16,
        clients: Vec<InboundClient>,
        stream_settings: StreamSettings,
    ) -> Self {
        Self {
            listen: INBOUND_LISTEN_ADDR.to_string(),
            port,
            protocol: INBOUND_PROTOCOL.to_string(),
            settings: InboundSettings { clients },
            stream_settings,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InboundSettings {
    pub clients: Vec<InboundClient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundClient {
    pub id: String,
    pub alter_id: u32,
}

/// Network names as the daemon spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Network {
    Tcp,
    Ws,
    Kcp,
    Http,
}

/// Stream settings of the inbound.
///
/// `network` is derived from the transport variant and cannot be set on its own.
#[derive(Debug, Clone, Serialize)]
pub struct StreamSettings {
    network: Network,
    security: String,
    #[serde(flatten)]
    transport: TransportSettings,
}

impl StreamSettings {
    /// Unencrypted stream settings for the given transport.
    pub fn plain(transport: TransportSettings) -> Self {
        Self {
            network: transport.network(),
            security: STREAM_SECURITY_NONE.to_string(),
            transport,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn security(&self) -> &str {
        &self.security
    }

    pub fn transport(&self) -> &TransportSettings {
        &self.transport
    }
}

/// The one populated transport block. Serialized as `<kind>Settings: {...}`.
#[derive(Debug, Clone, Serialize)]
pub enum TransportSettings {
    #[serde(rename = "tcpSettings")]
    Tcp(TcpSettings),
    #[serde(rename = "wsSettings")]
    WebSocket(WsSettings),
    #[serde(rename = "kcpSettings")]
    Kcp(KcpSettings),
    #[serde(rename = "httpSettings")]
    Http(HttpSettings),
}

impl TransportSettings {
    pub fn network(&self) -> Network {
        match self {
            Self::Tcp(_) => Network::Tcp,
            Self::WebSocket(_) => Network::Ws,
            Self::Kcp(_) => Network::Kcp,
            Self::Http(_) => Network::Http,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderType {
    #[serde(rename = "type")]
    pub kind: String,
}

impl HeaderType {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TcpSettings {
    pub header: HeaderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<TcpRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<TcpResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TcpRequest {
    pub version: String,
    pub method: String,
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TcpResponse {
    pub version: String,
    pub status: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WsSettings {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KcpSettings {
    pub header: HeaderType,
    pub mtu: u32,
    pub tti: u32,
    pub uplink_capacity: u32,
    pub downlink_capacity: u32,
    pub congestion: bool,
    pub read_buffer_size: u32,
    pub write_buffer_size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HttpSettings {
    pub host: Vec<String>,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Outbound {
    pub protocol: String,
    pub settings: EmptySettings,
}

impl Outbound {
    /// Direct egress with no settings.
    pub fn direct() -> Self {
        Self {
            protocol: OUTBOUND_PROTOCOL.to_string(),
            settings: EmptySettings {},
        }
    }
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmptySettings {}
