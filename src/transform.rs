//! Turns a [`ProxyConfig`] into the daemon's native document and writes it out.
//!
//! The file is always regenerated in full. Nothing from a previous run is read
//! back, so identifiers synthesized for clients without one change on every run.
use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::{
    DEFAULT_OUTPUT_PATH, HEADER_VALUE_SEPARATOR, LIST_SEPARATOR, TCP_HEADER_HTTP,
};
use crate::document::{
    DaemonConfig, HeaderType, HttpSettings, Inbound, InboundClient, KcpSettings,
    StreamSettings, TcpRequest, TcpResponse, TcpSettings, TransportSettings, WsSettings,
};
use crate::error::GenerateError;
use crate::proxy::{
    ClientEntry, HeaderEntry, Http2Config, KcpConfig, ProxyConfig, TcpConfig,
    TransportKind, WebSocketConfig,
};

/// Source of identifiers for clients that do not bring their own.
pub trait IdGenerator {
    /// Produces a fresh identifier. `index` is the client's position in the input.
    fn generate(&self, index: usize) -> Result<String, GenerateError>;
}

/// Time-ordered (version 7) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeOrderedIds;

impl IdGenerator for TimeOrderedIds {
    fn generate(&self, _index: usize) -> Result<String, GenerateError> {
        Ok(Uuid::now_v7().to_string())
    }
}

/// Generates and writes the daemon configuration.
#[derive(Debug, Clone)]
pub struct ConfigGenerator<G = TimeOrderedIds> {
    destination: PathBuf,
    ids: G,
}

impl Default for ConfigGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_PATH)
    }
}

impl ConfigGenerator {
    /// Creates a generator writing to `destination`.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self::with_ids(destination, TimeOrderedIds)
    }
}

impl<G: IdGenerator> ConfigGenerator<G> {
    /// Creates a generator with a custom identifier source.
    pub fn with_ids(destination: impl Into<PathBuf>, ids: G) -> Self {
        Self {
            destination: destination.into(),
            ids,
        }
    }

    /// Path the generated file is written to.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Builds the typed daemon document.
    pub fn render(&self, config: &ProxyConfig) -> Result<DaemonConfig, GenerateError> {
        let kind = TransportKind::from_code(config.transport)?;
        let clients = self.resolve_clients(&config.clients)?;

        let transport = match kind {
            TransportKind::Tcp => TransportSettings::Tcp(tcp_settings(&config.tcp)),
            TransportKind::WebSocket => {
                TransportSettings::WebSocket(ws_settings(&config.web_socket))
            }
            TransportKind::Kcp => TransportSettings::Kcp(kcp_settings(&config.kcp)),
            TransportKind::Http2 => {
                TransportSettings::Http(http_settings(&config.http2))
            }
        };
        debug!(
            "Rendering {} inbound on port {} for {} client(s)",
            kind,
            config.port,
            clients.len()
        );

        let inbound =
            Inbound::loopback(config.port, clients, StreamSettings::plain(transport));
        Ok(DaemonConfig::new(inbound))
    }

    /// Renders and serialises the document.
    pub fn transform(&self, config: &ProxyConfig) -> Result<Vec<u8>, GenerateError> {
        let document = self.render(config)?;
        Ok(serde_json::to_vec_pretty(&document)?)
    }

    /// Renders the document and overwrites the destination file with it.
    ///
    /// The document is fully built before the file is touched, so a rejected
    /// config leaves the previous file alone. A failure during the write itself
    /// can leave the file truncated.
    pub fn write(&self, config: &ProxyConfig) -> Result<(), GenerateError> {
        let content = self.transform(config)?;

        if let Some(parent) = self.destination.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| {
                GenerateError::DirectoryCreation {
                    path: parent.to_path_buf(),
                    source,
                }
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.destination)
            .map_err(|source| GenerateError::FileOpen {
                path: self.destination.clone(),
                source,
            })?;

        file.write_all(&content)
            .map_err(|source| GenerateError::FileWrite {
                path: self.destination.clone(),
                source,
            })?;

        info!(
            "Wrote daemon config ({} bytes) to {:?}",
            content.len(),
            self.destination
        );
        Ok(())
    }

    /// Resolves each client exactly once so every reference sees the same id.
    fn resolve_clients(
        &self,
        clients: &[ClientEntry],
    ) -> Result<Vec<InboundClient>, GenerateError> {
        clients
            .iter()
            .enumerate()
            .map(|(index, client)| {
                let id = if client.user_id.is_empty() {
                    let id = self.ids.generate(index)?;
                    debug!("Generated id {id} for client #{index}");
                    id
                } else {
                    client.user_id.clone()
                };

                Ok(InboundClient {
                    id,
                    alter_id: client.alter_id,
                })
            })
            .collect()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR).map(str::to_string).collect()
}

/// Multi-valued header map, or `None` when no headers were given.
fn multi_value_headers(
    headers: &[HeaderEntry],
) -> Option<BTreeMap<String, Vec<String>>> {
    if headers.is_empty() {
        return None;
    }

    Some(
        headers
            .iter()
            .map(|header| {
                let values: Vec<String> = header
                    .value
                    .split(HEADER_VALUE_SEPARATOR)
                    .map(str::to_string)
                    .collect();
                (header.key.clone(), values)
            })
            .collect(),
    )
}

fn tcp_settings(tcp: &TcpConfig) -> TcpSettings {
    let mut settings = TcpSettings {
        header: HeaderType::new(tcp.header_type.clone()),
        request: None,
        response: None,
    };

    if tcp.header_type == TCP_HEADER_HTTP {
        settings.request = Some(TcpRequest {
            version: tcp.request.version.clone(),
            method: tcp.request.method.clone(),
            path: split_list(&tcp.request.path),
            headers: multi_value_headers(&tcp.request.headers),
        });
        settings.response = Some(TcpResponse {
            version: tcp.response.version.clone(),
            status: tcp.response.status.clone(),
            reason: tcp.response.reason.clone(),
            headers: multi_value_headers(&tcp.response.headers),
        });
    }

    settings
}

fn ws_settings(ws: &WebSocketConfig) -> WsSettings {
    let headers = (!ws.headers.is_empty()).then(|| {
        ws.headers
            .iter()
            .map(|header| (header.key.clone(), header.value.clone()))
            .collect()
    });

    WsSettings {
        path: ws.path.clone(),
        headers,
    }
}

fn kcp_settings(kcp: &KcpConfig) -> KcpSettings {
    KcpSettings {
        header: HeaderType::new(kcp.header_type.clone()),
        mtu: kcp.mtu,
        tti: kcp.tti,
        uplink_capacity: kcp.uplink_capacity,
        downlink_capacity: kcp.downlink_capacity,
        congestion: kcp.congestion,
        read_buffer_size: kcp.read_buffer_size,
        write_buffer_size: kcp.write_buffer_size,
    }
}

fn http_settings(http2: &Http2Config) -> HttpSettings {
    HttpSettings {
        host: split_list(&http2.host),
        path: http2.path.clone(),
    }
}
