//! Constants and default values for rayconf.
//!
//! This module centralizes the fixed strings of the generated daemon document and
//! the defaults used when the configuration file leaves a value out.

// ============================================================================
// File System Constants
// ============================================================================

/// Default destination of the generated daemon configuration.
pub const DEFAULT_OUTPUT_PATH: &str = "/usr/local/etc/v2ray/config.json";

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "rayconf.yaml";

/// Fallback config file name checked after [`DEFAULT_CONFIG_FILE`].
pub const FALLBACK_CONFIG_FILE: &str = "rayconf.yml";

// ============================================================================
// Daemon Document Constants
// ============================================================================

/// Address the inbound listens on. Public traffic arrives through the web server.
pub const INBOUND_LISTEN_ADDR: &str = "127.0.0.1";

/// Protocol identity of the single inbound.
pub const INBOUND_PROTOCOL: &str = "vmess";

/// Protocol identity of the single outbound (direct egress).
pub const OUTBOUND_PROTOCOL: &str = "freedom";

/// Stream security marker. Transport encryption is never configured here.
pub const STREAM_SECURITY_NONE: &str = "none";

/// Raw-stream header type that enables the request/response disguise blocks.
pub const TCP_HEADER_HTTP: &str = "http";

/// Raw-stream header type with no disguise.
pub const TCP_HEADER_NONE: &str = "none";

/// Separator for multi-valued list fields (request paths, HTTP/2 hosts).
pub const LIST_SEPARATOR: char = ',';

/// Separator for multiple values of a single raw-stream header.
pub const HEADER_VALUE_SEPARATOR: &str = ";;;";

// ============================================================================
// Shell Execution Constants
// ============================================================================

/// Default shell used for executing status and stop commands.
pub const DEFAULT_SHELL: &str = "sh";

/// Shell argument flag for executing command strings.
pub const SHELL_COMMAND_FLAG: &str = "-c";
