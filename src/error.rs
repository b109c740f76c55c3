//! Error handling for rayconf.
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the rayconf configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error reading or accessing a configuration file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing YAML configuration.
    #[error("Invalid YAML format: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// A `${VAR}` reference points at a variable that is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The configuration has no `proxy` section to generate from.
    #[error("Config file has no 'proxy' section")]
    MissingProxySection,

    /// The requested service is not declared under `services`.
    #[error("Service '{0}' is not defined in the config file")]
    UnknownService(String),
}

/// Defines all possible errors that can occur while generating the daemon configuration.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The parent directory of the destination could not be created.
    #[error("Failed to create config directory {}: {source}", path.display())]
    DirectoryCreation {
        /// Directory that could not be created.
        path: PathBuf,
        /// The underlying error that occurred.
        #[source]
        source: std::io::Error,
    },

    /// No identifier could be produced for a client without one.
    #[error("Failed to generate an identifier for client #{index}: {reason}")]
    IdentifierSynthesis {
        /// Position of the client in the input list.
        index: usize,
        /// Why the generator gave up.
        reason: String,
    },

    /// The transport selector is not one of the supported codes.
    #[error("Unsupported transport type: {0}")]
    UnsupportedTransport(i64),

    /// The document could not be encoded as JSON.
    #[error("Failed to serialise daemon config: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The destination file could not be opened for writing.
    #[error("Failed to open config file {}: {source}", path.display())]
    FileOpen {
        /// Destination path.
        path: PathBuf,
        /// The underlying error that occurred.
        #[source]
        source: std::io::Error,
    },

    /// Writing the serialised document failed part way.
    #[error("Failed to write config file {}: {source}", path.display())]
    FileWrite {
        /// Destination path.
        path: PathBuf,
        /// The underlying error that occurred.
        #[source]
        source: std::io::Error,
    },
}

/// Error type for service status and stop operations.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The process listing failed without producing any output.
    #[error("Failed to check status of service '{service}': {source}")]
    StatusQueryFailed {
        /// The service being queried.
        service: String,
        /// The underlying error that occurred.
        #[source]
        source: std::io::Error,
    },

    /// The native stop command failed without producing any output.
    #[error("Failed to stop service '{service}': {source}")]
    StopCommandFailed {
        /// The service that failed to stop.
        service: String,
        /// The underlying error that occurred.
        #[source]
        source: std::io::Error,
    },

    /// The stop command ran but the service is still present afterwards.
    #[error("Service '{service}' is still running after stop")]
    StopVerificationFailed {
        /// The service that is still running.
        service: String,
    },
}
