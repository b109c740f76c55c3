//! Rayconf writes the configuration file of a local proxy daemon from a short,
//! hand-written description, and checks or stops the services running next to it
//! (typically the web server that fronts the daemon). The daemon and the web server
//! are external programs; rayconf only produces the daemon's config file and talks
//! to the operating system to query and stop processes.

/// CLI interface.
pub mod cli;

/// Configuration management.
pub mod config;

/// Fixed strings and defaults.
pub mod constants;

/// The daemon's native configuration document.
pub mod document;

/// Error handling.
pub mod error;

/// Simplified proxy configuration.
pub mod proxy;

/// Shell command execution.
pub mod shell;

/// Service status and stop control.
pub mod supervisor;

/// Daemon config generation.
pub mod transform;

#[doc(hidden)]
pub mod test_utils;
