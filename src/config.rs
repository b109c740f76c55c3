//! Configuration management for rayconf.
use regex::{Captures, Regex};
use serde::Deserialize;
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use crate::constants::{DEFAULT_CONFIG_FILE, DEFAULT_OUTPUT_PATH, FALLBACK_CONFIG_FILE};
use crate::error::ConfigError;
use crate::proxy::ProxyConfig;
use crate::supervisor::ProbeMode;

/// Represents the structure of the configuration file.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Configuration version.
    pub version: String,
    /// Proxy daemon settings to generate the daemon config from.
    pub proxy: Option<ProxySection>,
    /// Map of service names to their respective control settings.
    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,
    /// Root directory from which relative paths are resolved.
    pub project_dir: Option<String>,
}

/// The `proxy` section: where to write plus what to write.
#[derive(Debug, Deserialize, Clone)]
pub struct ProxySection {
    /// Destination of the generated file.
    pub output: Option<PathBuf>,
    /// The simplified proxy configuration itself.
    #[serde(flatten)]
    pub settings: ProxyConfig,
}

/// Control settings for an externally managed service.
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    /// Path of the service's executable, used to find its processes.
    pub executable: PathBuf,
    /// Command that asks the service to stop (e.g. `nginx -s stop`).
    pub stop_command: String,
    /// How to check whether the service is running.
    pub probe: Option<ProbeMode>,
    /// Custom listing pipeline for the shell probe.
    pub status_command: Option<String>,
}

impl Config {
    /// Returns the proxy section or an error if the file has none.
    pub fn proxy(&self) -> Result<&ProxySection, ConfigError> {
        self.proxy.as_ref().ok_or(ConfigError::MissingProxySection)
    }

    /// Looks up a service by name.
    pub fn service(&self, name: &str) -> Result<&ServiceConfig, ConfigError> {
        self.services
            .get(name)
            .ok_or_else(|| ConfigError::UnknownService(name.to_string()))
    }

    /// Service names in a stable order.
    pub fn service_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolves the output path of the generated file against the project directory.
    pub fn output_path(&self) -> PathBuf {
        let output = self
            .proxy
            .as_ref()
            .and_then(|proxy| proxy.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

        match &self.project_dir {
            Some(base) if output.is_relative() => Path::new(base).join(output),
            _ => output,
        }
    }
}

fn env_var_pattern() -> Regex {
    Regex::new(r"\$\$|\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)").unwrap()
}

/// Expands `$VAR` and `${VAR}` references. `$$` yields a literal `$`; an unclosed
/// `${` is left untouched.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut missing: Option<String> = None;
    let expanded = env_var_pattern().replace_all(input, |caps: &Captures| {
        let Some(name) = caps.get(1).or_else(|| caps.get(2)) else {
            return "$".to_string();
        };

        env::var(name.as_str()).unwrap_or_else(|_| {
            missing.get_or_insert_with(|| name.as_str().to_string());
            String::new()
        })
    });

    match missing {
        Some(name) => Err(ConfigError::MissingEnvVar(name)),
        None => Ok(expanded.into_owned()),
    }
}

/// Loads and parses the configuration file, expanding environment variables.
pub fn load_config(config_path: Option<&str>) -> Result<Config, ConfigError> {
    let config_path = config_path.map(Path::new).unwrap_or_else(|| {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Path::new(DEFAULT_CONFIG_FILE)
        } else {
            Path::new(FALLBACK_CONFIG_FILE)
        }
    });

    let content = fs::read_to_string(config_path).map_err(|e| {
        ConfigError::ReadError(std::io::Error::new(
            e.kind(),
            format!("{} ({})", e, config_path.display()),
        ))
    })?;

    let expanded_content = expand_env_vars(&content)?;
    let mut config: Config = serde_yaml::from_str(&expanded_content)?;

    let base_path = config_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    config.project_dir = Some(base_path.to_string_lossy().to_string());
    Ok(config)
}
