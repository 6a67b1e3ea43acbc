use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::candidates::encode_path;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub prober: ProberConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub print: PrintConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8000
}

/// Where the question and mark scheme images live.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// Base URL that candidate paths are resolved against by the HTTP prober
    /// (e.g., "http://localhost:8000").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Local directory holding `questions/` and `mark-schemes/`.
    /// Served as static files and used by the filesystem prober.
    #[serde(default)]
    pub root_dir: Option<PathBuf>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            root_dir: None,
        }
    }
}

impl AssetsConfig {
    /// Base that clients of this server should load assets from: the
    /// server itself when it serves `root_dir`, otherwise `base_url`.
    pub fn public_base(&self) -> String {
        match self.root_dir {
            Some(_) => "/".to_string(),
            None => self.base_url.clone(),
        }
    }

    /// `file://` URL of `root_dir`, for documents opened from disk.
    pub fn file_base(&self) -> Option<String> {
        let root = std::path::absolute(self.root_dir.as_ref()?).ok()?;
        Some(format!("file://{}", encode_path(&root.to_string_lossy())))
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

/// Available existence probe backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProberBackend {
    #[default]
    Http,
    Filesystem,
}

/// HTTP method used by the HTTP prober.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMethod {
    #[default]
    Head,
    Get,
}

/// Existence prober configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProberConfig {
    #[serde(default)]
    pub backend: ProberBackend,
    #[serde(default)]
    pub method: ProbeMethod,
    /// Per-probe time budget in milliseconds (default: 300)
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum probes in flight within one batch (default: 64)
    #[serde(default = "default_max_concurrent_probes")]
    pub max_concurrent_probes: usize,
    /// Also probe the mark scheme paired with every found question.
    #[serde(default = "default_probe_companions")]
    pub probe_companions: bool,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            backend: ProberBackend::default(),
            method: ProbeMethod::default(),
            timeout_ms: default_probe_timeout_ms(),
            max_concurrent_probes: default_max_concurrent_probes(),
            probe_companions: default_probe_companions(),
        }
    }
}

fn default_probe_timeout_ms() -> u64 {
    300
}

fn default_max_concurrent_probes() -> usize {
    64
}

fn default_probe_companions() -> bool {
    true
}

/// Scan cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// How long a cached filter signature stays fresh (default: 300)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    300
}

/// Print output configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PrintConfig {
    /// When set, print documents are also written here as HTML files.
    /// The API still returns each document inline.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub assets: SanitizedAssetsConfig,
    pub prober: ProberConfig,
    pub cache: CacheConfig,
    pub print_to_directory: bool,
}

/// Asset settings without local filesystem paths
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAssetsConfig {
    pub base_url: String,
    pub serving_local_assets: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            assets: SanitizedAssetsConfig {
                base_url: config.assets.base_url.clone(),
                serving_local_assets: config.assets.root_dir.is_some(),
            },
            prober: config.prober.clone(),
            cache: config.cache.clone(),
            print_to_directory: config.print.output_dir.is_some(),
        }
    }
}
