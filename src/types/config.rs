//! Configuration structures.
//!
//! Configuration is loaded from a TOML file by the daemon's startup path and
//! must pass [`crate::governance::publish`] before any subsystem may read it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::errors::Result;
use super::secret::Secret;

/// Longest accepted file path.
pub const FILEPATH_MAX: usize = 4096;
/// Longest accepted file name component.
pub const FILENAME_MAX: usize = 255;
/// Longest accepted host name.
pub const HOSTNAME_MAX: usize = 255;

/// Stack reserved for each spawned thread unless configured otherwise.
pub const DEFAULT_THREAD_STACK_SIZE: u32 = 1_048_576;
/// Smallest stack a worker may be started with.
pub const MIN_THREAD_STACK_SIZE: u32 = 65_536;
/// Hard ceiling on worker threads, regardless of system limits.
pub const WORKER_THREAD_LIMIT: u32 = 16_384;
/// Bytes of entropy used to seed the random number generator.
pub const CRYPTOGRAPHY_SEED_SIZE: usize = 256;

/// Daemon-wide core configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Spool directory.
    #[serde(default = "default_spool")]
    pub spool: PathBuf,

    /// Memory page size, used to align memory mapped files.
    #[serde(default = "default_page_length")]
    pub page_length: i32,

    /// Config file handling.
    #[serde(default)]
    pub config: ConfigSection,

    /// Secure memory and secrets.
    #[serde(default)]
    pub secure: SecureSection,

    /// Process, thread and resource settings.
    #[serde(default)]
    pub system: SystemSection,
}

fn default_spool() -> PathBuf {
    PathBuf::from("/tmp/magma/")
}

fn default_page_length() -> i32 {
    4096
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            spool: default_spool(),
            page_length: default_page_length(),
            config: ConfigSection::default(),
            secure: SecureSection::default(),
            system: SystemSection::default(),
        }
    }
}

/// Config file handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSection {
    /// Dump the effective configuration to the log on publish.
    pub output_config: bool,

    /// Log the resource limits used during validation.
    pub output_resource_limits: bool,

    /// Path to the config file this record was loaded from.
    pub file: PathBuf,
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            output_config: false,
            output_resource_limits: false,
            file: PathBuf::from("/etc/magmad.config"),
        }
    }
}

/// Secure memory pool and secrets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecureSection {
    pub memory: MemorySection,

    /// Added to hash operations.
    #[serde(skip_serializing)]
    pub salt: Secret,

    /// Encrypts links that reflect back to the daemon.
    #[serde(skip_serializing)]
    pub links: Secret,

    /// Encrypts session tokens.
    #[serde(skip_serializing)]
    pub sessions: Secret,
}

/// Locked secure memory pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySection {
    pub enable: bool,

    /// Pool size in bytes. Must fit within the memory lock limit.
    pub length: u64,
}

impl Default for MemorySection {
    fn default() -> Self {
        Self {
            enable: false,
            length: 32 * 1024 * 1024,
        }
    }
}

/// Process, thread and resource settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSection {
    /// Fork into the background and release the console.
    pub daemonize: bool,

    /// Change the root path to this directory.
    pub root_directory: Option<PathBuf>,

    /// Switch the effective user to this account.
    pub impersonate_user: Option<String>,

    /// Attempt to raise system limits instead of failing.
    pub increase_resource_limits: bool,

    pub thread_stack_size: u32,
    pub worker_threads: u32,
    pub network_buffer: u32,

    pub enable_core_dumps: bool,

    /// Only consulted when core dumps are enabled.
    pub core_dump_size_limit: u64,

    /// Default domain for new addresses and unqualified logins.
    pub domain: Option<String>,
}

impl Default for SystemSection {
    fn default() -> Self {
        Self {
            daemonize: false,
            root_directory: None,
            impersonate_user: None,
            increase_resource_limits: false,
            thread_stack_size: DEFAULT_THREAD_STACK_SIZE,
            worker_threads: 64,
            network_buffer: 8192,
            enable_core_dumps: false,
            core_dump_size_limit: 1024 * 1024 * 1024,
            domain: None,
        }
    }
}

impl CoreConfig {
    /// Parse a TOML document. Missing keys take their defaults; nothing is validated.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML config file and remember where it came from.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config.file = path.to_path_buf();
        Ok(config)
    }

    /// Pretty JSON rendering with the secrets left out.
    pub fn to_redacted_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
