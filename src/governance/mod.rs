//! Startup validation and publication of the core configuration.
//!
//! The startup path loads a [`CoreConfig`], then hands it to [`publish`]
//! before any worker thread or listener exists. A successful publish yields a
//! [`ValidatedConfig`]: a shared, read-only handle that is cloned into every
//! subsystem and thread. Moving it into a spawned thread is the only
//! synchronization readers need.
//!
//! ```text
//!   loader ──► CoreConfig ──► publish(limits) ──► ValidatedConfig ──┬─► thread pool
//!                                  │                                ├─► secure memory
//!                                  └─► ConfigViolation (fatal)      └─► crypto (borrows secrets)
//! ```

pub mod limits;

use std::ops::Deref;
use std::sync::Arc;

use crate::types::{
    ConfigViolation, CoreConfig, MemorySection, Result, SecureSection, FILEPATH_MAX,
    MIN_THREAD_STACK_SIZE, WORKER_THREAD_LIMIT,
};
use crate::validation::{
    validate_hostname, validate_max_len, validate_non_empty, validate_path, validate_positive,
};

pub use limits::{ResourceLimits, Rlimit};

/// Check every acceptance rule, stopping at the first violation.
pub fn validate(config: &CoreConfig, limits: &ResourceLimits) -> Result<()> {
    validate_max_len(
        config.config.file.as_os_str().len(),
        FILEPATH_MAX,
        "config.file",
    )?;

    let system = &config.system;
    check_worker_threads(system.worker_threads)?;
    check_thread_stack(system.thread_stack_size)?;
    validate_positive(u64::from(system.network_buffer), "system.network_buffer")?;
    tracing::debug!(
        worker_threads = system.worker_threads,
        thread_stack_size = system.thread_stack_size,
        network_buffer = system.network_buffer,
        "thread settings accepted"
    );

    check_secure_memory(
        &config.secure.memory,
        system.increase_resource_limits,
        limits,
    )?;
    check_secrets(&config.secure)?;
    tracing::debug!(
        enabled = config.secure.memory.enable,
        length = config.secure.memory.length,
        "secure memory accepted"
    );

    if system.enable_core_dumps {
        validate_positive(system.core_dump_size_limit, "system.core_dump_size_limit")?;
        tracing::debug!(
            limit = system.core_dump_size_limit,
            "core dump limit accepted"
        );
    }

    if let Some(root) = &system.root_directory {
        validate_path(root, "system.root_directory", true)?;
    }
    if let Some(user) = &system.impersonate_user {
        validate_non_empty(user, "system.impersonate_user")?;
    }
    if let Some(domain) = &system.domain {
        validate_hostname(domain)?;
    }

    validate_path(&config.spool, "spool", true)?;
    check_page_length(config.page_length)?;
    tracing::debug!(
        spool = %config.spool.display(),
        page_length = config.page_length,
        "storage settings accepted"
    );

    Ok(())
}

/// Validate `config` and publish it as the read-only process configuration.
pub fn publish(config: CoreConfig, limits: &ResourceLimits) -> Result<ValidatedConfig> {
    if config.config.output_resource_limits {
        tracing::info!(
            memlock_soft = ?limits.memlock.soft,
            memlock_hard = ?limits.memlock.hard,
            "resource limits"
        );
    }

    if let Err(err) = validate(&config, limits) {
        tracing::error!(file = %config.config.file.display(), error = %err, "core configuration rejected");
        return Err(err);
    }

    if config.config.output_config {
        tracing::info!(config = %config.to_redacted_json()?, "effective core configuration");
    }

    tracing::info!(
        file = %config.config.file.display(),
        worker_threads = config.system.worker_threads,
        thread_stack_size = config.system.thread_stack_size,
        secure_memory = config.secure.memory.enable,
        "core configuration published"
    );

    Ok(ValidatedConfig {
        inner: Arc::new(config),
    })
}

impl CoreConfig {
    pub fn validate(&self, limits: &ResourceLimits) -> Result<()> {
        validate(self, limits)
    }

    pub fn publish(self, limits: &ResourceLimits) -> Result<ValidatedConfig> {
        publish(self, limits)
    }
}

fn check_worker_threads(requested: u32) -> Result<()> {
    validate_positive(u64::from(requested), "system.worker_threads")?;
    if requested > WORKER_THREAD_LIMIT {
        return Err(ConfigViolation::WorkerThreadsExceeded {
            requested,
            ceiling: WORKER_THREAD_LIMIT,
        }
        .into());
    }
    Ok(())
}

fn check_thread_stack(requested: u32) -> Result<()> {
    if requested < MIN_THREAD_STACK_SIZE {
        return Err(ConfigViolation::StackTooSmall {
            requested,
            minimum: MIN_THREAD_STACK_SIZE,
        }
        .into());
    }
    Ok(())
}

/// The pool must fit the soft limit, or the hard limit when the daemon is
/// allowed to raise its soft limit.
fn check_secure_memory(
    memory: &MemorySection,
    increase_resource_limits: bool,
    limits: &ResourceLimits,
) -> Result<()> {
    if !memory.enable {
        return Ok(());
    }
    validate_positive(memory.length, "secure.memory.length")?;

    let memlock = &limits.memlock;
    let (fits, ceiling) = if increase_resource_limits {
        (memlock.fits_hard(memory.length), memlock.hard)
    } else {
        (memlock.fits_soft(memory.length), memlock.soft)
    };

    if !fits {
        return Err(ConfigViolation::MemoryPoolExceedsLockLimit {
            requested: memory.length,
            limit: ceiling.unwrap_or(u64::MAX),
        }
        .into());
    }

    if !memlock.fits_soft(memory.length) {
        tracing::warn!(
            requested = memory.length,
            soft_limit = ?memlock.soft,
            "secure memory pool needs the memory lock limit raised"
        );
    }
    Ok(())
}

fn check_secrets(secure: &SecureSection) -> Result<()> {
    let secrets = [
        ("secure.salt", &secure.salt),
        ("secure.links", &secure.links),
        ("secure.sessions", &secure.sessions),
    ];
    for (name, secret) in secrets {
        if secret.is_empty() {
            return Err(ConfigViolation::MissingSecret(name).into());
        }
    }
    Ok(())
}

fn check_page_length(page_length: i32) -> Result<()> {
    let valid = u32::try_from(page_length).map_or(false, u32::is_power_of_two);
    if !valid {
        return Err(ConfigViolation::InvalidPageLength(page_length).into());
    }
    Ok(())
}

/// Thread pool sizing read by the pool spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadPoolPlan {
    pub worker_threads: u32,
    pub stack_size: u32,
    pub network_buffer: u32,
}

/// Secure memory pool sizing read by the locked allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecureMemoryPlan {
    pub pool_length: u64,

    /// The allocator may raise the memory lock soft limit before locking.
    pub raise_limit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreDumpPolicy {
    Disabled,
    Limited(u64),
}

/// A configuration that passed validation. Cheap to clone, never mutable.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    inner: Arc<CoreConfig>,
}

impl ValidatedConfig {
    pub fn thread_pool(&self) -> ThreadPoolPlan {
        ThreadPoolPlan {
            worker_threads: self.inner.system.worker_threads,
            stack_size: self.inner.system.thread_stack_size,
            network_buffer: self.inner.system.network_buffer,
        }
    }

    pub fn secure_memory(&self) -> Option<SecureMemoryPlan> {
        let memory = &self.inner.secure.memory;
        memory.enable.then(|| SecureMemoryPlan {
            pool_length: memory.length,
            raise_limit: self.inner.system.increase_resource_limits,
        })
    }

    pub fn core_dumps(&self) -> CoreDumpPolicy {
        if self.inner.system.enable_core_dumps {
            CoreDumpPolicy::Limited(self.inner.system.core_dump_size_limit)
        } else {
            CoreDumpPolicy::Disabled
        }
    }

    pub fn salt(&self) -> &str {
        self.inner.secure.salt.expose()
    }

    pub fn links(&self) -> &str {
        self.inner.secure.links.expose()
    }

    pub fn sessions(&self) -> &str {
        self.inner.secure.sessions.expose()
    }

    /// Shared handle for subsystems that store the configuration.
    pub fn shared(&self) -> Arc<CoreConfig> {
        Arc::clone(&self.inner)
    }
}

impl Deref for ValidatedConfig {
    type Target = CoreConfig;

    fn deref(&self) -> &CoreConfig {
        &self.inner
    }
}
