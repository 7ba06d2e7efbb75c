//! Startup path tests: load a config file, validate, publish.

use magma_core::governance::{self, CoreDumpPolicy, ResourceLimits};
use magma_core::types::{ConfigViolation, Error, WORKER_THREAD_LIMIT};
use magma_core::CoreConfig;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const VALID: &str = r#"
spool = "/var/spool/magma/"
page_length = 4096

[config]
output_config = false

[secure]
salt = "a-salt"
links = "a-links-key"
sessions = "a-sessions-key"

[secure.memory]
enable = true
length = 1048576

[system]
daemonize = true
root_directory = "/var/lib/magma"
impersonate_user = "magma"
increase_resource_limits = false
thread_stack_size = 1048576
worker_threads = 16384
network_buffer = 65536
enable_core_dumps = true
core_dump_size_limit = 2147483648
domain = "example.com"
"#;

/// Helper: write `content` to a temp file and load it.
fn load(content: &str) -> (NamedTempFile, CoreConfig) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    let config = CoreConfig::from_file(file.path()).unwrap();
    (file, config)
}

fn rejection(config: CoreConfig, limits: &ResourceLimits) -> ConfigViolation {
    match governance::publish(config, limits) {
        Err(Error::ConfigValidation(v)) => v,
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("config was accepted"),
    }
}

#[test]
fn test_file_round_trip_to_published_config() {
    let (file, config) = load(VALID);
    assert_eq!(config.config.file, file.path().to_path_buf());

    let published = config.publish(&ResourceLimits::unlimited()).unwrap();
    assert_eq!(published.system.worker_threads, WORKER_THREAD_LIMIT);
    assert_eq!(published.system.root_directory, Some(PathBuf::from("/var/lib/magma")));
    assert_eq!(published.thread_pool().network_buffer, 65536);
    assert_eq!(published.core_dumps(), CoreDumpPolicy::Limited(2_147_483_648));
    assert_eq!(published.secure_memory().unwrap().pool_length, 1_048_576);
    assert_eq!(published.sessions(), "a-sessions-key");
}

#[test]
fn test_worker_threads_over_ceiling_rejected() {
    let (_file, config) = load(&VALID.replace("worker_threads = 16384", "worker_threads = 20000"));
    assert_eq!(
        rejection(config, &ResourceLimits::unlimited()),
        ConfigViolation::WorkerThreadsExceeded {
            requested: 20000,
            ceiling: 16384
        }
    );
}

#[test]
fn test_pool_exceeding_simulated_lock_limit_rejected() {
    let (_file, config) = load(VALID);
    let limits = ResourceLimits::with_memlock(Some(65_536), Some(65_536));
    assert!(matches!(
        rejection(config, &limits),
        ConfigViolation::MemoryPoolExceedsLockLimit {
            requested: 1_048_576,
            limit: 65_536
        }
    ));
}

#[test]
fn test_missing_secret_with_secure_memory_rejected() {
    let (_file, config) = load(&VALID.replace("links = \"a-links-key\"\n", ""));
    assert!(config.secure.memory.enable);
    assert_eq!(
        rejection(config, &ResourceLimits::unlimited()),
        ConfigViolation::MissingSecret("secure.links")
    );
}

#[test]
fn test_published_config_is_shared_across_threads() {
    let (_file, config) = load(VALID);
    let published = config.publish(&ResourceLimits::unlimited()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let view = published.clone();
            std::thread::spawn(move || (view.thread_pool().worker_threads, view.salt().len()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), (16384, 6));
    }
}

#[test]
fn test_missing_file_is_fatal_io() {
    let err = CoreConfig::from_file("/nonexistent/magmad.config").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.is_fatal());
}
