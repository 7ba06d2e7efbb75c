//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the magma core layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Tag lookup on a value outside the closed enumeration.
    #[error("unknown type tag: {0}")]
    UnknownTag(u32),

    /// Integer codec input outside the representable range.
    #[error("{kind} value out of range: {value}")]
    Range { kind: &'static str, value: i64 },

    /// Fewer bytes available than a fixed-width field needs.
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// The configuration failed startup validation (fatal).
    #[error("configuration rejected: {0}")]
    ConfigValidation(#[from] ConfigViolation),

    /// A scratch buffer write did not fit. The buffer holds the truncated prefix.
    #[error("scratch buffer overflow: {attempted} bytes exceed capacity of {capacity}")]
    ScratchOverflow { capacity: usize, attempted: usize },

    /// The thread scratch buffer is already lent out on this thread.
    #[error("scratch buffer already in use on this thread")]
    ScratchBusy,

    /// A `Display` implementation failed while formatting into a scratch buffer.
    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Configuration file parse errors.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Serialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the daemon must refuse to start when this error surfaces
    /// during startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigValidation(_) | Error::ConfigParse(_) | Error::Io(_)
        )
    }
}

// Convenience constructors
impl Error {
    pub fn range(kind: &'static str, value: impl Into<i64>) -> Self {
        Self::Range {
            kind,
            value: value.into(),
        }
    }

    pub fn truncated(needed: usize, remaining: usize) -> Self {
        Self::Truncated { needed, remaining }
    }

    pub fn overflow(capacity: usize, attempted: usize) -> Self {
        Self::ScratchOverflow {
            capacity,
            attempted,
        }
    }
}

/// A single reason a configuration was refused at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("worker_threads = {requested} exceeds the hard ceiling of {ceiling}")]
    WorkerThreadsExceeded { requested: u32, ceiling: u32 },

    #[error("thread_stack_size = {requested} is below the minimum of {minimum}")]
    StackTooSmall { requested: u32, minimum: u32 },

    #[error("secure memory pool of {requested} bytes exceeds the memory lock limit of {limit} bytes")]
    MemoryPoolExceedsLockLimit { requested: u64, limit: u64 },

    #[error("secret `{0}` is missing")]
    MissingSecret(&'static str),

    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("{field} is {length} bytes long, the maximum is {max}")]
    TooLong {
        field: &'static str,
        length: usize,
        max: usize,
    },

    #[error("{field} must be an absolute path: {path}")]
    RelativePath { field: &'static str, path: String },

    #[error("invalid domain name: {0}")]
    InvalidDomain(String),

    #[error("page_length = {0} is not a positive power of two")]
    InvalidPageLength(i32),
}
