//! Resource limit snapshots.
//!
//! Validation compares the secure memory pool against a [`ResourceLimits`]
//! value instead of querying the kernel itself, so tests can supply simulated
//! limits and the startup path decides when the real ones are read.

use crate::types::Result;

/// Soft and hard value of one limit. `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rlimit {
    pub soft: Option<u64>,
    pub hard: Option<u64>,
}

impl Rlimit {
    pub const UNLIMITED: Rlimit = Rlimit {
        soft: None,
        hard: None,
    };

    pub fn fits_soft(&self, bytes: u64) -> bool {
        self.soft.map_or(true, |limit| bytes <= limit)
    }

    pub fn fits_hard(&self, bytes: u64) -> bool {
        self.hard.map_or(true, |limit| bytes <= limit)
    }
}

/// The limits consulted during configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Bytes of memory the process may lock.
    pub memlock: Rlimit,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl ResourceLimits {
    pub fn unlimited() -> Self {
        Self {
            memlock: Rlimit::UNLIMITED,
        }
    }

    /// Simulated memory lock limit.
    pub fn with_memlock(soft: Option<u64>, hard: Option<u64>) -> Self {
        Self {
            memlock: Rlimit { soft, hard },
        }
    }

    /// Read the current `RLIMIT_MEMLOCK` soft and hard values.
    #[cfg(unix)]
    pub fn read_current() -> Result<Self> {
        let (soft, hard) = rlimit::getrlimit(rlimit::Resource::MEMLOCK)?;
        Ok(Self::from_raw_memlock(soft, hard))
    }

    /// Memory lock limits cannot be read here, and guessing would let any
    /// pool size through.
    #[cfg(not(unix))]
    pub fn read_current() -> Result<Self> {
        Err(crate::types::Error::Io(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "memory lock limits are not available on this platform",
        )))
    }

    /// Build from raw rlimit values, mapping `RLIM_INFINITY` to unlimited.
    #[cfg(unix)]
    pub fn from_raw_memlock(soft: u64, hard: u64) -> Self {
        Self::with_memlock(finite(soft), finite(hard))
    }
}

#[cfg(unix)]
fn finite(raw: u64) -> Option<u64> {
    (raw != rlimit::INFINITY).then_some(raw)
}
