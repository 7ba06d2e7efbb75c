//! # Magma Core - Foundation Types for the Magma Daemon
//!
//! Leaf layer every other daemon subsystem builds on:
//! - Closed type tags for generically stored values
//! - Byte-exact 24-bit signed and unsigned integer codecs
//! - Bounded per-thread scratch buffers with explicit overflow
//! - The core configuration record, validated once and published read-only
//!
//! ## Startup
//!
//! Configuration flows one way, before any worker thread exists:
//! ```text
//!   magmad.config ──► CoreConfig::from_file ──► governance::publish ──► ValidatedConfig
//!                                                     ▲                       │
//!                                    ResourceLimits::read_current       clone per thread
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod governance;
pub mod scratch;
pub mod types;
pub mod validation;

// Internal utilities
pub mod observability;

pub use governance::{ResourceLimits, ValidatedConfig};
pub use types::{CoreConfig, Error, Result, TypeTag, I24, U24};
