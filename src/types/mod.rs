//! Core types for the magma daemon.
//!
//! This module provides foundational types used throughout the system:
//! - **Tags**: The closed set of value kinds for generically stored data
//! - **Int24**: Byte-exact 24-bit signed and unsigned integers
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: The core configuration record and its sections

mod config;
mod errors;
mod int24;
mod secret;
mod tag;

pub use config::{
    ConfigSection, CoreConfig, MemorySection, SecureSection, SystemSection,
    CRYPTOGRAPHY_SEED_SIZE, DEFAULT_THREAD_STACK_SIZE, FILENAME_MAX, FILEPATH_MAX, HOSTNAME_MAX,
    MIN_THREAD_STACK_SIZE, WORKER_THREAD_LIMIT,
};
pub use errors::{ConfigViolation, Error, Result};
pub use int24::{
    decode_i24, decode_u24, encode_i24, encode_u24, Int24Buf, Int24BufMut, I24, INT24_MAX,
    INT24_MIN, INT24_WIDTH, U24, UINT24_MAX, UINT24_MIN,
};
pub use secret::Secret;
pub use tag::{type_name, TypeTag};
