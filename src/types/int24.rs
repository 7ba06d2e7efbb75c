//! Fixed-width 24-bit integers.
//!
//! Wire layout, independent of host endianness:
//! ```text
//! ┌─────────┬──────────┬───────────┐
//! │ byte0   │ byte1    │ byte2     │
//! │ bits 0-7│ bits 8-15│ bits 16-23│
//! └─────────┴──────────┴───────────┘
//! ```
//! For the signed variant, the top bit of byte2 is the two's-complement sign.
//! The signed range is symmetric: `00 00 80` is not a valid `I24`.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::io::IoSlice;

use super::errors::{Error, Result};

pub const INT24_MIN: i32 = -8_388_607;
pub const INT24_MAX: i32 = 8_388_607;
pub const UINT24_MIN: u32 = 0;
pub const UINT24_MAX: u32 = 16_777_215;

/// Encoded width in bytes.
pub const INT24_WIDTH: usize = 3;

/// Encode a signed value into its three little-endian bytes.
pub fn encode_i24(value: i32) -> Result<[u8; 3]> {
    if !(INT24_MIN..=INT24_MAX).contains(&value) {
        return Err(Error::range("int24", value));
    }
    Ok([
        (value & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        ((value >> 16) & 0xFF) as u8,
    ])
}

/// Decode three little-endian bytes, sign-extending from the top bit of byte2.
pub fn decode_i24(bytes: [u8; 3]) -> i32 {
    let raw = u32::from(bytes[0]) | (u32::from(bytes[1]) << 8) | (u32::from(bytes[2]) << 16);
    ((raw << 8) as i32) >> 8
}

/// Encode an unsigned value into its three little-endian bytes.
pub fn encode_u24(value: u32) -> Result<[u8; 3]> {
    if value > UINT24_MAX {
        return Err(Error::range("uint24", value));
    }
    Ok([
        (value & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        ((value >> 16) & 0xFF) as u8,
    ])
}

pub fn decode_u24(bytes: [u8; 3]) -> u32 {
    u32::from(bytes[0]) | (u32::from(bytes[1]) << 8) | (u32::from(bytes[2]) << 16)
}

/// Signed 24-bit integer, stored as its three wire bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct I24([u8; 3]);

impl I24 {
    pub const MIN: I24 = I24([0x01, 0x00, 0x80]);
    pub const MAX: I24 = I24([0xFF, 0xFF, 0x7F]);
    pub const ZERO: I24 = I24([0x00, 0x00, 0x00]);

    pub fn new(value: i32) -> Result<Self> {
        encode_i24(value).map(Self)
    }

    /// Rebuild from wire bytes. Rejects `00 00 80`, which decodes below `INT24_MIN`.
    pub fn from_le_bytes(bytes: [u8; 3]) -> Result<Self> {
        let value = decode_i24(bytes);
        if value < INT24_MIN {
            return Err(Error::range("int24", value));
        }
        Ok(Self(bytes))
    }

    pub fn to_le_bytes(self) -> [u8; 3] {
        self.0
    }

    pub fn get(self) -> i32 {
        decode_i24(self.0)
    }
}

impl fmt::Debug for I24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("I24").field(&self.get()).finish()
    }
}

impl fmt::Display for I24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl PartialOrd for I24 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for I24 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.get().cmp(&other.get())
    }
}

impl TryFrom<i32> for I24 {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<I24> for i32 {
    fn from(value: I24) -> Self {
        value.get()
    }
}

/// Unsigned 24-bit integer, stored as its three wire bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct U24([u8; 3]);

impl U24 {
    pub const MIN: U24 = U24([0x00, 0x00, 0x00]);
    pub const MAX: U24 = U24([0xFF, 0xFF, 0xFF]);

    pub fn new(value: u32) -> Result<Self> {
        encode_u24(value).map(Self)
    }

    /// Every 3-byte pattern is a valid unsigned value.
    pub fn from_le_bytes(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }

    pub fn to_le_bytes(self) -> [u8; 3] {
        self.0
    }

    pub fn get(self) -> u32 {
        decode_u24(self.0)
    }
}

impl fmt::Debug for U24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("U24").field(&self.get()).finish()
    }
}

impl fmt::Display for U24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl PartialOrd for U24 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U24 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.get().cmp(&other.get())
    }
}

impl TryFrom<u32> for U24 {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<U24> for u32 {
    fn from(value: U24) -> Self {
        value.get()
    }
}

/// Reads 24-bit fields out of any `bytes::Buf`.
///
/// A failed read leaves the buffer where it was, as long as the buffer
/// exposes its next three bytes through `Buf::chunks_vectored`. `Bytes`,
/// slices and chains of them all do.
pub trait Int24Buf: Buf {
    fn try_get_u24_le(&mut self) -> Result<U24> {
        read_three(self, |bytes| Ok(U24::from_le_bytes(bytes)))
    }

    fn try_get_i24_le(&mut self) -> Result<I24> {
        read_three(self, I24::from_le_bytes)
    }
}

impl<B: Buf> Int24Buf for B {}

/// Appends 24-bit fields to any `bytes::BufMut`.
pub trait Int24BufMut: BufMut {
    fn put_u24_le(&mut self, value: U24) {
        self.put_slice(&value.to_le_bytes());
    }

    fn put_i24_le(&mut self, value: I24) {
        self.put_slice(&value.to_le_bytes());
    }
}

impl<B: BufMut> Int24BufMut for B {}

/// Check the next three bytes with `check`, consuming them only on success.
fn read_three<B, T>(buf: &mut B, check: impl FnOnce([u8; 3]) -> Result<T>) -> Result<T>
where
    B: Buf + ?Sized,
{
    let remaining = buf.remaining();
    if remaining < INT24_WIDTH {
        return Err(Error::truncated(INT24_WIDTH, remaining));
    }

    match peek_three(buf) {
        Some(bytes) => {
            let value = check(bytes)?;
            buf.advance(INT24_WIDTH);
            Ok(value)
        }
        // Only reached for Buf impls that expose fewer than three bytes
        // through `chunks_vectored`.
        None => {
            let mut bytes = [0u8; 3];
            buf.copy_to_slice(&mut bytes);
            check(bytes)
        }
    }
}

fn peek_three<B: Buf + ?Sized>(buf: &B) -> Option<[u8; 3]> {
    let mut slices = [IoSlice::new(&[]); INT24_WIDTH];
    let filled = buf.chunks_vectored(&mut slices);

    let mut bytes = [0u8; 3];
    let mut n = 0;
    for &byte in slices[..filled].iter().flat_map(|slice| slice.iter()) {
        if n == INT24_WIDTH {
            break;
        }
        bytes[n] = byte;
        n += 1;
    }
    (n == INT24_WIDTH).then_some(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{Bytes, BytesMut};
    use proptest::prelude::*;

    #[test]
    fn test_signed_known_encodings() {
        assert_eq!(encode_i24(8_388_607).unwrap(), [0xFF, 0xFF, 0x7F]);
        assert_eq!(decode_i24([0xFF, 0xFF, 0x7F]), 8_388_607);
        assert_eq!(encode_i24(-1).unwrap(), [0xFF, 0xFF, 0xFF]);
        assert_eq!(decode_i24([0xFF, 0xFF, 0xFF]), -1);
        assert_eq!(encode_i24(0).unwrap(), [0x00, 0x00, 0x00]);
        assert_eq!(encode_i24(-8_388_607).unwrap(), [0x01, 0x00, 0x80]);
        assert_eq!(encode_i24(0x0012_3456).unwrap(), [0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_unsigned_known_encodings() {
        assert_eq!(encode_u24(16_777_215).unwrap(), [0xFF, 0xFF, 0xFF]);
        assert_eq!(decode_u24([0xFF, 0xFF, 0xFF]), 16_777_215);
        assert_eq!(encode_u24(0x00AB_CDEF).unwrap(), [0xEF, 0xCD, 0xAB]);
    }

    #[test]
    fn test_signed_range_errors() {
        assert!(matches!(
            encode_i24(8_388_608),
            Err(Error::Range { kind: "int24", value: 8_388_608 })
        ));
        assert!(matches!(encode_i24(-8_388_608), Err(Error::Range { .. })));
        assert!(matches!(encode_i24(i32::MAX), Err(Error::Range { .. })));
        assert!(I24::new(-8_388_608).is_err());
    }

    #[test]
    fn test_unsigned_range_errors() {
        assert!(matches!(
            encode_u24(16_777_216),
            Err(Error::Range { kind: "uint24", value: 16_777_216 })
        ));
        assert!(U24::try_from(u32::MAX).is_err());
    }

    #[test]
    fn test_asymmetric_pattern_rejected() {
        assert_eq!(decode_i24([0x00, 0x00, 0x80]), -8_388_608);
        assert!(I24::from_le_bytes([0x00, 0x00, 0x80]).is_err());
        assert_eq!(I24::from_le_bytes([0x01, 0x00, 0x80]).unwrap(), I24::MIN);
    }

    #[test]
    fn test_consts_match_bounds() {
        assert_eq!(I24::MIN.get(), INT24_MIN);
        assert_eq!(I24::MAX.get(), INT24_MAX);
        assert_eq!(I24::ZERO.get(), 0);
        assert_eq!(U24::MIN.get(), UINT24_MIN);
        assert_eq!(U24::MAX.get(), UINT24_MAX);
    }

    #[test]
    fn test_ordering_follows_value() {
        let neg = I24::new(-5).unwrap();
        let pos = I24::new(5).unwrap();
        assert!(neg < pos);
        assert!(U24::new(256).unwrap() > U24::new(255).unwrap());
    }

    #[test]
    fn test_buf_read_write() {
        let mut out = BytesMut::new();
        out.put_i24_le(I24::new(-2).unwrap());
        out.put_u24_le(U24::new(70_000).unwrap());
        assert_eq!(&out[..], &[0xFE, 0xFF, 0xFF, 0x70, 0x11, 0x01]);

        let mut input = out.freeze();
        assert_eq!(input.try_get_i24_le().unwrap().get(), -2);
        assert_eq!(input.try_get_u24_le().unwrap().get(), 70_000);
        assert!(matches!(
            input.try_get_u24_le(),
            Err(Error::Truncated { needed: 3, remaining: 0 })
        ));
    }

    #[test]
    fn test_truncated_read_leaves_buffer() {
        let mut input = Bytes::from_static(&[0x01, 0x02]);
        assert!(input.try_get_i24_le().is_err());
        assert_eq!(input.remaining(), 2);
    }

    #[test]
    fn test_rejected_signed_read_leaves_buffer() {
        let mut input = Bytes::from_static(&[0x00, 0x00, 0x80, 0xAA]);
        assert!(matches!(input.try_get_i24_le(), Err(Error::Range { .. })));
        assert_eq!(input.remaining(), 4);
        assert_eq!(input.try_get_u24_le().unwrap().get(), 0x0080_0000);
        assert_eq!(input.remaining(), 1);
    }

    #[test]
    fn test_read_across_chunks() {
        let mut input = Bytes::from_static(&[0xFE]).chain(Bytes::from_static(&[0xFF, 0xFF, 0x07]));
        assert_eq!(input.try_get_i24_le().unwrap().get(), -2);
        assert_eq!(input.remaining(), 1);

        let mut split = Bytes::from_static(&[0x00, 0x00]).chain(Bytes::from_static(&[0x80]));
        assert!(split.try_get_i24_le().is_err());
        assert_eq!(split.remaining(), 3);
    }

    #[test]
    fn test_serde_through_range_check() {
        let v: I24 = serde_json::from_str("-42").unwrap();
        assert_eq!(v.get(), -42);
        assert_eq!(serde_json::to_string(&v).unwrap(), "-42");
        assert!(serde_json::from_str::<I24>("8388608").is_err());
        assert!(serde_json::from_str::<U24>("16777216").is_err());
    }

    proptest! {
        #[test]
        fn prop_signed_round_trip(v in INT24_MIN..=INT24_MAX) {
            prop_assert_eq!(decode_i24(encode_i24(v).unwrap()), v);
        }

        #[test]
        fn prop_unsigned_round_trip(v in UINT24_MIN..=UINT24_MAX) {
            prop_assert_eq!(decode_u24(encode_u24(v).unwrap()), v);
        }

        #[test]
        fn prop_signed_out_of_range_rejected(v in prop_oneof![i32::MIN..INT24_MIN, (INT24_MAX + 1)..=i32::MAX]) {
            prop_assert!(encode_i24(v).is_err());
        }

        #[test]
        fn prop_unsigned_out_of_range_rejected(v in (UINT24_MAX + 1)..=u32::MAX) {
            prop_assert!(encode_u24(v).is_err());
        }
    }
}
