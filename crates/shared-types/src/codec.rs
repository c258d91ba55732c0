//! # Canonical Binary Codec
//!
//! Zero-copy reader and growable writer for every consensus-critical
//! structure: headers, parameter blobs and persisted records.
//!
//! ## Encoding Rules
//!
//! | Field | Encoding |
//! |-------|----------|
//! | `u8`/`u32`/`u64` | fixed width, little-endian |
//! | var-uint | `< 0xFD` one byte, `0xFD`+u16, `0xFE`+u32, `0xFF`+u64 |
//! | var-bytes | var-uint length + bytes |
//! | string | var-bytes of UTF-8 |
//! | address | var-bytes of exactly 20 bytes |
//!
//! Decoding rejects over-long var-uint forms so that every value has exactly
//! one encoding.

use crate::entities::{Address, Hash};
use crate::errors::CodecError;

// =============================================================================
// SINK
// =============================================================================

/// Append-only byte writer.
#[derive(Debug, Default, Clone)]
pub struct Sink {
    buf: Vec<u8>,
}

impl Sink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Write one byte.
    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    /// Write a little-endian u16.
    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Write a little-endian u32.
    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Write a little-endian u64.
    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Write raw bytes with no length prefix.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Write a 32-byte hash with no length prefix.
    pub fn write_hash(&mut self, hash: &Hash) {
        self.buf.extend_from_slice(hash);
    }

    /// Write a var-uint.
    pub fn write_var_uint(&mut self, v: u64) {
        if v < 0xFD {
            self.write_u8(v as u8);
        } else if v <= u64::from(u16::MAX) {
            self.write_u8(0xFD);
            self.write_u16(v as u16);
        } else if v <= u64::from(u32::MAX) {
            self.write_u8(0xFE);
            self.write_u32(v as u32);
        } else {
            self.write_u8(0xFF);
            self.write_u64(v);
        }
    }

    /// Write length-prefixed bytes.
    pub fn write_var_bytes(&mut self, data: &[u8]) {
        self.write_var_uint(data.len() as u64);
        self.write_bytes(data);
    }

    /// Write a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, s: &str) {
        self.write_var_bytes(s.as_bytes());
    }

    /// Write an address as var-bytes.
    pub fn write_address(&mut self, addr: &Address) {
        self.write_var_bytes(addr);
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the sink.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

// =============================================================================
// SOURCE
// =============================================================================

/// Borrowing byte reader.
#[derive(Debug, Clone)]
pub struct Source<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Source<'a> {
    /// Start reading `data` from offset 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True when all input is consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Current offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if n > self.remaining() {
            return Err(CodecError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u64.
    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a 32-byte hash.
    pub fn read_hash(&mut self) -> Result<Hash, CodecError> {
        self.read_array()
    }

    /// Read a raw 20-byte address (no length prefix).
    pub fn read_fixed_address(&mut self) -> Result<Address, CodecError> {
        self.read_array()
    }

    /// Read a var-uint, rejecting non-canonical forms.
    pub fn read_var_uint(&mut self) -> Result<u64, CodecError> {
        let tag = self.read_u8()?;
        let (value, min) = match tag {
            0xFD => (u64::from(self.read_u16()?), 0xFD),
            0xFE => (u64::from(self.read_u32()?), 0x1_0000),
            0xFF => (self.read_u64()?, 0x1_0000_0000),
            small => return Ok(u64::from(small)),
        };
        if value < min {
            return Err(CodecError::NonCanonicalVarUint);
        }
        Ok(value)
    }

    /// Read a var-uint that must fit in a u32.
    pub fn read_var_u32(&mut self) -> Result<u32, CodecError> {
        let value = self.read_var_uint()?;
        u32::try_from(value).map_err(|_| CodecError::IntegerOverflow {
            value,
            target: "u32",
        })
    }

    /// Read length-prefixed bytes.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], CodecError> {
        let len = self.read_var_uint()?;
        if len > self.remaining() as u64 {
            return Err(CodecError::LengthOverflow {
                declared: len,
                remaining: self.remaining(),
            });
        }
        self.read_bytes(len as usize)
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String, CodecError> {
        let raw = self.read_var_bytes()?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8)
    }

    /// Read an address encoded as var-bytes.
    pub fn read_address(&mut self) -> Result<Address, CodecError> {
        let raw = self.read_var_bytes()?;
        raw.try_into()
            .map_err(|_| CodecError::InvalidAddressLength(raw.len()))
    }

    /// Fail if any input is left.
    pub fn expect_end(&self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }
}

// =============================================================================
// TRAITS
// =============================================================================

/// Types with a canonical binary encoding.
pub trait Encode {
    /// Append the encoding to `sink`.
    fn encode(&self, sink: &mut Sink);

    /// Encode into a fresh buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut sink = Sink::new();
        self.encode(&mut sink);
        sink.into_bytes()
    }
}

/// Types decodable from their canonical encoding.
pub trait Decode: Sized {
    /// Read one value from `source`.
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError>;

    /// Decode a complete buffer, rejecting trailing bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut source = Source::new(bytes);
        let value = Self::decode(&mut source)?;
        source.expect_end()?;
        Ok(value)
    }
}
