//! Canonical binary encoding for weft wire types.
//!
//! Every type that appears in serialized form follows one set of rules:
//! little-endian integers, booleans as single 0/1 bytes, times as signed
//! 64-bit nanoseconds since the epoch, variable-length byte sequences with a
//! 16-bit length prefix, fixed-size digests raw. Polymorphic families
//! (addresses, signatures, inputs, outputs, unlock blocks) write a 1-byte
//! type tag first and dispatch on it when decoding; an unknown tag is a
//! decode error.
//!
//! Decoding is fully checked: a read past the end of the input or leftover
//! bytes after a fixed-size value both surface as a [`CodecError`].

pub mod error;
pub mod reader;
pub mod writer;

pub use error::CodecError;
pub use reader::Reader;
pub use writer::Writer;

/// A type with a canonical binary form.
pub trait Encode {
    /// Append the canonical encoding of `self` to the writer.
    fn encode(&self, w: &mut Writer);

    /// The canonical encoding as a fresh byte vector.
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        self.encode(&mut w);
        w.into_bytes()
    }
}

/// A type that can be reconstructed from its canonical binary form.
pub trait Decode: Sized {
    /// Read one value from the reader, advancing its cursor.
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError>;

    /// Decode a value that must span the entire input; trailing bytes are an
    /// error.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut r = Reader::new(bytes);
        let value = Self::decode(&mut r)?;
        r.finish()?;
        Ok(value)
    }
}
