use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

/// A type with a canonical wire encoding.
pub trait Encodable {
    /// the exact number of bytes `encode` will write
    fn encoded_size(&self) -> usize;

    fn encode<B: BufMut>(&self, buf: &mut B);

    fn encode_to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_size());
        self.encode(&mut buf);
        buf.freeze()
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErr {
    #[error("empty buffer")]
    Empty,

    #[error("last byte does not contain a length bit")]
    MissingSentinel,

    #[error("expected {expected} bytes, found {actual}")]
    Length { expected: usize, actual: usize },
}

impl DecodeErr {
    #[inline]
    pub(crate) fn ensure_exact_len(data: &[u8], expected: usize) -> Result<(), DecodeErr> {
        if data.len() != expected {
            tracing::debug!(expected, actual = data.len(), "rejecting bitvector encoding");
            Err(Self::Length { expected, actual: data.len() })
        } else {
            Ok(())
        }
    }
}
