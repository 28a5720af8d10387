//! Bitfields are compact containers of boolean flags addressed by index, used to track
//! which members of a fixed-size set are present (for example, which validators in a
//! committee signed a message).
//!
//! ## Containers
//!
//! - [`Bitlist64`]: a dynamic-length bitfield backed by `u64` words. This is the form to use
//!   for bulk boolean algebra: every binary operation has an allocating form, an
//!   allocation-free `_into` form which writes into a caller-supplied destination, and a
//!   `_count` form which only computes the population count of the result.
//!
//! - [`Bitlist`]: a dynamic-length bitfield backed by bytes. The logical length is not
//!   stored; it is recovered from a *length bit* (sentinel) placed right after the last data
//!   bit. The raw bytes of a `Bitlist` are its canonical wire encoding.
//!
//! - [`BitlistRef`]: a zero-copy, read-only view over an encoded `Bitlist`, from any type
//!   implementing `Deref<Target = [u8]>`.
//!
//! - [`Bitvector`]: a fixed-length bitfield of `N` bits with no length bit.
//!
//! `Bitlist64` and `Bitlist` convert into each other losslessly via [`From`].
//!
//! ```
//! use bitfield_rs::{Bitlist, Bitlist64, BitfieldRead, BitfieldWrite, BitwiseOps};
//!
//! let mut a = Bitlist64::new(100);
//! a.set_bit_at(3, true);
//! a.set_bit_at(70, true);
//!
//! let mut b = Bitlist64::new(100);
//! b.set_bit_at(70, true);
//!
//! assert!(a.contains(&b).unwrap());
//! assert_eq!(a.or_count(&b).unwrap(), 2);
//!
//! let wire = Bitlist::from(&a);
//! assert_eq!(wire.len(), 100);
//! assert_eq!(wire.bit_indices(), vec![3, 70]);
//! ```

use thiserror::Error;

mod bitlist;
mod bitlist64;
mod bitlist_ref;
mod bitvector;
pub mod codec;
mod convert;
pub mod ones;
pub mod ops;
mod sentinel;
mod traits;

#[cfg(feature = "testutil")]
pub mod testutil;

pub use bitlist::Bitlist;
pub use bitlist_ref::BitlistRef;
pub use bitlist64::{BYTES_PER_WORD, Bitlist64, WORD_BITS};
pub use bitvector::{
    Bitvector, Bitvector4, Bitvector8, Bitvector32, Bitvector64, Bitvector128, Bitvector256,
    Bitvector512, Bitvector1024,
};
pub use codec::{DecodeErr, Encodable};
pub use ops::BitwiseOps;
pub use traits::{Bitfield, BitfieldRead, BitfieldWrite};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BitfieldError {
    #[error("bitfields are different lengths: {lhs} != {rhs}")]
    LengthMismatch { lhs: usize, rhs: usize },

    #[error("an array of {bytes} bytes is not enough to hold {bits} bits")]
    SizeMismatch { bits: usize, bytes: usize },

    #[error("malformed encoding: {0}")]
    MalformedEncoding(#[from] DecodeErr),
}

impl BitfieldError {
    /// Returns `LengthMismatch` unless both lengths agree.
    #[inline]
    pub(crate) fn ensure_same_len(lhs: usize, rhs: usize) -> Result<(), BitfieldError> {
        if lhs != rhs {
            Err(Self::LengthMismatch { lhs, rhs })
        } else {
            Ok(())
        }
    }
}
