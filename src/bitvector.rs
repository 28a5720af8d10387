use std::{
    fmt::Debug,
    ops::{BitAnd, BitOr, BitXor, Not},
};

use bitvec::{bitbox, boxed::BitBox, order::Lsb0, vec::BitVec};
use bytes::BufMut;

use crate::{
    BitfieldRead, BitfieldWrite,
    codec::{DecodeErr, Encodable},
};

/// A fixed-length bitfield of `N` bits.
///
/// Unlike a [`crate::Bitlist`], a `Bitvector` does not encode its length: the wire
/// form is exactly `ceil(N / 8)` bytes, with any unused high bits of the last byte
/// set to zero.
///
/// Since both operands of a binary operation always have the same length, the
/// boolean algebra on `Bitvector` is infallible and uses the standard operators.
///
/// ```
/// use bitfield_rs::{Bitvector8, BitfieldRead, BitfieldWrite};
///
/// let mut a = Bitvector8::new();
/// a.set_bit_at(1, true);
/// a.set_bit_at(6, true);
///
/// let b = Bitvector8::from_bytes(&[0b0100_0000]).unwrap();
/// assert!(a.contains(&b));
/// assert_eq!((a.clone() ^ b).bytes(), vec![0b0000_0010]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Bitvector<const N: usize> {
    bits: BitBox<u8, Lsb0>,
}

pub type Bitvector4 = Bitvector<4>;
pub type Bitvector8 = Bitvector<8>;
pub type Bitvector32 = Bitvector<32>;
pub type Bitvector64 = Bitvector<64>;
pub type Bitvector128 = Bitvector<128>;
pub type Bitvector256 = Bitvector<256>;
pub type Bitvector512 = Bitvector<512>;
pub type Bitvector1024 = Bitvector<1024>;

impl<const N: usize> Bitvector<N> {
    /// The exact size of the wire encoding.
    pub const ENCODED_SIZE: usize = N.div_ceil(8);

    /// Creates a zero-filled bitvector.
    pub fn new() -> Self {
        Self { bits: bitbox![u8, Lsb0; 0; N] }
    }

    /// Decodes a bitvector from exactly [`Self::ENCODED_SIZE`] bytes. Unused high bits of
    /// the last byte are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeErr> {
        DecodeErr::ensure_exact_len(data, Self::ENCODED_SIZE)?;
        let mut bits = BitVec::<u8, Lsb0>::from_slice(data);
        bits.truncate(N);
        let mut out = Self { bits: bits.into_boxed_bitslice() };
        out.clear_unused_bits();
        Ok(out)
    }

    /// returns true if every bit set in `rhs` is also set in `self`
    pub fn contains(&self, rhs: &Self) -> bool {
        self.raw_pairs(rhs).all(|(a, b)| a ^ (a | b) == 0)
    }

    /// returns true if `self` and `rhs` have at least one set bit in common
    pub fn overlaps(&self, rhs: &Self) -> bool {
        self.raw_pairs(rhs).any(|(a, b)| a & b != 0)
    }

    /// Shifts every bit `by` positions toward higher indices, or toward lower indices
    /// if `by` is negative. Bits shifted past either end are dropped and vacated
    /// positions are zero-filled.
    ///
    /// ```
    /// use bitfield_rs::{Bitvector4, BitfieldRead};
    ///
    /// let mut bitvector = Bitvector4::from_bytes(&[0b0011]).unwrap();
    /// bitvector.shift(3);
    /// assert_eq!(bitvector.bytes(), vec![0b1000]);
    /// ```
    pub fn shift(&mut self, by: isize) {
        let distance = by.unsigned_abs().min(N);
        if by >= 0 {
            // bitvec's shift_right moves bits toward the back of the slice
            self.bits.shift_right(distance);
        } else {
            self.bits.shift_left(distance);
        }
        self.clear_unused_bits();
    }

    #[inline]
    fn raw_pairs<'a>(&'a self, rhs: &'a Self) -> impl Iterator<Item = (u8, u8)> + 'a {
        self.bits
            .as_raw_slice()
            .iter()
            .copied()
            .zip(rhs.bits.as_raw_slice().iter().copied())
    }

    /// Zeroes the bits of the last byte which lie past `N`.
    #[inline]
    fn clear_unused_bits(&mut self) {
        let rem = N % 8;
        if rem == 0 {
            return;
        }
        if let Some(last) = self.bits.as_raw_mut_slice().last_mut() {
            *last &= (1u8 << rem) - 1;
        }
    }

    #[inline]
    fn zip_assign(&mut self, rhs: &Self, op: impl Fn(u8, u8) -> u8) {
        let raw = self.bits.as_raw_mut_slice();
        for (a, &b) in raw.iter_mut().zip(rhs.bits.as_raw_slice()) {
            *a = op(*a, b);
        }
    }
}

impl<const N: usize> Default for Bitvector<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Debug for Bitvector<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bitvector<{N}>({:#04x?})", self.bits.as_raw_slice())
    }
}

impl<const N: usize> BitfieldRead for Bitvector<N> {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn bit_at(&self, idx: usize) -> bool {
        self.bits.get(idx).is_some_and(|bit| *bit)
    }

    #[inline]
    fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Returns all `ceil(N / 8)` bytes, untrimmed.
    fn bytes(&self) -> Vec<u8> {
        self.bits.as_raw_slice().to_vec()
    }

    #[inline]
    fn iter_ones(&self) -> impl Iterator<Item = usize> {
        self.bits.iter_ones()
    }
}

impl<const N: usize> BitfieldWrite for Bitvector<N> {
    #[inline]
    fn set_bit_at(&mut self, idx: usize, val: bool) {
        if let Some(mut bit) = self.bits.get_mut(idx) {
            *bit = val;
        }
    }
}

impl<const N: usize> BitOr<&Bitvector<N>> for Bitvector<N> {
    type Output = Bitvector<N>;

    fn bitor(mut self, rhs: &Bitvector<N>) -> Self::Output {
        self.zip_assign(rhs, |a, b| a | b);
        self
    }
}

impl<const N: usize> BitOr for Bitvector<N> {
    type Output = Bitvector<N>;

    #[inline]
    fn bitor(self, rhs: Bitvector<N>) -> Self::Output {
        self | &rhs
    }
}

impl<const N: usize> BitAnd<&Bitvector<N>> for Bitvector<N> {
    type Output = Bitvector<N>;

    fn bitand(mut self, rhs: &Bitvector<N>) -> Self::Output {
        self.zip_assign(rhs, |a, b| a & b);
        self
    }
}

impl<const N: usize> BitAnd for Bitvector<N> {
    type Output = Bitvector<N>;

    #[inline]
    fn bitand(self, rhs: Bitvector<N>) -> Self::Output {
        self & &rhs
    }
}

impl<const N: usize> BitXor<&Bitvector<N>> for Bitvector<N> {
    type Output = Bitvector<N>;

    fn bitxor(mut self, rhs: &Bitvector<N>) -> Self::Output {
        self.zip_assign(rhs, |a, b| a ^ b);
        self
    }
}

impl<const N: usize> BitXor for Bitvector<N> {
    type Output = Bitvector<N>;

    #[inline]
    fn bitxor(self, rhs: Bitvector<N>) -> Self::Output {
        self ^ &rhs
    }
}

impl<const N: usize> Not for Bitvector<N> {
    type Output = Bitvector<N>;

    fn not(mut self) -> Self::Output {
        for byte in self.bits.as_raw_mut_slice() {
            *byte = !*byte;
        }
        self.clear_unused_bits();
        self
    }
}

impl<const N: usize> Encodable for Bitvector<N> {
    #[inline]
    fn encoded_size(&self) -> usize {
        Self::ENCODED_SIZE
    }

    #[inline]
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(self.bits.as_raw_slice());
    }
}
