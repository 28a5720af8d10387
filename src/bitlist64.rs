use std::fmt::Debug;

use bytes::{Buf, BufMut};
use itertools::izip;

use crate::{
    BitfieldError, BitfieldRead, BitfieldWrite, BitwiseOps,
    codec::Encodable,
    ones::Ones,
    sentinel,
};

/// The number of bits in a single word of a [`Bitlist64`].
pub const WORD_BITS: usize = 64;

/// The number of bytes in a single word of a [`Bitlist64`].
pub const BYTES_PER_WORD: usize = WORD_BITS / 8;

static_assertions::const_assert_eq!(WORD_BITS, u64::BITS as usize);

/// A dynamic-length bitfield backed by `u64` words.
///
/// The length is fixed at construction. Words are stored in little-endian bit order: bit
/// `i` lives in word `i / 64` at position `i % 64`. Bits past the length in the last word
/// are always zero.
///
/// # Examples
///
/// ```
/// use bitfield_rs::{Bitlist64, BitfieldRead, BitfieldWrite};
///
/// let mut bitlist = Bitlist64::new(10);
/// bitlist.set_bit_at(1, true);
/// bitlist.set_bit_at(9, true);
/// // out of range writes are ignored
/// bitlist.set_bit_at(10, true);
///
/// assert_eq!(bitlist.len(), 10);
/// assert_eq!(bitlist.count(), 2);
/// assert!(!bitlist.bit_at(10));
/// assert_eq!(bitlist.bytes(), vec![0x02, 0x02]);
/// ```
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct Bitlist64 {
    size: usize,
    data: Vec<u64>,
}

static_assertions::const_assert_eq!(std::mem::size_of::<Bitlist64>(), 32);

impl Bitlist64 {
    /// Creates a zero-filled bitlist of `size` bits.
    pub fn new(size: usize) -> Self {
        Self { size, data: vec![0; words_for_bits(size)] }
    }

    /// Creates a bitlist from raw words; the length is `64 * words.len()`.
    pub fn from_words(data: Vec<u64>) -> Self {
        Self { size: data.len() * WORD_BITS, data }
    }

    /// Creates a bitlist of `size` bits from little-endian bytes.
    ///
    /// `bytes` is zero-padded up to a word boundary; bytes beyond the first `size` bits
    /// are ignored. Returns [`BitfieldError::SizeMismatch`] if `bytes` cannot hold `size`
    /// bits.
    ///
    /// ```
    /// use bitfield_rs::{Bitlist64, BitfieldError, BitfieldRead};
    ///
    /// let bitlist = Bitlist64::from_bytes(12, &[0xff, 0x0f]).unwrap();
    /// assert_eq!(bitlist.count(), 12);
    ///
    /// assert_eq!(
    ///     Bitlist64::from_bytes(17, &[0xff, 0x0f]),
    ///     Err(BitfieldError::SizeMismatch { bits: 17, bytes: 2 })
    /// );
    /// ```
    pub fn from_bytes(size: usize, bytes: &[u8]) -> Result<Self, BitfieldError> {
        if size > bytes.len() * 8 {
            tracing::debug!(size, bytes = bytes.len(), "buffer too small for bitlist");
            return Err(BitfieldError::SizeMismatch { bits: size, bytes: bytes.len() });
        }
        Ok(Self::from_le_bytes(size, bytes))
    }

    /// Decodes little-endian words; callers guarantee that `bytes` holds `size` bits.
    pub(crate) fn from_le_bytes(size: usize, mut bytes: &[u8]) -> Self {
        debug_assert!(size <= bytes.len() * 8, "buffer too small");
        let mut data = vec![0u64; words_for_bits(size)];
        for word in data.iter_mut() {
            *word = if bytes.remaining() >= BYTES_PER_WORD {
                bytes.get_u64_le()
            } else {
                // zero-pad the trailing partial word
                bytes.get_uint_le(bytes.remaining())
            };
        }
        let mut out = Self { size, data };
        out.clear_unused_bits();
        out
    }

    /// Returns the underlying words.
    #[inline]
    pub fn as_words(&self) -> &[u64] {
        &self.data
    }

    /// Converts into the length-bit encoded byte representation.
    #[inline]
    pub fn to_bitlist(&self) -> crate::Bitlist {
        crate::Bitlist::from(self)
    }

    /// Returns byte `idx` of the little-endian representation.
    #[inline]
    pub(crate) fn byte_at(&self, idx: usize) -> u8 {
        (self.data[idx / BYTES_PER_WORD] >> ((idx % BYTES_PER_WORD) * 8)) as u8
    }

    /// Selects the bits of the last word which lie within the length.
    #[inline]
    fn tail_mask(&self) -> u64 {
        match self.size % WORD_BITS {
            0 => u64::MAX,
            rem => u64::MAX >> (WORD_BITS - rem),
        }
    }

    /// Zeroes unused bits in the last word.
    #[inline]
    fn clear_unused_bits(&mut self) {
        let mask = self.tail_mask();
        if let Some(last) = self.data.last_mut() {
            *last &= mask;
        }
    }

    #[inline]
    fn check_binary(&self, rhs: &Self) -> Result<(), BitfieldError> {
        BitfieldError::ensure_same_len(self.size, rhs.size)
    }

    #[inline]
    fn check_ternary(&self, rhs: &Self, dst: &Self) -> Result<(), BitfieldError> {
        self.check_binary(rhs)?;
        BitfieldError::ensure_same_len(self.size, dst.size)
    }

    #[inline]
    fn zip_into(&self, rhs: &Self, dst: &mut Self, op: impl Fn(u64, u64) -> u64) {
        for (out, &a, &b) in izip!(dst.data.iter_mut(), &self.data, &rhs.data) {
            *out = op(a, b);
        }
    }

    #[inline]
    fn zip_count(&self, rhs: &Self, op: impl Fn(u64, u64) -> u64) -> usize {
        izip!(&self.data, &rhs.data)
            .map(|(&a, &b)| op(a, b).count_ones() as usize)
            .sum()
    }
}

/// The number of words required to hold `n` bits.
#[inline]
pub(crate) const fn words_for_bits(n: usize) -> usize {
    n.div_ceil(WORD_BITS)
}

impl From<Vec<u64>> for Bitlist64 {
    fn from(data: Vec<u64>) -> Self {
        Self::from_words(data)
    }
}

impl Debug for Bitlist64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitlist64")
            .field("size", &self.size)
            .field("data", &format_args!("{:#x?}", self.data))
            .finish()
    }
}

impl BitfieldRead for Bitlist64 {
    #[inline]
    fn len(&self) -> usize {
        self.size
    }

    #[inline]
    fn bit_at(&self, idx: usize) -> bool {
        idx < self.size && self.data[idx / WORD_BITS] & (1 << (idx % WORD_BITS)) != 0
    }

    fn count(&self) -> usize {
        self.data.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the little-endian bytes of all words, with trailing zero bytes trimmed.
    /// The result is empty if no bits are set.
    fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * BYTES_PER_WORD);
        for &word in &self.data {
            out.put_u64_le(word);
        }
        let trimmed = out.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        out.truncate(trimmed);
        out
    }

    #[inline]
    fn iter_ones(&self) -> impl Iterator<Item = usize> {
        Ones::new(self.data.as_slice(), self.tail_mask())
    }
}

impl BitfieldWrite for Bitlist64 {
    #[inline]
    fn set_bit_at(&mut self, idx: usize, val: bool) {
        if idx >= self.size {
            return;
        }
        let bit = 1u64 << (idx % WORD_BITS);
        let word = &mut self.data[idx / WORD_BITS];
        if val {
            *word |= bit;
        } else {
            *word &= !bit;
        }
    }
}

impl BitwiseOps for Bitlist64 {
    fn contains(&self, rhs: &Self) -> Result<bool, BitfieldError> {
        self.check_binary(rhs)?;
        Ok(izip!(&self.data, &rhs.data).all(|(&a, &b)| a ^ (a | b) == 0))
    }

    fn overlaps(&self, rhs: &Self) -> Result<bool, BitfieldError> {
        self.check_binary(rhs)?;
        Ok(izip!(&self.data, &rhs.data).any(|(&a, &b)| a & b != 0))
    }

    fn or_into(&self, rhs: &Self, dst: &mut Self) -> Result<(), BitfieldError> {
        self.check_ternary(rhs, dst)?;
        self.zip_into(rhs, dst, |a, b| a | b);
        Ok(())
    }

    fn and_into(&self, rhs: &Self, dst: &mut Self) -> Result<(), BitfieldError> {
        self.check_ternary(rhs, dst)?;
        self.zip_into(rhs, dst, |a, b| a & b);
        Ok(())
    }

    fn xor_into(&self, rhs: &Self, dst: &mut Self) -> Result<(), BitfieldError> {
        self.check_ternary(rhs, dst)?;
        self.zip_into(rhs, dst, |a, b| a ^ b);
        Ok(())
    }

    fn not_into(&self, dst: &mut Self) -> Result<(), BitfieldError> {
        BitfieldError::ensure_same_len(self.size, dst.size)?;
        for (out, &word) in dst.data.iter_mut().zip(&self.data) {
            *out = !word;
        }
        dst.clear_unused_bits();
        Ok(())
    }

    fn or_count(&self, rhs: &Self) -> Result<usize, BitfieldError> {
        self.check_binary(rhs)?;
        Ok(self.zip_count(rhs, |a, b| a | b))
    }

    fn and_count(&self, rhs: &Self) -> Result<usize, BitfieldError> {
        self.check_binary(rhs)?;
        Ok(self.zip_count(rhs, |a, b| a & b))
    }

    fn xor_count(&self, rhs: &Self) -> Result<usize, BitfieldError> {
        self.check_binary(rhs)?;
        Ok(self.zip_count(rhs, |a, b| a ^ b))
    }

    fn not(&self) -> Self {
        let mut out = Self {
            size: self.size,
            data: self.data.iter().map(|w| !w).collect(),
        };
        out.clear_unused_bits();
        out
    }
}

/// Writes the length-bit encoding, identical to the raw bytes of the equivalent
/// [`crate::Bitlist`].
impl Encodable for Bitlist64 {
    #[inline]
    fn encoded_size(&self) -> usize {
        sentinel::encoded_len(self.size)
    }

    fn encode<B: BufMut>(&self, buf: &mut B) {
        let full_bytes = self.size / 8;
        for idx in 0..full_bytes {
            buf.put_u8(self.byte_at(idx));
        }
        let partial = if self.size % 8 == 0 {
            0
        } else {
            self.byte_at(full_bytes)
        };
        buf.put_u8(partial | sentinel::length_bit(self.size));
    }
}
