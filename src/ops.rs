use crate::{BitfieldError, traits::BitfieldRead};

/// Boolean algebra between dynamic-length bitfields of the same length.
///
/// Every binary operation returns [`BitfieldError::LengthMismatch`] if the operands
/// differ in length. The `_into` forms additionally require `dst` to have the same
/// length as `self`; `dst` is exclusively borrowed for the call and fully overwritten,
/// and no heap allocation takes place. This makes it possible to fold many bitfields into
/// a single pre-allocated buffer:
///
/// ```
/// use bitfield_rs::{Bitlist64, BitfieldRead, BitfieldWrite, BitwiseOps};
///
/// let mut votes = Vec::new();
/// for i in 0..4 {
///     let mut vote = Bitlist64::new(128);
///     vote.set_bit_at(i * 10, true);
///     votes.push(vote);
/// }
///
/// let mut acc = Bitlist64::new(128);
/// let mut scratch = Bitlist64::new(128);
/// for vote in &votes {
///     acc.or_into(vote, &mut scratch).unwrap();
///     std::mem::swap(&mut acc, &mut scratch);
/// }
/// assert_eq!(acc.bit_indices(), vec![0, 10, 20, 30]);
/// ```
pub trait BitwiseOps: BitfieldRead + Clone {
    /// returns true if every bit set in `rhs` is also set in `self`
    fn contains(&self, rhs: &Self) -> Result<bool, BitfieldError>;

    /// returns true if `self` and `rhs` have at least one set bit in common
    fn overlaps(&self, rhs: &Self) -> Result<bool, BitfieldError>;

    /// dst = self | rhs
    fn or_into(&self, rhs: &Self, dst: &mut Self) -> Result<(), BitfieldError>;

    /// dst = self & rhs
    fn and_into(&self, rhs: &Self, dst: &mut Self) -> Result<(), BitfieldError>;

    /// dst = self ^ rhs
    fn xor_into(&self, rhs: &Self, dst: &mut Self) -> Result<(), BitfieldError>;

    /// dst = !self
    fn not_into(&self, dst: &mut Self) -> Result<(), BitfieldError>;

    /// the number of bits set in `self | rhs`
    fn or_count(&self, rhs: &Self) -> Result<usize, BitfieldError>;

    /// the number of bits set in `self & rhs`
    fn and_count(&self, rhs: &Self) -> Result<usize, BitfieldError>;

    /// the number of bits set in `self ^ rhs`
    fn xor_count(&self, rhs: &Self) -> Result<usize, BitfieldError>;

    /// Returns the complement of `self`. Bits past the length stay zero.
    fn not(&self) -> Self;

    /// Returns the union of `self` and `rhs`.
    fn or(&self, rhs: &Self) -> Result<Self, BitfieldError> {
        BitfieldError::ensure_same_len(self.len(), rhs.len())?;
        let mut out = self.clone();
        self.or_into(rhs, &mut out)?;
        Ok(out)
    }

    /// Returns the intersection of `self` and `rhs`.
    fn and(&self, rhs: &Self) -> Result<Self, BitfieldError> {
        BitfieldError::ensure_same_len(self.len(), rhs.len())?;
        let mut out = self.clone();
        self.and_into(rhs, &mut out)?;
        Ok(out)
    }

    /// Returns the symmetric difference of `self` and `rhs`.
    fn xor(&self, rhs: &Self) -> Result<Self, BitfieldError> {
        BitfieldError::ensure_same_len(self.len(), rhs.len())?;
        let mut out = self.clone();
        self.xor_into(rhs, &mut out)?;
        Ok(out)
    }
}
