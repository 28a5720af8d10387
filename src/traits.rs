/// Read access shared by every bitfield representation.
///
/// Reads past [`BitfieldRead::len`] are not errors: a bitfield behaves as if it were
/// followed by an infinite run of zero bits.
pub trait BitfieldRead {
    /// the number of addressable bits; the underlying storage may be larger.
    fn len(&self) -> usize;

    /// returns true if this bitfield has no addressable bits
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// returns the bit at `idx`, or false if `idx` is out of range
    fn bit_at(&self, idx: usize) -> bool;

    /// the number of bits set to 1
    fn count(&self) -> usize;

    /// returns the bitfield's data bits as an owned byte buffer, without any
    /// length bit
    fn bytes(&self) -> Vec<u8>;

    /// returns an iterator over the positions of all set bits in ascending order
    fn iter_ones(&self) -> impl Iterator<Item = usize>;

    /// returns the positions of all set bits in ascending order
    fn bit_indices(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.count());
        out.extend(self.iter_ones());
        out
    }

    /// Writes the positions of set bits in ascending order into `dst`, stopping
    /// once `dst` is full. Returns the number of positions written.
    ///
    /// The result is truncated iff the return value is less than
    /// [`BitfieldRead::count`].
    fn bit_indices_into(&self, dst: &mut [usize]) -> usize {
        let mut written = 0;
        for (slot, idx) in dst.iter_mut().zip(self.iter_ones()) {
            *slot = idx;
            written += 1;
        }
        written
    }
}

pub trait BitfieldWrite {
    /// Sets the bit at `idx` to `val`. Does nothing if `idx` is out of range.
    fn set_bit_at(&mut self, idx: usize, val: bool);
}

/// A bitfield which can be both read and modified.
pub trait Bitfield: BitfieldRead + BitfieldWrite {}

impl<T: BitfieldRead + BitfieldWrite> Bitfield for T {}
