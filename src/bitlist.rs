use std::fmt::Debug;

use bytes::BufMut;
use itertools::izip;

use crate::{
    BitfieldError, BitfieldRead, BitfieldWrite, BitwiseOps,
    codec::{DecodeErr, Encodable},
    ones::Ones,
    sentinel,
};

/// A dynamic-length bitfield backed by bytes, which encodes its own length.
///
/// The bit following the last data bit is set to 1 (the *length bit*), and every bit
/// after it is 0. The length is therefore recovered from the position of the most
/// significant set bit in the last byte, and the raw bytes of a `Bitlist` are its wire
/// encoding.
///
/// ```text
/// [0b0000_1000]             3 bits:  [0, 0, 0]
/// [0b0001_1111]             4 bits:  [1, 1, 1, 1]
/// [0b0001_1000, 0b0000_0001] 8 bits:  [0, 0, 0, 1, 1, 0, 0, 0]
/// [0b0001_1000, 0b0000_0010] 9 bits:  [0, 0, 0, 1, 1, 0, 0, 0, 0]
/// ```
///
/// Every operation keeps the length bit in place, so a `Bitlist` never changes length
/// after construction.
///
/// # Examples
///
/// ```
/// use bitfield_rs::{Bitlist, BitfieldRead, BitfieldWrite, BitwiseOps, Encodable};
///
/// let mut bitlist = Bitlist::new(9);
/// assert_eq!(bitlist.encode_to_bytes().as_ref(), &[0x00, 0x02]);
///
/// bitlist.set_bit_at(8, true);
/// assert_eq!(bitlist.encode_to_bytes().as_ref(), &[0x00, 0x03]);
/// assert_eq!(bitlist.bytes(), vec![0x00, 0x01]);
///
/// let a = Bitlist::from_bytes(&[0x1f, 0x03]).unwrap();
/// let b = Bitlist::from_bytes(&[0x13, 0x02]).unwrap();
/// let x = a.xor(&b).unwrap();
/// assert_eq!(x.bytes(), vec![0x0c, 0x01]);
/// assert_eq!(x.encode_to_bytes().as_ref(), &[0x0c, 0x03]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Bitlist {
    data: Vec<u8>,
}

static_assertions::const_assert_eq!(std::mem::size_of::<Bitlist>(), 24);

impl Bitlist {
    /// Creates a zero-filled bitlist of `size` bits.
    pub fn new(size: usize) -> Self {
        let mut data = vec![0; sentinel::encoded_len(size)];
        data[size / 8] |= sentinel::length_bit(size);
        Self { data }
    }

    /// Decodes a bitlist from its wire encoding.
    ///
    /// Returns [`DecodeErr::Empty`] for an empty buffer and [`DecodeErr::MissingSentinel`] if
    /// the last byte is zero, since such a buffer has no recoverable length.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeErr> {
        sentinel::validate(data)?;
        Ok(Self { data: data.to_vec() })
    }

    /// Wraps a buffer which is already known to carry a length bit.
    #[inline]
    pub(crate) fn from_raw(data: Vec<u8>) -> Self {
        debug_assert!(sentinel::validate(&data).is_ok(), "missing length bit");
        Self { data }
    }

    /// Returns the data bits as an owned buffer with the length bit cleared, without
    /// trimming trailing zero bytes. If the last byte only held the length bit it is
    /// dropped, so the result is exactly `ceil(len / 8)` bytes.
    pub fn bytes_no_trim(&self) -> Vec<u8> {
        let len = self.len();
        let mut out = self.data.clone();
        if len % 8 == 0 {
            out.pop();
        } else if let Some(last) = out.last_mut() {
            *last &= sentinel::data_mask(len);
        }
        out
    }

    /// Converts into the word-backed representation.
    #[inline]
    pub fn to_bitlist64(&self) -> crate::Bitlist64 {
        crate::Bitlist64::from(self)
    }

    /// Returns the wire encoding, including the length bit.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the bitlist, returning its wire encoding.
    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Iterates byte pairs of `self` and `rhs`, with the length bit masked off both.
    #[inline]
    fn data_pairs<'a>(&'a self, rhs: &'a Self) -> impl Iterator<Item = (u8, u8)> + 'a {
        izip!(sentinel::data_bytes(&self.data), sentinel::data_bytes(&rhs.data))
    }

    #[inline]
    fn check_ternary(&self, rhs: &Self, dst: &Self) -> Result<usize, BitfieldError> {
        let len = self.len();
        BitfieldError::ensure_same_len(len, rhs.len())?;
        BitfieldError::ensure_same_len(len, dst.len())?;
        Ok(len)
    }

    /// Applies `op` bytewise, then restores the length bit in the last byte.
    #[inline]
    fn zip_into(&self, rhs: &Self, dst: &mut Self, len: usize, op: impl Fn(u8, u8) -> u8) {
        for (out, &a, &b) in izip!(dst.data.iter_mut(), &self.data, &rhs.data) {
            *out = op(a, b);
        }
        dst.restore_length_bit(len);
    }

    #[inline]
    fn zip_count(&self, rhs: &Self, op: impl Fn(u8, u8) -> u8) -> Result<usize, BitfieldError> {
        BitfieldError::ensure_same_len(self.len(), rhs.len())?;
        Ok(self
            .data_pairs(rhs)
            .map(|(a, b)| op(a, b).count_ones() as usize)
            .sum())
    }

    /// Masks the last byte down to its data bits and sets the length bit for `len`.
    #[inline]
    fn restore_length_bit(&mut self, len: usize) {
        if let Some(last) = self.data.last_mut() {
            *last = (*last & sentinel::data_mask(len)) | sentinel::length_bit(len);
        }
    }
}

impl Default for Bitlist {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TryFrom<Vec<u8>> for Bitlist {
    type Error = DecodeErr;

    fn try_from(data: Vec<u8>) -> Result<Self, Self::Error> {
        sentinel::validate(&data)?;
        Ok(Self { data })
    }
}

impl Debug for Bitlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitlist")
            .field("len", &self.len())
            .field("data", &format_args!("{:#04x?}", self.data))
            .finish()
    }
}

impl BitfieldRead for Bitlist {
    #[inline]
    fn len(&self) -> usize {
        sentinel::len(&self.data)
    }

    #[inline]
    fn bit_at(&self, idx: usize) -> bool {
        sentinel::bit_at(&self.data, idx)
    }

    #[inline]
    fn count(&self) -> usize {
        sentinel::count(&self.data)
    }

    /// Returns the data bits with the length bit cleared and trailing zero bytes
    /// trimmed. The result is empty if no bits are set.
    fn bytes(&self) -> Vec<u8> {
        sentinel::trimmed_bytes(&self.data)
    }

    #[inline]
    fn iter_ones(&self) -> impl Iterator<Item = usize> {
        Ones::new(self.data.as_slice(), sentinel::data_mask(self.len()))
    }
}

impl BitfieldWrite for Bitlist {
    #[inline]
    fn set_bit_at(&mut self, idx: usize, val: bool) {
        if idx >= self.len() {
            return;
        }
        let bit = 1u8 << (idx & 7);
        let byte = &mut self.data[idx >> 3];
        if val {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
    }
}

impl BitwiseOps for Bitlist {
    fn contains(&self, rhs: &Self) -> Result<bool, BitfieldError> {
        BitfieldError::ensure_same_len(self.len(), rhs.len())?;
        Ok(self.data_pairs(rhs).all(|(a, b)| a ^ (a | b) == 0))
    }

    fn overlaps(&self, rhs: &Self) -> Result<bool, BitfieldError> {
        BitfieldError::ensure_same_len(self.len(), rhs.len())?;
        Ok(self.data_pairs(rhs).any(|(a, b)| a & b != 0))
    }

    fn or_into(&self, rhs: &Self, dst: &mut Self) -> Result<(), BitfieldError> {
        let len = self.check_ternary(rhs, dst)?;
        self.zip_into(rhs, dst, len, |a, b| a | b);
        Ok(())
    }

    fn and_into(&self, rhs: &Self, dst: &mut Self) -> Result<(), BitfieldError> {
        let len = self.check_ternary(rhs, dst)?;
        self.zip_into(rhs, dst, len, |a, b| a & b);
        Ok(())
    }

    fn xor_into(&self, rhs: &Self, dst: &mut Self) -> Result<(), BitfieldError> {
        let len = self.check_ternary(rhs, dst)?;
        self.zip_into(rhs, dst, len, |a, b| a ^ b);
        Ok(())
    }

    fn not_into(&self, dst: &mut Self) -> Result<(), BitfieldError> {
        let len = self.len();
        BitfieldError::ensure_same_len(len, dst.len())?;
        for (out, &byte) in dst.data.iter_mut().zip(&self.data) {
            *out = !byte;
        }
        dst.restore_length_bit(len);
        Ok(())
    }

    fn or_count(&self, rhs: &Self) -> Result<usize, BitfieldError> {
        self.zip_count(rhs, |a, b| a | b)
    }

    fn and_count(&self, rhs: &Self) -> Result<usize, BitfieldError> {
        self.zip_count(rhs, |a, b| a & b)
    }

    fn xor_count(&self, rhs: &Self) -> Result<usize, BitfieldError> {
        self.zip_count(rhs, |a, b| a ^ b)
    }

    fn not(&self) -> Self {
        let mut out = Self {
            data: self.data.iter().map(|b| !b).collect(),
        };
        out.restore_length_bit(self.len());
        out
    }
}

impl Encodable for Bitlist {
    #[inline]
    fn encoded_size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.data);
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use itertools::Itertools;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    use crate::{
        Bitlist, BitfieldError, BitfieldRead, BitfieldWrite, BitwiseOps, DecodeErr, Encodable,
        testutil::{BitGen, mkbitlist},
    };

    fn bl(data: &[u8]) -> Bitlist {
        Bitlist::from_bytes(data).unwrap()
    }

    #[test]
    fn test_new() {
        let cases: &[(usize, &[u8])] = &[
            (0, &[0x01]),
            (1, &[0x02]),
            (2, &[0x04]),
            (3, &[0x08]),
            (7, &[0x80]),
            (8, &[0x00, 0x01]),
            (9, &[0x00, 0x02]),
            (31, &[0x00, 0x00, 0x00, 0x80]),
            (32, &[0x00, 0x00, 0x00, 0x00, 0x01]),
        ];
        for &(size, expected) in cases {
            let bitlist = Bitlist::new(size);
            assert_eq!(bitlist.encode_to_bytes().as_ref(), expected, "size {size}");
            assert_eq!(bitlist.len(), size);
            assert_eq!(bitlist.count(), 0);
        }
        assert_eq!(Bitlist::default(), Bitlist::new(0));
    }

    #[test]
    fn test_from_bytes() {
        assert_eq!(bl(&[0b0000_1000]).len(), 3);
        assert_eq!(bl(&[0b0001_1111]).len(), 4);
        assert_eq!(bl(&[0b0001_1000, 0b0000_0001]).len(), 8);
        assert_eq!(bl(&[0b0001_1000, 0b0000_0010]).len(), 9);

        assert_matches!(Bitlist::from_bytes(&[]), Err(DecodeErr::Empty));
        assert_matches!(Bitlist::from_bytes(&[0x00]), Err(DecodeErr::MissingSentinel));
        assert_matches!(Bitlist::try_from(vec![0x01, 0x00]), Err(DecodeErr::MissingSentinel));
        assert_matches!(Bitlist::try_from(vec![0x01, 0x01]), Ok(b) if b.len() == 8);
    }

    #[test]
    fn test_bit_at() {
        let bitlist = bl(&[0b0001_1111]);
        assert!((0..4).all(|i| bitlist.bit_at(i)));
        // the length bit is not a data bit
        assert!(!bitlist.bit_at(4));
        assert!(!bitlist.bit_at(5));
        assert!(!bitlist.bit_at(100));

        let bitlist = bl(&[0b0001_1000, 0b0000_0010]);
        assert_eq!(
            (0..9).map(|i| bitlist.bit_at(i)).collect_vec(),
            vec![false, false, false, true, true, false, false, false, false]
        );
    }

    #[test]
    fn test_set_bit_at() {
        let mut bitlist = Bitlist::new(9);
        bitlist.set_bit_at(0, true);
        bitlist.set_bit_at(8, true);
        assert_eq!(bitlist.encode_to_bytes().as_ref(), &[0x01, 0x03]);

        // writes at or past the length bit are ignored
        bitlist.set_bit_at(9, true);
        bitlist.set_bit_at(9, false);
        bitlist.set_bit_at(64, true);
        assert_eq!(bitlist.len(), 9);
        assert_eq!(bitlist.encode_to_bytes().as_ref(), &[0x01, 0x03]);

        bitlist.set_bit_at(8, false);
        assert_eq!(bitlist.encode_to_bytes().as_ref(), &[0x01, 0x02]);
    }

    #[test]
    fn test_count() {
        assert_eq!(bl(&[0x01]).count(), 0);
        assert_eq!(bl(&[0b0001_1111]).count(), 4);
        assert_eq!(bl(&[0xff, 0x01]).count(), 8);
        assert_eq!(bl(&[0xff, 0xff, 0x03]).count(), 17);
    }

    #[test]
    fn test_bytes() {
        let cases: &[(&[u8], &[u8])] = &[
            (&[0x01], &[]),
            (&[0x02], &[]),
            (&[0x03], &[0x01]),
            (&[0x12], &[0x02]),
            (&[0x02, 0x01], &[0x02]),
            (&[0x02, 0x02], &[0x02]),
            (&[0x02, 0x03], &[0x02, 0x01]),
            (&[0x00, 0x00, 0x00, 0x01], &[]),
            (&[0x00, 0x00, 0x01, 0x80], &[0x00, 0x00, 0x01]),
        ];
        for &(data, expected) in cases {
            assert_eq!(bl(data).bytes(), expected, "{data:x?}");
        }
    }

    #[test]
    fn test_bytes_no_trim() {
        let cases: &[(&[u8], &[u8])] = &[
            (&[0x01], &[]),
            (&[0x02], &[0x00]),
            (&[0x12], &[0x02]),
            (&[0x02, 0x01], &[0x02]),
            (&[0x00, 0x01], &[0x00]),
            (&[0x02, 0x02], &[0x02, 0x00]),
            (&[0x00, 0x00, 0x00, 0x01], &[0x00, 0x00, 0x00]),
        ];
        for &(data, expected) in cases {
            assert_eq!(bl(data).bytes_no_trim(), expected, "{data:x?}");
        }
    }

    #[test]
    fn test_contains() {
        assert!(bl(&[0x1f, 0x03]).contains(&bl(&[0x13, 0x02])).unwrap());
        assert!(!bl(&[0x13, 0x02]).contains(&bl(&[0x1f, 0x03])).unwrap());
        assert!(bl(&[0x02]).contains(&bl(&[0x02])).unwrap());
        assert!(!bl(&[0x0a]).contains(&bl(&[0x0b])).unwrap());
    }

    #[test]
    fn test_overlaps() {
        let cases: &[(&[u8], &[u8], bool)] = &[
            (&[0x01], &[0x01], false),
            (&[0x02], &[0x02], false),
            (&[0x03], &[0x03], true),
            (&[0x1f, 0x03], &[0x00, 0x02], false),
            (&[0x1f, 0x03], &[0x00, 0x03], true),
            (&[0x10, 0x02], &[0x01, 0x02], false),
            (&[0b0001_1000], &[0b0001_0100], false),
            (&[0b0001_1100], &[0b0001_0100], true),
        ];
        for &(a, b, expected) in cases {
            assert_eq!(bl(a).overlaps(&bl(b)).unwrap(), expected, "{a:x?} {b:x?}");
            assert_eq!(bl(b).overlaps(&bl(a)).unwrap(), expected, "{b:x?} {a:x?}");
        }
    }

    #[test]
    fn test_binary_ops() {
        let a = bl(&[0x1f, 0x03]);
        let b = bl(&[0x13, 0x02]);
        assert_eq!(a.or(&b).unwrap(), bl(&[0x1f, 0x03]));
        assert_eq!(a.and(&b).unwrap(), bl(&[0x13, 0x02]));
        assert_eq!(a.xor(&b).unwrap(), bl(&[0x0c, 0x03]));
        assert_eq!(a.xor(&b).unwrap().bytes(), vec![0x0c, 0x01]);

        let a = bl(&[0b0010_1010]);
        let b = bl(&[0b0010_0110]);
        assert_eq!(a.or(&b).unwrap(), bl(&[0b0010_1110]));
        assert_eq!(a.and(&b).unwrap(), bl(&[0b0010_0010]));
        assert_eq!(a.xor(&b).unwrap(), bl(&[0b0010_1100]));
    }

    #[test]
    fn test_xor_self_is_empty() {
        for data in [&[0x01][..], &[0xff, 0x01], &[0x1f, 0x03], &[0xab, 0xcd, 0x80]] {
            let a = bl(data);
            let x = a.xor(&a).unwrap();
            assert_eq!(x, Bitlist::new(a.len()));
            assert_eq!(x.count(), 0);
        }
    }

    #[test]
    fn test_not() {
        assert_eq!(bl(&[0x01]).not(), bl(&[0x01]));
        assert_eq!(bl(&[0b0001_0101]).not(), bl(&[0b0001_1010]));
        assert_eq!(bl(&[0xf0, 0x01]).not(), bl(&[0x0f, 0x01]));
        assert_eq!(bl(&[0xf0, 0x02]).not(), bl(&[0x0f, 0x03]));
        assert_eq!(bl(&[0xf0, 0x03]).not(), bl(&[0x0f, 0x02]));

        let mut dst = Bitlist::new(9);
        bl(&[0xf0, 0x03]).not_into(&mut dst).unwrap();
        assert_eq!(dst, bl(&[0x0f, 0x02]));
    }

    #[test]
    fn test_into_overwrites_destination() {
        let a = bl(&[0x1f, 0x03]);
        let b = bl(&[0x13, 0x02]);

        let mut dst = Bitlist::new(9);
        dst.set_bit_at(5, true);
        a.xor_into(&b, &mut dst).unwrap();
        assert_eq!(dst, bl(&[0x0c, 0x03]));
        a.and_into(&b, &mut dst).unwrap();
        assert_eq!(dst, bl(&[0x13, 0x02]));
        a.or_into(&b, &mut dst).unwrap();
        assert_eq!(dst, bl(&[0x1f, 0x03]));

        assert_matches!(
            a.or_into(&b, &mut Bitlist::new(8)),
            Err(BitfieldError::LengthMismatch { lhs: 9, rhs: 8 })
        );
    }

    #[test]
    fn test_count_variants() {
        let a = bl(&[0x1f, 0x03]);
        let b = bl(&[0x13, 0x02]);
        assert_eq!(a.or_count(&b).unwrap(), 6);
        assert_eq!(a.and_count(&b).unwrap(), 3);
        assert_eq!(a.xor_count(&b).unwrap(), 3);
    }

    #[test]
    fn test_bit_indices() {
        assert_eq!(bl(&[0x01]).bit_indices(), Vec::<usize>::new());
        assert_eq!(bl(&[0b0001_1111]).bit_indices(), vec![0, 1, 2, 3]);
        assert_eq!(bl(&[0x10, 0x01, 0xf0, 0xe0]).bit_indices(), vec![4, 8, 20, 21, 22, 23, 29, 30]);

        let bitlist = bl(&[0xff, 0x03]);
        let mut dst = [0usize; 4];
        assert_eq!(bitlist.bit_indices_into(&mut dst), 4);
        assert_eq!(dst, [0, 1, 2, 3]);
        assert!(bitlist.count() > 4);
    }

    #[quickcheck]
    fn test_matches_bools(bits: Vec<bool>) -> TestResult {
        let bitlist = mkbitlist(&bits);
        let expected = bits.iter().positions(|b| *b).collect_vec();
        TestResult::from_bool(
            bitlist.len() == bits.len()
                && bitlist.count() == expected.len()
                && bitlist.bit_indices() == expected,
        )
    }

    #[quickcheck]
    fn test_ops_preserve_length(bits: Vec<(bool, bool)>) -> TestResult {
        let (lhs, rhs): (Vec<_>, Vec<_>) = bits.into_iter().unzip();
        let a = mkbitlist(&lhs);
        let b = mkbitlist(&rhs);
        let len = lhs.len();
        TestResult::from_bool(
            a.or(&b).unwrap().len() == len
                && a.and(&b).unwrap().len() == len
                && a.xor(&b).unwrap().len() == len
                && a.not().len() == len,
        )
    }

    #[test]
    fn test_random_roundtrip() {
        let mut bitgen = BitGen::new(0xDEAD_BEEF);
        for size in [0, 1, 7, 8, 9, 255, 256, 2048] {
            let bitlist = bitgen.bitlist(size, size / 4);
            let decoded = Bitlist::from_bytes(&bitlist.encode_to_bytes()).unwrap();
            assert_eq!(decoded, bitlist);
            assert_eq!(decoded.len(), size);
        }
    }
}
