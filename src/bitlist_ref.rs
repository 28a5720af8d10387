use std::{fmt::Debug, ops::Deref};

use bytes::{BufMut, Bytes};

use crate::{
    Bitlist, BitfieldRead,
    codec::{DecodeErr, Encodable},
    ones::Ones,
    sentinel,
};

/// A read-only view over an encoded [`Bitlist`].
///
/// `BitlistRef` validates the length bit once on construction and then reads bits
/// directly out of the wrapped buffer, which makes it suitable for inspecting bitlists
/// received from the network without copying them.
///
/// ```
/// use bitfield_rs::{BitlistRef, BitfieldRead};
///
/// let bitlist = BitlistRef::from_bytes(&[0b0001_1000u8, 0b0000_0010][..]).unwrap();
/// assert_eq!(bitlist.len(), 9);
/// assert_eq!(bitlist.bit_indices(), vec![3, 4]);
/// ```
#[derive(Clone)]
pub struct BitlistRef<B> {
    data: B,
}

impl<B: Deref<Target = [u8]>> Debug for BitlistRef<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitlistRef")
            .field("len", &self.len())
            .field("data", &format_args!("{:#04x?}", &*self.data))
            .finish()
    }
}

impl<B> BitlistRef<B> {
    #[inline]
    pub fn inner(&self) -> &B {
        &self.data
    }

    #[inline]
    pub fn into_inner(self) -> B {
        self.data
    }
}

impl BitlistRef<Bytes> {
    #[inline]
    pub fn encode_to_bytes(&self) -> Bytes {
        self.data.clone()
    }
}

impl<B: Deref<Target = [u8]>> BitlistRef<B> {
    pub fn from_bytes(data: B) -> Result<Self, DecodeErr> {
        sentinel::validate(&data)?;
        Ok(Self { data })
    }

    /// Copies the encoding into an owned [`Bitlist`].
    pub fn to_bitlist(&self) -> Bitlist {
        Bitlist::from_raw(self.data.to_vec())
    }
}

impl<B: Deref<Target = [u8]>> Encodable for BitlistRef<B> {
    #[inline]
    fn encoded_size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn encode<T: BufMut>(&self, buf: &mut T) {
        buf.put_slice(&self.data);
    }
}

impl<B: Deref<Target = [u8]>> BitfieldRead for BitlistRef<B> {
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

    fn bytes(&self) -> Vec<u8> {
        sentinel::trimmed_bytes(&self.data)
    }

    #[inline]
    fn iter_ones(&self) -> impl Iterator<Item = usize> {
        Ones::new(&*self.data, sentinel::data_mask(self.len()))
    }
}

impl<B: Deref<Target = [u8]>> PartialEq<Bitlist> for BitlistRef<B> {
    #[inline]
    fn eq(&self, other: &Bitlist) -> bool {
        *self.data == *other.as_bytes()
    }
}

impl<B: Deref<Target = [u8]>> PartialEq<BitlistRef<B>> for Bitlist {
    #[inline]
    fn eq(&self, other: &BitlistRef<B>) -> bool {
        other == self
    }
}

impl<B: Deref<Target = [u8]>, B2: Deref<Target = [u8]>> PartialEq<BitlistRef<B2>>
    for BitlistRef<B>
{
    #[inline]
    fn eq(&self, other: &BitlistRef<B2>) -> bool {
        *self.data == *other.data
    }
}

impl<B: Deref<Target = [u8]>> Eq for BitlistRef<B> {}
