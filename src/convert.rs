//! Lossless conversion between [`Bitlist64`] and [`Bitlist`].
//!
//! Both directions preserve the length and every bit, so converting there and back is
//! the identity, and both representations report identical [`BitfieldRead::bytes`].

use crate::{Bitlist, Bitlist64, BitfieldRead, Encodable};

impl From<&Bitlist64> for Bitlist {
    fn from(bitlist: &Bitlist64) -> Self {
        let mut data = Vec::with_capacity(bitlist.encoded_size());
        bitlist.encode(&mut data);
        Bitlist::from_raw(data)
    }
}

impl From<Bitlist64> for Bitlist {
    #[inline]
    fn from(bitlist: Bitlist64) -> Self {
        Bitlist::from(&bitlist)
    }
}

impl From<&Bitlist> for Bitlist64 {
    fn from(bitlist: &Bitlist) -> Self {
        Bitlist64::from_le_bytes(bitlist.len(), &bitlist.bytes_no_trim())
    }
}

impl From<Bitlist> for Bitlist64 {
    #[inline]
    fn from(bitlist: Bitlist) -> Self {
        Bitlist64::from(&bitlist)
    }
}

impl PartialEq<Bitlist> for Bitlist64 {
    fn eq(&self, other: &Bitlist) -> bool {
        self.len() == other.len() && itertools::equal(self.iter_ones(), other.iter_ones())
    }
}

impl PartialEq<Bitlist64> for Bitlist {
    #[inline]
    fn eq(&self, other: &Bitlist64) -> bool {
        other == self
    }
}
