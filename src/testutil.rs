use proptest::{
    collection::{SizeRange, vec},
    prelude::{Strategy, any},
};
use rand::{SeedableRng, seq::index};

use crate::{Bitlist, Bitlist64, BitfieldWrite};

/// Builds a `Bitlist64` whose bit `i` is `bits[i]`.
pub fn mkbitlist64(bits: &[bool]) -> Bitlist64 {
    let mut bitlist = Bitlist64::new(bits.len());
    for (idx, &bit) in bits.iter().enumerate() {
        bitlist.set_bit_at(idx, bit);
    }
    bitlist
}

/// Builds a `Bitlist` whose bit `i` is `bits[i]`.
pub fn mkbitlist(bits: &[bool]) -> Bitlist {
    let mut bitlist = Bitlist::new(bits.len());
    for (idx, &bit) in bits.iter().enumerate() {
        bitlist.set_bit_at(idx, bit);
    }
    bitlist
}

pub fn arb_bitlist64(len: impl Into<SizeRange>) -> impl Strategy<Value = Bitlist64> {
    vec(any::<bool>(), len).prop_map(|bits| mkbitlist64(&bits))
}

pub fn arb_bitlist(len: impl Into<SizeRange>) -> impl Strategy<Value = Bitlist> {
    vec(any::<bool>(), len).prop_map(|bits| mkbitlist(&bits))
}

/// Deterministic generator of random bitfields with an exact number of set bits.
pub struct BitGen {
    rng: rand::rngs::StdRng,
}

impl BitGen {
    pub fn new(seed: u64) -> Self {
        let rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self { rng }
    }

    /// Returns `ones` distinct positions in `0..len`, in random order.
    #[track_caller]
    pub fn positions(&mut self, len: usize, ones: usize) -> Vec<usize> {
        assert!(ones <= len, "cannot set {ones} bits in a bitfield of {len} bits");
        index::sample(&mut self.rng, len, ones).into_vec()
    }

    #[track_caller]
    pub fn bitlist64(&mut self, len: usize, ones: usize) -> Bitlist64 {
        let mut bitlist = Bitlist64::new(len);
        for idx in self.positions(len, ones) {
            bitlist.set_bit_at(idx, true);
        }
        bitlist
    }

    #[track_caller]
    pub fn bitlist(&mut self, len: usize, ones: usize) -> Bitlist {
        let mut bitlist = Bitlist::new(len);
        for idx in self.positions(len, ones) {
            bitlist.set_bit_at(idx, true);
        }
        bitlist
    }
}
