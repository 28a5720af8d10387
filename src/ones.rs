use std::iter::FusedIterator;

use num::PrimInt;

/// Iterates the positions of set bits across a slice of primitive words.
///
/// Bit `i` of word `w` is reported as position `w * W::BITS + i`. The final word is
/// masked with `tail_mask` before it is scanned, which lets callers hide bits past the
/// logical end of a bitfield (such as a length bit).
///
/// Each step isolates the lowest set bit, so the cost is proportional to the number of
/// set bits rather than to the length of the slice.
#[must_use]
#[derive(Clone)]
pub struct Ones<'a, W> {
    words: &'a [W],
    tail_mask: W,
    cursor: usize,
    current: W,
}

impl<'a, W: PrimInt> Ones<'a, W> {
    const BITS: usize = std::mem::size_of::<W>() * 8;

    pub fn new(words: &'a [W], tail_mask: W) -> Self {
        let current = load(words, 0, tail_mask);
        Self { words, tail_mask, cursor: 0, current }
    }
}

#[inline]
fn load<W: PrimInt>(words: &[W], idx: usize, tail_mask: W) -> W {
    match words.get(idx) {
        Some(&word) if idx + 1 == words.len() => word & tail_mask,
        Some(&word) => word,
        None => W::zero(),
    }
}

impl<W: PrimInt> Iterator for Ones<'_, W> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current.is_zero() {
            if self.cursor + 1 >= self.words.len() {
                self.cursor = self.words.len();
                return None;
            }
            self.cursor += 1;
            self.current = load(self.words, self.cursor, self.tail_mask);
        }
        let bit = self.current.trailing_zeros() as usize;
        // clear the lowest set bit
        self.current = self.current & (self.current - W::one());
        Some(self.cursor * Self::BITS + bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining_words = self.words.len().saturating_sub(self.cursor + 1);
        let upper = self.current.count_ones() as usize + remaining_words * Self::BITS;
        (0, Some(upper))
    }
}

impl<W: PrimInt> FusedIterator for Ones<'_, W> {}
