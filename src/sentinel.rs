//! Arithmetic for the length-bit encoding shared by [`crate::Bitlist`] and
//! [`crate::BitlistRef`].
//!
//! A bitlist of `n` bits is stored in `n / 8 + 1` bytes. Bit `n % 8` of the last
//! byte is the length bit; every bit above it is zero.

use crate::codec::DecodeErr;

/// Checks that `data` carries a length bit.
pub(crate) fn validate(data: &[u8]) -> Result<(), DecodeErr> {
    match data.last() {
        None => {
            tracing::debug!("rejecting empty bitlist encoding");
            Err(DecodeErr::Empty)
        }
        Some(0) => {
            tracing::debug!(len = data.len(), "rejecting bitlist encoding without a length bit");
            Err(DecodeErr::MissingSentinel)
        }
        Some(_) => Ok(()),
    }
}

/// The number of bytes needed to encode `len` bits plus the length bit.
#[inline]
pub(crate) const fn encoded_len(len: usize) -> usize {
    len / 8 + 1
}

/// The length bit for a bitlist of `len` bits, positioned within the last byte.
#[inline]
pub(crate) const fn length_bit(len: usize) -> u8 {
    1 << (len % 8)
}

/// Selects the data bits of the last byte of a bitlist of `len` bits.
#[inline]
pub(crate) const fn data_mask(len: usize) -> u8 {
    length_bit(len) - 1
}

/// Derives the logical length of a validated encoding.
#[inline]
pub(crate) fn len(data: &[u8]) -> usize {
    match data.last() {
        // a zero last byte is rejected by `validate`
        Some(&last) if last != 0 => {
            let msb = (u8::BITS - last.leading_zeros()) as usize;
            8 * (data.len() - 1) + msb - 1
        }
        _ => 0,
    }
}

#[inline]
pub(crate) fn bit_at(data: &[u8], idx: usize) -> bool {
    idx < len(data) && data[idx >> 3] & (1 << (idx & 7)) != 0
}

/// Iterates the data bytes of an encoding with the length bit masked off.
#[inline]
pub(crate) fn data_bytes(data: &[u8]) -> impl Iterator<Item = u8> + '_ {
    let last = data.len().saturating_sub(1);
    let mask = data_mask(len(data));
    data.iter()
        .enumerate()
        .map(move |(i, &b)| if i == last { b & mask } else { b })
}

#[inline]
pub(crate) fn count(data: &[u8]) -> usize {
    data_bytes(data).map(|b| b.count_ones() as usize).sum()
}

/// Copies the data bits, clearing the length bit and trimming trailing zero bytes.
pub(crate) fn trimmed_bytes(data: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = data_bytes(data).collect();
    let trimmed = out.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    out.truncate(trimmed);
    out
}
