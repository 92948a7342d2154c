//! Block header encoding.
//!
//! Every block starts with a fixed-size header written into the arena bytes
//! it manages, immediately followed by the data region the header describes.
//! Handles returned to callers always point at `header + HEADER_SIZE`.

/// Bytes occupied by an encoded header.
///
/// Layout (little-endian):
///
/// ```text
///   0..8    size  (u64)  capacity of the data region, header excluded
///   8..16   next  (u64)  header offset of the following block, NO_NEXT = tail
///   16      free  (u8)   0 = allocated, 1 = free
///   17..24  padding, keeps data regions word-aligned
/// ```
pub const HEADER_SIZE: usize = 24;

/// Smallest data region a split is allowed to leave behind. Leftovers below
/// `HEADER_SIZE + MIN_PAYLOAD` stay with the granted block instead of
/// becoming an unusably tiny free fragment.
pub const MIN_PAYLOAD: usize = 4;

const NO_NEXT: u64 = u64::MAX;

/// Decoded view of one header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
  pub size: usize,
  pub free: bool,
  pub next: Option<usize>,
}

impl Block {
  pub fn read(
    bytes: &[u8],
    offset: usize,
  ) -> Self {
    let mut word = [0u8; 8];

    word.copy_from_slice(&bytes[offset..offset + 8]);
    let size = u64::from_le_bytes(word) as usize;

    word.copy_from_slice(&bytes[offset + 8..offset + 16]);
    let next = match u64::from_le_bytes(word) {
      NO_NEXT => None,
      offset => Some(offset as usize),
    };

    let free = bytes[offset + 16] != 0;

    Self { size, free, next }
  }

  pub fn write(
    &self,
    bytes: &mut [u8],
    offset: usize,
  ) {
    bytes[offset..offset + 8].copy_from_slice(&(self.size as u64).to_le_bytes());

    let next = match self.next {
      Some(next) => next as u64,
      None => NO_NEXT,
    };
    bytes[offset + 8..offset + 16].copy_from_slice(&next.to_le_bytes());

    bytes[offset + 16] = self.free as u8;
  }
}
