//! Growable arenas the allocator carves its blocks out of.
//!
//! The arena is an opaque collaborator: the heap only ever asks it to extend
//! by some number of bytes and to hand out a bounds-checked view of what has
//! been granted so far. Growth is monotonic and append-only; nothing is ever
//! returned to the source.

use std::{ptr, slice};

use libc::{c_void, intptr_t, sbrk};

/// Why an arena refused to grow.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrowError {
  #[error("arena capacity exhausted")]
  Exhausted,
  #[error("program break moved while growing")]
  NonContiguous,
}

/// A single contiguous, only-grows memory extent.
///
/// Offsets handed out by [`grow`](Arena::grow) stay valid for the lifetime
/// of the arena, so block headers and caller handles can be stored as plain
/// offsets into [`bytes`](Arena::bytes).
pub trait Arena {
  /// Extends the arena by `additional` bytes and returns the offset of the
  /// first new byte.
  fn grow(
    &mut self,
    additional: usize,
  ) -> Result<usize, GrowError>;

  /// Total bytes granted so far.
  fn len(&self) -> usize;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn bytes(&self) -> &[u8];

  fn bytes_mut(&mut self) -> &mut [u8];
}

/// Arena backed by the program break, extended with `sbrk(2)`.
///
/// Successive `sbrk` calls return adjacent regions as long as nothing else
/// in the process moves the break; growth fails with
/// [`GrowError::NonContiguous`] if that assumption is violated.
pub struct SbrkArena {
  base: *mut u8,
  len: usize,
}

impl SbrkArena {
  pub fn new() -> Self {
    Self {
      base: ptr::null_mut(),
      len: 0,
    }
  }
}

impl Default for SbrkArena {
  fn default() -> Self {
    Self::new()
  }
}

impl Arena for SbrkArena {
  fn grow(
    &mut self,
    additional: usize,
  ) -> Result<usize, GrowError> {
    let address = unsafe { sbrk(additional as intptr_t) };

    if address == usize::MAX as *mut c_void {
      return Err(GrowError::Exhausted);
    }

    let address = address as *mut u8;

    if self.base.is_null() {
      self.base = address;
    } else if unsafe { self.base.add(self.len) } != address {
      return Err(GrowError::NonContiguous);
    }

    let offset = self.len;
    self.len += additional;

    Ok(offset)
  }

  fn len(&self) -> usize {
    self.len
  }

  fn bytes(&self) -> &[u8] {
    if self.base.is_null() {
      return &[];
    }

    unsafe { slice::from_raw_parts(self.base, self.len) }
  }

  fn bytes_mut(&mut self) -> &mut [u8] {
    if self.base.is_null() {
      return &mut [];
    }

    unsafe { slice::from_raw_parts_mut(self.base, self.len) }
  }
}

/// Arena backed by an owned buffer with a hard capacity cap.
///
/// Growth past the cap fails with [`GrowError::Exhausted`], which makes this
/// the arena of choice for tests and for embedding with a fixed budget.
pub struct FixedArena {
  bytes: Vec<u8>,
  capacity: usize,
}

impl FixedArena {
  pub fn new(capacity: usize) -> Self {
    Self {
      bytes: Vec::with_capacity(capacity),
      capacity,
    }
  }
}

impl Arena for FixedArena {
  fn grow(
    &mut self,
    additional: usize,
  ) -> Result<usize, GrowError> {
    let offset = self.bytes.len();

    if additional > self.capacity - offset {
      return Err(GrowError::Exhausted);
    }

    self.bytes.resize(offset + additional, 0);

    Ok(offset)
  }

  fn len(&self) -> usize {
    self.bytes.len()
  }

  fn bytes(&self) -> &[u8] {
    &self.bytes
  }

  fn bytes_mut(&mut self) -> &mut [u8] {
    &mut self.bytes
  }
}
