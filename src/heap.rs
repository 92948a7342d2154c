//! The allocator core: block directory, allocation and release engines,
//! wrappers, and the teardown report.

use std::io;

use log::{debug, trace};

use crate::align4;
use crate::arena::{Arena, SbrkArena};
use crate::block::{Block, HEADER_SIZE, MIN_PAYLOAD};
use crate::search::{self, SearchMode};
use crate::stats::Stats;

/// Offset of a block's data region within the arena. The empty handle is
/// `None`; a present handle always sits `HEADER_SIZE` bytes past its header.
pub type Handle = usize;

type TeardownHook = Box<dyn FnMut(&Stats)>;

/// A growable-arena allocator with pluggable free-block search.
///
/// All state lives in the struct, so independent heaps can coexist; each
/// heap is single-threaded and non-reentrant by contract.
pub struct Heap<A: Arena> {
  arena: A,
  mode: SearchMode,
  head: Option<usize>,
  cursor: Option<usize>,
  stats: Stats,
  hook: Option<TeardownHook>,
}

impl Heap<SbrkArena> {
  /// Heap over the program break, first-fit search.
  pub fn system() -> Self {
    Self::new(SbrkArena::new())
  }
}

impl<A: Arena> Heap<A> {
  pub fn new(arena: A) -> Self {
    Self::with_mode(arena, SearchMode::default())
  }

  pub fn with_mode(
    arena: A,
    mode: SearchMode,
  ) -> Self {
    Self {
      arena,
      mode,
      head: None,
      cursor: None,
      stats: Stats::default(),
      hook: None,
    }
  }

  pub fn stats(&self) -> &Stats {
    &self.stats
  }

  /// Replaces the teardown reporter. The hook fires exactly once, when the
  /// heap is dropped.
  pub fn set_teardown_hook<F>(
    &mut self,
    hook: F,
  ) where
    F: FnMut(&Stats) + 'static,
  {
    self.hook = Some(Box::new(hook));
  }

  fn register_teardown(&mut self) {
    if self.hook.is_none() {
      self.hook = Some(Box::new(|stats| {
        let _ = stats.report(&mut io::stdout());
      }));
    }
  }

  /// Acquires a data region of at least `size` bytes.
  ///
  /// The size is normalized to the 4-byte word boundary before anything
  /// else. Returns `None` for a zero-size request and when the arena cannot
  /// grow; the latter is the only failure a caller can recover from.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Option<Handle> {
    self.register_teardown();

    let size = align4!(size);

    if size == 0 {
      return None;
    }

    self.stats.requested_bytes += size as u64;
    self.stats.allocations += 1;

    let found = search::find_free_block(
      self.arena.bytes(),
      self.head,
      self.cursor,
      self.mode,
      size,
    );

    let offset = match found {
      Some(offset) => {
        self.stats.reuses += 1;

        let block = Block::read(self.arena.bytes(), offset);
        if block.size >= size + HEADER_SIZE + MIN_PAYLOAD {
          self.split(offset, size);
        }

        offset
      }
      None => self.push_tail(size)?,
    };

    let mut block = Block::read(self.arena.bytes(), offset);
    block.free = false;
    block.write(self.arena.bytes_mut(), offset);

    self.cursor = Some(offset);

    Some(offset + HEADER_SIZE)
  }

  /// Releases a previously granted handle.
  ///
  /// The empty handle is a no-op. Releasing a block that is already free is
  /// a contract violation and panics; silently continuing would corrupt the
  /// directory. Every release ends with an exhaustive coalescing sweep.
  pub fn deallocate(
    &mut self,
    handle: Option<Handle>,
  ) {
    let Some(handle) = handle else {
      return;
    };

    let offset = handle - HEADER_SIZE;
    let mut block = Block::read(self.arena.bytes(), offset);

    assert!(!block.free, "double release of block at offset {offset}");

    block.free = true;
    block.write(self.arena.bytes_mut(), offset);
    self.stats.frees += 1;

    self.coalesce();
  }

  /// Acquires `count * elem_size` bytes and zero-fills the entire granted
  /// region. An overflowing product is rejected with `None` before any
  /// counter moves.
  pub fn allocate_zeroed(
    &mut self,
    count: usize,
    elem_size: usize,
  ) -> Option<Handle> {
    let total = count.checked_mul(elem_size)?;
    let handle = self.allocate(total)?;

    self.data_mut(handle).fill(0);

    Some(handle)
  }

  /// Resizes an allocation.
  ///
  /// The empty handle behaves as [`allocate`](Self::allocate); a zero
  /// `new_size` behaves as [`deallocate`](Self::deallocate) and returns the
  /// empty handle. A block whose capacity already covers `new_size` is
  /// returned unchanged (capacity is never given back on shrink). Otherwise
  /// the old capacity's worth of bytes moves into a fresh block; if that
  /// acquisition fails the original block is left untouched.
  pub fn reallocate(
    &mut self,
    handle: Option<Handle>,
    new_size: usize,
  ) -> Option<Handle> {
    let Some(handle) = handle else {
      return self.allocate(new_size);
    };

    if new_size == 0 {
      self.deallocate(Some(handle));
      return None;
    }

    let old = Block::read(self.arena.bytes(), handle - HEADER_SIZE);
    if old.size >= new_size {
      return Some(handle);
    }

    let moved = self.allocate(new_size)?;

    self.arena.bytes_mut().copy_within(handle..handle + old.size, moved);
    self.deallocate(Some(handle));

    Some(moved)
  }

  /// The granted data region behind a handle.
  pub fn data(
    &self,
    handle: Handle,
  ) -> &[u8] {
    let block = Block::read(self.arena.bytes(), handle - HEADER_SIZE);

    &self.arena.bytes()[handle..handle + block.size]
  }

  pub fn data_mut(
    &mut self,
    handle: Handle,
  ) -> &mut [u8] {
    let block = Block::read(self.arena.bytes(), handle - HEADER_SIZE);

    &mut self.arena.bytes_mut()[handle..handle + block.size]
  }

  /// Grows the arena by one header plus `size` bytes and links the fresh
  /// block in as the directory tail.
  fn push_tail(
    &mut self,
    size: usize,
  ) -> Option<usize> {
    let offset = match self.arena.grow(HEADER_SIZE + size) {
      Ok(offset) => offset,
      Err(err) => {
        debug!("arena refused {} bytes: {err}", HEADER_SIZE + size);
        return None;
      }
    };

    let block = Block {
      size,
      free: false,
      next: None,
    };
    block.write(self.arena.bytes_mut(), offset);

    match self.tail() {
      Some(tail) => {
        let mut prev = Block::read(self.arena.bytes(), tail);
        prev.next = Some(offset);
        prev.write(self.arena.bytes_mut(), tail);
      }
      None => self.head = Some(offset),
    }

    self.stats.grows += 1;
    self.stats.blocks += 1;
    self.stats.peak_arena += size as u64;

    debug!("grew arena by {} bytes, block at {offset}", HEADER_SIZE + size);

    Some(offset)
  }

  fn tail(&self) -> Option<usize> {
    let mut current = self.head?;

    loop {
      match Block::read(self.arena.bytes(), current).next {
        Some(next) => current = next,
        None => return Some(current),
      }
    }
  }

  /// Carves the block at `offset` down to `keep` bytes; the leftover becomes
  /// a new free block spliced in right after it.
  ///
  /// Callers must have checked that the leftover covers a header plus the
  /// minimum payload.
  fn split(
    &mut self,
    offset: usize,
    keep: usize,
  ) {
    let mut block = Block::read(self.arena.bytes(), offset);
    let remainder = offset + HEADER_SIZE + keep;

    let leftover = Block {
      size: block.size - keep - HEADER_SIZE,
      free: true,
      next: block.next,
    };
    leftover.write(self.arena.bytes_mut(), remainder);

    block.size = keep;
    block.next = Some(remainder);
    block.write(self.arena.bytes_mut(), offset);

    self.stats.splits += 1;
    self.stats.blocks += 1;

    trace!("split block at {offset}, remainder at {remainder}");
  }

  /// Absorbs the successor at `next` into the block at `offset`. Coalescing
  /// only ever walks forward.
  fn merge_with_next(
    &mut self,
    offset: usize,
    next: usize,
  ) {
    let mut block = Block::read(self.arena.bytes(), offset);
    let absorbed = Block::read(self.arena.bytes(), next);

    block.size += HEADER_SIZE + absorbed.size;
    block.next = absorbed.next;
    block.write(self.arena.bytes_mut(), offset);

    // The absorbed header is gone; a cursor parked on it snaps to the head.
    if self.cursor == Some(next) {
      self.cursor = self.head;
    }

    self.stats.coalesces += 1;
    self.stats.blocks -= 1;

    trace!("coalesced block at {next} into {offset}");
  }

  /// Full forward sweep: merges every free block into its free successor
  /// until no two adjacent free blocks remain. Staying put after a merge
  /// lets chains of three or more collapse in one pass.
  fn coalesce(&mut self) {
    let mut current = self.head;

    while let Some(offset) = current {
      let block = Block::read(self.arena.bytes(), offset);

      match block.next {
        Some(next) if block.free && Block::read(self.arena.bytes(), next).free => {
          self.merge_with_next(offset, next);
        }
        _ => current = block.next,
      }
    }
  }
}

impl<A: Arena> Drop for Heap<A> {
  fn drop(&mut self) {
    if let Some(mut hook) = self.hook.take() {
      hook(&self.stats);
    }
  }
}
