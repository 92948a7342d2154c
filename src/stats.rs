//! Arena-lifetime counters.

use std::io::{self, Write};

/// Counters bumped by every heap operation.
///
/// Zeroed when the heap is constructed, monotonically updated, never reset.
/// The heap reports them once through its teardown hook.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
  /// Successful or attempted allocations (zero-size requests excluded).
  pub allocations: u64,
  /// Releases of live blocks.
  pub frees: u64,
  /// Allocations satisfied from an existing free block.
  pub reuses: u64,
  /// Times the arena was extended for a fresh block.
  pub grows: u64,
  /// Oversized reused blocks carved in two.
  pub splits: u64,
  /// Adjacent free blocks merged away.
  pub coalesces: u64,
  /// Blocks currently in the directory.
  pub blocks: u64,
  /// Sum of all normalized request sizes.
  pub requested_bytes: u64,
  /// Total data-region bytes ever granted by arena growth.
  pub peak_arena: u64,
}

impl Stats {
  /// Writes the counters in the fixed line-per-counter report format.
  pub fn report<W: Write>(
    &self,
    out: &mut W,
  ) -> io::Result<()> {
    writeln!(out, "\narena statistics")?;
    writeln!(out, "allocations:\t{}", self.allocations)?;
    writeln!(out, "frees:\t\t{}", self.frees)?;
    writeln!(out, "reuses:\t\t{}", self.reuses)?;
    writeln!(out, "grows:\t\t{}", self.grows)?;
    writeln!(out, "splits:\t\t{}", self.splits)?;
    writeln!(out, "coalesces:\t{}", self.coalesces)?;
    writeln!(out, "blocks:\t\t{}", self.blocks)?;
    writeln!(out, "requested:\t{}", self.requested_bytes)?;
    writeln!(out, "peak arena:\t{}", self.peak_arena)
  }
}
