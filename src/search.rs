//! Free-block search strategies.

use crate::block::Block;

/// How the heap picks a free block for a request.
///
/// Exactly one mode is chosen when the heap is constructed; it never changes
/// at runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
  /// First qualifying block in arena order.
  #[default]
  FirstFit,
  /// Smallest qualifying block; ties keep the earliest.
  BestFit,
  /// Largest qualifying block; ties keep the earliest.
  WorstFit,
  /// First qualifying block at or after the cursor, wrapping to the head.
  NextFit,
}

/// Returns the header offset of a free block with capacity for `size`
/// bytes, or `None` when nothing in the directory qualifies.
///
/// `size` must already be normalized. `cursor` is only consulted by
/// [`SearchMode::NextFit`]; an unset cursor starts the scan at the head.
pub fn find_free_block(
  bytes: &[u8],
  head: Option<usize>,
  cursor: Option<usize>,
  mode: SearchMode,
  size: usize,
) -> Option<usize> {
  let head = head?;

  match mode {
    SearchMode::FirstFit => {
      let mut current = Some(head);

      while let Some(offset) = current {
        let block = Block::read(bytes, offset);

        if block.free && block.size >= size {
          return Some(offset);
        }
        current = block.next;
      }

      None
    }

    SearchMode::BestFit => {
      let mut current = Some(head);
      let mut best: Option<(usize, usize)> = None;

      while let Some(offset) = current {
        let block = Block::read(bytes, offset);

        if block.free && block.size >= size {
          match best {
            Some((_, held)) if block.size >= held => {}
            _ => best = Some((offset, block.size)),
          }
        }
        current = block.next;
      }

      best.map(|(offset, _)| offset)
    }

    SearchMode::WorstFit => {
      let mut current = Some(head);
      let mut worst: Option<(usize, usize)> = None;

      while let Some(offset) = current {
        let block = Block::read(bytes, offset);

        if block.free && block.size >= size {
          match worst {
            Some((_, held)) if block.size <= held => {}
            _ => worst = Some((offset, block.size)),
          }
        }
        current = block.next;
      }

      worst.map(|(offset, _)| offset)
    }

    SearchMode::NextFit => {
      let start = cursor.unwrap_or(head);
      let mut current = start;

      loop {
        let block = Block::read(bytes, current);

        if block.free && block.size >= size {
          return Some(current);
        }

        current = block.next.unwrap_or(head);
        if current == start {
          return None;
        }
      }
    }
  }
}
