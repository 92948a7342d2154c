//! # fitalloc - A Growable-Arena Memory Allocator Library
//!
//! This crate provides a **free-list allocator** over a single contiguous
//! growable arena, with pluggable free-block search strategies (first-fit,
//! best-fit, worst-fit, next-fit) and split/coalesce bookkeeping.
//!
//! ## Overview
//!
//! ```text
//!   Arena Layout:
//!
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                            ARENA                                 │
//!   │                                                                  │
//!   │   ┌────┬────────┬────┬──────────┬────┬───────────────────────┐   │
//!   │   │ H1 │ data 1 │ H2 │ data 2   │ H3 │ data 3 (free)         │   │
//!   │   └────┴────────┴────┴──────────┴────┴───────────────────────┘   │
//!   │        ▲              ▲                                     ▲    │
//!   │        │              │                                     │    │
//!   │     handle 1       handle 2                            grown end │
//!   │                                                                  │
//!   └──────────────────────────────────────────────────────────────────┘
//!
//!   Headers live inside the arena, each immediately before the data
//!   region it describes. Headers chain forward in address order, so the
//!   block directory is a gapless partition of everything ever grown.
//! ```
//!
//! Allocation reuses a free block when the configured search finds one
//! (splitting off the leftover when it is worth keeping), and extends the
//! arena by exactly one header plus the normalized size otherwise. Release
//! marks the block free and runs an exhaustive forward coalescing sweep, so
//! two free neighbors never survive a release.
//!
//! ## Crate Structure
//!
//! ```text
//!   fitalloc
//!   ├── align      - Size normalization (align4!)
//!   ├── arena      - Arena trait, SbrkArena, FixedArena, GrowError
//!   ├── block      - Block headers encoded in arena bytes (internal)
//!   ├── search     - SearchMode and the free-block locator (internal)
//!   ├── stats      - Operation counters and the teardown report
//!   └── heap       - Heap: allocate / deallocate / reallocate / zeroed
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use fitalloc::{FixedArena, Heap, SearchMode};
//!
//! // A heap over a 4 KiB capped arena; SbrkArena-backed heaps work the
//! // same way via Heap::system().
//! let mut heap = Heap::with_mode(FixedArena::new(4096), SearchMode::FirstFit);
//!
//! let a = heap.allocate(64).unwrap();
//! heap.data_mut(a)[..5].copy_from_slice(b"hello");
//!
//! let b = heap.allocate_zeroed(8, 4).unwrap();
//! assert!(heap.data(b).iter().all(|&byte| byte == 0));
//!
//! let a = heap.reallocate(Some(a), 128).unwrap();
//! assert_eq!(b"hello", &heap.data(a)[..5]);
//!
//! heap.deallocate(Some(a));
//! heap.deallocate(Some(b));
//! ```
//!
//! ## How It Works
//!
//! Handles are offsets into the arena rather than raw pointers: a handle is
//! always `header_offset + HEADER_SIZE`, and payloads are reached through
//! [`Heap::data`] / [`Heap::data_mut`], so every access stays bounds-checked
//! while the bookkeeping still lives inside the managed memory itself.
//! Offsets never move once granted; arena growth is monotonic and
//! append-only.
//!
//! The first allocation registers a teardown reporter; when the heap is
//! dropped the nine lifetime counters ([`Stats`]) are written out once,
//! line per counter. `set_teardown_hook` replaces the reporter.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: every heap assumes exclusive access
//! - **Nothing returns to the OS**: the arena only ever grows
//! - **Fixed 4-byte alignment**: no wider alignment guarantees
//! - **Trusting**: headers are not defended against out-of-bounds writes;
//!   releasing a block twice is a contract violation and panics

pub mod align;
mod arena;
mod block;
mod heap;
mod search;
mod stats;

pub use arena::{Arena, FixedArena, GrowError, SbrkArena};
pub use block::HEADER_SIZE;
pub use heap::{Handle, Heap};
pub use search::SearchMode;
pub use stats::Stats;
