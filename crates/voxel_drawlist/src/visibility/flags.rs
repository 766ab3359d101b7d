//! VisibilityFlags - sparse per-cell flag bytes for one traversal.
//!
//! Cells are grouped into 8³ chunks aligned to the global cell grid. A
//! chunk's bytes are only allocated the first time a cell inside it is
//! addressed, and nothing at all is reserved for the rest of the box. A
//! breadth-first search from a single seed touches a small connected region
//! of a large view box, so memory follows the touched region.
//!
//! ```text
//!   cell (x, y, z) ──► chunk key (x >> 3, y >> 3, z >> 3)
//!                  └─► byte      (x & 7) + 8 (y & 7) + 64 (z & 7)
//!
//!   chunks: { (0,0,0): [512], (-1,0,0): [512], ... }
//!                          ▲
//!                          └── allocated on first get_mut()
//! ```

use std::collections::HashMap;

use glam::IVec3;

use crate::constants::{
  FLAG_ALL_AXES, FLAG_CHUNK_EDGE, FLAG_CHUNK_MASK, FLAG_CHUNK_SHIFT, FLAG_CHUNK_VOLUME,
  FLAG_VISITED,
};

/// Dense block of flag bytes.
struct FlagChunk {
  bits: [u8; FLAG_CHUNK_VOLUME],
}

impl FlagChunk {
  fn new() -> Box<Self> {
    Box::new(Self {
      bits: [0; FLAG_CHUNK_VOLUME],
    })
  }

  #[inline]
  fn address(local: IVec3) -> usize {
    let x = (local.x & FLAG_CHUNK_MASK) as usize;
    let y = (local.y & FLAG_CHUNK_MASK) as usize;
    let z = (local.z & FLAG_CHUNK_MASK) as usize;
    x + y * FLAG_CHUNK_EDGE as usize + z * (FLAG_CHUNK_EDGE * FLAG_CHUNK_EDGE) as usize
  }
}

/// Lazily allocated flag bytes over an inclusive cell box.
pub struct VisibilityFlags {
  chunks: HashMap<IVec3, Box<FlagChunk>>,
  min: IVec3,
  max: IVec3,
}

impl VisibilityFlags {
  /// Create a store covering cells `min..=max`.
  ///
  /// Allocates nothing up front, whatever the size of the box.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: IVec3, max: IVec3) -> Self {
    debug_assert!(min.cmple(max).all(), "flag box min must be <= max");
    Self {
      chunks: HashMap::new(),
      min,
      max,
    }
  }

  /// Minimum cell (inclusive).
  pub fn min(&self) -> IVec3 {
    self.min
  }

  /// Maximum cell (inclusive).
  pub fn max(&self) -> IVec3 {
    self.max
  }

  /// Check if a cell is inside the box.
  #[inline]
  pub fn contains(&self, cell: IVec3) -> bool {
    cell.cmpge(self.min).all() && cell.cmple(self.max).all()
  }

  /// Number of chunks allocated so far.
  pub fn allocated_chunks(&self) -> usize {
    self.chunks.len()
  }

  /// Chunk key for a cell. Arithmetic shift floors negative cells.
  #[inline]
  fn chunk_key(&self, cell: IVec3) -> IVec3 {
    debug_assert!(
      self.contains(cell),
      "cell {:?} outside flag box {:?}..={:?}",
      cell,
      self.min,
      self.max
    );
    IVec3::new(
      cell.x >> FLAG_CHUNK_SHIFT,
      cell.y >> FLAG_CHUNK_SHIFT,
      cell.z >> FLAG_CHUNK_SHIFT,
    )
  }

  /// Mutable flag byte for a cell, allocating its chunk if needed.
  ///
  /// The cell must lie inside the box.
  pub fn get_mut(&mut self, cell: IVec3) -> &mut u8 {
    let key = self.chunk_key(cell);
    let chunk = self.chunks.entry(key).or_insert_with(FlagChunk::new);
    &mut chunk.bits[FlagChunk::address(cell)]
  }

  /// Flag byte for a cell without allocating. Untouched cells read as 0.
  pub fn get(&self, cell: IVec3) -> u8 {
    self
      .chunks
      .get(&self.chunk_key(cell))
      .map_or(0, |chunk| chunk.bits[FlagChunk::address(cell)])
  }

  /// Record that visibility entered `cell` along the given axes.
  #[inline]
  pub fn mark_entry(&mut self, cell: IVec3, axes: u8) {
    *self.get_mut(cell) |= axes & FLAG_ALL_AXES;
  }

  /// Mark a cell visited.
  ///
  /// Returns the entry axes recorded so far, or `None` if the cell was
  /// already visited.
  #[inline]
  pub fn visit(&mut self, cell: IVec3) -> Option<u8> {
    let flags = self.get_mut(cell);
    if *flags & FLAG_VISITED != 0 {
      return None;
    }
    *flags |= FLAG_VISITED;
    Some(*flags & FLAG_ALL_AXES)
  }

  /// True if the cell has been visited.
  #[inline]
  pub fn is_visited(&self, cell: IVec3) -> bool {
    self.get(cell) & FLAG_VISITED != 0
  }
}

#[cfg(test)]
#[path = "flags_test.rs"]
mod flags_test;
