//! DrawList - ordered, de-duplicated set of blocks to draw.
//!
//! # Ordering
//!
//! Entries are sorted farthest first by squared block distance to the
//! camera block, ties broken by descending `(x, y, z)`. The order is a
//! total order on positions, so iteration is deterministic.
//!
//! # Lifetime
//!
//! Every drawn block and every block of a visible grouped cell is held as
//! an `Arc` clone until the next [`DrawList::update`] replaces the lists (or
//! the list is cleared or dropped). A renderer reading the previous list
//! therefore never sees a block freed underneath it.

use std::cmp::Ordering;
use std::collections::btree_map::{self, BTreeMap};

use glam::{IVec3, Vec3};
use web_time::Instant;

use crate::block::{BlockRef, BlockSource, FrustumCuller, OcclusionTest};
use crate::control::{ControlError, DrawControl};
use crate::metrics::DrawListMetrics;
use crate::visibility::{traverse, TraversalStats};

// =============================================================================
// DrawKey - distance ordering
// =============================================================================

/// Sort key of a draw set entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawKey {
  /// Squared block distance to the camera block.
  pub distance_sq: i64,
  /// Block position.
  pub pos: IVec3,
}

impl DrawKey {
  pub fn new(pos: IVec3, camera_block: IVec3) -> Self {
    let d = pos.as_i64vec3() - camera_block.as_i64vec3();
    Self {
      distance_sq: d.length_squared(),
      pos,
    }
  }
}

impl Ord for DrawKey {
  fn cmp(&self, other: &Self) -> Ordering {
    // Reversed: farther and larger sort first.
    other
      .distance_sq
      .cmp(&self.distance_sq)
      .then_with(|| other.pos.to_array().cmp(&self.pos.to_array()))
  }
}

impl PartialOrd for DrawKey {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

// =============================================================================
// DrawSet
// =============================================================================

/// Blocks to draw, keyed by position, farthest first.
pub struct DrawSet<B> {
  camera_block: IVec3,
  entries: BTreeMap<DrawKey, BlockRef<B>>,
}

impl<B> DrawSet<B> {
  /// Create an empty set ordered around `camera_block`.
  pub fn new(camera_block: IVec3) -> Self {
    Self {
      camera_block,
      entries: BTreeMap::new(),
    }
  }

  /// Camera block the ordering is relative to.
  pub fn camera_block(&self) -> IVec3 {
    self.camera_block
  }

  /// Insert a block. Returns `false` and keeps the existing entry if the
  /// position is already present.
  pub fn insert(&mut self, pos: IVec3, block: BlockRef<B>) -> bool {
    match self.entries.entry(DrawKey::new(pos, self.camera_block)) {
      btree_map::Entry::Occupied(_) => false,
      btree_map::Entry::Vacant(slot) => {
        slot.insert(block);
        true
      }
    }
  }

  /// Block at `pos`, if present.
  pub fn get(&self, pos: IVec3) -> Option<&BlockRef<B>> {
    self.entries.get(&DrawKey::new(pos, self.camera_block))
  }

  /// Check if a position is in the set.
  pub fn contains(&self, pos: IVec3) -> bool {
    self.entries.contains_key(&DrawKey::new(pos, self.camera_block))
  }

  /// Number of entries.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Check if empty.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterate farthest first.
  pub fn iter(&self) -> impl Iterator<Item = (IVec3, &BlockRef<B>)> {
    self.entries.iter().map(|(key, block)| (key.pos, block))
  }

  /// Positions, farthest first.
  pub fn positions(&self) -> impl Iterator<Item = IVec3> + '_ {
    self.entries.keys().map(|key| key.pos)
  }

  /// Release all entries.
  pub fn clear(&mut self) {
    self.entries.clear();
  }
}

impl<B> Default for DrawSet<B> {
  fn default() -> Self {
    Self::new(IVec3::ZERO)
  }
}

// =============================================================================
// DrawList
// =============================================================================

/// Owner of the current draw set and the blocks it keeps alive.
pub struct DrawList<B> {
  draw_set: DrawSet<B>,
  keep_list: Vec<BlockRef<B>>,
  last_stats: TraversalStats,
  needs_update: bool,
  metrics: DrawListMetrics,
}

impl<B> DrawList<B> {
  /// Create an empty list that asks for its first update.
  pub fn new() -> Self {
    Self {
      draw_set: DrawSet::default(),
      keep_list: Vec::new(),
      last_stats: TraversalStats::default(),
      needs_update: true,
      metrics: DrawListMetrics::default(),
    }
  }

  /// Blocks to draw this frame, farthest first.
  pub fn draw_set(&self) -> &DrawSet<B> {
    &self.draw_set
  }

  /// Blocks kept alive without drawing themselves.
  pub fn keep_list(&self) -> &[BlockRef<B>] {
    &self.keep_list
  }

  /// Counters from the last successful update.
  pub fn last_stats(&self) -> TraversalStats {
    self.last_stats
  }

  /// True if the list should be rebuilt (for example after new blocks
  /// arrived).
  pub fn needs_update(&self) -> bool {
    self.needs_update
  }

  pub fn set_needs_update(&mut self, value: bool) {
    self.needs_update = value;
  }

  /// Timing and stats history. Empty unless built with `metrics`.
  pub fn metrics(&self) -> &DrawListMetrics {
    &self.metrics
  }

  /// Release every held block.
  pub fn clear(&mut self) {
    self.draw_set.clear();
    self.keep_list.clear();
    self.needs_update = true;
  }

  /// Rebuild the lists for a new camera snapshot.
  ///
  /// The previous lists are released only after the new ones are complete,
  /// so a block visible in both stays alive throughout. On a configuration
  /// error the previous lists are kept untouched.
  pub fn update<S, F, O>(
    &mut self,
    camera_position: Vec3,
    control: &DrawControl,
    source: &S,
    frustum: &F,
    occlusion: &O,
  ) -> Result<TraversalStats, ControlError>
  where
    S: BlockSource<Block = B>,
    F: FrustumCuller + ?Sized,
    O: OcclusionTest<B> + ?Sized,
  {
    let _span = tracing::info_span!("drawlist::update").entered();
    let start = Instant::now();

    let traversal = traverse(camera_position, control, source, frustum, occlusion).map_err(|err| {
      tracing::warn!(%err, "draw list update rejected");
      err
    })?;

    self.draw_set = traversal.draw_set;
    self.keep_list = traversal.keep_list;
    self.last_stats = traversal.stats;
    self.needs_update = false;

    let stats = traversal.stats;
    let elapsed_us = start.elapsed().as_micros() as u64;
    self.metrics.record_update(elapsed_us, &stats);

    tracing::debug!(
      visited = stats.blocks_visited,
      range_culled = stats.range_culled,
      frustum_culled = stats.frustum_culled,
      occlusion_culled = stats.occlusion_culled,
      sides_skipped = stats.sides_skipped,
      shortlist = stats.shortlist_len,
      drawn = stats.drawn,
      elapsed_us,
      "draw list updated"
    );

    Ok(stats)
  }
}

impl<B> Default for DrawList<B> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
#[path = "draw_list_test.rs"]
mod draw_list_test;
