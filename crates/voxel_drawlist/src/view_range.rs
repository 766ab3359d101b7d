//! Block box covered by a view range.

use glam::IVec3;

use crate::constants::MAP_BLOCKSIZE;

/// Inclusive box of block positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockBox {
  /// Minimum corner (inclusive).
  pub min: IVec3,
  /// Maximum corner (inclusive).
  pub max: IVec3,
}

impl BlockBox {
  /// Create a new box from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: IVec3, max: IVec3) -> Self {
    debug_assert!(
      min.cmple(max).all(),
      "BlockBox min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Check if the box contains a block position.
  #[inline]
  pub fn contains(&self, pos: IVec3) -> bool {
    pos.cmpge(self.min).all() && pos.cmple(self.max).all()
  }

  /// Number of blocks along each axis.
  #[inline]
  pub fn extent(&self) -> IVec3 {
    self.max - self.min + IVec3::ONE
  }
}

/// Box of blocks that may hold content within `range` nodes of the camera.
///
/// The box is padded generously on the low side; blocks are dropped later
/// by the exact distance test. Truncating division keeps the box identical
/// to the engine's historical one.
pub fn blocks_in_view_range(camera_nodes: IVec3, range: f32) -> BlockBox {
  let range = range.max(0.0) as i32;
  let nodes_min = camera_nodes.saturating_sub(IVec3::splat(range));
  let nodes_max = camera_nodes.saturating_add(IVec3::splat(range));

  BlockBox {
    min: nodes_min / MAP_BLOCKSIZE - IVec3::splat(3),
    max: nodes_max / MAP_BLOCKSIZE + IVec3::splat(1),
  }
}
