//! MeshGrid - mapping between block positions and mesh cells.
//!
//! With mesh grouping, `cell_size³` neighbouring blocks share a single mesh
//! stored on the anchor block of the cell (the corner where every coordinate
//! is a multiple of `cell_size`).
//!
//! ```text
//!   cell_size = 2, one axis:
//!
//!   block:   -4  -3  -2  -1   0   1   2   3
//!   coord:   -2  -2  -1  -1   0   0   1   1     cell_coord (floor division)
//!   anchor:  -4  -4  -2  -2   0   0   2   2     cell_pos / mesh_pos
//! ```

use glam::IVec3;

/// Grouping of blocks into mesh cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshGrid {
  /// Blocks per cell edge. 1 disables grouping.
  pub cell_size: u16,
}

impl MeshGrid {
  /// Create a grid with the given cell size.
  ///
  /// # Panics
  /// Debug-asserts that `cell_size > 0`.
  pub fn new(cell_size: u16) -> Self {
    debug_assert!(cell_size > 0, "cell_size must be positive");
    Self { cell_size }
  }

  /// Number of blocks in a cell.
  #[inline]
  pub fn cell_volume(&self) -> u32 {
    let size = self.cell_size as u32;
    size * size * size
  }

  /// True when blocks share meshes.
  #[inline]
  pub fn is_grouped(&self) -> bool {
    self.cell_size > 1
  }

  /// Coarse coordinate of the cell containing `block_pos`.
  #[inline]
  pub fn cell_coord(&self, block_pos: IVec3) -> IVec3 {
    block_pos.div_euclid(IVec3::splat(self.cell_size as i32))
  }

  /// Aligned position of the cell containing `block_pos`.
  #[inline]
  pub fn cell_pos(&self, block_pos: IVec3) -> IVec3 {
    self.cell_coord(block_pos) * self.cell_size as i32
  }

  /// Block that carries the mesh for `block_pos`.
  #[inline]
  pub fn mesh_pos(&self, block_pos: IVec3) -> IVec3 {
    self.cell_pos(block_pos)
  }

  /// True if `block_pos` is the anchor of its own cell.
  #[inline]
  pub fn is_mesh_pos(&self, block_pos: IVec3) -> bool {
    self.mesh_pos(block_pos) == block_pos
  }
}

impl Default for MeshGrid {
  fn default() -> Self {
    Self { cell_size: 1 }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ungrouped_is_identity() {
    let grid = MeshGrid::default();
    let p = IVec3::new(-3, 7, 0);
    assert_eq!(grid.cell_coord(p), p);
    assert_eq!(grid.mesh_pos(p), p);
    assert!(grid.is_mesh_pos(p));
    assert!(!grid.is_grouped());
    assert_eq!(grid.cell_volume(), 1);
  }

  #[test]
  fn test_cell_coord_floors_negative() {
    let grid = MeshGrid::new(2);
    assert_eq!(grid.cell_coord(IVec3::new(-1, -2, -3)), IVec3::new(-1, -1, -2));
    assert_eq!(grid.cell_coord(IVec3::new(0, 1, 2)), IVec3::new(0, 0, 1));
  }

  #[test]
  fn test_mesh_pos_aligns_down() {
    let grid = MeshGrid::new(4);
    assert_eq!(grid.mesh_pos(IVec3::new(5, -1, 3)), IVec3::new(4, -4, 0));
    assert_eq!(grid.mesh_pos(IVec3::new(-4, 8, -5)), IVec3::new(-4, 8, -8));
  }

  #[test]
  fn test_is_mesh_pos() {
    let grid = MeshGrid::new(2);
    assert!(grid.is_mesh_pos(IVec3::new(0, 2, -2)));
    assert!(!grid.is_mesh_pos(IVec3::new(1, 2, -2)));
    assert!(!grid.is_mesh_pos(IVec3::new(0, 2, -1)));
  }

  #[test]
  fn test_cell_volume() {
    assert_eq!(MeshGrid::new(2).cell_volume(), 8);
    assert_eq!(MeshGrid::new(3).cell_volume(), 27);
  }
}
