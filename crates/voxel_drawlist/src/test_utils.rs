//! Shared test fixtures: mock blocks and small worlds.

use std::cell::Cell;

use glam::{IVec3, Vec3};

use crate::block::{BlockRef, BlockSource, MapBlock, MeshBounds};
use crate::block_map::BlockMap;
use crate::constants::{BS, FALLBACK_RADIUS_FACTOR, MAP_BLOCKSIZE, SIDES_ALL};
use crate::view_range::BlockBox;

/// Camera in the middle of block (0, 0, 0), at node (8, 8, 8).
pub fn camera_at_origin() -> Vec3 {
  Vec3::splat(8.0 * BS)
}

/// Mock block with configurable mesh and solidity.
#[derive(Clone, Debug, PartialEq)]
pub struct TestBlock {
  pub bounds: Option<MeshBounds>,
  pub solid_sides: u8,
}

impl TestBlock {
  /// Block-sized mesh sphere, relative to the block origin.
  pub fn block_bounds() -> MeshBounds {
    let edge = MAP_BLOCKSIZE as f32;
    MeshBounds::new(
      Vec3::splat((edge * 0.5 - 0.5) * BS),
      FALLBACK_RADIUS_FACTOR * edge * BS,
    )
  }

  /// Meshed, all sides see-through.
  pub fn meshed() -> Self {
    Self {
      bounds: Some(Self::block_bounds()),
      solid_sides: 0,
    }
  }

  /// Meshed, all sides solid.
  pub fn opaque() -> Self {
    Self {
      bounds: Some(Self::block_bounds()),
      solid_sides: SIDES_ALL,
    }
  }

  /// Loaded but not meshed (air).
  pub fn empty() -> Self {
    Self {
      bounds: None,
      solid_sides: 0,
    }
  }
}

impl MapBlock for TestBlock {
  fn mesh_bounds(&self) -> Option<MeshBounds> {
    self.bounds
  }

  fn solid_sides(&self) -> u8 {
    self.solid_sides
  }
}

/// Block map with an optional fixed view box.
#[derive(Default)]
pub struct TestWorld {
  pub map: BlockMap<TestBlock>,
  pub view_box: Option<BlockBox>,
}

impl TestWorld {
  pub fn new() -> Self {
    Self::default()
  }

  /// Restrict traversal to `min..=max` regardless of range.
  pub fn with_view_box(mut self, min: IVec3, max: IVec3) -> Self {
    self.view_box = Some(BlockBox::new(min, max));
    self
  }

  /// Fill `min..=max` with blocks produced by `make`.
  pub fn fill(mut self, min: IVec3, max: IVec3, make: impl Fn(IVec3) -> Option<TestBlock>) -> Self {
    for z in min.z..=max.z {
      for y in min.y..=max.y {
        for x in min.x..=max.x {
          let pos = IVec3::new(x, y, z);
          if let Some(block) = make(pos) {
            self.map.insert(pos, block);
          }
        }
      }
    }
    self
  }

  /// Every block in `min..=max` meshed and transparent.
  pub fn open_field(min: IVec3, max: IVec3) -> Self {
    Self::new().fill(min, max, |_| Some(TestBlock::meshed()))
  }
}

impl BlockSource for TestWorld {
  type Block = TestBlock;

  fn get_block(&self, pos: IVec3) -> Option<BlockRef<TestBlock>> {
    self.map.get_block(pos)
  }

  fn is_solid_node(&self, node_pos: IVec3) -> bool {
    self.map.is_solid_node(node_pos)
  }

  fn blocks_in_view_range(&self, camera_nodes: IVec3, range: f32) -> BlockBox {
    self
      .view_box
      .unwrap_or_else(|| self.map.blocks_in_view_range(camera_nodes, range))
  }
}

/// Occlusion test that hides everything and counts its calls.
#[derive(Default)]
pub struct CountingOcclusion {
  pub calls: Cell<usize>,
  pub occlude: bool,
}

impl CountingOcclusion {
  pub fn hiding_all() -> Self {
    Self {
      calls: Cell::new(0),
      occlude: true,
    }
  }
}

impl crate::block::OcclusionTest<TestBlock> for CountingOcclusion {
  fn is_mesh_occluded(&self, _block: &TestBlock, _cell_size: u16, _camera_nodes: IVec3) -> bool {
    self.calls.set(self.calls.get() + 1);
    self.occlude
  }
}
