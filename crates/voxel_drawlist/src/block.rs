//! Collaborator seams consumed by the traversal.
//!
//! The draw list knows nothing about how blocks are stored, meshed or
//! tested for visibility. Engines plug in through these traits:
//!
//! - [`MapBlock`]: what the traversal reads from a resident block
//! - [`BlockSource`]: non-blocking lookup of resident blocks by position
//! - [`FrustumCuller`]: sphere vs view frustum rejection
//! - [`OcclusionTest`]: ray or geometry based hidden-block test
//!
//! Blocks are shared as `Arc<B>`. Holding a clone keeps the block alive;
//! the draw list holds clones for every drawn or retained block until the
//! next update.

use std::sync::Arc;

use glam::{IVec3, Vec3};

use crate::view_range::{blocks_in_view_range, BlockBox};

/// Shared handle to an externally owned block.
pub type BlockRef<B> = Arc<B>;

/// Bounding sphere of a block's mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshBounds {
  /// Sphere center relative to the block origin, in world units.
  pub center: Vec3,
  /// Sphere radius in world units.
  pub radius: f32,
}

impl MeshBounds {
  pub fn new(center: Vec3, radius: f32) -> Self {
    Self { center, radius }
  }
}

/// Read-only view of a resident block.
pub trait MapBlock {
  /// Mesh bounds, or `None` if the block has not been meshed.
  fn mesh_bounds(&self) -> Option<MeshBounds>;

  /// Fully opaque sides, `+Z -Z +Y -Y +X -X` from bit 5 down to bit 0.
  fn solid_sides(&self) -> u8;
}

/// Lookup of resident blocks.
///
/// All methods must return immediately. Blocks that are still loading are
/// reported as absent.
pub trait BlockSource {
  type Block: MapBlock;

  /// Block at `pos`, if resident.
  fn get_block(&self, pos: IVec3) -> Option<BlockRef<Self::Block>>;

  /// True if the node at `node_pos` is unknown or fully solid.
  ///
  /// Only consulted when the camera may clip into terrain. The default
  /// knows nothing about nodes and reports every node as open.
  fn is_solid_node(&self, _node_pos: IVec3) -> bool {
    false
  }

  /// Inclusive block box the traversal may enter.
  fn blocks_in_view_range(&self, camera_nodes: IVec3, range: f32) -> BlockBox {
    blocks_in_view_range(camera_nodes, range)
  }
}

impl<S: BlockSource> BlockSource for &S {
  type Block = S::Block;

  fn get_block(&self, pos: IVec3) -> Option<BlockRef<Self::Block>> {
    (**self).get_block(pos)
  }

  fn is_solid_node(&self, node_pos: IVec3) -> bool {
    (**self).is_solid_node(node_pos)
  }

  fn blocks_in_view_range(&self, camera_nodes: IVec3, range: f32) -> BlockBox {
    (**self).blocks_in_view_range(camera_nodes, range)
  }
}

/// Frustum rejection test.
pub trait FrustumCuller {
  /// True if the sphere is definitely outside the view frustum.
  fn is_culled(&self, center: Vec3, radius: f32) -> bool;
}

impl<F: Fn(Vec3, f32) -> bool> FrustumCuller for F {
  fn is_culled(&self, center: Vec3, radius: f32) -> bool {
    self(center, radius)
  }
}

/// Frustum culler that accepts everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFrustumCulling;

impl FrustumCuller for NoFrustumCulling {
  fn is_culled(&self, _center: Vec3, _radius: f32) -> bool {
    false
  }
}

/// Occlusion test for a meshed block.
///
/// Returning `false` is always safe; it only costs overdraw.
pub trait OcclusionTest<B> {
  /// True if the cell anchored at `block` is fully hidden from the camera.
  fn is_mesh_occluded(&self, block: &B, cell_size: u16, camera_nodes: IVec3) -> bool;
}

impl<B, F: Fn(&B, u16, IVec3) -> bool> OcclusionTest<B> for F {
  fn is_mesh_occluded(&self, block: &B, cell_size: u16, camera_nodes: IVec3) -> bool {
    self(block, cell_size, camera_nodes)
  }
}

/// Occlusion test that never hides anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOcclusion;

impl<B> OcclusionTest<B> for NoOcclusion {
  fn is_mesh_occluded(&self, _block: &B, _cell_size: u16, _camera_nodes: IVec3) -> bool {
    false
  }
}
