//! World layout and culling constants.
//!
//! # Units
//!
//! ```text
//!   world units ──÷ BS──► nodes ──÷ MAP_BLOCKSIZE──► blocks ──÷ cell_size──► cells
//!      (f32)               (i32)                     (IVec3)                 (IVec3)
//! ```
//!
//! A block is the unit the traversal walks over. With mesh grouping enabled
//! (`cell_size > 1`) a cell of `cell_size³` blocks shares one mesh stored on
//! its anchor block (the corner whose coordinates are multiples of
//! `cell_size`).
//!
//! # Flag Byte Layout
//!
//! ```text
//!   bit:   7         6   5   4   3       2           1           0
//!        [ visited | 0 | 0 | 0 | 0 | Z visible | Y visible | X visible ]
//! ```
//!
//! # Solid Side Layout
//!
//! ```text
//!   bit:   5    4    3    2    1    0
//!        [ +Z | -Z | +Y | -Y | +X | -X ]
//! ```

use glam::{I64Vec3, IVec3, Vec3};

/// Nodes per block edge.
pub const MAP_BLOCKSIZE: i32 = 16;

/// World units per node.
pub const BS: f32 = 10.0;

/// Extra radius added to bounding spheres before the frustum test.
///
/// The draw list is not rebuilt every frame, so the frustum the traversal
/// sees lags behind the camera.
pub const FRUSTUM_CULL_EXTRA_RADIUS: f32 = 300.0;

/// Ratio of the fallback bounding radius to the cell edge (≈ √3 / 2).
pub const FALLBACK_RADIUS_FACTOR: f32 = 0.87;

/// Occlusion queries are skipped for cells of this size and above.
///
/// The ray test scales with the cell volume and stops paying for itself.
pub const OCCLUSION_MAX_CELL_SIZE: u16 = 4;

// =============================================================================
// Flag store layout
// =============================================================================

/// Log2 of the flag chunk edge.
pub const FLAG_CHUNK_SHIFT: i32 = 3;

/// Edge length of a flag chunk, in cells.
pub const FLAG_CHUNK_EDGE: i32 = 1 << FLAG_CHUNK_SHIFT;

/// Mask for the in-chunk coordinate.
pub const FLAG_CHUNK_MASK: i32 = FLAG_CHUNK_EDGE - 1;

/// Number of flag bytes per chunk.
pub const FLAG_CHUNK_VOLUME: usize = (FLAG_CHUNK_EDGE * FLAG_CHUNK_EDGE * FLAG_CHUNK_EDGE) as usize;

/// Cell has been processed by the traversal.
pub const FLAG_VISITED: u8 = 0x80;

/// All three entry axes open.
pub const FLAG_ALL_AXES: u8 = 0x07;

// =============================================================================
// Solid side bits
// =============================================================================

pub const SIDE_NEG_X: u8 = 1 << 0;
pub const SIDE_POS_X: u8 = 1 << 1;
pub const SIDE_NEG_Y: u8 = 1 << 2;
pub const SIDE_POS_Y: u8 = 1 << 3;
pub const SIDE_NEG_Z: u8 = 1 << 4;
pub const SIDE_POS_Z: u8 = 1 << 5;

/// All six sides.
pub const SIDES_ALL: u8 = 0x3F;

// =============================================================================
// Conversions
// =============================================================================

/// Convert a world-space position to node coordinates.
///
/// Rounds half away from zero on each axis.
#[inline]
pub fn world_to_node(p: Vec3) -> IVec3 {
  let round = |v: f32| {
    let half = if v > 0.0 { BS / 2.0 } else { -BS / 2.0 };
    ((v + half) / BS) as i32
  };
  IVec3::new(round(p.x), round(p.y), round(p.z))
}

/// Convert node coordinates to a world-space position.
#[inline]
pub fn node_to_world(p: IVec3) -> Vec3 {
  p.as_vec3() * BS
}

/// Block containing the given node.
#[inline]
pub fn node_to_block(p: IVec3) -> IVec3 {
  p.div_euclid(IVec3::splat(MAP_BLOCKSIZE))
}

/// First node of the given block.
#[inline]
pub fn block_to_node(p: IVec3) -> IVec3 {
  p * MAP_BLOCKSIZE
}

/// First node of the given block, widened so every block position is valid.
#[inline]
pub fn block_to_node_wide(p: IVec3) -> I64Vec3 {
  p.as_i64vec3() * MAP_BLOCKSIZE as i64
}

/// World-space position of the first node of the given block.
#[inline]
pub fn block_to_world(p: IVec3) -> Vec3 {
  block_to_node_wide(p).as_vec3() * BS
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
