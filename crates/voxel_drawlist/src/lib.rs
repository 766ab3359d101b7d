//! voxel_drawlist - Engine independent visibility and draw list for block worlds
//!
//! Given a camera position and a grid of resident map blocks, this crate
//! decides which blocks to draw this frame. A breadth-first flood fill
//! starts at the camera's block and spreads outward through transparent
//! block sides, dropping blocks that are out of range, outside the view
//! frustum or hidden by terrain.
//!
//! # Features
//!
//! - **Sparse flag store**: per-traversal visited bits allocated in 8³ chunks
//! - **Face rules**: visibility only continues through see-through sides
//!   reachable from the camera
//! - **Mesh grouping**: `cell_size³` blocks drawn through one anchor mesh
//! - **Block lifetime**: drawn blocks are held as `Arc`s until the next update
//! - **Handoff**: bounded channel for publishing blocks from worker threads
//!
//! # Example
//!
//! ```ignore
//! use voxel_drawlist::{BlockMap, DrawControl, DrawList, NoFrustumCulling, NoOcclusion};
//!
//! let mut blocks = BlockMap::new();
//! // blocks.insert(pos, my_block);
//!
//! let mut list = DrawList::new();
//! let stats = list.update(camera, &DrawControl::default(), &blocks, &NoFrustumCulling, &NoOcclusion)?;
//!
//! for (pos, block) in list.draw_set().iter() {
//!     // draw farthest first
//! }
//! ```

pub mod block;
pub mod block_map;
pub mod constants;
pub mod control;
pub mod draw_list;
pub mod mesh_grid;
pub mod metrics;
pub mod view_range;
pub mod visibility;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used items
pub use block::{
  BlockRef, BlockSource, FrustumCuller, MapBlock, MeshBounds, NoFrustumCulling, NoOcclusion,
  OcclusionTest,
};
pub use block_map::{BlockHandoff, BlockMap, BlockSender, HandoffError};
pub use constants::{BS, MAP_BLOCKSIZE};
pub use control::{ControlError, DrawControl};
pub use draw_list::{DrawKey, DrawList, DrawSet};
pub use mesh_grid::MeshGrid;
pub use view_range::{blocks_in_view_range, BlockBox};
pub use visibility::{traverse, Traversal, TraversalStats};
