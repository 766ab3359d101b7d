//! Breadth-first visibility traversal over the block grid.
//!
//! Starting at the camera's cell, the search walks outward one cell at a
//! time, never stepping back toward the camera on any axis. Each popped
//! cell goes through three culling tests before it is accepted:
//!
//! 1. **Distance**: bounding sphere farther than `wanted_range + radius`
//! 2. **Frustum**: sphere (plus a safety margin) outside the view frustum
//! 3. **Occlusion**: external ray test, only for partially hidden cells
//!
//! Accepted cells pass visibility on to their far neighbours through
//! transparent sides (see [`faces`](super::faces)).
//!
//! ```text
//!          ┌──────┐ pop  ┌─────────┐ cull ┌────────┐ accept ┌───────────┐
//!  queue ─►│visit?├─────►│ lookup  ├─────►│ tests  ├───────►│ draw set  │
//!    ▲     └──────┘ dup  └─────────┘      └────────┘        │ shortlist │
//!    │        │ skip                           │ far sides  └───────────┘
//!    └────────┴────────────────────────────────┘
//! ```
//!
//! A cell may be queued up to three times (once per entry axis) before it
//! is processed. Only the visited bit in the flag store de-duplicates; the
//! first pop wins and later pops are dropped.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use glam::{I64Vec3, IVec3, Vec3};

use super::faces::{dominant_axis, far_side_bit, far_side_reachable, visible_near_axes};
use super::flags::VisibilityFlags;
use crate::block::{BlockRef, BlockSource, FrustumCuller, MapBlock, OcclusionTest};
use crate::constants::{
  block_to_node_wide, block_to_world, node_to_block, node_to_world, world_to_node, BS,
  FALLBACK_RADIUS_FACTOR, FLAG_ALL_AXES, FRUSTUM_CULL_EXTRA_RADIUS, MAP_BLOCKSIZE, OCCLUSION_MAX_CELL_SIZE, SIDES_ALL,
};
use crate::control::{ControlError, DrawControl};
use crate::draw_list::DrawSet;
use crate::mesh_grid::MeshGrid;

/// Counters from one traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
  /// Cells popped and processed (duplicates excluded).
  pub blocks_visited: usize,
  /// Cells rejected by the distance test.
  pub range_culled: usize,
  /// Cells rejected by the frustum test.
  pub frustum_culled: usize,
  /// Cells rejected by the occlusion test.
  pub occlusion_culled: usize,
  /// Far sides that did not pass visibility on.
  pub sides_skipped: usize,
  /// Distinct cell anchors collected while grouping.
  pub shortlist_len: usize,
  /// Entries in the final draw set.
  pub drawn: usize,
}

impl TraversalStats {
  /// Total cells rejected by any test.
  #[inline]
  pub fn total_culled(&self) -> usize {
    self.range_culled + self.frustum_culled + self.occlusion_culled
  }
}

/// Result of one traversal.
pub struct Traversal<B> {
  /// Blocks to draw, farthest first.
  pub draw_set: DrawSet<B>,
  /// Blocks of visible cells that do not draw themselves.
  pub keep_list: Vec<BlockRef<B>>,
  /// Counters.
  pub stats: TraversalStats,
}

/// Occlusion switches resolved for one traversal.
#[derive(Clone, Copy, Debug)]
struct OcclusionMode {
  /// Honour per-side solidity of blocks.
  solid_sides: bool,
  /// Ask the external occlusion test.
  queries: bool,
}

impl OcclusionMode {
  fn resolve<S: BlockSource>(control: &DrawControl, source: &S, camera_nodes: IVec3) -> Self {
    let mut enabled = control.occlusion_culling && control.cell_size < OCCLUSION_MAX_CELL_SIZE;

    // With noclip the camera can sit inside terrain and would see nothing.
    if enabled && control.allow_noclip && source.is_solid_node(camera_nodes) {
      tracing::debug!(?camera_nodes, "camera inside opaque node, occlusion disabled");
      enabled = false;
    }

    Self {
      solid_sides: enabled,
      queries: enabled && control.raytraced_culling,
    }
  }
}

/// Culling sphere for a cell, in world units.
#[inline]
fn bounding_sphere<B: MapBlock>(block: Option<&B>, block_pos: IVec3, grid: &MeshGrid) -> (Vec3, f32) {
  let origin = block_to_world(block_pos);
  match block.and_then(MapBlock::mesh_bounds) {
    Some(bounds) => (origin + bounds.center, bounds.radius),
    None => {
      // Cover the whole cell so unloaded space still takes part in culling.
      let edge = grid.cell_size as f32 * MAP_BLOCKSIZE as f32;
      let center = origin + Vec3::splat((edge * 0.5 - 0.5) * BS);
      (center, FALLBACK_RADIUS_FACTOR * edge * BS)
    }
  }
}

/// Compute the draw set for a camera snapshot.
///
/// The returned draw set holds a reference to every drawn block and the
/// keep list holds references to the remaining blocks of visible cells.
/// Dropping the result releases them.
#[tracing::instrument(skip_all, name = "drawlist::traverse")]
pub fn traverse<S, F, O>(
  camera_position: Vec3,
  control: &DrawControl,
  source: &S,
  frustum: &F,
  occlusion: &O,
) -> Result<Traversal<S::Block>, ControlError>
where
  S: BlockSource,
  F: FrustumCuller + ?Sized,
  O: OcclusionTest<S::Block> + ?Sized,
{
  control.validate()?;

  let grid = control.mesh_grid();
  let cell_size = grid.cell_size as i32;

  let camera_nodes = world_to_node(camera_position);
  let camera_world = node_to_world(camera_nodes);
  let camera_block = node_to_block(camera_nodes);
  let camera_mesh = grid.mesh_pos(camera_block);
  let camera_cell = grid.cell_coord(camera_block);

  let view_box = source.blocks_in_view_range(camera_nodes, control.box_range());
  let occlusion_mode = OcclusionMode::resolve(control, source, camera_nodes);

  // Far neighbours of the box edge cells land one cell beyond the box.
  let flags_min = grid.cell_coord(view_box.min).min(camera_cell);
  let flags_max = grid
    .cell_coord(view_box.max)
    .saturating_add(IVec3::ONE)
    .max(camera_cell);
  let mut flags = VisibilityFlags::new(flags_min, flags_max);

  let mut stats = TraversalStats::default();
  let mut draw_set = DrawSet::new(camera_block);
  let mut keep_list: Vec<BlockRef<S::Block>> = Vec::new();
  let mut shortlist: HashSet<IVec3> = HashSet::new();
  let mut queue: VecDeque<IVec3> = VecDeque::new();

  // The camera starts in open space on every axis.
  queue.push_back(camera_mesh);
  flags.mark_entry(camera_cell, FLAG_ALL_AXES);

  while let Some(block_pos) = queue.pop_front() {
    let cell = grid.cell_coord(block_pos);
    let Some(entry_axes) = flags.visit(cell) else {
      continue;
    };
    stats.blocks_visited += 1;

    let block = source.get_block(block_pos);
    let has_mesh = block.as_deref().and_then(MapBlock::mesh_bounds).is_some();
    let (center, radius) = bounding_sphere(block.as_deref(), block_pos, &grid);

    // The seed is accepted unconditionally.
    if block_pos != camera_mesh {
      if !control.range_all && center.distance(camera_world) > control.wanted_range * BS + radius {
        stats.range_culled += 1;
        continue;
      }

      // Coarse test only: the list outlives the frustum it was built with.
      if frustum.is_culled(center, radius + FRUSTUM_CULL_EXTRA_RADIUS) {
        stats.frustum_culled += 1;
        continue;
      }
    }

    // Cells seen through all three near sides are never occluded.
    if occlusion_mode.queries && has_mesh && entry_axes != FLAG_ALL_AXES {
      if let Some(block) = block.as_deref() {
        if occlusion.is_mesh_occluded(block, grid.cell_size, camera_nodes) {
          stats.occlusion_culled += 1;
          continue;
        }
      }
    }

    if grid.is_grouped() {
      // The anchor carries the mesh; it is resolved once the queue drains.
      shortlist.insert(block_pos);
      if let Some(block) = &block {
        keep_list.push(Arc::clone(block));
      }
    } else if has_mesh {
      if let Some(block) = &block {
        draw_set.insert(block_pos, Arc::clone(block));
      }
    }

    let look = block_pos - camera_mesh;
    let transparent_sides = match &block {
      Some(block) if occlusion_mode.solid_sides => !block.solid_sides() & SIDES_ALL,
      _ => SIDES_ALL,
    };
    let near_axes = visible_near_axes(look, transparent_sides, entry_axes);

    // Doubled camera to cell-center vector keeps the half-node exact.
    // Widened since block origins near the grid edge leave the i32 range.
    let precise_look = 2 * (block_to_node_wide(block_pos) - camera_nodes.as_i64vec3())
      + I64Vec3::splat((cell_size * MAP_BLOCKSIZE - 1) as i64);
    let dominant = dominant_axis(precise_look);

    for axis in 0..3 {
      let reachable = far_side_reachable(axis, near_axes, dominant);
      let entry_side = 1u8 << axis;

      for positive in [false, true] {
        let in_direction = if positive {
          look[axis] >= 0 && block_pos[axis] < view_box.max[axis]
        } else {
          look[axis] <= 0 && block_pos[axis] > view_box.min[axis]
        };
        if !in_direction {
          continue;
        }

        if reachable && transparent_sides & far_side_bit(axis, positive) != 0 {
          let mut next_pos = block_pos;
          next_pos[axis] = if positive {
            next_pos[axis].saturating_add(cell_size)
          } else {
            next_pos[axis].saturating_sub(cell_size)
          };
          flags.mark_entry(grid.cell_coord(next_pos), entry_side);
          queue.push_back(next_pos);
        } else {
          stats.sides_skipped += 1;
        }
      }
    }
  }

  debug_assert!(draw_set.is_empty() || shortlist.is_empty());
  stats.shortlist_len = shortlist.len();

  if !shortlist.is_empty() {
    let _span = tracing::info_span!("resolve_shortlist").entered();
    for pos in shortlist {
      if let Some(block) = source.get_block(pos) {
        draw_set.insert(pos, block);
      }
    }
  }

  stats.drawn = draw_set.len();
  tracing::trace!(chunks = flags.allocated_chunks(), "flag chunks allocated");

  Ok(Traversal {
    draw_set,
    keep_list,
    stats,
  })
}

#[cfg(test)]
#[path = "traversal_test.rs"]
mod traversal_test;
