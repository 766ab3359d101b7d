//! DrawControl - per-update tunables for the visibility traversal.

use thiserror::Error;

use crate::mesh_grid::MeshGrid;

/// Configuration for one draw list update.
///
/// Passed by value on every call; the traversal keeps no global state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawControl {
  /// Ignore `wanted_range` and take everything within `loaded_range`.
  pub range_all: bool,

  /// View distance in nodes.
  pub wanted_range: f32,

  /// Size of the view box in nodes when `range_all` is set.
  pub loaded_range: f32,

  /// The camera may be inside terrain (free move with noclip).
  pub allow_noclip: bool,

  /// Occlusion culling as a whole: per-side solidity and occlusion queries.
  pub occlusion_culling: bool,

  /// Ask the external occlusion test about partially hidden blocks.
  ///
  /// Has no effect unless `occlusion_culling` is set.
  pub raytraced_culling: bool,

  /// Blocks per mesh cell edge. 1 disables grouping.
  pub cell_size: u16,
}

/// Rejected configuration values.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ControlError {
  #[error("cell size must be at least 1")]
  ZeroCellSize,

  #[error("wanted range must be a finite non-negative number, got {0}")]
  InvalidWantedRange(f32),

  #[error("loaded range must be a finite non-negative number, got {0}")]
  InvalidLoadedRange(f32),

  #[error("range {0} exceeds the maximum of {max} nodes", max = DrawControl::MAX_RANGE)]
  RangeTooLarge(f32),
}

impl DrawControl {
  /// Default view distance in nodes.
  pub const DEFAULT_WANTED_RANGE: f32 = 100.0;

  /// Default loaded box size in nodes.
  pub const DEFAULT_LOADED_RANGE: f32 = 400.0;

  /// Largest accepted `wanted_range` or `loaded_range`, in nodes.
  ///
  /// The traversal walks every reachable cell inside the range, so the
  /// work grows with its cube.
  pub const MAX_RANGE: f32 = 4000.0;

  /// Check all values before a traversal uses them.
  pub fn validate(&self) -> Result<(), ControlError> {
    if self.cell_size == 0 {
      return Err(ControlError::ZeroCellSize);
    }
    if !self.wanted_range.is_finite() || self.wanted_range < 0.0 {
      return Err(ControlError::InvalidWantedRange(self.wanted_range));
    }
    if !self.loaded_range.is_finite() || self.loaded_range < 0.0 {
      return Err(ControlError::InvalidLoadedRange(self.loaded_range));
    }
    for range in [self.wanted_range, self.loaded_range] {
      if range > Self::MAX_RANGE {
        return Err(ControlError::RangeTooLarge(range));
      }
    }
    Ok(())
  }

  /// Mesh grid for this configuration.
  #[inline]
  pub fn mesh_grid(&self) -> MeshGrid {
    MeshGrid {
      cell_size: self.cell_size,
    }
  }

  /// Range passed to the view box query, in nodes.
  #[inline]
  pub fn box_range(&self) -> f32 {
    if self.range_all {
      self.loaded_range
    } else {
      self.wanted_range
    }
  }
}

impl Default for DrawControl {
  fn default() -> Self {
    Self {
      range_all: false,
      wanted_range: Self::DEFAULT_WANTED_RANGE,
      loaded_range: Self::DEFAULT_LOADED_RANGE,
      allow_noclip: false,
      occlusion_culling: true,
      raytraced_culling: true,
      cell_size: 1,
    }
  }
}
