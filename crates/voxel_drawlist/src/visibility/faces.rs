//! Face visibility rules for the traversal.
//!
//! A node is entered through its *near* sides (facing the camera) and may
//! pass visibility on through its *far* sides. Both are described with two
//! bitsets:
//!
//! ```text
//!   sides (6 bits):  [ +Z | -Z | +Y | -Y | +X | -X ]    bit 5 .. bit 0
//!   axes  (3 bits):  [  Z |  Y |  X ]                   bit 2 .. bit 0
//! ```
//!
//! A far side on axis `a` is visible when it is transparent and either
//! - a visible near side lies on another axis, or
//! - the near side on `a` itself is visible and `a` is the dominant axis of
//!   the camera to node vector (looking straight down a corridor).

use glam::{I64Vec3, IVec3};

use crate::constants::{
  FLAG_ALL_AXES, SIDES_ALL, SIDE_NEG_X, SIDE_NEG_Y, SIDE_NEG_Z, SIDE_POS_X, SIDE_POS_Y, SIDE_POS_Z,
};

/// Sides on axes where the node is level with the camera cell.
///
/// These cannot hide the far sides and are masked out of the near set.
#[inline]
pub fn inner_sides(look: IVec3) -> u8 {
  (if look.x == 0 { SIDE_NEG_X | SIDE_POS_X } else { 0 })
    | (if look.y == 0 { SIDE_NEG_Y | SIDE_POS_Y } else { 0 })
    | (if look.z == 0 { SIDE_NEG_Z | SIDE_POS_Z } else { 0 })
}

/// Sides facing the camera for a node displaced by `look`.
#[inline]
pub fn near_sides(look: IVec3) -> u8 {
  (if look.x > 0 { SIDE_NEG_X } else { SIDE_POS_X })
    | (if look.y > 0 { SIDE_NEG_Y } else { SIDE_POS_Y })
    | (if look.z > 0 { SIDE_NEG_Z } else { SIDE_POS_Z })
}

/// Fold a side set to the set of axes with at least one side present.
#[inline]
pub fn sides_to_axes(sides: u8) -> u8 {
  let paired = sides | (sides >> 1);
  (paired & 1) | ((paired >> 1) & 2) | ((paired >> 2) & 4)
}

/// Axes whose near side lets visibility into the node.
///
/// `transparent_sides` are the node's see-through sides and
/// `entry_axes` are the axes visibility has been recorded entering on.
pub fn visible_near_axes(look: IVec3, transparent_sides: u8, entry_axes: u8) -> u8 {
  let near = near_sides(look);
  let inner = inner_sides(look);

  // Inside the camera cell nothing is blocked.
  let (near_transparency, inner) = if inner == SIDES_ALL {
    (near, 0)
  } else {
    (transparent_sides & near, inner)
  };

  sides_to_axes(near_transparency & !inner & SIDES_ALL) & entry_axes
}

/// Axis flag of the strictly largest component of `precise_look`.
///
/// Ties yield 0 for the tied axes.
#[inline]
pub fn dominant_axis(precise_look: I64Vec3) -> u8 {
  let a = precise_look.abs();
  ((a.x > a.y && a.x > a.z) as u8)
    | (((a.y > a.z && a.y > a.x) as u8) << 1)
    | (((a.z > a.x && a.z > a.y) as u8) << 2)
}

/// Whether visibility can continue out of a far side on `axis`.
///
/// Transparency of the far side itself is checked separately.
#[inline]
pub fn far_side_reachable(axis: usize, near_axes: u8, dominant: u8) -> bool {
  let my_side = 1u8 << axis;
  let adjacent = my_side ^ FLAG_ALL_AXES;
  (near_axes & adjacent) | (near_axes & my_side & dominant) != 0
}

/// Side bit for leaving along `axis` in the given direction.
#[inline]
pub fn far_side_bit(axis: usize, positive: bool) -> u8 {
  1u8 << (2 * axis + positive as usize)
}
