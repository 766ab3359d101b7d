use super::*;

/// Flag chunk constants are consistent with each other.
#[test]
fn test_flag_chunk_layout() {
  assert_eq!(FLAG_CHUNK_EDGE, 8);
  assert_eq!(1 << FLAG_CHUNK_SHIFT, FLAG_CHUNK_EDGE);
  assert_eq!(FLAG_CHUNK_MASK, 7);
  assert_eq!(FLAG_CHUNK_VOLUME, 512);
}

/// Side bits cover exactly the six low bits.
#[test]
fn test_side_bits_are_disjoint() {
  let sides = [SIDE_NEG_X, SIDE_POS_X, SIDE_NEG_Y, SIDE_POS_Y, SIDE_NEG_Z, SIDE_POS_Z];
  let mut combined = 0u8;
  for side in sides {
    assert_eq!(combined & side, 0, "side {:#x} overlaps", side);
    combined |= side;
  }
  assert_eq!(combined, SIDES_ALL);
}

/// Visited bit does not collide with axis bits.
#[test]
fn test_visited_bit_is_separate() {
  assert_eq!(FLAG_VISITED & FLAG_ALL_AXES, 0);
}

/// World positions round to the nearest node, halves away from zero.
#[test]
fn test_world_to_node_rounding() {
  assert_eq!(world_to_node(Vec3::ZERO), IVec3::ZERO);
  assert_eq!(world_to_node(Vec3::new(4.9, 5.0, 15.1)), IVec3::new(0, 1, 2));
  assert_eq!(world_to_node(Vec3::new(-4.9, -5.0, -15.1)), IVec3::new(0, -1, -2));
}

/// Node to block conversion floors toward negative infinity.
#[test]
fn test_node_to_block_floors() {
  assert_eq!(node_to_block(IVec3::new(0, 15, 16)), IVec3::new(0, 0, 1));
  assert_eq!(node_to_block(IVec3::new(-1, -16, -17)), IVec3::new(-1, -1, -2));
}

/// Block origin scales by the block size.
#[test]
fn test_block_to_node() {
  assert_eq!(block_to_node(IVec3::new(1, -2, 3)), IVec3::new(16, -32, 48));
  assert_eq!(node_to_world(IVec3::new(1, 0, -1)), Vec3::new(10.0, 0.0, -10.0));
}

/// Block origins at the edge of the grid do not wrap.
#[test]
fn test_block_origin_at_grid_edge() {
  let far = IVec3::splat(i32::MAX / MAP_BLOCKSIZE + 1);
  assert_eq!(
    block_to_node_wide(far),
    I64Vec3::splat((i32::MAX / MAP_BLOCKSIZE + 1) as i64 * 16)
  );
  assert!(block_to_node_wide(far).x > i32::MAX as i64);

  let near = IVec3::new(1, -2, 3);
  assert_eq!(block_to_world(near), node_to_world(block_to_node(near)));
  assert!(block_to_world(IVec3::splat(i32::MIN)).x < 0.0);
}
