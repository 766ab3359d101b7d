//! Benchmarks for the visibility traversal.
//!
//! Three world shapes around a camera at the origin:
//! - open field: every block meshed and see-through
//! - corridor: solid rock with a single tunnel along Z
//! - grouped: the open field drawn through 2³ mesh cells

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::{IVec3, Vec3};
use voxel_drawlist::{
  BlockMap, DrawControl, DrawList, MapBlock, MeshBounds, NoFrustumCulling, NoOcclusion, BS,
};

const FIELD_RADIUS: i32 = 8;

struct BenchBlock {
  solid_sides: u8,
}

impl MapBlock for BenchBlock {
  fn mesh_bounds(&self) -> Option<MeshBounds> {
    Some(MeshBounds::new(Vec3::splat(7.5 * BS), 139.2))
  }

  fn solid_sides(&self) -> u8 {
    self.solid_sides
  }
}

fn build_world(radius: i32, solid: impl Fn(IVec3) -> bool) -> BlockMap<BenchBlock> {
  let mut map: BlockMap<BenchBlock> = BlockMap::new();
  for z in -radius..radius {
    for y in -radius..radius {
      for x in -radius..radius {
        let pos = IVec3::new(x, y, z);
        let solid_sides = if solid(pos) { 0x3F } else { 0 };
        map.insert(pos, BenchBlock { solid_sides });
      }
    }
  }
  map
}

fn camera() -> Vec3 {
  Vec3::splat(8.0 * BS)
}

// ============================================================================
// Benchmarks
// ============================================================================

/// Open field at increasing view distances.
fn bench_open_field(c: &mut Criterion) {
  let world = build_world(FIELD_RADIUS, |_| false);
  let mut group = c.benchmark_group("traverse_open_field");

  for range in [32.0f32, 64.0, 128.0] {
    let control = DrawControl {
      wanted_range: range,
      ..Default::default()
    };
    let mut list = DrawList::new();
    if let Ok(stats) = list.update(camera(), &control, &world, &NoFrustumCulling, &NoOcclusion) {
      group.throughput(Throughput::Elements(stats.blocks_visited as u64));
    }

    group.bench_with_input(BenchmarkId::from_parameter(range), &control, |b, control| {
      b.iter(|| {
        let stats = list.update(camera(), control, &world, &NoFrustumCulling, &NoOcclusion);
        black_box(stats)
      })
    });
  }

  group.finish();
}

/// Solid sides prune almost everything except the tunnel.
fn bench_corridor(c: &mut Criterion) {
  let world = build_world(FIELD_RADIUS, |pos| pos.x != 0 || pos.y != 0);
  let control = DrawControl {
    range_all: true,
    loaded_range: 128.0,
    ..Default::default()
  };
  let mut list = DrawList::new();

  c.bench_function("traverse_corridor", |b| {
    b.iter(|| {
      let stats = list.update(camera(), &control, &world, &NoFrustumCulling, &NoOcclusion);
      black_box(stats)
    })
  });
}

/// Mesh grouping at increasing cell sizes.
fn bench_grouped(c: &mut Criterion) {
  let world = build_world(FIELD_RADIUS, |_| false);
  let mut group = c.benchmark_group("traverse_grouped");

  for cell_size in [1u16, 2, 4] {
    let control = DrawControl {
      wanted_range: 128.0,
      cell_size,
      ..Default::default()
    };
    let mut list = DrawList::new();

    group.bench_with_input(BenchmarkId::from_parameter(cell_size), &control, |b, control| {
      b.iter(|| {
        let stats = list.update(camera(), control, &world, &NoFrustumCulling, &NoOcclusion);
        black_box(stats)
      })
    });
  }

  group.finish();
}

criterion_group!(benches, bench_open_field, bench_corridor, bench_grouped);
criterion_main!(benches);
