//! Draw list update statistics.
//!
//! Feature-gated and runtime-toggled. Without the `metrics` feature every
//! `record_*` call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use voxel_drawlist::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let avg = draw_list.metrics().avg_update_timing_us();
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

use crate::visibility::TraversalStats;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Fixed capacity history, oldest evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.capacity == 0 {
      return;
    }
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Iterate oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  /// Most recent value.
  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
  pub fn sum(&self) -> T {
    self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
  }
}

impl RollingWindow<u64> {
  /// Mean of the window, 0 when empty.
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.buffer.iter().min()?;
    let max = self.buffer.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128) // ~2 seconds at 60fps
  }
}

/// History of draw list updates.
#[derive(Debug, Clone)]
pub struct DrawListMetrics {
  /// Update wall time in microseconds.
  pub update_timings: RollingWindow<u64>,
  /// Blocks drawn per update.
  pub drawn_counts: RollingWindow<u64>,
  /// Blocks culled per update, all tests combined.
  pub culled_counts: RollingWindow<u64>,

  /// Stats of the most recent recorded update.
  pub last_stats: TraversalStats,
  /// Most recent update wall time in microseconds.
  pub last_update_us: u64,
  /// Updates recorded this session.
  pub total_updates: u64,
}

impl Default for DrawListMetrics {
  fn default() -> Self {
    Self {
      update_timings: RollingWindow::default(),
      drawn_counts: RollingWindow::default(),
      culled_counts: RollingWindow::default(),
      last_stats: TraversalStats::default(),
      last_update_us: 0,
      total_updates: 0,
    }
  }
}

impl DrawListMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear the windows. `total_updates` is cumulative and kept.
  pub fn reset(&mut self) {
    self.update_timings.clear();
    self.drawn_counts.clear();
    self.culled_counts.clear();
    self.last_stats = TraversalStats::default();
    self.last_update_us = 0;
  }

  /// Record one finished update.
  pub fn record_update(&mut self, timing_us: u64, stats: &TraversalStats) {
    if !is_enabled() {
      return;
    }
    self.update_timings.push(timing_us);
    self.drawn_counts.push(stats.drawn as u64);
    self.culled_counts.push(stats.total_culled() as u64);
    self.last_stats = *stats;
    self.last_update_us = timing_us;
    self.total_updates += 1;
  }

  pub fn avg_update_timing_us(&self) -> f64 {
    self.update_timings.average()
  }

  pub fn avg_drawn(&self) -> f64 {
    self.drawn_counts.average()
  }

  /// Fraction of processed blocks that were culled in the last update.
  pub fn last_cull_ratio(&self) -> f64 {
    if self.last_stats.blocks_visited == 0 {
      0.0
    } else {
      self.last_stats.total_culled() as f64 / self.last_stats.blocks_visited as f64
    }
  }
}
