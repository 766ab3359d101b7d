//! In-memory block store and the channel that feeds it.
//!
//! Blocks are built on worker threads (loading, deserialising, meshing) and
//! published to the render thread through a bounded channel. The render
//! thread drains the channel once per frame into a [`BlockMap`], which the
//! traversal then reads without locking.
//!
//! ```text
//!   worker ──try_send──┐
//!   worker ──try_send──┼──► bounded(cap) ──drain_into──► BlockMap ──► traverse
//!   worker ──try_send──┘
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use glam::IVec3;
use thiserror::Error;

use crate::block::{BlockRef, BlockSource, MapBlock};
use crate::constants::node_to_block;

/// Default number of blocks that may wait in the handoff channel.
pub const DEFAULT_HANDOFF_CAPACITY: usize = 256;

// =============================================================================
// BlockMap
// =============================================================================

/// Resident blocks keyed by grid position.
pub struct BlockMap<B> {
  blocks: HashMap<IVec3, BlockRef<B>>,
  solid_nodes: HashSet<IVec3>,
}

impl<B> BlockMap<B> {
  pub fn new() -> Self {
    Self {
      blocks: HashMap::new(),
      solid_nodes: HashSet::new(),
    }
  }

  /// Insert or replace a block. Returns the replaced block.
  ///
  /// A replaced block stays alive while a draw list still holds it.
  pub fn insert(&mut self, pos: IVec3, block: impl Into<BlockRef<B>>) -> Option<BlockRef<B>> {
    self.blocks.insert(pos, block.into())
  }

  pub fn remove(&mut self, pos: IVec3) -> Option<BlockRef<B>> {
    self.blocks.remove(&pos)
  }

  pub fn get(&self, pos: IVec3) -> Option<&BlockRef<B>> {
    self.blocks.get(&pos)
  }

  pub fn contains(&self, pos: IVec3) -> bool {
    self.blocks.contains_key(&pos)
  }

  pub fn len(&self) -> usize {
    self.blocks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }

  pub fn positions(&self) -> impl Iterator<Item = IVec3> + '_ {
    self.blocks.keys().copied()
  }

  /// Mark a node of a resident block as solid for the camera-inside-terrain
  /// check. Nodes of blocks that are not resident always count as solid.
  pub fn set_solid_node(&mut self, node_pos: IVec3, solid: bool) {
    if solid {
      self.solid_nodes.insert(node_pos);
    } else {
      self.solid_nodes.remove(&node_pos);
    }
  }

  pub fn clear(&mut self) {
    self.blocks.clear();
    self.solid_nodes.clear();
  }
}

impl<B> Default for BlockMap<B> {
  fn default() -> Self {
    Self::new()
  }
}

impl<B: MapBlock> BlockSource for BlockMap<B> {
  type Block = B;

  fn get_block(&self, pos: IVec3) -> Option<BlockRef<B>> {
    self.blocks.get(&pos).map(Arc::clone)
  }

  fn is_solid_node(&self, node_pos: IVec3) -> bool {
    !self.blocks.contains_key(&node_to_block(node_pos)) || self.solid_nodes.contains(&node_pos)
  }
}

// =============================================================================
// Handoff
// =============================================================================

/// Failure to publish a block.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HandoffError {
  #[error("block handoff channel is full")]
  Full,

  #[error("block handoff receiver was dropped")]
  Disconnected,
}

/// Producer side of the handoff. Cheap to clone, one per worker.
pub struct BlockSender<B> {
  tx: Sender<(IVec3, BlockRef<B>)>,
}

impl<B> Clone for BlockSender<B> {
  fn clone(&self) -> Self {
    Self {
      tx: self.tx.clone(),
    }
  }
}

impl<B> BlockSender<B> {
  /// Publish a finished block without blocking.
  ///
  /// On `Full` the block is dropped; the producer should retry later.
  pub fn try_send(&self, pos: IVec3, block: impl Into<BlockRef<B>>) -> Result<(), HandoffError> {
    self.tx.try_send((pos, block.into())).map_err(|err| match err {
      TrySendError::Full(_) => HandoffError::Full,
      TrySendError::Disconnected(_) => HandoffError::Disconnected,
    })
  }
}

/// Render thread side of the handoff.
pub struct BlockHandoff<B> {
  tx: Sender<(IVec3, BlockRef<B>)>,
  rx: Receiver<(IVec3, BlockRef<B>)>,
}

impl<B> BlockHandoff<B> {
  /// Bounded channel holding at most `capacity` blocks in flight.
  pub fn new(capacity: usize) -> Self {
    // Bounded so a stalled render thread cannot grow memory without limit.
    let (tx, rx) = bounded(capacity.max(1));
    Self { tx, rx }
  }

  /// New producer handle.
  pub fn sender(&self) -> BlockSender<B> {
    BlockSender {
      tx: self.tx.clone(),
    }
  }

  /// Blocks currently waiting.
  pub fn pending(&self) -> usize {
    self.rx.len()
  }

  /// Move every waiting block into `map`, replacing older versions.
  ///
  /// Returns the number of blocks received. Never blocks.
  pub fn drain_into(&self, map: &mut BlockMap<B>) -> usize {
    let mut received = 0;
    loop {
      match self.rx.try_recv() {
        Ok((pos, block)) => {
          map.insert(pos, block);
          received += 1;
        }
        Err(TryRecvError::Empty) => break,
        // Unreachable while `self.tx` is alive.
        Err(TryRecvError::Disconnected) => break,
      }
    }
    if received > 0 {
      tracing::trace!(received, "blocks handed off");
    }
    received
  }
}

impl<B> Default for BlockHandoff<B> {
  fn default() -> Self {
    Self::new(DEFAULT_HANDOFF_CAPACITY)
  }
}

#[cfg(test)]
#[path = "block_map_test.rs"]
mod block_map_test;
