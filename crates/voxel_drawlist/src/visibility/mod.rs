//! Visibility traversal: flag store, face rules and the breadth-first walk.

pub mod faces;
pub mod flags;
pub mod traversal;

pub use flags::VisibilityFlags;
pub use traversal::{traverse, Traversal, TraversalStats};
