//! Spatial indexing for scenes of moving rectangles.
//!
//! This crate contains:
//! - [`Rectangle`], a center-anchored axis-aligned box
//! - [`Bounded`], [`ObjectId`] and [`ObjectTable`] for the indexed objects
//! - [`QuadTree`], rebuilt every frame and queried by range

mod config;
mod node;
mod object;
mod rect;
mod tree;

pub use config::TreeConfig;
pub use node::{NodeId, TreeNode};
pub use object::{Bounded, ObjectId, ObjectTable};
pub use rect::Rectangle;
pub use tree::{LevelOrder, QueryBuffer, QuadTree, TreeStats};
