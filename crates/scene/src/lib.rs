//! Headless scene of moving rectangles indexed by a quadtree.
//!
//! Every tick the objects move, the index is cleared and refilled, and an
//! optional camera viewport queries it.

pub mod camera;
pub mod config;
pub mod error;
pub mod motion;
pub mod object;
pub mod sim;
pub mod world;

// Re-export commonly used types
pub use config::Config;
pub use error::SceneError;
pub use sim::{run, Simulation, TickReport};
pub use world::World;
