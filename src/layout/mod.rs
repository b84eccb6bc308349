//! Chart layouts
//!
//! `tree` places a hierarchy on a rectangle, `force` relaxes the staff network
//! with a d3-style force simulation.

pub mod force;
pub mod tree;

pub use force::{ForceParams, Frame, Simulation};
pub use tree::{layout_tree, TreeLayout};
