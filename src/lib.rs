//! Orgviz - organization structure visualization
//!
//! Builds legal-entity, location and division hierarchies, the staff network
//! of functional relations and its adjacency matrix from an in-memory
//! snapshot, and serves them as tree, force-directed and matrix charts.

pub mod config;
pub mod detail;
pub mod entity;
pub mod error;
pub mod fixture;
pub mod handlers;
pub mod hierarchy;
pub mod layout;
pub mod network;
pub mod render;
pub mod routes;
pub mod state;
pub mod view;
pub mod ws;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
