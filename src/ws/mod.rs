//! WebSocket endpoints

pub mod hub;

pub use hub::{serve_simulation, SimulationHub, WsMessage};
