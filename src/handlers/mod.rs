//! Request handlers module

pub mod config;
pub mod data;
pub mod page;
