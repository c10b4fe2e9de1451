//! Persistence side of the graph: the mob object model and the stores that hold it.
//!
//! The builder talks to [`backend::MobStore`] only. [`memory::MemoryStore`] backs tests and dry
//! runs; [`json::JsonContainer`] persists a snapshot file and supports in-place updates.

pub mod backend;
pub mod json;
pub mod memory;
pub mod model;
