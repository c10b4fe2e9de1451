//! Graph building stages.
//!
//! Control flow: [`registry`] turns catalog entries into master/source pairs, [`compiler`]
//! turns each track into a filler/source-clip sequence, [`assemble`] attaches the sequences to
//! a single composition, and [`validate`] checks the result before [`pipeline`] commits it.

pub mod assemble;
pub mod compiler;
pub mod options;
pub mod pipeline;
pub mod registry;
pub mod validate;
