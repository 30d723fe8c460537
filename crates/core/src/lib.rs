//! Bondsite Core - dataset discovery and the dataset refresh cache.
//!
//! This crate keeps a local copy of the published retail bond dataset fresh
//! and hands out a ready-to-use [`BondMaker`](bondsite_bonds::BondMaker)
//! built from it. Discovery and download sit behind traits so the cache can
//! be driven by fakes in tests.

pub mod constants;
pub mod dataset;
pub mod errors;
pub mod providers;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
