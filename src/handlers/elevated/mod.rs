// handlers/elevated/mod.rs - Administrative handlers
//
// Route Prefix: /api/root/*
// Bootstrap runs out of band: from the CLI, from this tier, or at server start.

pub mod root;

pub use root::*;
