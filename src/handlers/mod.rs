// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no session) → Protected (data entry and reporting) → Elevated (bootstrap)
//
// Every handler takes the shared `Tracker` through `Extension` and returns
// the operation's result object as JSON with status 200. Malformed input is
// rejected by the validated extractors in `crate::error`.
pub mod public;    // Tier 1: /, /health, /auth/login
pub mod protected; // Tier 2: /api/data/*, /api/records/*
pub mod elevated;  // Tier 3: /api/root/*
