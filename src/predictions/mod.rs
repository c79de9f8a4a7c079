//! Prediction game data: the season leaderboard fetched from the backend
//! and the player's own drag-ordered conference standings.
//!
//! Both live in WASM memory (thread_local) for the lifetime of the module.

pub mod leaderboard;
pub mod standings;
