//! Persistence layer: the `GameStore` seam, its backends and the records they hold.

/// `GameStore` trait with in-memory and MongoDB implementations.
pub mod game_store;
/// Rooms, players, teams, packs, questions, sessions, answers and lifelines.
pub mod models;
/// Backend-neutral storage errors and uniqueness constraints.
pub mod storage;
