pub mod config;
pub mod events;
pub mod filter;
pub mod geometry;
pub mod scheduler;
pub mod service;
pub mod tracker;

#[cfg(test)]
mod tracker_tests;

// Re-exports for convenience
pub use events::{GameEvent, GameId, LocationUpdate, Position};
pub use service::{LootService, PickupRequest, ServiceHandle, ServiceStatus};
pub use tracker::{LootTracker, TrackedDrop};
