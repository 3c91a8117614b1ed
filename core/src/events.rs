//! Inbound game events and the identifiers/positions they carry.
//!
//! Transports deliver entity identifiers in heterogeneous representations
//! (integers, strings, wrapped handles). Boundary adapters normalize them
//! into [`GameId`] once, so state-tracking code compares identifiers
//! exactly instead of coercing at every comparison site.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical identifier for world entities (the observer and drop items).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GameId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// A point in world coordinates. Defaults to the origin until the first
/// location-bearing event arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Apply a partial location update. Axes absent from the update keep
    /// their current value.
    pub fn merge(&mut self, update: &LocationUpdate) {
        if let Some(x) = update.x {
            self.x = x;
        }
        if let Some(y) = update.y {
            self.y = y;
        }
        if let Some(z) = update.z {
            self.z = z;
        }
    }
}

/// Partial position carried by player-movement events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationUpdate {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

/// Decoded game-world events consumed by the loot service.
///
/// One variant per subscribed event kind. The serde representation doubles
/// as the JSON-lines replay format used by the cli feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Observer logged in; assigns the observer identifier.
    Login { game_id: GameId },
    /// Observer moved; partial position update.
    LocationUpdate { loc: LocationUpdate },
    /// A lootable item appeared in the world.
    DropSpawn {
        drop_id: GameId,
        item: u32,
        loc: Position,
    },
    /// A lootable item disappeared (picked up or expired).
    DropDespawn { drop_id: GameId },
    /// World-area transition. Resets all tracked drops.
    ZoneLoad { zone: i32, loc: Position },
    Mount { game_id: GameId, mounted: bool },
    Unmount { game_id: GameId },
    LifeState { game_id: GameId, alive: bool },
    /// Observer spawned; inherently self-scoped, no id correlation.
    SelfSpawn { loc: Position, alive: bool },
}
