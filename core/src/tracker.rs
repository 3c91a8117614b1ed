//! Observer and drop-item state tracking.
//!
//! The tracker owns all mutable loot state: the observer's position and
//! flags, the live set of tracked drops, and the active config/template
//! snapshot. It is mutated exclusively by inbound [`GameEvent`]s plus the
//! explicit config refresh calls; the service loop serializes every
//! mutation on a single task, so no locking happens here.

use autoloot_types::{DEFAULT_LOOT_INTERVAL_MS, LootConfig, Template};
use std::time::Duration;

use crate::events::{GameEvent, GameId, Position};
use crate::filter;
use crate::geometry;

/// Zone ids at or above this value denote instanced content by convention.
pub const INSTANCE_ZONE_MIN: i32 = 9000;

/// Hard ceiling on the single-item pickup range, regardless of the
/// configured sweep radius.
pub const SINGLE_LOOT_MAX_RANGE: f32 = 150.0;

/// A lootable item currently visible in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedDrop {
    pub id: GameId,
    pub item: u32,
    pub position: Position,
}

/// What the caller should do after the tracker ingested an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// State may have changed, but the scheduler has nothing new to do.
    Ignored,
    /// A drop passed admission; the loot scheduler must be armed.
    DropAdmitted,
}

/// Result of one bulk sweep over the tracked drops.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Ids of drops within the configured radius, in tracking order.
    pub requests: Vec<GameId>,
    /// Whether any drops remain tracked and the scheduler should re-arm.
    pub rearm: bool,
}

/// Event-driven state tracker for the loot agent.
#[derive(Debug, Default)]
pub struct LootTracker {
    game_id: Option<GameId>,
    zone: Option<i32>,
    is_mounted: bool,
    is_dead: bool,
    position: Position,
    drops: Vec<TrackedDrop>,
    config: Option<LootConfig>,
    template: Option<Template>,
}

impl LootTracker {
    pub fn new(config: Option<LootConfig>) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Ingest one inbound event. Never fails: irrelevant or premature
    /// events degrade to no-ops.
    pub fn handle_event(&mut self, event: &GameEvent) -> EventOutcome {
        match event {
            GameEvent::Login { game_id } => self.on_login(*game_id),
            GameEvent::LocationUpdate { loc } => self.position.merge(loc),
            GameEvent::DropSpawn { drop_id, item, loc } => {
                return self.on_drop_spawn(*drop_id, *item, *loc);
            }
            GameEvent::DropDespawn { drop_id } => self.on_drop_despawn(*drop_id),
            GameEvent::ZoneLoad { zone, loc } => self.on_zone_load(*zone, *loc),
            GameEvent::Mount { game_id, mounted } => self.on_mount(*game_id, *mounted),
            GameEvent::Unmount { game_id } => self.on_mount(*game_id, false),
            GameEvent::LifeState { game_id, alive } => self.on_life_state(*game_id, *alive),
            GameEvent::SelfSpawn { loc, alive } => self.on_self_spawn(*loc, *alive),
        }
        EventOutcome::Ignored
    }

    /// Replace the config snapshot, e.g. after the persistence layer
    /// reloaded the file. Re-resolves the active template when an observer
    /// is already logged in.
    pub fn update_config(&mut self, config: LootConfig) {
        self.config = Some(config);
        if self.game_id.is_some() {
            self.bind_template();
        }
    }

    /// Switch the active template by name. Returns false when the name is
    /// unknown in the current config; the tracker state is untouched then.
    pub fn set_active_template(&mut self, name: &str) -> bool {
        let Some(config) = self.config.as_mut() else {
            return false;
        };
        if !config.templates.contains_key(name) {
            return false;
        }
        config.template = name.to_string();
        self.bind_template();
        true
    }

    fn on_login(&mut self, game_id: GameId) {
        tracing::debug!(%game_id, "observer logged in");
        self.game_id = Some(game_id);
        self.bind_template();
    }

    /// Resolve the active template from the current config snapshot. With
    /// no config loaded yet, fall back to the built-in unfiltered template.
    fn bind_template(&mut self) {
        self.template = match &self.config {
            Some(config) => config.active_template().cloned(),
            None => Some(Template::default()),
        };
    }

    fn on_zone_load(&mut self, zone: i32, loc: Position) {
        tracing::debug!(zone, dropped = self.drops.len(), "zone loaded");
        self.zone = Some(zone);
        self.position = loc;
        self.drops.clear();
    }

    fn on_mount(&mut self, game_id: GameId, mounted: bool) {
        if self.game_id == Some(game_id) {
            self.is_mounted = mounted;
        }
    }

    fn on_life_state(&mut self, game_id: GameId, alive: bool) {
        if self.game_id == Some(game_id) {
            self.is_dead = !alive;
        }
    }

    fn on_self_spawn(&mut self, loc: Position, alive: bool) {
        self.position = loc;
        self.is_dead = !alive;
    }

    fn on_drop_spawn(&mut self, drop_id: GameId, item: u32, loc: Position) -> EventOutcome {
        // Without a config snapshot and a bound template the agent is not
        // ready to loot; ignore the spawn entirely.
        let (Some(config), Some(template)) = (&self.config, &self.template) else {
            return EventOutcome::Ignored;
        };

        if let Some(zone) = self.zone {
            if zone < INSTANCE_ZONE_MIN && !config.enabled.overworld {
                return EventOutcome::Ignored;
            }
            if zone >= INSTANCE_ZONE_MIN && !config.enabled.instance {
                return EventOutcome::Ignored;
            }
        }

        if !filter::admit(template, item) {
            return EventOutcome::Ignored;
        }

        // At most one entry per id: a respawn with a known id replaces the
        // stale entry instead of duplicating it.
        self.drops.retain(|d| d.id != drop_id);
        self.drops.push(TrackedDrop {
            id: drop_id,
            item,
            position: loc,
        });
        tracing::debug!(%drop_id, item, tracked = self.drops.len(), "drop admitted");
        EventOutcome::DropAdmitted
    }

    fn on_drop_despawn(&mut self, drop_id: GameId) {
        self.drops.retain(|d| d.id != drop_id);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Evaluation paths
    // ─────────────────────────────────────────────────────────────────────

    /// Bulk timer sweep: every tracked drop within the raw configured
    /// radius yields a pickup request. Mount/death state is deliberately
    /// not consulted here; only the single-item path enforces it.
    pub fn sweep(&self) -> SweepOutcome {
        if self.drops.is_empty() {
            return SweepOutcome::default();
        }
        let Some(config) = &self.config else {
            // Drops are only ever admitted with a config present, so this
            // is unreachable in practice; stay idle rather than panic.
            return SweepOutcome::default();
        };

        let requests = self
            .drops
            .iter()
            .filter(|d| geometry::in_range(d.position, self.position, config.loot_range))
            .map(|d| d.id)
            .collect();

        SweepOutcome {
            requests,
            rearm: true,
        }
    }

    /// Single-item pickup check, for direct invocation outside the timer
    /// sweep. Stricter than the sweep: the radius is clamped to
    /// [`SINGLE_LOOT_MAX_RANGE`] and a mounted or dead observer never
    /// loots.
    pub fn try_loot(&self, drop: &TrackedDrop) -> bool {
        let Some(config) = &self.config else {
            return false;
        };
        let radius = config.loot_range.min(SINGLE_LOOT_MAX_RANGE);
        geometry::in_range(drop.position, self.position, radius)
            && !self.is_mounted
            && !self.is_dead
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn game_id(&self) -> Option<GameId> {
        self.game_id
    }

    pub fn zone(&self) -> Option<i32> {
        self.zone
    }

    pub fn is_mounted(&self) -> bool {
        self.is_mounted
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn drops(&self) -> &[TrackedDrop] {
        &self.drops
    }

    pub fn find_drop(&self, drop_id: GameId) -> Option<&TrackedDrop> {
        self.drops.iter().find(|d| d.id == drop_id)
    }

    pub fn config(&self) -> Option<&LootConfig> {
        self.config.as_ref()
    }

    pub fn active_template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    /// Scheduler re-arm delay from the current config.
    pub fn loot_interval(&self) -> Duration {
        let millis = self
            .config
            .as_ref()
            .map(|c| c.loot_interval)
            .unwrap_or(DEFAULT_LOOT_INTERVAL_MS);
        Duration::from_millis(millis)
    }
}
