//! Tests for the loot tracker
//!
//! Covers admission/gating sequences, identifier correlation, zone resets,
//! and both evaluation paths (bulk sweep vs. single-item check).

use autoloot_types::{LootConfig, Template};

use crate::events::{GameEvent, GameId, LocationUpdate, Position};
use crate::tracker::{EventOutcome, LootTracker, TrackedDrop};

fn config_with_template(name: &str, whitelist: &[u32], blacklist: &[u32]) -> LootConfig {
    let mut config = LootConfig::default();
    config.templates.insert(
        name.to_string(),
        Template {
            whitelist: whitelist.to_vec(),
            blacklist: blacklist.to_vec(),
        },
    );
    config.template = name.to_string();
    config
}

/// Tracker that has logged in and landed in an instance zone, where the
/// default config allows looting.
fn ready_tracker(config: LootConfig) -> LootTracker {
    let mut tracker = LootTracker::new(Some(config));
    tracker.handle_event(&GameEvent::Login { game_id: GameId(1) });
    tracker.handle_event(&GameEvent::ZoneLoad {
        zone: 9500,
        loc: Position::default(),
    });
    tracker
}

fn spawn(id: u64, item: u32, x: f32) -> GameEvent {
    GameEvent::DropSpawn {
        drop_id: GameId(id),
        item,
        loc: Position::new(x, 0.0, 0.0),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Admission and tracking
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn admitted_drop_is_tracked_and_arms_scheduler() {
    let mut tracker = ready_tracker(LootConfig::default());

    let outcome = tracker.handle_event(&spawn(9, 5, 10.0));
    assert_eq!(outcome, EventOutcome::DropAdmitted);
    assert_eq!(tracker.drops().len(), 1);
    assert_eq!(tracker.drops()[0].id, GameId(9));
    assert_eq!(tracker.drops()[0].item, 5);
}

#[test]
fn drop_spawn_without_config_is_ignored() {
    let mut tracker = LootTracker::new(None);
    tracker.handle_event(&GameEvent::Login { game_id: GameId(1) });

    let outcome = tracker.handle_event(&spawn(9, 5, 10.0));
    assert_eq!(outcome, EventOutcome::Ignored);
    assert!(tracker.drops().is_empty());
}

#[test]
fn drop_spawn_before_login_is_ignored() {
    // No login means no bound template yet.
    let mut tracker = LootTracker::new(Some(LootConfig::default()));
    tracker.handle_event(&GameEvent::ZoneLoad {
        zone: 9500,
        loc: Position::default(),
    });

    assert_eq!(
        tracker.handle_event(&spawn(9, 5, 10.0)),
        EventOutcome::Ignored
    );
    assert!(tracker.drops().is_empty());
}

#[test]
fn unknown_active_template_disables_admission() {
    let mut config = LootConfig::default();
    config.template = "missing".to_string();
    let mut tracker = ready_tracker(config);

    assert_eq!(
        tracker.handle_event(&spawn(9, 5, 10.0)),
        EventOutcome::Ignored
    );
}

#[test]
fn respawned_id_replaces_stale_entry() {
    let mut tracker = ready_tracker(LootConfig::default());
    tracker.handle_event(&spawn(9, 5, 10.0));
    tracker.handle_event(&spawn(9, 5, 50.0));

    assert_eq!(tracker.drops().len(), 1);
    assert_eq!(tracker.drops()[0].position, Position::new(50.0, 0.0, 0.0));
}

#[test]
fn despawn_removes_only_matching_id() {
    let mut tracker = ready_tracker(LootConfig::default());
    tracker.handle_event(&spawn(9, 5, 10.0));
    tracker.handle_event(&spawn(10, 5, 20.0));

    tracker.handle_event(&GameEvent::DropDespawn { drop_id: GameId(9) });
    assert_eq!(tracker.drops().len(), 1);
    assert_eq!(tracker.drops()[0].id, GameId(10));

    // Despawn of an untracked id is a no-op.
    tracker.handle_event(&GameEvent::DropDespawn { drop_id: GameId(42) });
    assert_eq!(tracker.drops().len(), 1);
}

#[test]
fn zone_change_always_clears_drops() {
    let mut tracker = ready_tracker(LootConfig::default());
    tracker.handle_event(&spawn(9, 5, 10.0));
    tracker.handle_event(&spawn(10, 6, 20.0));

    tracker.handle_event(&GameEvent::ZoneLoad {
        zone: 9600,
        loc: Position::new(1.0, 2.0, 3.0),
    });
    assert!(tracker.drops().is_empty());
    assert_eq!(tracker.zone(), Some(9600));
    assert_eq!(tracker.position(), Position::new(1.0, 2.0, 3.0));

    // Idempotent on an already-empty collection.
    tracker.handle_event(&GameEvent::ZoneLoad {
        zone: 9600,
        loc: Position::default(),
    });
    assert!(tracker.drops().is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Zone gating
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn overworld_drops_ignored_while_overworld_disabled() {
    // Default config: overworld off, instance on.
    let mut tracker = LootTracker::new(Some(LootConfig::default()));
    tracker.handle_event(&GameEvent::Login { game_id: GameId(1) });
    tracker.handle_event(&GameEvent::ZoneLoad {
        zone: 100,
        loc: Position::default(),
    });

    assert_eq!(
        tracker.handle_event(&spawn(9, 5, 10.0)),
        EventOutcome::Ignored
    );
}

#[test]
fn overworld_drops_admitted_when_enabled() {
    let mut config = LootConfig::default();
    config.enabled.overworld = true;
    let mut tracker = LootTracker::new(Some(config));
    tracker.handle_event(&GameEvent::Login { game_id: GameId(1) });
    tracker.handle_event(&GameEvent::ZoneLoad {
        zone: 100,
        loc: Position::default(),
    });

    assert_eq!(
        tracker.handle_event(&spawn(9, 5, 10.0)),
        EventOutcome::DropAdmitted
    );
}

#[test]
fn instance_drops_ignored_while_instance_disabled() {
    let mut config = LootConfig::default();
    config.enabled.instance = false;
    let mut tracker = ready_tracker(config);

    assert_eq!(
        tracker.handle_event(&spawn(9, 5, 10.0)),
        EventOutcome::Ignored
    );
}

#[test]
fn unknown_zone_skips_gating() {
    // No zone load yet: neither gate applies, template still filters.
    let mut tracker = LootTracker::new(Some(LootConfig::default()));
    tracker.handle_event(&GameEvent::Login { game_id: GameId(1) });

    assert_eq!(
        tracker.handle_event(&spawn(9, 5, 10.0)),
        EventOutcome::DropAdmitted
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Template filtering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn whitelisted_kind_admitted_others_rejected() {
    let mut tracker = ready_tracker(config_with_template("picky", &[7], &[]));

    assert_eq!(
        tracker.handle_event(&spawn(9, 5, 10.0)),
        EventOutcome::Ignored
    );
    assert_eq!(
        tracker.handle_event(&spawn(10, 7, 10.0)),
        EventOutcome::DropAdmitted
    );
    assert_eq!(tracker.drops().len(), 1);
}

#[test]
fn whitelist_overrides_blacklist() {
    // Kind 7 is on both lists: whitelist wins, so it is admitted. Kind 5
    // is only blacklisted, but with a non-empty whitelist the blacklist is
    // never consulted and 5 is rejected by the whitelist rule alone.
    let mut tracker = ready_tracker(config_with_template("both", &[7], &[5, 7]));

    assert_eq!(
        tracker.handle_event(&spawn(9, 7, 10.0)),
        EventOutcome::DropAdmitted
    );
    assert_eq!(
        tracker.handle_event(&spawn(10, 5, 10.0)),
        EventOutcome::Ignored
    );
}

#[test]
fn template_switch_rebinds_filter() {
    let mut config = config_with_template("picky", &[7], &[]);
    config
        .templates
        .insert("open".to_string(), Template::default());
    let mut tracker = ready_tracker(config);

    assert_eq!(
        tracker.handle_event(&spawn(9, 5, 10.0)),
        EventOutcome::Ignored
    );

    assert!(tracker.set_active_template("open"));
    assert_eq!(
        tracker.handle_event(&spawn(9, 5, 10.0)),
        EventOutcome::DropAdmitted
    );

    assert!(!tracker.set_active_template("nonexistent"));
}

#[test]
fn config_reload_rebinds_template() {
    let mut tracker = ready_tracker(LootConfig::default());
    assert_eq!(
        tracker.handle_event(&spawn(9, 5, 10.0)),
        EventOutcome::DropAdmitted
    );

    tracker.update_config(config_with_template("picky", &[7], &[]));
    assert_eq!(
        tracker.handle_event(&spawn(10, 5, 10.0)),
        EventOutcome::Ignored
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Observer correlation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn mount_events_require_matching_game_id() {
    let mut tracker = ready_tracker(LootConfig::default());

    tracker.handle_event(&GameEvent::Mount {
        game_id: GameId(99),
        mounted: true,
    });
    assert!(!tracker.is_mounted());

    tracker.handle_event(&GameEvent::Mount {
        game_id: GameId(1),
        mounted: true,
    });
    assert!(tracker.is_mounted());

    tracker.handle_event(&GameEvent::Unmount { game_id: GameId(99) });
    assert!(tracker.is_mounted());

    tracker.handle_event(&GameEvent::Unmount { game_id: GameId(1) });
    assert!(!tracker.is_mounted());
}

#[test]
fn life_state_requires_matching_game_id() {
    let mut tracker = ready_tracker(LootConfig::default());

    tracker.handle_event(&GameEvent::LifeState {
        game_id: GameId(99),
        alive: false,
    });
    assert!(!tracker.is_dead());

    tracker.handle_event(&GameEvent::LifeState {
        game_id: GameId(1),
        alive: false,
    });
    assert!(tracker.is_dead());
}

#[test]
fn mount_before_login_is_ignored() {
    let mut tracker = LootTracker::new(Some(LootConfig::default()));
    tracker.handle_event(&GameEvent::Mount {
        game_id: GameId(1),
        mounted: true,
    });
    assert!(!tracker.is_mounted());
}

#[test]
fn self_spawn_needs_no_id_correlation() {
    let mut tracker = LootTracker::new(Some(LootConfig::default()));

    tracker.handle_event(&GameEvent::SelfSpawn {
        loc: Position::new(5.0, 6.0, 7.0),
        alive: false,
    });
    assert!(tracker.is_dead());
    assert_eq!(tracker.position(), Position::new(5.0, 6.0, 7.0));

    tracker.handle_event(&GameEvent::SelfSpawn {
        loc: Position::default(),
        alive: true,
    });
    assert!(!tracker.is_dead());
}

#[test]
fn location_updates_merge_partially() {
    let mut tracker = ready_tracker(LootConfig::default());
    tracker.handle_event(&GameEvent::SelfSpawn {
        loc: Position::new(1.0, 2.0, 3.0),
        alive: true,
    });

    tracker.handle_event(&GameEvent::LocationUpdate {
        loc: LocationUpdate {
            x: None,
            y: Some(20.0),
            z: None,
        },
    });
    assert_eq!(tracker.position(), Position::new(1.0, 20.0, 3.0));
}

// ─────────────────────────────────────────────────────────────────────────────
// Sweep vs. single-item evaluation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn sweep_requests_only_in_range_drops() {
    let mut tracker = ready_tracker(LootConfig::default());
    tracker.handle_event(&spawn(9, 5, 10.0));
    tracker.handle_event(&spawn(10, 5, 150.0)); // exactly on the boundary
    tracker.handle_event(&spawn(11, 5, 200.0)); // out of range

    let outcome = tracker.sweep();
    assert_eq!(outcome.requests, vec![GameId(9), GameId(10)]);
    assert!(outcome.rearm);
}

#[test]
fn sweep_with_no_drops_goes_idle() {
    let tracker = ready_tracker(LootConfig::default());
    let outcome = tracker.sweep();
    assert!(outcome.requests.is_empty());
    assert!(!outcome.rearm);
}

#[test]
fn sweep_rearms_even_with_nothing_in_range() {
    let mut tracker = ready_tracker(LootConfig::default());
    tracker.handle_event(&spawn(9, 5, 500.0));

    let outcome = tracker.sweep();
    assert!(outcome.requests.is_empty());
    assert!(outcome.rearm);
}

#[test]
fn sweep_ignores_mounted_and_dead_state() {
    let mut tracker = ready_tracker(LootConfig::default());
    tracker.handle_event(&spawn(9, 5, 10.0));
    tracker.handle_event(&GameEvent::Mount {
        game_id: GameId(1),
        mounted: true,
    });
    tracker.handle_event(&GameEvent::LifeState {
        game_id: GameId(1),
        alive: false,
    });

    assert_eq!(tracker.sweep().requests, vec![GameId(9)]);
}

#[test]
fn try_loot_enforces_mounted_and_dead_guards() {
    let mut tracker = ready_tracker(LootConfig::default());
    let drop = TrackedDrop {
        id: GameId(9),
        item: 5,
        position: Position::new(10.0, 0.0, 0.0),
    };

    assert!(tracker.try_loot(&drop));

    tracker.handle_event(&GameEvent::Mount {
        game_id: GameId(1),
        mounted: true,
    });
    assert!(!tracker.try_loot(&drop));
    tracker.handle_event(&GameEvent::Unmount { game_id: GameId(1) });

    tracker.handle_event(&GameEvent::LifeState {
        game_id: GameId(1),
        alive: false,
    });
    assert!(!tracker.try_loot(&drop));
}

#[test]
fn try_loot_clamps_radius_to_150() {
    let mut config = LootConfig::default();
    config.loot_range = 400.0;
    let mut tracker = ready_tracker(config);

    let near = TrackedDrop {
        id: GameId(9),
        item: 5,
        position: Position::new(150.0, 0.0, 0.0),
    };
    let far = TrackedDrop {
        id: GameId(10),
        item: 5,
        position: Position::new(300.0, 0.0, 0.0),
    };

    // The sweep honors the raw configured radius; the single-item path
    // clamps it to 150.
    tracker.handle_event(&spawn(10, 5, 300.0));
    assert_eq!(tracker.sweep().requests, vec![GameId(10)]);
    assert!(tracker.try_loot(&near));
    assert!(!tracker.try_loot(&far));
}
