mod config;

pub use config::{
    DEFAULT_LOOT_INTERVAL_MS, DEFAULT_LOOT_RANGE, DEFAULT_TEMPLATE, EnabledZones, LootConfig,
    Template,
};
