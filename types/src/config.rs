//! Loot configuration types
//!
//! These types describe the on-disk `config.json` format and are shared
//! between the core service and the command surface. Field names keep the
//! original camelCase wire format so existing config files stay readable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Name of the template every fresh config starts with.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Default sweep radius in world units.
pub const DEFAULT_LOOT_RANGE: f32 = 150.0;

/// Default scheduler re-arm delay in milliseconds.
pub const DEFAULT_LOOT_INTERVAL_MS: u64 = 300;

/// A named whitelist/blacklist pair controlling which item kinds are
/// eligible for automatic pickup.
///
/// A non-empty whitelist is authoritative and the blacklist is ignored
/// entirely. With an empty whitelist, a non-empty blacklist excludes its
/// kinds. Both empty admits everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    pub whitelist: Vec<u32>,
    pub blacklist: Vec<u32>,
}

impl Template {
    /// True when neither list constrains admission.
    pub fn is_unfiltered(&self) -> bool {
        self.whitelist.is_empty() && self.blacklist.is_empty()
    }
}

/// Per-zone-class looting gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnabledZones {
    pub overworld: bool,
    pub instance: bool,
}

impl Default for EnabledZones {
    fn default() -> Self {
        Self {
            overworld: false,
            instance: true,
        }
    }
}

/// Complete loot configuration as persisted to `config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LootConfig {
    pub enabled: EnabledZones,
    pub loot_range: f32,
    pub loot_interval: u64,
    /// Name of the active template. Must refer to an entry in `templates`.
    pub template: String,
    pub templates: HashMap<String, Template>,
}

impl Default for LootConfig {
    fn default() -> Self {
        let mut templates = HashMap::new();
        templates.insert(DEFAULT_TEMPLATE.to_string(), Template::default());
        Self {
            enabled: EnabledZones::default(),
            loot_range: DEFAULT_LOOT_RANGE,
            loot_interval: DEFAULT_LOOT_INTERVAL_MS,
            template: DEFAULT_TEMPLATE.to_string(),
            templates,
        }
    }
}

impl LootConfig {
    /// Resolve the currently selected template, if it exists.
    pub fn active_template(&self) -> Option<&Template> {
        self.templates.get(&self.template)
    }

    /// Sorted list of available template names.
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }
}
