//! Template admission rules for drop items.

use autoloot_types::Template;

/// Decide whether an item kind is eligible under the given template.
///
/// Precedence, first matching rule wins:
/// 1. Non-empty whitelist: admit iff the kind is listed. The blacklist is
///    never consulted in this branch, even when non-empty.
/// 2. Non-empty blacklist: admit iff the kind is not listed.
/// 3. Both empty: admit everything.
pub fn admit(template: &Template, kind: u32) -> bool {
    if !template.whitelist.is_empty() {
        template.whitelist.contains(&kind)
    } else if !template.blacklist.is_empty() {
        !template.blacklist.contains(&kind)
    } else {
        true
    }
}
