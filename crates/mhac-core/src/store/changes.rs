// ── Change detection ──
//
// Compares `current` against `previous` and brings `previous` up to date
// for every attribute it reports.

use super::StateStore;
use crate::model::AttributeChange;

impl StateStore {
    /// Every attribute whose current value differs from (or is missing
    /// in) the previous snapshot, in current-snapshot order.
    ///
    /// Running this twice without an intervening mutation returns
    /// nothing the second time.
    #[allow(clippy::float_cmp)]
    pub(crate) fn detect_changes(&mut self) -> Vec<AttributeChange> {
        let mut changes = Vec::new();
        for (attribute, new) in self.current.iter() {
            let old = self.previous.get(attribute);
            if old != Some(new) {
                self.previous.insert(attribute, new);
                changes.push(AttributeChange { attribute, old, new });
            }
        }
        changes
    }
}
