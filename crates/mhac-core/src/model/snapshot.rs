use indexmap::IndexMap;
use serde::Serialize;

use super::Attribute;

/// Mapping from attribute to decoded value.
///
/// Insertion order follows the order readings arrived in, which keeps
/// change notifications and printed tables stable between polls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: IndexMap<Attribute, f64>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attribute: Attribute) -> Option<f64> {
        self.values.get(&attribute).copied()
    }

    /// Store `value`, returning the value it replaced.
    pub fn insert(&mut self, attribute: Attribute, value: f64) -> Option<f64> {
        self.values.insert(attribute, value)
    }

    pub fn contains(&self, attribute: Attribute) -> bool {
        self.values.contains_key(&attribute)
    }

    /// A snapshot is valid once the power attribute has been read.
    pub fn is_valid(&self) -> bool {
        self.contains(Attribute::Active)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, f64)> + '_ {
        self.values.iter().map(|(attribute, value)| (*attribute, *value))
    }
}

impl FromIterator<(Attribute, f64)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (Attribute, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_follows_the_power_attribute() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(Attribute::Setpoint, 22.0);
        assert!(!snapshot.is_valid());

        snapshot.insert(Attribute::Active, 0.0);
        assert!(snapshot.is_valid());

        snapshot.clear();
        assert!(!snapshot.is_valid());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn insert_reports_replaced_value() {
        let mut snapshot = Snapshot::new();
        assert_eq!(snapshot.insert(Attribute::FanSpeed, 2.0), None);
        assert_eq!(snapshot.insert(Attribute::FanSpeed, 3.0), Some(2.0));
        assert_eq!(snapshot.get(Attribute::FanSpeed), Some(3.0));
        assert_eq!(snapshot.len(), 1);
    }
}
