use serde::Serialize;

use super::Attribute;

/// One attribute moving from `old` to `new`.
///
/// `old` is `None` the first time an attribute is seen after start-up or
/// after a reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeChange {
    pub attribute: Attribute,
    pub old: Option<f64>,
    pub new: f64,
}

/// Notification published by a synchronizing device.
///
/// Every batch of [`Changed`](Self::Changed) events is followed by exactly
/// one [`Updated`](Self::Updated). A pass that finds nothing emits nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeviceEvent {
    Changed(AttributeChange),
    Updated,
}
