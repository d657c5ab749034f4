// ── Domain model ──
//
// Named attributes, the snapshot they live in, and the events emitted
// when their values move.

mod attribute;
mod event;
mod snapshot;

pub use attribute::{Attribute, OperatingMode};
pub use event::{AttributeChange, DeviceEvent};
pub use snapshot::Snapshot;
