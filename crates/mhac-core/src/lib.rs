//! Synchronization core for Intesis MH-AC-WIFI-1 climate units.
//!
//! Sits between the `/api.cgi` client in `mhac-api` and consumers such as
//! the `mhac` CLI:
//!
//! - **[`Device`]** is the consumer-facing handle.
//!   [`start_synchronization()`](Device::start_synchronization) spawns a
//!   single background task that owns the session and polls the unit.
//!   Reads go through [`Device::get()`], writes through [`Device::set()`].
//!
//! - **Synchronizer** (internal): one loop that runs poll cycles,
//!   debounced and retried writes, and `getinfo` requests, so at most one
//!   exchange with the unit is ever in flight.
//!
//! - **[`CodecTable`]** translates wire sensor ids and raw integers into
//!   named [`Attribute`]s and decoded values, and back.
//!
//! - **Change notification**: every refresh and every applied write runs
//!   a change pass that emits one [`DeviceEvent::Changed`] per moved
//!   attribute, followed by a single [`DeviceEvent::Updated`].
//!   [`SnapshotStream`] offers the same information as whole snapshots.

pub mod accessors;
pub mod codec;
pub mod config;
pub mod device;
pub mod error;
pub mod model;
pub mod stream;
pub mod transport;

mod session;
mod store;
mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use accessors::{Reader, Writer};
pub use codec::{CodecError, CodecTable, SensorDescriptor};
pub use config::{DeviceConfig, SyncTiming};
pub use device::Device;
pub use error::CoreError;
pub use model::{Attribute, AttributeChange, DeviceEvent, OperatingMode, Snapshot};
pub use stream::{SnapshotStream, SnapshotWatchStream};
pub use sync::{SetOutcome, SyncState};
pub use transport::DeviceTransport;

// Transport types consumers need without depending on mhac-api directly.
pub use mhac_api::{DeviceClient, DeviceInfo, SensorReading};
