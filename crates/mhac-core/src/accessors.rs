// ── Typed accessors ──
//
// `Reader` answers questions about one published snapshot; `Writer`
// turns typed requests into debounced set requests. Both are obtained
// from a `Device` via `get()` / `set()`.

use std::sync::Arc;

use crate::device::Device;
use crate::error::CoreError;
use crate::model::{Attribute, OperatingMode, Snapshot};
use crate::sync::SetOutcome;
use crate::transport::DeviceTransport;

/// Vertical position value that means "swing".
pub const SWING_POSITION: u8 = 10;
/// Vertical position used when swing is switched off.
pub const SWING_OFF_POSITION: u8 = 4;

// ── Reader ──────────────────────────────────────────────────────────

/// Read view over one snapshot.
///
/// Every accessor fails with [`CoreError::CommunicationFailure`] while the
/// snapshot is invalid, i.e. before the first successful read and after
/// any reset.
#[derive(Debug, Clone)]
pub struct Reader {
    snapshot: Arc<Snapshot>,
}

impl Reader {
    pub(crate) fn new(snapshot: Arc<Snapshot>) -> Self {
        Self { snapshot }
    }

    pub fn valid(&self) -> bool {
        self.snapshot.is_valid()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Raw decoded value of any attribute.
    pub fn value(&self, attribute: Attribute) -> Result<f64, CoreError> {
        if !self.valid() {
            return Err(CoreError::CommunicationFailure);
        }
        self.snapshot
            .get(attribute)
            .ok_or(CoreError::AttributeUnavailable { attribute })
    }

    pub fn active(&self) -> Result<bool, CoreError> {
        self.flag(Attribute::Active)
    }

    pub fn mode(&self) -> Result<OperatingMode, CoreError> {
        let value = self.value(Attribute::Mode)?;
        OperatingMode::from_value(value).ok_or(CoreError::UnexpectedValue {
            attribute: Attribute::Mode,
            value,
        })
    }

    pub fn fan_speed(&self) -> Result<u8, CoreError> {
        self.small_int(Attribute::FanSpeed)
    }

    pub fn vertical_position(&self) -> Result<u8, CoreError> {
        self.small_int(Attribute::VerticalPosition)
    }

    /// Louver swing, derived from the vertical position.
    pub fn swing_mode(&self) -> Result<bool, CoreError> {
        Ok(self.vertical_position()? == SWING_POSITION)
    }

    pub fn setpoint(&self) -> Result<f64, CoreError> {
        self.value(Attribute::Setpoint)
    }

    pub fn min_setpoint(&self) -> Result<f64, CoreError> {
        self.value(Attribute::MinSetpoint)
    }

    pub fn max_setpoint(&self) -> Result<f64, CoreError> {
        self.value(Attribute::MaxSetpoint)
    }

    pub fn current_temperature(&self) -> Result<f64, CoreError> {
        self.value(Attribute::CurrentTemperature)
    }

    pub fn outdoor_temperature(&self) -> Result<f64, CoreError> {
        self.value(Attribute::OutdoorTemperature)
    }

    /// Wall remote disabled.
    pub fn locked(&self) -> Result<bool, CoreError> {
        self.flag(Attribute::RemoteDisable)
    }

    pub fn quiet_mode(&self) -> Result<bool, CoreError> {
        self.flag(Attribute::QuietMode)
    }

    pub fn alarm(&self) -> Result<bool, CoreError> {
        self.flag(Attribute::AlarmStatus)
    }

    pub fn error_code(&self) -> Result<f64, CoreError> {
        self.value(Attribute::ErrorCode)
    }

    /// Accumulated operating hours.
    pub fn on_time(&self) -> Result<f64, CoreError> {
        self.value(Attribute::OnTime)
    }

    fn flag(&self, attribute: Attribute) -> Result<bool, CoreError> {
        Ok(self.value(attribute)? != 0.0)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    fn small_int(&self, attribute: Attribute) -> Result<u8, CoreError> {
        let value = self.value(attribute)?;
        if value.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&value) {
            return Err(CoreError::UnexpectedValue { attribute, value });
        }
        Ok(value as u8)
    }
}

// ── Writer ──────────────────────────────────────────────────────────

/// Typed set requests against a synchronizing device.
///
/// Each call resolves once its write is applied, superseded by a later
/// write to the same attribute, or given up on.
pub struct Writer<'a, T: DeviceTransport> {
    device: &'a Device<T>,
}

impl<T: DeviceTransport> Clone for Writer<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: DeviceTransport> Copy for Writer<'_, T> {}

impl<'a, T: DeviceTransport> Writer<'a, T> {
    pub(crate) fn new(device: &'a Device<T>) -> Self {
        Self { device }
    }

    pub async fn active(self, on: bool) -> Result<SetOutcome, CoreError> {
        self.device
            .set_attribute(Attribute::Active, bool_value(on))
            .await
    }

    pub async fn mode(self, mode: OperatingMode) -> Result<SetOutcome, CoreError> {
        self.device.set_attribute(Attribute::Mode, mode.value()).await
    }

    pub async fn fan_speed(self, speed: u8) -> Result<SetOutcome, CoreError> {
        self.device
            .set_attribute(Attribute::FanSpeed, f64::from(speed))
            .await
    }

    pub async fn vertical_position(self, position: u8) -> Result<SetOutcome, CoreError> {
        self.device
            .set_attribute(Attribute::VerticalPosition, f64::from(position))
            .await
    }

    pub async fn swing_mode(self, on: bool) -> Result<SetOutcome, CoreError> {
        let position = if on { SWING_POSITION } else { SWING_OFF_POSITION };
        self.vertical_position(position).await
    }

    pub async fn setpoint(self, degrees: f64) -> Result<SetOutcome, CoreError> {
        self.device.set_attribute(Attribute::Setpoint, degrees).await
    }

    pub async fn min_setpoint(self, degrees: f64) -> Result<SetOutcome, CoreError> {
        self.device
            .set_attribute(Attribute::MinSetpoint, degrees)
            .await
    }

    pub async fn max_setpoint(self, degrees: f64) -> Result<SetOutcome, CoreError> {
        self.device
            .set_attribute(Attribute::MaxSetpoint, degrees)
            .await
    }

    pub async fn locked(self, locked: bool) -> Result<SetOutcome, CoreError> {
        self.device
            .set_attribute(Attribute::RemoteDisable, bool_value(locked))
            .await
    }

    pub async fn quiet_mode(self, on: bool) -> Result<SetOutcome, CoreError> {
        self.device
            .set_attribute(Attribute::QuietMode, bool_value(on))
            .await
    }
}

fn bool_value(on: bool) -> f64 {
    if on { 1.0 } else { 0.0 }
}
