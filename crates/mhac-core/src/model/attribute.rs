use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Named, decoded device attribute.
///
/// The string form (`Display`, `FromStr`, serde) is the camelCase name
/// used in logs and on the command line: `fanSpeed`, `setpoint`, ...
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Attribute {
    /// Power, 0 = off, 1 = on.
    Active,
    /// Operating mode, see [`OperatingMode`].
    Mode,
    /// 1 = quiet .. 4 = high.
    FanSpeed,
    /// Louver position; 10 means swing.
    VerticalPosition,
    /// Target temperature in °C.
    Setpoint,
    /// Indoor temperature in °C.
    CurrentTemperature,
    /// Wall remote disabled, 0/1.
    RemoteDisable,
    /// Accumulated operating hours.
    OnTime,
    /// 0 = off, 1 = on (alarm raised).
    AlarmStatus,
    /// Raw unit error code.
    ErrorCode,
    /// 0/1.
    QuietMode,
    /// Lower setpoint bound in °C.
    MinSetpoint,
    /// Upper setpoint bound in °C.
    MaxSetpoint,
    /// Outdoor temperature in °C.
    OutdoorTemperature,
}

/// Operating modes as the unit numbers them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OperatingMode {
    Auto,
    Heat,
    Dry,
    Fan,
    Cool,
}

impl OperatingMode {
    /// Attribute value for this mode.
    pub fn value(self) -> f64 {
        match self {
            Self::Auto => 0.0,
            Self::Heat => 1.0,
            Self::Dry => 2.0,
            Self::Fan => 3.0,
            Self::Cool => 4.0,
        }
    }

    /// Mode for an attribute value, `None` for anything the unit does not define.
    #[allow(clippy::float_cmp)]
    pub fn from_value(value: f64) -> Option<Self> {
        [Self::Auto, Self::Heat, Self::Dry, Self::Fan, Self::Cool]
            .into_iter()
            .find(|mode| mode.value() == value)
    }
}
