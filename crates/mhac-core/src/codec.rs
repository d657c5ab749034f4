// ── Sensor codec ──
//
// Static table translating between wire sensor ids / raw integer values
// and named attributes / decoded values. Built once and validated at
// construction; duplicate ids, attributes, wire values or labels are
// rejected there rather than discovered at decode time.

use std::collections::HashMap;
use std::sync::LazyLock;

use thiserror::Error;

use crate::model::Attribute;

/// Raw setpoint the unit reports while it has no valid target.
pub const SETPOINT_SENTINEL: i64 = 32768;

/// Setpoint reported in place of [`SETPOINT_SENTINEL`].
pub const SETPOINT_SENTINEL_DEGREES: f64 = 28.0;

/// Wire ids the unit reports that carry no attribute.
pub const RESERVED_WIRE_IDS: &[u16] = &[181, 182, 183, 184];

// ── Descriptors ─────────────────────────────────────────────────────

/// One row of the codec table.
///
/// `values` is the forward enumeration (wire value → label) for
/// enumerated attributes and empty otherwise. `from_wire`/`to_wire`
/// apply numeric scaling; when absent the raw value passes through.
#[derive(Debug, Clone, Copy)]
pub struct SensorDescriptor {
    pub uid: u16,
    pub attribute: Attribute,
    pub values: &'static [(i64, &'static str)],
    pub from_wire: Option<fn(i64) -> f64>,
    pub to_wire: Option<fn(f64) -> i64>,
    pub writable: bool,
}

impl SensorDescriptor {
    const fn plain(uid: u16, attribute: Attribute, writable: bool) -> Self {
        Self {
            uid,
            attribute,
            values: &[],
            from_wire: None,
            to_wire: None,
            writable,
        }
    }

    const fn enumerated(
        uid: u16,
        attribute: Attribute,
        values: &'static [(i64, &'static str)],
        writable: bool,
    ) -> Self {
        Self {
            uid,
            attribute,
            values,
            from_wire: None,
            to_wire: None,
            writable,
        }
    }

    const fn scaled(
        uid: u16,
        attribute: Attribute,
        from_wire: fn(i64) -> f64,
        to_wire: Option<fn(f64) -> i64>,
    ) -> Self {
        Self {
            uid,
            attribute,
            values: &[],
            from_wire: Some(from_wire),
            to_wire,
            writable: to_wire.is_some(),
        }
    }
}

const OFF_ON: &[(i64, &str)] = &[(0, "off"), (1, "on")];
const MODES: &[(i64, &str)] = &[(0, "auto"), (1, "heat"), (2, "dry"), (3, "fan"), (4, "cool")];
const FAN_SPEEDS: &[(i64, &str)] = &[(1, "quiet"), (2, "low"), (3, "medium"), (4, "high")];
const VERTICAL_POSITIONS: &[(i64, &str)] = &[
    (0, "auto"),
    (1, "pos-1"),
    (2, "pos-2"),
    (3, "pos-3"),
    (4, "pos-4"),
    (5, "pos-5"),
    (6, "pos-6"),
    (7, "pos-7"),
    (8, "pos-8"),
    (9, "pos-9"),
    (10, "swing"),
    (11, "swirl"),
    (12, "wide"),
];

/// The MH-AC-WIFI-1 sensor map.
pub const STANDARD_SENSORS: &[SensorDescriptor] = &[
    SensorDescriptor::enumerated(1, Attribute::Active, OFF_ON, true),
    SensorDescriptor::enumerated(2, Attribute::Mode, MODES, true),
    SensorDescriptor::enumerated(4, Attribute::FanSpeed, FAN_SPEEDS, true),
    SensorDescriptor::enumerated(5, Attribute::VerticalPosition, VERTICAL_POSITIONS, true),
    SensorDescriptor::scaled(9, Attribute::Setpoint, setpoint_from_wire, Some(degrees_to_tenths)),
    SensorDescriptor::scaled(10, Attribute::CurrentTemperature, tenths_to_degrees, None),
    SensorDescriptor::enumerated(12, Attribute::RemoteDisable, OFF_ON, true),
    SensorDescriptor::plain(13, Attribute::OnTime, false),
    SensorDescriptor::enumerated(14, Attribute::AlarmStatus, OFF_ON, false),
    SensorDescriptor::plain(15, Attribute::ErrorCode, false),
    SensorDescriptor::enumerated(34, Attribute::QuietMode, OFF_ON, true),
    SensorDescriptor::scaled(35, Attribute::MinSetpoint, tenths_to_degrees, Some(degrees_to_tenths)),
    SensorDescriptor::scaled(36, Attribute::MaxSetpoint, tenths_to_degrees, Some(degrees_to_tenths)),
    SensorDescriptor::scaled(37, Attribute::OutdoorTemperature, tenths_to_degrees, None),
];

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn tenths_to_degrees(raw: i64) -> f64 {
    raw as f64 / 10.0
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn degrees_to_tenths(degrees: f64) -> i64 {
    (degrees * 10.0).round() as i64
}

fn setpoint_from_wire(raw: i64) -> f64 {
    if raw == SETPOINT_SENTINEL {
        SETPOINT_SENTINEL_DEGREES
    } else {
        tenths_to_degrees(raw)
    }
}

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("wire id {uid} is declared more than once")]
    DuplicateWireId { uid: u16 },

    #[error("attribute {attribute} is declared more than once")]
    DuplicateAttribute { attribute: Attribute },

    #[error("{attribute}: wire value {value} is listed twice")]
    DuplicateWireValue { attribute: Attribute, value: i64 },

    #[error("{attribute}: label '{label}' is listed twice")]
    DuplicateLabel {
        attribute: Attribute,
        label: &'static str,
    },

    #[error("unknown sensor id {uid}")]
    UnknownWireId { uid: u16 },

    #[error("{attribute} has no wire mapping")]
    Unmapped { attribute: Attribute },

    #[error("{attribute} is read-only")]
    ReadOnly { attribute: Attribute },

    #[error("{value} is not a valid {attribute} value")]
    OutOfDomain { attribute: Attribute, value: f64 },

    #[error("'{label}' is not a valid {attribute} value")]
    UnknownLabel { attribute: Attribute, label: String },
}

// ── Table ───────────────────────────────────────────────────────────

#[derive(Debug)]
enum Slot {
    Reserved,
    Mapped(usize),
}

/// Validated codec with forward and reverse lookups.
#[derive(Debug)]
pub struct CodecTable {
    entries: Vec<SensorDescriptor>,
    by_uid: HashMap<u16, Slot>,
    by_attribute: HashMap<Attribute, usize>,
    labels: HashMap<Attribute, HashMap<&'static str, i64>>,
}

static STANDARD: LazyLock<CodecTable> = LazyLock::new(|| {
    CodecTable::new(STANDARD_SENSORS, RESERVED_WIRE_IDS)
        .expect("the built-in sensor table is consistent")
});

impl CodecTable {
    /// The table for the MH-AC-WIFI-1.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Build a table, rejecting any duplicate wire id, attribute,
    /// wire value or label.
    pub fn new(sensors: &[SensorDescriptor], reserved: &[u16]) -> Result<Self, CodecError> {
        let mut by_uid = HashMap::new();
        let mut by_attribute = HashMap::new();
        let mut labels = HashMap::new();

        for (index, sensor) in sensors.iter().enumerate() {
            if by_uid.insert(sensor.uid, Slot::Mapped(index)).is_some() {
                return Err(CodecError::DuplicateWireId { uid: sensor.uid });
            }
            if by_attribute.insert(sensor.attribute, index).is_some() {
                return Err(CodecError::DuplicateAttribute {
                    attribute: sensor.attribute,
                });
            }

            let mut reverse = HashMap::new();
            let mut seen = Vec::with_capacity(sensor.values.len());
            for &(value, label) in sensor.values {
                if seen.contains(&value) {
                    return Err(CodecError::DuplicateWireValue {
                        attribute: sensor.attribute,
                        value,
                    });
                }
                seen.push(value);
                if reverse.insert(label, value).is_some() {
                    return Err(CodecError::DuplicateLabel {
                        attribute: sensor.attribute,
                        label,
                    });
                }
            }
            if !reverse.is_empty() {
                labels.insert(sensor.attribute, reverse);
            }
        }

        for &uid in reserved {
            if by_uid.insert(uid, Slot::Reserved).is_some() {
                return Err(CodecError::DuplicateWireId { uid });
            }
        }

        Ok(Self {
            entries: sensors.to_vec(),
            by_uid,
            by_attribute,
            labels,
        })
    }

    pub fn descriptor(&self, attribute: Attribute) -> Option<&SensorDescriptor> {
        self.by_attribute
            .get(&attribute)
            .and_then(|&index| self.entries.get(index))
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &SensorDescriptor> {
        self.entries.iter()
    }

    pub fn is_writable(&self, attribute: Attribute) -> bool {
        self.descriptor(attribute).is_some_and(|d| d.writable)
    }

    /// Decode one reading.
    ///
    /// `Ok(None)` for reserved ids, `UnknownWireId` for ids the table has
    /// never heard of.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn decode(&self, uid: u16, raw: i64) -> Result<Option<(Attribute, f64)>, CodecError> {
        let index = match self.by_uid.get(&uid) {
            Some(Slot::Mapped(index)) => *index,
            Some(Slot::Reserved) => return Ok(None),
            None => return Err(CodecError::UnknownWireId { uid }),
        };
        let Some(sensor) = self.entries.get(index) else {
            return Err(CodecError::UnknownWireId { uid });
        };

        let value = match sensor.from_wire {
            Some(from_wire) => from_wire(raw),
            None => raw as f64,
        };
        Ok(Some((sensor.attribute, value)))
    }

    /// Encode `value` for writing, returning the wire id and raw value.
    ///
    /// Enumerated attributes only accept values listed in their forward
    /// table; unscaled attributes only accept whole numbers.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn encode(&self, attribute: Attribute, value: f64) -> Result<(u16, i64), CodecError> {
        let sensor = self
            .descriptor(attribute)
            .ok_or(CodecError::Unmapped { attribute })?;
        if !sensor.writable {
            return Err(CodecError::ReadOnly { attribute });
        }
        if !value.is_finite() {
            return Err(CodecError::OutOfDomain { attribute, value });
        }

        let raw = match sensor.to_wire {
            Some(to_wire) => to_wire(value),
            None => {
                if value.fract() != 0.0 || value.abs() > 1e15 {
                    return Err(CodecError::OutOfDomain { attribute, value });
                }
                value as i64
            }
        };

        if !sensor.values.is_empty() && !sensor.values.iter().any(|&(v, _)| v == raw) {
            return Err(CodecError::OutOfDomain { attribute, value });
        }
        Ok((sensor.uid, raw))
    }

    /// Label for an enumerated value (`mode` 4 → `"cool"`).
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn label(&self, attribute: Attribute, value: f64) -> Option<&'static str> {
        if value.fract() != 0.0 {
            return None;
        }
        let raw = value as i64;
        self.descriptor(attribute)?
            .values
            .iter()
            .find(|&&(v, _)| v == raw)
            .map(|&(_, label)| label)
    }

    /// Attribute value for a label (`"cool"` → 4). Case-insensitive.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn value_for_label(&self, attribute: Attribute, label: &str) -> Result<f64, CodecError> {
        let wanted = label.trim().to_ascii_lowercase();
        self.labels
            .get(&attribute)
            .and_then(|reverse| reverse.get(wanted.as_str()))
            .map(|&raw| raw as f64)
            .ok_or_else(|| CodecError::UnknownLabel {
                attribute,
                label: label.to_owned(),
            })
    }
}
