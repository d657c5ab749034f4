// ── Wire models ──
//
// Request and response shapes for `/api.cgi`. Only the fields the driver
// actually reads are typed; everything else is carried along as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outgoing request body: `{ "command": ..., "data": { ... } }`.
#[derive(Debug, Serialize)]
pub(crate) struct Request<'a> {
    pub command: &'a str,
    pub data: &'a Map<String, Value>,
}

/// Response envelope common to every command.
///
/// `data` is absent on some acknowledgements (`logout`,
/// `setdatapointvalue`), and failures carry an `error` object instead.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn describe(&self) -> String {
        match (self.code, self.message.as_deref()) {
            (Some(code), Some(msg)) => format!("{msg} (code {code})"),
            (None, Some(msg)) => msg.to_owned(),
            (Some(code), None) => format!("error code {code}"),
            (None, None) => "unspecified error".into(),
        }
    }
}

// ── login ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    pub id: SessionIdData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionIdData {
    #[serde(rename = "sessionID")]
    pub session_id: String,
}

// ── getinfo ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct InfoData {
    pub info: DeviceInfo,
}

/// Hardware and firmware details reported by `getinfo`.
///
/// The field set varies with firmware; the identifiers the driver cares
/// about are typed and the rest is preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "deviceModel", default)]
    pub model: Option<String>,
    #[serde(rename = "sn", default)]
    pub serial_number: Option<String>,
    #[serde(rename = "fwVersion", default)]
    pub firmware_version: Option<String>,
    #[serde(rename = "wlanSTAMAC", default)]
    pub wlan_mac: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── getavailableservices / getavailabledatapoints ────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ServicesData {
    pub userinfo: UserInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserInfo {
    #[serde(default)]
    pub servicelist: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatapointsData {
    pub dp: DatapointList,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatapointList {
    #[serde(default)]
    pub datapoints: Vec<Value>,
}

// ── getdatapointvalue ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ValuesData {
    #[serde(default)]
    pub dpval: Vec<SensorReading>,
}

/// One raw sensor reading: wire id plus wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReading {
    pub uid: u16,
    pub value: i64,
}

impl SensorReading {
    pub fn new(uid: u16, value: i64) -> Self {
        Self { uid, value }
    }
}
