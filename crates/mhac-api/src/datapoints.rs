// Device information and datapoint commands
//
// `getinfo`, the two informational listings, the bulk sensor read and
// the single-datapoint write.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::client::DeviceClient;
use crate::error::Error;
use crate::models::{
    DatapointsData, DeviceInfo, InfoData, SensorReading, ServicesData, ValuesData,
};

impl DeviceClient {
    /// Hardware details (serial number, firmware, Wi-Fi MAC).
    ///
    /// `getinfo` is answered without a session, which makes it usable as a
    /// reachability probe.
    pub async fn get_info(&self) -> Result<DeviceInfo, Error> {
        let data: InfoData = self.exchange("getinfo", Map::new(), None).await?;
        Ok(data.info)
    }

    /// Service commands the current session may use.
    pub async fn get_available_services(&self, session: &str) -> Result<Vec<String>, Error> {
        let data: ServicesData = self
            .exchange("getavailableservices", Map::new(), Some(session))
            .await?;
        Ok(data.userinfo.servicelist)
    }

    /// Datapoint descriptors known to the unit.
    ///
    /// Returns loosely-typed JSON because the descriptor layout varies by
    /// firmware and the driver only logs it.
    pub async fn get_available_datapoints(&self, session: &str) -> Result<Vec<Value>, Error> {
        let data: DatapointsData = self
            .exchange("getavailabledatapoints", Map::new(), Some(session))
            .await?;
        Ok(data.dp.datapoints)
    }

    /// Read every sensor in one exchange (`getdatapointvalue { uid: "all" }`).
    pub async fn get_all_values(&self, session: &str) -> Result<Vec<SensorReading>, Error> {
        let mut data = Map::new();
        data.insert("uid".into(), json!("all"));
        let values: ValuesData = self
            .exchange("getdatapointvalue", data, Some(session))
            .await?;
        Ok(values.dpval)
    }

    /// Write one raw value to the datapoint `uid`.
    pub async fn set_value(&self, session: &str, uid: u16, value: i64) -> Result<(), Error> {
        debug!(uid, value, "writing datapoint");
        let mut data = Map::new();
        data.insert("uid".into(), json!(uid));
        data.insert("value".into(), json!(value));
        let _: Value = self
            .exchange("setdatapointvalue", data, Some(session))
            .await?;
        Ok(())
    }
}
