use crate::core::request::decode;
use crate::core::{DeviceApi, DeviceKind, Params, Reply, StatusArea};
use crate::domain::form::SettingsForm;
use crate::domain::model::{
    CalibrationResult, DeviceInfo, Measurements, ReceiverList, SensorList, SignalRef,
};
use crate::utils::error::Result;

pub const DEVICE_UPDATED_MESSAGE: &str = "Device config updated!";
pub const SIGNAL_SENT_MESSAGE: &str = "Signal executed";
pub const SIGNAL_QUEUED_MESSAGE: &str = "Signal queued";
pub const CALIBRATION_SENT_MESSAGE: &str = "Calibration step sent";

/// Sensors and signal receivers attached to the hub.
pub struct DevicesPage<'a, A: DeviceApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: DeviceApi + ?Sized> DevicesPage<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn list_sensors(&self) -> Result<Vec<DeviceInfo>> {
        let value = self.api.get("/sensors/", &Params::new()).await?;
        let list: SensorList = decode("/sensors/", value)?;
        Ok(list.sensors)
    }

    pub async fn list_receivers(&self) -> Result<Vec<DeviceInfo>> {
        let value = self.api.get("/signals/", &Params::new()).await?;
        let list: ReceiverList = decode("/signals/", value)?;
        Ok(list.receivers)
    }

    pub async fn list(&self, kind: DeviceKind) -> Result<Vec<DeviceInfo>> {
        match kind {
            DeviceKind::Sensor => self.list_sensors().await,
            DeviceKind::Receiver => self.list_receivers().await,
        }
    }

    /// Settings of the peripheral at `position_id`.
    pub async fn load_device(&self, kind: DeviceKind, position_id: u32) -> Result<SettingsForm> {
        let params = Params::new().with(kind.param_name(), position_id);
        let value = self.api.get(kind.config_path(), &params).await?;
        SettingsForm::from_json(&value)
    }

    pub async fn update_device_config(
        &self,
        kind: DeviceKind,
        position_id: u32,
        form: &SettingsForm,
    ) -> Result<()> {
        let config = serde_json::to_string(&form.to_json())?;
        tracing::debug!("New {} {} config: {}", kind, position_id, config);

        let params = Params::new()
            .with(kind.param_name(), position_id)
            .with("config", config);
        self.api
            .post(kind.config_path(), DEVICE_UPDATED_MESSAGE, &params)
            .await?;
        Ok(())
    }

    pub async fn edit_device<S: AsRef<str>>(
        &self,
        kind: DeviceKind,
        position_id: u32,
        assignments: &[S],
    ) -> Result<SettingsForm> {
        let mut form = self.load_device(kind, position_id).await?;
        form.apply_assignments(assignments)?;
        self.update_device_config(kind, position_id, &form).await?;
        Ok(form)
    }

    /// Last sensor readings; `refresh` makes the hub take a new measurement first.
    pub async fn measurement(&self, refresh: bool) -> Result<Measurements> {
        let mut params = Params::new();
        if refresh {
            params.push("update", true);
        }
        let value = self.api.get("/sensors/measurement", &params).await?;
        decode("/sensors/measurement", value)
    }

    /// Runs one calibration step on a sensor. The device's message replaces
    /// the status line when it sends one.
    pub async fn calibrate(&self, sensor: u32, step: i32) -> Result<CalibrationResult> {
        tracing::info!("🎯 Calibrating sensor {} (step {})", sensor, step);
        let params = Params::new().with("sensor", sensor).with("step", step);
        let reply = self
            .api
            .post("/sensors/calibrate", CALIBRATION_SENT_MESSAGE, &params)
            .await?;

        let result = CalibrationResult::parse(&reply.body)?;
        if !result.message.is_empty() {
            self.api.status().show(&result.message);
        }
        Ok(result)
    }

    /// Runs a signal on a receiver right away and returns whatever it answered.
    pub async fn execute_signal(
        &self,
        receiver: u32,
        signal: &SignalRef,
        payload: Option<&str>,
    ) -> Result<Reply> {
        let params = signal_params(receiver, signal, payload);
        self.api
            .post("/signals/execute", SIGNAL_SENT_MESSAGE, &params)
            .await
    }

    /// Adds a signal to the receiver's queue; the hub sends it on its next pass.
    pub async fn queue_signal(
        &self,
        receiver: u32,
        signal: &SignalRef,
        payload: Option<&str>,
    ) -> Result<()> {
        let params = signal_params(receiver, signal, payload);
        self.api
            .post("/signals/add", SIGNAL_QUEUED_MESSAGE, &params)
            .await?;
        Ok(())
    }
}

fn signal_params(receiver: u32, signal: &SignalRef, payload: Option<&str>) -> Params {
    let mut params = Params::new().with("receiver", receiver);
    match signal {
        SignalRef::Id(id) => params.push("id", id),
        SignalRef::Name(name) => params.push("name", name),
    }
    if let Some(payload) = payload {
        params.push("payload", payload);
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pages::testing::RecordingApi;
    use crate::domain::model::CalibrationStatus;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn lists_both_device_kinds() {
        let api = RecordingApi::new();
        api.respond(
            "/sensors/",
            json!({"sensors": [{"positionID": 0, "description": {"name": "BME280"}}]}),
        )
        .await;
        api.respond("/signals/", json!({"receivers": []})).await;

        let page = DevicesPage::new(&api);
        let sensors = page.list(DeviceKind::Sensor).await.unwrap();
        let receivers = page.list(DeviceKind::Receiver).await.unwrap();

        assert_eq!(sensors[0].description.name, "BME280");
        assert!(receivers.is_empty());
    }

    #[tokio::test]
    async fn device_config_is_addressed_by_position() {
        let api = RecordingApi::new();
        api.respond("/signals/config", json!({"pin": 4, "active": true}))
            .await;

        let page = DevicesPage::new(&api);
        page.edit_device(DeviceKind::Receiver, 3, &["pin=5"])
            .await
            .unwrap();

        let calls = api.calls().await;
        assert_eq!(calls[0].params.get("receiver"), Some("3"));

        let post = &calls[1];
        assert_eq!(post.path, "/signals/config");
        assert_eq!(post.params.pairs()[0], ("receiver".to_string(), "3".to_string()));
        assert_eq!(post.message.as_deref(), Some(DEVICE_UPDATED_MESSAGE));
        let sent: Value = serde_json::from_str(post.params.get("config").unwrap()).unwrap();
        assert_eq!(sent, json!({"pin": 5, "active": true}));
    }

    #[tokio::test]
    async fn measurement_refresh_adds_update_param() {
        let api = RecordingApi::new();
        api.respond(
            "/sensors/measurement",
            json!({"measurements": [{"parameter": "Humidity", "value": 40.2, "unit": "%"}]}),
        )
        .await;

        let page = DevicesPage::new(&api);
        page.measurement(false).await.unwrap();
        let data = page.measurement(true).await.unwrap();

        let calls = api.calls().await;
        assert!(calls[0].params.is_empty());
        assert_eq!(calls[1].params.get("update"), Some("true"));
        assert_eq!(data.measurements[0].parameter, "Humidity");
    }

    #[tokio::test]
    async fn execute_signal_by_name_with_payload() {
        let api = RecordingApi::new();
        DevicesPage::new(&api)
            .execute_signal(1, &SignalRef::Name("reset".to_string()), Some("{}"))
            .await
            .unwrap();

        let calls = api.calls().await;
        assert_eq!(calls[0].path, "/signals/execute");
        assert_eq!(calls[0].params.get("name"), Some("reset"));
        assert_eq!(calls[0].params.get("payload"), Some("{}"));
        assert_eq!(calls[0].params.get("id"), None);
    }

    #[tokio::test]
    async fn missing_reading_is_kept_with_the_others() {
        let api = RecordingApi::new();
        api.respond(
            "/sensors/measurement",
            json!({"measurements": [
                {"parameter": "Temperature", "value": 21.5, "unit": "C"},
                {"parameter": "CO2", "value": null, "unit": "ppm"}
            ]}),
        )
        .await;

        let data = DevicesPage::new(&api).measurement(false).await.unwrap();

        assert_eq!(data.measurements.len(), 2);
        assert_eq!(data.measurements[0].value, Some(21.5));
        assert_eq!(data.measurements[1].value, None);
    }

    #[tokio::test]
    async fn queue_signal_by_id() {
        let api = RecordingApi::new();
        DevicesPage::new(&api)
            .queue_signal(0, &SignalRef::Id(4), None)
            .await
            .unwrap();

        let calls = api.calls().await;
        assert_eq!((calls[0].method, calls[0].path.as_str()), ("POST", "/signals/add"));
        assert_eq!(calls[0].params.get("receiver"), Some("0"));
        assert_eq!(calls[0].params.get("id"), Some("4"));
        assert_eq!(calls[0].params.get("name"), None);
        assert_eq!(calls[0].params.get("payload"), None);
        assert_eq!(api.status().current(), SIGNAL_QUEUED_MESSAGE);
    }

    #[tokio::test]
    async fn calibrate_sends_step_and_shows_device_message() {
        let api = RecordingApi::new();
        api.reply_with(
            "/sensors/calibrate",
            r#"{ "response":2,"message":Place sensor in fresh air}"#,
        )
        .await;

        let result = DevicesPage::new(&api).calibrate(1, 0).await.unwrap();

        let calls = api.calls().await;
        assert_eq!(calls[0].path, "/sensors/calibrate");
        assert_eq!(calls[0].params.get("sensor"), Some("1"));
        assert_eq!(calls[0].params.get("step"), Some("0"));
        assert_eq!(result.status, CalibrationStatus::Next);
        assert_eq!(api.status().current(), "Place sensor in fresh air");
    }
}
