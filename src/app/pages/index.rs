use crate::core::request::decode;
use crate::core::{DeviceApi, Params};
use crate::domain::model::{FirmwareVersion, TimeSetting};
use crate::utils::error::Result;

pub const REBOOT_MESSAGE: &str = "Success, rebooting!";
pub const TIME_SET_MESSAGE: &str = "Time set";

/// Landing page: reboot, WiFi reset and clock sync.
pub struct IndexPage<'a, A: DeviceApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: DeviceApi + ?Sized> IndexPage<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn reboot(&self) -> Result<()> {
        tracing::info!("🔁 Requesting reboot");
        self.api.put("/reboot", REBOOT_MESSAGE, &Params::new()).await?;
        Ok(())
    }

    /// Clears the stored WiFi credentials; the hub reboots afterwards.
    pub async fn reset(&self) -> Result<()> {
        tracing::info!("🔁 Requesting WiFi reset");
        self.api.put("/reset", REBOOT_MESSAGE, &Params::new()).await?;
        Ok(())
    }

    /// Both values go as form fields. The firmware checks for `offset` among
    /// the query parameters before reading it from the form, so it is repeated
    /// in the query string.
    pub async fn set_time(&self, setting: TimeSetting) -> Result<()> {
        tracing::info!("🕒 Setting device time to {} (offset {}s)", setting.time, setting.offset);
        let path = Params::new()
            .with("offset", setting.offset)
            .append_to("/setTime");
        let params = Params::new()
            .with("time", setting.time)
            .with("offset", setting.offset);
        self.api.post(&path, TIME_SET_MESSAGE, &params).await?;
        Ok(())
    }

    pub async fn version(&self) -> Result<FirmwareVersion> {
        let value = self.api.get("/version", &Params::new()).await?;
        decode("/version", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pages::testing::RecordingApi;
    use crate::core::StatusArea;
    use serde_json::json;

    #[tokio::test]
    async fn reboot_and_reset_are_bare_puts() {
        let api = RecordingApi::new();
        let page = IndexPage::new(&api);

        page.reboot().await.unwrap();
        page.reset().await.unwrap();

        let calls = api.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!((calls[0].method, calls[0].path.as_str()), ("PUT", "/reboot"));
        assert_eq!((calls[1].method, calls[1].path.as_str()), ("PUT", "/reset"));
        assert!(calls.iter().all(|c| c.params.is_empty()));
        assert_eq!(api.status().current(), REBOOT_MESSAGE);
    }

    #[tokio::test]
    async fn set_time_posts_time_and_offset_fields() {
        let api = RecordingApi::new();
        IndexPage::new(&api)
            .set_time(TimeSetting {
                time: 1_700_000_000,
                offset: 3600,
            })
            .await
            .unwrap();

        let calls = api.calls().await;
        assert_eq!(calls[0].path, "/setTime?offset=3600");
        assert_eq!(calls[0].params.get("time"), Some("1700000000"));
        assert_eq!(calls[0].params.get("offset"), Some("3600"));
        assert_eq!(calls[0].message.as_deref(), Some(TIME_SET_MESSAGE));
    }

    #[tokio::test]
    async fn version_is_decoded() {
        let api = RecordingApi::new();
        api.respond("/version", json!({"version": "0.4.1"})).await;
        let version = IndexPage::new(&api).version().await.unwrap();
        assert_eq!(version.version, "0.4.1");
    }
}
