use crate::core::{DeviceApi, Params};
use crate::domain::form::SettingsForm;
use crate::utils::error::Result;

pub const CONFIG_UPDATED_MESSAGE: &str = "Settings updated!";

/// Global hub settings (`/config`).
pub struct ConfigPage<'a, A: DeviceApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: DeviceApi + ?Sized> ConfigPage<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn load_settings(&self) -> Result<SettingsForm> {
        let config = self.api.get("/config/", &Params::new()).await?;
        let form = SettingsForm::from_json(&config)?;
        tracing::debug!("Loaded {} setting(s)", form.fields().len());
        Ok(form)
    }

    /// Posts the collected form and asks the hub to persist it.
    pub async fn update_config(&self, form: &SettingsForm) -> Result<()> {
        let config = serde_json::to_string(&form.to_json())?;
        tracing::debug!("New config: {}", config);

        let params = Params::new().with("save", true).with("config", config);
        self.api.post("/config", CONFIG_UPDATED_MESSAGE, &params).await?;
        Ok(())
    }

    /// Load, apply `key=value` edits, post. Nothing is sent if an edit is invalid.
    pub async fn edit<S: AsRef<str>>(&self, assignments: &[S]) -> Result<SettingsForm> {
        let mut form = self.load_settings().await?;
        form.apply_assignments(assignments)?;
        self.update_config(&form).await?;
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pages::testing::RecordingApi;
    use serde_json::{json, Value};

    async fn device() -> RecordingApi {
        let api = RecordingApi::new();
        api.respond(
            "/config/",
            json!({
                "tasksEnabled": false,
                "period": 10,
                "ntpServer": "pool.ntp.org",
                "WiFiClient": true
            }),
        )
        .await;
        api
    }

    #[tokio::test]
    async fn edit_posts_full_config_with_save_flag() {
        let api = device().await;
        let page = ConfigPage::new(&api);

        page.edit(&["period=60", "tasksEnabled=true"]).await.unwrap();

        let calls = api.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!((calls[0].method, calls[0].path.as_str()), ("GET", "/config/"));

        let post = &calls[1];
        assert_eq!((post.method, post.path.as_str()), ("POST", "/config"));
        assert_eq!(post.params.get("save"), Some("true"));
        assert_eq!(post.message.as_deref(), Some(CONFIG_UPDATED_MESSAGE));

        let sent: Value = serde_json::from_str(post.params.get("config").unwrap()).unwrap();
        assert_eq!(
            sent,
            json!({
                "tasksEnabled": true,
                "period": 60,
                "ntpServer": "pool.ntp.org",
                "WiFiClient": true
            })
        );
    }

    #[tokio::test]
    async fn invalid_edit_sends_nothing() {
        let api = device().await;
        let err = ConfigPage::new(&api).edit(&["period=often"]).await;

        assert!(err.is_err());
        assert_eq!(api.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn config_keeps_device_key_order() {
        let api = device().await;
        let form = ConfigPage::new(&api).load_settings().await.unwrap();
        let names: Vec<_> = form.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["tasksEnabled", "period", "ntpServer", "WiFiClient"]);
    }
}
