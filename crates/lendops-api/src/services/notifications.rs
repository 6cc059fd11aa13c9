// Notifications service endpoints
//
// Config and template listings are lenient and return empty lists on
// failure.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{NotificationConfig, NotificationTemplate};

const BASE_PATH: &str = "notifications/api/v1/notifications";

impl ApiClient {
    /// Per-event delivery settings. Empty on failure.
    ///
    /// `GET configs`
    pub async fn list_notification_configs(&self) -> Result<Vec<NotificationConfig>, Error> {
        let url = self.endpoint(BASE_PATH, &["configs"])?;
        Ok(self
            .get(url)
            .await
            .into_data_or_default("list notification configs"))
    }

    /// `PUT configs/{eventType}`
    pub async fn update_notification_config(
        &self,
        event_type: &str,
        config: &NotificationConfig,
    ) -> Result<NotificationConfig, Error> {
        let url = self.endpoint(BASE_PATH, &["configs", event_type])?;
        debug!(event_type, enabled = config.enabled, "updating notification config");
        self.put(url, Some(config))
            .await
            .into_data("Failed to update notification settings")
    }

    /// Message templates. Empty on failure.
    ///
    /// `GET templates`
    pub async fn list_notification_templates(&self) -> Result<Vec<NotificationTemplate>, Error> {
        let url = self.endpoint(BASE_PATH, &["templates"])?;
        Ok(self
            .get(url)
            .await
            .into_data_or_default("list notification templates"))
    }

    /// Send a test message through one channel.
    ///
    /// `POST test` with `{"channel": ..., "recipient": ...}`
    pub async fn send_test_notification(&self, channel: &str, recipient: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            channel: &'a str,
            recipient: &'a str,
        }

        let url = self.endpoint(BASE_PATH, &["test"])?;
        debug!(channel, recipient, "sending test notification");
        self.post::<Value, _>(url, Some(&Body { channel, recipient }))
            .await
            .into_unit("Failed to send test notification")
    }
}
