//! Notification command handlers.

use tabled::Tabled;

use lendops_api::{ApiClient, NotificationConfig, NotificationTemplate};

use crate::cli::{GlobalOpts, NotificationsArgs, NotificationsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Channels")]
    channels: String,
    #[tabled(rename = "Template")]
    template: String,
    #[tabled(rename = "Recipients")]
    recipients: String,
}

impl From<&NotificationConfig> for ConfigRow {
    fn from(c: &NotificationConfig) -> Self {
        Self {
            event: c.event_type.clone(),
            enabled: if c.enabled { "yes" } else { "no" }.into(),
            channels: c.channels.join(", "),
            template: c.template_id.clone().unwrap_or_default(),
            recipients: c.recipients.join(", "),
        }
    }
}

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Subject")]
    subject: String,
}

impl From<&NotificationTemplate> for TemplateRow {
    fn from(t: &NotificationTemplate) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            channel: t.channel.clone(),
            subject: t.subject.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApiClient,
    args: NotificationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NotificationsCommand::Configs => {
            let configs = client.list_notification_configs().await?;
            let out = output::render_list(
                global.format(),
                &configs,
                |c| ConfigRow::from(c),
                |c| c.event_type.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NotificationsCommand::Templates => {
            let templates = client.list_notification_templates().await?;
            let out = output::render_list(
                global.format(),
                &templates,
                |t| TemplateRow::from(t),
                |t| t.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NotificationsCommand::Update {
            event_type,
            payload,
        } => {
            let mut config: NotificationConfig = util::read_json_file(&payload.from_file)?;
            if config.event_type.is_empty() {
                config.event_type.clone_from(&event_type);
            } else if !config.event_type.eq_ignore_ascii_case(&event_type) {
                return Err(CliError::Validation {
                    field: "eventType".into(),
                    reason: format!(
                        "file is for '{}' but the command names '{event_type}'",
                        config.event_type
                    ),
                });
            }
            let updated = client.update_notification_config(&event_type, &config).await?;
            output::print_done(
                &format!("Notification settings for {} saved", updated.event_type),
                global.quiet,
            );
            let out = output::render_list(
                global.format(),
                std::slice::from_ref(&updated),
                |c| ConfigRow::from(c),
                |c| c.event_type.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NotificationsCommand::Test { channel, recipient } => {
            client.send_test_notification(&channel, &recipient).await?;
            output::print_done(
                &format!("Test {channel} notification sent to {recipient}"),
                global.quiet,
            );
            Ok(())
        }
    }
}
