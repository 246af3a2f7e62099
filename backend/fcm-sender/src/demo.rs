use std::collections::HashMap;

use anyhow::Context;
use chrono::{DateTime, Utc};
use notes_fcm_shared::{FcmClient, SentMessage, ServiceAccountKey};
use tracing::info;

use crate::config::Config;

/// Custom data attached to the demo notification
pub fn demo_data(now: DateTime<Utc>) -> HashMap<String, String> {
    HashMap::from([
        ("source".to_string(), "rust".to_string()),
        ("timestamp".to_string(), now.timestamp_millis().to_string()),
        ("test".to_string(), "true".to_string()),
    ])
}

/// Load the credential, check token generation, then send one notification
/// to the configured device
pub async fn run(config: &Config) -> anyhow::Result<SentMessage> {
    let credentials = ServiceAccountKey::from_file(&config.service_account_path)
        .with_context(|| {
            format!(
                "Failed to load service account from {}",
                config.service_account_path
            )
        })?;

    let client = FcmClient::new(credentials).with_api_base(config.api_base_url.as_str());

    info!(project_id = %client.project_id, "Testing access token generation");
    client.get_access_token().await?;

    let sent = client
        .send_to_device(
            &config.demo_device_token,
            &config.demo_title,
            &config.demo_body,
            Some(demo_data(Utc::now())),
        )
        .await?;

    Ok(sent)
}
