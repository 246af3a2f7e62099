use notes_fcm_shared::DEFAULT_API_BASE;
use serde::Deserialize;

const ENV_PREFIX: &str = "FCM_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Settings read from `FCM_*` environment variables (and `.env`)
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// FCM_SERVICE_ACCOUNT_PATH
    #[serde(default = "default_service_account_path")]
    pub service_account_path: String,
    /// FCM_API_BASE_URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// FCM_DEMO_DEVICE_TOKEN
    #[serde(default = "default_demo_device_token")]
    pub demo_device_token: String,
    #[serde(default = "default_demo_title")]
    pub demo_title: String,
    #[serde(default = "default_demo_body")]
    pub demo_body: String,
    /// FCM_LOG_FORMAT=json switches to JSON log lines
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_service_account_path() -> String {
    "./service-account-key.json".to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_demo_device_token() -> String {
    "fINZpX-zfXiDakZewrjxxP:APA91bGQQ1FGncVbfJooJ6Bdd7JSdgsrOcw5SPhTCNWiCnaVcKZGtuAXTMOoy84O4_q9PgtMcTE5Bo16d2LlVPF4BlGWZA25Z0U5rAZ0l_E5qGL9Glumvns".to_string()
}

fn default_demo_title() -> String {
    "Hello from Rust!".to_string()
}

fn default_demo_body() -> String {
    "Notification sent from the FCM sender!".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::prefixed(ENV_PREFIX).from_env()
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter(vars)
    }
}
