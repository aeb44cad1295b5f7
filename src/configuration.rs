use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::services::ScrollSettings;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub webdriver: WebDriverSettings,
    pub crawl: CrawlSettings,
    pub scroll: ScrollConfig,
    pub output: OutputSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct WebDriverSettings {
    pub url: String,
    pub headless: bool,
    pub user_agent: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub sessions: usize,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CrawlSettings {
    pub category: String,
    pub start_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub target_item_count: usize,
    pub max_reviews_per_item: Option<usize>,
    pub item_timeout_secs: Option<u64>,
    pub helpful_suffixes: Vec<String>,
}

impl CrawlSettings {
    pub fn item_timeout(&self) -> Option<Duration> {
        self.item_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ScrollConfig {
    pub viewport_fraction: f64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub step_delay_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub settle_delay_ms: u64,
}

impl ScrollConfig {
    pub fn to_settings(&self) -> ScrollSettings {
        ScrollSettings {
            viewport_fraction: self.viewport_fraction,
            step_delay: Duration::from_millis(self.step_delay_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct OutputSettings {
    pub directory: PathBuf,
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // APP_CRAWL__TARGET_ITEM_COUNT=50 sets `crawl.target_item_count`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
