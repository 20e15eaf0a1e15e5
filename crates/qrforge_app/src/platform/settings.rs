use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use qrforge_core::{ErrorCorrection, RenderConfig, Rgb};
use qrforge_engine::{
    ChainSettings, EngineSettings, FetchSettings, DEFAULT_CHART_ENDPOINT, DEFAULT_MARGIN,
    DEFAULT_QRSERVER_ENDPOINT,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SETTINGS_FILE: &str = "qrforge.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub size: u32,
    pub foreground: String,
    pub background: String,
    pub error_correction: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size: qrforge_core::DEFAULT_SIZE,
            foreground: "#000000".to_string(),
            background: "#ffffff".to_string(),
            error_correction: "M".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub render: RenderSettings,
    pub chart_endpoint: String,
    pub qrserver_endpoint: String,
    pub margin: u32,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub tier_timeout_ms: u64,
    pub max_image_bytes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            output_dir: PathBuf::from("."),
            render: RenderSettings::default(),
            chart_endpoint: DEFAULT_CHART_ENDPOINT.to_string(),
            qrserver_endpoint: DEFAULT_QRSERVER_ENDPOINT.to_string(),
            margin: DEFAULT_MARGIN,
            connect_timeout_ms: fetch.connect_timeout.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            tier_timeout_ms: ChainSettings::default().tier_timeout.as_millis() as u64,
            max_image_bytes: fetch.max_bytes,
        }
    }
}

impl Settings {
    /// Reads settings from `path`. A missing file means defaults; an
    /// unreadable or malformed one is logged and also falls back to defaults.
    pub fn load(path: &Path) -> Settings {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Settings::default();
            }
            Err(err) => {
                engine_warn!("Failed to read settings from {:?}: {}", path, err);
                return Settings::default();
            }
        };

        match Settings::parse(&content) {
            Ok(settings) => {
                engine_info!("Loaded settings from {:?}", path);
                settings
            }
            Err(err) => {
                engine_warn!("Failed to parse settings from {:?}: {}", path, err);
                Settings::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Settings, ron::error::SpannedError> {
        ron::from_str(content)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            fetch: FetchSettings {
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
                max_bytes: self.max_image_bytes,
                ..FetchSettings::default()
            },
            chain: ChainSettings {
                tier_timeout: Duration::from_millis(self.tier_timeout_ms),
            },
            chart_endpoint: self.chart_endpoint.clone(),
            qrserver_endpoint: self.qrserver_endpoint.clone(),
            margin: self.margin,
        }
    }

    /// Initial render options. Values that do not parse keep their default.
    pub fn render_config(&self) -> RenderConfig {
        let defaults = RenderConfig::default();
        RenderConfig {
            foreground: parse_or_default(&self.render.foreground, defaults.foreground, "foreground"),
            background: parse_or_default(&self.render.background, defaults.background, "background"),
            size: self.render.size,
            error_correction: parse_or_default::<ErrorCorrection>(
                &self.render.error_correction,
                defaults.error_correction,
                "error_correction",
            ),
        }
        .clamped()
    }
}

fn parse_or_default<T>(raw: &str, default: T, field: &str) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.parse::<T>() {
        Ok(value) => value,
        Err(err) => {
            engine_warn!("Ignoring render.{}: {}", field, err);
            default
        }
    }
}
