use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use anyhow::Context;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeymapConfig {
    /// Release held keys after one frame, as if the host never repeats keys.
    #[serde(default)]
    pub disable_key_repeat: bool,
    #[serde(default = "default_fallback_scancode_offset")]
    pub fallback_scancode_offset: i32,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_fallback_scancode_offset() -> i32 {
    crate::keymap::table::DEFAULT_FALLBACK_OFFSET
}
fn default_frame_interval_ms() -> u64 {
    20 // one 50Hz frame
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            disable_key_repeat: false,
            fallback_scancode_offset: default_fallback_scancode_offset(),
            frame_interval_ms: default_frame_interval_ms(),
            log_level: default_log_level(),
        }
    }
}

impl KeymapConfig {
    /// Load config from file, or create default if not exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if !path.as_ref().exists() {
            let default_config = Self::default();
            default_config.save_to_file(&path)?;
            return Ok(default_config);
        }
        Self::load_from_file(path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: KeymapConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;

        // Validate configuration
        if config.frame_interval_ms < 1 {
            config.frame_interval_ms = 1;
        }
        if config.log_level.parse::<LevelFilter>().is_err() {
            config.log_level = default_log_level();
        }

        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let commented = format!(
            "disable_key_repeat = {}        # Release held keys after one frame\n\
             fallback_scancode_offset = {}     # Host scancode offset used until one is detected\n\
             frame_interval_ms = {}           # Length of one emulated frame (ms)\n\
             log_level = \"{}\"              # off, error, warn, info, debug or trace\n",
            self.disable_key_repeat,
            self.fallback_scancode_offset,
            self.frame_interval_ms,
            self.log_level
        );

        fs::write(path.as_ref(), commented)
            .with_context(|| format!("writing config {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::INFO)
    }
}
