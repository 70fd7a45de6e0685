use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub recent_post_cap: usize,
    pub virality_post_cap: usize,
    pub inflection_top_n: usize,
    pub classifier_batch_limit: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            recent_post_cap: 50,
            virality_post_cap: 30,
            inflection_top_n: 3,
            classifier_batch_limit: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthConfig {
    pub window_days: u32,
    pub follower_baseline: u64,
    pub ratio_baseline: f64,
    pub influential_baseline: u64,
    /// Pins the random walk for reproducible runs. When unset, each run
    /// derives a fresh seed from the profile handle and wall clock.
    pub seed: Option<u64>,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            follower_baseline: 50_000,
            ratio_baseline: 50.0,
            influential_baseline: 2_500,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub api_base: String,
    pub model: String,
    pub timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub limits: LimitsConfig,
    pub growth: GrowthConfig,
    pub classifier: ClassifierConfig,
}

impl AnalyzerConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                AnalyzerConfig::default()
            }
        } else {
            AnalyzerConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(api_base) = env::var("OPENAI_API_BASE") {
            if !api_base.trim().is_empty() {
                self.classifier.api_base = api_base;
            }
        }
        if let Ok(model) = env::var("OPENAI_MODEL") {
            if !model.trim().is_empty() {
                self.classifier.model = model;
            }
        }
        if let Ok(timeout) = env::var("CLASSIFIER_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.classifier.timeout_ms = value;
            }
        }
        if let Ok(seed) = env::var("GROWTH_SEED") {
            if let Ok(value) = seed.parse::<u64>() {
                self.growth.seed = Some(value);
            }
        }
        if let Ok(window) = env::var("GROWTH_WINDOW_DAYS") {
            if let Ok(value) = window.parse::<u32>() {
                self.growth.window_days = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("ANALYZER_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/analyzer.toml")))
}
