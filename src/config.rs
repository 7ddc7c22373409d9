use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use crate::core::matcher::DEFAULT_MIN_SCORE;
use crate::models::{ScoringModel, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub profiles: ProfileSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { path: default_catalog_path() }
    }
}

fn default_catalog_path() -> PathBuf { PathBuf::from("data/scholarships.json") }

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSettings {
    #[serde(default = "default_profiles_path")]
    pub path: PathBuf,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self { path: default_profiles_path() }
    }
}

fn default_profiles_path() -> PathBuf { PathBuf::from("data/users.json") }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_score")]
    pub min_score: u8,
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    #[serde(default)]
    pub exclude_expired: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            exclude_expired: false,
        }
    }
}

fn default_min_score() -> u8 { DEFAULT_MIN_SCORE }
fn default_limit() -> u16 { 15 }
fn default_max_limit() -> u16 { 200 }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_partial_credit")]
    pub demographic_partial_credit: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            demographic_partial_credit: default_partial_credit(),
        }
    }
}

fn default_partial_credit() -> f64 { 0.5 }

impl ScoringSettings {
    pub fn to_model(&self) -> ScoringModel {
        ScoringModel {
            weights: ScoringWeights {
                gpa: self.weights.gpa,
                major: self.weights.major,
                grade_level: self.weights.grade_level,
                location: self.weights.location,
                demographics: self.weights.demographics,
                interests: self.weights.interests,
                circumstances: self.weights.circumstances,
            },
            demographic_partial_credit: self.demographic_partial_credit,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_gpa_weight")]
    pub gpa: f64,
    #[serde(default = "default_major_weight")]
    pub major: f64,
    #[serde(default = "default_grade_level_weight")]
    pub grade_level: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_demographics_weight")]
    pub demographics: f64,
    #[serde(default = "default_interests_weight")]
    pub interests: f64,
    #[serde(default = "default_circumstances_weight")]
    pub circumstances: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            gpa: default_gpa_weight(),
            major: default_major_weight(),
            grade_level: default_grade_level_weight(),
            location: default_location_weight(),
            demographics: default_demographics_weight(),
            interests: default_interests_weight(),
            circumstances: default_circumstances_weight(),
        }
    }
}

fn default_gpa_weight() -> f64 { 0.20 }
fn default_major_weight() -> f64 { 0.25 }
fn default_grade_level_weight() -> f64 { 0.20 }
fn default_location_weight() -> f64 { 0.10 }
fn default_demographics_weight() -> f64 { 0.10 }
fn default_interests_weight() -> f64 { 0.10 }
fn default_circumstances_weight() -> f64 { 0.05 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SCHOLAR__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCHOLAR__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SCHOLAR")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
