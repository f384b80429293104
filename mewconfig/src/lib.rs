//! # MewBot Configuration Module
//!
//! This module provides configuration management for MewBot, including:
//! - Loading configuration from YAML files
//! - Merging with embedded default configuration
//! - Environment variable overrides
//! - Typed section getters (query connection, audio bot, catalogs, ...)
//! - Thread-safe singleton access pattern
//!
//! ## Usage
//!
//! ```no_run
//! use mewconfig::get_config;
//!
//! let config = get_config();
//! let query = config.get_query_settings()?;
//! println!("ServerQuery at {}:{}", query.host, query.port);
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};
use tracing::info;

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("mewbot.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load MewBot configuration"));
}

const ENV_CONFIG_DIR: &str = "MEWBOT_CONFIG";
const ENV_PREFIX: &str = "MEWBOT_CONFIG__";

const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;

/// Macro to generate a typed getter for a whole configuration section
macro_rules! impl_section_config {
    ($getter:ident, $ty:ty, $path:expr) => {
        pub fn $getter(&self) -> Result<$ty> {
            self.get_section($path)
        }
    };
}

/// Macro to generate a getter for bool values with default
macro_rules! impl_bool_config {
    ($getter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<bool> {
            match self.get_value($path) {
                Ok(Value::Bool(b)) => Ok(b),
                _ => Ok($default),
            }
        }
    };
}

/// ServerQuery connection parameters (`query` section)
#[derive(Debug, Clone, Deserialize)]
pub struct QuerySettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub nickname: String,
    pub server_id: u32,
    pub hello: String,
    pub timeout_secs: u64,
}

/// TS3AudioBot web API parameters (`audiobot` section)
#[derive(Debug, Clone, Deserialize)]
pub struct AudioBotSettings {
    pub url: String,
    pub bot_id: u32,
    pub timeout_secs: u64,
    #[serde(default)]
    pub clear_on_connect: bool,
}

/// One catalog backend entry (`catalogs` list)
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    pub id: String,
    pub url: String,
    pub kind: String,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub playlists_file: Option<String>,
}

fn default_priority() -> i32 {
    100
}

fn default_catalog_timeout() -> u64 {
    10
}

impl CatalogSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Conversational agent parameters (`agent` section)
#[derive(Debug, Clone, Deserialize)]
pub struct AgentSettings {
    #[serde(default)]
    pub enabled: bool,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub pet_model: String,
    pub timeout_secs: u64,
    pub system_prompt: String,
}

/// Text-to-speech relay parameters (`tts` section)
#[derive(Debug, Clone, Deserialize)]
pub struct TtsSettings {
    #[serde(default)]
    pub enabled: bool,
    pub url: String,
    pub voice: String,
}

/// Pet mini-game parameters (`pet` section)
#[derive(Debug, Clone, Deserialize)]
pub struct PetSettings {
    #[serde(default)]
    pub enabled: bool,
    pub store_file: String,
    pub battle_round_delay_ms: u64,
}

/// Main loop cadence and dialog timeouts (`loop` section)
#[derive(Debug, Clone, Deserialize)]
pub struct LoopSettings {
    pub poll_interval_secs: u64,
    pub standby_after_secs: u64,
    pub dialog_step_secs: u64,
    pub ask_timeout_secs: u64,
    pub confirm_timeout_secs: u64,
    pub pet_prompt_timeout_secs: u64,
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl LoopSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn standby_after(&self) -> Duration {
        Duration::from_secs(self.standby_after_secs)
    }

    pub fn dialog_step(&self) -> Duration {
        Duration::from_secs(self.dialog_step_secs.max(1))
    }

    pub fn ask_timeout(&self) -> Duration {
        Duration::from_secs(self.ask_timeout_secs)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    pub fn pet_prompt_timeout(&self) -> Duration {
        Duration::from_secs(self.pet_prompt_timeout_secs)
    }
}

/// Configuration manager for MewBot
///
/// This structure manages the application configuration, including:
/// - Loading configuration from YAML files
/// - Merging with default configuration
/// - Handling environment variable overrides
/// - Providing typed getters for configuration sections
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

impl Config {
    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> String {
        if !directory.is_empty() {
            return directory.to_string();
        }

        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var=ENV_CONFIG_DIR, path=%env_path, "Trying to load config from env");
            return env_path;
        }

        if Path::new(".mewbot").exists() {
            return ".mewbot".to_string();
        }

        if let Some(home) = home_dir() {
            let home_config = home.join(".mewbot");
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        ".mewbot".to_string()
    }

    /// Validates and prepares a config directory
    fn validate_config_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(anyhow!("{} is not a directory", path.display()));
        }

        // Test write permission
        let test_file = path.join(".write_test");
        fs::write(&test_file, b"test")?;
        fs::remove_file(&test_file)?;

        Ok(())
    }

    /// Loads the configuration from the specified directory
    ///
    /// This method:
    /// 1. Determines the configuration directory
    /// 2. Loads the default embedded configuration
    /// 3. Merges it with the external config.yaml file if present
    /// 4. Applies environment variable overrides
    /// 5. Saves the merged configuration
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::find_config_dir(directory);
        Self::validate_config_dir(Path::new(&config_dir))?;
        info!(config_dir=%config_dir, "Using config directory");

        let config_file_path = Path::new(&config_dir).join("config.yaml");
        let path = config_file_path.to_string_lossy().to_string();

        let mut default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        let yaml_data = if let Ok(data) = fs::read(&path) {
            info!(config_file=%path, "Loaded config file");
            data
        } else {
            info!(config_file=%path, "Config file not found, using default embedded config");
            DEFAULT_CONFIG.as_bytes().to_vec()
        };

        let external_value: Value = serde_yaml::from_slice(&yaml_data)?;
        merge_yaml(&mut default_value, &external_value);
        let mut config_value = Self::lower_keys_value(default_value);

        // Appliquer les overrides depuis les variables d'environnement
        Self::apply_env_overrides(&mut config_value);

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
        };

        config.save()?;
        Ok(config)
    }

    /// Directory holding config.yaml and the relative data files
    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Saves the current configuration to the config.yaml file
    pub fn save(&self) -> Result<()> {
        let data = self.data.lock().unwrap();
        let yaml = serde_yaml::to_string(&*data)?;
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key = path[0].to_lowercase();
            let key_value = Value::String(key);
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Gets a configuration value at the specified path
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.data.lock().unwrap();
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                let key = key.to_lowercase();

                if let Some(next) = map.get(Value::String(key)) {
                    current = next;
                } else {
                    return Err(anyhow!("Path {} does not exist", path[..=i].join(".")));
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    /// Deserializes the subtree at `path` into a typed settings struct
    pub fn get_section<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T> {
        let value = self.get_value(path)?;
        serde_yaml::from_value(value)
            .map_err(|e| anyhow!("Invalid configuration section {}: {}", path.join("."), e))
    }

    /// Resolves a data file path relative to the configuration directory
    pub fn resolve_path(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new(&self.config_dir).join(path)
        }
    }

    fn apply_env_overrides(config: &mut Value) {
        for (key, value) in env::vars() {
            if key.starts_with(ENV_PREFIX) {
                let key_path = key
                    .trim_start_matches(ENV_PREFIX)
                    .split("__")
                    .collect::<Vec<_>>();
                let yaml_value = Self::convert_env_value(&value);
                let _ = Self::set_value_internal(config, &key_path, yaml_value);
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    if let Value::String(s) = k {
                        new_map.insert(Value::String(s.to_lowercase()), Self::lower_keys_value(v));
                    } else {
                        new_map.insert(k, Self::lower_keys_value(v));
                    }
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    impl_section_config!(get_query_settings, QuerySettings, &["query"]);
    impl_section_config!(get_audiobot_settings, AudioBotSettings, &["audiobot"]);
    impl_section_config!(get_catalog_settings, Vec<CatalogSettings>, &["catalogs"]);
    impl_section_config!(get_agent_settings, AgentSettings, &["agent"]);
    impl_section_config!(get_tts_settings, TtsSettings, &["tts"]);
    impl_section_config!(get_pet_settings, PetSettings, &["pet"]);
    impl_section_config!(get_loop_settings, LoopSettings, &["loop"]);

    impl_bool_config!(
        get_log_enable_console,
        &["logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    /// Récupère le niveau de log minimum depuis la configuration
    pub fn get_log_min_level(&self) -> Result<String> {
        match self.get_value(&["logger", "min_level"]) {
            Ok(Value::String(s)) => Ok(s),
            _ => Ok(DEFAULT_LOG_MIN_LEVEL.to_string()),
        }
    }
}

/// Returns the global configuration instance
///
/// The instance is lazily loaded on first access from the directory found
/// through `MEWBOT_CONFIG`, `./.mewbot` or `~/.mewbot`.
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Merges external YAML configuration into default configuration
///
/// Mappings are merged key by key; scalars and sequences from `external`
/// replace the default value.
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(), // pour les scalaires ou séquences, on remplace
    }
}
