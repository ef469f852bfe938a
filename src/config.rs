use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::selector::{CountSpec, DifficultyFilter};
use crate::engine::validator::MAX_QUESTION_COUNT;
use crate::store::json_store::default_data_dir;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub default_categories: Vec<String>,
    #[serde(default = "default_count")]
    pub default_count: String,
    #[serde(default = "default_difficulty")]
    pub default_difficulty: String,
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_file: Option<String>,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_count() -> String {
    "10".to_string()
}
fn default_difficulty() -> String {
    "all".to_string()
}
fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            default_categories: Vec::new(),
            default_count: default_count(),
            default_difficulty: default_difficulty(),
            data_dir: default_data_dir_string(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(file) => PathBuf::from(file),
            None => self.data_path().join("quizr.log"),
        }
    }

    /// Count spec for the setup screen. `normalize` guarantees this parses.
    pub fn count_spec(&self) -> CountSpec {
        self.default_count.parse().unwrap_or(CountSpec::Limit(10))
    }

    pub fn difficulty_filter(&self) -> DifficultyFilter {
        DifficultyFilter::parse(&self.default_difficulty)
    }

    /// Drop default categories the corpus doesn't know and reset unusable
    /// count/difficulty values. Call after loading to handle stale files.
    pub fn normalize(&mut self, known_categories: &[&str]) {
        let mut seen = HashSet::new();
        self.default_categories
            .retain(|c| known_categories.contains(&c.as_str()) && seen.insert(c.clone()));

        let count_ok = match self.default_count.parse::<CountSpec>() {
            Ok(CountSpec::Limit(n)) => (1..=MAX_QUESTION_COUNT).contains(&n),
            Ok(_) => true,
            Err(_) => false,
        };
        if !count_ok {
            self.default_count = default_count();
        }

        let difficulty = self.default_difficulty.trim().to_ascii_lowercase();
        if DifficultyFilter::parse(&difficulty).as_str() != difficulty {
            self.default_difficulty = default_difficulty();
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizr")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.count_spec(), CountSpec::Limit(10));
        assert_eq!(config.difficulty_filter(), DifficultyFilter::All);
        assert!(config.data_dir.contains("quizr"));
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
theme = "gruvbox-dark"
default_categories = ["sleep", "diet"]
default_count = "all"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "gruvbox-dark");
        assert_eq!(config.default_categories, vec!["sleep", "diet"]);
        assert_eq!(config.count_spec(), CountSpec::All);
        assert_eq!(config.default_difficulty, "all");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_save_and_load_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.default_count = "25".to_string();
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_normalize_drops_unknown_categories() {
        let mut config = Config::default();
        config.default_categories = vec!["sleep".into(), "astrology".into(), "sleep".into()];
        config.normalize(&["sleep", "diet"]);
        assert_eq!(config.default_categories, vec!["sleep"]);
    }

    #[test]
    fn test_normalize_resets_bad_count_and_difficulty() {
        let mut config = Config::default();
        config.default_count = "500".to_string();
        config.default_difficulty = "nightmare".to_string();
        config.normalize(&[]);
        assert_eq!(config.default_count, "10");
        assert_eq!(config.default_difficulty, "all");

        config.default_count = "flagged".to_string();
        config.default_difficulty = "Medium-Hard".to_string();
        config.normalize(&[]);
        assert_eq!(config.default_count, "flagged");
        assert_eq!(config.difficulty_filter(), DifficultyFilter::MediumHard);
    }

    #[test]
    fn test_log_path_defaults_into_data_dir() {
        let mut config = Config::default();
        config.data_dir = "/tmp/quizr-data".to_string();
        assert_eq!(config.log_path(), PathBuf::from("/tmp/quizr-data/quizr.log"));
        config.log_file = Some("/var/log/q.log".to_string());
        assert_eq!(config.log_path(), PathBuf::from("/var/log/q.log"));
    }
}
