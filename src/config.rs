use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "bookmarks")]
#[command(about = "Runs the bookmarks service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bookmarks")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

/// Language used for error titles, error details and the capability listing.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    database: String,
    port: u16,
    #[serde(default)]
    pub locale: Locale,
}

impl App {
    pub fn get_port(&self) -> u16 {
        self.port
    }

    /// Resolves the database path against `data_dir` unless it is absolute
    /// or the in-memory marker.
    pub fn db_path(&self, data_dir: &Path) -> PathBuf {
        let db = Path::new(&self.database);
        if self.database == IN_MEMORY_DATABASE || db.is_absolute() {
            db.to_path_buf()
        } else {
            data_dir.join(db)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub app: App,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        Ok(cfg)
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str =
            fs::read_to_string(path).with_context(|| format!("reading config file {}", path))?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Config> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!(var = %var_name, "environment variable not found");
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_with_defaults() {
        let cfg = Config::from_yaml("app:\n  database: bookmarks.db\n  port: 8080\n").unwrap();
        assert_eq!(cfg.app.db_path(Path::new("/srv")), PathBuf::from("/srv/bookmarks.db"));
        assert_eq!(cfg.app.get_port(), 8080);
        assert_eq!(cfg.app.locale, Locale::En);
    }

    #[test]
    fn test_parse_config_with_locale() {
        let cfg =
            Config::from_yaml("app:\n  database: bookmarks.db\n  port: 80\n  locale: fr\n").unwrap();
        assert_eq!(cfg.app.locale, Locale::Fr);
    }

    #[test]
    fn test_substitute_env_default_value() {
        let yaml = "app:\n  database: ${BOOKMARKS_TEST_UNSET_DB:-fallback.db}\n  port: 9000\n";
        let cfg = Config::from_yaml(yaml).unwrap();
        assert_eq!(cfg.app.db_path(Path::new("/srv")), PathBuf::from("/srv/fallback.db"));
    }

    #[test]
    fn test_db_path_resolution() {
        let dir = Path::new("/srv/bookmarks");

        let cfg = Config::from_yaml("app:\n  database: data.db\n  port: 1\n").unwrap();
        assert_eq!(cfg.app.db_path(dir), PathBuf::from("/srv/bookmarks/data.db"));

        let cfg = Config::from_yaml("app:\n  database: \":memory:\"\n  port: 1\n").unwrap();
        assert_eq!(cfg.app.db_path(dir), PathBuf::from(":memory:"));
    }

    #[test]
    fn test_invalid_locale_is_rejected() {
        assert!(Config::from_yaml("app:\n  database: a.db\n  port: 1\n  locale: de\n").is_err());
    }
}
