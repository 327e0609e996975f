use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Stores user-configurable CLI preferences and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub currency: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_book: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// User name of the operator signed in through `login`.
    pub operator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for books. Defaults to `<base>/books`.
    pub book_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for backups. Defaults to `<base>/backups`.
    pub backup_root: Option<PathBuf>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            last_opened_book: None,
            operator: None,
            book_root: None,
            backup_root: None,
            backup_retention: Self::default_backup_retention(),
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::set`].
    pub const KEYS: [&'static str; 6] = [
        "currency",
        "ui_color_enabled",
        "operator",
        "book_root",
        "backup_root",
        "backup_retention",
    ];

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn resolve_book_root(&self, base: &Path) -> PathBuf {
        self.book_root
            .clone()
            .unwrap_or_else(|| base.join("books"))
    }

    pub fn resolve_backup_root(&self, base: &Path) -> PathBuf {
        self.backup_root
            .clone()
            .unwrap_or_else(|| base.join("backups"))
    }

    /// Updates a single preference from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "currency" if !value.is_empty() => self.currency = value.to_ascii_uppercase(),
            "currency" => return Err(invalid()),
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid()),
                }
            }
            "operator" => self.operator = optional(value).map(str::to_string),
            "book_root" => self.book_root = optional(value).map(PathBuf::from),
            "backup_root" => self.backup_root = optional(value).map(PathBuf::from),
            "backup_retention" => {
                let retention: usize = value.parse().map_err(|_| invalid())?;
                if retention == 0 {
                    return Err(invalid());
                }
                self.backup_retention = retention;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn optional(value: &str) -> Option<&str> {
    match value {
        "" | "-" | "none" => None,
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_updates_known_keys() {
        let mut cfg = Config::default();
        cfg.set("currency", "eur").expect("currency");
        cfg.set("ui_color_enabled", "off").expect("color");
        cfg.set("backup_retention", "3").expect("retention");
        cfg.set("book_root", "/srv/books").expect("root");
        assert_eq!(cfg.currency, "EUR");
        assert!(!cfg.ui_color_enabled);
        assert_eq!(cfg.backup_retention, 3);
        assert_eq!(cfg.book_root, Some(PathBuf::from("/srv/books")));

        cfg.set("book_root", "none").expect("clear root");
        assert_eq!(cfg.book_root, None);
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("theme", "dark"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("currency", "  "),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("backup_retention", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("ui_color_enabled", "maybe").is_err());
    }

    #[test]
    fn roots_default_under_base() {
        let cfg = Config::default();
        let base = Path::new("/tmp/akhra");
        assert_eq!(cfg.resolve_book_root(base), base.join("books"));
        assert_eq!(cfg.resolve_backup_root(base), base.join("backups"));
    }
}
