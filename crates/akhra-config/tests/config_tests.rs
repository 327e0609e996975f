use akhra_config::{Config, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(cfg.ui_color_enabled);
    assert_eq!(cfg.backup_retention, 5);
    assert!(cfg.operator.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.currency = "EGP".to_string();
    cfg.operator = Some("admin".to_string());
    cfg.last_opened_book = Some("community_fund".to_string());

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(manager.config_path().ends_with("config/config.json"));
    assert!(!manager.config_path().with_extension("json.tmp").exists());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn older_files_without_new_fields_still_load() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));
    std::fs::write(
        manager.config_path(),
        r#"{ "locale": "en-GB", "currency": "GBP" }"#,
    )
    .expect("write");

    let loaded = manager.load().expect("load");
    assert_eq!(loaded.currency, "GBP");
    assert!(loaded.ui_color_enabled);
    assert_eq!(loaded.backup_retention, 5);
}

#[test]
fn backups_can_be_listed_and_restored() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.currency = "EGP".into();
    let name = manager.backup(&cfg, Some("before trip")).expect("backup");
    assert!(name.starts_with("config_"));
    assert!(name.ends_with("_before-trip.json"));

    assert_eq!(manager.list_backups().expect("list"), vec![name.clone()]);
    assert_eq!(manager.restore(&name).expect("restore").currency, "EGP");
    assert!(manager.restore("config_missing.json").is_err());
}
