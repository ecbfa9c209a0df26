use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "formtree.config.json";

/// App directory configuration (`formtree.config.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Layout-set definitions, relative to the app directory
    #[serde(default = "default_layout_sets_file")]
    pub layout_sets_file: String,

    /// Directory holding one sub-directory per layout-set
    #[serde(default = "default_layouts_dir")]
    pub layouts_dir: String,

    /// Instance metadata
    #[serde(default = "default_instance_file")]
    pub instance_file: String,

    /// Form data, one `<data element id>.json` per data element
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Layout-set to use when the current task does not pick one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_layout_set: Option<String>,
}

fn default_layout_sets_file() -> String {
    "layout-sets.json".to_string()
}

fn default_layouts_dir() -> String {
    "layouts".to_string()
}

fn default_instance_file() -> String {
    "instance.json".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

impl Config {
    /// Load config from an app directory, falling back to defaults
    pub fn load(app_dir: &Path) -> anyhow::Result<Self> {
        let config_path = app_dir.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn layout_sets_path(&self, app_dir: &Path) -> PathBuf {
        app_dir.join(&self.layout_sets_file)
    }

    pub fn layouts_path(&self, app_dir: &Path) -> PathBuf {
        app_dir.join(&self.layouts_dir)
    }

    pub fn instance_path(&self, app_dir: &Path) -> PathBuf {
        app_dir.join(&self.instance_file)
    }

    pub fn data_path(&self, app_dir: &Path) -> PathBuf {
        app_dir.join(&self.data_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout_sets_file: default_layout_sets_file(),
            layouts_dir: default_layouts_dir(),
            instance_file: default_instance_file(),
            data_dir: default_data_dir(),
            default_layout_set: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "layoutSetsFile": "ui/layout-sets.json",
            "layoutsDir": "ui",
            "defaultLayoutSet": "form"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.layout_sets_file, "ui/layout-sets.json");
        assert_eq!(config.layouts_dir, "ui");
        assert_eq!(config.instance_file, "instance.json");
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.default_layout_set.as_deref(), Some("form"));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.layout_sets_file, "layout-sets.json");
        assert_eq!(config.layouts_path(Path::new("/app")), PathBuf::from("/app/layouts"));
        assert!(config.default_layout_set.is_none());
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }
}
