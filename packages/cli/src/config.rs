use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "uibuilder.config.json";

/// UI builder configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory exported files are written to
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    #[serde(default)]
    pub html: HtmlConfig,

    #[serde(default)]
    pub react: ReactConfig,

    #[serde(default)]
    pub blocks: BlocksConfig,
}

fn default_out_dir() -> String {
    "dist".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HtmlConfig {
    /// One block per line with nested content indented
    pub pretty: bool,
    /// Wrap the export in a full page
    pub standalone: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            standalone: false,
            title: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReactConfig {
    pub typescript: bool,
    pub component_name: String,
    /// Module the component tags are imported from; `null` disables the import
    pub import_module: Option<String>,
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self {
            typescript: true,
            component_name: "GeneratedComponent".to_string(),
            import_module: Some("./components".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlocksConfig {
    pub namespace: String,
}

impl Default for BlocksConfig {
    fn default() -> Self {
        Self {
            namespace: "ui-builder".to_string(),
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("invalid {}", config_path.display()))?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the output directory
    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            html: HtmlConfig::default(),
            react: ReactConfig::default(),
            blocks: BlocksConfig::default(),
        }
    }
}
