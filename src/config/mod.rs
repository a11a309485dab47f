// Toolbar definition files
//
// A toolbar file is TOML:
//
//   theme = "dark"
//   items = ["|", { type = "ib", id = "save", icon = "disk" }]
//
//   [bar]
//   iconBaseUrl = "/icons"
//   tooltip = "top"
//
//   [themes.ocean.color.bar]
//   background = "#0b3954"
//
// Items are converted to the same configuration objects `Bar::load` takes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::bar::{Bar, BarOptions};
use crate::error::{ConfigError, ConfigResult};
use crate::theme::ThemeConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolbarFile {
    /// Theme to activate after loading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Item configurations, in order
    #[serde(default)]
    pub items: Vec<toml::Value>,

    /// Bar construction options
    pub bar: BarOptions,

    /// Extra themes to register, keyed by id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub themes: BTreeMap<String, ThemeConfig>,
}

impl ToolbarFile {
    pub fn new(bar: BarOptions) -> Self {
        Self {
            theme: None,
            bar,
            themes: BTreeMap::new(),
            items: Vec::new(),
        }
    }

    /// Parse a toolbar file from TOML text
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a toolbar file from disk
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let file = Self::from_toml(&content)?;
        info!(path = %path.display(), items = file.items.len(), "Loaded toolbar file");
        Ok(file)
    }

    /// Load the toolbar file from the default location
    pub fn load_default() -> ConfigResult<Self> {
        Self::load(&Self::default_path()?)
    }

    /// Write the toolbar file to disk, creating parent directories
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        debug!(path = %path.display(), "Saved toolbar file");
        Ok(())
    }

    /// `$XDG_CONFIG_HOME/tooolbar/toolbar.toml` or the platform equivalent
    pub fn default_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join(crate::APP_NAME).join("toolbar.toml"))
    }

    /// Item configurations as JSON values
    pub fn item_configs(&self) -> ConfigResult<Vec<Value>> {
        self.items
            .iter()
            .map(|item| serde_json::to_value(item).map_err(ConfigError::from))
            .collect()
    }

    /// Capture a bar's options and its full layout
    pub fn from_bar(bar: &Bar) -> ConfigResult<Self> {
        let items = bar
            .dump_layout()
            .into_iter()
            .map(|item| toml::Value::try_from(item).map_err(ConfigError::from))
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self {
            theme: None,
            bar: bar.options().clone(),
            themes: BTreeMap::new(),
            items,
        })
    }

    /// Register themes, build the bar, load the items and switch theme
    pub fn build_bar(&self) -> ConfigResult<Bar> {
        for (id, config) in &self.themes {
            Bar::register_theme(id, config.clone())?;
        }
        let mut bar = Bar::new(self.bar.clone());
        bar.load(self.item_configs()?)?;
        if let Some(theme) = &self.theme {
            bar.set_theme(theme)?;
        }
        Ok(bar)
    }
}
