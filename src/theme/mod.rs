//! Theming system for toolbar appearance
//!
//! A theme maps semantic design tokens (`color.bar.background`,
//! `size.tool.icon`, ...) to CSS values. Themes are registered once and
//! switched many times; exactly one is active. The active theme's CSS
//! custom properties are what the host injects into its stylesheet.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, ToolbarError};

/// A CSS value: integers render as pixels, everything else verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Number(f64),
    Text(String),
}

impl CssValue {
    pub fn to_css(&self) -> String {
        match self {
            CssValue::Number(n) if n.fract() == 0.0 => format!("{}px", *n as i64),
            CssValue::Number(n) => n.to_string(),
            CssValue::Text(text) => text.clone(),
        }
    }
}

impl From<&str> for CssValue {
    fn from(value: &str) -> Self {
        CssValue::Text(value.to_string())
    }
}

impl From<i64> for CssValue {
    fn from(value: i64) -> Self {
        CssValue::Number(value as f64)
    }
}

/// `group -> component -> token -> value`, e.g. `color -> bar -> background`
pub type ThemeConfig = BTreeMap<String, BTreeMap<String, BTreeMap<String, CssValue>>>;

/// Short names used to build CSS custom property names
fn abbreviation(token: &str) -> Option<char> {
    let abbr = match token {
        "size" => 's',
        "color" => 'c',
        "bar" => 'b',
        "tool" => 't',
        "text" => 'x',
        "tip" => 'p',
        "padding" => 'p',
        "offset" => 'o',
        "height" => 'h',
        "width" => 'w',
        "button" => 'b',
        "icon" => 'i',
        "radius" => 'r',
        "input" => 'i',
        "label" => 'l',
        "sublabel" => 's',
        "normal" => 'n',
        "active" => 'a',
        "markup" => 'm',
        "background" => 'b',
        "outline" => 'o',
        "hover" => 'h',
        _ => return None,
    };
    Some(abbr)
}

fn insert(config: &mut ThemeConfig, path: [&str; 3], value: CssValue) {
    config
        .entry(path[0].to_string())
        .or_default()
        .entry(path[1].to_string())
        .or_default()
        .insert(path[2].to_string(), value);
}

fn light_colors() -> ThemeConfig {
    let mut config = ThemeConfig::new();
    insert(&mut config, ["color", "text", "normal"], "#777".into());
    insert(&mut config, ["color", "text", "markup"], "#bbb".into());
    insert(&mut config, ["color", "bar", "background"], "#f9f9f9".into());
    insert(&mut config, ["color", "bar", "outline"], "#e3e3e3".into());
    insert(&mut config, ["color", "tip", "background"], "white".into());
    insert(&mut config, ["color", "tool", "active"], "#dbdbdb".into());
    insert(&mut config, ["color", "tool", "hover"], "#e3e3e3".into());
    config
}

fn dark_colors() -> ThemeConfig {
    let mut config = ThemeConfig::new();
    insert(&mut config, ["color", "text", "normal"], "#dbdbdb".into());
    insert(&mut config, ["color", "text", "markup"], "#858585".into());
    insert(&mut config, ["color", "bar", "background"], "#2d2d2d".into());
    insert(&mut config, ["color", "bar", "outline"], "#3c3c3c".into());
    insert(&mut config, ["color", "tip", "background"], "#4d4d4d".into());
    insert(&mut config, ["color", "tool", "active"], "#4d4d4d".into());
    insert(&mut config, ["color", "tool", "hover"], "#3c3c3c".into());
    config
}

fn default_sizes() -> ThemeConfig {
    let mut config = ThemeConfig::new();
    insert(&mut config, ["size", "bar", "padding"], 20.into());
    insert(&mut config, ["size", "bar", "height"], "100%".into());
    insert(&mut config, ["size", "bar", "width"], "100%".into());
    insert(&mut config, ["size", "tool", "button"], 32.into());
    insert(&mut config, ["size", "tool", "icon"], 18.into());
    insert(&mut config, ["size", "tool", "radius"], 8.into());
    insert(&mut config, ["size", "tip", "padding"], "10px 16px".into());
    insert(&mut config, ["size", "tip", "offset"], 10.into());
    insert(&mut config, ["size", "text", "input"], 13.into());
    insert(&mut config, ["size", "text", "label"], 14.into());
    insert(&mut config, ["size", "text", "sublabel"], 12.into());
    config
}

/// Tokens every theme starts from: light colours plus the default sizes
pub fn default_config() -> ThemeConfig {
    merge(default_sizes(), light_colors())
}

/// Deep-merge `over` onto `base`; leaf values in `over` win
pub fn merge(over: ThemeConfig, mut base: ThemeConfig) -> ThemeConfig {
    for (group, components) in over {
        let base_group = base.entry(group).or_default();
        for (component, tokens) in components {
            base_group.entry(component).or_default().extend(tokens);
        }
    }
    base
}

/// A registered theme with its fully merged tokens
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    id: String,
    config: ThemeConfig,
}

impl Theme {
    /// Build a theme over the default tokens, rejecting unknown token names
    pub fn new(id: impl Into<String>, config: ThemeConfig) -> Result<Self> {
        for (group, components) in &config {
            check_token(group)?;
            for (component, tokens) in components {
                check_token(component)?;
                for token in tokens.keys() {
                    check_token(token)?;
                }
            }
        }
        Ok(Self {
            id: id.into(),
            config: merge(config, default_config()),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    /// Look up one token value, e.g. `get("color", "bar", "background")`
    pub fn get(&self, group: &str, component: &str, token: &str) -> Option<&CssValue> {
        self.config.get(group)?.get(component)?.get(token)
    }

    /// CSS custom properties as `(name, value)` pairs, e.g. `("--x-cbb", "#f9f9f9")`
    pub fn variables(&self) -> Vec<(String, String)> {
        let mut vars = Vec::new();
        for (group, components) in &self.config {
            for (component, tokens) in components {
                for (token, value) in tokens {
                    // Tokens were validated on construction.
                    let name: String = [group, component, token]
                        .iter()
                        .filter_map(|t| abbreviation(t))
                        .collect();
                    vars.push((format!("--x-{}", name), value.to_css()));
                }
            }
        }
        vars
    }

    /// Stylesheet body for this theme
    pub fn css(&self) -> String {
        let lines: Vec<String> = self
            .variables()
            .into_iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect();
        format!(":root {{\n{}\n}}", lines.join("\n"))
    }
}

fn check_token(token: &str) -> Result<()> {
    match abbreviation(token) {
        Some(_) => Ok(()),
        None => Err(ToolbarError::UnknownThemeToken(token.to_string())),
    }
}

/// The set of registered themes and the active one
#[derive(Debug, Clone)]
pub struct Themes {
    items: BTreeMap<String, Theme>,
    current: Option<String>,
}

impl Themes {
    /// Registry with the built-in `light` and `dark` themes, `light` active
    pub fn new() -> Self {
        let mut items = BTreeMap::new();
        for (id, config) in [("light", ThemeConfig::new()), ("dark", dark_colors())] {
            // Built-in tokens are always valid.
            if let Ok(theme) = Theme::new(id, config) {
                items.insert(id.to_string(), theme);
            }
        }
        Self {
            items,
            current: Some("light".to_string()),
        }
    }

    /// Register (or replace) a theme
    pub fn register(&mut self, id: &str, config: ThemeConfig) -> Result<Theme> {
        let theme = Theme::new(id, config)?;
        self.items.insert(id.to_string(), theme.clone());
        Ok(theme)
    }

    /// Make `id` the active theme
    pub fn switch(&mut self, id: &str) -> Result<&Theme> {
        let theme = self
            .items
            .get(id)
            .ok_or_else(|| ToolbarError::UnknownTheme(id.to_string()))?;
        if self.current.as_deref() != Some(id) {
            info!(theme = %id, "Switching theme");
        }
        self.current = Some(id.to_string());
        Ok(theme)
    }

    pub fn get(&self, id: &str) -> Option<&Theme> {
        self.items.get(id)
    }

    pub fn current(&self) -> Option<&Theme> {
        self.current.as_deref().and_then(|id| self.items.get(id))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.keys().map(String::as_str).collect()
    }
}

impl Default for Themes {
    fn default() -> Self {
        Self::new()
    }
}

static THEMES: Lazy<Mutex<Themes>> = Lazy::new(|| Mutex::new(Themes::new()));

/// The process-wide theme set
pub fn themes() -> MutexGuard<'static, Themes> {
    THEMES.lock().unwrap_or_else(PoisonError::into_inner)
}
