//! Non-interactive layout items: dividers and spacers
//!
//! Neither is a tool, so the bar does not index them by id and `dump()`
//! leaves them out.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::registry::ToolFactory;
use super::traits::{export_config, parse_config, BarContext, BarItem, ItemBase};
use crate::error::Result;

/// A CSS length: bare numbers are pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Length {
    Px(f64),
    Css(String),
}

impl Length {
    pub fn to_css(&self) -> String {
        match self {
            Length::Px(px) => format!("{}px", px),
            Length::Css(css) => css.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DividerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Length>,
}

/// Vertical rule between groups of tools
#[derive(Debug, Clone)]
pub struct Divider {
    base: ItemBase,
    config: DividerConfig,
}

impl Divider {
    pub const TYPE: &'static str = "Divider";

    pub fn new(config: DividerConfig) -> Self {
        let mut base = ItemBase::new(Self::TYPE, "li");
        let height = config
            .height
            .as_ref()
            .map_or_else(|| "40%".to_string(), Length::to_css);
        let margin = config
            .margin
            .as_ref()
            .map_or_else(|| "20px".to_string(), Length::to_css);
        base.element_mut().set_style("height", height);
        base.element_mut().set_style("margin", format!("0 {}", margin));
        Self { base, config }
    }
}

impl BarItem for Divider {
    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn export_config(&self) -> Value {
        export_config(Self::TYPE, &self.config)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpacerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
}

/// Fixed-width gap
#[derive(Debug, Clone)]
pub struct Spacer {
    base: ItemBase,
    config: SpacerConfig,
}

impl Spacer {
    pub const TYPE: &'static str = "Spacer";

    pub fn new(config: SpacerConfig) -> Self {
        let mut base = ItemBase::new(Self::TYPE, "li");
        let width = config
            .width
            .as_ref()
            .map_or_else(|| "20px".to_string(), Length::to_css);
        base.element_mut().set_style("width", width);
        Self { base, config }
    }
}

impl BarItem for Spacer {
    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn export_config(&self) -> Value {
        export_config(Self::TYPE, &self.config)
    }
}

/// Factory for Divider
pub struct DividerFactory;

impl ToolFactory for DividerFactory {
    fn type_name(&self) -> &'static str {
        Divider::TYPE
    }

    fn create(&self, config: &Value, _ctx: &BarContext) -> Result<Box<dyn BarItem>> {
        let config: DividerConfig = parse_config(Divider::TYPE, config)?;
        Ok(Box::new(Divider::new(config)))
    }
}

/// Factory for Spacer
pub struct SpacerFactory;

impl ToolFactory for SpacerFactory {
    fn type_name(&self) -> &'static str {
        Spacer::TYPE
    }

    fn create(&self, config: &Value, _ctx: &BarContext) -> Result<Box<dyn BarItem>> {
        let config: SpacerConfig = parse_config(Spacer::TYPE, config)?;
        Ok(Box::new(Spacer::new(config)))
    }
}
