//! Icon button: a stateless trigger that emits `click`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::icon::{Icon, IconRef, IconSpec};
use super::registry::ToolFactory;
use super::traits::{
    export_config, parse_config, BarContext, BarItem, ItemBase, Tool, ToolCommon, ToolCore,
};
use crate::error::{Result, ToolbarError};
use crate::event::{EventKind, ToolEvent, ToolValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconButtonConfig {
    #[serde(flatten)]
    pub common: ToolCommon,
    #[serde(flatten)]
    pub icon: IconRef,
}

/// Clickable icon
#[derive(Debug)]
pub struct IconButton {
    core: ToolCore,
    icon: Icon,
    config: IconButtonConfig,
}

impl IconButton {
    pub const TYPE: &'static str = "IconButton";

    pub fn new(config: IconButtonConfig, ctx: &BarContext) -> Self {
        let mut core = ToolCore::new(Self::TYPE, config.common.clone(), ctx);
        let icon = Icon::new(IconSpec::from(&config.icon), ctx);
        core.mount(icon.element().clone());
        Self { core, icon, config }
    }

    pub fn icon(&self) -> &Icon {
        &self.icon
    }
}

impl BarItem for IconButton {
    fn base(&self) -> &ItemBase {
        self.core.base()
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        self.core.base_mut()
    }

    fn clear(&mut self) {
        self.core.clear();
    }

    fn export_config(&self) -> Value {
        let config = IconButtonConfig {
            common: self.core.common().clone(),
            icon: self.config.icon.clone(),
        };
        export_config(Self::TYPE, &config)
    }

    fn as_tool(&self) -> Option<&dyn Tool> {
        Some(self)
    }

    fn as_tool_mut(&mut self) -> Option<&mut dyn Tool> {
        Some(self)
    }
}

impl Tool for IconButton {
    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn value(&self) -> ToolValue {
        ToolValue::None
    }

    /// A button has no value; only `ToolValue::None` is accepted
    fn set_value(&mut self, value: ToolValue) -> Result<Vec<ToolEvent>> {
        match value {
            ToolValue::None => Ok(Vec::new()),
            other => Err(ToolbarError::InvalidValue {
                id: self.id().to_string(),
                reason: format!("a button has no value, got {:?}", other),
            }),
        }
    }

    fn on_click(&mut self) -> Vec<ToolEvent> {
        self.emit_event(EventKind::Click, None, None, false)
            .into_iter()
            .collect()
    }
}

/// Factory for IconButton
pub struct IconButtonFactory;

impl ToolFactory for IconButtonFactory {
    fn type_name(&self) -> &'static str {
        IconButton::TYPE
    }

    fn create(&self, config: &Value, ctx: &BarContext) -> Result<Box<dyn BarItem>> {
        let config: IconButtonConfig = parse_config(IconButton::TYPE, config)?;
        Ok(Box::new(IconButton::new(config, ctx)))
    }
}
