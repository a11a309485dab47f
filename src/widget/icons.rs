//! Icon selectors
//!
//! An [`IconSelector`] shows one icon out of a keyed set, driven by a
//! [`Limiter`] over the icon indices. [`IconScroller`] cycles with the
//! scroll wheel and settles on pointer-leave; [`IconSwitcher`] is the
//! two-icon circular case toggled by click.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::icon::{Icon, IconSpec};
use super::registry::ToolFactory;
use super::traits::{
    export_config, parse_config, BarContext, BarItem, ItemBase, ScrollDirection, Tool, ToolCommon,
    ToolCore,
};
use crate::error::{Result, ToolbarError};
use crate::event::{EventKind, ToolEvent, ToolValue};
use crate::limiter::Limiter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconSelectorConfig {
    #[serde(flatten)]
    pub common: ToolCommon,
    pub icons: Vec<IconSpec>,
    pub current: String,
    #[serde(default)]
    pub circle: bool,
}

/// Shared state of the icon-selecting tools
#[derive(Debug)]
pub struct IconSelector {
    core: ToolCore,
    icons: Vec<Icon>,
    keys: Vec<String>,
    limiter: Limiter,
}

impl IconSelector {
    /// Validate the icon set and build the selector.
    ///
    /// Every icon needs a `key` and a `label`, keys must be unique and
    /// `current` must name one of them.
    pub fn new(type_name: &'static str, config: IconSelectorConfig, ctx: &BarContext) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut keys = Vec::with_capacity(config.icons.len());
        for spec in &config.icons {
            let key = spec.key.as_ref().ok_or_else(|| ToolbarError::missing("Icon", "key"))?;
            if spec.label.is_none() {
                return Err(ToolbarError::missing("Icon", "label"));
            }
            if !seen.insert(key.as_str()) {
                return Err(ToolbarError::invalid_config(
                    type_name,
                    format!("duplicate icon key \"{}\"", key),
                ));
            }
            keys.push(key.clone());
        }
        let index = keys
            .iter()
            .position(|k| *k == config.current)
            .ok_or_else(|| {
                ToolbarError::invalid_config(
                    type_name,
                    format!("current icon \"{}\" does not exist in icons", config.current),
                )
            })?;
        let limiter = Limiter::new(0, keys.len() as i64 - 1, index as i64, config.circle)?;

        let icons = config
            .icons
            .into_iter()
            .map(|spec| Icon::new(spec, ctx))
            .collect();
        let core = ToolCore::new(type_name, config.common, ctx);

        let mut selector = Self {
            core,
            icons,
            keys,
            limiter,
        };
        selector.render();
        let state = selector.current_key().to_string();
        selector.core.observe_state(state);
        Ok(selector)
    }

    pub fn current_key(&self) -> &str {
        &self.keys[self.limiter.value() as usize]
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn current_icon(&self) -> &Icon {
        &self.icons[self.limiter.value() as usize]
    }

    /// Show the current icon; its label becomes the tooltip's sublabel
    fn render(&mut self) {
        let icon = self.current_icon().clone();
        let label = self.core.common().label.clone();
        self.core.set_tip(label, icon.label().map(str::to_string));
        self.core.clear();
        self.core.mount(icon.element().clone());
    }

    fn export(&self, type_name: &str) -> Value {
        let config = IconSelectorConfig {
            common: self.core.common().clone(),
            icons: self.icons.iter().map(|icon| icon.spec().clone()).collect(),
            current: self.current_key().to_string(),
            circle: self.limiter.circle(),
        };
        export_config(type_name, &config)
    }

    fn select(&mut self, key: &str) -> Result<bool> {
        let index = self.keys.iter().position(|k| k == key).ok_or_else(|| {
            ToolbarError::InvalidValue {
                id: self.core.id().to_string(),
                reason: format!("unknown icon key \"{}\"", key),
            }
        })?;
        Ok(self.limiter.set_value(index as i64))
    }
}

/// Emits `input` from `tool` when the selection moved
fn moved<T: Tool + AsSelector>(tool: &mut T, changed: bool) -> Vec<ToolEvent> {
    if !changed {
        return Vec::new();
    }
    tool.selector_mut().render();
    tool.emit_event(EventKind::Input, None, None, false)
        .into_iter()
        .collect()
}

trait AsSelector {
    fn selector(&self) -> &IconSelector;
    fn selector_mut(&mut self) -> &mut IconSelector;
}

fn set_key<T: Tool + AsSelector>(tool: &mut T, value: ToolValue) -> Result<Vec<ToolEvent>> {
    let key = match value {
        ToolValue::Key(key) => key,
        other => {
            return Err(ToolbarError::InvalidValue {
                id: tool.id().to_string(),
                reason: format!("expected an icon key, got {:?}", other),
            })
        }
    };
    let changed = tool.selector_mut().select(&key)?;
    Ok(moved(tool, changed))
}

macro_rules! selector_tool {
    ($name:ident) => {
        impl AsSelector for $name {
            fn selector(&self) -> &IconSelector {
                &self.selector
            }

            fn selector_mut(&mut self) -> &mut IconSelector {
                &mut self.selector
            }
        }

        impl BarItem for $name {
            fn base(&self) -> &ItemBase {
                self.selector.core.base()
            }

            fn base_mut(&mut self) -> &mut ItemBase {
                self.selector.core.base_mut()
            }

            fn clear(&mut self) {
                self.selector.core.clear();
            }

            fn export_config(&self) -> Value {
                self.selector.export(Self::TYPE)
            }

            fn as_tool(&self) -> Option<&dyn Tool> {
                Some(self)
            }

            fn as_tool_mut(&mut self) -> Option<&mut dyn Tool> {
                Some(self)
            }
        }
    };
}

/// Scroll-wheel icon selector
#[derive(Debug)]
pub struct IconScroller {
    selector: IconSelector,
}

impl IconScroller {
    pub const TYPE: &'static str = "IconScroller";

    pub fn new(config: IconSelectorConfig, ctx: &BarContext) -> Result<Self> {
        Ok(Self {
            selector: IconSelector::new(Self::TYPE, config, ctx)?,
        })
    }
}

selector_tool!(IconScroller);

impl Tool for IconScroller {
    fn core(&self) -> &ToolCore {
        &self.selector.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.selector.core
    }

    fn value(&self) -> ToolValue {
        ToolValue::Key(self.selector().current_key().to_string())
    }

    fn set_value(&mut self, value: ToolValue) -> Result<Vec<ToolEvent>> {
        set_key(self, value)
    }

    fn on_scroll(&mut self, direction: ScrollDirection) -> Vec<ToolEvent> {
        let changed = match direction {
            ScrollDirection::Up => self.selector.limiter.inc(),
            ScrollDirection::Down => self.selector.limiter.dec(),
        };
        moved(self, changed)
    }

    fn on_pointer_leave(&mut self) -> Vec<ToolEvent> {
        self.emit_event(EventKind::Change, None, None, true)
            .into_iter()
            .collect()
    }
}

/// Two-icon toggle
#[derive(Debug)]
pub struct IconSwitcher {
    selector: IconSelector,
}

impl IconSwitcher {
    pub const TYPE: &'static str = "IconSwitcher";

    pub fn new(mut config: IconSelectorConfig, ctx: &BarContext) -> Result<Self> {
        if config.icons.len() != 2 {
            return Err(ToolbarError::invalid_config(
                Self::TYPE,
                format!("must have exactly 2 icons, got {}", config.icons.len()),
            ));
        }
        config.circle = true;
        Ok(Self {
            selector: IconSelector::new(Self::TYPE, config, ctx)?,
        })
    }
}

selector_tool!(IconSwitcher);

impl Tool for IconSwitcher {
    fn core(&self) -> &ToolCore {
        &self.selector.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.selector.core
    }

    fn value(&self) -> ToolValue {
        ToolValue::Key(self.selector().current_key().to_string())
    }

    fn set_value(&mut self, value: ToolValue) -> Result<Vec<ToolEvent>> {
        set_key(self, value)
    }

    fn on_click(&mut self) -> Vec<ToolEvent> {
        let changed = self.selector.limiter.inc();
        let mut events = moved(self, changed);
        events.extend(self.emit_event(EventKind::Change, None, None, false));
        events
    }
}

/// Factory for IconScroller
pub struct IconScrollerFactory;

impl ToolFactory for IconScrollerFactory {
    fn type_name(&self) -> &'static str {
        IconScroller::TYPE
    }

    fn create(&self, config: &Value, ctx: &BarContext) -> Result<Box<dyn BarItem>> {
        let config: IconSelectorConfig = parse_config(IconScroller::TYPE, config)?;
        Ok(Box::new(IconScroller::new(config, ctx)?))
    }
}

/// Factory for IconSwitcher
pub struct IconSwitcherFactory;

impl ToolFactory for IconSwitcherFactory {
    fn type_name(&self) -> &'static str {
        IconSwitcher::TYPE
    }

    fn create(&self, config: &Value, ctx: &BarContext) -> Result<Box<dyn BarItem>> {
        let config: IconSelectorConfig = parse_config(IconSwitcher::TYPE, config)?;
        Ok(Box::new(IconSwitcher::new(config, ctx)?))
    }
}
