//! Capability traits shared by every toolbar item
//!
//! [`BarItem`] is the mountable capability: the item owns a root element,
//! can mount child elements into it, clear it and export its configuration.
//! [`Tool`] adds the interactive capability: id, disabled state, tooltip,
//! listeners and de-duplicated event emission. Concrete widgets embed an
//! [`ItemBase`] (or a [`ToolCore`], which embeds one) instead of inheriting.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::{kebab_case, Element};
use crate::error::{Result, ToolbarError};
use crate::event::{EventKind, Listeners, ToolEvent, ToolValue};

/// Scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Scroll up (increments)
    Up,
    /// Scroll down (decrements)
    Down,
}

/// Where tooltips open relative to their tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipPosition {
    Top,
    #[default]
    Bottom,
}

impl TipPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipPosition::Top => "top",
            TipPosition::Bottom => "bottom",
        }
    }
}

/// The narrow view of the bar that widgets get during construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarContext {
    icon_base_url: String,
    tooltip: TipPosition,
}

impl BarContext {
    pub fn new(icon_base_url: impl Into<String>, tooltip: TipPosition) -> Self {
        Self {
            icon_base_url: icon_base_url.into().trim_end_matches('/').to_string(),
            tooltip,
        }
    }

    pub fn icon_base_url(&self) -> &str {
        &self.icon_base_url
    }

    pub fn tooltip(&self) -> TipPosition {
        self.tooltip
    }

    /// Resolve an icon name to its SVG fragment link
    pub fn svg_link(&self, icon: &str) -> String {
        if self.icon_base_url.is_empty() {
            return icon.to_string();
        }
        format!("{}/{}.svg#main", self.icon_base_url, icon)
    }
}

/// Fields every tool accepts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolCommon {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublabel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

impl ToolCommon {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Deserialize a typed configuration, reporting missing fields by name
pub fn parse_config<T: DeserializeOwned>(kind: &str, config: &Value) -> Result<T> {
    T::deserialize(config).map_err(|source| match missing_field(&source) {
        Some(property) => ToolbarError::missing(kind, &property),
        None => ToolbarError::MalformedConfig {
            kind: kind.to_string(),
            source,
        },
    })
}

fn missing_field(err: &serde_json::Error) -> Option<String> {
    let message = err.to_string();
    let rest = message.strip_prefix("missing field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

/// Serialize a typed configuration and tag it with its type name
pub fn export_config<T: Serialize>(type_name: &str, config: &T) -> Value {
    let mut value = serde_json::to_value(config).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.insert("type".to_string(), Value::String(type_name.to_string()));
        value
    } else {
        serde_json::json!({ "type": type_name })
    }
}

/// Owned root element plus the item's type name
#[derive(Debug, Clone)]
pub struct ItemBase {
    type_name: &'static str,
    element: Element,
}

impl ItemBase {
    pub fn new(type_name: &'static str, tag: &str) -> Self {
        Self {
            type_name,
            element: Element::new(tag).with_class(kebab_case(type_name)),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }

    /// Append a child element; nested tools lose their top-level `tool` class
    pub fn mount(&mut self, mut child: Element) {
        child.remove_class("tool");
        self.element.append(child);
    }

    pub fn clear(&mut self) {
        self.element.clear_children();
    }
}

/// Tooltip shown next to a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip {
    position: TipPosition,
    label: Option<String>,
    sublabel: Option<String>,
}

impl Tip {
    pub fn new(position: TipPosition) -> Self {
        Self {
            position,
            label: None,
            sublabel: None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn sublabel(&self) -> Option<&str> {
        self.sublabel.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>, sublabel: Option<String>) {
        self.label = label.filter(|l| !l.is_empty());
        self.sublabel = if self.label.is_some() { sublabel } else { None };
    }

    pub fn render(&self) -> Element {
        let mut el = Element::new("div")
            .with_class("tip")
            .with_attribute("position", self.position.as_str());
        match &self.label {
            Some(label) => {
                el.set_text(Some(label.clone()));
                if let Some(sublabel) = &self.sublabel {
                    el.append(Element::new("br"));
                    el.append(Element::new("span").with_text(sublabel.clone()));
                }
            }
            None => el.set_style("display", "none"),
        }
        el
    }
}

/// State shared by every interactive tool
#[derive(Debug)]
pub struct ToolCore {
    base: ItemBase,
    common: ToolCommon,
    tip: Tip,
    last_state: String,
    listeners: Listeners,
}

impl ToolCore {
    pub fn new(type_name: &'static str, common: ToolCommon, ctx: &BarContext) -> Self {
        let mut base = ItemBase::new(type_name, "li");
        base.element_mut().add_class("tool");
        if let Some(class) = &common.class {
            for token in class.split_whitespace() {
                base.element_mut().add_class(token);
            }
        }
        let mut tip = Tip::new(ctx.tooltip());
        tip.set_label(common.label.clone(), common.sublabel.clone());

        let mut core = Self {
            base,
            common,
            tip,
            last_state: String::new(),
            listeners: Listeners::new(),
        };
        let disabled = core.common.disabled;
        core.set_disabled(disabled);
        core.clear();
        core
    }

    pub fn id(&self) -> &str {
        &self.common.id
    }

    pub fn common(&self) -> &ToolCommon {
        &self.common
    }

    pub fn base(&self) -> &ItemBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    pub fn tip(&self) -> &Tip {
        &self.tip
    }

    /// Change the tooltip text without touching the exported configuration
    pub fn set_tip(&mut self, label: Option<String>, sublabel: Option<String>) {
        self.tip.set_label(label, sublabel);
        let rendered = self.tip.render();
        match self.base.element_mut().children_mut().first_mut() {
            Some(first) => *first = rendered,
            None => self.base.element_mut().append(rendered),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.common.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.common.disabled = disabled;
        if disabled {
            self.base.element_mut().add_class("disabled");
        } else {
            self.base.element_mut().remove_class("disabled");
        }
    }

    /// Remove content but keep the tooltip
    pub fn clear(&mut self) {
        self.base.clear();
        self.base.element_mut().append(self.tip.render());
    }

    pub fn mount(&mut self, child: Element) {
        self.base.mount(child);
    }

    pub fn listeners_mut(&mut self) -> &mut Listeners {
        &mut self.listeners
    }

    /// Record `state` as already observed, so the next state-dependent
    /// event only fires once the state moves away from it
    pub fn observe_state(&mut self, state: String) {
        self.last_state = state;
    }

    /// Apply the suppression rules and deliver the event to this tool's listeners
    pub fn emit(
        &mut self,
        kind: EventKind,
        origin: Option<&str>,
        cause: Option<&ToolEvent>,
        state_dependent: bool,
        value: ToolValue,
        state: String,
    ) -> Option<ToolEvent> {
        if cause.map_or(false, |c| c.relayed) {
            return None;
        }
        if state_dependent {
            if state == self.last_state {
                return None;
            }
            self.last_state = state;
        }
        if self.common.disabled {
            return None;
        }
        let event = ToolEvent {
            kind,
            id: self.common.id.clone(),
            tool_type: self.base.type_name().to_string(),
            origin: origin.unwrap_or(&self.common.id).to_string(),
            value,
            relayed: cause.is_some(),
        };
        self.listeners.dispatch(&event);
        Some(event)
    }
}

// Lets tests call `unwrap_err()` on factory results holding `Box<dyn BarItem>`.
#[cfg(test)]
impl std::fmt::Debug for dyn BarItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarItem").field("type_name", &self.type_name()).finish()
    }
}

/// Mountable capability shared by every toolbar item
pub trait BarItem: Send {
    fn base(&self) -> &ItemBase;

    fn base_mut(&mut self) -> &mut ItemBase;

    /// Canonical type name, e.g. `IconCounter`
    fn type_name(&self) -> &'static str {
        self.base().type_name()
    }

    fn element(&self) -> &Element {
        self.base().element()
    }

    fn mount(&mut self, child: Element) {
        self.base_mut().mount(child);
    }

    fn clear(&mut self) {
        self.base_mut().clear();
    }

    /// Configuration from which the registry rebuilds an equivalent item
    fn export_config(&self) -> Value;

    fn as_tool(&self) -> Option<&dyn Tool> {
        None
    }

    fn as_tool_mut(&mut self) -> Option<&mut dyn Tool> {
        None
    }
}

/// Interactive capability: id, disabled state, tooltip and events
///
/// Interaction handlers return the events that were emitted (already
/// delivered to the tool's own listeners) so the owner can re-broadcast them.
pub trait Tool: BarItem {
    fn core(&self) -> &ToolCore;

    fn core_mut(&mut self) -> &mut ToolCore;

    fn value(&self) -> ToolValue;

    /// Programmatically change the value
    fn set_value(&mut self, value: ToolValue) -> Result<Vec<ToolEvent>>;

    /// String form of the value used for `change` de-duplication
    fn state(&self) -> String {
        self.value().to_string()
    }

    fn id(&self) -> &str {
        self.core().id()
    }

    fn is_disabled(&self) -> bool {
        self.core().is_disabled()
    }

    fn disable(&mut self) {
        self.core_mut().set_disabled(true);
    }

    fn enable(&mut self) {
        self.core_mut().set_disabled(false);
    }

    fn add_event_listener(&mut self, kind: EventKind, listener: crate::event::Listener) {
        self.core_mut().listeners_mut().add(kind, listener);
    }

    fn on_click(&mut self) -> Vec<ToolEvent> {
        Vec::new()
    }

    fn on_scroll(&mut self, _direction: ScrollDirection) -> Vec<ToolEvent> {
        Vec::new()
    }

    /// Scroll over one sub-part (e.g. the second counter of a pair)
    fn on_scroll_part(&mut self, _part: usize, direction: ScrollDirection) -> Vec<ToolEvent> {
        self.on_scroll(direction)
    }

    fn on_pointer_leave(&mut self) -> Vec<ToolEvent> {
        Vec::new()
    }

    /// Emit an event from this tool
    ///
    /// `cause` is the already-dispatched event being relayed, if any;
    /// relays of relays are dropped. A state-dependent event only fires
    /// when [`Tool::state`] differs from the last state-dependent emission.
    fn emit_event(
        &mut self,
        kind: EventKind,
        origin: Option<&str>,
        cause: Option<&ToolEvent>,
        state_dependent: bool,
    ) -> Option<ToolEvent> {
        let value = self.value();
        let state = self.state();
        self.core_mut()
            .emit(kind, origin, cause, state_dependent, value, state)
    }
}
