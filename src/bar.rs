//! The bar: an ordered container of toolbar items
//!
//! The bar owns its children and its root element, indexes tools by id,
//! routes host interactions to the right tool and re-broadcasts every
//! emitted event to its own listeners.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::element::{Element, Host};
use crate::error::{Result, ToolbarError};
use crate::event::{EventKind, Listeners, ToolEvent, ToolValue};
use crate::theme::{themes, Theme, ThemeConfig};
use crate::widget::{
    global_registry, parse_config, BarContext, BarItem, Length, ScrollDirection, TipPosition,
    Tool, ToolRegistry,
};

/// Main-axis alignment of the tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

impl Align {
    pub fn to_css(&self) -> &'static str {
        match self {
            Align::Start => "flex-start",
            Align::Center => "center",
            Align::End => "flex-end",
        }
    }
}

/// Construction options of a bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarOptions {
    /// Base path for icon resources
    pub icon_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub tooltip: TipPosition,
    #[serde(default)]
    pub vertical: bool,
}

impl BarOptions {
    pub fn new(icon_base_url: impl Into<String>) -> Self {
        Self {
            icon_base_url: icon_base_url.into(),
            width: None,
            height: None,
            align: Align::default(),
            tooltip: TipPosition::default(),
            vertical: false,
        }
    }

    /// Parse options from a configuration object; `iconBaseUrl` is required
    pub fn from_value(value: &Value) -> Result<Self> {
        parse_config("Bar", value)
    }
}

/// Anything [`Bar::add`] accepts
pub enum Addable {
    /// A bare type name, e.g. `"|"`
    Name(String),
    /// A configuration object with a `type` field
    Config(Value),
    /// A configuration object plus listeners to attach to the built tool
    Configured { config: Value, listeners: Listeners },
    /// An already constructed item
    Item(Box<dyn BarItem>),
}

impl From<&str> for Addable {
    fn from(name: &str) -> Self {
        Addable::Name(name.to_string())
    }
}

impl From<String> for Addable {
    fn from(name: String) -> Self {
        Addable::Name(name)
    }
}

impl From<Value> for Addable {
    fn from(config: Value) -> Self {
        match config {
            Value::String(name) => Addable::Name(name),
            config => Addable::Config(config),
        }
    }
}

impl From<(Value, Listeners)> for Addable {
    fn from((config, listeners): (Value, Listeners)) -> Self {
        Addable::Configured { config, listeners }
    }
}

impl From<Box<dyn BarItem>> for Addable {
    fn from(item: Box<dyn BarItem>) -> Self {
        Addable::Item(item)
    }
}

/// An ordered row of toolbar items
pub struct Bar {
    options: BarOptions,
    context: BarContext,
    root: Element,
    children: Vec<Box<dyn BarItem>>,
    tools: HashMap<String, usize>,
    listeners: Listeners,
    registry: Option<Arc<ToolRegistry>>,
    bound_to: Option<String>,
}

impl Bar {
    /// Create a bar that resolves types through the process-wide registry
    pub fn new(options: BarOptions) -> Self {
        let context = BarContext::new(options.icon_base_url.clone(), options.tooltip);
        let mut root = Element::new("ul")
            .with_class(crate::APP_NAME)
            .with_class("bar");
        if let Some(width) = &options.width {
            root.set_style("width", width.to_css());
        }
        if let Some(height) = &options.height {
            root.set_style("height", height.to_css());
        }
        root.set_style("--align", options.align.to_css());
        if options.vertical {
            root.set_attribute("vertical", "");
        }

        Self {
            options,
            context,
            root,
            children: Vec::new(),
            tools: HashMap::new(),
            listeners: Listeners::new(),
            registry: None,
            bound_to: None,
        }
    }

    /// Create a bar with its own registry
    pub fn with_registry(options: BarOptions, registry: Arc<ToolRegistry>) -> Self {
        let mut bar = Self::new(options);
        bar.registry = Some(registry);
        bar
    }

    pub fn options(&self) -> &BarOptions {
        &self.options
    }

    pub fn context(&self) -> &BarContext {
        &self.context
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children in render order
    pub fn items(&self) -> impl Iterator<Item = &dyn BarItem> {
        self.children.iter().map(|item| item.as_ref())
    }

    /// Add one item; on error the bar is left unchanged
    pub fn add(&mut self, item: impl Into<Addable>) -> Result<&mut Self> {
        let item = self.build(item.into())?;
        self.mount(item);
        Ok(self)
    }

    /// Add several items in order; nothing is mounted unless all build
    pub fn add_many<I>(&mut self, items: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Addable>,
    {
        let built = self.build_all(items)?;
        for item in built {
            self.mount(item);
        }
        Ok(self)
    }

    /// Replace every child; on error the previous children stay
    pub fn load<I>(&mut self, items: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Addable>,
    {
        let built = self.build_all(items)?;
        self.clear();
        for item in built {
            self.mount(item);
        }
        info!(items = self.children.len(), tools = self.tools.len(), "Loaded bar");
        Ok(self)
    }

    pub fn clear(&mut self) -> &mut Self {
        if !self.children.is_empty() {
            debug!(items = self.children.len(), "Clearing bar");
        }
        self.children.clear();
        self.tools.clear();
        self
    }

    /// Mount a constructed item; a tool id already in use is re-pointed
    pub fn mount(&mut self, item: Box<dyn BarItem>) {
        let index = self.children.len();
        if let Some(tool) = item.as_tool() {
            debug!(id = %tool.id(), tool_type = %item.type_name(), "Mounting tool");
            self.tools.insert(tool.id().to_string(), index);
        } else {
            debug!(item_type = %item.type_name(), "Mounting item");
        }
        self.children.push(item);
    }

    pub fn get(&self, id: &str) -> Option<&dyn Tool> {
        let index = *self.tools.get(id)?;
        self.children[index].as_tool()
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut dyn Tool> {
        let index = *self.tools.get(id)?;
        self.children[index].as_tool_mut()
    }

    /// Configuration of every indexed tool, in child order
    ///
    /// Dividers and spacers are not tools and are left out.
    pub fn dump(&self) -> Vec<Value> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let tool = item.as_tool()?;
                (self.tools.get(tool.id()) == Some(&index)).then(|| item.export_config())
            })
            .collect()
    }

    /// Configuration of every child, separators included
    pub fn dump_layout(&self) -> Vec<Value> {
        self.children.iter().map(|item| item.export_config()).collect()
    }

    pub fn svg_link(&self, icon: &str) -> String {
        self.context.svg_link(icon)
    }

    pub fn add_event_listener<F>(&mut self, kind: EventKind, listener: F)
    where
        F: FnMut(&ToolEvent) + Send + 'static,
    {
        self.listeners.add(kind, listener);
    }

    /// Deliver an event to the bar's listeners, returning how many ran
    pub fn dispatch_event(&mut self, event: &ToolEvent) -> usize {
        self.listeners.dispatch(event)
    }

    pub fn click(&mut self, id: &str) -> Result<Vec<ToolEvent>> {
        self.route(id, |tool| Ok(tool.on_click()))
    }

    pub fn scroll(&mut self, id: &str, direction: ScrollDirection) -> Result<Vec<ToolEvent>> {
        self.route(id, |tool| Ok(tool.on_scroll(direction)))
    }

    pub fn scroll_part(
        &mut self,
        id: &str,
        part: usize,
        direction: ScrollDirection,
    ) -> Result<Vec<ToolEvent>> {
        self.route(id, |tool| Ok(tool.on_scroll_part(part, direction)))
    }

    pub fn pointer_leave(&mut self, id: &str) -> Result<Vec<ToolEvent>> {
        self.route(id, |tool| Ok(tool.on_pointer_leave()))
    }

    pub fn set_value(&mut self, id: &str, value: ToolValue) -> Result<Vec<ToolEvent>> {
        self.route(id, |tool| tool.set_value(value))
    }

    /// Attach the rendered tree to a host mount point
    ///
    /// Binding again, to the same or another mount point, replaces the
    /// tree the host already holds there.
    pub fn bind_to<H: Host + ?Sized>(&mut self, host: &mut H, selector: &str) -> Result<&mut Self> {
        if !host.attach(selector, self.render()) {
            return Err(ToolbarError::InvalidContainer(selector.to_string()));
        }
        info!(selector = %selector, "Bound bar to container");
        self.bound_to = Some(selector.to_string());
        Ok(self)
    }

    pub fn bound_to(&self) -> Option<&str> {
        self.bound_to.as_deref()
    }

    /// Push the current tree to the mount point the bar is bound to
    pub fn refresh<H: Host + ?Sized>(&self, host: &mut H) -> Result<()> {
        let selector = self
            .bound_to
            .as_deref()
            .ok_or_else(|| ToolbarError::InvalidContainer("<unbound>".to_string()))?;
        if !host.attach(selector, self.render()) {
            return Err(ToolbarError::InvalidContainer(selector.to_string()));
        }
        debug!(selector = %selector, items = self.children.len(), "Refreshed bound tree");
        Ok(())
    }

    /// Current element tree: the root with every child's element
    pub fn render(&self) -> Element {
        let mut root = self.root.clone();
        for item in &self.children {
            root.append(item.element().clone());
        }
        root
    }

    /// Register a theme in the process-wide theme set
    pub fn register_theme(id: &str, config: ThemeConfig) -> Result<Theme> {
        themes().register(id, config)
    }

    /// Id of the active theme, or `"none"`
    pub fn theme(&self) -> String {
        themes()
            .current()
            .map_or_else(|| "none".to_string(), |theme| theme.id().to_string())
    }

    pub fn set_theme(&self, id: &str) -> Result<()> {
        themes().switch(id).map(|_| ())
    }

    /// Stylesheet of the active theme
    pub fn theme_css(&self) -> Option<String> {
        themes().current().map(Theme::css)
    }

    fn instantiate(&self, config: &Value) -> Result<Box<dyn BarItem>> {
        match &self.registry {
            Some(registry) => registry.instantiate(config, &self.context),
            None => global_registry().instantiate(config, &self.context),
        }
    }

    fn build(&self, item: Addable) -> Result<Box<dyn BarItem>> {
        match item {
            Addable::Name(name) => self.instantiate(&serde_json::json!({ "type": name })),
            Addable::Config(config) => self.instantiate(&config),
            Addable::Configured { config, listeners } => {
                let mut item = self.instantiate(&config)?;
                match item.as_tool_mut() {
                    Some(tool) => tool.core_mut().listeners_mut().extend(listeners),
                    None => debug!(
                        item_type = %item.type_name(),
                        "Ignoring listeners on a non-interactive item"
                    ),
                }
                Ok(item)
            }
            Addable::Item(item) => Ok(item),
        }
    }

    fn build_all<I>(&self, items: I) -> Result<Vec<Box<dyn BarItem>>>
    where
        I: IntoIterator,
        I::Item: Into<Addable>,
    {
        items
            .into_iter()
            .map(|item| self.build(item.into()))
            .collect()
    }

    fn route<F>(&mut self, id: &str, interact: F) -> Result<Vec<ToolEvent>>
    where
        F: FnOnce(&mut dyn Tool) -> Result<Vec<ToolEvent>>,
    {
        let index = *self
            .tools
            .get(id)
            .ok_or_else(|| ToolbarError::ToolNotFound(id.to_string()))?;
        let tool = self.children[index]
            .as_tool_mut()
            .ok_or_else(|| ToolbarError::ToolNotFound(id.to_string()))?;
        if tool.is_disabled() {
            return Ok(Vec::new());
        }
        let events = interact(tool)?;
        for event in &events {
            self.listeners.dispatch(event);
        }
        Ok(events)
    }
}

impl std::fmt::Debug for Bar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bar")
            .field("options", &self.options)
            .field(
                "children",
                &self.children.iter().map(|c| c.type_name()).collect::<Vec<_>>(),
            )
            .field("tools", &self.tools)
            .field("bound_to", &self.bound_to)
            .finish()
    }
}
