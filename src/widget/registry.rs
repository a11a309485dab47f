//! Tool registry for configuration-driven widget creation
//!
//! This module maps type aliases (`"c"`, `"counter"`, `"Counter"`) to
//! factories. It supports:
//!
//! - Type-erased tool factories
//! - Isolated registries (one per bar or per test)
//! - A process-wide default registry that third parties extend with
//!   [`register_tool_type`]
//! - Verification that the constructed item really is the registered type

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::{debug, info};

use super::button::IconButtonFactory;
use super::counter::{CounterFactory, IconCounter2Factory, IconCounterFactory};
use super::icons::{IconScrollerFactory, IconSwitcherFactory};
use super::separator::{DividerFactory, SpacerFactory};
use super::traits::{BarContext, BarItem};
use crate::error::{Result, ToolbarError};

/// Type-erased tool factory
///
/// Custom widgets implement this trait and register it under one or more
/// aliases to extend the configuration vocabulary.
pub trait ToolFactory: Send + Sync {
    /// Canonical type name; the built item must report the same name
    fn type_name(&self) -> &'static str;

    /// Build an item from its configuration object
    fn create(&self, config: &Value, ctx: &BarContext) -> Result<Box<dyn BarItem>>;
}

/// Registry for tool factories
#[derive(Clone, Default)]
pub struct ToolRegistry {
    factories: HashMap<String, Arc<dyn ToolFactory>>,
    type_names: BTreeSet<&'static str>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in tools registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register(IconButtonFactory, &["ib", "icon-button", "IconButton"]);
        registry.register(DividerFactory, &["|", "d", "divider", "Divider"]);
        registry.register(SpacerFactory, &["-", "s", "spacer", "Spacer"]);
        registry.register(CounterFactory, &["c", "counter", "Counter"]);
        registry.register(IconCounterFactory, &["ic", "icon-counter", "IconCounter"]);
        registry.register(IconCounter2Factory, &["ic2", "icon-counter2", "IconCounter2"]);
        registry.register(IconScrollerFactory, &["is", "icon-scroller", "IconScroller"]);
        registry.register(IconSwitcherFactory, &["iw", "icon-switcher", "IconSwitcher"]);

        info!(
            tool_types = ?registry.type_names,
            "Tool registry initialized with built-in tools"
        );

        registry
    }

    /// Register a factory under every alias; later registrations win
    pub fn register<F: ToolFactory + 'static>(&mut self, factory: F, aliases: &[&str]) {
        self.register_shared(Arc::new(factory), aliases);
    }

    pub fn register_shared(&mut self, factory: Arc<dyn ToolFactory>, aliases: &[&str]) {
        let type_name = factory.type_name();
        debug!(tool_type = %type_name, ?aliases, "Registering tool factory");
        for alias in aliases {
            self.factories.insert(alias.to_string(), Arc::clone(&factory));
        }
        self.type_names.insert(type_name);
    }

    /// Check if an alias is registered
    pub fn has_type(&self, alias: &str) -> bool {
        self.factories.contains_key(alias)
    }

    /// Canonical type name an alias currently resolves to
    pub fn resolve(&self, alias: &str) -> Option<&'static str> {
        self.factories.get(alias).map(|f| f.type_name())
    }

    /// All registered aliases, sorted
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }

    /// All canonical type names ever registered
    pub fn type_names(&self) -> Vec<&'static str> {
        self.type_names.iter().copied().collect()
    }

    /// Build an item from a configuration object with a `type` field
    pub fn instantiate(&self, config: &Value, ctx: &BarContext) -> Result<Box<dyn BarItem>> {
        let alias = match config.get("type") {
            Some(Value::String(alias)) => alias.as_str(),
            Some(_) => {
                return Err(ToolbarError::invalid_config(
                    "BarItem",
                    "\"type\" must be a string",
                ))
            }
            None => return Err(ToolbarError::missing("BarItem", "type")),
        };

        let factory = self
            .factories
            .get(alias)
            .ok_or_else(|| ToolbarError::UnknownType(alias.to_string()))?;

        let expected = factory.type_name();
        if !self.type_names.contains(expected) {
            return Err(ToolbarError::TypeMismatch {
                alias: alias.to_string(),
                expected: expected.to_string(),
                found: "unregistered type".to_string(),
            });
        }

        let item = factory.create(config, ctx)?;
        if item.type_name() != expected {
            return Err(ToolbarError::TypeMismatch {
                alias: alias.to_string(),
                expected: expected.to_string(),
                found: item.type_name().to_string(),
            });
        }

        debug!(alias = %alias, tool_type = %expected, "Instantiated bar item");
        Ok(item)
    }

    /// Build an item from a bare type name
    pub fn instantiate_named(&self, name: &str, ctx: &BarContext) -> Result<Box<dyn BarItem>> {
        self.instantiate(&serde_json::json!({ "type": name }), ctx)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("aliases", &self.aliases())
            .field("type_names", &self.type_names)
            .finish()
    }
}

static GLOBAL_REGISTRY: Lazy<RwLock<ToolRegistry>> =
    Lazy::new(|| RwLock::new(ToolRegistry::with_builtins()));

/// Register a tool type in the process-wide registry
pub fn register_tool_type<F: ToolFactory + 'static>(factory: F, aliases: &[&str]) {
    GLOBAL_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(factory, aliases);
}

/// Read access to the process-wide registry
pub fn global_registry() -> RwLockReadGuard<'static, ToolRegistry> {
    GLOBAL_REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}
