//! Tooolbar Widget Library
//!
//! Declarative toolbars built from configuration objects: icon buttons,
//! counters, icon selectors and separators mounted into a [`Bar`] that
//! renders to an element tree, routes host interactions to its tools and
//! re-broadcasts their click/input/change events. Themes are exposed as
//! CSS custom properties.

pub mod bar;
pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod limiter;
pub mod theme;
pub mod widget;

/// Application name, used as the root CSS class and config directory
pub const APP_NAME: &str = "tooolbar";

// Re-export commonly used types
pub use bar::{Addable, Align, Bar, BarOptions};
pub use config::ToolbarFile;
pub use element::{Element, Host};
pub use error::{ConfigError, ToolbarError};
pub use event::{EventKind, Listener, Listeners, ToolEvent, ToolValue};
pub use limiter::{Limiter, LimiterConfig};
pub use theme::{CssValue, Theme, ThemeConfig, Themes};
pub use widget::{
    global_registry, register_tool_type, BarContext, BarItem, Counter, Divider, IconButton,
    IconCounter, IconCounter2, IconScroller, IconSelector, IconSpec, IconSwitcher, Length,
    ScrollDirection, Spacer, TipPosition, Tool, ToolFactory, ToolRegistry,
};
