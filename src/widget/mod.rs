// Toolbar items: capability traits, registry and built-in tools

pub mod button;
pub mod counter;
pub mod icon;
pub mod icons;
pub mod registry;
pub mod separator;
pub mod traits;

pub use button::{IconButton, IconButtonConfig, IconButtonFactory};
pub use counter::{
    Counter, CounterConfig, CounterFactory, IconCounter, IconCounter2, IconCounter2Config,
    IconCounter2Factory, IconCounterConfig, IconCounterFactory, RangeConfig,
};
pub use icon::{Icon, IconRef, IconSpec};
pub use icons::{
    IconScroller, IconScrollerFactory, IconSelector, IconSelectorConfig, IconSwitcher,
    IconSwitcherFactory,
};
pub use registry::{global_registry, register_tool_type, ToolFactory, ToolRegistry};
pub use separator::{
    Divider, DividerConfig, DividerFactory, Length, Spacer, SpacerConfig, SpacerFactory,
};
pub use traits::{
    export_config, parse_config, BarContext, BarItem, ItemBase, ScrollDirection, Tip,
    TipPosition, Tool, ToolCommon, ToolCore,
};
