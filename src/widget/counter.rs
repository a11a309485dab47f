//! Numeric counters
//!
//! A [`Counter`] wraps a [`Limiter`] and shows its value in a number input;
//! scrolling up increments, scrolling down decrements. [`IconCounter`] and
//! [`IconCounter2`] embed one or two counters next to an icon and relay
//! their `input` events under their own id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::icon::{Icon, IconRef, IconSpec};
use super::registry::ToolFactory;
use super::traits::{
    export_config, is_false, parse_config, BarContext, BarItem, ItemBase, ScrollDirection, Tool,
    ToolCommon, ToolCore,
};
use crate::element::Element;
use crate::error::{Result, ToolbarError};
use crate::event::{EventKind, ToolEvent, ToolValue};
use crate::limiter::Limiter;

/// Bounds and current value of one counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeConfig {
    pub min: i64,
    pub max: i64,
    pub value: i64,
    #[serde(default)]
    pub circle: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterConfig {
    #[serde(flatten)]
    pub common: ToolCommon,
    #[serde(flatten)]
    pub range: RangeConfig,
}

/// Bounded number input
#[derive(Debug)]
pub struct Counter {
    core: ToolCore,
    limiter: Limiter,
}

impl Counter {
    pub const TYPE: &'static str = "Counter";

    pub fn new(config: CounterConfig, ctx: &BarContext) -> Result<Self> {
        let range = config.range;
        let limiter = Limiter::new(range.min, range.max, range.value, range.circle)?;
        let core = ToolCore::new(Self::TYPE, config.common, ctx);

        let mut counter = Self { core, limiter };
        counter.render();
        let state = counter.state();
        counter.core.observe_state(state);
        Ok(counter)
    }

    pub fn limiter(&self) -> &Limiter {
        &self.limiter
    }

    pub fn range(&self) -> RangeConfig {
        RangeConfig {
            min: self.limiter.min(),
            max: self.limiter.max(),
            value: self.limiter.value(),
            circle: self.limiter.circle(),
        }
    }

    fn render(&mut self) {
        let input = Element::new("input")
            .with_attribute("type", "number")
            .with_attribute("min", self.limiter.min().to_string())
            .with_attribute("max", self.limiter.max().to_string())
            .with_attribute("value", self.limiter.value().to_string());
        self.core.clear();
        self.core.mount(input);
    }

    fn changed(&mut self, changed: bool) -> Vec<ToolEvent> {
        if !changed {
            return Vec::new();
        }
        self.render();
        self.emit_event(EventKind::Input, None, None, false)
            .into_iter()
            .collect()
    }

    fn set_number(&mut self, value: i64) -> Vec<ToolEvent> {
        let changed = self.limiter.set_value(value);
        self.changed(changed)
    }
}

impl BarItem for Counter {
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
        let config = CounterConfig {
            common: self.core.common().clone(),
            range: self.range(),
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

impl Tool for Counter {
    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn value(&self) -> ToolValue {
        ToolValue::Number(self.limiter.value())
    }

    fn set_value(&mut self, value: ToolValue) -> Result<Vec<ToolEvent>> {
        match value {
            ToolValue::Number(n) => Ok(self.set_number(n)),
            other => Err(ToolbarError::InvalidValue {
                id: self.id().to_string(),
                reason: format!("expected a number, got {:?}", other),
            }),
        }
    }

    fn on_scroll(&mut self, direction: ScrollDirection) -> Vec<ToolEvent> {
        let changed = match direction {
            ScrollDirection::Up => self.limiter.inc(),
            ScrollDirection::Down => self.limiter.dec(),
        };
        self.changed(changed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconCounterConfig {
    #[serde(flatten)]
    pub common: ToolCommon,
    #[serde(flatten)]
    pub icon: IconRef,
    #[serde(flatten)]
    pub range: RangeConfig,
}

/// Icon with an embedded counter; `change` fires when the pointer leaves
#[derive(Debug)]
pub struct IconCounter {
    core: ToolCore,
    icon: Icon,
    icon_ref: IconRef,
    counter: Counter,
}

impl IconCounter {
    pub const TYPE: &'static str = "IconCounter";

    pub fn new(config: IconCounterConfig, ctx: &BarContext) -> Result<Self> {
        let counter = Counter::new(
            CounterConfig {
                common: ToolCommon::new(config.common.id.clone()),
                range: config.range,
            },
            ctx,
        )?;
        let icon = Icon::new(IconSpec::from(&config.icon), ctx);
        let core = ToolCore::new(Self::TYPE, config.common, ctx);

        let mut tool = Self {
            core,
            icon,
            icon_ref: config.icon,
            counter,
        };
        tool.render();
        let state = tool.state();
        tool.core.observe_state(state);
        Ok(tool)
    }

    pub fn counter(&self) -> &Counter {
        &self.counter
    }

    fn render(&mut self) {
        self.core.clear();
        self.core.mount(self.icon.element().clone());
        self.core.mount(self.counter.element().clone());
    }

    fn relay(&mut self, child_events: Vec<ToolEvent>) -> Vec<ToolEvent> {
        if child_events.is_empty() {
            return child_events;
        }
        self.render();
        child_events
            .iter()
            .filter_map(|ev| self.emit_event(ev.kind, Some(ev.origin.as_str()), Some(ev), false))
            .collect()
    }
}

impl BarItem for IconCounter {
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
        let config = IconCounterConfig {
            common: self.core.common().clone(),
            icon: self.icon_ref.clone(),
            range: self.counter.range(),
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

impl Tool for IconCounter {
    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn value(&self) -> ToolValue {
        self.counter.value()
    }

    fn set_value(&mut self, value: ToolValue) -> Result<Vec<ToolEvent>> {
        let events = self.counter.set_value(value).map_err(|_| ToolbarError::InvalidValue {
            id: self.id().to_string(),
            reason: "expected a number".to_string(),
        })?;
        Ok(self.relay(events))
    }

    fn on_scroll(&mut self, direction: ScrollDirection) -> Vec<ToolEvent> {
        let events = self.counter.on_scroll(direction);
        self.relay(events)
    }

    fn on_pointer_leave(&mut self) -> Vec<ToolEvent> {
        self.emit_event(EventKind::Change, None, None, true)
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconCounter2Config {
    #[serde(flatten)]
    pub common: ToolCommon,
    #[serde(flatten)]
    pub icon: IconRef,
    pub min1: i64,
    pub max1: i64,
    pub value1: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label1: Option<String>,
    pub min2: i64,
    pub max2: i64,
    pub value2: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sep: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub circle: bool,
}

/// Icon with two independent counters, e.g. a `width × height` pair
#[derive(Debug)]
pub struct IconCounter2 {
    core: ToolCore,
    icon: Icon,
    config: IconCounter2Config,
    first: Counter,
    second: Counter,
}

impl IconCounter2 {
    pub const TYPE: &'static str = "IconCounter2";

    pub fn new(config: IconCounter2Config, ctx: &BarContext) -> Result<Self> {
        let sub_counter = |suffix: u8, min, max, value, sublabel: &Option<String>| {
            Counter::new(
                CounterConfig {
                    common: ToolCommon {
                        id: format!("{}-{}", config.common.id, suffix),
                        label: config.common.label.clone(),
                        sublabel: sublabel.clone(),
                        ..ToolCommon::default()
                    },
                    range: RangeConfig {
                        min,
                        max,
                        value,
                        circle: config.circle,
                    },
                },
                ctx,
            )
        };
        let first = sub_counter(1, config.min1, config.max1, config.value1, &config.label1)?;
        let second = sub_counter(2, config.min2, config.max2, config.value2, &config.label2)?;

        let icon = Icon::new(IconSpec::from(&config.icon), ctx);
        let mut core = ToolCore::new(Self::TYPE, config.common.clone(), ctx);
        // Per-counter labels move the tooltip onto the counters.
        if config.label1.is_some() || config.label2.is_some() {
            core.set_tip(None, None);
        }

        let mut tool = Self {
            core,
            icon,
            config,
            first,
            second,
        };
        tool.render();
        let state = tool.state();
        tool.core.observe_state(state);
        Ok(tool)
    }

    pub fn counters(&self) -> (&Counter, &Counter) {
        (&self.first, &self.second)
    }

    fn render(&mut self) {
        let sep = self.config.sep.clone().unwrap_or_else(|| "×".to_string());
        self.core.clear();
        self.core.mount(self.icon.element().clone());
        self.core.mount(self.first.element().clone());
        self.core.mount(Element::new("span").with_text(sep));
        self.core.mount(self.second.element().clone());
    }

    fn relay(&mut self, child_events: Vec<ToolEvent>) -> Vec<ToolEvent> {
        if child_events.is_empty() {
            return child_events;
        }
        self.render();
        child_events
            .iter()
            .filter_map(|ev| self.emit_event(ev.kind, Some(ev.origin.as_str()), Some(ev), false))
            .collect()
    }
}

impl BarItem for IconCounter2 {
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
        let mut config = self.config.clone();
        config.common = self.core.common().clone();
        config.value1 = self.first.limiter().value();
        config.value2 = self.second.limiter().value();
        export_config(Self::TYPE, &config)
    }

    fn as_tool(&self) -> Option<&dyn Tool> {
        Some(self)
    }

    fn as_tool_mut(&mut self) -> Option<&mut dyn Tool> {
        Some(self)
    }
}

impl Tool for IconCounter2 {
    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn value(&self) -> ToolValue {
        ToolValue::Pair(self.first.limiter().value(), self.second.limiter().value())
    }

    fn set_value(&mut self, value: ToolValue) -> Result<Vec<ToolEvent>> {
        let (a, b) = value.as_pair().ok_or_else(|| ToolbarError::InvalidValue {
            id: self.id().to_string(),
            reason: format!("expected a pair, got {:?}", value),
        })?;
        let mut events = self.first.set_number(a);
        events.extend(self.second.set_number(b));
        Ok(self.relay(events))
    }

    /// Scrolling over the icon itself does nothing; use the counter parts
    fn on_scroll(&mut self, _direction: ScrollDirection) -> Vec<ToolEvent> {
        Vec::new()
    }

    fn on_scroll_part(&mut self, part: usize, direction: ScrollDirection) -> Vec<ToolEvent> {
        let events = match part {
            0 => self.first.on_scroll(direction),
            1 => self.second.on_scroll(direction),
            _ => return Vec::new(),
        };
        self.relay(events)
    }

    fn on_pointer_leave(&mut self) -> Vec<ToolEvent> {
        self.emit_event(EventKind::Change, None, None, true)
            .into_iter()
            .collect()
    }
}

/// Factory for Counter
pub struct CounterFactory;

impl ToolFactory for CounterFactory {
    fn type_name(&self) -> &'static str {
        Counter::TYPE
    }

    fn create(&self, config: &Value, ctx: &BarContext) -> Result<Box<dyn BarItem>> {
        let config: CounterConfig = parse_config(Counter::TYPE, config)?;
        Ok(Box::new(Counter::new(config, ctx)?))
    }
}

/// Factory for IconCounter
pub struct IconCounterFactory;

impl ToolFactory for IconCounterFactory {
    fn type_name(&self) -> &'static str {
        IconCounter::TYPE
    }

    fn create(&self, config: &Value, ctx: &BarContext) -> Result<Box<dyn BarItem>> {
        let config: IconCounterConfig = parse_config(IconCounter::TYPE, config)?;
        Ok(Box::new(IconCounter::new(config, ctx)?))
    }
}

/// Factory for IconCounter2
pub struct IconCounter2Factory;

impl ToolFactory for IconCounter2Factory {
    fn type_name(&self) -> &'static str {
        IconCounter2::TYPE
    }

    fn create(&self, config: &Value, ctx: &BarContext) -> Result<Box<dyn BarItem>> {
        let config: IconCounter2Config = parse_config(IconCounter2::TYPE, config)?;
        Ok(Box::new(IconCounter2::new(config, ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::traits::TipPosition;
    use serde_json::json;

    fn ctx() -> BarContext {
        BarContext::new("/icons", TipPosition::Bottom)
    }

    fn counter(min: i64, max: i64, value: i64) -> Counter {
        Counter::new(
            CounterConfig {
                common: ToolCommon::new("zoom"),
                range: RangeConfig {
                    min,
                    max,
                    value,
                    circle: false,
                },
            },
            &ctx(),
        )
        .unwrap()
    }

    fn input_value(el: &Element) -> Option<String> {
        el.find("input")
            .and_then(|input| input.attribute("value"))
            .map(str::to_string)
    }

    #[test]
    fn test_counter_scroll_emits_input() {
        let mut counter = counter(0, 3, 2);
        let events = counter.on_scroll(ScrollDirection::Up);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Input);
        assert_eq!(events[0].value, ToolValue::Number(3));
        assert_eq!(input_value(counter.element()).as_deref(), Some("3"));

        // Clamped at max: no change, no event.
        assert!(counter.on_scroll(ScrollDirection::Up).is_empty());
    }

    #[test]
    fn test_counter_set_value_wrong_kind() {
        let mut counter = counter(0, 3, 2);
        let err = counter.set_value(ToolValue::from("left")).unwrap_err();
        assert!(matches!(err, ToolbarError::InvalidValue { .. }));
    }

    #[test]
    fn test_counter_missing_min() {
        let err = CounterFactory
            .create(&json!({ "type": "c", "id": "z", "max": 3, "value": 1 }), &ctx())
            .unwrap_err();
        assert!(matches!(
            err,
            ToolbarError::MissingProperty { ref kind, ref property }
                if kind == "Counter" && property == "min"
        ));
    }

    #[test]
    fn test_counter_inverted_range() {
        let err = CounterFactory
            .create(&json!({ "type": "c", "id": "z", "min": 5, "max": 3, "value": 4 }), &ctx())
            .unwrap_err();
        assert!(matches!(err, ToolbarError::InvalidRange { .. }));
    }

    #[test]
    fn test_counter_extreme_values() {
        let err = CounterFactory
            .create(
                &json!({ "type": "c", "id": "z", "min": i64::MIN, "max": i64::MAX, "value": 0 }),
                &ctx(),
            )
            .unwrap_err();
        assert!(matches!(err, ToolbarError::InvalidRange { .. }));

        let config = json!({ "type": "c", "id": "z", "min": 0, "max": 2, "value": 1, "circle": true });
        let mut item = CounterFactory.create(&config, &ctx()).unwrap();
        let tool = item.as_tool_mut().unwrap();
        tool.set_value(ToolValue::Number(i64::MIN)).unwrap();
        tool.set_value(ToolValue::Number(i64::MAX)).unwrap();
        let value = tool.value().as_number().unwrap();
        assert!((0..=2).contains(&value));
    }

    #[test]
    fn test_icon_counter_change_on_leave_once() {
        let config = json!({
            "type": "ic", "id": "brush", "icon": "brush", "label": "Brush size",
            "min": 1, "max": 10, "value": 4
        });
        let mut item = IconCounterFactory.create(&config, &ctx()).unwrap();
        let tool = item.as_tool_mut().unwrap();

        // Nothing changed since construction.
        assert!(tool.on_pointer_leave().is_empty());

        let input = tool.on_scroll(ScrollDirection::Down);
        assert_eq!(input.len(), 1);
        assert!(input[0].relayed);
        assert_eq!(input[0].tool_type, "IconCounter");

        let change = tool.on_pointer_leave();
        assert_eq!(change.len(), 1);
        assert_eq!(change[0].kind, EventKind::Change);
        assert_eq!(change[0].value, ToolValue::Number(3));
        assert!(tool.on_pointer_leave().is_empty());
    }

    #[test]
    fn test_icon_counter_click_is_swallowed() {
        let config = json!({ "type": "ic", "id": "b", "icon": "b", "min": 1, "max": 3, "value": 1 });
        let mut item = IconCounterFactory.create(&config, &ctx()).unwrap();
        assert!(item.as_tool_mut().unwrap().on_click().is_empty());
    }

    #[test]
    fn test_icon_counter_export() {
        let config = json!({
            "type": "icon-counter", "id": "brush", "icon": "brush", "iconShrink": 1.5,
            "min": 1, "max": 10, "value": 4, "circle": true
        });
        let item = IconCounterFactory.create(&config, &ctx()).unwrap();
        assert_eq!(
            item.export_config(),
            json!({
                "type": "IconCounter", "id": "brush", "icon": "brush", "iconShrink": 1.5,
                "min": 1, "max": 10, "value": 4, "circle": true
            })
        );
    }

    fn dual() -> IconCounter2 {
        let config: IconCounter2Config = serde_json::from_value(json!({
            "id": "size", "icon": "resize", "label": "Size",
            "min1": 1, "max1": 20, "value1": 8,
            "min2": 1, "max2": 20, "value2": 12
        }))
        .unwrap();
        IconCounter2::new(config, &ctx()).unwrap()
    }

    #[test]
    fn test_dual_counter_clamps_independently() {
        let mut tool = dual();
        for _ in 0..15 {
            tool.on_scroll_part(0, ScrollDirection::Up);
        }
        assert_eq!(tool.value(), ToolValue::Pair(20, 12));
        assert_eq!(tool.counters().1.limiter().value(), 12);
    }

    #[test]
    fn test_dual_counter_relay_tags_part() {
        let mut tool = dual();
        let events = tool.on_scroll_part(1, ScrollDirection::Down);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "size");
        assert_eq!(events[0].origin, "size-2");
        assert_eq!(events[0].value, ToolValue::Pair(8, 11));

        assert!(tool.on_scroll(ScrollDirection::Down).is_empty());
        assert!(tool.on_scroll_part(7, ScrollDirection::Down).is_empty());

        let change = tool.on_pointer_leave();
        assert_eq!(change.len(), 1);
        assert!(tool.on_pointer_leave().is_empty());
    }

    #[test]
    fn test_dual_counter_tooltip_and_markup() {
        let tool = dual();
        let el = tool.element();
        assert!(el.has_class("icon-counter2"));
        assert_eq!(el.children()[0].text(), Some("Size"));
        assert!(el.to_markup().contains("<span>×</span>"));

        let config: IconCounter2Config = serde_json::from_value(json!({
            "id": "size", "icon": "resize", "label": "Size", "label1": "W", "label2": "H",
            "min1": 1, "max1": 20, "value1": 8,
            "min2": 1, "max2": 20, "value2": 12
        }))
        .unwrap();
        let labelled = IconCounter2::new(config, &ctx()).unwrap();
        assert_eq!(labelled.core().tip().label(), None);
        assert_eq!(labelled.counters().0.core().tip().sublabel(), Some("W"));
    }

    #[test]
    fn test_dual_counter_set_value_and_export() {
        let mut tool = dual();
        let events = tool.set_value(ToolValue::Pair(2, 3)).unwrap();
        assert_eq!(events.len(), 2);
        let exported = tool.export_config();
        assert_eq!(exported["value1"], 2);
        assert_eq!(exported["value2"], 3);
        assert_eq!(exported["type"], "IconCounter2");
        assert!(exported.get("circle").is_none());
    }
}
