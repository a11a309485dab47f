//! Integration tests for Tooolbar
//!
//! These tests verify that the registry, the bar, themes and toolbar files
//! work together without a host document.

use std::sync::Arc;

use serde_json::{json, Value};
use tooolbar::widget::{parse_config, ItemBase, SpacerConfig};
use tooolbar::{
    register_tool_type, Bar, BarContext, BarItem, BarOptions, Element, ScrollDirection, ToolFactory,
    ToolRegistry, ToolValue, ToolbarError, ToolbarFile,
};

fn ctx() -> BarContext {
    BarContext::new("/icons", Default::default())
}

fn bar() -> Bar {
    Bar::with_registry(
        BarOptions::new("/icons"),
        Arc::new(ToolRegistry::with_builtins()),
    )
}

fn sample_items() -> Vec<Value> {
    vec![
        json!({ "type": "ib", "id": "save", "icon": "disk", "label": "Save" }),
        json!("|"),
        json!({ "type": "c", "id": "zoom", "min": 1, "max": 5, "value": 2 }),
        json!({
            "type": "ic", "id": "brush", "icon": "brush", "label": "Brush size",
            "min": 1, "max": 10, "value": 4
        }),
        json!({ "type": "-" }),
        json!({
            "type": "ic2", "id": "size", "icon": "resize", "label": "Size",
            "min1": 1, "max1": 20, "value1": 8, "min2": 1, "max2": 20, "value2": 12
        }),
        json!({
            "type": "is", "id": "shape", "label": "Shape", "current": "square",
            "icons": [
                { "key": "circle", "icon": "circle", "label": "Circle" },
                { "key": "square", "icon": "square", "label": "Square" }
            ]
        }),
        json!({
            "type": "iw", "id": "side", "label": "Side", "current": "left",
            "icons": [
                { "key": "left", "icon": "align-left", "label": "Left" },
                { "key": "right", "icon": "align-right", "label": "Right" }
            ]
        }),
    ]
}

// Every built-in type rebuilds into an equal tool from its own export
#[test]
fn test_export_round_trip_for_builtins() {
    let registry = ToolRegistry::with_builtins();
    for config in sample_items() {
        let config = match config {
            Value::String(name) => json!({ "type": name }),
            config => config,
        };
        let item = registry.instantiate(&config, &ctx()).unwrap();
        let exported = item.export_config();
        assert_eq!(exported["type"], item.type_name());

        let rebuilt = registry.instantiate(&exported, &ctx()).unwrap();
        assert_eq!(rebuilt.type_name(), item.type_name());
        assert_eq!(rebuilt.export_config(), exported);
        if let (Some(a), Some(b)) = (item.as_tool(), rebuilt.as_tool()) {
            assert_eq!(a.value(), b.value(), "value differs for {}", item.type_name());
        }
    }
}

#[test]
fn test_dump_load_dump_is_stable() {
    let mut bar = bar();
    bar.load(sample_items()).unwrap();
    assert_eq!(bar.len(), 8);

    // Move a few values away from their defaults first
    bar.set_value("zoom", ToolValue::Number(4)).unwrap();
    bar.set_value("size", ToolValue::Pair(3, 7)).unwrap();
    bar.click("side").unwrap();

    let dump = bar.dump();
    assert_eq!(dump.len(), 6, "dividers and spacers are not dumped");

    let mut copy = empty_like(&bar);
    copy.load(dump.clone()).unwrap();
    assert_eq!(copy.dump(), dump);
    assert_eq!(copy.get("size").unwrap().value(), ToolValue::Pair(3, 7));
    assert_eq!(copy.get("side").unwrap().value(), ToolValue::from("right"));
}

#[test]
fn test_dump_layout_keeps_separators() {
    let mut bar = bar();
    bar.load(sample_items()).unwrap();
    let layout = bar.dump_layout();
    assert_eq!(layout.len(), 8);
    assert_eq!(layout[1], json!({ "type": "Divider" }));
    assert_eq!(layout[4], json!({ "type": "Spacer" }));

    let mut copy = empty_like(&bar);
    copy.load(layout.clone()).unwrap();
    assert_eq!(copy.dump_layout(), layout);
}

#[test]
fn test_failed_add_leaves_bar_unchanged() {
    let mut bar = bar();
    bar.load(sample_items()).unwrap();
    let before = bar.dump_layout();

    let err = bar.add(json!({ "type": "gauge", "id": "g" })).unwrap_err();
    assert!(matches!(err, ToolbarError::UnknownType(ref t) if t == "gauge"));

    let err = bar
        .add_many(vec![json!("|"), json!({ "type": "c", "id": "bad", "max": 3, "value": 1 })])
        .unwrap_err();
    assert!(matches!(
        err,
        ToolbarError::MissingProperty { ref kind, ref property }
            if kind == "Counter" && property == "min"
    ));

    assert_eq!(bar.dump_layout(), before);
}

#[test]
fn test_render_markup() {
    let mut bar = bar();
    bar.load(sample_items()).unwrap();
    let markup = bar.render().to_markup();

    assert!(markup.starts_with("<ul class=\"tooolbar bar\""));
    assert!(markup.contains("class=\"icon-button tool\""));
    assert!(markup.contains("xlink:href=\"/icons/disk.svg#main\""));
    assert!(markup.contains("type=\"number\""));
    assert!(markup.contains("class=\"divider\""));
}

#[test]
fn test_bind_to_host_document() {
    let mut document = Element::new("body");
    document.append(Element::new("main").with_attribute("id", "editor"));

    let mut bar = bar();
    bar.add(json!({ "type": "ib", "id": "undo", "icon": "undo" })).unwrap();
    bar.bind_to(&mut document, "#editor").unwrap();

    let mounted = document.find("#editor").unwrap();
    assert!(mounted.find(".bar").unwrap().find(".icon-button").is_some());
}

// The host tree follows the bar after a refresh, and rebinding never stacks roots
#[test]
fn test_refresh_keeps_host_in_sync() {
    let mut document = Element::new("body");
    document.append(Element::new("main").with_attribute("id", "editor"));

    let mut bar = bar();
    bar.add(json!({ "type": "c", "id": "zoom", "min": 1, "max": 5, "value": 2 }))
        .unwrap();
    bar.bind_to(&mut document, "#editor").unwrap();

    bar.scroll("zoom", ScrollDirection::Up).unwrap();
    bar.refresh(&mut document).unwrap();
    let input = document.find("#editor").unwrap().find("input").unwrap();
    assert_eq!(input.attribute("value"), Some("3"));

    bar.clear();
    bar.refresh(&mut document).unwrap();
    let mounted = document.find("#editor").unwrap();
    assert_eq!(mounted.children().len(), 1);
    assert!(mounted.find(".bar").unwrap().children().is_empty());

    bar.bind_to(&mut document, "#editor").unwrap();
    assert_eq!(document.find("#editor").unwrap().children().len(), 1);
}

struct Gauge;

struct GaugeItem {
    base: ItemBase,
    config: SpacerConfig,
}

impl BarItem for GaugeItem {
    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn export_config(&self) -> Value {
        tooolbar::widget::export_config("Gauge", &self.config)
    }
}

impl ToolFactory for Gauge {
    fn type_name(&self) -> &'static str {
        "Gauge"
    }

    fn create(&self, config: &Value, _ctx: &BarContext) -> tooolbar::error::Result<Box<dyn BarItem>> {
        let config: SpacerConfig = parse_config("Gauge", config)?;
        Ok(Box::new(GaugeItem {
            base: ItemBase::new("Gauge", "li"),
            config,
        }))
    }
}

// Third-party types registered globally are available to every new bar
#[test]
fn test_custom_tool_type() {
    register_tool_type(Gauge, &["gauge-x", "GaugeX"]);

    let mut bar = Bar::new(BarOptions::new("/icons"));
    bar.add("gauge-x").unwrap();
    bar.add(json!({ "type": "GaugeX", "width": 64 })).unwrap();

    let layout = bar.dump_layout();
    assert_eq!(layout[0], json!({ "type": "Gauge" }));
    assert_eq!(layout[1], json!({ "type": "Gauge", "width": 64.0 }));
    assert!(bar.render().find(".gauge").is_some());
}

#[test]
fn test_registry_overwrite_per_alias() {
    let mut registry = ToolRegistry::with_builtins();
    registry.register(Gauge, &["|"]);
    let bar_registry = Arc::new(registry);

    let mut bar = Bar::with_registry(BarOptions::new("/icons"), bar_registry);
    bar.add_many(["|", "d"]).unwrap();
    let types: Vec<_> = bar.items().map(|item| item.type_name()).collect();
    assert_eq!(types, ["Gauge", "Divider"]);
}

#[test]
fn test_toolbar_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("toolbar.toml");

    let mut bar = bar();
    bar.load(sample_items()).unwrap();
    bar.set_value("brush", ToolValue::Number(9)).unwrap();

    let file = ToolbarFile::from_bar(&bar).unwrap();
    file.save(&path).unwrap();

    let loaded = ToolbarFile::load(&path).unwrap();
    assert_eq!(loaded.bar, *bar.options());
    assert_eq!(loaded.items.len(), 8);

    let rebuilt = loaded.build_bar().unwrap();
    assert_eq!(rebuilt.dump(), bar.dump());
    assert_eq!(rebuilt.get("brush").unwrap().value(), ToolValue::Number(9));
}

// Themes are process-wide, so every theme assertion lives in this one test
#[test]
fn test_theme_switching() {
    let bar = bar();
    assert!(matches!(
        bar.set_theme("sepia").unwrap_err(),
        ToolbarError::UnknownTheme(_)
    ));

    let file = ToolbarFile::from_toml(
        r##"
theme = "ocean"

[bar]
iconBaseUrl = "/icons"

[themes.ocean.color.bar]
background = "#0b3954"
"##,
    )
    .unwrap();
    let themed = file.build_bar().unwrap();
    assert_eq!(themed.theme(), "ocean");
    let css = themed.theme_css().unwrap();
    assert!(css.contains("#0b3954"));

    bar.set_theme("dark").unwrap();
    assert_eq!(bar.theme(), "dark");
    assert_eq!(themed.theme(), "dark");

    bar.set_theme("light").unwrap();
    assert_eq!(bar.theme(), "light");
}

/// A fresh, empty bar sharing the options of `other`
fn empty_like(other: &Bar) -> Bar {
    Bar::with_registry(
        other.options().clone(),
        Arc::new(ToolRegistry::with_builtins()),
    )
}
