//! SVG icon element used inside buttons, counters and icon selectors

use serde::{Deserialize, Serialize};

use super::traits::BarContext;
use crate::element::Element;

/// One icon entry, as listed in an icon selector's `icons`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSpec {
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Shrink steps of a tenth each; fractional steps are allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_shrink: Option<f64>,
}

impl IconSpec {
    pub fn new(icon: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            key: None,
            label: None,
            icon_shrink: None,
        }
    }

    pub fn keyed(key: impl Into<String>, icon: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            key: Some(key.into()),
            label: Some(label.into()),
            icon_shrink: None,
        }
    }
}

/// The icon fields of single-icon tools; the label belongs to the tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconRef {
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_shrink: Option<f64>,
}

impl From<&IconRef> for IconSpec {
    fn from(icon: &IconRef) -> Self {
        Self {
            icon: icon.icon.clone(),
            key: None,
            label: None,
            icon_shrink: icon.icon_shrink,
        }
    }
}

/// A rendered icon
#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    spec: IconSpec,
    element: Element,
}

impl Icon {
    pub fn new(spec: IconSpec, ctx: &BarContext) -> Self {
        let mut element = Element::new("svg").with_class("icon");
        if let Some(shrink) = spec.icon_shrink.filter(|s| *s != 0.0) {
            element.set_style("transform", format!("scale({})", scale_factor(shrink)));
        }
        element.append(Element::new("use").with_attribute("xlink:href", ctx.svg_link(&spec.icon)));
        Self { spec, element }
    }

    pub fn spec(&self) -> &IconSpec {
        &self.spec
    }

    pub fn key(&self) -> Option<&str> {
        self.spec.key.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.spec.label.as_deref()
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

/// CSS scale for `shrink` tenths, rounded to drop float noise
fn scale_factor(shrink: f64) -> f64 {
    ((1.0 - 0.1 * shrink) * 1000.0).round() / 1000.0
}
