//! Retained element tree handed to the host UI framework
//!
//! Widgets own their root [`Element`] and rebuild its children whenever
//! their state changes. The host renders the tree; [`Element::to_markup`]
//! serialises it for inspection and tests.

use std::collections::BTreeMap;
use std::fmt::Write as _;

const VOID_TAGS: &[&str] = &["br", "input", "use"];

/// A node in the widget tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !class.is_empty() && !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.styles.insert(property.into(), value.into());
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Element> {
        &mut self.children
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Whether this node matches a simple selector: `#id`, `.class` or a tag name
    pub fn matches(&self, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            self.attribute("id") == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.has_class(class)
        } else {
            !selector.is_empty() && self.tag == selector
        }
    }

    /// Depth-first search for the first node matching `selector`
    pub fn find(&self, selector: &str) -> Option<&Element> {
        if self.matches(selector) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(selector))
    }

    pub fn find_mut(&mut self, selector: &str) -> Option<&mut Element> {
        if self.matches(selector) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(selector))
    }

    /// Serialise the tree as HTML-like markup
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attributes {
            if value.is_empty() {
                let _ = write!(out, " {}", name);
            } else {
                let _ = write!(out, " {}=\"{}\"", name, escape(value));
            }
        }
        if !self.styles.is_empty() {
            let style: Vec<String> = self
                .styles
                .iter()
                .map(|(k, v)| format!("{}: {};", k, v))
                .collect();
            let _ = write!(out, " style=\"{}\"", escape(&style.join(" ")));
        }
        if VOID_TAGS.contains(&self.tag.as_str()) && self.text.is_none() && self.children.is_empty()
        {
            out.push_str(" />");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_markup(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A host-side mount point registry that a bar can be bound to
pub trait Host {
    /// Attach `root` under the node resolved by `selector`.
    ///
    /// A bar root already mounted there (a direct child carrying the
    /// application class) is replaced in place, so attaching again
    /// refreshes the tree instead of mounting a second copy.
    ///
    /// Returns `false` when the selector does not resolve.
    fn attach(&mut self, selector: &str, root: Element) -> bool;
}

impl Host for Element {
    fn attach(&mut self, selector: &str, root: Element) -> bool {
        let Some(target) = self.find_mut(selector) else {
            return false;
        };
        match target
            .children
            .iter_mut()
            .find(|child| child.has_class(crate::APP_NAME))
        {
            Some(mounted) => *mounted = root,
            None => target.append(root),
        }
        true
    }
}

/// Kebab-case a type name: `IconCounter2` becomes `icon-counter2`
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("IconCounter2"), "icon-counter2");
        assert_eq!(kebab_case("Divider"), "divider");
        assert_eq!(kebab_case("IconButton"), "icon-button");
    }

    #[test]
    fn test_markup() {
        let mut el = Element::new("li").with_class("counter").with_class("tool");
        el.append(
            Element::new("input")
                .with_attribute("type", "number")
                .with_attribute("value", "8"),
        );
        assert_eq!(
            el.to_markup(),
            "<li class=\"counter tool\"><input type=\"number\" value=\"8\" /></li>"
        );
    }

    #[test]
    fn test_empty_attribute_and_escape() {
        let el = Element::new("ul")
            .with_attribute("vertical", "")
            .with_text("a < b");
        assert_eq!(el.to_markup(), "<ul vertical>a &lt; b</ul>");
    }

    #[test]
    fn test_find_and_attach() {
        let mut doc = Element::new("body");
        doc.append(Element::new("div").with_attribute("id", "toolbar"));

        assert!(doc.attach("#toolbar", Element::new("ul")));
        assert_eq!(doc.find("#toolbar").unwrap().children().len(), 1);
        assert!(!doc.attach("#missing", Element::new("ul")));
        assert!(doc.find("ul").is_some());
    }

    #[test]
    fn test_attach_replaces_mounted_root() {
        let mut doc = Element::new("body");
        let mut mount = Element::new("div").with_attribute("id", "toolbar");
        mount.append(Element::new("p"));
        doc.append(mount);

        let first = Element::new("ul").with_class(crate::APP_NAME).with_text("one");
        let second = Element::new("ul").with_class(crate::APP_NAME).with_text("two");
        assert!(doc.attach("#toolbar", first));
        assert!(doc.attach("#toolbar", second));

        let mount = doc.find("#toolbar").unwrap();
        assert_eq!(mount.children().len(), 2);
        assert_eq!(mount.children()[0].tag(), "p");
        assert_eq!(mount.children()[1].text(), Some("two"));
    }

    #[test]
    fn test_class_dedup_and_removal() {
        let mut el = Element::new("li").with_class("tool").with_class("tool");
        assert_eq!(el.classes().len(), 1);
        el.remove_class("tool");
        assert!(!el.has_class("tool"));
    }
}
