//! Typed tool events and listener lists
//!
//! Tools emit [`ToolEvent`]s through their own [`Listeners`]; the bar then
//! re-broadcasts them to its listeners.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Event type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A stateless trigger was activated
    Click,
    /// The value moved during an interaction
    Input,
    /// The value settled on something new
    Change,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Input => "input",
            EventKind::Change => "change",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value of a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolValue {
    /// Stateless tools such as buttons
    None,
    Number(i64),
    Pair(i64, i64),
    /// Key of the selected icon
    Key(String),
}

impl ToolValue {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            ToolValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(i64, i64)> {
        match self {
            ToolValue::Pair(a, b) => Some((*a, *b)),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            ToolValue::Key(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for ToolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolValue::None => f.write_str("null"),
            ToolValue::Number(n) => write!(f, "{}", n),
            ToolValue::Pair(a, b) => write!(f, "{}-{}", a, b),
            ToolValue::Key(key) => f.write_str(key),
        }
    }
}

impl From<i64> for ToolValue {
    fn from(value: i64) -> Self {
        ToolValue::Number(value)
    }
}

impl From<(i64, i64)> for ToolValue {
    fn from((a, b): (i64, i64)) -> Self {
        ToolValue::Pair(a, b)
    }
}

impl From<&str> for ToolValue {
    fn from(key: &str) -> Self {
        ToolValue::Key(key.to_string())
    }
}

/// Payload delivered to listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolEvent {
    pub kind: EventKind,
    /// Id of the emitting tool
    pub id: String,
    /// Type name of the emitting tool
    pub tool_type: String,
    /// Id of the element that fired; a sub-part id for relayed events
    pub origin: String,
    pub value: ToolValue,
    /// Whether this event re-emits an event that was already dispatched
    pub relayed: bool,
}

/// Event handler
pub type Listener = Box<dyn FnMut(&ToolEvent) + Send>;

/// Handlers grouped by event kind, called in registration order
#[derive(Default)]
pub struct Listeners {
    handlers: HashMap<EventKind, Vec<Listener>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Listeners::add`]
    pub fn on<F>(mut self, kind: EventKind, handler: F) -> Self
    where
        F: FnMut(&ToolEvent) + Send + 'static,
    {
        self.add(kind, handler);
        self
    }

    pub fn add<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&ToolEvent) + Send + 'static,
    {
        self.handlers
            .entry(kind)
            .or_default()
            .push(Box::new(handler));
    }

    pub fn extend(&mut self, other: Listeners) {
        for (kind, handlers) in other.handlers {
            self.handlers.entry(kind).or_default().extend(handlers);
        }
    }

    /// Call every handler registered for the event's kind, returning how many ran
    pub fn dispatch(&mut self, event: &ToolEvent) -> usize {
        match self.handlers.get_mut(&event.kind) {
            Some(handlers) => {
                for handler in handlers.iter_mut() {
                    handler(event);
                }
                handlers.len()
            }
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.values().all(Vec::is_empty)
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(kind, handlers)| (kind.as_str(), handlers.len()))
            .collect();
        f.debug_struct("Listeners").field("handlers", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn event(kind: EventKind) -> ToolEvent {
        ToolEvent {
            kind,
            id: "zoom".to_string(),
            tool_type: "Counter".to_string(),
            origin: "zoom".to_string(),
            value: ToolValue::Number(3),
            relayed: false,
        }
    }

    #[test]
    fn test_value_state_strings() {
        assert_eq!(ToolValue::None.to_string(), "null");
        assert_eq!(ToolValue::Number(8).to_string(), "8");
        assert_eq!(ToolValue::Pair(8, 12).to_string(), "8-12");
        assert_eq!(ToolValue::from("left").to_string(), "left");
    }

    #[test]
    fn test_value_json_shape() {
        assert_eq!(serde_json::to_value(ToolValue::None).unwrap(), serde_json::Value::Null);
        assert_eq!(
            serde_json::to_value(ToolValue::Pair(1, 2)).unwrap(),
            serde_json::json!([1, 2])
        );
        let key: ToolValue = serde_json::from_value(serde_json::json!("left")).unwrap();
        assert_eq!(key, ToolValue::Key("left".to_string()));
    }

    #[test]
    fn test_dispatch_by_kind() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut listeners = Listeners::new().on(EventKind::Change, move |e| {
            sink.lock().unwrap().push(e.value.clone());
        });

        assert_eq!(listeners.dispatch(&event(EventKind::Input)), 0);
        assert_eq!(listeners.dispatch(&event(EventKind::Change)), 1);
        assert_eq!(*seen.lock().unwrap(), vec![ToolValue::Number(3)]);
    }

    #[test]
    fn test_extend() {
        let mut listeners = Listeners::new();
        assert!(listeners.is_empty());
        listeners.extend(Listeners::new().on(EventKind::Click, |_| {}));
        assert!(!listeners.is_empty());
    }
}
