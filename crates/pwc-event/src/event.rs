//! Event kinds and payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Discriminates how a viewer should react to an event.
///
/// | Kind | Payload | Viewer Reaction |
/// |------|---------|-----------------|
/// | `Settings` | settings object | Re-render options |
/// | `State` | solve state without solution | Re-render grid/words |
/// | `Complete` | none | Celebrate completion |
/// | `Genius` | none | Celebrate spelling-bee genius |
/// | `ShowClue` | clue reference string | Highlight the clue |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Settings,
    State,
    Complete,
    Genius,
    ShowClue,
}

impl EventKind {
    /// Returns the wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::State => "state",
            Self::Complete => "complete",
            Self::Genius => "genius",
            Self::ShowClue => "show_clue",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change notification delivered to viewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Event {
    /// Creates an event with an explicit payload.
    #[must_use]
    pub fn new(kind: EventKind, payload: Option<Value>) -> Self {
        Self { kind, payload }
    }

    /// Creates a `settings` event carrying the serialized settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` cannot be represented as JSON.
    pub fn settings<S: Serialize>(settings: &S) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventKind::Settings, Some(serde_json::to_value(settings)?)))
    }

    /// Creates a `state` event.
    ///
    /// Callers pass the viewer copy of the state; this constructor does not
    /// strip anything itself.
    ///
    /// # Errors
    ///
    /// Returns an error if `state` cannot be represented as JSON.
    pub fn state<S: Serialize>(state: &S) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventKind::State, Some(serde_json::to_value(state)?)))
    }

    /// Creates a payload-less `complete` event.
    #[must_use]
    pub fn complete() -> Self {
        Self::new(EventKind::Complete, None)
    }

    /// Creates a payload-less `genius` event.
    #[must_use]
    pub fn genius() -> Self {
        Self::new(EventKind::Genius, None)
    }

    /// Creates a `show_clue` event whose payload is the clue reference.
    #[must_use]
    pub fn show_clue(clue: impl Into<String>) -> Self {
        Self::new(EventKind::ShowClue, Some(Value::String(clue.into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_wire_names_match_serde() {
        for kind in [
            EventKind::Settings,
            EventKind::State,
            EventKind::Complete,
            EventKind::Genius,
            EventKind::ShowClue,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, json!(kind.as_str()));
        }
    }

    #[test]
    fn payloadless_events_omit_payload() {
        let json = serde_json::to_value(Event::complete()).unwrap();
        assert_eq!(json, json!({"kind": "complete"}));
        let json = serde_json::to_value(Event::genius()).unwrap();
        assert_eq!(json, json!({"kind": "genius"}));
    }

    #[test]
    fn show_clue_payload_is_the_clue() {
        let json = serde_json::to_value(Event::show_clue("1a")).unwrap();
        assert_eq!(json, json!({"kind": "show_clue", "payload": "1a"}));
    }

    #[test]
    fn settings_event_serializes_value() {
        #[derive(Serialize)]
        struct Settings {
            show_notes: bool,
        }
        let event = Event::settings(&Settings { show_notes: true }).unwrap();
        assert_eq!(event.kind, EventKind::Settings);
        assert_eq!(event.payload, Some(json!({"show_notes": true})));
    }

    #[test]
    fn decodes_without_payload() {
        let event: Event = serde_json::from_str(r#"{"kind":"state"}"#).unwrap();
        assert_eq!(event.kind, EventKind::State);
        assert!(event.payload.is_none());
    }
}
