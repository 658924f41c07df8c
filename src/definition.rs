//! Quest definition types.
//!
//! Quest definitions use a YAML DSL:
//!
//! ```yaml
//! quest_name: patrol
//! initial_state: idle
//! states:
//!   idle:
//!     description: "Waiting for trouble"
//!     on_enter:
//!       - action: log_message
//!         message: "waiting"
//!     transitions:
//!       - {to: alert, on: "intruder_seen"}
//!   alert:
//!     on_enter:
//!       - action: log_message
//!         message: "alarm!"
//!     transitions:
//!       - {to: idle, on: "all_clear"}
//! ```

use crate::error::QuestError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};

/// An instruction to execute on entering a state.
///
/// The engine never runs actions itself; it surfaces them as
/// `(name, params)` pairs for the host's dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Handler name, opaque to the engine.
    #[serde(rename = "action")]
    pub name: String,

    /// Remaining keys of the document item, passed through verbatim.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

/// A directed, event-triggered edge out of a state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Target state name.
    pub to: String,

    /// Event that triggers this transition. Exact, case-sensitive match.
    pub on: String,
}

/// A named node in the quest graph.
#[derive(Debug, Clone)]
pub struct State {
    /// Unique name within a definition.
    pub name: String,

    /// Free text, non-semantic.
    pub description: String,

    /// Entry actions, in declaration order.
    pub on_enter: Vec<Action>,

    /// Outgoing transitions, evaluated in declaration order.
    pub transitions: Vec<Transition>,
}

/// Raw state body as written in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateBody {
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub on_enter: Vec<Action>,

    /// Kept as raw values so sparse or templated documents can leave
    /// null/empty placeholders, which are skipped at build time.
    #[serde(default)]
    pub transitions: Vec<Value>,
}

/// Raw quest definition as parsed from the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestDefinitionRaw {
    pub quest_name: String,

    /// State entered on `start()`. Resolved lazily, not at load time.
    pub initial_state: String,

    pub states: BTreeMap<String, StateBody>,
}

/// Built and indexed quest definition.
///
/// Immutable once built; safe to share read-only (e.g. behind an `Arc`)
/// across any number of running chroniclers.
#[derive(Debug, Clone)]
pub struct QuestDefinition {
    /// Quest name, used for logging and diagnostics.
    pub name: String,

    /// Initial state name.
    pub initial_state: String,

    /// States indexed by name.
    states: HashMap<String, State>,

    /// Original raw definition for round-tripping.
    pub raw: QuestDefinitionRaw,

    /// Hash of the definition for integrity checks.
    pub checksum: String,
}

impl QuestDefinition {
    /// Builds a quest definition from a generic parsed tree.
    pub fn from_value(value: &Value) -> Result<Self, QuestError> {
        let raw: QuestDefinitionRaw = serde_json::from_value(value.clone())?;
        Self::from_raw(raw)
    }

    /// Builds a quest definition from raw parts.
    ///
    /// Transition targets and the initial state are NOT resolved here:
    /// documents may declare transitions into states that a companion
    /// document contributes, so resolution happens when a chronicler
    /// actually walks the edge.
    pub fn from_raw(raw: QuestDefinitionRaw) -> Result<Self, QuestError> {
        let mut states = HashMap::new();

        for (name, body) in &raw.states {
            let mut transitions = Vec::new();
            for entry in &body.transitions {
                if is_blank(entry) {
                    continue;
                }
                transitions.push(serde_json::from_value::<Transition>(entry.clone())?);
            }

            let mut seen = HashSet::new();
            for t in &transitions {
                if !seen.insert(t.on.as_str()) {
                    tracing::warn!(
                        quest = %raw.quest_name,
                        state = %name,
                        event = %t.on,
                        "duplicate transition trigger; first declaration wins"
                    );
                }
            }

            states.insert(
                name.clone(),
                State {
                    name: name.clone(),
                    description: body.description.clone(),
                    on_enter: body.on_enter.clone(),
                    transitions,
                },
            );
        }

        // Compute checksum
        let json_bytes = serde_json::to_vec(&raw)?;
        let checksum = format!("{:08x}", crc32c::crc32c(&json_bytes));

        Ok(Self {
            name: raw.quest_name.clone(),
            initial_state: raw.initial_state.clone(),
            states,
            raw,
            checksum,
        })
    }

    /// Looks up a state by name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    /// Returns true if the given state is declared in this definition.
    pub fn has_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Returns all trigger events declared on the given state.
    pub fn events_from(&self, name: &str) -> Vec<&str> {
        self.states
            .get(name)
            .map(|s| s.transitions.iter().map(|t| t.on.as_str()).collect())
            .unwrap_or_default()
    }

    /// Returns the raw definition as a generic tree.
    pub fn to_value(&self) -> Result<Value, QuestError> {
        Ok(serde_json::to_value(&self.raw)?)
    }
}

/// A placeholder entry left by sparse or templated documents.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(m) => m.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_definition() -> Value {
        json!({
            "quest_name": "patrol",
            "initial_state": "idle",
            "states": {
                "idle": {
                    "description": "Waiting for trouble",
                    "on_enter": [
                        {"action": "log_message", "message": "waiting"}
                    ],
                    "transitions": [
                        {"to": "alert", "on": "intruder_seen"}
                    ]
                },
                "alert": {
                    "on_enter": [
                        {"action": "log_message", "message": "alarm!"}
                    ],
                    "transitions": [
                        {"to": "idle", "on": "all_clear"}
                    ]
                }
            }
        })
    }

    #[test]
    fn test_parse_definition() {
        let def = QuestDefinition::from_value(&sample_definition()).unwrap();

        assert_eq!(def.name, "patrol");
        assert_eq!(def.initial_state, "idle");
        assert!(def.has_state("idle"));
        assert!(def.has_state("alert"));
        assert!(!def.has_state("panic"));
    }

    #[test]
    fn test_entry_actions_carry_params() {
        let def = QuestDefinition::from_value(&sample_definition()).unwrap();

        let idle = def.state("idle").unwrap();
        assert_eq!(idle.description, "Waiting for trouble");
        assert_eq!(idle.on_enter.len(), 1);
        assert_eq!(idle.on_enter[0].name, "log_message");
        assert_eq!(idle.on_enter[0].params["message"], json!("waiting"));

        // description is optional, defaults to empty
        let alert = def.state("alert").unwrap();
        assert_eq!(alert.description, "");
    }

    #[test]
    fn test_missing_top_level_key() {
        let json = json!({
            "quest_name": "broken",
            "states": {}
        });

        let result = QuestDefinition::from_value(&json);
        assert!(matches!(
            result,
            Err(QuestError::MalformedDefinition { .. })
        ));
    }

    #[test]
    fn test_absent_on_enter_and_transitions_default_empty() {
        let json = json!({
            "quest_name": "sparse",
            "initial_state": "only",
            "states": {
                "only": {}
            }
        });

        let def = QuestDefinition::from_value(&json).unwrap();
        let only = def.state("only").unwrap();
        assert!(only.on_enter.is_empty());
        assert!(only.transitions.is_empty());
    }

    #[test]
    fn test_blank_transition_entries_skipped() {
        let json = json!({
            "quest_name": "templated",
            "initial_state": "a",
            "states": {
                "a": {
                    "transitions": [
                        null,
                        {},
                        {"to": "b", "on": "go"},
                        null
                    ]
                },
                "b": {}
            }
        });

        let def = QuestDefinition::from_value(&json).unwrap();
        let a = def.state("a").unwrap();
        assert_eq!(a.transitions.len(), 1);
        assert_eq!(a.transitions[0].to, "b");
        assert_eq!(a.transitions[0].on, "go");
    }

    #[test]
    fn test_transition_missing_field() {
        let json = json!({
            "quest_name": "broken",
            "initial_state": "a",
            "states": {
                "a": {
                    "transitions": [
                        {"to": "b"}
                    ]
                }
            }
        });

        let result = QuestDefinition::from_value(&json);
        assert!(matches!(
            result,
            Err(QuestError::MalformedDefinition { .. })
        ));
    }

    #[test]
    fn test_undeclared_target_loads() {
        // Target resolution is deferred to fire(); the load must succeed.
        let json = json!({
            "quest_name": "lazy",
            "initial_state": "a",
            "states": {
                "a": {
                    "transitions": [
                        {"to": "elsewhere", "on": "go"}
                    ]
                }
            }
        });

        let def = QuestDefinition::from_value(&json).unwrap();
        assert!(!def.has_state("elsewhere"));
        assert_eq!(def.events_from("a"), vec!["go"]);
    }

    #[test]
    fn test_duplicate_trigger_tolerated() {
        let json = json!({
            "quest_name": "dup",
            "initial_state": "a",
            "states": {
                "a": {
                    "transitions": [
                        {"to": "b", "on": "go"},
                        {"to": "c", "on": "go"}
                    ]
                },
                "b": {},
                "c": {}
            }
        });

        let def = QuestDefinition::from_value(&json).unwrap();
        assert_eq!(def.state("a").unwrap().transitions.len(), 2);
    }

    #[test]
    fn test_checksum_round_trip() {
        let def1 = QuestDefinition::from_value(&sample_definition()).unwrap();
        let def2 = QuestDefinition::from_value(&sample_definition()).unwrap();

        assert_eq!(def1.checksum, def2.checksum);
        assert_eq!(def1.to_value().unwrap(), def2.to_value().unwrap());
    }
}
