//! Quest execution - one mutable cursor walking a shared definition.

use crate::definition::{Action, QuestDefinition};
use crate::error::QuestError;
use std::sync::Arc;

/// A running quest instance.
///
/// Holds a read-only, shared definition and a single mutable cursor over
/// it. A chronicler has exactly one logical owner; callers driving the
/// same instance from several threads must serialize `start`/`fire`
/// themselves.
#[derive(Debug, Clone)]
pub struct Chronicler {
    /// Shared, read-only definition.
    definition: Arc<QuestDefinition>,

    /// Name of the active state. `None` until `start()` succeeds, and
    /// never returns to `None` afterward.
    current: Option<String>,
}

impl Chronicler {
    /// Creates a not-yet-started chronicler over the given definition.
    pub fn new(definition: Arc<QuestDefinition>) -> Self {
        Self {
            definition,
            current: None,
        }
    }

    /// Enters the definition's initial state.
    ///
    /// The initial state's entry actions are NOT executed here; the
    /// caller reads them via [`entry_actions`](Self::entry_actions) and
    /// feeds them to its dispatcher.
    pub fn start(&mut self) -> Result<(), QuestError> {
        if self.current.is_some() {
            return Err(QuestError::AlreadyStarted);
        }

        let initial = &self.definition.initial_state;
        if !self.definition.has_state(initial) {
            return Err(QuestError::UnknownState {
                state: initial.clone(),
            });
        }

        tracing::debug!(quest = %self.definition.name, state = %initial, "chronicler started");
        self.current = Some(initial.clone());
        Ok(())
    }

    /// Applies an event to the current state.
    ///
    /// Scans the current state's transitions in declaration order and
    /// takes the first one triggered by `event`. Returns `Ok(true)` if a
    /// transition was taken, `Ok(false)` if none matched - events not
    /// understood in the current state are a normal outcome, not an
    /// error. A single call performs at most one hop.
    pub fn fire(&mut self, event: &str) -> Result<bool, QuestError> {
        let current = match &self.current {
            Some(name) => name,
            None => return Err(QuestError::NotStarted),
        };

        let state = self
            .definition
            .state(current)
            .ok_or_else(|| QuestError::UnknownState {
                state: current.clone(),
            })?;

        for t in &state.transitions {
            if t.on == event {
                // Deferred target validation happens here, at the moment
                // the edge is actually walked.
                if !self.definition.has_state(&t.to) {
                    return Err(QuestError::UnknownState { state: t.to.clone() });
                }

                tracing::debug!(
                    quest = %self.definition.name,
                    from = %state.name,
                    to = %t.to,
                    event,
                    "transition taken"
                );
                self.current = Some(t.to.clone());
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Entry actions of the active state, or an empty slice before
    /// `start()`. Never fails.
    pub fn entry_actions(&self) -> &[Action] {
        self.current
            .as_ref()
            .and_then(|name| self.definition.state(name))
            .map(|s| s.on_enter.as_slice())
            .unwrap_or(&[])
    }

    /// Name of the active state, or `None` before `start()`.
    pub fn current_state(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Returns true once `start()` has succeeded.
    pub fn is_started(&self) -> bool {
        self.current.is_some()
    }

    /// The backing definition.
    pub fn definition(&self) -> &Arc<QuestDefinition> {
        &self.definition
    }
}
