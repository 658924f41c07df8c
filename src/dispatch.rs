//! Action dispatch - turning `(name, params)` pairs into side effects.
//!
//! The engine never calls into this module. The host reads
//! [`Chronicler::entry_actions`](crate::Chronicler::entry_actions) after
//! `start()` and after every `fire()` that returns `true`, and feeds each
//! action to a dispatcher it built at startup.

use crate::definition::Action;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A registered handler for one action name.
pub trait ActionHandler: Send + Sync {
    /// Invoked with the action's parameters, verbatim from the document.
    fn invoke(&self, params: &Map<String, Value>);
}

impl<F> ActionHandler for F
where
    F: Fn(&Map<String, Value>) + Send + Sync,
{
    fn invoke(&self, params: &Map<String, Value>) {
        self(params)
    }
}

/// Handler table keyed by action name.
///
/// Built by the embedding application at startup and owned by it; the
/// engine stays ignorant of the mapping.
#[derive(Default)]
pub struct ActionDispatcher {
    handlers: HashMap<String, Box<dyn ActionHandler>>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for an action name, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, handler: impl ActionHandler + 'static) {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    /// Executes the handler mapped to the action's name.
    ///
    /// Returns false if no handler is mapped; the miss is reported and
    /// the process keeps running.
    pub fn dispatch(&self, action: &Action) -> bool {
        match self.handlers.get(&action.name) {
            Some(handler) => {
                handler.invoke(&action.params);
                true
            }
            None => {
                tracing::warn!(action = %action.name, "no handler registered for action");
                false
            }
        }
    }

    /// Dispatches a sequence of actions in order.
    pub fn dispatch_all(&self, actions: &[Action]) {
        for action in actions {
            self.dispatch(action);
        }
    }
}
