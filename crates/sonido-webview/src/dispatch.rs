//! Inbound event dispatch.
//!
//! This is where renderer-originated, untrusted input reaches parameter
//! state. Every path validates before it writes and nothing here returns an
//! error: a rejected event produces `None` and a log line, and the web content
//! simply does not see its change applied.

use std::collections::HashMap;

use serde_json::{Value, json};
use sonido_params::{ParamHost, ParamIndex};

use crate::event::{self, InboundEvent, OutboundEvent};

/// Handler for a custom event type. Receives the full event object and
/// returns the value to answer a correlated request with.
pub type EventHandler = Box<dyn FnMut(&Value) -> Option<Value>>;

/// Routes decoded events to the built-in parameter handlers and to handlers
/// registered by other collaborators.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<String, EventHandler>,
}

impl EventDispatcher {
    /// Dispatcher with only the built-in handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `type_name`, replacing any previous
    /// custom handler for that type.
    ///
    /// Built-in types cannot be overridden; returns `false` in that case.
    pub fn register(&mut self, type_name: impl Into<String>, handler: EventHandler) -> bool {
        let type_name = type_name.into();
        if InboundEvent::is_builtin(&type_name) {
            tracing::warn!(type_name = %type_name, "refusing to override built-in event handler");
            return false;
        }
        self.handlers.insert(type_name, handler);
        true
    }

    /// Remove a custom handler. Returns whether one was registered.
    pub fn unregister(&mut self, type_name: &str) -> bool {
        self.handlers.remove(type_name).is_some()
    }

    /// Whether a custom handler is registered for `type_name`.
    pub fn has_handler(&self, type_name: &str) -> bool {
        self.handlers.contains_key(type_name)
    }

    /// Decode and handle one inbound event.
    ///
    /// Returns the handler's result; `None` when the event was malformed,
    /// rejected, or of an unknown type.
    pub fn dispatch(&mut self, params: &impl ParamHost, event: &Value) -> Option<Value> {
        let Some(decoded) = event::decode(event) else {
            tracing::debug!(%event, "ignoring malformed event from web view");
            return None;
        };

        match decoded {
            InboundEvent::SetParameterValue { id, value } => apply_set_parameter(params, id, value),
            InboundEvent::BeginGesture { id } => {
                if let Some(index) = writable_index(params, id) {
                    params.begin_gesture(index);
                }
                None
            }
            InboundEvent::EndGesture { id } => {
                if let Some(index) = writable_index(params, id) {
                    params.end_gesture(index);
                }
                None
            }
            InboundEvent::RequestSnapshot => Some(OutboundEvent::snapshot(params).to_value()),
            InboundEvent::Other(type_name) => match self.handlers.get_mut(&type_name) {
                Some(handler) => handler(event),
                None => {
                    tracing::trace!(type_name = %type_name, "no handler for event type");
                    None
                }
            },
        }
    }
}

/// Apply a `setParameterValue` request.
///
/// Rejects (returns `None`, writes nothing) when the parameter host is not
/// ready, when `id` names no parameter, or when `value` is not finite.
/// Otherwise clamps `value` into `0..=1`, writes it and returns
/// `{"id": id, "value": stored}`. When the host stored exactly what was
/// asked for, `stored` is the clamped request itself, so content comparing
/// the confirmation against what it sent sees an exact match.
pub fn apply_set_parameter(params: &impl ParamHost, id: usize, value: f64) -> Option<Value> {
    let index = writable_index(params, id)?;
    if !value.is_finite() {
        tracing::debug!(id, "rejecting non-finite parameter value");
        return None;
    }

    let clamped = value.clamp(0.0, 1.0);
    let requested = clamped as f32;
    match params.set_normalized_value(index, requested) {
        Ok(stored) => {
            let confirmed = if stored == requested {
                clamped
            } else {
                event::wire_value(stored)
            };
            Some(json!({ "id": id, "value": confirmed }))
        }
        Err(e) => {
            tracing::debug!(error = %e, "parameter write rejected");
            None
        }
    }
}

fn writable_index(params: &impl ParamHost, id: usize) -> Option<ParamIndex> {
    if !params.is_ready() {
        tracing::debug!(id, "parameter host not ready, dropping event");
        return None;
    }
    let count = params.param_count();
    if id >= count {
        tracing::debug!(id, count, "event names unknown parameter");
        return None;
    }
    Some(ParamIndex(id))
}
