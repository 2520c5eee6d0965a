//! Structured event wire shape between web content and the editor.
//!
//! Every event is a JSON object tagged by a `type` string:
//!
//! ```json
//! {"type": "setParameterValue", "id": 3, "value": 0.42}
//! {"type": "parameterValueChanged", "id": 3, "value": 0.42}
//! ```
//!
//! Inbound events may carry a `requestId`; the editor then answers with
//! `{"type": "response", "requestId": ..., "result": ...}` where `result` is
//! the handler's return value (or `null`).
//!
//! Unknown `type` values are not errors. Content built for a newer editor may
//! send events this one does not understand.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sonido_params::{ParamHost, ParamIndex};

/// Web content asks to set a parameter's normalized value.
pub const SET_PARAMETER_VALUE: &str = "setParameterValue";
/// Web content starts a gesture (knob drag) on a parameter.
pub const BEGIN_PARAMETER_GESTURE: &str = "beginParameterGesture";
/// Web content ends a gesture on a parameter.
pub const END_PARAMETER_GESTURE: &str = "endParameterGesture";
/// Web content asks for every parameter's current state.
pub const REQUEST_PARAMETER_SNAPSHOT: &str = "requestParameterSnapshot";

/// Field carrying the correlation id of a request.
pub const REQUEST_ID: &str = "requestId";

/// Decoded inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// `setParameterValue`.
    SetParameterValue {
        /// Parameter index.
        id: usize,
        /// Requested normalized value, not yet clamped.
        value: f64,
    },
    /// `beginParameterGesture`.
    BeginGesture {
        /// Parameter index.
        id: usize,
    },
    /// `endParameterGesture`.
    EndGesture {
        /// Parameter index.
        id: usize,
    },
    /// `requestParameterSnapshot`.
    RequestSnapshot,
    /// Any other well-formed event. Routed to registered handlers, ignored
    /// if none matches.
    Other(String),
}

impl InboundEvent {
    /// Whether `type_name` is one of the built-in event types.
    pub fn is_builtin(type_name: &str) -> bool {
        matches!(
            type_name,
            SET_PARAMETER_VALUE
                | BEGIN_PARAMETER_GESTURE
                | END_PARAMETER_GESTURE
                | REQUEST_PARAMETER_SNAPSHOT
        )
    }
}

#[derive(Deserialize)]
struct SetParameterPayload {
    id: usize,
    value: f64,
}

#[derive(Deserialize)]
struct GesturePayload {
    id: usize,
}

/// The `type` tag of an event, if it is an object with a string `type`.
pub fn event_type(event: &Value) -> Option<&str> {
    event.as_object()?.get("type")?.as_str()
}

/// The `requestId` of an event, if present and not `null`.
pub fn request_id(event: &Value) -> Option<&Value> {
    event.get(REQUEST_ID).filter(|id| !id.is_null())
}

/// Decode an inbound event.
///
/// Returns `None` for structurally invalid input: not an object, no string
/// `type`, or a built-in type whose fields are missing or mistyped (negative
/// or fractional `id`, non-numeric `value`).
pub fn decode(event: &Value) -> Option<InboundEvent> {
    let type_name = event_type(event)?;
    match type_name {
        SET_PARAMETER_VALUE => {
            let payload = SetParameterPayload::deserialize(event).ok()?;
            Some(InboundEvent::SetParameterValue {
                id: payload.id,
                value: payload.value,
            })
        }
        BEGIN_PARAMETER_GESTURE => {
            let payload = GesturePayload::deserialize(event).ok()?;
            Some(InboundEvent::BeginGesture { id: payload.id })
        }
        END_PARAMETER_GESTURE => {
            let payload = GesturePayload::deserialize(event).ok()?;
            Some(InboundEvent::EndGesture { id: payload.id })
        }
        REQUEST_PARAMETER_SNAPSHOT => Some(InboundEvent::RequestSnapshot),
        other => Some(InboundEvent::Other(other.to_owned())),
    }
}

/// Widen an `f32` to the `f64` with the same shortest decimal form, so
/// `0.3f32` reaches the web content as `0.3` and not `0.30000001192092896`.
pub fn wire_value(value: f32) -> f64 {
    value.to_string().parse().unwrap_or_else(|_| f64::from(value))
}

fn serialize_wire<S: serde::Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(wire_value(*value))
}

/// One parameter in a `parameterSnapshot` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterState {
    /// Parameter index.
    pub id: usize,
    /// Display name.
    pub name: String,
    /// Normalized value.
    #[serde(serialize_with = "serialize_wire")]
    pub value: f32,
    /// Plain minimum.
    #[serde(serialize_with = "serialize_wire")]
    pub min: f32,
    /// Plain maximum.
    #[serde(serialize_with = "serialize_wire")]
    pub max: f32,
    /// Plain default.
    #[serde(serialize_with = "serialize_wire")]
    pub default: f32,
}

/// Events the editor sends to the web content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundEvent {
    /// A parameter changed outside the web content (automation, preset).
    ParameterValueChanged {
        /// Parameter index.
        id: usize,
        /// New normalized value.
        #[serde(serialize_with = "serialize_wire")]
        value: f32,
    },
    /// Every parameter's state.
    ParameterSnapshot {
        /// Parameters in index order.
        parameters: Vec<ParameterState>,
    },
    /// Answer to an inbound event that carried a `requestId`.
    Response {
        /// Correlation id copied from the request.
        #[serde(rename = "requestId")]
        request_id: Value,
        /// Handler result, `null` when the request was rejected.
        result: Value,
    },
}

impl OutboundEvent {
    /// Snapshot of every parameter `params` exposes.
    pub fn snapshot(params: &impl ParamHost) -> Self {
        let parameters = (0..params.param_count())
            .filter_map(|i| {
                let info = params.param_info(ParamIndex(i))?;
                Some(ParameterState {
                    id: i,
                    name: info.name,
                    value: info.normalized_value,
                    min: info.range.min,
                    max: info.range.max,
                    default: info.range.default,
                })
            })
            .collect();
        Self::ParameterSnapshot { parameters }
    }

    /// Convert to the JSON value posted to the renderer.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
