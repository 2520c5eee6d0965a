//! The parameter host capability consumed by plugin editors.
//!
//! [`ParamHost`] is deliberately index-based and normalized-only: editors
//! address parameters by their position in the processor's parameter list and
//! exchange values in `0..=1`. Plain-value formatting and automation curves
//! stay on the processor side.

use core::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::range::ParamRange;

/// Type-safe index into the processor's parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamIndex(pub usize);

impl fmt::Display for ParamIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ParamIndex {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// Snapshot of one parameter, as reported by [`ParamHost::param_info`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    /// Display name.
    pub name: String,
    /// Current value in `0..=1`.
    pub normalized_value: f32,
    /// Plain value range.
    pub range: ParamRange,
}

/// Errors reported by [`ParamHost::set_normalized_value`].
///
/// Out-of-range *values* are not errors: they are clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// The index does not name a parameter.
    #[error("unknown parameter index {index} (processor has {count} parameters)")]
    UnknownIndex {
        /// Requested index.
        index: usize,
        /// Number of parameters the processor exposes.
        count: usize,
    },

    /// NaN or infinity cannot be clamped into a meaningful position.
    #[error("non-finite value for parameter {index}")]
    NotFinite {
        /// Requested index.
        index: usize,
    },
}

/// Access to an audio processor's parameters from the editor side.
///
/// All methods are called from the host's UI thread. Implementations backed
/// by shared state (e.g. [`SharedParams`](crate::SharedParams)) may also be
/// read from the audio thread, but the editor makes no such assumption.
pub trait ParamHost {
    /// Number of parameters the processor exposes.
    fn param_count(&self) -> usize;

    /// Name, current value and range of a parameter.
    ///
    /// Returns `None` if the index is out of range.
    fn param_info(&self, index: ParamIndex) -> Option<ParamInfo>;

    /// Current normalized value. Returns `None` if the index is out of range.
    fn normalized_value(&self, index: ParamIndex) -> Option<f32>;

    /// Write a normalized value, clamping it into `0..=1`.
    ///
    /// Returns the value actually stored.
    fn set_normalized_value(&self, index: ParamIndex, value: f32) -> Result<f32, ParamError>;

    /// Whether the processor has finished initializing its parameters.
    ///
    /// Editors must not write parameters while this is `false`.
    fn is_ready(&self) -> bool {
        true
    }

    /// Start of a user gesture (e.g. a knob drag) on a parameter.
    fn begin_gesture(&self, _index: ParamIndex) {}

    /// End of a user gesture.
    fn end_gesture(&self, _index: ParamIndex) {}

    /// Visit every parameter whose value changed on the host side since the
    /// last call, with its current normalized value.
    ///
    /// The default implementation reports nothing.
    fn drain_changes(&self, _visit: &mut dyn FnMut(ParamIndex, f32)) {}
}

impl<T: ParamHost + ?Sized> ParamHost for &T {
    fn param_count(&self) -> usize {
        (**self).param_count()
    }

    fn param_info(&self, index: ParamIndex) -> Option<ParamInfo> {
        (**self).param_info(index)
    }

    fn normalized_value(&self, index: ParamIndex) -> Option<f32> {
        (**self).normalized_value(index)
    }

    fn set_normalized_value(&self, index: ParamIndex, value: f32) -> Result<f32, ParamError> {
        (**self).set_normalized_value(index, value)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn begin_gesture(&self, index: ParamIndex) {
        (**self).begin_gesture(index);
    }

    fn end_gesture(&self, index: ParamIndex) {
        (**self).end_gesture(index);
    }

    fn drain_changes(&self, visit: &mut dyn FnMut(ParamIndex, f32)) {
        (**self).drain_changes(visit);
    }
}

impl<T: ParamHost + ?Sized> ParamHost for Arc<T> {
    fn param_count(&self) -> usize {
        (**self).param_count()
    }

    fn param_info(&self, index: ParamIndex) -> Option<ParamInfo> {
        (**self).param_info(index)
    }

    fn normalized_value(&self, index: ParamIndex) -> Option<f32> {
        (**self).normalized_value(index)
    }

    fn set_normalized_value(&self, index: ParamIndex, value: f32) -> Result<f32, ParamError> {
        (**self).set_normalized_value(index, value)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn begin_gesture(&self, index: ParamIndex) {
        (**self).begin_gesture(index);
    }

    fn end_gesture(&self, index: ParamIndex) {
        (**self).end_gesture(index);
    }

    fn drain_changes(&self, visit: &mut dyn FnMut(ParamIndex, f32)) {
        (**self).drain_changes(visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_index_display() {
        let err = ParamError::UnknownIndex { index: 7, count: 3 };
        assert_eq!(
            err.to_string(),
            "unknown parameter index 7 (processor has 3 parameters)"
        );
    }

    #[test]
    fn param_index_display_and_from() {
        let index: ParamIndex = 4.into();
        assert_eq!(index, ParamIndex(4));
        assert_eq!(index.to_string(), "4");
    }
}
