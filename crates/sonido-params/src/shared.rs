//! Thread-safe shared parameter store.
//!
//! `SharedParams` lives for the lifetime of the plugin instance and is
//! accessible from the main thread (editor, host queries) and the audio
//! thread. Values are stored normalized as atomic `u32` (f32 bit-cast) for
//! lock-free access.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use crate::host::{ParamError, ParamHost, ParamIndex, ParamInfo};
use crate::range::ParamRange;

/// Flag indicating a gesture-begin is pending (editor → audio).
pub const GESTURE_BEGIN: u8 = 1;
/// Flag indicating a gesture-end is pending (editor → audio).
pub const GESTURE_END: u8 = 2;

/// Static description of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Display name.
    pub name: String,
    /// Plain value range.
    pub range: ParamRange,
}

impl ParamSpec {
    /// Create a spec from a name and range.
    pub fn new(name: impl Into<String>, range: ParamRange) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

/// Inner storage, held behind an `Arc` so `SharedParams` clones are cheap.
struct SharedParamsData {
    specs: Vec<ParamSpec>,
    /// Normalized values as f32 bit-cast to u32.
    values: Vec<AtomicU32>,
    /// Set by host-side writes, cleared by [`ParamHost::drain_changes`].
    changed: Vec<AtomicBool>,
    /// Gesture flags per parameter: bit 0 = begin pending, bit 1 = end pending.
    ///
    /// Editor sets flags via `fetch_or`; audio thread clears via `swap(0)`.
    gesture_flags: Vec<AtomicU8>,
    ready: AtomicBool,
    /// Called after every editor-originated write or gesture so the host can
    /// schedule a `process()`/`flush()` even while playback is stopped.
    host_notify: Option<Box<dyn Fn() + Send + Sync>>,
}

/// Shared parameter state accessible from all plugin threads.
///
/// Wraps an `Arc<SharedParamsData>` so it can be cloned into `'static + Send`
/// closures (e.g. a baseview window handler) without lifetime issues.
#[derive(Clone)]
pub struct SharedParams {
    inner: Arc<SharedParamsData>,
}

impl SharedParams {
    /// Create a store for the given parameters, initialized to their defaults.
    ///
    /// The store starts out ready. Processors that fill in parameters after
    /// construction should call [`set_ready(false)`](Self::set_ready) first.
    ///
    /// Pass `None` for `host_notify` in standalone or test use.
    pub fn new(specs: Vec<ParamSpec>, host_notify: Option<Box<dyn Fn() + Send + Sync>>) -> Self {
        let values = specs
            .iter()
            .map(|spec| AtomicU32::new(spec.range.default_normalized().to_bits()))
            .collect();
        let changed = specs.iter().map(|_| AtomicBool::new(false)).collect();
        let gesture_flags = specs.iter().map(|_| AtomicU8::new(0)).collect();

        Self {
            inner: Arc::new(SharedParamsData {
                specs,
                values,
                changed,
                gesture_flags,
                ready: AtomicBool::new(true),
                host_notify,
            }),
        }
    }

    /// All parameter specs.
    pub fn specs(&self) -> &[ParamSpec] {
        &self.inner.specs
    }

    /// Spec by index.
    pub fn spec(&self, index: usize) -> Option<&ParamSpec> {
        self.inner.specs.get(index)
    }

    /// Find a parameter index by display name.
    pub fn index_by_name(&self, name: &str) -> Option<ParamIndex> {
        self.inner
            .specs
            .iter()
            .position(|s| s.name == name)
            .map(ParamIndex)
    }

    /// Mark the store as (not) ready for editor writes.
    pub fn set_ready(&self, ready: bool) {
        tracing::debug!(ready, "parameter store readiness changed");
        self.inner.ready.store(ready, Ordering::Release);
    }

    /// Current plain value of a parameter (lock-free).
    pub fn plain_value(&self, index: usize) -> Option<f32> {
        let spec = self.inner.specs.get(index)?;
        self.load(index).map(|n| spec.range.denormalize(n))
    }

    /// Write a normalized value on behalf of the host (automation, state
    /// load). Clamps into `0..=1` and flags the parameter as changed so the
    /// editor pushes it to the UI.
    pub fn set_from_host(&self, index: usize, normalized: f32) {
        if !normalized.is_finite() {
            return;
        }
        if self.store(index, normalized).is_some()
            && let Some(flag) = self.inner.changed.get(index)
        {
            flag.store(true, Ordering::Release);
        }
    }

    /// Plain-value variant of [`set_from_host`](Self::set_from_host).
    pub fn set_plain_from_host(&self, index: usize, plain: f32) {
        if let Some(spec) = self.inner.specs.get(index) {
            self.set_from_host(index, spec.range.normalize(plain));
        }
    }

    /// Atomically read and clear gesture flags for a parameter.
    ///
    /// The audio thread calls this once per process block per parameter.
    pub fn take_gesture_flags(&self, index: usize) -> u8 {
        self.inner
            .gesture_flags
            .get(index)
            .map_or(0, |flag| flag.swap(0, Ordering::AcqRel))
    }

    fn load(&self, index: usize) -> Option<f32> {
        self.inner
            .values
            .get(index)
            .map(|v| f32::from_bits(v.load(Ordering::Acquire)))
    }

    fn store(&self, index: usize, normalized: f32) -> Option<f32> {
        let atomic = self.inner.values.get(index)?;
        let clamped = normalized.clamp(0.0, 1.0);
        atomic.store(clamped.to_bits(), Ordering::Release);
        Some(clamped)
    }

    fn notify_host(&self) {
        if let Some(cb) = &self.inner.host_notify {
            cb();
        }
    }
}

impl ParamHost for SharedParams {
    fn param_count(&self) -> usize {
        self.inner.specs.len()
    }

    fn param_info(&self, index: ParamIndex) -> Option<ParamInfo> {
        let spec = self.inner.specs.get(index.0)?;
        Some(ParamInfo {
            name: spec.name.clone(),
            normalized_value: self.load(index.0)?,
            range: spec.range,
        })
    }

    fn normalized_value(&self, index: ParamIndex) -> Option<f32> {
        self.load(index.0)
    }

    fn set_normalized_value(&self, index: ParamIndex, value: f32) -> Result<f32, ParamError> {
        let count = self.param_count();
        if index.0 >= count {
            return Err(ParamError::UnknownIndex {
                index: index.0,
                count,
            });
        }
        if !value.is_finite() {
            return Err(ParamError::NotFinite { index: index.0 });
        }
        let stored = self
            .store(index.0, value)
            .ok_or(ParamError::UnknownIndex {
                index: index.0,
                count,
            })?;
        self.notify_host();
        Ok(stored)
    }

    fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::Acquire)
    }

    fn begin_gesture(&self, index: ParamIndex) {
        if let Some(flag) = self.inner.gesture_flags.get(index.0) {
            flag.fetch_or(GESTURE_BEGIN, Ordering::Release);
            self.notify_host();
        }
    }

    fn end_gesture(&self, index: ParamIndex) {
        if let Some(flag) = self.inner.gesture_flags.get(index.0) {
            flag.fetch_or(GESTURE_END, Ordering::Release);
            self.notify_host();
        }
    }

    fn drain_changes(&self, visit: &mut dyn FnMut(ParamIndex, f32)) {
        for (i, flag) in self.inner.changed.iter().enumerate() {
            if flag.swap(false, Ordering::AcqRel)
                && let Some(value) = self.load(i)
            {
                visit(ParamIndex(i), value);
            }
        }
    }
}
