//! Parameter host capability for sonido plugin editors.
//!
//! Editors never own the audio processor's parameters. They talk to them
//! through [`ParamHost`], a narrow index-based capability: enumerate, read the
//! normalized value, write a normalized value, and poll for changes that
//! originated on the host side (automation, preset loads).
//!
//! [`SharedParams`] is the reference implementation: an `Arc`-backed store of
//! lock-free atomics that can be cloned into `'static + Send` closures and read
//! from the audio thread while the UI thread writes.
//!
//! ```text
//! web content ──► editor ──► ParamHost::set_normalized_value(index, value)
//!                                  │
//!                             SharedParams (AtomicU32 per param)
//!                                  │
//! host automation ──► SharedParams::set_from_host ──► changed flag
//!                                  │
//! editor::on_idle ◄── ParamHost::drain_changes
//! ```

pub mod host;
pub mod range;
pub mod shared;

pub use host::{ParamError, ParamHost, ParamIndex, ParamInfo};
pub use range::{ParamRange, ParamScale};
pub use shared::{GESTURE_BEGIN, GESTURE_END, ParamSpec, SharedParams};
