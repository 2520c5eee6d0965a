//! Web-content plugin editors for sonido.
//!
//! A plugin editor normally draws its UI with native primitives. This crate
//! instead embeds a web renderer (WKWebView, WebView2, WebKitGTK, ...) inside
//! the host's editor window and keeps it synchronized with the processor's
//! parameters.
//!
//! # Architecture
//!
//! ```text
//! host editor window (RawWindowHandle)
//!     │
//!     ▼
//! EditorSurface ─── owns ──► NativeContainer (AppKit | Win32 | XEmbed)
//!     │                           │ hosts
//!     ├─── owns ──► Renderer ─────┘ native surface
//!     │                 │ postMessage
//!     │                 ▼
//!     │            MessageSink ──► channel ──► on_idle (UI thread)
//!     │                                           │
//!     └── EventDispatcher ◄───────────────────────┘
//!             │ setParameterValue
//!             ▼
//!         ParamHost (sonido-params)
//! ```
//!
//! The renderer itself is an external collaborator behind the [`Renderer`]
//! trait. Exactly one container implementation is compiled per target.
//!
//! # Example
//!
//! ```rust,ignore
//! use sonido_webview::{EditorConfig, EditorSurface};
//!
//! let config = EditorConfig::load("editor.toml")?;
//! let mut editor = EditorSurface::new(&params, parent, &config, &create_webview)?;
//! // host idle timer:
//! editor.on_idle();
//! ```

pub mod config;
pub mod container;
pub mod dispatch;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod renderer;
pub mod thread;

#[cfg(feature = "baseview")]
pub mod window;

pub use config::{ConfigError, EditorConfig};
pub use container::{AttachError, Container, NativeContainer};
pub use dispatch::{EventDispatcher, EventHandler, apply_set_parameter};
pub use editor::EditorSurface;
pub use error::EditorError;
pub use event::{InboundEvent, OutboundEvent, ParameterState};
pub use geometry::{Bounds, Canvas, Rgba};
pub use renderer::{MessageSink, Renderer, RendererError, RendererFactory, RendererOptions};
pub use thread::UiThread;

#[cfg(feature = "baseview")]
pub use window::{PendingResize, WebViewWindow};
