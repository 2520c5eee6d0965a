//! The web renderer capability.
//!
//! The renderer (WKWebView, WebView2, WebKitGTK in a helper process, ...) is
//! an external collaborator. The editor only needs the narrow surface below:
//! create it, point it at content, exchange structured messages, size it,
//! and tear it down.
//!
//! Messages may arrive on any thread the renderer likes. They go through a
//! [`MessageSink`] into a channel the editor drains on the UI thread, so no
//! renderer callback ever touches parameter state directly.

use std::path::PathBuf;

use crossbeam_channel::{Receiver, Sender, unbounded};
use raw_window_handle::RawWindowHandle;
use serde_json::Value;
use thiserror::Error;

use crate::geometry::Rgba;

/// Failures reported by a renderer implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RendererError {
    /// The runtime could not be created (missing WebView2 runtime, no
    /// WebKit, helper process failed to start, ...).
    #[error("web renderer unavailable: {0}")]
    Unavailable(String),

    /// The entry document could not be loaded.
    #[error("failed to load content: {0}")]
    Navigation(String),

    /// A message could not be delivered to the web content.
    #[error("failed to deliver message: {0}")]
    Message(String),
}

/// Everything a renderer needs to come up showing the editor's content.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererOptions {
    /// Directory the web content is served from.
    pub asset_root: PathBuf,
    /// URL of the entry document inside `asset_root`.
    pub entry_url: String,
    /// Initial width in logical pixels.
    pub width: u32,
    /// Initial height in logical pixels.
    pub height: u32,
    /// Enable inspector / dev tools.
    pub developer_mode: bool,
    /// Colour shown before the content paints.
    pub background: Rgba,
}

/// An embedded web renderer instance.
///
/// Owned exclusively by one [`EditorSurface`](crate::EditorSurface). All
/// methods are called from the UI thread.
pub trait Renderer {
    /// Native surface to embed in the editor window: an `NSView` on macOS, an
    /// `HWND` on Windows, an X11 window id (possibly owned by another
    /// process) elsewhere. `None` if the renderer has no surface yet.
    fn native_handle(&self) -> Option<RawWindowHandle>;

    /// Load `url` into the renderer.
    fn navigate(&mut self, url: &str) -> Result<(), RendererError>;

    /// Deliver a structured event to the web content.
    fn post_message(&mut self, message: &Value) -> Result<(), RendererError>;

    /// Route every message the web content sends into `sink`. Replaces any
    /// previously installed sink.
    fn set_message_sink(&mut self, sink: MessageSink);

    /// Stop delivering messages. Messages already sent remain queued.
    fn clear_message_sink(&mut self);

    /// Resize the renderer's visible surface.
    fn resize(&mut self, width: u32, height: u32);

    /// Release the rendering context. Called exactly once, last.
    fn destroy(&mut self);
}

/// Creates renderers. Implemented for any
/// `Fn(&RendererOptions) -> Result<R, RendererError>`.
pub trait RendererFactory {
    /// Renderer type produced.
    type Renderer: Renderer;

    /// Create a renderer for the given options.
    fn create(&self, options: &RendererOptions) -> Result<Self::Renderer, RendererError>;
}

impl<F, R> RendererFactory for F
where
    F: Fn(&RendererOptions) -> Result<R, RendererError>,
    R: Renderer,
{
    type Renderer = R;

    fn create(&self, options: &RendererOptions) -> Result<R, RendererError> {
        self(options)
    }
}

/// Thread-safe handle a renderer uses to deliver inbound messages.
///
/// Cheap to clone; can be moved into renderer callbacks running on any
/// thread. Once the owning editor is dropped, sends fail and the message is
/// discarded.
#[derive(Debug, Clone)]
pub struct MessageSink {
    sender: Sender<Value>,
}

impl MessageSink {
    /// Queue a structured message for the editor. Returns `false` if the
    /// editor is gone.
    pub fn send(&self, message: Value) -> bool {
        self.sender.send(message).is_ok()
    }

    /// Queue a message received as JSON text (the usual shape of
    /// `postMessage` payloads). Invalid JSON is logged and dropped.
    pub fn send_json(&self, text: &str) -> bool {
        match serde_json::from_str(text) {
            Ok(value) => self.send(value),
            Err(e) => {
                tracing::warn!(error = %e, "invalid JSON from web view");
                false
            }
        }
    }
}

/// Create a connected sink/receiver pair.
pub(crate) fn message_channel() -> (MessageSink, Receiver<Value>) {
    let (sender, receiver) = unbounded();
    (MessageSink { sender }, receiver)
}
