//! Baseview host adapter: runs an [`EditorSurface`] inside a baseview child
//! window of the plugin host's parent window.
//!
//! The surface is built on the window's own thread and lives inside the
//! window handler, so its UI-thread affinity holds. `on_frame` doubles as the
//! idle timer: it applies pending host resizes and drains renderer messages.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use baseview::{
    Event, EventStatus, Size, Window, WindowEvent, WindowHandle, WindowHandler, WindowOpenOptions,
    WindowScalePolicy,
};
use crossbeam_channel::bounded;
use raw_window_handle::{HasRawWindowHandle, RawWindowHandle};
use sonido_params::ParamHost;

use crate::config::EditorConfig;
use crate::editor::EditorSurface;
use crate::error::EditorError;
use crate::renderer::{Renderer, RendererFactory};

/// How long to wait for the window thread to report construction status.
const OPEN_TIMEOUT: Duration = Duration::from_secs(5);

/// Lock-free resize channel between the host's main thread and the window
/// handler.
///
/// Width and height are packed into one `AtomicU64` (width in the high 32
/// bits) so a reader never sees a torn size.
pub struct PendingResize {
    packed: AtomicU64,
}

impl PendingResize {
    /// Channel holding the given initial logical size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            packed: AtomicU64::new(Self::pack(width, height)),
        }
    }

    /// Request a new logical size.
    pub fn set(&self, width: u32, height: u32) {
        self.packed.store(Self::pack(width, height), Ordering::Release);
    }

    /// Most recently requested logical size.
    pub fn get(&self) -> (u32, u32) {
        Self::unpack(self.packed.load(Ordering::Acquire))
    }

    fn pack(width: u32, height: u32) -> u64 {
        (u64::from(width) << 32) | u64::from(height)
    }

    fn unpack(packed: u64) -> (u32, u32) {
        ((packed >> 32) as u32, packed as u32)
    }
}

/// Host parent window, for baseview's `open_parented`.
struct ParentWindow(RawWindowHandle);

#[allow(unsafe_code)]
// SAFETY: HasRawWindowHandle is unsafe in rwh 0.5. The handle is a Copy value
// from the host, which keeps the parent window alive until the editor is
// closed.
unsafe impl HasRawWindowHandle for ParentWindow {
    fn raw_window_handle(&self) -> RawWindowHandle {
        self.0
    }
}

/// A web editor window parented to the host's editor window.
///
/// Dropping it closes the window, which tears down the editor surface on the
/// window thread.
pub struct WebViewWindow {
    window: WindowHandle,
    pending_resize: Arc<PendingResize>,
}

impl WebViewWindow {
    /// Open a child window inside `parent` and build an [`EditorSurface`] in
    /// it.
    ///
    /// Blocks until the surface reports whether construction succeeded. On
    /// failure the window is closed and the construction error returned.
    pub fn open_parented<P, F>(
        parent: RawWindowHandle,
        config: EditorConfig,
        params: P,
        factory: F,
        scale: f64,
    ) -> Result<Self, EditorError>
    where
        P: ParamHost + Send + 'static,
        F: RendererFactory + Send + 'static,
        F::Renderer: 'static,
    {
        config.validate()?;
        let pending_resize = Arc::new(PendingResize::new(config.width, config.height));
        let options = WindowOpenOptions {
            title: "sonido".to_string(),
            size: Size::new(f64::from(config.width), f64::from(config.height)),
            scale: WindowScalePolicy::ScaleFactor(scale),
        };

        let (status_tx, status_rx) = bounded::<Result<(), EditorError>>(1);
        let handler_resize = Arc::clone(&pending_resize);
        let mut window = Window::open_parented(
            &ParentWindow(parent),
            options,
            move |window: &mut Window<'_>| {
                let surface = window.raw_window_handle();
                let applied = (config.width, config.height);
                let editor = match EditorSurface::new(params, surface, &config, &factory) {
                    Ok(editor) => {
                        let _ = status_tx.send(Ok(()));
                        Some(editor)
                    }
                    Err(e) => {
                        let _ = status_tx.send(Err(e));
                        None
                    }
                };
                WebViewHandler {
                    editor,
                    pending_resize: handler_resize,
                    applied,
                }
            },
        );

        match status_rx.recv_timeout(OPEN_TIMEOUT) {
            Ok(Ok(())) => Ok(Self {
                window,
                pending_resize,
            }),
            Ok(Err(e)) => {
                window.close();
                Err(e)
            }
            Err(e) => {
                window.close();
                Err(EditorError::Window(e.to_string()))
            }
        }
    }

    /// Request a new logical size. Applied on the window thread's next frame.
    pub fn set_size(&self, width: u32, height: u32) {
        self.pending_resize.set(width, height);
    }

    /// Most recently requested logical size.
    pub fn size(&self) -> (u32, u32) {
        self.pending_resize.get()
    }
}

struct WebViewHandler<P: ParamHost, R: Renderer> {
    /// `None` when construction failed; the window closes on the first frame.
    editor: Option<EditorSurface<P, R>>,
    pending_resize: Arc<PendingResize>,
    applied: (u32, u32),
}

impl<P, R> WindowHandler for WebViewHandler<P, R>
where
    P: ParamHost + 'static,
    R: Renderer + 'static,
{
    fn on_frame(&mut self, window: &mut Window<'_>) {
        let Some(editor) = &mut self.editor else {
            window.close();
            return;
        };

        let requested = self.pending_resize.get();
        if requested != self.applied {
            let (width, height) = requested;
            window.resize(Size::new(f64::from(width), f64::from(height)));
            editor.set_size(width, height);
            self.applied = requested;
        }

        editor.on_idle();
    }

    fn on_event(&mut self, _window: &mut Window<'_>, event: Event) -> EventStatus {
        match event {
            Event::Window(WindowEvent::Resized(info)) => {
                if let Some(editor) = &mut self.editor {
                    let size = info.logical_size();
                    editor.set_size(size.width.round() as u32, size.height.round() as u32);
                }
                EventStatus::Captured
            }
            Event::Window(WindowEvent::WillClose) => {
                // Tear down while the native window still exists.
                self.editor = None;
                EventStatus::Captured
            }
            _ => EventStatus::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_resize_round_trips() {
        let pending = PendingResize::new(480, 380);
        assert_eq!(pending.get(), (480, 380));
        pending.set(u32::MAX, 1);
        assert_eq!(pending.get(), (u32::MAX, 1));
    }
}
