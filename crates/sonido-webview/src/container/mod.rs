//! Platform container adapters.
//!
//! A container hosts a foreign native surface (the renderer's view or
//! window) inside the editor's native window and keeps it positioned. Each
//! operating system gets one implementation; exactly one is compiled into a
//! given build and exported as [`NativeContainer`]:
//!
//! | Target | Container | Mechanism |
//! |--------|-----------|-----------|
//! | macOS | `AppKitContainer` | `NSView` subview |
//! | Windows | `Win32Container` | `HWND` re-parenting |
//! | Linux / BSD | `XEmbedContainer` | XEmbed, possibly cross-process |

use raw_window_handle::RawWindowHandle;
use thiserror::Error;

use crate::geometry::Bounds;

#[cfg(target_os = "macos")]
mod appkit;
#[cfg(target_os = "windows")]
mod win32;
#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
mod xembed;

#[cfg(target_os = "macos")]
pub use appkit::AppKitContainer;
#[cfg(target_os = "windows")]
pub use win32::Win32Container;
#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
pub use xembed::XEmbedContainer;

/// Container used by [`EditorSurface`](crate::EditorSurface) on this target.
#[cfg(target_os = "macos")]
pub type NativeContainer = AppKitContainer;
/// Container used by [`EditorSurface`](crate::EditorSurface) on this target.
#[cfg(target_os = "windows")]
pub type NativeContainer = Win32Container;
/// Container used by [`EditorSurface`](crate::EditorSurface) on this target.
#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
pub type NativeContainer = XEmbedContainer;

#[cfg(not(any(
    target_os = "macos",
    target_os = "windows",
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
compile_error!("sonido-webview supports macOS, Windows and X11 targets only");

/// Failures while embedding a foreign surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    /// The handle is null / zero.
    #[error("native handle is null")]
    NullHandle,

    /// The handle belongs to a different windowing system.
    #[error("unsupported native handle type: {0}")]
    UnsupportedHandle(&'static str),

    /// The handle does not name a live view or window.
    #[error("invalid native handle: {0}")]
    InvalidHandle(String),

    /// A surface is already attached to this container.
    #[error("container already hosts a surface")]
    AlreadyAttached,

    /// The windowing system could not be reached.
    #[error("windowing system connection failed: {0}")]
    Connection(String),
}

/// Hosts one foreign native surface inside the editor's native window.
///
/// The container exclusively owns the attachment: it is the only thing that
/// moves, resizes or detaches the foreign surface, and it detaches it before
/// it goes away. The foreign surface itself stays owned by the renderer.
pub trait Container: Sized {
    /// Create a container inside the editor's native window.
    fn create(parent: RawWindowHandle) -> Result<Self, AttachError>;

    /// Embed the foreign surface.
    fn attach(&mut self, child: RawWindowHandle) -> Result<(), AttachError>;

    /// Move and resize the embedded surface. Bounds equal to the current
    /// bounds cause no native call.
    fn set_bounds(&mut self, bounds: Bounds);

    /// Last bounds applied with [`set_bounds`](Self::set_bounds).
    fn bounds(&self) -> Bounds;

    /// Whether a foreign surface is currently embedded.
    fn is_attached(&self) -> bool;

    /// Un-embed the foreign surface. No-op if nothing is attached.
    fn detach(&mut self);
}

/// Short name of a raw handle's windowing system, for error messages.
pub fn handle_kind(handle: &RawWindowHandle) -> &'static str {
    match handle {
        RawWindowHandle::AppKit(_) => "AppKit",
        RawWindowHandle::UiKit(_) => "UiKit",
        RawWindowHandle::Win32(_) => "Win32",
        RawWindowHandle::WinRt(_) => "WinRt",
        RawWindowHandle::Xlib(_) => "Xlib",
        RawWindowHandle::Xcb(_) => "Xcb",
        RawWindowHandle::Wayland(_) => "Wayland",
        RawWindowHandle::Web(_) => "Web",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{WaylandWindowHandle, Win32WindowHandle};

    #[test]
    fn handle_kind_names() {
        assert_eq!(
            handle_kind(&RawWindowHandle::Win32(Win32WindowHandle::empty())),
            "Win32"
        );
        assert_eq!(
            handle_kind(&RawWindowHandle::Wayland(WaylandWindowHandle::empty())),
            "Wayland"
        );
    }

    #[test]
    fn attach_error_display() {
        assert_eq!(
            AttachError::UnsupportedHandle("Wayland").to_string(),
            "unsupported native handle type: Wayland"
        );
    }
}
