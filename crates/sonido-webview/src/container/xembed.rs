//! X11 container using the XEmbed protocol.
//!
//! The renderer's window may belong to a helper process with its own X
//! connection, so the embedding goes through the X server: re-parent the
//! foreign window into the editor window, tell it it has been embedded
//! (`XEMBED_EMBEDDED_NOTIFY`), map it and configure its geometry.
//!
//! The X connection is only opened in [`attach`](Container::attach): the
//! foreign window id does not exist until the renderer has been created.
//!
//! Protocol: <https://specifications.freedesktop.org/xembed-spec/>

use raw_window_handle::RawWindowHandle;
use x11rb::CURRENT_TIME;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Atom, ClientMessageEvent, ConfigureWindowAux, ConnectionExt as _, EventMask, Window,
};
use x11rb::rust_connection::RustConnection;

use super::{AttachError, Container, handle_kind};
use crate::geometry::Bounds;

const XEMBED_VERSION: u32 = 0;
const XEMBED_EMBEDDED_NOTIFY: u32 = 0;

/// Live embedding, created by `attach`.
struct Embedding {
    conn: RustConnection,
    root: Window,
    child: Window,
}

/// Hosts a foreign X11 window inside the editor's X11 window.
pub struct XEmbedContainer {
    parent: Window,
    bounds: Bounds,
    embedding: Option<Embedding>,
}

fn window_id(handle: RawWindowHandle) -> Result<Window, AttachError> {
    let id = match handle {
        RawWindowHandle::Xlib(h) => Window::try_from(h.window)
            .map_err(|_| AttachError::InvalidHandle(format!("window id {:#x} out of range", h.window)))?,
        RawWindowHandle::Xcb(h) => h.window,
        other => return Err(AttachError::UnsupportedHandle(handle_kind(&other))),
    };
    if id == 0 {
        return Err(AttachError::NullHandle);
    }
    Ok(id)
}

fn connection_error(e: impl std::fmt::Display) -> AttachError {
    AttachError::Connection(e.to_string())
}

impl XEmbedContainer {
    /// Id of the editor window the foreign window is embedded into.
    pub fn parent_window(&self) -> Window {
        self.parent
    }

    /// Id of the embedded foreign window, if any.
    pub fn child_window(&self) -> Option<Window> {
        self.embedding.as_ref().map(|e| e.child)
    }

    fn embed(&self, child: Window) -> Result<Embedding, AttachError> {
        let (conn, screen_num) = RustConnection::connect(None).map_err(connection_error)?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| AttachError::Connection(format!("no screen {screen_num}")))?;

        for window in [self.parent, child] {
            conn.get_window_attributes(window)
                .map_err(connection_error)?
                .reply()
                .map_err(|e| AttachError::InvalidHandle(format!("window {window:#x}: {e}")))?;
        }

        let xembed: Atom = conn
            .intern_atom(false, b"_XEMBED")
            .map_err(connection_error)?
            .reply()
            .map_err(connection_error)?
            .atom;

        conn.reparent_window(child, self.parent, clamp_i16(self.bounds.x), clamp_i16(self.bounds.y))
            .map_err(connection_error)?;
        if !self.bounds.is_empty() {
            conn.configure_window(child, &configure_aux(self.bounds))
                .map_err(connection_error)?;
        }

        let notify = ClientMessageEvent::new(
            32,
            child,
            xembed,
            [CURRENT_TIME, XEMBED_EMBEDDED_NOTIFY, 0, self.parent, XEMBED_VERSION],
        );
        conn.send_event(false, child, EventMask::NO_EVENT, notify)
            .map_err(connection_error)?;
        conn.map_window(child).map_err(connection_error)?;
        conn.flush().map_err(connection_error)?;

        Ok(Embedding { conn, root, child })
    }
}

fn clamp_i16(v: i32) -> i16 {
    v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

fn configure_aux(bounds: Bounds) -> ConfigureWindowAux {
    ConfigureWindowAux::new()
        .x(bounds.x)
        .y(bounds.y)
        .width(bounds.width.max(1))
        .height(bounds.height.max(1))
}

impl Container for XEmbedContainer {
    fn create(parent: RawWindowHandle) -> Result<Self, AttachError> {
        Ok(Self {
            parent: window_id(parent)?,
            bounds: Bounds::default(),
            embedding: None,
        })
    }

    fn attach(&mut self, child: RawWindowHandle) -> Result<(), AttachError> {
        if self.embedding.is_some() {
            return Err(AttachError::AlreadyAttached);
        }
        let child = window_id(child)?;
        if child == self.parent {
            return Err(AttachError::InvalidHandle(
                "cannot embed a window into itself".to_string(),
            ));
        }

        self.embedding = Some(self.embed(child)?);
        tracing::debug!(parent = self.parent, child, "XEmbed attached");
        Ok(())
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;

        let Some(embedding) = &self.embedding else {
            return;
        };
        let result = embedding
            .conn
            .configure_window(embedding.child, &configure_aux(bounds))
            .map(|_| ())
            .and_then(|()| embedding.conn.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to configure embedded window");
        }
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn is_attached(&self) -> bool {
        self.embedding.is_some()
    }

    fn detach(&mut self) {
        let Some(embedding) = self.embedding.take() else {
            return;
        };
        let conn = &embedding.conn;
        let result = conn
            .unmap_window(embedding.child)
            .and_then(|_| conn.reparent_window(embedding.child, embedding.root, 0, 0))
            .map(|_| ())
            .and_then(|()| conn.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to release embedded window");
        }
        tracing::debug!(child = embedding.child, "XEmbed detached");
    }
}

impl Drop for XEmbedContainer {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{AppKitWindowHandle, XcbWindowHandle, XlibWindowHandle};

    fn xlib(window: u64) -> RawWindowHandle {
        let mut handle = XlibWindowHandle::empty();
        handle.window = window as _;
        RawWindowHandle::Xlib(handle)
    }

    #[test]
    fn create_defers_connection() {
        // No X server needed: the connection is opened by attach.
        let container = XEmbedContainer::create(xlib(0x1234)).unwrap();
        assert_eq!(container.parent_window(), 0x1234);
        assert!(!container.is_attached());
        assert_eq!(container.child_window(), None);
    }

    #[test]
    fn create_accepts_xcb() {
        let mut handle = XcbWindowHandle::empty();
        handle.window = 77;
        let container = XEmbedContainer::create(RawWindowHandle::Xcb(handle)).unwrap();
        assert_eq!(container.parent_window(), 77);
    }

    #[test]
    fn zero_window_is_null() {
        assert_eq!(
            XEmbedContainer::create(xlib(0)).err(),
            Some(AttachError::NullHandle)
        );
    }

    #[test]
    fn foreign_handle_type_is_rejected() {
        let handle = RawWindowHandle::AppKit(AppKitWindowHandle::empty());
        assert_eq!(
            XEmbedContainer::create(handle).err(),
            Some(AttachError::UnsupportedHandle("AppKit"))
        );
    }

    #[test]
    fn attach_rejects_invalid_child_before_connecting() {
        let mut container = XEmbedContainer::create(xlib(0x1234)).unwrap();
        assert_eq!(container.attach(xlib(0)), Err(AttachError::NullHandle));
        assert_eq!(
            container.attach(xlib(0x1234)),
            Err(AttachError::InvalidHandle(
                "cannot embed a window into itself".to_string()
            ))
        );
        assert!(!container.is_attached());
    }

    #[test]
    fn bounds_tracked_while_detached() {
        let mut container = XEmbedContainer::create(xlib(0x1234)).unwrap();
        container.set_bounds(Bounds::from_size(300, 200));
        container.set_bounds(Bounds::from_size(640, 480));
        assert_eq!(container.bounds(), Bounds::from_size(640, 480));
        // Detaching with nothing attached is a no-op.
        container.detach();
    }
}
