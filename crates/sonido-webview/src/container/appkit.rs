//! macOS container: the renderer's `NSView` becomes a subview of the
//! editor's `NSView`.

#![allow(unsafe_code)]

use objc2::rc::Retained;
use objc2_app_kit::NSView;
use objc2_foundation::{NSPoint, NSRect, NSSize};
use raw_window_handle::RawWindowHandle;

use super::{AttachError, Container, handle_kind};
use crate::geometry::Bounds;

/// Hosts a foreign `NSView` inside the editor's `NSView`.
pub struct AppKitContainer {
    parent: Retained<NSView>,
    child: Option<Retained<NSView>>,
    bounds: Bounds,
}

fn retain_view(handle: RawWindowHandle) -> Result<Retained<NSView>, AttachError> {
    let RawWindowHandle::AppKit(appkit) = handle else {
        return Err(AttachError::UnsupportedHandle(handle_kind(&handle)));
    };
    // SAFETY: the host (parent) and the renderer (child) hand us pointers to
    // live NSView objects. Retaining keeps them alive for as long as the
    // container holds them; a null pointer yields `None`.
    unsafe { Retained::retain(appkit.ns_view.cast::<NSView>()) }.ok_or(AttachError::NullHandle)
}

impl AppKitContainer {
    /// Frame for `bounds` in the parent's coordinate system. AppKit views
    /// are bottom-left based unless flipped.
    fn frame_for(&self, bounds: Bounds) -> NSRect {
        let height = f64::from(bounds.height);
        let y = if self.parent.isFlipped() {
            f64::from(bounds.y)
        } else {
            self.parent.bounds().size.height - f64::from(bounds.y) - height
        };
        NSRect::new(
            NSPoint::new(f64::from(bounds.x), y),
            NSSize::new(f64::from(bounds.width), height),
        )
    }
}

impl Container for AppKitContainer {
    fn create(parent: RawWindowHandle) -> Result<Self, AttachError> {
        Ok(Self {
            parent: retain_view(parent)?,
            child: None,
            bounds: Bounds::default(),
        })
    }

    fn attach(&mut self, child: RawWindowHandle) -> Result<(), AttachError> {
        if self.child.is_some() {
            return Err(AttachError::AlreadyAttached);
        }
        let view = retain_view(child)?;
        if Retained::as_ptr(&view) == Retained::as_ptr(&self.parent) {
            return Err(AttachError::InvalidHandle(
                "cannot embed a view into itself".to_string(),
            ));
        }

        self.parent.addSubview(&view);
        view.setFrame(self.frame_for(self.bounds));
        tracing::debug!("NSView attached");
        self.child = Some(view);
        Ok(())
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        if let Some(view) = &self.child {
            view.setFrame(self.frame_for(bounds));
        }
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn is_attached(&self) -> bool {
        self.child.is_some()
    }

    fn detach(&mut self) {
        if let Some(view) = self.child.take() {
            // SAFETY: `view` is retained and is a subview of `parent`.
            unsafe { view.removeFromSuperview() };
            tracing::debug!("NSView detached");
        }
    }
}

impl Drop for AppKitContainer {
    fn drop(&mut self) {
        self.detach();
    }
}
