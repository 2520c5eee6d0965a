//! Windows container: the renderer's `HWND` is re-parented into the
//! editor's `HWND` as a child window.

#![allow(unsafe_code)]

use raw_window_handle::RawWindowHandle;
use windows::Win32::Foundation::{BOOL, HWND};
use windows::Win32::UI::WindowsAndMessaging::{
    GWL_STYLE, GetWindowLongPtrW, IsWindow, MoveWindow, SW_HIDE, SW_SHOW, SetParent,
    SetWindowLongPtrW, ShowWindow, WS_CAPTION, WS_CHILD, WS_POPUP, WS_THICKFRAME,
};

use super::{AttachError, Container, handle_kind};
use crate::geometry::Bounds;

/// Hosts a foreign `HWND` inside the editor's `HWND`.
pub struct Win32Container {
    parent: HWND,
    child: Option<HWND>,
    bounds: Bounds,
}

fn hwnd_from(handle: RawWindowHandle) -> Result<HWND, AttachError> {
    let RawWindowHandle::Win32(win32) = handle else {
        return Err(AttachError::UnsupportedHandle(handle_kind(&handle)));
    };
    if win32.hwnd.is_null() {
        return Err(AttachError::NullHandle);
    }
    let hwnd = HWND(win32.hwnd);
    // SAFETY: IsWindow accepts any value and only reports whether it names
    // an existing window.
    if !unsafe { IsWindow(hwnd) }.as_bool() {
        return Err(AttachError::InvalidHandle(format!("{hwnd:?} is not a window")));
    }
    Ok(hwnd)
}

fn move_window(hwnd: HWND, bounds: Bounds) {
    // SAFETY: `hwnd` was validated on attach and is only moved while the
    // container holds it.
    let result = unsafe {
        MoveWindow(
            hwnd,
            bounds.x,
            bounds.y,
            bounds.width as i32,
            bounds.height as i32,
            BOOL::from(true),
        )
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "MoveWindow failed");
    }
}

impl Container for Win32Container {
    fn create(parent: RawWindowHandle) -> Result<Self, AttachError> {
        Ok(Self {
            parent: hwnd_from(parent)?,
            child: None,
            bounds: Bounds::default(),
        })
    }

    fn attach(&mut self, child: RawWindowHandle) -> Result<(), AttachError> {
        if self.child.is_some() {
            return Err(AttachError::AlreadyAttached);
        }
        let hwnd = hwnd_from(child)?;
        if hwnd == self.parent {
            return Err(AttachError::InvalidHandle(
                "cannot embed a window into itself".to_string(),
            ));
        }

        // SAFETY: both handles were checked with IsWindow above. Turning the
        // renderer's top-level window into a borderless child must happen
        // before SetParent so it is clipped to the editor window.
        unsafe {
            let style = GetWindowLongPtrW(hwnd, GWL_STYLE);
            let strip = (WS_POPUP.0 | WS_CAPTION.0 | WS_THICKFRAME.0) as isize;
            SetWindowLongPtrW(hwnd, GWL_STYLE, (style & !strip) | WS_CHILD.0 as isize);
            SetParent(hwnd, self.parent)
                .map_err(|e| AttachError::InvalidHandle(format!("SetParent failed: {e}")))?;
        }

        move_window(hwnd, self.bounds);
        // SAFETY: `hwnd` is a live child of the editor window.
        let _ = unsafe { ShowWindow(hwnd, SW_SHOW) };
        tracing::debug!(?hwnd, "HWND attached");
        self.child = Some(hwnd);
        Ok(())
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        if let Some(hwnd) = self.child {
            move_window(hwnd, bounds);
        }
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn is_attached(&self) -> bool {
        self.child.is_some()
    }

    fn detach(&mut self) {
        let Some(hwnd) = self.child.take() else {
            return;
        };
        // SAFETY: the renderer still owns `hwnd` at this point; hiding and
        // un-parenting it leaves it a valid (hidden) top-level window for the
        // renderer to destroy.
        unsafe {
            let _ = ShowWindow(hwnd, SW_HIDE);
            if let Err(e) = SetParent(hwnd, HWND::default()) {
                tracing::warn!(error = %e, "failed to un-parent embedded window");
            }
        }
        tracing::debug!(?hwnd, "HWND detached");
    }
}

impl Drop for Win32Container {
    fn drop(&mut self) {
        self.detach();
    }
}
