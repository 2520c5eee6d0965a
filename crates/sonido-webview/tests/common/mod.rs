//! Shared test doubles: a renderer and a container that record every call
//! into one ordered log.

#![allow(dead_code)]

use std::cell::RefCell;
use std::ffi::c_void;
use std::sync::Arc;

use parking_lot::Mutex;
use raw_window_handle::{RawWindowHandle, Win32WindowHandle};
use serde_json::Value;
use sonido_params::{ParamRange, ParamSpec, SharedParams};
use sonido_webview::{
    AttachError, Bounds, Container, EditorConfig, EditorError, EditorSurface, MessageSink,
    Renderer, RendererError, RendererOptions,
};
use tempfile::TempDir;

/// Parent handle the recording container accepts.
pub const PARENT: usize = 0x1000;
/// Surface handle the recording renderer hands out.
pub const SURFACE: usize = 0x2000;
/// Surface handle the recording container refuses to attach.
pub const BAD_SURFACE: usize = 0xdead;

/// One observed call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    RendererCreate,
    Navigate(String),
    Post(Value),
    SetSink,
    ClearSink,
    Resize(u32, u32),
    Destroy,
    ContainerCreate,
    Attach,
    SetBounds(Bounds),
    Detach,
}

/// Ordered log shared by the renderer and container of one test.
#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
    sink: Mutex<Option<MessageSink>>,
}

thread_local! {
    static CURRENT: RefCell<Option<Arc<Recorder>>> = const { RefCell::new(None) };
}

impl Recorder {
    /// Fresh recorder, also installed for containers created on this thread.
    pub fn install() -> Arc<Self> {
        init_tracing();
        let recorder = Arc::new(Self::default());
        CURRENT.with(|current| *current.borrow_mut() = Some(Arc::clone(&recorder)));
        recorder
    }

    fn current() -> Arc<Self> {
        CURRENT.with(|current| {
            current
                .borrow()
                .clone()
                .expect("Recorder::install must run before creating a container")
        })
    }

    pub fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Messages posted to the web content, in order.
    pub fn posted(&self) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Post(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls.lock().iter().filter(|call| *call == wanted).count()
    }

    /// Position of the first matching call.
    pub fn position(&self, wanted: &Call) -> Option<usize> {
        self.calls.lock().iter().position(|call| call == wanted)
    }

    /// Sink the editor installed, as the web content would use it.
    pub fn sink(&self) -> MessageSink {
        self.sink.lock().clone().expect("editor installed no message sink")
    }

    /// Send a message as if the web content had posted it.
    pub fn send(&self, message: Value) -> bool {
        self.sink().send(message)
    }
}

/// Renderer double.
pub struct RecordingRenderer {
    recorder: Arc<Recorder>,
    surface: Option<usize>,
    fail_navigation: bool,
}

impl Renderer for RecordingRenderer {
    fn native_handle(&self) -> Option<RawWindowHandle> {
        self.surface.map(win32)
    }

    fn navigate(&mut self, url: &str) -> Result<(), RendererError> {
        self.recorder.record(Call::Navigate(url.to_string()));
        if self.fail_navigation {
            return Err(RendererError::Navigation(url.to_string()));
        }
        Ok(())
    }

    fn post_message(&mut self, message: &Value) -> Result<(), RendererError> {
        self.recorder.record(Call::Post(message.clone()));
        Ok(())
    }

    fn set_message_sink(&mut self, sink: MessageSink) {
        self.recorder.record(Call::SetSink);
        *self.recorder.sink.lock() = Some(sink);
    }

    fn clear_message_sink(&mut self) {
        self.recorder.record(Call::ClearSink);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.recorder.record(Call::Resize(width, height));
    }

    fn destroy(&mut self) {
        self.recorder.record(Call::Destroy);
    }
}

/// Factory producing a [`RecordingRenderer`] that reports `surface` as its
/// native handle.
pub fn factory(
    recorder: &Arc<Recorder>,
    surface: Option<usize>,
) -> impl Fn(&RendererOptions) -> Result<RecordingRenderer, RendererError> + use<> {
    let recorder = Arc::clone(recorder);
    move |_options: &RendererOptions| {
        recorder.record(Call::RendererCreate);
        Ok(RecordingRenderer {
            recorder: Arc::clone(&recorder),
            surface,
            fail_navigation: false,
        })
    }
}

/// Factory whose renderers fail to load content.
pub fn failing_navigation_factory(
    recorder: &Arc<Recorder>,
) -> impl Fn(&RendererOptions) -> Result<RecordingRenderer, RendererError> + use<> {
    let recorder = Arc::clone(recorder);
    move |_options: &RendererOptions| {
        recorder.record(Call::RendererCreate);
        Ok(RecordingRenderer {
            recorder: Arc::clone(&recorder),
            surface: Some(SURFACE),
            fail_navigation: true,
        })
    }
}

/// Container double. Accepts any non-null Win32 parent and refuses
/// [`BAD_SURFACE`].
pub struct RecordingContainer {
    recorder: Arc<Recorder>,
    bounds: Bounds,
    attached: bool,
}

impl Container for RecordingContainer {
    fn create(parent: RawWindowHandle) -> Result<Self, AttachError> {
        let recorder = Recorder::current();
        recorder.record(Call::ContainerCreate);
        match parent {
            RawWindowHandle::Win32(handle) if handle.hwnd.is_null() => Err(AttachError::NullHandle),
            RawWindowHandle::Win32(_) => Ok(Self {
                recorder,
                bounds: Bounds::default(),
                attached: false,
            }),
            _ => Err(AttachError::UnsupportedHandle("test")),
        }
    }

    fn attach(&mut self, child: RawWindowHandle) -> Result<(), AttachError> {
        if self.attached {
            return Err(AttachError::AlreadyAttached);
        }
        if child == win32(BAD_SURFACE) {
            return Err(AttachError::InvalidHandle("refused by test".to_string()));
        }
        self.recorder.record(Call::Attach);
        self.attached = true;
        Ok(())
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        if bounds == self.bounds {
            return;
        }
        self.recorder.record(Call::SetBounds(bounds));
        self.bounds = bounds;
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn detach(&mut self) {
        if self.attached {
            self.recorder.record(Call::Detach);
            self.attached = false;
        }
    }
}

/// Route `tracing` output through the test harness (`RUST_LOG=debug`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Editor wired to the recording doubles.
pub type TestEditor<P> = EditorSurface<P, RecordingRenderer, RecordingContainer>;

/// Win32 handle with the given `hwnd` value.
pub fn win32(hwnd: usize) -> RawWindowHandle {
    let mut handle = Win32WindowHandle::empty();
    handle.hwnd = hwnd as *mut c_void;
    RawWindowHandle::Win32(handle)
}

/// Asset directory containing an `index.html`.
pub fn asset_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<!doctype html>").unwrap();
    dir
}

/// Three-parameter store: Drive (0.0), Tone (0.5), Mix (1.0).
pub fn params() -> SharedParams {
    SharedParams::new(
        vec![
            ParamSpec::new("Drive", ParamRange::unit(0.0)),
            ParamSpec::new("Tone", ParamRange::unit(0.5)),
            ParamSpec::new("Mix", ParamRange::unit(1.0)),
        ],
        None,
    )
}

/// Open an editor on the recording doubles.
pub fn open<P: sonido_params::ParamHost>(
    params: P,
    config: &EditorConfig,
    recorder: &Arc<Recorder>,
) -> Result<TestEditor<P>, EditorError> {
    EditorSurface::new(params, win32(PARENT), config, &factory(recorder, Some(SURFACE)))
}
