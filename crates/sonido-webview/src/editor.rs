//! The editor surface: owns one renderer and one platform container and
//! keeps them in step with the host's editor window and the parameter host.
//!
//! # Lifecycle
//!
//! ```text
//! EditorSurface::new
//!     ├── validate config (size, asset root, entry document)
//!     ├── C::create(parent)           container inside the host window
//!     ├── factory.create(options)     renderer
//!     ├── renderer.navigate(entry)
//!     ├── container.attach(renderer surface)
//!     ├── apply initial bounds
//!     └── install message sink        inbound events start flowing
//!
//! host idle timer ──► on_idle ──► dispatch inbound events (UI thread)
//!                              └► push host-originated changes
//!
//! Drop: clear sink ─► detach container ─► destroy renderer
//! ```
//!
//! Nothing the renderer sends is applied until [`EditorSurface::on_idle`]
//! runs on the UI thread, and nothing is applied once the surface is gone:
//! the receiving half of the channel is dropped first on teardown.

use std::marker::PhantomData;

use crossbeam_channel::Receiver;
use raw_window_handle::RawWindowHandle;
use serde_json::Value;
use sonido_params::{ParamHost, ParamIndex};

use crate::config::EditorConfig;
use crate::container::{Container, NativeContainer};
use crate::dispatch::EventDispatcher;
use crate::error::EditorError;
use crate::event::{self, OutboundEvent};
use crate::geometry::{Bounds, Canvas, Rgba};
use crate::renderer::{Renderer, RendererFactory, RendererOptions, message_channel};
use crate::thread::UiThread;

/// A plugin editor whose content is drawn by an embedded web renderer.
///
/// Exclusively owns its renderer and container. `P` is the parameter host,
/// usually a borrowed `&T` (the host guarantees the processor outlives the
/// editor) or an `Arc`/[`SharedParams`](sonido_params::SharedParams) clone.
///
/// Not `Send`: every method must be called on the thread that created it.
pub struct EditorSurface<P, R, C = NativeContainer>
where
    P: ParamHost,
    R: Renderer,
    C: Container,
{
    params: P,
    renderer: R,
    container: C,
    dispatcher: EventDispatcher,
    /// `None` once teardown has started.
    inbound: Option<Receiver<Value>>,
    width: u32,
    height: u32,
    /// Bounds last pushed to the container and renderer.
    applied: Bounds,
    background: Rgba,
    ui_thread: UiThread,
    _not_send: PhantomData<*const ()>,
}

impl<P, R, C> EditorSurface<P, R, C>
where
    P: ParamHost,
    R: Renderer,
    C: Container,
{
    /// Open an editor inside `parent`, the host's editor window.
    ///
    /// All-or-nothing: on error, a renderer that was already created has been
    /// destroyed and the container holds no foreign surface.
    pub fn new<F>(
        params: P,
        parent: RawWindowHandle,
        config: &EditorConfig,
        factory: &F,
    ) -> Result<Self, EditorError>
    where
        F: RendererFactory<Renderer = R>,
    {
        let ui_thread = UiThread::current();
        let entry_url = config.entry_url()?;
        let bounds = Bounds::from_size(config.width, config.height);

        let mut container = C::create(parent)?;
        let options = RendererOptions {
            asset_root: config.asset_root.clone(),
            entry_url,
            width: config.width,
            height: config.height,
            developer_mode: config.developer_mode,
            background: config.background,
        };
        let mut renderer = factory.create(&options)?;

        if let Err(e) = embed(&mut renderer, &mut container, &options.entry_url, bounds) {
            tracing::warn!(error = %e, "editor construction failed, releasing renderer");
            container.detach();
            renderer.destroy();
            return Err(e);
        }
        renderer.resize(config.width, config.height);

        if !params.is_ready() {
            tracing::debug!("parameter host not ready yet, parameter events will be dropped");
        }

        let (sink, inbound) = message_channel();
        renderer.set_message_sink(sink);

        tracing::info!(
            width = config.width,
            height = config.height,
            params = params.param_count(),
            "web editor opened"
        );

        Ok(Self {
            params,
            renderer,
            container,
            dispatcher: EventDispatcher::new(),
            inbound: Some(inbound),
            width: config.width,
            height: config.height,
            applied: bounds,
            background: config.background,
            ui_thread,
            _not_send: PhantomData,
        })
    }

    /// The live renderer, for collaborators that need to inspect it.
    pub fn renderer(&self) -> &R {
        self.ui_thread.assert_current("EditorSurface::renderer");
        &self.renderer
    }

    /// Mutable access to the live renderer.
    pub fn renderer_mut(&mut self) -> &mut R {
        self.ui_thread.assert_current("EditorSurface::renderer_mut");
        &mut self.renderer
    }

    /// The platform container hosting the renderer's surface.
    pub fn container(&self) -> &C {
        self.ui_thread.assert_current("EditorSurface::container");
        &self.container
    }

    /// The parameter host this editor edits.
    pub fn params(&self) -> &P {
        self.ui_thread.assert_current("EditorSurface::params");
        &self.params
    }

    /// Paint the editor's own background. The renderer draws its content
    /// natively on top; nothing else is painted here.
    pub fn paint(&self, canvas: &mut dyn Canvas) {
        self.ui_thread.assert_current("EditorSurface::paint");
        let bounds = self.bounds();
        if !bounds.is_empty() {
            canvas.fill_rect(bounds, self.background);
        }
    }

    /// Current size in logical pixels.
    pub fn size(&self) -> (u32, u32) {
        self.ui_thread.assert_current("EditorSurface::size");
        (self.width, self.height)
    }

    /// Content bounds: the whole editor area.
    pub fn bounds(&self) -> Bounds {
        self.ui_thread.assert_current("EditorSurface::bounds");
        Bounds::from_size(self.width, self.height)
    }

    /// Host-driven resize. Applied exactly, without clamping.
    ///
    /// Returns whether the container and renderer were touched.
    pub fn set_size(&mut self, width: u32, height: u32) -> bool {
        self.ui_thread.assert_current("EditorSurface::set_size");
        self.width = width;
        self.height = height;
        self.resized()
    }

    /// Push the current content bounds to the container and then the
    /// renderer. Does nothing when they already match.
    ///
    /// Returns whether the container and renderer were touched.
    pub fn resized(&mut self) -> bool {
        self.ui_thread.assert_current("EditorSurface::resized");
        let bounds = self.bounds();
        if bounds == self.applied {
            return false;
        }
        self.container.set_bounds(bounds);
        self.renderer.resize(bounds.width, bounds.height);
        self.applied = bounds;
        tracing::trace!(width = bounds.width, height = bounds.height, "editor resized");
        true
    }

    /// Register a handler for a custom event type sent by the web content.
    /// Returns `false` for built-in types, which cannot be replaced.
    pub fn register_handler<H>(&mut self, type_name: impl Into<String>, handler: H) -> bool
    where
        H: FnMut(&Value) -> Option<Value> + 'static,
    {
        self.ui_thread.assert_current("EditorSurface::register_handler");
        self.dispatcher.register(type_name, Box::new(handler))
    }

    /// Remove a custom handler. Returns whether one was registered.
    pub fn unregister_handler(&mut self, type_name: &str) -> bool {
        self.ui_thread.assert_current("EditorSurface::unregister_handler");
        self.dispatcher.unregister(type_name)
    }

    /// Handle everything the renderer queued since the last call, then push
    /// host-originated parameter changes into the web content.
    ///
    /// Call from the host's idle / timer callback. Returns the number of
    /// inbound messages handled.
    pub fn on_idle(&mut self) -> usize {
        self.ui_thread.assert_current("EditorSurface::on_idle");
        let Some(inbound) = &self.inbound else {
            return 0;
        };

        // Only what is queued now; messages arriving meanwhile wait for the
        // next idle call.
        let pending = inbound.len();
        let mut handled = 0;
        for message in inbound.try_iter().take(pending) {
            let result = self.dispatcher.dispatch(&self.params, &message);
            if let Some(request_id) = event::request_id(&message) {
                let response = OutboundEvent::Response {
                    request_id: request_id.clone(),
                    result: result.unwrap_or(Value::Null),
                };
                post(&mut self.renderer, &response.to_value());
            } else if event::event_type(&message) == Some(event::REQUEST_PARAMETER_SNAPSHOT)
                && let Some(snapshot) = result
            {
                post(&mut self.renderer, &snapshot);
            }
            handled += 1;
        }

        self.push_host_changes();
        handled
    }

    /// Tell the web content that `index` changed on the host side.
    pub fn param_value_changed(&mut self, index: ParamIndex) {
        self.ui_thread.assert_current("EditorSurface::param_value_changed");
        if let Some(value) = self.params.normalized_value(index) {
            let changed = OutboundEvent::ParameterValueChanged { id: index.0, value };
            post(&mut self.renderer, &changed.to_value());
        }
    }

    /// Tell the web content that any number of parameters changed (preset
    /// load, state restore). Sends a full snapshot.
    pub fn param_values_changed(&mut self) {
        self.ui_thread.assert_current("EditorSurface::param_values_changed");
        let snapshot = OutboundEvent::snapshot(&self.params);
        post(&mut self.renderer, &snapshot.to_value());
    }

    fn push_host_changes(&mut self) {
        let mut changed = Vec::new();
        self.params
            .drain_changes(&mut |index, value| changed.push((index, value)));
        for (index, value) in changed {
            let event = OutboundEvent::ParameterValueChanged { id: index.0, value };
            post(&mut self.renderer, &event.to_value());
        }
    }
}

impl<P, R, C> Drop for EditorSurface<P, R, C>
where
    P: ParamHost,
    R: Renderer,
    C: Container,
{
    fn drop(&mut self) {
        self.ui_thread.assert_current("EditorSurface::drop");
        // Stop delivery first so no late message can reach the parameters.
        self.renderer.clear_message_sink();
        if let Some(inbound) = self.inbound.take() {
            let dropped = inbound.len();
            drop(inbound);
            if dropped > 0 {
                tracing::debug!(dropped, "discarding undelivered web view messages");
            }
        }
        self.container.detach();
        self.renderer.destroy();
        tracing::debug!("web editor closed");
    }
}

fn embed<R: Renderer, C: Container>(
    renderer: &mut R,
    container: &mut C,
    entry_url: &str,
    bounds: Bounds,
) -> Result<(), EditorError> {
    renderer.navigate(entry_url)?;
    let surface = renderer
        .native_handle()
        .ok_or(EditorError::MissingNativeHandle)?;
    container.set_bounds(bounds);
    container.attach(surface)?;
    Ok(())
}

fn post<R: Renderer>(renderer: &mut R, message: &Value) {
    if let Err(e) = renderer.post_message(message) {
        tracing::warn!(error = %e, "failed to post event to web view");
    }
}
