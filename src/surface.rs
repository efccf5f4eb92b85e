use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::bridge::{flog, js_err, parse_js};
use crate::hover::{ContentPanel, HoverController, HoverEvent};

/// Seam to the external point renderer. An implementation publishes
/// readiness once, exposes its per-point metadata and accepts a hover
/// callback in place of its own tooltip.
pub trait RenderSurface {
    /// Resolves once the surface has produced its metadata. Consumed by a
    /// single subscription; there is no polling.
    fn ready(&self) -> LocalBoxFuture<'static, ()>;

    /// Per-point metadata table, indexed by point index.
    fn metadata(&self) -> Vec<Value>;

    fn on_hover(&self, handler: Box<dyn FnMut(HoverEvent)>);

    /// Disable the surface's built-in tooltip.
    fn suppress_tooltip(&self);
}

#[wasm_bindgen]
extern "C" {
    /// JS point-map renderer the overlay attaches to.
    pub type PointSurface;

    // Promise resolving once point metadata is available.
    #[wasm_bindgen(method)]
    fn ready(this: &PointSurface) -> js_sys::Promise;

    #[wasm_bindgen(method, getter, js_name = metaData)]
    fn meta_data(this: &PointSurface) -> JsValue;

    // Registers a callback invoked with { index, x, y } on pointer hover.
    #[wasm_bindgen(method, js_name = onHover)]
    fn on_hover(this: &PointSurface, callback: &JsValue);

    // Clears the surface's own tooltip callback.
    #[wasm_bindgen(method, js_name = suppressTooltip)]
    fn suppress_tooltip(this: &PointSurface);
}

pub struct JsSurface {
    surface: Rc<PointSurface>,
}

impl JsSurface {
    pub fn new(surface: PointSurface) -> Self {
        JsSurface {
            surface: Rc::new(surface),
        }
    }
}

impl RenderSurface for JsSurface {
    fn ready(&self) -> LocalBoxFuture<'static, ()> {
        let promise = self.surface.ready();
        Box::pin(async move {
            if let Err(e) = JsFuture::from(promise).await {
                flog!("Surface readiness rejected: {}", js_err(e));
            }
        })
    }

    fn metadata(&self) -> Vec<Value> {
        parse_js(&self.surface.meta_data()).unwrap_or_default()
    }

    fn on_hover(&self, mut handler: Box<dyn FnMut(HoverEvent)>) {
        let closure = Closure::wrap(Box::new(move |event: JsValue| {
            if let Some(event) = parse_js::<HoverEvent>(&event) {
                handler(event);
            }
        }) as Box<dyn FnMut(JsValue)>);
        self.surface.on_hover(closure.as_ref());
        closure.forget();
    }

    fn suppress_tooltip(&self) {
        self.surface.suppress_tooltip();
    }
}

/// Wire the controller to the surface: await readiness, take over the
/// tooltip, then feed hover events into the controller on the event loop.
pub fn bind<P: ContentPanel + 'static>(
    controller: Rc<HoverController<P>>,
    surface: Rc<dyn RenderSurface>,
) {
    spawn_local(async move {
        surface.ready().await;
        surface.suppress_tooltip();
        controller.set_metadata(surface.metadata());

        let handler_controller = controller.clone();
        surface.on_hover(Box::new(move |event| {
            spawn_local(handler_controller.clone().handle_hover(event));
        }));
    });
}
