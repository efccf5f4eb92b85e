#![allow(dead_code)]

use std::rc::Rc;

mod bridge;
mod cache;
mod config;
mod dom;
mod hover;
mod overlay;
mod surface;

pub use config::{ConfigBuilder, OverlayConfig};
pub use hover::{ContentPanel, HoverController, HoverEvent};
pub use overlay::Overlay;
pub use surface::{JsSurface, PointSurface, RenderSurface};

pub type Res<T> = Result<T, String>;

fn err<T, S: ToString>(s: S) -> Res<T> {
    Err(s.to_string())
}

/// Hover tooltip overlay for a point-map rendering surface. Owns the
/// floating panel and the hover state machine behind it.
pub struct Hoverlay {
    controller: Rc<HoverController<Overlay>>,
}

impl Hoverlay {
    /// Build the panel and append it, hidden, to the document body.
    pub fn create(config: OverlayConfig) -> Res<Self> {
        console_error_panic_hook::set_once();

        let overlay = Overlay::create(&config)?;
        let controller = Rc::new(HoverController::new(config, overlay));
        Ok(Hoverlay { controller })
    }

    /// Take over hover handling from the surface once it signals readiness.
    pub fn attach(&self, surface: Rc<dyn RenderSurface>) {
        surface::bind(self.controller.clone(), surface);
    }

    /// Remove the panel from the page and drop all cached content. Safe to
    /// call more than once.
    pub fn destroy(&self) {
        self.controller.destroy();
    }
}
