use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;

use crate::cache::ContentCache;
use crate::config::OverlayConfig;


/// A pointer hover reported by the rendering surface.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct HoverEvent {
    /// Index of the hovered point. Absent when the pointer is over empty
    /// space.
    #[serde(default)]
    pub index: Option<usize>,
    pub x: f32,
    pub y: f32,
}

/// Rendering target for resolved content. The DOM overlay implements this;
/// tests substitute a recording stub.
pub trait ContentPanel {
    /// Immediate show at a page position, no fade-in. Also rescues a panel
    /// mid fade-out.
    fn show_at(&self, x: f32, y: f32);

    /// Request a fade-out. Must be a no-op when already hidden.
    fn hide(&self);

    fn set_content(&self, html: &str);

    /// Detach from the page. Must tolerate repeated calls.
    fn destroy(&self);
}

struct HoverState {
    /// Identifier the panel currently shows content (or a placeholder) for.
    current: Option<String>,

    /// Bumped whenever `current` changes, including when it clears. A fetch
    /// captures the generation at launch and only renders its result if the
    /// generation still matches at completion; stale completions are
    /// discarded, not queued.
    generation: u64,

    /// At most one fetch runs at a time. A hover for another identifier
    /// while this is set starts nothing; there is no cancellation, so a
    /// hung fetch blocks further fetches until it resolves.
    fetch_in_flight: bool,

    cache: ContentCache,

    /// Per-point metadata from the surface, for default identifier
    /// resolution.
    metadata: Rc<Vec<Value>>,
}

/// The hover state machine: resolves identifiers, debounces fetches and
/// feeds content to the panel. Everything runs on one logical thread;
/// suspension happens only at the fetch await point, and state borrows are
/// never held across it.
pub struct HoverController<P: ContentPanel> {
    panel: P,
    config: OverlayConfig,
    state: RefCell<HoverState>,
}

impl<P: ContentPanel> HoverController<P> {
    pub fn new(config: OverlayConfig, panel: P) -> Self {
        let cache = ContentCache::new(config.cache_capacity);
        HoverController {
            panel,
            config,
            state: RefCell::new(HoverState {
                current: None,
                generation: 0,
                fetch_in_flight: false,
                cache,
                metadata: Rc::new(Vec::new()),
            }),
        }
    }

    pub fn set_metadata(&self, rows: Vec<Value>) {
        self.state.borrow_mut().metadata = Rc::new(rows);
    }

    fn resolve(&self, event: &HoverEvent) -> Option<String> {
        if let Some(get_identifier) = &self.config.get_identifier {
            return get_identifier(event);
        }

        // Default: look the point up in the surface's metadata table. A row
        // is either the identifier itself or an object carrying it as "id".
        let state = self.state.borrow();
        let row = state.metadata.get(event.index?)?;
        row.as_str()
            .or_else(|| row.get("id").and_then(Value::as_str))
            .map(str::to_string)
    }

    /// Hide the panel and forget the displayed identifier.
    pub fn hide(&self) {
        let mut state = self.state.borrow_mut();
        if state.current.take().is_some() {
            state.generation += 1;
        }
        drop(state);
        self.panel.hide();
    }

    pub async fn handle_hover(self: Rc<Self>, event: HoverEvent) {
        let Some(ident) = self.resolve(&event) else {
            self.hide();
            return;
        };

        self.panel.show_at(event.x, event.y);

        let generation = {
            let mut state = self.state.borrow_mut();
            if state.current.as_deref() == Some(ident.as_str()) {
                // Same point as displayed; the show above already rescued
                // any pending fade-out.
                return;
            }
            state.current = Some(ident.clone());
            state.generation += 1;
            state.generation
        };

        self.panel
            .set_content(&(self.config.format_loading)(&ident));

        {
            let mut state = self.state.borrow_mut();
            if self.config.use_cache {
                if let Some(content) = state.cache.get(&ident) {
                    let html = (self.config.format_content)(content);
                    drop(state);
                    self.panel.set_content(&html);
                    return;
                }
            }

            if state.fetch_in_flight {
                // The pending fetch's completion is generation guarded, so
                // its result cannot clobber this hover. The loading
                // placeholder stays up until the user hovers again.
                return;
            }
            state.fetch_in_flight = true;
        }

        let result = (self.config.fetch_data)(&ident).await;

        let mut state = self.state.borrow_mut();
        state.fetch_in_flight = false;
        match result {
            Ok(content) => {
                // Stale results still land in the cache.
                if self.config.use_cache {
                    state.cache.insert(ident.clone(), content.clone());
                }
                let still_current = state.generation == generation;
                drop(state);
                if still_current {
                    self.panel
                        .set_content(&(self.config.format_content)(&content));
                }
            }
            Err(error) => {
                let still_current = state.generation == generation;
                drop(state);
                crate::bridge::flog!("Fetch for {ident} failed: {error}");
                if still_current {
                    self.panel
                        .set_content(&(self.config.format_error)(&error, &ident));
                }
            }
        }
    }

    /// Detach the panel and drop all cached content. Safe to call twice.
    pub fn destroy(&self) {
        let mut state = self.state.borrow_mut();
        state.cache.clear();
        if state.current.take().is_some() {
            state.generation += 1;
        }
        drop(state);
        self.panel.destroy();
    }

    #[cfg(test)]
    fn cache_len(&self) -> usize {
        self.state.borrow().cache.len()
    }

    #[cfg(test)]
    fn fetch_in_flight(&self) -> bool {
        self.state.borrow().fetch_in_flight
    }

    #[cfg(test)]
    fn current(&self) -> Option<String> {
        self.state.borrow().current.clone()
    }
}
