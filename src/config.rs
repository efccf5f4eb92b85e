use futures::future::LocalBoxFuture;
use serde_json::Value;

use crate::hover::HoverEvent;
use crate::{err, Res};

/// Derives the content identifier for a hovered point, if any.
pub type GetIdentifier = Box<dyn Fn(&HoverEvent) -> Option<String>>;

/// Retrieves content for an identifier. The transport behind this is the
/// caller's business; failures come back as strings and are rendered into
/// the panel.
pub type FetchData = Box<dyn Fn(&str) -> LocalBoxFuture<'static, Res<Value>>>;

/// Renders fetched content to HTML for the panel.
pub type FormatContent = Box<dyn Fn(&Value) -> String>;

/// Renders the placeholder shown while a fetch is pending.
pub type FormatLoading = Box<dyn Fn(&str) -> String>;

/// Renders a fetch failure, given the error and the identifier it was for.
pub type FormatError = Box<dyn Fn(&str, &str) -> String>;

pub struct OverlayConfig {
    pub(crate) get_identifier: Option<GetIdentifier>,
    pub(crate) fetch_data: FetchData,
    pub(crate) format_content: FormatContent,
    pub(crate) format_loading: FormatLoading,
    pub(crate) format_error: FormatError,
    pub(crate) style: String,
    pub(crate) class_name: String,
    pub(crate) initial_html: String,
    pub(crate) fade_ms: u32,
    pub(crate) pointer_offset: f32,
    pub(crate) use_cache: bool,
    pub(crate) cache_capacity: Option<usize>,
}

impl OverlayConfig {
    pub const DEFAULT_STYLE: &'static str = "position: absolute; display: \
        none; opacity: 0; z-index: 10; pointer-events: none; background: \
        #fff; border: 1px solid #ccc; border-radius: 2px; padding: 4px 8px; \
        font-size: 12px;";
    pub const DEFAULT_CLASS: &'static str = "hoverlay-tooltip";
    pub const DEFAULT_FADE_MS: u32 = 200;
    pub const DEFAULT_POINTER_OFFSET: f32 = 12.0;
    pub const DEFAULT_CACHE_CAPACITY: usize = 256;

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct ConfigBuilder {
    get_identifier: Option<GetIdentifier>,
    fetch_data: Option<FetchData>,
    format_content: Option<FormatContent>,
    format_loading: Option<FormatLoading>,
    format_error: Option<FormatError>,
    style: Option<String>,
    class_name: Option<String>,
    initial_html: Option<String>,
    fade_ms: Option<u32>,
    pointer_offset: Option<f32>,
    use_cache: Option<bool>,
    cache_capacity: Option<Option<usize>>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override identifier resolution. When unset, identifiers come from
    /// the surface's metadata table, indexed by point index.
    pub fn get_identifier<F: Fn(&HoverEvent) -> Option<String> + 'static>(mut self, f: F) -> Self {
        self.get_identifier = Some(Box::new(f));
        self
    }

    pub fn fetch_data<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> LocalBoxFuture<'static, Res<Value>> + 'static,
    {
        self.fetch_data = Some(Box::new(f));
        self
    }

    pub fn format_content<F: Fn(&Value) -> String + 'static>(mut self, f: F) -> Self {
        self.format_content = Some(Box::new(f));
        self
    }

    pub fn format_loading<F: Fn(&str) -> String + 'static>(mut self, f: F) -> Self {
        self.format_loading = Some(Box::new(f));
        self
    }

    pub fn format_error<F: Fn(&str, &str) -> String + 'static>(mut self, f: F) -> Self {
        self.format_error = Some(Box::new(f));
        self
    }

    pub fn style(mut self, style: &str) -> Self {
        self.style = Some(style.to_string());
        self
    }

    pub fn class_name(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    pub fn initial_html(mut self, initial_html: &str) -> Self {
        self.initial_html = Some(initial_html.to_string());
        self
    }

    pub fn fade_ms(mut self, fade_ms: u32) -> Self {
        self.fade_ms = Some(fade_ms);
        self
    }

    pub fn pointer_offset(mut self, pointer_offset: f32) -> Self {
        self.pointer_offset = Some(pointer_offset);
        self
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = Some(use_cache);
        self
    }

    /// Entry bound for the content cache. `None` means unbounded.
    pub fn cache_capacity(mut self, capacity: Option<usize>) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Fails if a required function is missing; that is a setup bug, not a
    /// runtime condition to recover from.
    pub fn build(self) -> Res<OverlayConfig> {
        let Some(fetch_data) = self.fetch_data else {
            return err("No fetch function configured.");
        };
        let Some(format_content) = self.format_content else {
            return err("No content formatter configured.");
        };

        Ok(OverlayConfig {
            get_identifier: self.get_identifier,
            fetch_data,
            format_content,
            format_loading: self
                .format_loading
                .unwrap_or_else(|| Box::new(|ident| format!("{ident} (loading)"))),
            format_error: self
                .format_error
                .unwrap_or_else(|| Box::new(|error, ident| format!("Failed to load {ident}: {error}"))),
            style: self
                .style
                .unwrap_or_else(|| OverlayConfig::DEFAULT_STYLE.to_string()),
            class_name: self
                .class_name
                .unwrap_or_else(|| OverlayConfig::DEFAULT_CLASS.to_string()),
            initial_html: self.initial_html.unwrap_or_default(),
            fade_ms: self.fade_ms.unwrap_or(OverlayConfig::DEFAULT_FADE_MS),
            pointer_offset: self
                .pointer_offset
                .unwrap_or(OverlayConfig::DEFAULT_POINTER_OFFSET),
            use_cache: self.use_cache.unwrap_or(true),
            cache_capacity: self
                .cache_capacity
                .unwrap_or(Some(OverlayConfig::DEFAULT_CACHE_CAPACITY)),
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;
    use serde_json::json;

    use super::*;

    fn fetch(ident: &str) -> LocalBoxFuture<'static, Res<Value>> {
        let data = json!(format!("data-{ident}"));
        async move { Ok(data) }.boxed_local()
    }

    #[test]
    fn test_build_without_fetch_fails() {
        let result = OverlayConfig::builder()
            .format_content(|_| String::new())
            .build();
        let Err(error) = result else {
            panic!("Expected build to fail.");
        };
        assert!(error.contains("fetch"));
    }

    #[test]
    fn test_build_without_formatter_fails() {
        let result = OverlayConfig::builder().fetch_data(fetch).build();
        let Err(error) = result else {
            panic!("Expected build to fail.");
        };
        assert!(error.contains("formatter"));
    }

    #[test]
    fn test_build_defaults() {
        let config = OverlayConfig::builder()
            .fetch_data(fetch)
            .format_content(|_| String::new())
            .build()
            .unwrap();

        assert!(config.use_cache);
        assert_eq!(
            config.cache_capacity,
            Some(OverlayConfig::DEFAULT_CACHE_CAPACITY)
        );
        assert_eq!(config.fade_ms, OverlayConfig::DEFAULT_FADE_MS);
        assert!(config.get_identifier.is_none());

        let loading = (config.format_loading)("abc");
        assert!(loading.contains("abc"));

        let error = (config.format_error)("boom", "abc");
        assert!(error.contains("boom") && error.contains("abc"));
    }
}
