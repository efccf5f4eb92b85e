use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::bridge::{get_body, get_document};
use crate::Res;

pub struct Element {
    element: HtmlElement,
}

impl Element {
    pub fn try_new(name: &str) -> Res<Element> {
        let element = get_document()?
            .create_element(name)
            .map(|e| e.unchecked_into::<HtmlElement>())
            .map_err(|e| format!("Element creation failed: {e:?}."))?;

        Ok(Element { element })
    }

    pub fn div() -> Res<Element> {
        Self::try_new("div")
    }

    pub fn add_to_page(&self) -> Res<()> {
        get_body()?
            .append_child(self.node())
            .map_err(|e| format!("Failed to append element: {e:?}."))?;
        Ok(())
    }

    fn node(&self) -> &web_sys::Node {
        self.element.unchecked_ref::<web_sys::Node>()
    }

    pub fn remove(&self) {
        self.element.remove();
    }

    pub fn add_class(&self, class: &str) {
        self.element.class_list().add_1(class).ok();
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        self.try_set_attr(name, value).ok();
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_css(&self, property: &str, value: &str) {
        self.try_set_css(property, value).ok();
    }

    /// Move the element to a pixel position on the page.
    pub fn set_pos(&self, x: f32, y: f32) {
        self.set_css("left", &format!("{x}px"));
        self.set_css("top", &format!("{y}px"));
    }

    pub fn set_opacity(&self, opacity: f32) {
        self.set_css("opacity", &format!("{opacity}"));
    }

    pub fn set_display(&self, display: &str) {
        self.set_css("display", display);
    }

    pub fn set_inner_html(&self, inner_html: &str) {
        self.element.set_inner_html(inner_html);
    }

    fn try_set_css(&self, property: &str, value: &str) -> Res<()> {
        self.element
            .style()
            .set_property(property, value)
            .map_err(|e| format!("Failed to set element CSS: {e:?}."))
    }

    fn try_set_attr(&self, name: &str, value: &str) -> Res<()> {
        self.element
            .set_attribute(name, value)
            .map_err(|e| format!("Failed to set element attribute: {e:?}."))
    }
}

impl Clone for Element {
    fn clone(&self) -> Self {
        Self {
            element: self.element.clone(),
        }
    }
}
