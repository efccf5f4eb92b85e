use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

use crate::config::OverlayConfig;
use crate::dom::element::Element;
use crate::hover::ContentPanel;
use crate::Res;

/// Display state of the panel. `Fading` is the window between a hide
/// request and its delayed `display: none`.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Visibility {
    Hidden,
    Visible,
    Fading,
}

impl Visibility {
    /// Transition for a hide request. Returns the next state and whether
    /// the display-none timer should be scheduled.
    fn begin_fade(self) -> (Visibility, bool) {
        match self {
            Visibility::Visible => (Visibility::Fading, true),
            other => (other, false),
        }
    }

    /// Transition when the fade timer fires. The panel is only concealed
    /// if no show superseded the hide in the meantime.
    fn fade_elapsed(self) -> (Visibility, bool) {
        match self {
            Visibility::Fading => (Visibility::Hidden, true),
            other => (other, false),
        }
    }
}

/// The floating panel: a single absolutely positioned div on the document
/// body, shown next to the pointer.
pub struct Overlay {
    element: Element,
    visibility: Rc<Cell<Visibility>>,
    fade_ms: u32,
    offset: f32,
}

impl Overlay {
    pub fn create(config: &OverlayConfig) -> Res<Self> {
        let element = Element::div()?
            .with_attr("style", &config.style)
            .with_class(&config.class_name);

        // Applied after the configured style: the panel positions itself
        // and starts hidden.
        element.set_css("position", "absolute");
        element.set_display("none");
        element.set_inner_html(&config.initial_html);
        element.add_to_page()?;

        Ok(Overlay {
            element,
            visibility: Rc::new(Cell::new(Visibility::Hidden)),
            fade_ms: config.fade_ms,
            offset: config.pointer_offset,
        })
    }
}

impl ContentPanel for Overlay {
    fn show_at(&self, x: f32, y: f32) {
        self.element.set_pos(x + self.offset, y + self.offset);
        self.element.set_display("block");
        self.element.set_opacity(1.0);
        self.visibility.set(Visibility::Visible);
    }

    fn hide(&self) {
        let (next, schedule) = self.visibility.get().begin_fade();
        self.visibility.set(next);
        if !schedule {
            return;
        }

        self.element.set_opacity(0.0);

        let element = self.element.clone();
        let visibility = self.visibility.clone();
        Timeout::new(self.fade_ms, move || {
            let (next, conceal) = visibility.get().fade_elapsed();
            visibility.set(next);
            if conceal {
                element.set_display("none");
            }
        })
        .forget();
    }

    fn set_content(&self, html: &str) {
        self.element.set_inner_html(html);
    }

    fn destroy(&self) {
        self.element.remove();
        self.visibility.set(Visibility::Hidden);
    }
}

#[cfg(test)]
mod tests {
    use super::Visibility;

    #[test]
    fn test_hide_when_hidden_is_noop() {
        let (next, schedule) = Visibility::Hidden.begin_fade();
        assert_eq!(next, Visibility::Hidden);
        assert!(!schedule);

        // A second hide while already fading schedules nothing either.
        let (next, schedule) = Visibility::Fading.begin_fade();
        assert_eq!(next, Visibility::Fading);
        assert!(!schedule);
    }

    #[test]
    fn test_show_supersedes_pending_fade() {
        let (fading, schedule) = Visibility::Visible.begin_fade();
        assert_eq!(fading, Visibility::Fading);
        assert!(schedule);

        // show_at flips the state back to Visible before the timer fires;
        // the elapsed transition must then leave the panel displayed.
        let (next, conceal) = Visibility::Visible.fade_elapsed();
        assert_eq!(next, Visibility::Visible);
        assert!(!conceal);
    }

    #[test]
    fn test_fade_runs_to_hidden() {
        let (next, conceal) = Visibility::Fading.fade_elapsed();
        assert_eq!(next, Visibility::Hidden);
        assert!(conceal);
    }
}
