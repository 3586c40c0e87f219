/// Scroll sentinel
///
/// A fixed-height marker sits after the last grid row. When at least half of
/// it is inside the scrollable viewport the next page is requested. The
/// sentinel is edge-triggered: it fires when the marker becomes visible, and
/// a fresh subscription forgets the previous visibility so an already
/// visible marker fires again on the next observation.

use iced::widget::{container, text};
use iced::{Element, Length};

use crate::Message;

/// Height of the trailing marker
pub const SENTINEL_HEIGHT: f32 = 80.0;

/// Fraction of the marker that must be visible
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

/// Scroll position and sizes reported by the gallery scrollable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub offset_y: f32,
    pub viewport_height: f32,
    pub content_height: f32,
}

impl ViewportGeometry {
    pub fn from_viewport(viewport: &iced::widget::scrollable::Viewport) -> Self {
        Self {
            offset_y: viewport.absolute_offset().y,
            viewport_height: viewport.bounds().height,
            content_height: viewport.content_bounds().height,
        }
    }

    /// Fraction (0.0..=1.0) of the marker inside the viewport.
    /// The marker is the last `SENTINEL_HEIGHT` pixels of the content.
    pub fn sentinel_visibility(&self) -> f32 {
        let marker_bottom = self.content_height;
        let marker_top = (self.content_height - SENTINEL_HEIGHT).max(0.0);
        let marker_height = marker_bottom - marker_top;
        if marker_height <= 0.0 {
            return 0.0;
        }

        let view_top = self.offset_y;
        let view_bottom = self.offset_y + self.viewport_height;
        let overlap = marker_bottom.min(view_bottom) - marker_top.max(view_top);

        (overlap / marker_height).clamp(0.0, 1.0)
    }

    pub fn sentinel_visible(&self) -> bool {
        self.sentinel_visibility() >= VISIBILITY_THRESHOLD
    }
}

/// Visibility observer for the trailing marker
#[derive(Debug, Clone, Default)]
pub struct Sentinel {
    subscribed: bool,
    visible: bool,
}

impl Sentinel {
    /// Start (or restart) observing. The next visible observation fires.
    pub fn subscribe(&mut self) {
        self.subscribed = true;
        self.visible = false;
    }

    pub fn unsubscribe(&mut self) {
        self.subscribed = false;
        self.visible = false;
    }

    #[cfg(test)]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Feed a viewport observation.
    /// Returns true when the next page should be requested.
    pub fn observe(&mut self, geometry: ViewportGeometry, loading: bool) -> bool {
        if !self.subscribed {
            return false;
        }

        let now_visible = geometry.sentinel_visible();
        let became_visible = now_visible && !self.visible;
        self.visible = now_visible;

        became_visible && !loading
    }
}

/// The marker itself, carrying the status line
pub fn view<'a>(status: String) -> Element<'a, Message> {
    container(text(status).size(14))
        .width(Length::Fill)
        .height(Length::Fixed(SENTINEL_HEIGHT))
        .center_x(Length::Fill)
        .center_y(Length::Fixed(SENTINEL_HEIGHT))
        .into()
}
