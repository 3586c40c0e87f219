/// Click-to-enlarge lightbox
///
/// The lightbox is bound to the gallery's image list. Every time the list
/// changes the old binding is dropped and the new list is bound, so a tile
/// never has two handlers. While open it shows the full-size image, a
/// counter, previous/next controls and a thumbnail strip.

use std::collections::HashMap;

use iced::keyboard::{self, key, Key};
use iced::widget::{button, center, column, container, image, mouse_area, opaque, row, scrollable, text};
use iced::{Alignment, Color, ContentFit, Element, Length};

use super::masonry::Tile;
use crate::state::data::ImageRef;
use crate::Message;

const THUMB_SIZE: f32 = 64.0;

#[derive(Debug, Clone, Default)]
pub struct Lightbox {
    /// Images the lightbox is currently bound to
    bound: Vec<ImageRef>,
    /// Position of the image being shown
    open: Option<usize>,
}

impl Lightbox {
    /// Replace the binding with `images`. An open lightbox stays on the
    /// same position if it still exists.
    pub fn bind(&mut self, images: &[ImageRef]) {
        self.bound = images.to_vec();
        if self.open.is_some_and(|index| index >= self.bound.len()) {
            self.open = None;
        }
    }

    /// Drop the binding and close
    pub fn unbind(&mut self) {
        self.bound.clear();
        self.open = None;
    }

    #[cfg(test)]
    pub fn bound_len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Open at `index`; ignored if nothing is bound there
    pub fn open(&mut self, index: usize) -> Option<&ImageRef> {
        let image_ref = self.bound.get(index)?;
        self.open = Some(index);
        Some(image_ref)
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn current(&self) -> Option<(usize, &ImageRef)> {
        let index = self.open?;
        self.bound.get(index).map(|image_ref| (index, image_ref))
    }

    /// Step forward, wrapping at the end
    pub fn next(&mut self) {
        if let Some(index) = self.open {
            self.open = Some((index + 1) % self.bound.len().max(1));
        }
    }

    /// Step back, wrapping at the start
    pub fn previous(&mut self) {
        if let Some(index) = self.open {
            let len = self.bound.len().max(1);
            self.open = Some((index + len - 1) % len);
        }
    }

    /// Overlay for the open image, or `None` when closed
    pub fn view<'a>(&'a self, tiles: &'a HashMap<u32, Tile>) -> Option<Element<'a, Message>> {
        let (index, current) = self.current()?;

        let full: Element<'a, Message> = match tiles.get(&current.id) {
            Some(Tile::Loaded(handle)) => image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .content_fit(ContentFit::Contain)
                .into(),
            Some(Tile::Broken) => text(format!("Image #{} could not be loaded", current.id)).into(),
            Some(Tile::Loading) | None => text("Loading…").into(),
        };

        let header = row![
            text(format!("{} / {}", index + 1, self.bound.len())).size(16),
            container(text(&current.url).size(12)).width(Length::Fill).center_x(Length::Fill),
            button("✕").on_press(Message::CloseLightbox),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let body = row![
            button("‹").on_press(Message::LightboxPrevious).padding(12),
            container(full)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
            button("›").on_press(Message::LightboxNext).padding(12),
        ]
        .spacing(12)
        .align_y(Alignment::Center)
        .height(Length::Fill);

        let content = column![header, body, self.thumbnails(index, tiles)].spacing(12);

        // Clicks on the margin around the content close the lightbox
        let backdrop =
            mouse_area(center(opaque(content)).padding(48)).on_press(Message::CloseLightbox);

        Some(
            container(backdrop)
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(
                        Color {
                            a: 0.9,
                            ..Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                })
                .into(),
        )
    }

    fn thumbnails<'a>(&'a self, selected: usize, tiles: &'a HashMap<u32, Tile>) -> Element<'a, Message> {
        let strip = self
            .bound
            .iter()
            .enumerate()
            .fold(iced::widget::Row::new().spacing(6), |strip, (index, image_ref)| {
                let thumb: Element<'a, Message> = match tiles.get(&image_ref.id) {
                    Some(Tile::Loaded(handle)) => image(handle.clone())
                        .width(Length::Fixed(THUMB_SIZE))
                        .height(Length::Fixed(THUMB_SIZE))
                        .content_fit(ContentFit::Cover)
                        .into(),
                    _ => container(text(image_ref.id.to_string()).size(11))
                        .width(Length::Fixed(THUMB_SIZE))
                        .height(Length::Fixed(THUMB_SIZE))
                        .center_x(Length::Fixed(THUMB_SIZE))
                        .center_y(Length::Fixed(THUMB_SIZE))
                        .into(),
                };

                let style = if index == selected {
                    button::primary
                } else {
                    button::text
                };

                strip.push(
                    button(thumb)
                        .padding(2)
                        .style(style)
                        .on_press(Message::OpenLightbox(index)),
                )
            });

        scrollable(strip)
            .direction(scrollable::Direction::Horizontal(scrollable::Scrollbar::default()))
            .width(Length::Fill)
            .into()
    }
}

/// Keyboard shortcuts while the lightbox is open
pub fn on_key(key: Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key {
        Key::Named(key::Named::Escape) => Some(Message::CloseLightbox),
        Key::Named(key::Named::ArrowLeft) => Some(Message::LightboxPrevious),
        Key::Named(key::Named::ArrowRight) => Some(Message::LightboxNext),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::category::Category;

    fn refs(n: u32) -> Vec<ImageRef> {
        (1..=n).map(|id| ImageRef::new(Category::Mia, id)).collect()
    }

    #[test]
    fn test_rebind_replaces_binding() {
        let mut lightbox = Lightbox::default();
        lightbox.bind(&refs(20));
        lightbox.bind(&refs(40));
        assert_eq!(lightbox.bound_len(), 40);
    }

    #[test]
    fn test_open_out_of_range_is_ignored() {
        let mut lightbox = Lightbox::default();
        lightbox.bind(&refs(3));
        assert!(lightbox.open(3).is_none());
        assert!(!lightbox.is_open());
        assert_eq!(lightbox.open(2).map(|r| r.id), Some(3));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut lightbox = Lightbox::default();
        lightbox.bind(&refs(3));
        lightbox.open(2);
        lightbox.next();
        assert_eq!(lightbox.current().map(|(i, _)| i), Some(0));
        lightbox.previous();
        assert_eq!(lightbox.current().map(|(i, _)| i), Some(2));
    }

    #[test]
    fn test_stays_open_across_rebind() {
        let mut lightbox = Lightbox::default();
        lightbox.bind(&refs(20));
        lightbox.open(5);
        lightbox.bind(&refs(40));
        assert_eq!(lightbox.current().map(|(_, r)| r.id), Some(6));
    }

    #[test]
    fn test_unbind_closes() {
        let mut lightbox = Lightbox::default();
        lightbox.bind(&refs(20));
        lightbox.open(1);
        lightbox.unbind();
        assert!(!lightbox.is_open());
        assert_eq!(lightbox.bound_len(), 0);
        assert!(lightbox.open(0).is_none());
    }

    #[test]
    fn test_keys() {
        let mods = keyboard::Modifiers::default();
        assert!(matches!(
            on_key(Key::Named(key::Named::Escape), mods),
            Some(Message::CloseLightbox)
        ));
        assert!(on_key(Key::Character("a".into()), mods).is_none());
    }
}
