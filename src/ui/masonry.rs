/// Masonry grid
///
/// Images are dealt round-robin across a fixed number of columns: image `i`
/// goes to column `i % columns`. The column count is picked from the window
/// width when a gallery session mounts and is not rebalanced afterwards.

use std::collections::HashMap;

use iced::widget::image::Handle;
use iced::widget::{button, container, image, text, Column, Row};
use iced::{ContentFit, Element, Length};

use crate::state::data::ImageRef;
use crate::Message;

/// Gap between columns and between tiles
const GAP: f32 = 16.0;

/// Height of a tile that has no image yet
const PLACEHOLDER_HEIGHT: f32 = 200.0;

/// Display state of a single tile
#[derive(Debug, Clone)]
pub enum Tile {
    Loading,
    Loaded(Handle),
    Broken,
}

/// Breakpoints: <768 → 2, <1024 → 3, else 4
pub fn column_count_for_width(width: f32) -> usize {
    if width < 768.0 {
        2
    } else if width < 1024.0 {
        3
    } else {
        4
    }
}

/// Deal items round-robin into `columns` columns, keeping each item's
/// position in the input list
pub fn distribute<T>(items: &[T], columns: usize) -> Vec<Vec<(usize, &T)>> {
    let columns = columns.max(1);
    let mut result: Vec<Vec<(usize, &T)>> = (0..columns).map(|_| Vec::new()).collect();

    for (i, item) in items.iter().enumerate() {
        result[i % columns].push((i, item));
    }

    result
}

/// Build the grid for the current image list
pub fn view<'a>(
    images: &'a [ImageRef],
    tiles: &'a HashMap<u32, Tile>,
    columns: usize,
) -> Element<'a, Message> {
    let row = distribute(images, columns)
        .into_iter()
        .fold(Row::new().spacing(GAP), |row, column| {
            let column = column.into_iter().fold(
                Column::new().spacing(GAP).width(Length::FillPortion(1)),
                |column, (index, image_ref)| column.push(tile(index, image_ref, tiles.get(&image_ref.id))),
            );
            row.push(column)
        });

    row.width(Length::Fill).into()
}

fn tile<'a>(index: usize, image_ref: &'a ImageRef, state: Option<&'a Tile>) -> Element<'a, Message> {
    let content: Element<'a, Message> = match state {
        Some(Tile::Loaded(handle)) => image(handle.clone())
            .width(Length::Fill)
            .content_fit(ContentFit::Cover)
            .into(),
        Some(Tile::Broken) => placeholder(format!("⚠ #{} unavailable", image_ref.id)),
        Some(Tile::Loading) | None => placeholder(format!("#{}", image_ref.id)),
    };

    button(container(content).style(container::rounded_box))
        .padding(0)
        .style(button::text)
        .on_press(Message::OpenLightbox(index))
        .into()
}

fn placeholder<'a>(label: String) -> Element<'a, Message> {
    container(text(label).size(14))
        .width(Length::Fill)
        .height(Length::Fixed(PLACEHOLDER_HEIGHT))
        .center_x(Length::Fill)
        .center_y(Length::Fixed(PLACEHOLDER_HEIGHT))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_values(columns: &[Vec<(usize, &u32)>]) -> Vec<Vec<u32>> {
        columns
            .iter()
            .map(|column| column.iter().map(|(_, value)| **value).collect())
            .collect()
    }

    #[test]
    fn test_seven_over_three() {
        let items: Vec<u32> = (1..=7).collect();
        let columns = distribute(&items, 3);
        assert_eq!(
            column_values(&columns),
            vec![vec![1, 4, 7], vec![2, 5], vec![3, 6]]
        );
    }

    #[test]
    fn test_positions_are_kept() {
        let items = ["a", "b", "c", "d"];
        let columns = distribute(&items, 2);
        let positions: Vec<usize> = columns[1].iter().map(|(i, _)| *i).collect();
        assert_eq!(positions, vec![1, 3]);
    }

    #[test]
    fn test_fewer_items_than_columns() {
        let items: Vec<u32> = vec![1];
        let columns = distribute(&items, 4);
        assert_eq!(columns.len(), 4);
        assert_eq!(column_values(&columns), vec![vec![1], vec![], vec![], vec![]]);
    }

    #[test]
    fn test_breakpoints() {
        assert_eq!(column_count_for_width(500.0), 2);
        assert_eq!(column_count_for_width(767.9), 2);
        assert_eq!(column_count_for_width(768.0), 3);
        assert_eq!(column_count_for_width(1023.0), 3);
        assert_eq!(column_count_for_width(1024.0), 4);
        assert_eq!(column_count_for_width(2560.0), 4);
    }
}
