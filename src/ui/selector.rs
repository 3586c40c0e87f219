/// Category selector
///
/// One button per category; the active one is highlighted. Buttons wrap onto
/// extra lines when the window is narrow.

use iced::widget::button;
use iced::Element;
use iced_aw::Wrap;

use crate::state::category::Category;
use crate::Message;

pub fn view<'a>(current: Category) -> Element<'a, Message> {
    let buttons: Vec<Element<'a, Message>> = Category::ALL
        .into_iter()
        .map(|category| {
            let style = if category == current {
                button::primary
            } else {
                button::secondary
            };

            button(category.label())
                .padding([8, 16])
                .style(style)
                .on_press(Message::SelectCategory(category))
                .into()
        })
        .collect();

    Wrap::with_elements(buttons)
        .spacing(8.0)
        .line_spacing(8.0)
        .into()
}
