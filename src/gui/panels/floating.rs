use crate::gui::{EditorApp, Message};

use iced::widget::{button, container, text, Row};
use iced::Element;

pub fn view(app: &EditorApp) -> Element<'_, Message> {
    let buttons = app.floating.buttons(&app.document).into_iter().map(|item| {
        let style = if item.active {
            button::primary
        } else {
            button::text
        };
        button(text(item.action.label()).size(14))
            .style(style)
            .padding([4, 8])
            .on_press(Message::Floating(item.action))
            .into()
    });

    container(Row::with_children(buttons).spacing(2))
        .padding(4)
        .style(container::bordered_box)
        .into()
}
