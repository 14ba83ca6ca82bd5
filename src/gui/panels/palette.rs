use crate::gui::{EditorApp, Message};
use crate::palette::PaletteKey;

use iced::widget::{button, column, container, text, text_input, Column};
use iced::{Element, Length};

/// Focus target for the palette's search field
pub fn search_id() -> text_input::Id {
    text_input::Id::new("palette-search")
}

pub fn view(app: &EditorApp) -> Element<'_, Message> {
    let commands = app.palette.filtered();
    let selected = app.palette.selected_index();

    let list: Element<'_, Message> = if commands.is_empty() {
        text("No commands found").size(14).style(text::secondary).into()
    } else {
        Column::with_children(commands.iter().enumerate().map(|(i, command)| {
            let style = if i == selected {
                button::primary
            } else {
                button::text
            };
            button(column![
                text(command.title).size(14),
                text(command.description).size(12),
            ])
            .width(Length::Fill)
            .style(style)
            .on_press(Message::PaletteChoose(i))
            .into()
        }))
        .spacing(2)
        .into()
    };

    container(
        column![
            text_input("Search commands...", app.palette.query())
                .id(search_id())
                .on_input(Message::PaletteQuery)
                .on_submit(Message::PaletteKey(PaletteKey::Enter))
                .size(14),
            text(format!("Commands ({})", commands.len()))
                .size(12)
                .style(text::secondary),
            list,
        ]
        .spacing(6),
    )
    .padding(8)
    .width(Length::Fixed(320.0))
    .style(container::bordered_box)
    .into()
}
