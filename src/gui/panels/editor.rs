use crate::gui::panels::{floating, palette, positioned, preview};
use crate::gui::{EditorApp, Message};

use iced::widget::{container, row, stack, text_editor};
use iced::{Element, Font, Length};

/// Text surface with its overlays, next to the rendered preview
pub fn view(app: &EditorApp) -> Element<'_, Message> {
    let surface = text_editor(&app.content)
        .on_action(Message::Edit)
        .font(Font::MONOSPACE)
        .size(16)
        .height(Length::Fill);

    let mut layers = stack![surface]
        .width(Length::Fill)
        .height(Length::Fill);

    if app.floating.is_visible() {
        let (x, y) = app.floating.position();
        layers = layers.push(positioned(floating::view(app), x, y));
    }
    if let Some((x, y)) = app.palette.position() {
        layers = layers.push(positioned(palette::view(app), x, y));
    }

    row![
        container(layers).width(Length::FillPortion(1)),
        container(preview::view(app)).width(Length::FillPortion(1)),
    ]
    .spacing(10)
    .height(Length::Fill)
    .into()
}
