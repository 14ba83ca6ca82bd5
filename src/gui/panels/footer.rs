use crate::autosave::SaveStatus;
use crate::gui::{EditorApp, Message};

use iced::widget::{button, container, row, text, Space};
use iced::{Alignment, Border, Element, Length, Theme};

fn status_badge(status: SaveStatus) -> Element<'static, Message> {
    container(text(status.label()).size(12))
        .padding([2, 8])
        .style(move |theme: &Theme| {
            let palette = theme.extended_palette();
            let pair = match status {
                SaveStatus::Saved => palette.success.base,
                SaveStatus::Saving => palette.secondary.base,
                SaveStatus::Unsaved => palette.danger.base,
            };
            container::Style {
                background: Some(pair.color.into()),
                text_color: Some(pair.text),
                border: Border {
                    radius: 4.0.into(),
                    ..Border::default()
                },
                ..container::Style::default()
            }
        })
        .into()
}

pub fn view(app: &EditorApp) -> Element<'_, Message> {
    row![
        text(format!("{} words", app.autosave.word_count())).size(14),
        status_badge(app.autosave.status()),
        text(&app.status).size(12).style(text::secondary),
        Space::with_width(Length::Fill),
        button("Export HTML")
            .style(button::secondary)
            .on_press(Message::ExportHtml),
        button("Export JSON")
            .style(button::secondary)
            .on_press(Message::ExportJson),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}
