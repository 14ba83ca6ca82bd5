use crate::config::ThemeMode;
use crate::gui::{EditorApp, Message};

use iced::widget::{button, row, text, Space};
use iced::{Alignment, Element, Length};

pub fn view(app: &EditorApp) -> Element<'_, Message> {
    let theme_label = match app.config.theme {
        ThemeMode::Light => "🌙 Dark",
        ThemeMode::Dark => "☀️ Light",
    };

    row![
        text("RichEdit").size(28),
        Space::with_width(Length::Fill),
        button(theme_label)
            .style(button::secondary)
            .on_press(Message::ToggleTheme),
    ]
    .align_y(Alignment::Center)
    .into()
}
