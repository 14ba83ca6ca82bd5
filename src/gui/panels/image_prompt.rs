use crate::gui::state::ImagePrompt;
use crate::gui::Message;

use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Element, Length};

/// Focus target for the URL field
pub fn url_id() -> text_input::Id {
    text_input::Id::new("image-url")
}

pub fn view(prompt: &ImagePrompt) -> Element<'_, Message> {
    container(
        column![
            text("Enter image URL:").size(18),
            text_input("https://", &prompt.url)
                .id(url_id())
                .on_input(Message::ImageUrlChanged)
                .on_submit(Message::ImageUrlSubmit),
            row![
                Space::with_width(Length::Fill),
                button("Cancel")
                    .style(button::secondary)
                    .on_press(Message::ImageUrlCancel),
                button("Insert")
                    .style(button::primary)
                    .on_press(Message::ImageUrlSubmit),
            ]
            .spacing(10),
        ]
        .spacing(12),
    )
    .padding(20)
    .width(Length::Fixed(420.0))
    .style(container::rounded_box)
    .into()
}
