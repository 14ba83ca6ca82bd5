//! View panels of the editor window

use iced::widget::{center, container, mouse_area, opaque, stack};
use iced::{Color, Element, Length, Padding};

use crate::gui::Message;

pub mod editor;
pub mod floating;
pub mod footer;
pub mod header;
pub mod image_prompt;
pub mod palette;
pub mod preview;
pub mod resize;
pub mod toolbar;

/// Lay `content` over a dimmed `base`; clicking the backdrop sends `on_blur`
pub fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message> {
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| {
                container::Style {
                    background: Some(
                        Color {
                            a: 0.5,
                            ..Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                }
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}

/// Place `content` at an editor-local offset
pub fn positioned<'a>(content: impl Into<Element<'a, Message>>, x: f32, y: f32) -> Element<'a, Message> {
    container(content)
        .padding(Padding {
            top: y.max(0.0),
            left: x.max(0.0),
            ..Padding::ZERO
        })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// `#RRGGBB` to a color
pub fn parse_hex(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#FF0000"), Some(Color::from_rgb8(255, 0, 0)));
        assert_eq!(parse_hex("#3b82f6"), Some(Color::from_rgb8(0x3b, 0x82, 0xf6)));
        assert_eq!(parse_hex("red"), None);
        assert_eq!(parse_hex("#FFF"), None);
    }
}
