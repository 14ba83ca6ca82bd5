use crate::gui::Message;
use crate::resize::{ImageResize, SizePreset, HEIGHT_RANGE, WIDTH_RANGE};

use iced::widget::{button, checkbox, column, container, row, slider, text, text_input, Row, Space};
use iced::{Alignment, Element, Length};

fn preset_label(modal: &ImageResize, preset: SizePreset) -> String {
    match preset {
        SizePreset::Original => {
            let (width, height) = modal.original();
            format!("{} ({}×{})", preset.label(), width, height)
        }
        _ => format!("{} ({:.0}%)", preset.label(), preset.scale() * 100.0),
    }
}

pub fn view(modal: &ImageResize) -> Element<'_, Message> {
    let (min_w, max_w, step_w) = WIDTH_RANGE;
    let (min_h, max_h, step_h) = HEIGHT_RANGE;

    let presets = Row::with_children(SizePreset::ALL.iter().map(|preset| {
        button(text(preset_label(modal, *preset)).size(13))
            .style(button::secondary)
            .on_press(Message::ResizePreset(*preset))
            .into()
    }))
    .spacing(8);

    let width_row = row![
        slider(
            min_w..=max_w,
            modal.width().clamp(min_w, max_w),
            Message::ResizeWidth
        )
        .step(step_w),
        text_input("", &modal.width().to_string())
            .on_input(Message::ResizeWidthText)
            .width(Length::Fixed(80.0)),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let height_row = row![
        slider(
            min_h..=max_h,
            modal.height().clamp(min_h, max_h),
            Message::ResizeHeight
        )
        .step(step_h),
        text_input("", &modal.height().to_string())
            .on_input(Message::ResizeHeightText)
            .width(Length::Fixed(80.0)),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let content = column![
        text("Resize Image").size(20),
        text("Size Presets").size(14),
        presets,
        text("Width (px)").size(14),
        width_row,
        text("Height (px)").size(14),
        height_row,
        checkbox("Maintain aspect ratio", modal.lock_aspect()).on_toggle(Message::ResizeLock),
        text(format!("Preview: {}×{} px", modal.width(), modal.height()))
            .size(13)
            .style(text::secondary),
        row![
            button("Reset")
                .style(button::secondary)
                .on_press(Message::ResizeReset),
            Space::with_width(Length::Fill),
            button("Cancel")
                .style(button::secondary)
                .on_press(Message::ResizeCancel),
            button("Apply")
                .style(button::primary)
                .on_press(Message::ResizeApply),
        ]
        .spacing(10),
    ]
    .spacing(12);

    container(content)
        .padding(20)
        .width(Length::Fixed(440.0))
        .style(container::rounded_box)
        .into()
}
