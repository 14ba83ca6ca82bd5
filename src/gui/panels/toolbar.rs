use crate::engine::MarkType;
use crate::gui::panels::parse_hex;
use crate::gui::{EditorApp, Message};
use crate::toolbar::{self, ToolbarAction, ToolbarButton, ToolbarGroup, ToolbarMenu};

use iced::widget::{button, column, container, row, text, tooltip, Row, Space};
use iced::{Alignment, Element, Length};

fn short_label(action: &ToolbarAction) -> &'static str {
    match action {
        ToolbarAction::Mark(MarkType::Bold) => "B",
        ToolbarAction::Mark(MarkType::Italic) => "I",
        ToolbarAction::Mark(MarkType::Underline) => "U",
        ToolbarAction::Mark(MarkType::Strike) => "S",
        ToolbarAction::Mark(_) => "?",
        ToolbarAction::SetColor(_) | ToolbarAction::SetHighlight(_) => "",
        ToolbarAction::BulletList => "• List",
        ToolbarAction::OrderedList => "1. List",
        ToolbarAction::InsertTable => "Insert 3x3",
        ToolbarAction::AddColumnBefore => "+ Col ←",
        ToolbarAction::AddColumnAfter => "+ Col →",
        ToolbarAction::DeleteColumn => "− Col",
        ToolbarAction::AddRowBefore => "+ Row ↑",
        ToolbarAction::AddRowAfter => "+ Row ↓",
        ToolbarAction::DeleteRow => "− Row",
        ToolbarAction::DeleteTable => "Delete Table",
        ToolbarAction::InlineCode => "</>",
        ToolbarAction::CodeBlock => "{ }",
        ToolbarAction::UploadImage => "🖼 Image",
    }
}

fn action_button(item: ToolbarButton) -> Element<'static, Message> {
    let style = if item.active {
        button::primary
    } else {
        button::secondary
    };
    let title = item.action.title();
    let label = short_label(&item.action);
    let message = item.enabled.then(|| Message::Toolbar(item.action));

    tooltip(
        button(text(label).size(14)).style(style).on_press_maybe(message),
        text(title).size(12),
        tooltip::Position::Bottom,
    )
    .into()
}

fn group(app: &EditorApp, group: ToolbarGroup) -> Element<'static, Message> {
    Row::with_children(
        toolbar::buttons(&app.document, group)
            .into_iter()
            .map(action_button),
    )
    .spacing(4)
    .into()
}

fn menu_button(label: &str, menu: ToolbarMenu, open: ToolbarMenu) -> Element<'_, Message> {
    let style = if menu == open {
        button::primary
    } else {
        button::secondary
    };
    button(text(label).size(14))
        .style(style)
        .on_press(Message::ToggleMenu(menu))
        .into()
}

fn swatch_row(highlight: bool) -> Element<'static, Message> {
    Row::with_children(toolbar::swatches(highlight).into_iter().map(|action| {
        let color = match &action {
            ToolbarAction::SetColor(c) | ToolbarAction::SetHighlight(c) => parse_hex(c),
            _ => None,
        }
        .unwrap_or(iced::Color::BLACK);
        tooltip(
            button(Space::new(Length::Fixed(18.0), Length::Fixed(18.0)))
                .style(move |theme, status| button::Style {
                    background: Some(color.into()),
                    ..button::secondary(theme, status)
                })
                .on_press(Message::Toolbar(action.clone())),
            text(action.title()).size(12),
            tooltip::Position::Bottom,
        )
        .into()
    }))
    .spacing(4)
    .into()
}

/// Table structure edits, without the insert button already on the bar
fn table_menu(app: &EditorApp) -> Element<'static, Message> {
    Row::with_children(
        toolbar::buttons(&app.document, ToolbarGroup::Table)
            .into_iter()
            .filter(|item| item.action != ToolbarAction::InsertTable)
            .map(action_button),
    )
    .spacing(4)
    .into()
}

pub fn view(app: &EditorApp) -> Element<'_, Message> {
    let insert_table = toolbar::buttons(&app.document, ToolbarGroup::Table)
        .into_iter()
        .find(|item| item.action == ToolbarAction::InsertTable)
        .map(action_button);

    let mut bar = row![
        group(app, ToolbarGroup::Format),
        menu_button("A", ToolbarMenu::TextColor, app.menu),
        menu_button("🖍", ToolbarMenu::Highlight, app.menu),
        group(app, ToolbarGroup::Lists),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    if let Some(insert_table) = insert_table {
        bar = bar.push(insert_table);
    }
    bar = bar
        .push(menu_button("Table ▾", ToolbarMenu::Table, app.menu))
        .push(group(app, ToolbarGroup::Code))
        .push(group(app, ToolbarGroup::Image));

    let dropdown: Option<Element<'_, Message>> = match app.menu {
        ToolbarMenu::None => None,
        ToolbarMenu::TextColor => Some(swatch_row(false)),
        ToolbarMenu::Highlight => Some(swatch_row(true)),
        ToolbarMenu::Table => Some(table_menu(app)),
    };

    let mut content = column![bar].spacing(6);
    if let Some(dropdown) = dropdown {
        content = content.push(container(dropdown).padding(6).style(container::bordered_box));
    }

    container(content)
        .padding(8)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}
