//! Rendered view of the document tree
//!
//! Built from the engine's JSON export rather than its internals, so any
//! engine behind [`DocumentController`] previews the same way.

use crate::engine::memory::BlockKind;
use crate::engine::{DocumentController, DocumentNode, MemoryDocument};
use crate::gui::panels::parse_hex;
use crate::gui::{EditorApp, Message};

use iced::font::{Style, Weight};
use iced::widget::{
    button, container, horizontal_rule, row, scrollable, text, Column, Row,
};
use iced::{Element, Font, Length};

/// Document positions of every image, in document order
fn image_positions(doc: &MemoryDocument) -> Vec<usize> {
    (0..doc.block_count())
        .filter(|i| matches!(doc.block_kind(*i), Some(BlockKind::Image(_))))
        .map(|i| doc.pos_at(i, 0))
        .collect()
}

fn attr_u64(node: &DocumentNode, key: &str) -> Option<u64> {
    node.attrs.as_ref()?.get(key)?.as_u64()
}

fn mark_color(node: &DocumentNode, mark_type: &str) -> Option<iced::Color> {
    let mark = node.marks.as_ref()?.iter().find(|m| m.mark_type == mark_type)?;
    parse_hex(mark.attrs.as_ref()?.get("color")?.as_str()?)
}

fn has_mark(node: &DocumentNode, mark_type: &str) -> bool {
    node.marks
        .as_ref()
        .is_some_and(|marks| marks.iter().any(|m| m.mark_type == mark_type))
}

/// One text run with its marks
fn run(node: &DocumentNode, size: f32, bold: bool) -> Element<'static, Message> {
    let mut font = if has_mark(node, "code") {
        Font::MONOSPACE
    } else {
        Font::DEFAULT
    };
    if bold || has_mark(node, "bold") {
        font.weight = Weight::Bold;
    }
    if has_mark(node, "italic") {
        font.style = Style::Italic;
    }

    let mut label = text(node.text.clone().unwrap_or_default())
        .size(size)
        .font(font);
    if let Some(color) = mark_color(node, "textStyle") {
        label = label.color(color);
    }

    match mark_color(node, "highlight") {
        Some(background) => container(label)
            .style(move |_theme| container::Style {
                background: Some(background.into()),
                ..container::Style::default()
            })
            .into(),
        None => label.into(),
    }
}

fn inline(node: &DocumentNode, size: f32, bold: bool) -> Element<'static, Message> {
    Row::with_children(node.children().iter().map(|child| run(child, size, bold))).into()
}

fn list(node: &DocumentNode, ordered: bool) -> Element<'static, Message> {
    Column::with_children(node.children().iter().enumerate().map(|(i, item)| {
        let bullet = if ordered {
            format!("{}.", i + 1)
        } else {
            "•".to_string()
        };
        let body = item
            .children()
            .first()
            .map(|p| inline(p, 16.0, false))
            .unwrap_or_else(|| text("").into());
        row![text(bullet).size(16), body].spacing(8).into()
    }))
    .spacing(4)
    .into()
}

fn table(node: &DocumentNode) -> Element<'static, Message> {
    Column::with_children(node.children().iter().map(|table_row| {
        Row::with_children(table_row.children().iter().map(|cell| {
            let header = cell.node_type == "tableHeader";
            let font = Font {
                weight: if header { Weight::Bold } else { Weight::Normal },
                ..Font::DEFAULT
            };
            container(text(cell.plain_text()).size(14).font(font))
                .padding(4)
                .width(Length::Fill)
                .style(container::bordered_box)
                .into()
        }))
        .into()
    }))
    .into()
}

fn image(node: &DocumentNode, pos: Option<usize>) -> Element<'static, Message> {
    let size = match (attr_u64(node, "width"), attr_u64(node, "height")) {
        (Some(w), Some(h)) => format!("{}×{}", w, h),
        _ => "auto".to_string(),
    };
    button(text(format!("🖼 Image ({})", size)).size(14))
        .style(button::secondary)
        .on_press_maybe(pos.map(Message::ImageClicked))
        .into()
}

fn block(node: &DocumentNode, images: &mut impl Iterator<Item = usize>) -> Element<'static, Message> {
    match node.node_type.as_str() {
        "paragraph" => inline(node, 16.0, false),
        "heading" => {
            let size = match attr_u64(node, "level") {
                Some(1) => 30.0,
                Some(2) => 24.0,
                _ => 20.0,
            };
            inline(node, size, true)
        }
        "bulletList" => list(node, false),
        "orderedList" => list(node, true),
        "blockquote" => container(
            Column::with_children(node.children().iter().map(|p| inline(p, 16.0, false)))
                .spacing(4),
        )
        .padding([4, 12])
        .style(container::rounded_box)
        .into(),
        "codeBlock" => container(text(node.plain_text()).size(14).font(Font::MONOSPACE))
            .padding(8)
            .width(Length::Fill)
            .style(container::rounded_box)
            .into(),
        "table" => table(node),
        "image" => image(node, images.next()),
        "horizontalRule" => horizontal_rule(1).into(),
        _ => text(node.plain_text()).into(),
    }
}

pub fn view(app: &EditorApp) -> Element<'_, Message> {
    let tree = app.document.json();
    let mut images = image_positions(&app.document).into_iter();
    let heading: Element<'_, Message> = text("Preview").size(12).style(text::secondary).into();
    let blocks: Vec<Element<'_, Message>> = std::iter::once(heading)
        .chain(tree.children().iter().map(|node| block(node, &mut images)))
        .collect();

    container(scrollable(
        Column::with_children(blocks).spacing(8).padding(10),
    ))
    .width(Length::Fill)
    .height(Length::Fill)
    .style(container::bordered_box)
    .into()
}
