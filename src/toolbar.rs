//! Main Toolbar
//!
//! Button groups above the editor. Active and enabled states are read from
//! the engine every time the toolbar is rendered.

use tracing::debug;

use crate::engine::{ActiveQuery, Command, CommandChain, DocumentController, MarkType, NodeType};

/// Swatches offered for text color and highlight
pub const COLOR_PALETTE: [&str; 12] = [
    "#000000", "#374151", "#6B7280", "#9CA3AF", "#EF4444", "#F97316", "#EAB308", "#22C55E",
    "#3B82F6", "#8B5CF6", "#EC4899", "#F43F5E",
];

/// Rows and columns for the toolbar's table insert
const TABLE_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarGroup {
    Format,
    Lists,
    Table,
    Code,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    Mark(MarkType),
    SetColor(String),
    SetHighlight(String),
    BulletList,
    OrderedList,
    InsertTable,
    AddColumnBefore,
    AddColumnAfter,
    DeleteColumn,
    AddRowBefore,
    AddRowAfter,
    DeleteRow,
    DeleteTable,
    InlineCode,
    CodeBlock,
    /// Handled by the shell: opens a file picker
    UploadImage,
}

impl ToolbarAction {
    /// Engine command, if the action maps to one directly
    pub fn command(&self) -> Option<Command> {
        let command = match self {
            ToolbarAction::Mark(mark) => Command::ToggleMark(*mark),
            ToolbarAction::SetColor(color) => Command::SetColor(color.clone()),
            ToolbarAction::SetHighlight(color) => Command::SetHighlight(color.clone()),
            ToolbarAction::BulletList => Command::ToggleBulletList,
            ToolbarAction::OrderedList => Command::ToggleOrderedList,
            ToolbarAction::InsertTable => Command::InsertTable {
                rows: TABLE_SIZE,
                cols: TABLE_SIZE,
                with_header_row: true,
            },
            ToolbarAction::AddColumnBefore => Command::AddColumnBefore,
            ToolbarAction::AddColumnAfter => Command::AddColumnAfter,
            ToolbarAction::DeleteColumn => Command::DeleteColumn,
            ToolbarAction::AddRowBefore => Command::AddRowBefore,
            ToolbarAction::AddRowAfter => Command::AddRowAfter,
            ToolbarAction::DeleteRow => Command::DeleteRow,
            ToolbarAction::DeleteTable => Command::DeleteTable,
            ToolbarAction::InlineCode => Command::ToggleMark(MarkType::Code),
            ToolbarAction::CodeBlock => Command::ToggleCodeBlock,
            ToolbarAction::UploadImage => return None,
        };
        Some(command)
    }

    pub fn title(&self) -> String {
        match self {
            ToolbarAction::Mark(MarkType::Bold) => "Bold (Ctrl+B)".into(),
            ToolbarAction::Mark(MarkType::Italic) => "Italic (Ctrl+I)".into(),
            ToolbarAction::Mark(MarkType::Underline) => "Underline (Ctrl+U)".into(),
            ToolbarAction::Mark(MarkType::Strike) => "Strikethrough".into(),
            ToolbarAction::Mark(mark) => format!("{:?}", mark),
            ToolbarAction::SetColor(color) => format!("Set text color to {}", color),
            ToolbarAction::SetHighlight(color) => format!("Set highlight color to {}", color),
            ToolbarAction::BulletList => "Bullet List".into(),
            ToolbarAction::OrderedList => "Numbered List".into(),
            ToolbarAction::InsertTable => "Insert Table".into(),
            ToolbarAction::AddColumnBefore => "Add Column Before".into(),
            ToolbarAction::AddColumnAfter => "Add Column After".into(),
            ToolbarAction::DeleteColumn => "Delete Column".into(),
            ToolbarAction::AddRowBefore => "Add Row Before".into(),
            ToolbarAction::AddRowAfter => "Add Row After".into(),
            ToolbarAction::DeleteRow => "Delete Row".into(),
            ToolbarAction::DeleteTable => "Delete Table".into(),
            ToolbarAction::InlineCode => "Inline Code".into(),
            ToolbarAction::CodeBlock => "Code Block".into(),
            ToolbarAction::UploadImage => "Insert Image".into(),
        }
    }

    fn active_query(&self) -> Option<ActiveQuery> {
        match self {
            ToolbarAction::Mark(mark) => Some(ActiveQuery::Mark(*mark)),
            ToolbarAction::BulletList => Some(ActiveQuery::Node(NodeType::BulletList)),
            ToolbarAction::OrderedList => Some(ActiveQuery::Node(NodeType::OrderedList)),
            ToolbarAction::InlineCode => Some(ActiveQuery::Mark(MarkType::Code)),
            ToolbarAction::CodeBlock => Some(ActiveQuery::Node(NodeType::CodeBlock)),
            _ => None,
        }
    }

    /// Table structure edits are greyed out when the engine cannot run them
    fn gated(&self) -> bool {
        matches!(
            self,
            ToolbarAction::AddColumnBefore
                | ToolbarAction::AddColumnAfter
                | ToolbarAction::DeleteColumn
                | ToolbarAction::AddRowBefore
                | ToolbarAction::AddRowAfter
                | ToolbarAction::DeleteRow
                | ToolbarAction::DeleteTable
        )
    }
}

/// Actions in a group, in display order
pub fn group_actions(group: ToolbarGroup) -> Vec<ToolbarAction> {
    match group {
        ToolbarGroup::Format => vec![
            ToolbarAction::Mark(MarkType::Bold),
            ToolbarAction::Mark(MarkType::Italic),
            ToolbarAction::Mark(MarkType::Underline),
            ToolbarAction::Mark(MarkType::Strike),
        ],
        ToolbarGroup::Lists => vec![ToolbarAction::BulletList, ToolbarAction::OrderedList],
        ToolbarGroup::Table => vec![
            ToolbarAction::InsertTable,
            ToolbarAction::AddColumnBefore,
            ToolbarAction::AddColumnAfter,
            ToolbarAction::DeleteColumn,
            ToolbarAction::AddRowBefore,
            ToolbarAction::AddRowAfter,
            ToolbarAction::DeleteRow,
            ToolbarAction::DeleteTable,
        ],
        ToolbarGroup::Code => vec![ToolbarAction::InlineCode, ToolbarAction::CodeBlock],
        ToolbarGroup::Image => vec![ToolbarAction::UploadImage],
    }
}

/// Swatch actions for the color or highlight menu
pub fn swatches(highlight: bool) -> Vec<ToolbarAction> {
    COLOR_PALETTE
        .iter()
        .map(|color| {
            if highlight {
                ToolbarAction::SetHighlight(color.to_string())
            } else {
                ToolbarAction::SetColor(color.to_string())
            }
        })
        .collect()
}

/// A button as it should be drawn right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarButton {
    pub action: ToolbarAction,
    pub active: bool,
    pub enabled: bool,
}

pub fn buttons<D: DocumentController + ?Sized>(doc: &D, group: ToolbarGroup) -> Vec<ToolbarButton> {
    group_actions(group)
        .into_iter()
        .map(|action| {
            let active = action
                .active_query()
                .map(|query| doc.is_active(query))
                .unwrap_or(false);
            let enabled = match action.command() {
                Some(command) if action.gated() => doc.can(&[command]),
                _ => true,
            };
            ToolbarButton {
                action,
                active,
                enabled,
            }
        })
        .collect()
}

/// Run a toolbar action against the engine. Returns false when nothing ran.
pub fn dispatch<D: DocumentController + ?Sized>(doc: &mut D, action: &ToolbarAction) -> bool {
    let Some(command) = action.command() else {
        return false;
    };
    debug!("Toolbar: {}", command);
    CommandChain::new(doc).then(command).run()
}

/// Which dropdown menu is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolbarMenu {
    #[default]
    None,
    TextColor,
    Highlight,
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MemoryDocument, Selection};

    #[test]
    fn test_palette_has_twelve_colors() {
        assert_eq!(COLOR_PALETTE.len(), 12);
        assert_eq!(swatches(true)[4], ToolbarAction::SetHighlight("#EF4444".into()));
    }

    #[test]
    fn test_table_buttons_disabled_outside_table() {
        let doc = MemoryDocument::from_text("text");
        let table = buttons(&doc, ToolbarGroup::Table);
        assert!(table[0].enabled, "insert is always offered");
        assert!(table[1..].iter().all(|b| !b.enabled));
    }

    #[test]
    fn test_table_buttons_enabled_inside_table() {
        let mut doc = MemoryDocument::new();
        assert!(dispatch(&mut doc, &ToolbarAction::InsertTable));
        assert_eq!(doc.block_count(), TABLE_SIZE);
        assert!(buttons(&doc, ToolbarGroup::Table).iter().all(|b| b.enabled));
    }

    #[test]
    fn test_format_buttons_mirror_marks() {
        let mut doc = MemoryDocument::from_text("bold me");
        doc.run(&[Command::SetSelection(Selection::new(0, 4))]).unwrap();
        assert!(dispatch(&mut doc, &ToolbarAction::Mark(MarkType::Bold)));
        let format = buttons(&doc, ToolbarGroup::Format);
        assert!(format[0].active);
        assert!(!format[1].active);
    }

    #[test]
    fn test_color_swatch_applies() {
        let mut doc = MemoryDocument::from_text("red");
        doc.run(&[Command::SetSelection(Selection::new(0, 3))]).unwrap();
        assert!(dispatch(&mut doc, &ToolbarAction::SetColor("#EF4444".into())));
        assert!(doc.html().contains("color: #EF4444"));
    }

    #[test]
    fn test_upload_is_left_to_shell() {
        let mut doc = MemoryDocument::new();
        assert!(!dispatch(&mut doc, &ToolbarAction::UploadImage));
    }
}
