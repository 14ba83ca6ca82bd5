//! Floating Selection Toolbar
//!
//! A compact formatting bar that hovers above a non-empty selection.

use tracing::debug;

use crate::engine::{
    ActiveQuery, Command, CommandChain, DocumentController, MarkType, NodeType, Selection,
};

/// Buttons offered by the floating toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatingAction {
    /// Back to a plain paragraph
    Plain,
    Mark(MarkType),
    Heading(u8),
    BulletList,
    OrderedList,
    Blockquote,
}

pub const FLOATING_ACTIONS: [FloatingAction; 11] = [
    FloatingAction::Plain,
    FloatingAction::Mark(MarkType::Bold),
    FloatingAction::Mark(MarkType::Italic),
    FloatingAction::Mark(MarkType::Underline),
    FloatingAction::Mark(MarkType::Strike),
    FloatingAction::Heading(1),
    FloatingAction::Heading(2),
    FloatingAction::Heading(3),
    FloatingAction::BulletList,
    FloatingAction::OrderedList,
    FloatingAction::Blockquote,
];

impl FloatingAction {
    pub fn command(&self) -> Command {
        match self {
            FloatingAction::Plain => Command::SetParagraph,
            FloatingAction::Mark(mark) => Command::ToggleMark(*mark),
            FloatingAction::Heading(level) => Command::ToggleHeading(*level),
            FloatingAction::BulletList => Command::ToggleBulletList,
            FloatingAction::OrderedList => Command::ToggleOrderedList,
            FloatingAction::Blockquote => Command::ToggleBlockquote,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FloatingAction::Plain => "¶",
            FloatingAction::Mark(MarkType::Bold) => "B",
            FloatingAction::Mark(MarkType::Italic) => "I",
            FloatingAction::Mark(MarkType::Underline) => "U",
            FloatingAction::Mark(MarkType::Strike) => "S",
            FloatingAction::Mark(_) => "?",
            FloatingAction::Heading(1) => "H1",
            FloatingAction::Heading(2) => "H2",
            FloatingAction::Heading(_) => "H3",
            FloatingAction::BulletList => "•",
            FloatingAction::OrderedList => "1.",
            FloatingAction::Blockquote => "❝",
        }
    }

    pub fn is_active<D: DocumentController + ?Sized>(&self, doc: &D) -> bool {
        match self {
            FloatingAction::Plain => is_plain_text(doc),
            FloatingAction::Mark(mark) => doc.is_active(ActiveQuery::Mark(*mark)),
            FloatingAction::Heading(level) => doc.is_active(ActiveQuery::Heading(*level)),
            FloatingAction::BulletList => doc.is_active(ActiveQuery::Node(NodeType::BulletList)),
            FloatingAction::OrderedList => {
                doc.is_active(ActiveQuery::Node(NodeType::OrderedList))
            }
            FloatingAction::Blockquote => doc.is_active(ActiveQuery::Node(NodeType::Blockquote)),
        }
    }
}

/// No heading, list or quote is active at the selection
pub fn is_plain_text<D: DocumentController + ?Sized>(doc: &D) -> bool {
    [
        NodeType::Heading,
        NodeType::BulletList,
        NodeType::OrderedList,
        NodeType::Blockquote,
    ]
    .iter()
    .all(|node| !doc.is_active(ActiveQuery::Node(*node)))
}

/// A rendered button with its current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatingButton {
    pub action: FloatingAction,
    pub active: bool,
}

/// Visibility and placement of the floating toolbar
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingToolbar {
    visible: bool,
    x: f32,
    y: f32,
    /// Distance above the selection start
    offset: f32,
}

impl Default for FloatingToolbar {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl FloatingToolbar {
    pub fn new(offset: f32) -> Self {
        Self {
            visible: false,
            x: 0.0,
            y: 0.0,
            offset,
        }
    }

    /// Recompute visibility after a selection change
    pub fn on_selection<D: DocumentController + ?Sized>(&mut self, doc: &D, selection: Selection) {
        let (from, to) = (selection.from(), selection.to());
        if !selection.is_empty() && to > from {
            let coords = doc.coords_at_pos(from);
            self.x = coords.left;
            self.y = coords.top - self.offset;
            if !self.visible {
                debug!("Floating toolbar shown at ({:.0}, {:.0})", self.x, self.y);
            }
            self.visible = true;
        } else {
            self.hide();
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Editor-local position; `y` may be negative near the top edge
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn buttons<D: DocumentController + ?Sized>(&self, doc: &D) -> Vec<FloatingButton> {
        FLOATING_ACTIONS
            .iter()
            .map(|action| FloatingButton {
                action: *action,
                active: action.is_active(doc),
            })
            .collect()
    }

    pub fn apply<D: DocumentController + ?Sized>(&self, doc: &mut D, action: FloatingAction) -> bool {
        CommandChain::new(doc).then(action.command()).run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::memory::TextMetrics;
    use crate::engine::MemoryDocument;

    fn doc() -> MemoryDocument {
        MemoryDocument::from_text("first line\nsecond line").with_metrics(TextMetrics {
            char_width: 10.0,
            line_height: 20.0,
            origin_x: 0.0,
            origin_y: 100.0,
        })
    }

    #[test]
    fn test_visible_only_for_ranges() {
        let doc = doc();
        let mut toolbar = FloatingToolbar::new(60.0);
        toolbar.on_selection(&doc, Selection::cursor(3));
        assert!(!toolbar.is_visible());

        toolbar.on_selection(&doc, Selection::new(14, 11));
        assert!(toolbar.is_visible());
        // from = 11 -> line 1, column 0
        assert_eq!(toolbar.position(), (0.0, 120.0 - 60.0));

        toolbar.on_selection(&doc, Selection::cursor(14));
        assert!(!toolbar.is_visible());
    }

    #[test]
    fn test_plain_text_active_by_default() {
        let mut doc = doc();
        doc.run(&[Command::SetSelection(Selection::new(0, 5))]).unwrap();
        let toolbar = FloatingToolbar::default();
        let buttons = toolbar.buttons(&doc);
        assert_eq!(buttons.len(), 11);
        assert!(buttons[0].active);
        assert!(buttons[1..].iter().all(|b| !b.active));
    }

    #[test]
    fn test_heading_deactivates_plain() {
        let mut doc = doc();
        doc.run(&[Command::SetSelection(Selection::new(0, 5))]).unwrap();
        let toolbar = FloatingToolbar::default();
        assert!(toolbar.apply(&mut doc, FloatingAction::Heading(2)));
        assert!(!is_plain_text(&doc));
        assert!(FloatingAction::Heading(2).is_active(&doc));
        assert!(!FloatingAction::Heading(1).is_active(&doc));

        assert!(toolbar.apply(&mut doc, FloatingAction::Plain));
        assert!(is_plain_text(&doc));
    }
}
