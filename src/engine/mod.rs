//! Document Engine Contract
//!
//! The editor shell never touches document internals. Everything goes through
//! [`DocumentController`]: content queries, active-state and applicability
//! queries, atomic command chains and change notifications.

use std::fmt;
use tracing::debug;

use crate::error::CommandError;

pub mod memory;
pub mod tree;

pub use memory::MemoryDocument;
pub use tree::{DocumentNode, MarkNode};

/// Inline styles applied to text ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkType {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    TextColor,
    Highlight,
}

/// Structural node types the shell asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Paragraph,
    Heading,
    BulletList,
    OrderedList,
    Blockquote,
    CodeBlock,
    Table,
    Image,
    HorizontalRule,
}

/// What to ask `is_active` about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveQuery {
    Mark(MarkType),
    Node(NodeType),
    /// Heading with a specific level
    Heading(u8),
}

/// Anchor/head selection over flat document positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Collapsed selection at `pos`
    pub fn cursor(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

/// Editor-local screen coordinates of a document position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coords {
    pub left: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Attributes carried by an image node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageAttrs {
    pub src: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A node found at a document position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub node_type: NodeType,
    /// Position where the node starts
    pub pos: usize,
    pub image: Option<ImageAttrs>,
}

/// Named edits understood by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleMark(MarkType),
    SetColor(String),
    SetHighlight(String),
    ToggleHeading(u8),
    ToggleBulletList,
    ToggleOrderedList,
    ToggleBlockquote,
    ToggleCodeBlock,
    SetParagraph,
    InsertTable {
        rows: usize,
        cols: usize,
        with_header_row: bool,
    },
    AddColumnBefore,
    AddColumnAfter,
    DeleteColumn,
    AddRowBefore,
    AddRowAfter,
    DeleteRow,
    DeleteTable,
    SetImage {
        src: String,
    },
    SetHorizontalRule,
    SetNodeSelection(usize),
    UpdateImageAttributes {
        width: u32,
        height: u32,
    },
    DeleteRange {
        from: usize,
        to: usize,
    },
    SetSelection(Selection),
    InsertText(String),
    SplitBlock,
    DeleteBackward,
    DeleteForward,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ToggleMark(mark) => write!(f, "toggleMark({:?})", mark),
            Command::SetColor(color) => write!(f, "setColor({})", color),
            Command::SetHighlight(color) => write!(f, "setHighlight({})", color),
            Command::ToggleHeading(level) => write!(f, "toggleHeading({})", level),
            Command::ToggleBulletList => write!(f, "toggleBulletList"),
            Command::ToggleOrderedList => write!(f, "toggleOrderedList"),
            Command::ToggleBlockquote => write!(f, "toggleBlockquote"),
            Command::ToggleCodeBlock => write!(f, "toggleCodeBlock"),
            Command::SetParagraph => write!(f, "setParagraph"),
            Command::InsertTable { rows, cols, .. } => write!(f, "insertTable({}x{})", rows, cols),
            Command::AddColumnBefore => write!(f, "addColumnBefore"),
            Command::AddColumnAfter => write!(f, "addColumnAfter"),
            Command::DeleteColumn => write!(f, "deleteColumn"),
            Command::AddRowBefore => write!(f, "addRowBefore"),
            Command::AddRowAfter => write!(f, "addRowAfter"),
            Command::DeleteRow => write!(f, "deleteRow"),
            Command::DeleteTable => write!(f, "deleteTable"),
            Command::SetImage { .. } => write!(f, "setImage"),
            Command::SetHorizontalRule => write!(f, "setHorizontalRule"),
            Command::SetNodeSelection(pos) => write!(f, "setNodeSelection({})", pos),
            Command::UpdateImageAttributes { width, height } => {
                write!(f, "updateAttributes(image, {}x{})", width, height)
            }
            Command::DeleteRange { from, to } => write!(f, "deleteRange({}..{})", from, to),
            Command::SetSelection(sel) => write!(f, "setSelection({}, {})", sel.anchor, sel.head),
            Command::InsertText(text) => write!(f, "insertText({:?})", text),
            Command::SplitBlock => write!(f, "splitBlock"),
            Command::DeleteBackward => write!(f, "deleteBackward"),
            Command::DeleteForward => write!(f, "deleteForward"),
        }
    }
}

/// Change notifications emitted after a committed chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ContentChanged,
    SelectionChanged {
        anchor: usize,
        head: usize,
        empty: bool,
    },
}

/// The document engine as seen by the editor shell
pub trait DocumentController: fmt::Debug {
    /// Serialized HTML of the whole document
    fn html(&self) -> String;

    /// Structured document tree
    fn json(&self) -> DocumentNode;

    /// Plain text with blank lines between blocks
    fn text(&self) -> String;

    fn selection(&self) -> Selection;

    /// Largest valid position
    fn size(&self) -> usize;

    /// Text content between two positions, no separators
    fn text_between(&self, from: usize, to: usize) -> String;

    /// Screen coordinates of a position inside the editor viewport
    fn coords_at_pos(&self, pos: usize) -> Coords;

    fn node_at(&self, pos: usize) -> Option<NodeInfo>;

    fn is_active(&self, query: ActiveQuery) -> bool;

    /// Whether the commands would succeed, without committing anything
    fn can(&self, commands: &[Command]) -> bool;

    /// Apply every command or none of them
    fn run(&mut self, commands: &[Command]) -> Result<(), CommandError>;

    /// Drain pending change notifications
    fn take_events(&mut self) -> Vec<EngineEvent>;
}

/// Builder that batches commands into a single atomic commit.
///
/// ```ignore
/// CommandChain::new(&mut doc)
///     .then(Command::SetNodeSelection(pos))
///     .then(Command::UpdateImageAttributes { width, height })
///     .run();
/// ```
pub struct CommandChain<'a, D: DocumentController + ?Sized> {
    doc: &'a mut D,
    commands: Vec<Command>,
}

impl<'a, D: DocumentController + ?Sized> CommandChain<'a, D> {
    pub fn new(doc: &'a mut D) -> Self {
        Self {
            doc,
            commands: Vec::new(),
        }
    }

    pub fn then(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Whether the batched commands could run right now
    pub fn can(&self) -> bool {
        self.doc.can(&self.commands)
    }

    /// Commit the chain. Returns false when the engine refused it.
    pub fn run(self) -> bool {
        match self.doc.run(&self.commands) {
            Ok(()) => true,
            Err(e) => {
                debug!(
                    "Chain [{}] not applied: {}",
                    self.commands
                        .iter()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                    e
                );
                false
            }
        }
    }
}
