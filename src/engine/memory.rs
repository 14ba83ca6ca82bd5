//! In-process reference engine
//!
//! A small document engine: one block per line, per-character
//! marks, flat character positions with a single separator between blocks.
//! It speaks the full [`DocumentController`] contract so the editor shell can
//! run without an external engine.

use tracing::debug;

use super::{
    ActiveQuery, Command, Coords, DocumentController, DocumentNode, EngineEvent, ImageAttrs,
    MarkNode, MarkType, NodeInfo, NodeType, Selection,
};
use crate::error::CommandError;

/// Line text shown for an image block
pub const IMAGE_PLACEHOLDER: &str = "[image]";
/// Line text shown for a horizontal rule
pub const RULE_PLACEHOLDER: &str = "---";
/// Separator between table cells on a row line
pub const CELL_SEPARATOR: &str = " | ";

/// Marks carried by a single character
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub code: bool,
    pub color: Option<String>,
    pub highlight: Option<String>,
}

impl Marks {
    pub fn has(&self, mark: MarkType) -> bool {
        match mark {
            MarkType::Bold => self.bold,
            MarkType::Italic => self.italic,
            MarkType::Underline => self.underline,
            MarkType::Strike => self.strike,
            MarkType::Code => self.code,
            MarkType::TextColor => self.color.is_some(),
            MarkType::Highlight => self.highlight.is_some(),
        }
    }

    /// Flip a boolean mark; value marks can only be switched off here
    fn set(&mut self, mark: MarkType, on: bool) {
        match mark {
            MarkType::Bold => self.bold = on,
            MarkType::Italic => self.italic = on,
            MarkType::Underline => self.underline = on,
            MarkType::Strike => self.strike = on,
            MarkType::Code => self.code = on,
            MarkType::TextColor => {
                if !on {
                    self.color = None;
                }
            }
            MarkType::Highlight => {
                if !on {
                    self.highlight = None;
                }
            }
        }
    }

    fn set_value(&mut self, mark: MarkType, value: &str) {
        match mark {
            MarkType::TextColor => self.color = Some(value.to_string()),
            MarkType::Highlight => self.highlight = Some(value.to_string()),
            other => self.set(other, true),
        }
    }
}

/// Kind of a block line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
    BulletItem,
    OrderedItem,
    Blockquote,
    CodeBlock,
    TableRow { table: u32, header: bool },
    Image(ImageAttrs),
    HorizontalRule,
}

impl BlockKind {
    fn is_textblock(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph
                | BlockKind::Heading(_)
                | BlockKind::BulletItem
                | BlockKind::OrderedItem
                | BlockKind::Blockquote
                | BlockKind::CodeBlock
        )
    }

    fn is_atom(&self) -> bool {
        matches!(self, BlockKind::Image(_) | BlockKind::HorizontalRule)
    }

    /// Marks are not allowed in code blocks, atoms or table rows
    fn accepts_marks(&self) -> bool {
        self.is_textblock() && *self != BlockKind::CodeBlock
    }

    fn node_type(&self) -> NodeType {
        match self {
            BlockKind::Paragraph => NodeType::Paragraph,
            BlockKind::Heading(_) => NodeType::Heading,
            BlockKind::BulletItem => NodeType::BulletList,
            BlockKind::OrderedItem => NodeType::OrderedList,
            BlockKind::Blockquote => NodeType::Blockquote,
            BlockKind::CodeBlock => NodeType::CodeBlock,
            BlockKind::TableRow { .. } => NodeType::Table,
            BlockKind::Image(_) => NodeType::Image,
            BlockKind::HorizontalRule => NodeType::HorizontalRule,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Block {
    kind: BlockKind,
    chars: Vec<char>,
    marks: Vec<Marks>,
}

impl Block {
    fn new(kind: BlockKind, text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let marks = vec![Marks::default(); chars.len()];
        Self { kind, chars, marks }
    }

    fn table_row(table: u32, header: bool, cells: &[String]) -> Self {
        Self::new(BlockKind::TableRow { table, header }, &cells.join(CELL_SEPARATOR))
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn text(&self) -> String {
        self.chars.iter().collect()
    }

    fn is_empty_paragraph(&self) -> bool {
        self.kind == BlockKind::Paragraph && self.chars.is_empty()
    }

    fn cells(&self) -> Vec<String> {
        self.text()
            .split('|')
            .map(|cell| cell.trim().to_string())
            .collect()
    }

    fn set_cells(&mut self, cells: &[String]) {
        let text = cells.join(CELL_SEPARATOR);
        self.chars = text.chars().collect();
        self.marks = vec![Marks::default(); self.chars.len()];
    }

    /// Runs of characters sharing the same marks
    fn runs(&self) -> Vec<(String, &Marks)> {
        let mut runs = Vec::new();
        let mut start = 0;
        while start < self.chars.len() {
            let marks = &self.marks[start];
            let mut end = start + 1;
            while end < self.chars.len() && self.marks[end] == *marks {
                end += 1;
            }
            runs.push((self.chars[start..end].iter().collect(), marks));
            start = end;
        }
        runs
    }
}

/// Pixel metrics used to turn positions into screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub char_width: f32,
    pub line_height: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        // Monospace 16px with the text editor's 5px padding
        Self {
            char_width: 9.6,
            line_height: 20.8,
            origin_x: 5.0,
            origin_y: 5.0,
        }
    }
}

/// Everything a command chain may touch; cloned per transaction
#[derive(Debug, Clone, PartialEq)]
struct DocState {
    blocks: Vec<Block>,
    selection: Selection,
    node_selection: Option<usize>,
    stored_marks: Option<Marks>,
    next_table: u32,
}

impl DocState {
    fn size(&self) -> usize {
        self.blocks.iter().map(Block::len).sum::<usize>() + self.blocks.len().saturating_sub(1)
    }

    fn block_start(&self, index: usize) -> usize {
        self.blocks[..index].iter().map(|b| b.len() + 1).sum()
    }

    /// Block index and column of a position
    fn locate(&self, pos: usize) -> Result<(usize, usize), CommandError> {
        let mut start = 0;
        for (i, block) in self.blocks.iter().enumerate() {
            if pos <= start + block.len() {
                return Ok((i, pos - start));
            }
            start += block.len() + 1;
        }
        Err(CommandError::PositionOutOfRange {
            pos,
            size: self.size(),
        })
    }

    fn check_pos(&self, pos: usize) -> Result<(), CommandError> {
        if pos > self.size() {
            return Err(CommandError::PositionOutOfRange {
                pos,
                size: self.size(),
            });
        }
        Ok(())
    }

    fn set_cursor(&mut self, pos: usize) {
        self.selection = Selection::cursor(pos);
        self.node_selection = None;
        self.stored_marks = None;
    }

    fn selected_blocks(&self) -> Result<(usize, usize), CommandError> {
        let (first, _) = self.locate(self.selection.from())?;
        let (last, _) = self.locate(self.selection.to())?;
        Ok((first, last))
    }

    /// (block, start col, end col) for every markable slice of a range
    fn mark_spans(&self, from: usize, to: usize) -> Vec<(usize, usize, usize)> {
        let mut spans = Vec::new();
        let mut start = 0;
        for (i, block) in self.blocks.iter().enumerate() {
            let end = start + block.len();
            if block.kind.accepts_marks() && from < end && to > start {
                let s = from.max(start) - start;
                let e = to.min(end) - start;
                if s < e {
                    spans.push((i, s, e));
                }
            }
            start = end + 1;
        }
        spans
    }

    fn spans_have_mark(&self, spans: &[(usize, usize, usize)], mark: MarkType) -> bool {
        !spans.is_empty()
            && spans
                .iter()
                .all(|&(b, s, e)| self.blocks[b].marks[s..e].iter().all(|m| m.has(mark)))
    }

    fn marks_at_cursor(&self) -> Marks {
        if let Some(stored) = &self.stored_marks {
            return stored.clone();
        }
        match self.locate(self.selection.head) {
            Ok((b, col)) if col > 0 && self.blocks[b].kind.accepts_marks() => {
                self.blocks[b].marks[col - 1].clone()
            }
            _ => Marks::default(),
        }
    }

    fn text_between(&self, from: usize, to: usize) -> String {
        let mut out = String::new();
        if from >= to {
            return out;
        }
        let mut start = 0;
        for block in &self.blocks {
            let end = start + block.len();
            if from < end && to > start {
                let s = from.max(start) - start;
                let e = to.min(end) - start;
                out.extend(&block.chars[s..e]);
            }
            start = end + 1;
        }
        out
    }

    /// Insert blocks after `index`, replacing it when it is an empty paragraph.
    /// Returns the index of the first inserted block.
    fn insert_blocks_after(&mut self, index: usize, blocks: Vec<Block>) -> usize {
        if self.blocks[index].is_empty_paragraph() {
            self.blocks.splice(index..=index, blocks);
            index
        } else {
            self.blocks.splice(index + 1..index + 1, blocks);
            index + 1
        }
    }

    fn insert_atom(&mut self, block: Block) -> Result<(), CommandError> {
        let (b, _) = self.locate(self.selection.to())?;
        let at = self.insert_blocks_after(b, vec![block]);
        if at + 1 == self.blocks.len() {
            self.blocks.push(Block::new(BlockKind::Paragraph, ""));
        }
        self.set_cursor(self.block_start(at + 1));
        Ok(())
    }

    fn apply(&mut self, command: &Command) -> Result<(), CommandError> {
        match command {
            Command::ToggleMark(mark) => self.toggle_mark(*mark),
            Command::SetColor(color) => self.set_mark_value(MarkType::TextColor, color),
            Command::SetHighlight(color) => self.set_mark_value(MarkType::Highlight, color),
            Command::ToggleHeading(level) => {
                if !(1..=6).contains(level) {
                    return Err(CommandError::InvalidHeadingLevel(*level));
                }
                self.toggle_block(BlockKind::Heading(*level))
            }
            Command::ToggleBulletList => self.toggle_block(BlockKind::BulletItem),
            Command::ToggleOrderedList => self.toggle_block(BlockKind::OrderedItem),
            Command::ToggleBlockquote => self.toggle_block(BlockKind::Blockquote),
            Command::ToggleCodeBlock => self.toggle_block(BlockKind::CodeBlock),
            Command::SetParagraph => self.set_block_kind(BlockKind::Paragraph),
            Command::InsertTable {
                rows,
                cols,
                with_header_row,
            } => self.insert_table(*rows, *cols, *with_header_row),
            Command::AddColumnBefore => self.add_column(false),
            Command::AddColumnAfter => self.add_column(true),
            Command::DeleteColumn => self.delete_column(),
            Command::AddRowBefore => self.add_row(false),
            Command::AddRowAfter => self.add_row(true),
            Command::DeleteRow => self.delete_row(),
            Command::DeleteTable => self.delete_table(),
            Command::SetImage { src } => {
                if src.trim().is_empty() {
                    return Err(CommandError::NotApplicable("image needs a source".into()));
                }
                let attrs = ImageAttrs {
                    src: src.clone(),
                    width: None,
                    height: None,
                };
                self.insert_atom(Block::new(BlockKind::Image(attrs), IMAGE_PLACEHOLDER))
            }
            Command::SetHorizontalRule => {
                self.insert_atom(Block::new(BlockKind::HorizontalRule, RULE_PLACEHOLDER))
            }
            Command::SetNodeSelection(pos) => {
                let (b, _) = self.locate(*pos)?;
                let start = self.block_start(b);
                self.selection = Selection::new(start, start + self.blocks[b].len());
                self.node_selection = Some(b);
                Ok(())
            }
            Command::UpdateImageAttributes { width, height } => {
                let b = self.node_selection.ok_or(CommandError::NoImageSelected)?;
                match &mut self.blocks[b].kind {
                    BlockKind::Image(attrs) => {
                        attrs.width = Some(*width);
                        attrs.height = Some(*height);
                        Ok(())
                    }
                    _ => Err(CommandError::NoImageSelected),
                }
            }
            Command::DeleteRange { from, to } => self.delete_range(*from, *to),
            Command::SetSelection(selection) => {
                self.check_pos(selection.anchor)?;
                self.check_pos(selection.head)?;
                self.selection = *selection;
                self.node_selection = None;
                self.stored_marks = None;
                Ok(())
            }
            Command::InsertText(text) => self.insert_text(text),
            Command::SplitBlock => {
                if !self.selection.is_empty() {
                    self.delete_range(self.selection.from(), self.selection.to())?;
                }
                self.split_at_cursor()
            }
            Command::DeleteBackward => {
                if !self.selection.is_empty() {
                    return self.delete_range(self.selection.from(), self.selection.to());
                }
                let pos = self.selection.head;
                if pos == 0 {
                    return Err(CommandError::NotApplicable("start of document".into()));
                }
                self.delete_range(pos - 1, pos)
            }
            Command::DeleteForward => {
                if !self.selection.is_empty() {
                    return self.delete_range(self.selection.from(), self.selection.to());
                }
                let pos = self.selection.head;
                if pos >= self.size() {
                    return Err(CommandError::NotApplicable("end of document".into()));
                }
                self.delete_range(pos, pos + 1)
            }
        }
    }

    fn toggle_mark(&mut self, mark: MarkType) -> Result<(), CommandError> {
        let value_mark = matches!(mark, MarkType::TextColor | MarkType::Highlight);
        let sel = self.selection;

        if sel.is_empty() {
            let mut marks = self.marks_at_cursor();
            let on = !marks.has(mark);
            if on && value_mark {
                return Err(CommandError::NotApplicable(format!(
                    "{:?} needs a color value",
                    mark
                )));
            }
            marks.set(mark, on);
            self.stored_marks = Some(marks);
            return Ok(());
        }

        let spans = self.mark_spans(sel.from(), sel.to());
        if spans.is_empty() {
            return Err(CommandError::NotApplicable("no markable text selected".into()));
        }
        let on = !self.spans_have_mark(&spans, mark);
        if on && value_mark {
            return Err(CommandError::NotApplicable(format!(
                "{:?} needs a color value",
                mark
            )));
        }
        for (b, s, e) in spans {
            for marks in &mut self.blocks[b].marks[s..e] {
                marks.set(mark, on);
            }
        }
        Ok(())
    }

    fn set_mark_value(&mut self, mark: MarkType, value: &str) -> Result<(), CommandError> {
        if value.trim().is_empty() {
            return Err(CommandError::NotApplicable("empty color".into()));
        }
        let sel = self.selection;
        if sel.is_empty() {
            let mut marks = self.marks_at_cursor();
            marks.set_value(mark, value);
            self.stored_marks = Some(marks);
            return Ok(());
        }
        let spans = self.mark_spans(sel.from(), sel.to());
        if spans.is_empty() {
            return Err(CommandError::NotApplicable("no markable text selected".into()));
        }
        for (b, s, e) in spans {
            for marks in &mut self.blocks[b].marks[s..e] {
                marks.set_value(mark, value);
            }
        }
        Ok(())
    }

    fn toggle_block(&mut self, kind: BlockKind) -> Result<(), CommandError> {
        let (first, last) = self.selected_blocks()?;
        let all = self.blocks[first..=last].iter().all(|b| b.kind == kind);
        self.set_block_kind(if all { BlockKind::Paragraph } else { kind })
    }

    fn set_block_kind(&mut self, kind: BlockKind) -> Result<(), CommandError> {
        let (first, last) = self.selected_blocks()?;
        if self.blocks[first..=last]
            .iter()
            .any(|b| !b.kind.is_textblock())
        {
            return Err(CommandError::NotApplicable(
                "selection contains a non-text block".into(),
            ));
        }
        for block in &mut self.blocks[first..=last] {
            block.kind = kind.clone();
            if !kind.accepts_marks() {
                block.marks.iter_mut().for_each(|m| *m = Marks::default());
            }
        }
        Ok(())
    }

    fn current_row(&self) -> Result<(usize, u32), CommandError> {
        let (b, _) = self.locate(self.selection.head)?;
        match self.blocks[b].kind {
            BlockKind::TableRow { table, .. } => Ok((b, table)),
            _ => Err(CommandError::NotInTable),
        }
    }

    fn current_column(&self) -> Result<usize, CommandError> {
        let (b, col) = self.locate(self.selection.head)?;
        Ok(self.blocks[b].chars[..col].iter().filter(|c| **c == '|').count())
    }

    fn table_rows(&self, table: u32) -> Vec<usize> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| matches!(b.kind, BlockKind::TableRow { table: t, .. } if t == table))
            .map(|(i, _)| i)
            .collect()
    }

    fn insert_table(&mut self, rows: usize, cols: usize, header: bool) -> Result<(), CommandError> {
        if rows == 0 || cols == 0 {
            return Err(CommandError::NotApplicable("table needs rows and columns".into()));
        }
        let (b, _) = self.locate(self.selection.to())?;
        if matches!(self.blocks[b].kind, BlockKind::TableRow { .. }) {
            return Err(CommandError::NotApplicable("tables cannot be nested".into()));
        }
        let table = self.next_table;
        self.next_table += 1;
        let empty = vec![String::new(); cols];
        let new_rows = (0..rows)
            .map(|r| Block::table_row(table, header && r == 0, &empty))
            .collect();
        let at = self.insert_blocks_after(b, new_rows);
        self.set_cursor(self.block_start(at));
        Ok(())
    }

    fn add_column(&mut self, after: bool) -> Result<(), CommandError> {
        let (b, table) = self.current_row()?;
        let col = self.current_column()? + usize::from(after);
        for i in self.table_rows(table) {
            let mut cells = self.blocks[i].cells();
            let at = col.min(cells.len());
            cells.insert(at, String::new());
            self.blocks[i].set_cells(&cells);
        }
        self.set_cursor(self.block_start(b));
        Ok(())
    }

    fn delete_column(&mut self) -> Result<(), CommandError> {
        let (b, table) = self.current_row()?;
        if self.blocks[b].cells().len() <= 1 {
            return self.delete_table();
        }
        let col = self.current_column()?;
        for i in self.table_rows(table) {
            let mut cells = self.blocks[i].cells();
            if col < cells.len() {
                cells.remove(col);
            }
            self.blocks[i].set_cells(&cells);
        }
        self.set_cursor(self.block_start(b));
        Ok(())
    }

    fn add_row(&mut self, after: bool) -> Result<(), CommandError> {
        let (b, table) = self.current_row()?;
        let empty = vec![String::new(); self.blocks[b].cells().len()];
        let at = if after { b + 1 } else { b };
        self.blocks.insert(at, Block::table_row(table, false, &empty));
        self.set_cursor(self.block_start(at));
        Ok(())
    }

    fn delete_row(&mut self) -> Result<(), CommandError> {
        let (b, table) = self.current_row()?;
        if self.table_rows(table).len() <= 1 {
            return self.delete_table();
        }
        self.blocks.remove(b);
        let next = b.min(self.blocks.len() - 1);
        self.set_cursor(self.block_start(next));
        Ok(())
    }

    fn delete_table(&mut self) -> Result<(), CommandError> {
        let (_, table) = self.current_row()?;
        let first = self.table_rows(table)[0];
        self.blocks
            .retain(|b| !matches!(b.kind, BlockKind::TableRow { table: t, .. } if t == table));
        if self.blocks.is_empty() {
            self.blocks.push(Block::new(BlockKind::Paragraph, ""));
        }
        let next = first.min(self.blocks.len() - 1);
        self.set_cursor(self.block_start(next));
        Ok(())
    }

    fn delete_range(&mut self, from: usize, to: usize) -> Result<(), CommandError> {
        if from > to {
            return Err(CommandError::NotApplicable(format!(
                "inverted range {}..{}",
                from, to
            )));
        }
        self.check_pos(to)?;
        if from == to {
            self.set_cursor(from);
            return Ok(());
        }
        let (a, col_a) = self.locate(from)?;
        let (b, col_b) = self.locate(to)?;
        let head_atom = self.blocks[a].kind.is_atom();
        let tail_atom = self.blocks[b].kind.is_atom();

        if head_atom || tail_atom {
            return self.delete_with_atoms(a, col_a, b, col_b);
        }
        if a == b {
            self.blocks[a].chars.drain(col_a..col_b);
            self.blocks[a].marks.drain(col_a..col_b);
        } else {
            let tail_chars = self.blocks[b].chars.split_off(col_b);
            let tail_marks = self.blocks[b].marks.split_off(col_b);
            let head = &mut self.blocks[a];
            head.chars.truncate(col_a);
            head.marks.truncate(col_a);
            head.chars.extend(tail_chars);
            head.marks.extend(tail_marks);
            self.blocks.drain(a + 1..=b);
        }
        self.set_cursor(from);
        Ok(())
    }

    /// Range deletion touching an image or rule: atoms go whole, text
    /// on either side is trimmed but never merged into them
    fn delete_with_atoms(
        &mut self,
        a: usize,
        col_a: usize,
        b: usize,
        col_b: usize,
    ) -> Result<(), CommandError> {
        let head_atom = self.blocks[a].kind.is_atom();
        let mut kept = Vec::new();
        if !head_atom {
            let mut head = self.blocks[a].clone();
            head.chars.truncate(col_a);
            head.marks.truncate(col_a);
            kept.push(head);
        }
        if b != a && !self.blocks[b].kind.is_atom() {
            let mut tail = self.blocks[b].clone();
            tail.chars.drain(..col_b);
            tail.marks.drain(..col_b);
            kept.push(tail);
        }

        self.blocks.splice(a..=b, kept);
        if self.blocks.is_empty() {
            self.blocks.push(Block::new(BlockKind::Paragraph, ""));
        }
        let cursor = if a < self.blocks.len() {
            self.block_start(a) + if head_atom { 0 } else { col_a }
        } else {
            self.size()
        };
        debug!("Removed atom block(s) in {}..={}", a, b);
        self.set_cursor(cursor);
        Ok(())
    }

    fn insert_text(&mut self, text: &str) -> Result<(), CommandError> {
        if !self.selection.is_empty() {
            let stored = self.stored_marks.take();
            self.delete_range(self.selection.from(), self.selection.to())?;
            self.stored_marks = stored;
        }
        let marks = self.marks_at_cursor();
        for ch in text.chars() {
            match ch {
                '\r' => {}
                '\n' => {
                    self.split_at_cursor()?;
                }
                _ => {
                    let (b, col) = self.locate(self.selection.head)?;
                    let block = &mut self.blocks[b];
                    if block.kind.is_atom() {
                        return Err(CommandError::NotApplicable(
                            "cannot type inside an image or rule".into(),
                        ));
                    }
                    let char_marks = if block.kind.accepts_marks() {
                        marks.clone()
                    } else {
                        Marks::default()
                    };
                    block.chars.insert(col, ch);
                    block.marks.insert(col, char_marks);
                    self.selection = Selection::cursor(self.selection.head + 1);
                }
            }
        }
        self.node_selection = None;
        self.stored_marks = None;
        Ok(())
    }

    fn split_at_cursor(&mut self) -> Result<(), CommandError> {
        let (b, col) = self.locate(self.selection.head)?;
        if self.blocks[b].kind.is_atom() {
            // New empty paragraph before or after the atom, never inside it
            let at = if col == 0 { b } else { b + 1 };
            self.blocks.insert(at, Block::new(BlockKind::Paragraph, ""));
            self.selection = Selection::cursor(self.block_start(b + 1));
            self.node_selection = None;
            return Ok(());
        }
        let block = &mut self.blocks[b];
        let chars = block.chars.split_off(col);
        let marks = block.marks.split_off(col);
        let kind = match block.kind {
            BlockKind::BulletItem
            | BlockKind::OrderedItem
            | BlockKind::Blockquote
            | BlockKind::CodeBlock => block.kind.clone(),
            _ => BlockKind::Paragraph,
        };
        self.blocks.insert(b + 1, Block { kind, chars, marks });
        let pos = self.block_start(b + 1);
        self.selection = Selection::cursor(pos);
        self.node_selection = None;
        Ok(())
    }
}

/// The reference document engine
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    state: DocState,
    metrics: TextMetrics,
    events: Vec<EngineEvent>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// A document holding one empty paragraph
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// One paragraph per line of `text`
    pub fn from_text(text: &str) -> Self {
        let mut blocks: Vec<Block> = text
            .lines()
            .map(|line| Block::new(BlockKind::Paragraph, line))
            .collect();
        if blocks.is_empty() {
            blocks.push(Block::new(BlockKind::Paragraph, ""));
        }
        Self {
            state: DocState {
                blocks,
                selection: Selection::default(),
                node_selection: None,
                stored_marks: None,
                next_table: 1,
            },
            metrics: TextMetrics::default(),
            events: Vec::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Line buffer mirrored by the text surface: block texts joined by `\n`
    pub fn source_text(&self) -> String {
        self.state
            .blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn block_count(&self) -> usize {
        self.state.blocks.len()
    }

    pub fn block_kind(&self, index: usize) -> Option<&BlockKind> {
        self.state.blocks.get(index).map(|b| &b.kind)
    }

    /// Position of a (line, column) pair, clamped into the document
    pub fn pos_at(&self, line: usize, column: usize) -> usize {
        let Some(block) = self.state.blocks.get(line) else {
            return self.state.size();
        };
        self.state.block_start(line) + column.min(block.len())
    }

    /// (line, column) of a position, clamped into the document
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        self.state
            .locate(pos.min(self.state.size()))
            .unwrap_or((0, 0))
    }

    /// Marks that the next typed character would carry
    pub fn marks_at_cursor(&self) -> Marks {
        self.state.marks_at_cursor()
    }
}

impl DocumentController for MemoryDocument {
    fn html(&self) -> String {
        let blocks = &self.state.blocks;
        let mut out = String::new();
        let mut i = 0;
        while i < blocks.len() {
            match &blocks[i].kind {
                BlockKind::BulletItem | BlockKind::OrderedItem => {
                    let kind = blocks[i].kind.clone();
                    let tag = if kind == BlockKind::BulletItem { "ul" } else { "ol" };
                    out.push_str(&format!("<{}>", tag));
                    while i < blocks.len() && blocks[i].kind == kind {
                        out.push_str(&format!("<li><p>{}</p></li>", inline_html(&blocks[i])));
                        i += 1;
                    }
                    out.push_str(&format!("</{}>", tag));
                    continue;
                }
                BlockKind::Blockquote => {
                    out.push_str("<blockquote>");
                    while i < blocks.len() && blocks[i].kind == BlockKind::Blockquote {
                        out.push_str(&format!("<p>{}</p>", inline_html(&blocks[i])));
                        i += 1;
                    }
                    out.push_str("</blockquote>");
                    continue;
                }
                BlockKind::TableRow { table, .. } => {
                    let table = *table;
                    out.push_str("<table><tbody>");
                    while i < blocks.len() {
                        let BlockKind::TableRow { table: t, header } = blocks[i].kind else {
                            break;
                        };
                        if t != table {
                            break;
                        }
                        let tag = if header { "th" } else { "td" };
                        out.push_str("<tr>");
                        for cell in blocks[i].cells() {
                            out.push_str(&format!(
                                "<{tag} colspan=\"1\" rowspan=\"1\"><p>{}</p></{tag}>",
                                escape_html(&cell)
                            ));
                        }
                        out.push_str("</tr>");
                        i += 1;
                    }
                    out.push_str("</tbody></table>");
                    continue;
                }
                BlockKind::Paragraph => {
                    out.push_str(&format!("<p>{}</p>", inline_html(&blocks[i])));
                }
                BlockKind::Heading(level) => {
                    out.push_str(&format!(
                        "<h{level}>{}</h{level}>",
                        inline_html(&blocks[i])
                    ));
                }
                BlockKind::CodeBlock => {
                    out.push_str(&format!(
                        "<pre><code>{}</code></pre>",
                        escape_html(&blocks[i].text())
                    ));
                }
                BlockKind::Image(attrs) => {
                    out.push_str(&format!("<img src=\"{}\"", escape_html(&attrs.src)));
                    if let Some(width) = attrs.width {
                        out.push_str(&format!(" width=\"{}\"", width));
                    }
                    if let Some(height) = attrs.height {
                        out.push_str(&format!(" height=\"{}\"", height));
                    }
                    out.push('>');
                }
                BlockKind::HorizontalRule => out.push_str("<hr>"),
            }
            i += 1;
        }
        out
    }

    fn json(&self) -> DocumentNode {
        let blocks = &self.state.blocks;
        let mut children = Vec::new();
        let mut i = 0;
        while i < blocks.len() {
            match &blocks[i].kind {
                BlockKind::BulletItem | BlockKind::OrderedItem => {
                    let kind = blocks[i].kind.clone();
                    let mut items = Vec::new();
                    while i < blocks.len() && blocks[i].kind == kind {
                        items.push(
                            DocumentNode::new("listItem")
                                .with_content(vec![paragraph_json(&blocks[i])]),
                        );
                        i += 1;
                    }
                    let list = if kind == BlockKind::BulletItem {
                        DocumentNode::new("bulletList")
                    } else {
                        DocumentNode::new("orderedList").with_attr("start", 1)
                    };
                    children.push(list.with_content(items));
                    continue;
                }
                BlockKind::Blockquote => {
                    let mut paragraphs = Vec::new();
                    while i < blocks.len() && blocks[i].kind == BlockKind::Blockquote {
                        paragraphs.push(paragraph_json(&blocks[i]));
                        i += 1;
                    }
                    children.push(DocumentNode::new("blockquote").with_content(paragraphs));
                    continue;
                }
                BlockKind::TableRow { table, .. } => {
                    let table = *table;
                    let mut rows = Vec::new();
                    while i < blocks.len() {
                        let BlockKind::TableRow { table: t, header } = blocks[i].kind else {
                            break;
                        };
                        if t != table {
                            break;
                        }
                        let cell_type = if header { "tableHeader" } else { "tableCell" };
                        let cells = blocks[i]
                            .cells()
                            .iter()
                            .map(|cell| {
                                let text = if cell.is_empty() {
                                    vec![]
                                } else {
                                    vec![DocumentNode::text_node(cell, vec![])]
                                };
                                DocumentNode::new(cell_type)
                                    .with_attr("colspan", 1)
                                    .with_attr("rowspan", 1)
                                    .with_attr("colwidth", serde_json::Value::Null)
                                    .with_content(vec![
                                        DocumentNode::new("paragraph").with_content(text)
                                    ])
                            })
                            .collect();
                        rows.push(DocumentNode::new("tableRow").with_content(cells));
                        i += 1;
                    }
                    children.push(DocumentNode::new("table").with_content(rows));
                    continue;
                }
                BlockKind::Paragraph => children.push(paragraph_json(&blocks[i])),
                BlockKind::Heading(level) => children.push(
                    DocumentNode::new("heading")
                        .with_attr("level", *level)
                        .with_content(inline_json(&blocks[i])),
                ),
                BlockKind::CodeBlock => {
                    let text = blocks[i].text();
                    let content = if text.is_empty() {
                        vec![]
                    } else {
                        vec![DocumentNode::text_node(&text, vec![])]
                    };
                    children.push(
                        DocumentNode::new("codeBlock")
                            .with_attr("language", serde_json::Value::Null)
                            .with_content(content),
                    );
                }
                BlockKind::Image(attrs) => children.push(
                    DocumentNode::new("image")
                        .with_attr("src", attrs.src.as_str())
                        .with_attr("alt", serde_json::Value::Null)
                        .with_attr("title", serde_json::Value::Null)
                        .with_attr("width", attrs.width.map_or(serde_json::Value::Null, serde_json::Value::from))
                        .with_attr(
                            "height",
                            attrs.height.map_or(serde_json::Value::Null, serde_json::Value::from),
                        ),
                ),
                BlockKind::HorizontalRule => children.push(DocumentNode::new("horizontalRule")),
            }
            i += 1;
        }
        DocumentNode::new("doc").with_content(children)
    }

    fn text(&self) -> String {
        self.state
            .blocks
            .iter()
            .map(|b| match b.kind {
                BlockKind::Image(_) | BlockKind::HorizontalRule => String::new(),
                BlockKind::TableRow { .. } => b.cells().join("\n\n"),
                _ => b.text(),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn selection(&self) -> Selection {
        self.state.selection
    }

    fn size(&self) -> usize {
        self.state.size()
    }

    fn text_between(&self, from: usize, to: usize) -> String {
        self.state.text_between(from, to)
    }

    fn coords_at_pos(&self, pos: usize) -> Coords {
        let (line, col) = self.line_col(pos);
        let top = self.metrics.origin_y + line as f32 * self.metrics.line_height;
        Coords {
            left: self.metrics.origin_x + col as f32 * self.metrics.char_width,
            top,
            bottom: top + self.metrics.line_height,
        }
    }

    fn node_at(&self, pos: usize) -> Option<NodeInfo> {
        let (b, _) = self.state.locate(pos).ok()?;
        let kind = &self.state.blocks[b].kind;
        Some(NodeInfo {
            node_type: kind.node_type(),
            pos: self.state.block_start(b),
            image: match kind {
                BlockKind::Image(attrs) => Some(attrs.clone()),
                _ => None,
            },
        })
    }

    fn is_active(&self, query: ActiveQuery) -> bool {
        let state = &self.state;
        let sel = state.selection;
        match query {
            ActiveQuery::Mark(mark) => {
                if sel.is_empty() {
                    state.marks_at_cursor().has(mark)
                } else {
                    state.spans_have_mark(&state.mark_spans(sel.from(), sel.to()), mark)
                }
            }
            ActiveQuery::Node(NodeType::Image) => {
                if let Some(b) = state.node_selection {
                    return matches!(state.blocks[b].kind, BlockKind::Image(_));
                }
                state
                    .locate(sel.from())
                    .map(|(b, _)| matches!(state.blocks[b].kind, BlockKind::Image(_)))
                    .unwrap_or(false)
            }
            ActiveQuery::Node(node_type) => state
                .selected_blocks()
                .map(|(first, last)| {
                    state.blocks[first..=last]
                        .iter()
                        .all(|b| b.kind.node_type() == node_type)
                })
                .unwrap_or(false),
            ActiveQuery::Heading(level) => state
                .selected_blocks()
                .map(|(first, last)| {
                    state.blocks[first..=last]
                        .iter()
                        .all(|b| b.kind == BlockKind::Heading(level))
                })
                .unwrap_or(false),
        }
    }

    fn can(&self, commands: &[Command]) -> bool {
        let mut draft = self.state.clone();
        commands.iter().all(|c| draft.apply(c).is_ok())
    }

    fn run(&mut self, commands: &[Command]) -> Result<(), CommandError> {
        let mut draft = self.state.clone();
        for command in commands {
            draft.apply(command)?;
            debug!("Applied {}", command);
        }

        let content_changed = draft.blocks != self.state.blocks;
        let selection_changed = draft.selection != self.state.selection;
        self.state = draft;

        if content_changed {
            self.events.push(EngineEvent::ContentChanged);
        }
        if selection_changed {
            let sel = self.state.selection;
            self.events.push(EngineEvent::SelectionChanged {
                anchor: sel.anchor,
                head: sel.head,
                empty: sel.is_empty(),
            });
        }
        Ok(())
    }

    fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn inline_html(block: &Block) -> String {
    let mut out = String::new();
    for (text, marks) in block.runs() {
        let mut html = escape_html(&text);
        if marks.code {
            html = format!("<code>{}</code>", html);
        }
        if marks.strike {
            html = format!("<s>{}</s>", html);
        }
        if marks.underline {
            html = format!("<u>{}</u>", html);
        }
        if marks.italic {
            html = format!("<em>{}</em>", html);
        }
        if marks.bold {
            html = format!("<strong>{}</strong>", html);
        }
        if let Some(color) = &marks.highlight {
            html = format!(
                "<mark data-color=\"{c}\" style=\"background-color: {c}; color: inherit\">{}</mark>",
                html,
                c = escape_html(color)
            );
        }
        if let Some(color) = &marks.color {
            html = format!(
                "<span style=\"color: {}\">{}</span>",
                escape_html(color),
                html
            );
        }
        out.push_str(&html);
    }
    out
}

fn inline_json(block: &Block) -> Vec<DocumentNode> {
    block
        .runs()
        .into_iter()
        .map(|(text, marks)| {
            let mut mark_nodes = Vec::new();
            if marks.bold {
                mark_nodes.push(MarkNode::new("bold"));
            }
            if marks.italic {
                mark_nodes.push(MarkNode::new("italic"));
            }
            if marks.underline {
                mark_nodes.push(MarkNode::new("underline"));
            }
            if marks.strike {
                mark_nodes.push(MarkNode::new("strike"));
            }
            if marks.code {
                mark_nodes.push(MarkNode::new("code"));
            }
            if let Some(color) = &marks.color {
                mark_nodes.push(MarkNode::new("textStyle").with_attr("color", color.as_str()));
            }
            if let Some(color) = &marks.highlight {
                mark_nodes.push(MarkNode::new("highlight").with_attr("color", color.as_str()));
            }
            DocumentNode::text_node(&text, mark_nodes)
        })
        .collect()
}

fn paragraph_json(block: &Block) -> DocumentNode {
    DocumentNode::new("paragraph").with_content(inline_json(block))
}
