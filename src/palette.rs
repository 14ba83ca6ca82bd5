//! Slash Command Palette
//!
//! Typing `/` opens a small command list at the caret. The list can be
//! filtered, navigated with the arrow keys and run with Enter.

use tracing::{debug, info};

use crate::engine::{Command, CommandChain, Coords, DocumentController};

/// What a palette entry does when run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashAction {
    InsertTable,
    ToggleCodeBlock,
    InsertDivider,
    /// Ask for an image URL first
    PromptImage,
}

impl SlashAction {
    /// Engine commands for actions that need no further input
    pub fn commands(&self) -> Option<Vec<Command>> {
        match self {
            SlashAction::InsertTable => Some(vec![Command::InsertTable {
                rows: 2,
                cols: 2,
                with_header_row: true,
            }]),
            SlashAction::ToggleCodeBlock => Some(vec![Command::ToggleCodeBlock]),
            SlashAction::InsertDivider => Some(vec![Command::SetHorizontalRule]),
            SlashAction::PromptImage => None,
        }
    }
}

/// One palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlashCommand {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub action: SlashAction,
}

pub const SLASH_COMMANDS: [SlashCommand; 4] = [
    SlashCommand {
        id: "table",
        title: "Table",
        description: "Insert a 2x2 table",
        action: SlashAction::InsertTable,
    },
    SlashCommand {
        id: "codeblock",
        title: "Code Block",
        description: "Insert a code block",
        action: SlashAction::ToggleCodeBlock,
    },
    SlashCommand {
        id: "divider",
        title: "Divider",
        description: "Insert a horizontal rule",
        action: SlashAction::InsertDivider,
    },
    SlashCommand {
        id: "image",
        title: "Image",
        description: "Upload or insert an image",
        action: SlashAction::PromptImage,
    },
];

/// Case-insensitive substring match on title or description
pub fn filter_commands(query: &str) -> Vec<&'static SlashCommand> {
    let query = query.to_lowercase();
    SLASH_COMMANDS
        .iter()
        .filter(|c| {
            c.title.to_lowercase().contains(&query)
                || c.description.to_lowercase().contains(&query)
        })
        .collect()
}

/// Keys the palette reacts to while open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKey {
    Up,
    Down,
    Enter,
    Escape,
}

/// Result of feeding a key to the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteOutcome {
    /// Palette closed or nothing to act on
    Ignored,
    Moved(usize),
    /// Run this action; the palette is now closed
    Run(SlashAction),
    Closed,
}

/// State of the palette
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaletteState {
    Closed,
    /// Open at editor-local (x, y)
    Open { x: f32, y: f32 },
}

/// Slash palette state machine
#[derive(Debug)]
pub struct SlashPalette {
    state: PaletteState,
    query: String,
    selected: usize,
}

impl Default for SlashPalette {
    fn default() -> Self {
        Self::new()
    }
}

impl SlashPalette {
    pub fn new() -> Self {
        Self {
            state: PaletteState::Closed,
            query: String::new(),
            selected: 0,
        }
    }

    /// Open below the caret. Returns false when already open.
    pub fn open(&mut self, caret: Coords, gap: f32) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = PaletteState::Open {
            x: caret.left,
            y: caret.bottom + gap,
        };
        self.query.clear();
        self.selected = 0;
        info!("📋 Slash palette opened at ({:.0}, {:.0})", caret.left, caret.bottom + gap);
        true
    }

    pub fn close(&mut self) {
        if self.is_open() {
            debug!("Slash palette closed");
        }
        self.state = PaletteState::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PaletteState::Open { .. })
    }

    pub fn state(&self) -> PaletteState {
        self.state
    }

    /// Editor-local position while open
    pub fn position(&self) -> Option<(f32, f32)> {
        match self.state {
            PaletteState::Open { x, y } => Some((x, y)),
            PaletteState::Closed => None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Refilter; the highlight goes back to the first entry
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.selected = 0;
    }

    pub fn filtered(&self) -> Vec<&'static SlashCommand> {
        filter_commands(&self.query)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn handle_key(&mut self, key: PaletteKey) -> PaletteOutcome {
        if !self.is_open() {
            return PaletteOutcome::Ignored;
        }
        let commands = self.filtered();
        match key {
            PaletteKey::Down | PaletteKey::Up if commands.is_empty() => PaletteOutcome::Ignored,
            PaletteKey::Down => {
                self.selected = (self.selected + 1) % commands.len();
                PaletteOutcome::Moved(self.selected)
            }
            PaletteKey::Up => {
                self.selected = (self.selected + commands.len() - 1) % commands.len();
                PaletteOutcome::Moved(self.selected)
            }
            PaletteKey::Enter => match commands.get(self.selected) {
                Some(command) => {
                    let action = command.action;
                    self.close();
                    PaletteOutcome::Run(action)
                }
                None => PaletteOutcome::Ignored,
            },
            PaletteKey::Escape => {
                self.close();
                PaletteOutcome::Closed
            }
        }
    }

    /// Pick an entry by clicking it
    pub fn choose(&mut self, index: usize) -> Option<SlashAction> {
        if !self.is_open() {
            return None;
        }
        let action = self.filtered().get(index).map(|c| c.action)?;
        self.close();
        Some(action)
    }
}

/// Run a palette action. Returns false when it needs an image URL first
/// or the engine refused it.
pub fn run_action<D: DocumentController + ?Sized>(doc: &mut D, action: SlashAction) -> bool {
    let Some(commands) = action.commands() else {
        return false;
    };
    debug!("Slash action {:?}", action);
    commands
        .into_iter()
        .fold(CommandChain::new(doc), |chain, command| chain.then(command))
        .run()
}

/// Insert an image by URL. An empty URL aborts silently.
pub fn insert_image_url<D: DocumentController + ?Sized>(doc: &mut D, url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }
    CommandChain::new(doc)
        .then(Command::SetImage {
            src: url.to_string(),
        })
        .run()
}

/// Delete the trigger `/` if it still sits right before the caret
pub fn remove_trigger_slash<D: DocumentController + ?Sized>(doc: &mut D) -> bool {
    let from = doc.selection().from();
    if from == 0 || doc.text_between(from - 1, from) != "/" {
        return false;
    }
    CommandChain::new(doc)
        .then(Command::DeleteRange {
            from: from - 1,
            to: from,
        })
        .run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MemoryDocument, Selection};

    fn caret() -> Coords {
        Coords {
            left: 40.0,
            top: 10.0,
            bottom: 30.0,
        }
    }

    fn open_palette() -> SlashPalette {
        let mut palette = SlashPalette::new();
        assert!(palette.open(caret(), 5.0));
        palette
    }

    #[test]
    fn test_open_positions_below_caret() {
        let mut palette = open_palette();
        assert_eq!(palette.position(), Some((40.0, 35.0)));
        assert!(!palette.open(caret(), 5.0));
    }

    #[test]
    fn test_filter_matches_title_or_description() {
        let ids: Vec<_> = filter_commands("RULE").iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["divider"]);
        let ids: Vec<_> = filter_commands("insert").iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["table", "codeblock", "divider", "image"]);
        assert!(filter_commands("zzz").is_empty());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut palette = open_palette();
        assert_eq!(palette.handle_key(PaletteKey::Up), PaletteOutcome::Moved(3));
        assert_eq!(palette.handle_key(PaletteKey::Down), PaletteOutcome::Moved(0));
    }

    #[test]
    fn test_query_resets_selection() {
        let mut palette = open_palette();
        palette.handle_key(PaletteKey::Down);
        palette.handle_key(PaletteKey::Down);
        palette.set_query("code");
        assert_eq!(palette.selected_index(), 0);
        assert_eq!(palette.filtered().len(), 1);
    }

    #[test]
    fn test_no_match_makes_keys_noops() {
        let mut palette = open_palette();
        palette.set_query("nothing here");
        assert_eq!(palette.handle_key(PaletteKey::Down), PaletteOutcome::Ignored);
        assert_eq!(palette.handle_key(PaletteKey::Enter), PaletteOutcome::Ignored);
        assert!(palette.is_open());
    }

    #[test]
    fn test_enter_runs_and_closes() {
        let mut palette = open_palette();
        palette.handle_key(PaletteKey::Down);
        assert_eq!(
            palette.handle_key(PaletteKey::Enter),
            PaletteOutcome::Run(SlashAction::ToggleCodeBlock)
        );
        assert!(!palette.is_open());
    }

    #[test]
    fn test_escape_closes_without_action() {
        let mut palette = open_palette();
        assert_eq!(palette.handle_key(PaletteKey::Escape), PaletteOutcome::Closed);
        assert_eq!(palette.handle_key(PaletteKey::Enter), PaletteOutcome::Ignored);
    }

    #[test]
    fn test_trigger_slash_removed_only_when_adjacent() {
        let mut doc = MemoryDocument::from_text("ab/");
        doc.run(&[Command::SetSelection(Selection::cursor(3))]).unwrap();
        assert!(remove_trigger_slash(&mut doc));
        assert_eq!(doc.source_text(), "ab");

        let mut doc = MemoryDocument::from_text("a/b");
        doc.run(&[Command::SetSelection(Selection::cursor(3))]).unwrap();
        assert!(!remove_trigger_slash(&mut doc));
        assert_eq!(doc.source_text(), "a/b");
    }

    #[test]
    fn test_empty_image_url_aborts() {
        let mut doc = MemoryDocument::new();
        assert!(!insert_image_url(&mut doc, "   "));
        assert_eq!(doc.block_count(), 1);
        assert!(insert_image_url(&mut doc, "https://example.com/a.png"));
        assert!(doc.html().contains("<img src=\"https://example.com/a.png\">"));
    }

    #[test]
    fn test_code_block_action_then_slash_cleanup() {
        let mut doc = MemoryDocument::from_text("/");
        doc.run(&[Command::SetSelection(Selection::cursor(1))]).unwrap();
        assert!(run_action(&mut doc, SlashAction::ToggleCodeBlock));
        assert!(remove_trigger_slash(&mut doc));
        assert_eq!(doc.html(), "<pre><code></code></pre>");
    }
}
