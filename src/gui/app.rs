//! Main application state for RichEdit GUI
//!
//! Contains the EditorApp struct and initialization logic.

use iced::widget::text_editor::{self, Action, Motion};
use iced::Task;
use tracing::{debug, info, warn};

use super::messages::Message;
use super::state::{self, ImagePrompt};
use crate::autosave::Autosave;
use crate::config::{Config, ThemeMode};
use crate::engine::{Command, DocumentController, EngineEvent, MemoryDocument, Selection};
use crate::floating::FloatingToolbar;
use crate::palette::SlashPalette;
use crate::resize::ImageResize;
use crate::toolbar::ToolbarMenu;

/// Main application state
pub struct EditorApp {
    /// Document engine
    pub(crate) document: MemoryDocument,
    /// Text surface mirroring the engine's lines
    pub(crate) content: text_editor::Content,
    /// Slash command palette
    pub(crate) palette: SlashPalette,
    /// Floating selection toolbar
    pub(crate) floating: FloatingToolbar,
    /// Image resize modal, when open
    pub(crate) resize: Option<ImageResize>,
    /// Image URL prompt, when open
    pub(crate) image_prompt: Option<ImagePrompt>,
    /// Open toolbar dropdown
    pub(crate) menu: ToolbarMenu,
    /// Save status and word count
    pub(crate) autosave: Autosave,
    /// Status message
    pub(crate) status: String,
    /// Configuration
    pub(crate) config: Config,
}

impl EditorApp {
    /// Create a new EditorApp instance
    pub fn new() -> (Self, Task<Message>) {
        let config = Config::load().unwrap_or_default();
        (Self::with_config(config), Task::none())
    }

    pub fn with_config(config: Config) -> Self {
        let document = MemoryDocument::from_text(&config.initial_content);
        let content = text_editor::Content::with_text(&document.source_text());
        let mut autosave = Autosave::new(config.autosave_idle_ms, config.autosave_saving_ms);
        autosave.recount(&document.text());

        info!("🚀 RichEdit initialized ({} blocks)", document.block_count());

        Self {
            document,
            content,
            palette: SlashPalette::new(),
            floating: FloatingToolbar::new(config.floating_toolbar_offset),
            resize: None,
            image_prompt: None,
            menu: ToolbarMenu::None,
            autosave,
            status: "Ready".to_string(),
            config,
        }
    }

    /// Application title
    pub fn title(&self) -> String {
        "RichEdit".to_string()
    }

    /// Application theme
    pub fn theme(&self) -> iced::Theme {
        match self.config.theme {
            ThemeMode::Dark => iced::Theme::Dark,
            ThemeMode::Light => iced::Theme::Light,
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.config.gui_scaling
    }

    pub(crate) fn toggle_theme(&mut self) {
        self.config.theme = self.config.theme.toggled();
        info!("🎨 Theme switched to {:?}", self.config.theme);
        if let Err(e) = self.config.save() {
            warn!("⚠️ Could not persist theme: {}", e);
        }
    }

    /// Push the surface selection into the engine
    pub(crate) fn sync_selection(&mut self) {
        let (anchor, head) = state::surface_selection(&self.content);
        let selection = Selection::new(anchor, head);
        if selection != self.document.selection() {
            if let Err(e) = self.document.run(&[Command::SetSelection(selection)]) {
                debug!("Selection sync refused: {}", e);
            }
        }
    }

    /// Rebuild the surface from the engine when the two have drifted apart,
    /// then restore the engine's selection on it
    pub(crate) fn resync_surface(&mut self) {
        let source = self.document.source_text();
        let selection = self.document.selection();
        if state::surface_text(&self.content) == source
            && state::surface_selection(&self.content) == (selection.anchor, selection.head)
        {
            return;
        }

        self.content = text_editor::Content::with_text(&source);
        self.content.perform(Action::Move(Motion::DocumentStart));
        for _ in 0..selection.anchor {
            self.content.perform(Action::Move(Motion::Right));
        }
        if selection.head > selection.anchor {
            for _ in selection.anchor..selection.head {
                self.content.perform(Action::Select(Motion::Right));
            }
        } else {
            for _ in selection.head..selection.anchor {
                self.content.perform(Action::Select(Motion::Left));
            }
        }
    }

    /// Drain engine notifications into the overlays and the save status
    pub(crate) fn process_events(&mut self) -> Task<Message> {
        let mut task = Task::none();
        for event in self.document.take_events() {
            match event {
                EngineEvent::ContentChanged => {
                    let tick = self.autosave.content_changed(&self.document.text());
                    task = Task::perform(tick.wait(), Message::AutosaveTick);
                }
                EngineEvent::SelectionChanged { anchor, head, .. } => {
                    self.floating
                        .on_selection(&self.document, Selection::new(anchor, head));
                }
            }
        }
        task
    }

    pub(crate) fn after_engine_change(&mut self) -> Task<Message> {
        self.resync_surface();
        self.process_events()
    }
}
