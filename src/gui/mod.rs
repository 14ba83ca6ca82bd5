//! GUI module using iced
//!
//! The editor window: toolbar, text surface with its overlays, a rendered
//! preview and the status footer.

use iced::event::{self, Event};
use iced::keyboard::{self, key, Key};
use iced::widget::text_editor::{Action, Edit, Motion};
use iced::widget::{column, text_input};
use iced::{Element, Length, Subscription, Task};
use tracing::{debug, warn};

use crate::engine::{Command, DocumentController};
use crate::export;
use crate::images;
use crate::palette::{self, PaletteKey, PaletteOutcome, SlashAction};
use crate::resize::ImageResize;
use crate::toolbar::{self, ToolbarAction, ToolbarMenu};

// Sub-modules
pub mod app;
pub mod messages;
pub mod panels;
pub mod state;

// Re-exports for convenience
pub use app::EditorApp;
pub use messages::Message;

impl EditorApp {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::None => {}
            Message::Edit(action) => return self.handle_edit(action),
            Message::ImageClicked(pos) => self.open_resize(pos),

            // Toolbar
            Message::Toolbar(action) => {
                self.menu = ToolbarMenu::None;
                if action == ToolbarAction::UploadImage {
                    return Task::perform(images::pick_and_load(), Message::ImagePicked);
                }
                toolbar::dispatch(&mut self.document, &action);
                return self.after_engine_change();
            }
            Message::ToggleMenu(menu) => {
                self.menu = if self.menu == menu {
                    ToolbarMenu::None
                } else {
                    menu
                };
            }
            Message::ImagePicked(picked) => match picked {
                None => debug!("Image picker dismissed"),
                Some(Ok(uri)) => {
                    palette::insert_image_url(&mut self.document, &uri);
                    return self.after_engine_change();
                }
                Some(Err(e)) => {
                    warn!("⚠️ Image upload failed: {}", e);
                    self.status = format!("Image upload failed: {}", e);
                }
            },

            // Floating toolbar
            Message::Floating(action) => {
                self.floating.apply(&mut self.document, action);
                return self.after_engine_change();
            }

            // Slash palette
            Message::PaletteKey(key) => return self.handle_palette_key(key),
            Message::PaletteQuery(query) => self.palette.set_query(&query),
            Message::PaletteChoose(index) => {
                if let Some(action) = self.palette.choose(index) {
                    return self.finish_palette(Some(action));
                }
            }
            Message::Escape => {
                if self.resize.take().is_some() {
                    debug!("Resize cancelled");
                } else if self.image_prompt.take().is_some() {
                    debug!("Image prompt cancelled");
                } else if self.palette.is_open() {
                    return self.handle_palette_key(PaletteKey::Escape);
                } else {
                    self.menu = ToolbarMenu::None;
                }
            }

            // Image URL prompt
            Message::ImageUrlChanged(url) => {
                if let Some(prompt) = &mut self.image_prompt {
                    prompt.url = url;
                }
            }
            Message::ImageUrlSubmit => {
                if let Some(prompt) = self.image_prompt.take() {
                    palette::insert_image_url(&mut self.document, &prompt.url);
                    return self.after_engine_change();
                }
            }
            Message::ImageUrlCancel => self.image_prompt = None,

            // Resize modal
            Message::ResizeWidth(width) => self.with_resize(|m| m.set_width(width)),
            Message::ResizeHeight(height) => self.with_resize(|m| m.set_height(height)),
            Message::ResizeWidthText(value) => self.with_resize(|m| m.set_width_text(&value)),
            Message::ResizeHeightText(value) => self.with_resize(|m| m.set_height_text(&value)),
            Message::ResizeLock(lock) => self.with_resize(|m| m.set_lock_aspect(lock)),
            Message::ResizePreset(preset) => self.with_resize(|m| m.apply_preset(preset)),
            Message::ResizeReset => self.with_resize(ImageResize::reset),
            Message::ResizeApply => {
                if let Some(modal) = self.resize.take() {
                    modal.apply(&mut self.document);
                    return self.after_engine_change();
                }
            }
            Message::ResizeCancel => self.resize = None,

            // Autosave
            Message::AutosaveTick(tick) => {
                if let Some(next) = self.autosave.advance(tick) {
                    return Task::perform(next.wait(), Message::AutosaveTick);
                }
            }

            // Footer / header
            Message::ExportHtml => {
                let result = export::write_html(&self.document, &self.config.export_path());
                self.report_export(result);
            }
            Message::ExportJson => {
                let result = export::write_json(&self.document, &self.config.export_path());
                self.report_export(result);
            }
            Message::ToggleTheme => self.toggle_theme(),
        }

        Task::none()
    }

    fn handle_edit(&mut self, action: Action) -> Task<Message> {
        // The palette takes over navigation keys while it is open
        if self.palette.is_open() {
            let key = match &action {
                Action::Move(Motion::Up) => Some(PaletteKey::Up),
                Action::Move(Motion::Down) => Some(PaletteKey::Down),
                Action::Edit(Edit::Enter) => Some(PaletteKey::Enter),
                _ => None,
            };
            if let Some(key) = key {
                return self.handle_palette_key(key);
            }
        }

        match action {
            Action::Edit(edit) => {
                self.sync_selection();
                let opens_palette = matches!(edit, Edit::Insert('/')) && !self.palette.is_open();
                let caret = self
                    .document
                    .coords_at_pos(self.document.selection().from());

                let command = match &edit {
                    Edit::Insert(c) => Command::InsertText(c.to_string()),
                    Edit::Paste(pasted) => Command::InsertText(pasted.to_string()),
                    Edit::Enter => Command::SplitBlock,
                    Edit::Backspace => Command::DeleteBackward,
                    Edit::Delete => Command::DeleteForward,
                };
                if let Err(e) = self.document.run(&[command]) {
                    debug!("Edit refused: {}", e);
                    return Task::none();
                }
                self.content.perform(Action::Edit(edit));

                let changed = self.after_engine_change();
                if opens_palette && self.palette.open(caret, self.config.palette_caret_gap) {
                    return Task::batch([changed, text_input::focus(panels::palette::search_id())]);
                }
                changed
            }
            other => {
                let clicked = matches!(other, Action::Click(_));
                self.content.perform(other);
                self.sync_selection();
                if clicked {
                    self.open_resize(self.document.selection().head);
                }
                self.process_events()
            }
        }
    }

    fn handle_palette_key(&mut self, key: PaletteKey) -> Task<Message> {
        match self.palette.handle_key(key) {
            PaletteOutcome::Run(action) => self.finish_palette(Some(action)),
            PaletteOutcome::Closed => self.finish_palette(None),
            PaletteOutcome::Moved(index) => {
                debug!("Palette highlight -> {}", index);
                Task::none()
            }
            PaletteOutcome::Ignored => Task::none(),
        }
    }

    /// Run the chosen action, then drop the trigger slash
    fn finish_palette(&mut self, action: Option<SlashAction>) -> Task<Message> {
        match action {
            Some(SlashAction::PromptImage) => {
                self.image_prompt = Some(state::ImagePrompt::default());
            }
            Some(action) => {
                palette::run_action(&mut self.document, action);
            }
            None => {}
        }
        palette::remove_trigger_slash(&mut self.document);

        let changed = self.after_engine_change();
        if self.image_prompt.is_some() {
            return Task::batch([changed, text_input::focus(panels::image_prompt::url_id())]);
        }
        changed
    }

    /// Open the resize modal when `pos` is inside an image node
    fn open_resize(&mut self, pos: usize) {
        if let Some(node) = self.document.node_at(pos) {
            if let Some(attrs) = node.image {
                self.resize = Some(ImageResize::open(node.pos, &attrs));
            }
        }
    }

    fn with_resize(&mut self, f: impl FnOnce(&mut ImageResize)) {
        if let Some(modal) = &mut self.resize {
            f(modal);
        }
    }

    fn report_export(&mut self, result: crate::error::EditorResult<std::path::PathBuf>) {
        match result {
            Ok(path) => {
                self.status = format!(
                    "Exported {} at {}",
                    path.display(),
                    chrono::Local::now().format("%H:%M:%S")
                );
            }
            Err(e) => {
                warn!("⚠️ Export failed: {}", e);
                self.status = format!("Export failed: {}", e);
            }
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        // Listen to captured events too: the focused palette search box eats Escape
        event::listen_with(|event, status, _window| match event {
            Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => key_message(key, status),
            _ => None,
        })
    }

    pub fn view(&self) -> Element<'_, Message> {
        let page = column![
            panels::header::view(self),
            panels::toolbar::view(self),
            panels::editor::view(self),
            panels::footer::view(self),
        ]
        .spacing(10)
        .padding(20)
        .height(Length::Fill);

        if let Some(modal) = &self.resize {
            return panels::modal(page, panels::resize::view(modal), Message::ResizeCancel);
        }
        if let Some(prompt) = &self.image_prompt {
            return panels::modal(
                page,
                panels::image_prompt::view(prompt),
                Message::ImageUrlCancel,
            );
        }
        page.into()
    }
}

/// Maps a key press to an app message. Arrows only count when no widget
/// used them, so caret movement in the editor is not doubled.
fn key_message(pressed: Key, status: event::Status) -> Option<Message> {
    match (pressed.as_ref(), status) {
        (Key::Named(key::Named::Escape), _) => Some(Message::Escape),
        (Key::Named(key::Named::ArrowUp), event::Status::Ignored) => {
            Some(Message::PaletteKey(PaletteKey::Up))
        }
        (Key::Named(key::Named::ArrowDown), event::Status::Ignored) => {
            Some(Message::PaletteKey(PaletteKey::Down))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autosave::SaveStatus;
    use crate::config::Config;
    use crate::engine::Selection;

    fn app(text: &str) -> EditorApp {
        let config = Config {
            initial_content: text.to_string(),
            ..Config::default()
        };
        EditorApp::with_config(config)
    }

    #[test]
    fn test_typing_keeps_surface_and_engine_in_step() {
        let mut app = app("ab");
        let _ = app.update(Message::Edit(Action::Move(Motion::DocumentEnd)));
        let _ = app.update(Message::Edit(Action::Edit(Edit::Insert('c'))));
        let _ = app.update(Message::Edit(Action::Edit(Edit::Enter)));
        let _ = app.update(Message::Edit(Action::Edit(Edit::Insert('d'))));
        assert_eq!(app.document.source_text(), "abc\nd");
        assert_eq!(state::surface_text(&app.content), "abc\nd");
        assert_eq!(app.autosave.status(), SaveStatus::Unsaved);
    }

    #[test]
    fn test_slash_opens_palette_and_escape_removes_it() {
        let mut app = app("x");
        let _ = app.update(Message::Edit(Action::Move(Motion::DocumentEnd)));
        let _ = app.update(Message::Edit(Action::Edit(Edit::Insert('/'))));
        assert!(app.palette.is_open());
        assert_eq!(app.document.source_text(), "x/");

        let _ = app.update(Message::Escape);
        assert!(!app.palette.is_open());
        assert_eq!(app.document.source_text(), "x");
        assert_eq!(state::surface_text(&app.content), "x");
    }

    #[test]
    fn test_escape_reaches_app_when_search_box_has_focus() {
        let escape = Key::Named(key::Named::Escape);
        assert!(matches!(
            key_message(escape.clone(), event::Status::Captured),
            Some(Message::Escape)
        ));
        assert!(matches!(
            key_message(escape, event::Status::Ignored),
            Some(Message::Escape)
        ));
    }

    #[test]
    fn test_arrows_go_to_palette_only_when_unused() {
        let down = Key::Named(key::Named::ArrowDown);
        assert!(matches!(
            key_message(down.clone(), event::Status::Ignored),
            Some(Message::PaletteKey(PaletteKey::Down))
        ));
        assert!(key_message(down, event::Status::Captured).is_none());
        assert!(key_message(Key::Character("a".into()), event::Status::Ignored).is_none());
    }

    #[test]
    fn test_palette_divider_inserts_rule() {
        let mut app = app("");
        let _ = app.update(Message::Edit(Action::Edit(Edit::Insert('/'))));
        let _ = app.update(Message::PaletteQuery("divider".into()));
        let _ = app.update(Message::PaletteKey(PaletteKey::Enter));
        assert!(!app.palette.is_open());
        assert!(app.document.html().contains("<hr>"));
    }

    #[test]
    fn test_toolbar_bold_over_selection() {
        let mut app = app("hello");
        app.document
            .run(&[Command::SetSelection(Selection::new(0, 5))])
            .unwrap();
        let _ = app.update(Message::Toolbar(ToolbarAction::Mark(
            crate::engine::MarkType::Bold,
        )));
        assert_eq!(app.document.html(), "<p><strong>hello</strong></p>");
        assert_eq!(state::surface_selection(&app.content), (0, 5));
        assert!(app.floating.is_visible());
    }

    #[test]
    fn test_resize_flow_through_messages() {
        let mut app = app("");
        app.document
            .run(&[Command::SetImage {
                src: "a.png".into(),
            }])
            .unwrap();
        let _ = app.update(Message::ImageClicked(0));
        assert!(app.resize.is_some());
        let _ = app.update(Message::ResizeLock(false));
        let _ = app.update(Message::ResizeWidthText("120".into()));
        let _ = app.update(Message::ResizeApply);
        assert!(app.resize.is_none());
        assert!(app.document.html().contains("width=\"120\" height=\"200\""));
    }
}
