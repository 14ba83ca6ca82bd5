//! Message types for the RichEdit GUI
//!
//! All messages that can be sent to update the application state.

use iced::widget::text_editor;

use crate::autosave::Tick;
use crate::floating::FloatingAction;
use crate::palette::PaletteKey;
use crate::resize::SizePreset;
use crate::toolbar::{ToolbarAction, ToolbarMenu};

/// Messages that drive the application
#[derive(Debug, Clone)]
pub enum Message {
    None,

    // Editor surface
    Edit(text_editor::Action),
    /// Image clicked in the preview, by document position
    ImageClicked(usize),

    // Toolbar
    Toolbar(ToolbarAction),
    ToggleMenu(ToolbarMenu),
    ImagePicked(Option<Result<String, String>>),

    // Floating toolbar
    Floating(FloatingAction),

    // Slash palette
    PaletteKey(PaletteKey),
    PaletteQuery(String),
    PaletteChoose(usize),
    /// Escape pressed anywhere: closes the topmost overlay
    Escape,

    // Image URL prompt
    ImageUrlChanged(String),
    ImageUrlSubmit,
    ImageUrlCancel,

    // Resize modal
    ResizeWidth(u32),
    ResizeHeight(u32),
    ResizeWidthText(String),
    ResizeHeightText(String),
    ResizeLock(bool),
    ResizePreset(SizePreset),
    ResizeReset,
    ResizeApply,
    ResizeCancel,

    // Autosave
    AutosaveTick(Tick),

    // Footer / header
    ExportHtml,
    ExportJson,
    ToggleTheme,
}
