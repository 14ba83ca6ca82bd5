//! RichEdit Library
//!
//! Editor shell around a rich-text document engine: toolbar, floating
//! selection toolbar, slash command palette, image resizing, save status and
//! HTML export normalization.

pub mod autosave;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod floating;
pub mod gui;
pub mod images;
pub mod palette;
pub mod resize;
pub mod toolbar;
