//! RichEdit Launcher - GUI Application
//!
//! Run with: cargo run --bin richedit-launcher

use iced::application;

// Import from the library
use richedit::config::Config;
use richedit::gui::EditorApp;

fn main() -> anyhow::Result<()> {
    // Setup logging
    let level = Config::load()
        .map(|config| config.tracing_level())
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    application(EditorApp::title, EditorApp::update, EditorApp::view)
        .theme(EditorApp::theme)
        .subscription(EditorApp::subscription)
        .scale_factor(EditorApp::scale_factor)
        .run_with(EditorApp::new)?;
    Ok(())
}
