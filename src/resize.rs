//! Image Resize Modal
//!
//! Working state for resizing one image node. Nothing reaches the document
//! until `apply`; `cancel` simply drops the state.

use tracing::{debug, info};

use crate::engine::{Command, CommandChain, DocumentController, ImageAttrs};

pub const DEFAULT_WIDTH: u32 = 300;
pub const DEFAULT_HEIGHT: u32 = 200;

/// Slider bounds: (min, max, step)
pub const WIDTH_RANGE: (u32, u32, u32) = (50, 800, 10);
pub const HEIGHT_RANGE: (u32, u32, u32) = (50, 600, 10);

/// Size presets relative to the dimensions captured on open
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizePreset {
    Original,
    Large,
    Medium,
}

impl SizePreset {
    pub const ALL: [SizePreset; 3] = [SizePreset::Original, SizePreset::Large, SizePreset::Medium];

    pub fn scale(&self) -> f64 {
        match self {
            SizePreset::Original => 1.0,
            SizePreset::Large => 0.75,
            SizePreset::Medium => 0.5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizePreset::Original => "Original",
            SizePreset::Large => "Large",
            SizePreset::Medium => "Medium",
        }
    }
}

/// Modal state for the image being resized
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResize {
    /// Document position of the image node
    pos: usize,
    width: u32,
    height: u32,
    aspect_ratio: f64,
    lock_aspect: bool,
    original_width: u32,
    original_height: u32,
}

impl ImageResize {
    /// Seed from the node's attributes; missing or zero sizes fall back to 300x200
    pub fn open(pos: usize, attrs: &ImageAttrs) -> Self {
        let width = attrs.width.filter(|w| *w > 0).unwrap_or(DEFAULT_WIDTH);
        let height = attrs.height.filter(|h| *h > 0).unwrap_or(DEFAULT_HEIGHT);
        info!("🖼️ Resizing image at {} ({}x{})", pos, width, height);
        Self {
            pos,
            width,
            height,
            aspect_ratio: width as f64 / height as f64,
            lock_aspect: true,
            original_width: width,
            original_height: height,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn original(&self) -> (u32, u32) {
        (self.original_width, self.original_height)
    }

    pub fn lock_aspect(&self) -> bool {
        self.lock_aspect
    }

    pub fn set_lock_aspect(&mut self, lock: bool) {
        self.lock_aspect = lock;
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
        if self.lock_aspect {
            self.height = (width as f64 / self.aspect_ratio).round() as u32;
        }
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
        if self.lock_aspect {
            self.width = (height as f64 * self.aspect_ratio).round() as u32;
        }
    }

    /// Typed width; anything unparsable counts as 0
    pub fn set_width_text(&mut self, text: &str) {
        self.set_width(parse_dimension(text));
    }

    pub fn set_height_text(&mut self, text: &str) {
        self.set_height(parse_dimension(text));
    }

    /// Scale the captured dimensions, ignoring any edits since opening
    pub fn apply_preset(&mut self, preset: SizePreset) {
        self.width = (self.original_width as f64 * preset.scale()).round() as u32;
        self.height = (self.original_height as f64 * preset.scale()).round() as u32;
        debug!("Preset {:?}: {}x{}", preset, self.width, self.height);
    }

    pub fn reset(&mut self) {
        self.width = self.original_width;
        self.height = self.original_height;
    }

    /// Select the node and write the new size in one chain
    pub fn apply<D: DocumentController + ?Sized>(self, doc: &mut D) -> bool {
        info!("🖼️ Image at {} resized to {}x{}", self.pos, self.width, self.height);
        CommandChain::new(doc)
            .then(Command::SetNodeSelection(self.pos))
            .then(Command::UpdateImageAttributes {
                width: self.width,
                height: self.height,
            })
            .run()
    }
}

fn parse_dimension(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MemoryDocument, Selection};

    fn attrs(width: Option<u32>, height: Option<u32>) -> ImageAttrs {
        ImageAttrs {
            src: "data:image/png;base64,AA==".into(),
            width,
            height,
        }
    }

    #[test]
    fn test_open_defaults_missing_or_zero() {
        let modal = ImageResize::open(0, &attrs(None, Some(0)));
        assert_eq!((modal.width(), modal.height()), (300, 200));
        assert!((modal.aspect_ratio() - 1.5).abs() < f64::EPSILON);

        let modal = ImageResize::open(0, &attrs(Some(640), Some(480)));
        assert_eq!(modal.original(), (640, 480));
    }

    #[test]
    fn test_lock_off_changes_one_side() {
        let mut modal = ImageResize::open(0, &attrs(Some(400), Some(200)));
        modal.set_lock_aspect(false);
        modal.set_width(250);
        assert_eq!((modal.width(), modal.height()), (250, 200));
    }

    #[test]
    fn test_lock_on_keeps_ratio() {
        let mut modal = ImageResize::open(0, &attrs(Some(300), Some(200)));
        modal.set_width(451);
        assert_eq!(modal.height(), 301);
        modal.set_height(100);
        assert_eq!(modal.width(), 150);
    }

    #[test]
    fn test_presets_scale_originals() {
        let mut modal = ImageResize::open(0, &attrs(Some(301), Some(201)));
        modal.set_width(700);
        modal.apply_preset(SizePreset::Medium);
        assert_eq!((modal.width(), modal.height()), (151, 101));
        modal.apply_preset(SizePreset::Large);
        assert_eq!((modal.width(), modal.height()), (226, 151));
        modal.set_height(60);
        modal.apply_preset(SizePreset::Original);
        assert_eq!((modal.width(), modal.height()), (301, 201));
    }

    #[test]
    fn test_unparsable_text_is_zero() {
        let mut modal = ImageResize::open(0, &attrs(None, None));
        modal.set_lock_aspect(false);
        modal.set_width_text("wide");
        assert_eq!(modal.width(), 0);
        modal.set_height_text(" 120 ");
        assert_eq!(modal.height(), 120);
    }

    #[test]
    fn test_reset_restores_originals() {
        let mut modal = ImageResize::open(0, &attrs(Some(500), Some(250)));
        modal.set_width(100);
        modal.reset();
        assert_eq!((modal.width(), modal.height()), (500, 250));
    }

    #[test]
    fn test_apply_updates_node() {
        let mut doc = MemoryDocument::from_text("x");
        doc.run(&[
            Command::SetSelection(Selection::cursor(1)),
            Command::SetImage {
                src: "a.png".into(),
            },
        ])
        .unwrap();
        let pos = doc.pos_at(1, 0);
        let info = doc.node_at(pos).unwrap();
        let mut modal = ImageResize::open(info.pos, &info.image.unwrap());
        modal.apply_preset(SizePreset::Medium);
        assert!(modal.apply(&mut doc));
        assert!(doc.html().contains("width=\"150\" height=\"100\""));
    }
}
