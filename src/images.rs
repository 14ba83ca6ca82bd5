//! Image Upload
//!
//! Picked image files are embedded as base64 `data:` URIs, so the document
//! owns its bytes and there is no temporary URL to release later.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{EditorError, EditorResult};

/// Extensions offered by the picker
pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp"];

/// MIME type guessed from the file extension
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => return None,
    };
    Some(mime)
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Read an image file into a `data:` URI
pub fn load_data_uri(path: &Path) -> EditorResult<String> {
    let mime = mime_for_path(path).ok_or_else(|| {
        EditorError::Image(format!("unsupported image type: {}", path.display()))
    })?;
    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Err(EditorError::Image(format!("{} is empty", path.display())));
    }
    info!("🖼️ Embedding {} ({} bytes)", path.display(), bytes.len());
    Ok(data_uri(mime, &bytes))
}

/// Ask the user for an image file. `None` when the dialog was dismissed.
pub async fn pick_image() -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Insert Image")
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

/// Picker plus encoding, for use from a GUI task
pub async fn pick_and_load() -> Option<Result<String, String>> {
    let path = pick_image().await?;
    Some(load_data_uri(&path).map_err(|e| e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_for_path(Path::new("a/b.PNG")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("photo.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("noext")), None);
    }

    #[test]
    fn test_data_uri_encoding() {
        assert_eq!(data_uri("image/gif", b"GIF89a"), "data:image/gif;base64,R0lGODlh");
    }

    #[test]
    fn test_load_data_uri_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dot.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
        let uri = load_data_uri(&path).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_load_rejects_unknown_and_empty() {
        let dir = tempdir().unwrap();
        let text = dir.path().join("a.txt");
        std::fs::write(&text, "hi").unwrap();
        assert!(matches!(load_data_uri(&text), Err(EditorError::Image(_))));

        let empty = dir.path().join("b.png");
        std::fs::write(&empty, b"").unwrap();
        assert!(matches!(load_data_uri(&empty), Err(EditorError::Image(_))));
    }
}
