//! State types for the RichEdit GUI
//!
//! Small helpers that bridge the text surface and document positions.

use iced::widget::text_editor;

/// Pending "insert image by URL" prompt
#[derive(Debug, Clone, Default)]
pub struct ImagePrompt {
    pub url: String,
}

/// Lines of the text surface, without the trailing newline the widget adds
pub fn surface_lines(content: &text_editor::Content) -> Vec<String> {
    content.lines().map(|line| String::from(&*line)).collect()
}

pub fn surface_text(content: &text_editor::Content) -> String {
    surface_lines(content).join("\n")
}

/// Flat position of the caret (one separator per line break)
pub fn surface_cursor(content: &text_editor::Content) -> usize {
    let lines = surface_lines(content);
    let (line, byte_index) = content.cursor_position();
    let prefix: usize = lines.iter().take(line).map(|l| l.chars().count() + 1).sum();
    prefix + byte_to_char_column(lines.get(line).map(String::as_str).unwrap_or(""), byte_index)
}

/// Anchor and head of the surface selection as flat positions
pub fn surface_selection(content: &text_editor::Content) -> (usize, usize) {
    let head = surface_cursor(content);
    let Some(selected) = content.selection() else {
        return (head, head);
    };
    let len = selected.chars().count();
    let text: Vec<char> = surface_text(content).chars().collect();
    let backward_matches = head >= len && text[head - len..head].iter().copied().eq(selected.chars());
    if backward_matches {
        (head - len, head)
    } else {
        (head + len, head)
    }
}

/// Column of a byte offset, clamped to the line
pub fn byte_to_char_column(line: &str, byte_index: usize) -> usize {
    let mut index = byte_index.min(line.len());
    while !line.is_char_boundary(index) {
        index -= 1;
    }
    line[..index].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_to_char_column() {
        assert_eq!(byte_to_char_column("héllo", 3), 2);
        assert_eq!(byte_to_char_column("abc", 10), 3);
        assert_eq!(byte_to_char_column("é", 1), 0);
    }
}
