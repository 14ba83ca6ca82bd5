//! HTML Export Normalization
//!
//! Cleans engine HTML for pasting into mail clients and other HTML sinks.
//! The pipeline is a fixed sequence of rewrites; every step works on the
//! output of the previous one.

use lazy_static::lazy_static;
use regex::Regex;

use crate::engine::DocumentController;

lazy_static! {
    static ref BLANK_LINES: Regex = Regex::new(r"\n\n+").unwrap();
    static ref EMPTY_PARAGRAPH: Regex = Regex::new(r"<p>\s*(?:<br\s*/?>)?\s*</p>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref BETWEEN_TAGS: Regex = Regex::new(r">\s+<").unwrap();
    static ref LIST_ITEMS: Regex = Regex::new(r"</li>\s*<li>").unwrap();
    static ref TABLE_ROWS: Regex = Regex::new(r"</tr>\s*<tr>").unwrap();
    static ref TABLE_CELLS: Regex = Regex::new(r"</td>\s*<td\b").unwrap();
    static ref TABLE_HEADERS: Regex = Regex::new(r"</th>\s*<th\b").unwrap();
    static ref PARAGRAPHS: Regex = Regex::new(r"</p>\s*<p>").unwrap();
    static ref HEADING_THEN_PARAGRAPH: Regex = Regex::new(r"</h([1-6])>\s*<p>").unwrap();
    static ref PARAGRAPH_THEN_HEADING: Regex = Regex::new(r"</p>\s*<h([1-6])>").unwrap();
    static ref QUOTE_THEN_PARAGRAPH: Regex = Regex::new(r"</blockquote>\s*<p>").unwrap();
    static ref PARAGRAPH_THEN_QUOTE: Regex = Regex::new(r"</p>\s*<blockquote>").unwrap();
}

/// Prefixes that count as already block-wrapped content
const BLOCK_PREFIXES: [&str; 5] = ["<p>", "<h", "<ul", "<ol", "<blockquote"];

/// Which optional passes to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub preserve_line_breaks: bool,
    pub add_paragraph_tags: bool,
    pub clean_empty_paragraphs: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            preserve_line_breaks: true,
            add_paragraph_tags: true,
            clean_empty_paragraphs: true,
        }
    }
}

impl ExportOptions {
    /// Every pass on
    pub fn email() -> Self {
        Self::default()
    }

    /// Only empty-paragraph cleanup
    pub fn minimal() -> Self {
        Self {
            preserve_line_breaks: false,
            add_paragraph_tags: false,
            clean_empty_paragraphs: true,
        }
    }
}

/// Normalize raw editor HTML
pub fn normalize_html(raw: &str, options: &ExportOptions) -> String {
    let mut html = raw.to_string();

    if options.preserve_line_breaks {
        html = break_bare_newlines(&html);
        html = BLANK_LINES.replace_all(&html, "</p><p>").into_owned();
    }

    if options.add_paragraph_tags {
        html = wrap_paragraph(html);
    }

    if options.clean_empty_paragraphs {
        // Blank paragraphs, including a lone `<br>`
        html = EMPTY_PARAGRAPH.replace_all(&html, "").into_owned();

        // Cleanup can strip the leading paragraph and leave bare text behind
        if options.add_paragraph_tags && !html.trim().is_empty() {
            html = wrap_paragraph(html);
        }
    }

    html = WHITESPACE.replace_all(&html, " ").into_owned();
    html = BETWEEN_TAGS.replace_all(&html, "><").into_owned();

    // Lists
    html = LIST_ITEMS.replace_all(&html, "</li>\n<li>").into_owned();
    html = html.replace("<ul>", "<ul>\n").replace("</ul>", "\n</ul>");
    html = html.replace("<ol>", "<ol>\n").replace("</ol>", "\n</ol>");

    // Tables
    html = TABLE_ROWS.replace_all(&html, "</tr>\n<tr>").into_owned();
    html = TABLE_CELLS.replace_all(&html, "</td>\n<td").into_owned();
    html = TABLE_HEADERS.replace_all(&html, "</th>\n<th").into_owned();

    // Blocks
    html = PARAGRAPHS.replace_all(&html, "</p>\n<p>").into_owned();
    html = HEADING_THEN_PARAGRAPH
        .replace_all(&html, "</h$1>\n<p>")
        .into_owned();
    html = PARAGRAPH_THEN_HEADING
        .replace_all(&html, "</p>\n<h$1>")
        .into_owned();
    html = QUOTE_THEN_PARAGRAPH
        .replace_all(&html, "</blockquote>\n<p>")
        .into_owned();
    html = PARAGRAPH_THEN_QUOTE
        .replace_all(&html, "</p>\n<blockquote>")
        .into_owned();

    html.trim().to_string()
}

/// Email preset over the engine's current HTML
pub fn export_email_html(doc: &dyn DocumentController) -> String {
    normalize_html(&doc.html(), &ExportOptions::email())
}

/// Minimal preset over the engine's current HTML
pub fn export_plain_html(doc: &dyn DocumentController) -> String {
    normalize_html(&doc.html(), &ExportOptions::minimal())
}

/// `\n` becomes `<br>` unless only whitespace separates it from the next tag
fn break_bare_newlines(html: &str) -> String {
    let chars: Vec<char> = html.chars().collect();
    let mut out = String::with_capacity(html.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '\n' {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if next != Some(&'<') {
                out.push_str("<br>");
                continue;
            }
        }
        out.push(ch);
    }
    out
}

fn wrap_paragraph(html: String) -> String {
    let start = html.trim_start();
    if BLOCK_PREFIXES.iter().any(|prefix| start.starts_with(prefix)) {
        html
    } else {
        format!("<p>{}</p>", html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(raw: &str) -> String {
        normalize_html(raw, &ExportOptions::email())
    }

    #[test]
    fn test_plain_text_is_wrapped() {
        assert_eq!(email("hello"), "<p>hello</p>");
    }

    #[test]
    fn test_block_content_not_double_wrapped() {
        for raw in [
            "<p>a</p>",
            "<h2>a</h2>",
            "<ul><li><p>a</p></li></ul>",
            "<ol><li><p>a</p></li></ol>",
            "<blockquote><p>a</p></blockquote>",
        ] {
            let out = email(raw);
            assert!(!out.starts_with("<p><p>"), "{} -> {}", raw, out);
            assert!(!out.starts_with("<p><h"), "{} -> {}", raw, out);
            assert!(!out.starts_with("<p><ul"), "{} -> {}", raw, out);
        }
    }

    #[test]
    fn test_empty_paragraphs_removed() {
        for raw in ["<p></p>", "<p> </p>", "<p><br></p>"] {
            let out = email(raw);
            assert!(!out.contains("<p>"), "{} -> {:?}", raw, out);
            assert!(!out.contains("</p>"), "{} -> {:?}", raw, out);
        }
    }

    #[test]
    fn test_bare_newline_becomes_break() {
        assert_eq!(email("<p>a\nb</p>"), "<p>a<br>b</p>");
    }

    #[test]
    fn test_newline_before_tag_is_kept_out() {
        assert_eq!(email("<p>a</p>\n<p>b</p>"), "<p>a</p>\n<p>b</p>");
    }

    #[test]
    fn test_double_newline_before_tag_splits_paragraphs() {
        assert_eq!(
            normalize_html("<p>a\n\n<b>b</b></p>", &ExportOptions::email()),
            "<p>a</p>\n<p><b>b</b></p>"
        );
    }

    #[test]
    fn test_line_breaks_between_blocks() {
        let out = email("<h1>Title</h1><p>a</p><ul><li><p>x</p></li><li><p>y</p></li></ul>");
        assert_eq!(
            out,
            "<h1>Title</h1>\n<p>a</p><ul>\n<li><p>x</p></li>\n<li><p>y</p></li>\n</ul>"
        );
    }

    #[test]
    fn test_table_rows_and_cells_break() {
        let out = email(
            "<table><tbody><tr><th colspan=\"1\"><p>a</p></th><th colspan=\"1\"><p>b</p></th></tr>\
             <tr><td><p>c</p></td><td><p>d</p></td></tr></tbody></table>",
        );
        assert!(out.contains("</th>\n<th colspan"));
        assert!(out.contains("</tr>\n<tr>"));
        assert!(out.contains("</td>\n<td>"));
    }

    #[test]
    fn test_blockquote_paragraph_breaks() {
        assert_eq!(
            email("<p>a</p><blockquote><p>q</p></blockquote><p>b</p>"),
            "<p>a</p>\n<blockquote><p>q</p></blockquote>\n<p>b</p>"
        );
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(email("<p>a    b</p>   <p>c</p>"), "<p>a b</p>\n<p>c</p>");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in [
            "hello\nworld",
            "<p>a</p><p></p><p>b</p>",
            "<h2>T</h2><ul><li><p>1</p></li></ul><blockquote><p>q</p></blockquote>",
            "<p></p>tail",
            "one\n\n<p>two</p>",
            "<p>a</p><p> <br> </p>",
            "<p>a</p><p>\n<br>\n</p>",
            "",
        ] {
            let once = email(raw);
            assert_eq!(email(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_spaced_break_paragraph_removed() {
        assert_eq!(email("<p>a</p><p> <br> </p>"), "<p>a</p>");
        assert_eq!(email("<p>a</p><p><br/></p>"), "<p>a</p>");
    }

    #[test]
    fn test_leading_whitespace_before_block_not_wrapped() {
        assert_eq!(email("\n<p>a</p>"), "<p>a</p>");
        assert_eq!(email("  <h1>t</h1>"), "<h1>t</h1>");
    }

    #[test]
    fn test_minimal_preset_skips_wrapping() {
        let out = normalize_html("a\nb<p></p>", &ExportOptions::minimal());
        assert_eq!(out, "a b");
    }
}
