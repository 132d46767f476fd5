pub mod citation;
pub mod markdown;
pub mod templates;

pub use citation::{ format_references, SearchUrls, CITATION_MARKER };
pub use markdown::render_markdown;

/// A fenced code block pulled out of a response, kept unescaped so the copy
/// button can hand the raw code to the clipboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedMessage {
    pub html: String,
    pub code_blocks: Vec<CodeBlock>,
}

impl RenderedMessage {
    pub fn plain(html: String) -> Self {
        Self { html, code_blocks: Vec::new() }
    }
}

pub fn escape_html(unsafe_text: &str) -> String {
    let mut out = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
