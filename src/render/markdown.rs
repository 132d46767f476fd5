use lazy_static::lazy_static;
use regex::{ Captures, Regex };

use super::citation::{ format_references, split_citations, SearchUrls };
use super::{ escape_html, CodeBlock, RenderedMessage };

const FENCE: &str = "```";
const DEFAULT_LANGUAGE: &str = "python";
const PARAGRAPH_BREAK: &str = "</p><p class=\"mb-3\">";

// Marks extracted code inside the working text. Stripped from input up front.
const SLOT: char = '\u{1A}';

lazy_static! {
    static ref INLINE_CODE: Regex = Regex::new(r"`([^`\n]+)`").unwrap();
    static ref H3: Regex = Regex::new(r"(?m)^### (.*)$").unwrap();
    static ref H2: Regex = Regex::new(r"(?m)^## (.*)$").unwrap();
    static ref H1: Regex = Regex::new(r"(?m)^# (.*)$").unwrap();
    static ref BOLD: Regex = Regex::new(r"\*\*([^*\n]+)\*\*").unwrap();
    static ref ITALIC: Regex = Regex::new(r"\*([^*\n]+)\*").unwrap();
    static ref BULLET_ITEM: Regex = Regex::new(r"(?m)^- (.*)$").unwrap();
    static ref NUMBERED_ITEM: Regex = Regex::new(r"(?m)^\d+\. (.*)$").unwrap();
    static ref SLOT_REF: Regex = Regex::new("\u{1A}([FI])(\\d+)\u{1A}").unwrap();
}

/// Renders an AI response into an HTML fragment.
///
/// Fenced code is pulled out before anything else and everything that reaches
/// the output is escaped, so the fragment never carries markup from the input.
/// A trailing citation block becomes a linked reference list for `tool_name`.
pub fn render_markdown(text: &str, tool_name: &str, search: &SearchUrls) -> RenderedMessage {
    let normalized: String = text.replace("\r\n", "\n").chars().filter(|c| *c != SLOT).collect();
    let (body, citations) = split_citations(&normalized);

    let (working, code_blocks) = extract_fences(body);
    let escaped = escape_html(&working);

    let mut inline_code: Vec<String> = Vec::new();
    let text = INLINE_CODE.replace_all(&escaped, |caps: &Captures| {
        inline_code.push(caps[1].to_string());
        slot('I', inline_code.len() - 1)
    });

    let text = H3.replace_all(&text, "<h3 class=\"text-lg font-bold mt-4 mb-2\">$1</h3>");
    let text = H2.replace_all(&text, "<h2 class=\"text-xl font-bold mt-6 mb-2\">$1</h2>");
    let text = H1.replace_all(&text, "<h1 class=\"text-2xl font-bold mt-6 mb-3\">$1</h1>");
    let text = BOLD.replace_all(&text, "<strong>$1</strong>");
    let text = ITALIC.replace_all(&text, "<em>$1</em>");
    let text = BULLET_ITEM.replace_all(&text, "<li class=\"ml-4 list-disc\">$1</li>");
    let text = NUMBERED_ITEM.replace_all(&text, "<li class=\"ml-4 list-decimal\">$1</li>");
    let text = text.replace("\n\n", PARAGRAPH_BREAK);

    let text = SLOT_REF.replace_all(&text, |caps: &Captures| {
        let index: usize = caps[2].parse().unwrap_or(usize::MAX);
        match &caps[1] {
            "F" => code_blocks
                .get(index)
                .map(|block| code_block_html(block, index))
                .unwrap_or_default(),
            _ => inline_code
                .get(index)
                .map(|code| {
                    format!("<code class=\"bg-gray-100 px-1 py-0.5 rounded text-pink-600\">{}</code>", code)
                })
                .unwrap_or_default(),
        }
    });

    let references = citations
        .map(|tail| format_references(tail, tool_name, search))
        .unwrap_or_default();

    RenderedMessage {
        html: format!(
            "<div class=\"prose max-w-none text-gray-800\"><p class=\"mb-3\">{}{}</p></div>",
            text,
            references
        ),
        code_blocks,
    }
}

fn slot(kind: char, index: usize) -> String {
    format!("{}{}{}{}", SLOT, kind, index, SLOT)
}

fn fence_language(info: &str) -> String {
    let lang: String = info
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '#' | '.' | '-'))
        .collect();
    if lang.is_empty() { DEFAULT_LANGUAGE.to_string() } else { lang }
}

/// Replaces each fenced block with a slot line and returns the blocks in order.
///
/// A fence opens on a line starting with three backticks whose info string has
/// no further backticks, and closes on a line that is exactly three backticks.
/// An unclosed fence runs to the end of the input.
fn extract_fences(body: &str) -> (String, Vec<CodeBlock>) {
    let mut lines: Vec<String> = Vec::new();
    let mut blocks: Vec<CodeBlock> = Vec::new();
    let mut open: Option<(String, Vec<&str>)> = None;

    for line in body.split('\n') {
        if let Some((language, mut code)) = open.take() {
            if line.trim() == FENCE {
                lines.push(slot('F', blocks.len()));
                blocks.push(CodeBlock { language, code: code.join("\n").trim().to_string() });
            } else {
                code.push(line);
                open = Some((language, code));
            }
            continue;
        }

        match line.trim_start().strip_prefix(FENCE) {
            Some(info) if !info.contains('`') => {
                open = Some((fence_language(info), Vec::new()));
            }
            _ => lines.push(line.to_string()),
        }
    }

    if let Some((language, code)) = open {
        lines.push(slot('F', blocks.len()));
        blocks.push(CodeBlock { language, code: code.join("\n").trim().to_string() });
    }

    (lines.join("\n"), blocks)
}

fn code_block_html(block: &CodeBlock, index: usize) -> String {
    format!(
        "<pre class=\"bg-gray-900 rounded-md p-4 my-4 overflow-x-auto w-full\" style=\"position: relative\">\
<code class=\"language-{} block text-left\">{}</code>\
<button class=\"absolute top-2 right-2 bg-gray-700 hover:bg-gray-600 text-white rounded-md px-2 py-1 text-xs code-copy-button\" data-code-index=\"{}\">Copy</button>\
</pre>",
        block.language,
        escape_html(&block.code),
        index
    )
}
