use std::collections::HashMap;

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use url::Url;

use super::escape_html;
use crate::error::Result;

pub const CITATION_MARKER: &str = "Cited documentation sections:";
const ENTRY_LABEL: &str = "Section:";

const FLASK_SEARCH_URL: &str = "https://flask.palletsprojects.com/en/latest/search/";
const PYTHON_SEARCH_URL: &str = "https://docs.python.org/3/search.html";

lazy_static! {
    // Name is the rest of the line, or the next non-blank line when the entry
    // line is bare. It runs to a pilcrow, a newline, or end of input.
    static ref SECTION_ENTRY: Regex = Regex::new(r"Section:[ \t]*(?:\r?\n[ \t]*)*([^¶\r\n]*)").unwrap();
}

/// Per-tool documentation search endpoints used to link citations.
#[derive(Clone, Debug)]
pub struct SearchUrls {
    default: Url,
    per_tool: HashMap<String, Url>,
}

impl Default for SearchUrls {
    fn default() -> Self {
        let mut per_tool = HashMap::new();
        per_tool.insert(
            "flask".to_string(),
            Url::parse(FLASK_SEARCH_URL).expect("static flask search url")
        );
        Self {
            default: Url::parse(PYTHON_SEARCH_URL).expect("static python search url"),
            per_tool,
        }
    }
}

impl SearchUrls {
    /// Parses `tool=url` pairs separated by commas on top of the defaults.
    pub fn with_overrides(pairs: &str) -> Result<Self> {
        let mut urls = Self::default();
        for pair in pairs.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some((tool, url)) if tool.trim() == "*" => {
                    urls.default = Url::parse(url.trim())?;
                }
                Some((tool, url)) => {
                    urls.per_tool.insert(tool.trim().to_lowercase(), Url::parse(url.trim())?);
                }
                None => warn!("Ignoring malformed citation search override: {}", pair),
            }
        }
        Ok(urls)
    }

    pub fn search_link(&self, tool_name: &str, section: &str) -> String {
        let mut url = self.per_tool
            .get(&tool_name.to_lowercase())
            .unwrap_or(&self.default)
            .clone();
        url.query_pairs_mut().clear().append_pair("q", section);
        url.to_string()
    }
}

/// Splits raw response text at the first citation marker. The body is
/// trimmed only when a marker is present.
pub fn split_citations(text: &str) -> (&str, Option<&str>) {
    match text.find(CITATION_MARKER) {
        Some(idx) => (text[..idx].trim(), Some(&text[idx + CITATION_MARKER.len()..])),
        None => (text, None),
    }
}

pub fn extract_sections(citations: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut at = 0;
    while let Some(caps) = SECTION_ENTRY.captures_at(citations, at) {
        let (Some(entry), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        // A bare entry followed by another entry names nothing; rescan from there.
        if name.as_str().starts_with(ENTRY_LABEL) {
            at = name.start();
            continue;
        }
        at = entry.end();
        let name = name.as_str().trim();
        if !name.is_empty() {
            sections.push(name.to_string());
        }
    }
    sections
}

/// Builds the reference list, or an empty string when there is nothing to cite.
pub fn reference_list(sections: &[String], tool_name: &str, search: &SearchUrls) -> String {
    if sections.is_empty() {
        return String::new();
    }
    let items: String = sections
        .iter()
        .map(|name| {
            format!(
                "<li><a href=\"{}\" target=\"_blank\" class=\"text-blue-600 hover:underline\">{}</a></li>",
                escape_html(&search.search_link(tool_name, name)),
                escape_html(name)
            )
        })
        .collect();
    format!(
        "<div class=\"citation-list\"><h3>References</h3><ul class=\"list-disc\">{}</ul></div>",
        items
    )
}

/// Turns the text after the citation marker into the linked reference list.
pub fn format_references(citations: &str, tool_name: &str, search: &SearchUrls) -> String {
    reference_list(&extract_sections(citations), tool_name, search)
}
