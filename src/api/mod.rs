mod http;

pub use http::HttpDocsApi;

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::cli::Args;
use crate::error::Result;
use crate::models::api::CopyPayload;
use crate::models::chat::SharedChat;

/// Which text a copy trigger asks the server for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyKind {
    DocText,
    AiSummary,
}

impl CopyKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            CopyKind::DocText => "copy_doc_text/",
            CopyKind::AiSummary => "copy_ai_summary/",
        }
    }

    /// Link label the page shows for this kind of copy trigger.
    pub fn label(&self) -> &'static str {
        match self {
            CopyKind::DocText => "Copy Documentation text",
            CopyKind::AiSummary => "Copy AI summary docs",
        }
    }

    /// Maps a link's visible text to the copy it triggers.
    pub fn from_label(text: &str) -> Option<Self> {
        [CopyKind::DocText, CopyKind::AiSummary]
            .into_iter()
            .find(|kind| kind.label() == text.trim())
    }
}

impl fmt::Display for CopyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyKind::DocText => write!(f, "doc"),
            CopyKind::AiSummary => write!(f, "ai"),
        }
    }
}

impl FromStr for CopyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "doc" | "text" => Ok(CopyKind::DocText),
            "ai" | "summary" => Ok(CopyKind::AiSummary),
            _ =>
                CopyKind::from_label(s).ok_or_else(||
                    format!("Invalid copy kind: '{}' (expected doc, ai or a copy link label)", s)
                ),
        }
    }
}

/// The documentation site's JSON endpoints.
#[async_trait]
pub trait DocsApi: Send + Sync {
    async fn fetch_copy_content(&self, kind: CopyKind, name: &str) -> Result<CopyPayload>;

    /// Posts a question; a non-2xx reply is `ClientError::Status`.
    async fn ask(&self, question: &str, tool_name: &str) -> Result<String>;

    /// Stores a transcript server-side and returns its id.
    async fn create_shared_chat(&self, chat: &SharedChat) -> Result<String>;

    async fn get_shared_chat(&self, chat_id: &str) -> Result<SharedChat>;
}

pub fn new_client(args: &Args) -> Result<Arc<dyn DocsApi>> {
    let client = HttpDocsApi::new(&args.base_url, args.csrf_token.clone())?;
    Ok(Arc::new(client))
}
