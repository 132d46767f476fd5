use log::debug;
use url::Url;

use crate::error::Result;
use crate::models::chat::{ ChatMessage, Sender };
use crate::storage::{ history_key, LocalStore };

pub const DEFAULT_TOOL: &str = "django";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    AwaitingResponse,
}

/// Tool name from a chat page path such as `/ai-chat/flask/`: the segment
/// before the trailing one, or `django` when that is empty.
pub fn tool_name_from_path(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').collect();
    parts
        .len()
        .checked_sub(2)
        .and_then(|i| parts.get(i))
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .unwrap_or_else(|| DEFAULT_TOOL.to_string())
}

/// The transcript of one chat page. Persisting is always an explicit call.
#[derive(Debug, Clone)]
pub struct ChatSession {
    tool_name: String,
    messages: Vec<ChatMessage>,
    state: ChatState,
}

impl ChatSession {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            messages: Vec::new(),
            state: ChatState::Idle,
        }
    }

    pub fn for_page(page_url: &Url) -> Self {
        Self::new(tool_name_from_path(page_url.path()))
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn set_state(&mut self, state: ChatState) {
        self.state = state;
    }

    /// Appends a message and returns its position in the transcript.
    pub fn push(&mut self, sender: Sender, content: &str) -> usize {
        self.messages.push(ChatMessage::new(sender, content));
        self.messages.len() - 1
    }

    pub fn replace(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn persist(&self, store: &dyn LocalStore) -> Result<()> {
        let json = serde_json::to_string(&self.messages)?;
        store.set_item(&history_key(&self.tool_name), &json)?;
        debug!("Saved {} messages for {}", self.messages.len(), self.tool_name);
        Ok(())
    }

    /// Reads the saved transcript for this tool, if any.
    pub fn load_history(&self, store: &dyn LocalStore) -> Result<Option<Vec<ChatMessage>>> {
        match store.get_item(&history_key(&self.tool_name))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}
