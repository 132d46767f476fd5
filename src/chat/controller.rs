use log::{ error, info, warn };
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use super::export::ExternalTool;
use super::session::{ ChatSession, ChatState };
use super::share::{
    self,
    ShareOutcome,
    LOCAL_SHARE_PARAM,
    SERVER_SHARE_PARAM,
    SHARE_FAILED_NOTICE,
};
use super::view::ChatView;
use crate::api::DocsApi;
use crate::clipboard::Clipboard;
use crate::copy::{ copy_code_block, CopyTrigger };
use crate::error::Result;
use crate::models::chat::{ ChatMessage, Sender, SharedChat };
use crate::render::templates::user_body;
use crate::render::{ render_markdown, CodeBlock, RenderedMessage, SearchUrls };
use crate::storage::{ shared_key, LocalStore };

pub const SERVER_ERROR_REPLY: &str = "Sorry, I encountered an error while processing your request.";
pub const CONNECTION_ERROR_REPLY: &str = "Sorry, there was an error connecting to the server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    SharedFromServer,
    SharedFromLocal,
    History,
    Fresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input, or a request is already in flight.
    Ignored,
    Answered,
    Failed,
}

/// Drives one chat page: owns the transcript, talks to the backend and keeps
/// the view and the local store in step with the transcript.
pub struct ChatController<V: ChatView> {
    session: ChatSession,
    api: Arc<dyn DocsApi>,
    store: Arc<dyn LocalStore>,
    clipboard: Arc<dyn Clipboard>,
    search: SearchUrls,
    origin: Url,
    input: String,
    view: V,
}

impl<V: ChatView> ChatController<V> {
    pub fn new(
        page_url: &Url,
        api: Arc<dyn DocsApi>,
        store: Arc<dyn LocalStore>,
        clipboard: Arc<dyn Clipboard>,
        search: SearchUrls,
        view: V
    ) -> Result<Self> {
        let session = ChatSession::for_page(page_url);
        info!("Using tool name: {}", session.tool_name());
        Ok(Self {
            session,
            api,
            store,
            clipboard,
            search,
            origin: share::origin_of(page_url)?,
            input: String::new(),
            view,
        })
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn tool_name(&self) -> &str {
        self.session.tool_name()
    }

    pub fn state(&self) -> ChatState {
        self.session.state()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Restores whatever the page URL points at: a server-shared chat, a
    /// locally shared chat, or this tool's saved history.
    pub async fn load(&mut self, page_url: &Url) -> LoadOutcome {
        let params: HashMap<String, String> = page_url.query_pairs().into_owned().collect();
        let server_id = params.get(SERVER_SHARE_PARAM).filter(|id| !id.is_empty());
        let local_id = params.get(LOCAL_SHARE_PARAM).filter(|id| !id.is_empty());

        if let Some(chat_id) = server_id {
            match self.api.get_shared_chat(chat_id).await {
                Ok(chat) if !chat.messages.is_empty() => {
                    self.restore_chat(chat.messages);
                    self.view.show_shared_banner(&chat.created_at);
                    return LoadOutcome::SharedFromServer;
                }
                Ok(_) => warn!("Shared chat {} has no messages", chat_id),
                Err(e) => error!("Error loading shared chat: {}", e),
            }
        } else if let Some(chat_id) = local_id {
            match self.load_local_share(chat_id) {
                Ok(Some(chat)) if !chat.messages.is_empty() => {
                    self.restore_chat(chat.messages);
                    self.view.show_shared_banner(&chat.created_at);
                    return LoadOutcome::SharedFromLocal;
                }
                Ok(_) => warn!("No local shared chat under {}", chat_id),
                Err(e) => error!("Error parsing shared chat: {}", e),
            }
        } else {
            match self.session.load_history(self.store.as_ref()) {
                Ok(Some(messages)) if !messages.is_empty() => {
                    self.restore_chat(messages);
                    return LoadOutcome::History;
                }
                Ok(_) => {}
                Err(e) => error!("Error parsing chat history: {}", e),
            }
        }

        self.view.show_welcome(self.session.tool_name());
        LoadOutcome::Fresh
    }

    fn load_local_share(&self, chat_id: &str) -> Result<Option<SharedChat>> {
        match self.store.get_item(&shared_key(chat_id))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Replaces the transcript and redraws it without persisting.
    pub fn restore_chat(&mut self, messages: Vec<ChatMessage>) -> bool {
        if messages.is_empty() {
            return false;
        }
        self.view.clear();
        self.session.replace(messages);
        for index in 0..self.session.len() {
            self.render_message(index);
        }
        true
    }

    /// Drops the shared/restored conversation and greets the user again.
    /// Returns the page path without share parameters.
    pub fn start_new_chat(&mut self) -> String {
        self.view.clear();
        self.session.clear();
        self.view.show_welcome(self.session.tool_name());
        share::chat_page_path(self.session.tool_name())
    }

    fn render(&self, message: &ChatMessage) -> RenderedMessage {
        if message.is_user() {
            RenderedMessage::plain(user_body(&message.content))
        } else {
            render_markdown(&message.content, self.session.tool_name(), &self.search)
        }
    }

    fn render_message(&mut self, index: usize) {
        if let Some(message) = self.session.messages().get(index) {
            let rendered = self.render(message);
            self.view.show_message(&format!("msg-{}", index), message, &rendered);
        }
    }

    /// Appends to the transcript, shows the message and saves the transcript.
    pub fn append_message(&mut self, sender: Sender, content: &str) {
        let index = self.session.push(sender, content);
        self.render_message(index);
        if let Err(e) = self.session.persist(self.store.as_ref()) {
            warn!("Could not save chat history: {}", e);
        }
    }

    /// Submits the pending input.
    pub async fn submit_input(&mut self) -> SubmitOutcome {
        let question = self.input.clone();
        self.submit(&question).await
    }

    pub async fn submit(&mut self, raw: &str) -> SubmitOutcome {
        let question = raw.trim();
        if question.is_empty() || self.session.state() == ChatState::AwaitingResponse {
            return SubmitOutcome::Ignored;
        }

        self.append_message(Sender::User, question);
        self.input.clear();
        self.session.set_state(ChatState::AwaitingResponse);
        self.view.set_input_enabled(false);
        let indicator = format!("typing-{}", self.session.len());
        self.view.show_typing_indicator(&indicator);

        let result = self.api.ask(question, self.session.tool_name()).await;
        self.view.remove(&indicator);

        let outcome = match result {
            Ok(answer) => {
                self.append_message(Sender::Ai, &answer);
                SubmitOutcome::Answered
            }
            Err(e) => {
                error!("Error: {}", e);
                let reply = if e.is_status() { SERVER_ERROR_REPLY } else { CONNECTION_ERROR_REPLY };
                self.append_message(Sender::Ai, reply);
                SubmitOutcome::Failed
            }
        };

        self.session.set_state(ChatState::Idle);
        self.view.set_input_enabled(true);
        outcome
    }

    /// Shares the transcript through the server, or locally when that fails,
    /// and puts the link on the clipboard.
    pub async fn share(&mut self) -> Result<ShareOutcome> {
        let chat = SharedChat::new(self.session.tool_name(), self.session.messages().to_vec());
        self.view.set_share_busy(true);
        let result = match self.share_on_server(&chat).await {
            Ok(url) => Ok(ShareOutcome { url, local: false }),
            Err(e) => {
                error!("Error sharing chat: {}", e);
                self.share_locally(&chat).await.map(|url| ShareOutcome { url, local: true })
            }
        };
        self.view.set_share_busy(false);

        match &result {
            Ok(outcome) => {
                info!("Shared chat at {}", outcome.url);
                self.view.notify(outcome.notice());
            }
            Err(e) => {
                error!("Error in chat sharing: {}", e);
                self.view.notify(SHARE_FAILED_NOTICE);
            }
        }
        result
    }

    async fn share_on_server(&self, chat: &SharedChat) -> Result<Url> {
        let chat_id = self.api.create_shared_chat(chat).await?;
        let url = share::share_url(&self.origin, &chat.tool_name, SERVER_SHARE_PARAM, &chat_id)?;
        self.clipboard.write_text(url.as_str()).await?;
        Ok(url)
    }

    async fn share_locally(&self, chat: &SharedChat) -> Result<Url> {
        let chat_id = share::generate_local_id();
        self.store.set_item(&shared_key(&chat_id), &serde_json::to_string(chat)?)?;
        let url = share::share_url(&self.origin, &chat.tool_name, LOCAL_SHARE_PARAM, &chat_id)?;
        self.clipboard.write_text(url.as_str()).await?;
        Ok(url)
    }

    pub fn external_link(&self, tool: ExternalTool) -> Result<Url> {
        tool.url(self.session.tool_name(), self.session.messages())
    }

    /// Code blocks of all AI messages, in transcript order.
    pub fn code_blocks(&self) -> Vec<CodeBlock> {
        self.session
            .messages()
            .iter()
            .filter(|m| !m.is_user())
            .flat_map(|m| self.render(m).code_blocks)
            .collect()
    }

    /// Copies the `n`-th code block (1-based) of the transcript.
    pub async fn copy_code(&self, n: usize, button: &CopyTrigger) -> bool {
        match n.checked_sub(1).and_then(|i| self.code_blocks().into_iter().nth(i)) {
            Some(block) => copy_code_block(self.clipboard.as_ref(), &block, button).await,
            None => {
                warn!("No code block #{}", n);
                false
            }
        }
    }
}
