use chrono::{ DateTime, Utc };

use crate::models::chat::ChatMessage;
use crate::render::templates;
use crate::render::RenderedMessage;

pub const WELCOME_ID: &str = "welcome";
pub const SHARED_BANNER_ID: &str = "shared-banner";

/// Where the chat controller puts what the user sees. Elements are addressed
/// by the stable ids the controller hands out.
pub trait ChatView: Send {
    fn clear(&mut self);
    fn show_message(&mut self, id: &str, message: &ChatMessage, rendered: &RenderedMessage);
    fn show_welcome(&mut self, tool_name: &str);
    fn show_shared_banner(&mut self, created_at: &DateTime<Utc>);
    fn show_typing_indicator(&mut self, id: &str);
    fn remove(&mut self, id: &str);
    fn set_input_enabled(&mut self, enabled: bool);
    fn set_share_busy(&mut self, busy: bool);
    /// Transient toast; the host decides how long it stays.
    fn notify(&mut self, text: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewElement {
    pub id: String,
    pub html: String,
}

/// Keeps the message list as HTML fragments in display order.
#[derive(Debug, Clone)]
pub struct HtmlView {
    elements: Vec<ViewElement>,
    notifications: Vec<String>,
    input_enabled: bool,
    share_busy: bool,
}

impl Default for HtmlView {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            notifications: Vec::new(),
            input_enabled: true,
            share_busy: false,
        }
    }
}

impl HtmlView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[ViewElement] {
        &self.elements
    }

    pub fn ids(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.iter().any(|e| e.id == id)
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn share_busy(&self) -> bool {
        self.share_busy
    }

    pub fn to_html(&self) -> String {
        let body: String = self.elements.iter().map(|e| e.html.as_str()).collect();
        format!("<div id=\"chat-messages\">{}</div>", body)
    }

    fn push(&mut self, id: &str, html: String) {
        self.remove(id);
        self.elements.push(ViewElement { id: id.to_string(), html });
    }
}

impl ChatView for HtmlView {
    fn clear(&mut self) {
        self.elements.clear();
    }

    fn show_message(&mut self, id: &str, message: &ChatMessage, rendered: &RenderedMessage) {
        self.push(id, templates::message_bubble(id, message, &rendered.html));
    }

    fn show_welcome(&mut self, tool_name: &str) {
        self.elements.clear();
        self.push(WELCOME_ID, templates::welcome_message(tool_name));
    }

    fn show_shared_banner(&mut self, created_at: &DateTime<Utc>) {
        self.remove(SHARED_BANNER_ID);
        self.elements.insert(0, ViewElement {
            id: SHARED_BANNER_ID.to_string(),
            html: templates::shared_banner(created_at),
        });
    }

    fn show_typing_indicator(&mut self, id: &str) {
        self.push(id, templates::typing_indicator(id));
    }

    fn remove(&mut self, id: &str) {
        self.elements.retain(|e| e.id != id);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn set_share_busy(&mut self, busy: bool) {
        self.share_busy = busy;
    }

    fn notify(&mut self, text: &str) {
        self.notifications.push(text.to_string());
    }
}

/// Prints the conversation as plain text for the interactive CLI.
#[derive(Debug, Default)]
pub struct TerminalView;

impl ChatView for TerminalView {
    fn clear(&mut self) {
        println!("----------------------------------------");
    }

    fn show_message(&mut self, _id: &str, message: &ChatMessage, rendered: &RenderedMessage) {
        let who = if message.is_user() { "You" } else { "AI" };
        println!("\n[{}] {}", who, message.content);
        if !rendered.code_blocks.is_empty() {
            println!("({} code block(s), use /copy-code <n>)", rendered.code_blocks.len());
        }
    }

    fn show_welcome(&mut self, tool_name: &str) {
        println!("\n{}", templates::welcome_text(tool_name));
    }

    fn show_shared_banner(&mut self, created_at: &DateTime<Utc>) {
        println!(
            "You're viewing a shared conversation ({}). Type /new to start a new chat.",
            templates::format_created_at(created_at)
        );
    }

    fn show_typing_indicator(&mut self, _id: &str) {
        println!("...");
    }

    fn remove(&mut self, _id: &str) {}

    fn set_input_enabled(&mut self, _enabled: bool) {}

    fn set_share_busy(&mut self, busy: bool) {
        if busy {
            println!("Generating link...");
        }
    }

    fn notify(&mut self, text: &str) {
        println!("* {}", text);
    }
}
