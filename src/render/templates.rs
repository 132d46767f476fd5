use chrono::{ DateTime, Local, Utc };

use super::escape_html;
use crate::models::chat::ChatMessage;

pub fn message_bubble(id: &str, message: &ChatMessage, body_html: &str) -> String {
    let (row, bubble) = if message.is_user() {
        (
            "flex items-start mb-4 justify-end",
            "bg-blue-600 text-white rounded-2xl py-3 px-4 message-bubble user-message max-w-3xl",
        )
    } else {
        (
            "flex items-start mb-4",
            "bg-blue-50 border border-blue-100 rounded-2xl py-3 px-4 message-bubble ai-message max-w-3xl",
        )
    };
    format!(
        "<div class=\"{}\" id=\"{}\"><div class=\"{}\" style=\"white-space: pre-wrap\">{}</div></div>",
        row,
        id,
        bubble,
        body_html
    )
}

/// User text is shown verbatim, never interpreted.
pub fn user_body(content: &str) -> String {
    escape_html(content)
}

pub fn typing_indicator(id: &str) -> String {
    let dot = "w-2 h-2 rounded-full bg-blue-400 animate-pulse";
    format!(
        "<div class=\"flex items-start mb-4\" id=\"{id}\"><div class=\"bg-blue-50 border border-blue-100 rounded-2xl py-3 px-4\"><div class=\"flex space-x-2\">\
<div class=\"{dot}\"></div><div class=\"{dot}\" style=\"animation-delay: 0.2s\"></div><div class=\"{dot}\" style=\"animation-delay: 0.4s\"></div>\
</div></div></div>"
    )
}

pub fn capitalize(tool_name: &str) -> String {
    let mut chars = tool_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn welcome_text(tool_name: &str) -> String {
    let display = capitalize(tool_name);
    format!(
        "👋 Welcome to the {display} Documentation Assistant!\nAsk me anything about {display} and I'll help you find answers from the official documentation."
    )
}

pub fn welcome_message(tool_name: &str) -> String {
    let display = escape_html(&capitalize(tool_name));
    format!(
        "<div class=\"flex items-start\" id=\"welcome\"><div class=\"bg-blue-50 border border-blue-100 rounded-2xl py-3 px-4 message-bubble ai-message\">\
<div class=\"flex items-center justify-between mb-2\"><div class=\"flex items-center\">\
<div class=\"h-8 w-8 bg-blue-100 rounded-full flex items-center justify-center mr-2\"><i class=\"fas fa-robot text-blue-600\"></i></div>\
<span class=\"font-medium text-blue-800\">AI Assistant</span></div></div>\
<div class=\"prose prose-blue max-w-none\"><p>👋 Welcome to the {display} Documentation Assistant!</p>\
<p>Ask me anything about {display} and I&#039;ll help you find answers from the official documentation.</p></div></div></div>"
    )
}

pub fn format_created_at(created_at: &DateTime<Utc>) -> String {
    created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn shared_banner(created_at: &DateTime<Utc>) -> String {
    format!(
        "<div class=\"bg-blue-100 border-l-4 border-blue-500 text-blue-700 p-3 mb-4\" id=\"shared-banner\"><div class=\"flex justify-between items-center\">\
<div><p class=\"font-medium\">You&#039;re viewing a shared conversation</p><p class=\"text-sm\">{}</p></div>\
<button class=\"text-sm bg-blue-600 text-white px-3 py-1 rounded hover:bg-blue-700\" id=\"new-chat-btn\">Start New Chat</button>\
</div></div>",
        format_created_at(created_at)
    )
}
