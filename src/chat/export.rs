use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::Result;
use crate::models::chat::ChatMessage;

const CHATGPT_URL: &str = "https://chat.openai.com/";
const AI_STUDIO_URL: &str = "https://makersuite.google.com/app/prompts/new";

/// Hosted assistants a transcript can be continued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalTool {
    ChatGpt,
    AiStudio,
}

impl fmt::Display for ExternalTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalTool::ChatGpt => write!(f, "chatgpt"),
            ExternalTool::AiStudio => write!(f, "aistudio"),
        }
    }
}

impl FromStr for ExternalTool {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chatgpt" | "openai" => Ok(ExternalTool::ChatGpt),
            "aistudio" | "ai-studio" | "gemini" => Ok(ExternalTool::AiStudio),
            _ => Err(format!("Unsupported external tool: '{}'", s)),
        }
    }
}

impl ExternalTool {
    pub fn prompt(&self, tool_name: &str, messages: &[ChatMessage]) -> String {
        match self {
            ExternalTool::ChatGpt => {
                let mut prompt = format!("Previous conversation about {} documentation:\n\n", tool_name);
                for msg in messages {
                    let role = if msg.is_user() { "User" } else { "Assistant" };
                    prompt.push_str(&format!("{}: {}\n\n", role, msg.content));
                }
                prompt.push_str("Please continue helping with this conversation based on the above context.");
                prompt
            }
            ExternalTool::AiStudio => {
                let mut prompt = format!(
                    "# {} Documentation Assistant\n\nPrevious conversation:\n\n",
                    tool_name.to_uppercase()
                );
                for msg in messages {
                    let role = if msg.is_user() { "USER" } else { "ASSISTANT" };
                    prompt.push_str(&format!("{}: {}\n\n", role, msg.content));
                }
                prompt.push_str(&format!("USER: Please continue helping with my questions about {}", tool_name));
                prompt
            }
        }
    }

    pub fn url(&self, tool_name: &str, messages: &[ChatMessage]) -> Result<Url> {
        let prompt = self.prompt(tool_name, messages);
        let url = match self {
            ExternalTool::ChatGpt => Url::parse_with_params(CHATGPT_URL, &[("prompt", prompt)])?,
            ExternalTool::AiStudio => Url::parse_with_params(AI_STUDIO_URL, &[("text", prompt)])?,
        };
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Sender;

    fn transcript() -> Vec<ChatMessage> {
        vec![
            ChatMessage::new(Sender::User, "What is a blueprint?"),
            ChatMessage::new(Sender::Ai, "A way to organize views."),
        ]
    }

    #[test]
    fn chatgpt_prompt_lists_turns() {
        let prompt = ExternalTool::ChatGpt.prompt("flask", &transcript());
        assert_eq!(
            prompt,
            "Previous conversation about flask documentation:\n\n\
User: What is a blueprint?\n\n\
Assistant: A way to organize views.\n\n\
Please continue helping with this conversation based on the above context."
        );
    }

    #[test]
    fn ai_studio_prompt_uses_upper_case_roles() {
        let prompt = ExternalTool::AiStudio.prompt("flask", &transcript());
        assert!(prompt.starts_with("# FLASK Documentation Assistant\n\nPrevious conversation:\n\n"));
        assert!(prompt.contains("USER: What is a blueprint?\n\nASSISTANT: A way to organize views.\n\n"));
        assert!(prompt.ends_with("USER: Please continue helping with my questions about flask"));
    }

    #[test]
    fn urls_carry_encoded_prompt() {
        let url = ExternalTool::ChatGpt.url("git", &transcript()).unwrap();
        assert_eq!(url.host_str(), Some("chat.openai.com"));
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "prompt");
        assert!(value.starts_with("Previous conversation about git documentation:"));

        let studio = ExternalTool::AiStudio.url("git", &[]).unwrap();
        assert_eq!(studio.path(), "/app/prompts/new");
        assert_eq!(studio.query_pairs().next().unwrap().0, "text");
    }

    #[test]
    fn parses_tool_names() {
        assert_eq!("ChatGPT".parse::<ExternalTool>(), Ok(ExternalTool::ChatGpt));
        assert_eq!("aistudio".parse::<ExternalTool>(), Ok(ExternalTool::AiStudio));
        assert!("bard".parse::<ExternalTool>().is_err());
    }
}
