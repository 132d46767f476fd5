use serde::{ Serialize, Deserialize };

#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub question: &'a str,
    pub tool_name: &'a str,
}

#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    pub answer: String,
}

/// Reply of the copy endpoints. Exactly one field is normally set.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct CopyPayload {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CopyPayload {
    pub fn into_content(self, name: &str) -> String {
        self.text
            .filter(|t| !t.is_empty())
            .or(self.summary.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| format!("No content available for {}", name))
    }
}

#[derive(Deserialize, Debug)]
pub struct SharedChatCreated {
    pub chat_id: String,
}
