use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, RequestBuilder, Response };
use url::Url;

use super::{ CopyKind, DocsApi };
use crate::error::{ ClientError, Result };
use crate::models::api::{ ChatRequest, ChatResponse, CopyPayload, SharedChatCreated };
use crate::models::chat::SharedChat;

const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Clone)]
pub struct HttpDocsApi {
    http: HttpClient,
    base_url: Url,
    csrf_token: Option<String>,
}

impl HttpDocsApi {
    pub fn new(base_url: &str, csrf_token: Option<String>) -> Result<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            http: HttpClient::new(),
            base_url: Url::parse(&base)?,
            csrf_token: csrf_token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    fn with_csrf(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.csrf_token {
            Some(token) => req.header(CSRF_HEADER, token),
            None => req,
        }
    }

    fn ensure_success(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(ClientError::Status { status: status.as_u16(), url: resp.url().to_string() })
        }
    }
}

#[async_trait]
impl DocsApi for HttpDocsApi {
    async fn fetch_copy_content(&self, kind: CopyKind, name: &str) -> Result<CopyPayload> {
        let mut url = self.base_url.join(kind.endpoint())?;
        url.query_pairs_mut().append_pair("name", name);
        debug!("Copying {} for {} from {}", kind, name, url);
        // Error replies still carry a JSON body with an `error` field.
        let payload = self.http.get(url).send().await?.json::<CopyPayload>().await?;
        Ok(payload)
    }

    async fn ask(&self, question: &str, tool_name: &str) -> Result<String> {
        let url = self.endpoint(&["chat-api"])?;
        let req = self.http.post(url).json(&(ChatRequest { question, tool_name }));
        let resp = Self::ensure_success(self.with_csrf(req).send().await?)?;
        let data = resp.json::<ChatResponse>().await?;
        Ok(data.answer)
    }

    async fn create_shared_chat(&self, chat: &SharedChat) -> Result<String> {
        let url = self.endpoint(&["api", "shared-chats"])?;
        let req = self.http.post(url).json(chat);
        let resp = Self::ensure_success(self.with_csrf(req).send().await?)?;
        let created = resp.json::<SharedChatCreated>().await?;
        Ok(created.chat_id)
    }

    async fn get_shared_chat(&self, chat_id: &str) -> Result<SharedChat> {
        let url = self.endpoint(&["api", "shared-chats", chat_id])?;
        let resp = Self::ensure_success(self.http.get(url).send().await?)?;
        Ok(resp.json::<SharedChat>().await?)
    }
}
