use chrono::Utc;
use url::Url;
use uuid::Uuid;

use crate::error::{ ClientError, Result };

pub const SERVER_SHARE_PARAM: &str = "share";
pub const LOCAL_SHARE_PARAM: &str = "share_local";
pub const SERVER_SHARE_NOTICE: &str = "Chat link copied to clipboard!";
pub const LOCAL_SHARE_NOTICE: &str = "Local chat link copied to clipboard!";
pub const SHARE_FAILED_NOTICE: &str = "Failed to share chat. Please try again.";

const LOCAL_ID_RANDOM_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareOutcome {
    pub url: Url,
    pub local: bool,
}

impl ShareOutcome {
    pub fn notice(&self) -> &'static str {
        if self.local { LOCAL_SHARE_NOTICE } else { SERVER_SHARE_NOTICE }
    }
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Millisecond timestamp in base 36 followed by a random base-36 suffix.
pub fn generate_local_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let random: String = to_base36(Uuid::new_v4().as_u128()).chars().take(LOCAL_ID_RANDOM_LEN).collect();
    format!("{}{}", to_base36(millis), random)
}

pub fn origin_of(page_url: &Url) -> Result<Url> {
    Ok(Url::parse(&page_url.origin().ascii_serialization())?)
}

pub fn chat_page_path(tool_name: &str) -> String {
    format!("/ai-chat/{}/", tool_name)
}

/// `<origin>/ai-chat/<tool>/?<param>=<id>`
pub fn share_url(origin: &Url, tool_name: &str, param: &str, chat_id: &str) -> Result<Url> {
    let mut url = origin.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .clear()
        .extend(["ai-chat", tool_name, ""]);
    url.query_pairs_mut().append_pair(param, chat_id);
    Ok(url)
}
